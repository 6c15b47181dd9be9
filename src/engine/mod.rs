//! Pure reconciliation engine for the weekly decay model.

use crate::domain::{ItemRef, PlayerName, StandingsSnapshot};
use chrono::{DateTime, Utc};
use serde::Serialize;

pub mod decay;
pub mod reconcile;

pub use decay::decay;
pub use reconcile::{reconcile, MARGIN};

/// One anomaly detected for a snapshot pair.
///
/// The surrounding [`Reconciliation`] carries the shared numeric context;
/// variants only add what is specific to the finding.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Finding {
    /// EP rose by less than full attendance would allow.
    MissedRaid,
    /// EP rose past what decay plus full attendance can produce.
    ExcessEp { over_by: i64 },
    /// GP rose past the decay expectation.
    GotLoot { gained: i64 },
    /// GP fell below the decay expectation with no recorded cause.
    InsufficientGp { short_by: i64 },
    /// GP matches what a second, unanchored decay pass would produce.
    DoubleDecay,
    /// The ledger ended below what the last recorded award implies.
    InsufficientGpAfterLoot { expected_gp: i64 },
    /// The decay model disagrees with the ledger state observed at the
    /// first award of the period.
    GpMismatchAtFirstAward {
        expected_gp: i64,
        observed_gp: i64,
        timestamp: DateTime<Utc>,
    },
    /// GP jumped between two recorded awards with no logged cause.
    GpDiscontinuityBetweenAwards {
        prior_after: i64,
        next_before: i64,
        timestamp: DateTime<Utc>,
    },
}

impl Finding {
    /// Stable short name for rendering and filtering.
    pub fn kind(&self) -> &'static str {
        match self {
            Finding::MissedRaid => "missed_raid",
            Finding::ExcessEp { .. } => "excess_ep",
            Finding::GotLoot { .. } => "got_loot",
            Finding::InsufficientGp { .. } => "insufficient_gp",
            Finding::DoubleDecay => "double_decay",
            Finding::InsufficientGpAfterLoot { .. } => "insufficient_gp_after_loot",
            Finding::GpMismatchAtFirstAward { .. } => "gp_mismatch_at_first_award",
            Finding::GpDiscontinuityBetweenAwards { .. } => "gp_discontinuity_between_awards",
        }
    }
}

/// The full result of reconciling one consecutive snapshot pair.
#[derive(Debug, Clone, Serialize)]
pub struct Reconciliation {
    pub player: PlayerName,
    pub prev: StandingsSnapshot,
    pub next: StandingsSnapshot,
    pub decayed_ep: i64,
    pub decayed_ep2: i64,
    pub decayed_gp: i64,
    /// Second GP decay pass, unanchored: what the value would look like if
    /// the decay had mistakenly been applied twice.
    pub decayed_gp2: i64,
    pub potential_next_ep: i64,
    /// GP implied by the last GP-relevant award in the window, 0 if none.
    pub gp_from_traffic: i64,
    pub relevant_awards: usize,
    /// Items awarded in the window, for report enrichment.
    pub loot: Vec<ItemRef>,
    pub findings: Vec<Finding>,
}

impl Reconciliation {
    pub fn missed_raid(&self) -> bool {
        self.has(|f| matches!(f, Finding::MissedRaid))
    }

    pub fn excess_ep(&self) -> bool {
        self.has(|f| matches!(f, Finding::ExcessEp { .. }))
    }

    pub fn got_loot(&self) -> bool {
        self.has(|f| matches!(f, Finding::GotLoot { .. }))
    }

    pub fn insufficient_gp(&self) -> bool {
        self.has(|f| matches!(f, Finding::InsufficientGp { .. }))
    }

    pub fn double_decay(&self) -> bool {
        self.has(|f| matches!(f, Finding::DoubleDecay))
    }

    fn has(&self, pred: impl Fn(&Finding) -> bool) -> bool {
        self.findings.iter().any(pred)
    }
}
