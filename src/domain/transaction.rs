//! One loot/award event extracted from the addon's traffic log.

use crate::domain::PlayerName;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An item reference captured from an award record's encoded item link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRef {
    pub id: i64,
    pub name: String,
}

/// A single award/adjustment event from the traffic log.
///
/// Numeric fields use [`TransactionRecord::UNKNOWN`] where the log left the
/// quoted payload blank; that distinguishes "unrecorded" from a genuine zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub target: PlayerName,
    pub giver: String,
    pub message: String,
    pub ep_before: i64,
    pub ep_after: i64,
    pub gp_before: i64,
    pub gp_after: i64,
    pub item: Option<ItemRef>,
    pub timestamp: DateTime<Utc>,
}

impl TransactionRecord {
    /// Sentinel for a blank numeric payload.
    pub const UNKNOWN: i64 = -1;

    /// Whether this record carries usable GP information.
    ///
    /// Records with equal GP before/after are pure EP traffic, and records
    /// with an unknown GP endpoint cannot anchor any GP comparison; neither
    /// participates in GP reconciliation.
    pub fn is_gp_relevant(&self) -> bool {
        self.gp_before != Self::UNKNOWN
            && self.gp_after != Self::UNKNOWN
            && self.gp_before != self.gp_after
    }
}
