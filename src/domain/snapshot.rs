//! One player's ledger state as of a weekly standings export.

use crate::domain::PlayerName;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A player's EP/GP standing as recorded in one weekly export.
///
/// Snapshots are immutable: the next week's snapshot for the same player
/// supersedes this one, it never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingsSnapshot {
    pub name: PlayerName,
    pub class: String,
    pub role: String,
    /// Effort points. Defaults to 0 when the export leaves the field blank.
    pub ep: i64,
    /// Gear points. Defaults to the configured base GP when blank.
    pub gp: i64,
    /// Priority ratio (EP/GP). Informational only; never reconciled.
    pub pr: f64,
    /// Date the export was taken, from the filename.
    pub date: NaiveDate,
}

impl StandingsSnapshot {
    /// The EP/GP ratio implied by the snapshot's own EP and GP values.
    pub fn derived_pr(ep: i64, gp: i64) -> f64 {
        if gp == 0 {
            0.0
        } else {
            ep as f64 / gp as f64
        }
    }

    /// Render the snapshot back into the 6-field export line form.
    pub fn to_line(&self) -> String {
        format!(
            "{},{},{},{},{},{}",
            self.name, self.class, self.role, self.ep, self.gp, self.pr
        )
    }
}
