//! Domain types for the EP/GP standings audit.
//!
//! This module provides:
//! - PlayerName, the ASCII-sanitized correlation key between data sources
//! - StandingsSnapshot, one player's weekly ledger state
//! - TransactionRecord/ItemRef, one award event from the traffic log

pub mod primitives;
pub mod snapshot;
pub mod transaction;

pub use primitives::PlayerName;
pub use snapshot::StandingsSnapshot;
pub use transaction::{ItemRef, TransactionRecord};
