//! Run orchestration: file discovery and the per-run audit session.

pub mod discover;
pub mod session;

pub use discover::{discover, DiscoverError, StandingsFile};
pub use session::{AuditSession, SessionError};
