pub mod config;
pub mod datasource;
pub mod domain;
pub mod engine;
pub mod error;
pub mod orchestration;
pub mod report;

pub use config::AuditConfig;
pub use datasource::{parse_standings_line, StandingsParseError, TrafficLog, TrafficLogError};
pub use domain::{ItemRef, PlayerName, StandingsSnapshot, TransactionRecord};
pub use engine::{decay, reconcile, Finding, Reconciliation};
pub use error::AuditError;
pub use orchestration::{discover, AuditSession, SessionError, StandingsFile};
pub use report::{ConsoleReport, JsonReport, Mode, ReportSink};
