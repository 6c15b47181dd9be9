//! Parsers for the two flat-file inputs: standings exports and the traffic log.

pub mod standings;
pub mod traffic_log;

pub use standings::{parse_standings_line, StandingsParseError};
pub use traffic_log::{SkippedRecord, TrafficLog, TrafficLogError};
