//! JSON-lines rendering, one reconciliation per line.

use crate::engine::Reconciliation;
use crate::report::ReportSink;

#[derive(Debug, Default)]
pub struct JsonReport;

impl ReportSink for JsonReport {
    fn emit(&mut self, rec: &Reconciliation) {
        match serde_json::to_string(rec) {
            Ok(line) => println!("{}", line),
            Err(e) => tracing::error!(player = %rec.player, error = %e, "failed to serialize reconciliation"),
        }
    }
}
