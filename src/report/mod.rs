//! Rendering of reconciliation results. The engine emits structured
//! findings; everything about turning them into console or JSON output
//! lives here.

use crate::engine::Reconciliation;
use clap::ValueEnum;

pub mod console;
pub mod json;

pub use console::ConsoleReport;
pub use json::JsonReport;

/// What the run prints for each reconciled snapshot pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Explanatory lines for anomalies only.
    Analyze,
    /// One summary line per player per week.
    Report,
    /// Both of the above.
    Both,
}

/// Outbound seam for reconciliation results.
pub trait ReportSink {
    fn emit(&mut self, rec: &Reconciliation);
}
