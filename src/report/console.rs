//! Human-readable console rendering.

use crate::engine::{Finding, Reconciliation};
use crate::report::{Mode, ReportSink};

pub struct ConsoleReport {
    mode: Mode,
}

impl ConsoleReport {
    pub fn new(mode: Mode) -> Self {
        Self { mode }
    }

    fn analyze(&self, rec: &Reconciliation) {
        for finding in &rec.findings {
            match finding {
                Finding::ExcessEp { over_by } => {
                    println!(
                        "\t!!! {} - Taking last week's EP value of {}, decaying it, then adding the max possible EP of {} for attending all raids this player should not have been able to go over {}. The following week shows them at {} which is {} too high.",
                        rec.player,
                        rec.prev.ep,
                        rec.potential_next_ep - rec.decayed_ep,
                        rec.potential_next_ep,
                        rec.next.ep,
                        over_by
                    );
                }
                Finding::InsufficientGp { short_by } => {
                    println!(
                        "\t!!! {} - Taking last week's GP value of {} and decaying it they should be at {} if they did not receive any new loot. The following week they were at {} which is {} lower than it should be.",
                        rec.player, rec.prev.gp, rec.decayed_gp, rec.next.gp, short_by
                    );
                }
                Finding::DoubleDecay => {
                    println!(
                        "\t!!! {} - Taking last week's GP value of {} and decaying it they should be at {} if they did not receive any new loot. The following week they were at {} which is {} lower than it should be. The value of their decayed GP matches what it would have been if we decayed it twice.",
                        rec.player,
                        rec.prev.gp,
                        rec.decayed_gp,
                        rec.next.gp,
                        rec.decayed_gp - rec.next.gp
                    );
                }
                Finding::GpMismatchAtFirstAward {
                    expected_gp,
                    observed_gp,
                    timestamp,
                } => {
                    println!(
                        "\t!!! {} - The first award of the period on {} shows them at {} GP but decaying last week's value puts them at {}.",
                        rec.player,
                        timestamp.format("%Y-%m-%d %H:%M"),
                        observed_gp,
                        expected_gp
                    );
                }
                Finding::GpDiscontinuityBetweenAwards {
                    prior_after,
                    next_before,
                    timestamp,
                } => {
                    println!(
                        "\t!!! {} - GP jumped from {} to {} between two recorded awards (at {}) with nothing in the log to explain it.",
                        rec.player,
                        prior_after,
                        next_before,
                        timestamp.format("%Y-%m-%d %H:%M")
                    );
                }
                Finding::InsufficientGpAfterLoot { expected_gp } => {
                    println!(
                        "\t!!! {} - The last recorded award left them at {} GP but the following week shows only {}.",
                        rec.player, expected_gp, rec.next.gp
                    );
                }
                // Informational flags appear in the summary line only.
                Finding::MissedRaid | Finding::GotLoot { .. } => {}
            }
        }
    }

    fn summary(&self, rec: &Reconciliation) {
        let mut line = format!(
            "\t{} - Missed Raid: {} - Got Loot: {} - Too Much EP: {} (Expected {}, Got {}) - Too Little GP: {} (Expected {} (Double Decay: {}), Got {}) - Before: {}/{} - Decayed: {}/{} - After: {}/{}",
            rec.player,
            rec.missed_raid(),
            rec.got_loot(),
            rec.excess_ep(),
            rec.potential_next_ep,
            rec.next.ep,
            rec.insufficient_gp(),
            rec.decayed_gp,
            rec.decayed_gp2,
            rec.next.gp,
            rec.prev.ep,
            rec.prev.gp,
            rec.decayed_ep,
            rec.decayed_gp,
            rec.next.ep,
            rec.next.gp
        );
        if !rec.loot.is_empty() {
            let names: Vec<&str> = rec.loot.iter().map(|item| item.name.as_str()).collect();
            line.push_str(&format!(" - Loot: {}", names.join(", ")));
        }
        println!("{}", line);
    }
}

impl ReportSink for ConsoleReport {
    fn emit(&mut self, rec: &Reconciliation) {
        if matches!(self.mode, Mode::Analyze | Mode::Both) {
            self.analyze(rec);
        }
        if matches!(self.mode, Mode::Report | Mode::Both) {
            self.summary(rec);
        }
    }
}
