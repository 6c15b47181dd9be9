//! Week-over-week reconciliation of one player's snapshot pair.

use crate::config::AuditConfig;
use crate::domain::{StandingsSnapshot, TransactionRecord};
use crate::engine::{decay, Finding, Reconciliation};

/// Margin of one point applied to the magnitude comparisons.
///
/// Weekly decay rounding legitimately produces off-by-one ledger states; a
/// strict policy floods the report with false positives. DoubleDecay stays an
/// exact equality by definition.
pub const MARGIN: i64 = 1;

/// Reconcile `prev` against `next` under `config`, using the player's
/// transaction records whose timestamps fall between the two snapshots.
///
/// `transactions` must be ordered by timestamp; the traffic index guarantees
/// this.
pub fn reconcile(
    prev: &StandingsSnapshot,
    next: &StandingsSnapshot,
    transactions: &[TransactionRecord],
    config: &AuditConfig,
) -> Reconciliation {
    let percent = config.decay_percent;
    let decayed_ep = decay(prev.ep, percent, 0);
    let decayed_ep2 = decay(decayed_ep, percent, 0);
    let decayed_gp = decay(prev.gp, percent, config.base_gp);
    // The second pass is unanchored: it models "decayed again as if it had
    // no floor", which is what a buggy double application produces.
    let decayed_gp2 = decay(decayed_gp, percent, 0);
    let potential_next_ep = decayed_ep + config.weekly_ep_cap + config.ep_modifier;

    let mut findings = Vec::new();
    let mut loot = Vec::new();

    // Replay the GP-relevant traffic between the snapshots.
    let mut gp_from_traffic: i64 = 0;
    let mut prior: Option<&TransactionRecord> = None;
    let mut relevant_awards = 0usize;
    for record in transactions.iter().filter(|r| r.is_gp_relevant()) {
        match prior {
            None => {
                if (decayed_gp - record.gp_before).abs() > MARGIN {
                    findings.push(Finding::GpMismatchAtFirstAward {
                        expected_gp: decayed_gp,
                        observed_gp: record.gp_before,
                        timestamp: record.timestamp,
                    });
                }
            }
            Some(previous) => {
                if previous.gp_after != record.gp_before {
                    findings.push(Finding::GpDiscontinuityBetweenAwards {
                        prior_after: previous.gp_after,
                        next_before: record.gp_before,
                        timestamp: record.timestamp,
                    });
                }
            }
        }
        if let Some(item) = &record.item {
            loot.push(item.clone());
        }
        gp_from_traffic = record.gp_after;
        prior = Some(record);
        relevant_awards += 1;
    }

    let double_decay = next.gp == decayed_gp2 && next.gp != config.base_gp;

    if potential_next_ep - next.ep > MARGIN {
        findings.push(Finding::MissedRaid);
    }
    // A zero prior EP means a new or unknown player, not an anomaly.
    if next.ep - potential_next_ep > MARGIN && prev.ep != 0 {
        findings.push(Finding::ExcessEp {
            over_by: next.ep - potential_next_ep,
        });
    }
    if next.gp - decayed_gp > MARGIN {
        findings.push(Finding::GotLoot {
            gained: next.gp - decayed_gp,
        });
    }
    if decayed_gp - next.gp > MARGIN
        && next.gp != config.base_gp
        && next.gp != 0
        && !double_decay
    {
        findings.push(Finding::InsufficientGp {
            short_by: decayed_gp - next.gp,
        });
    }
    if double_decay {
        findings.push(Finding::DoubleDecay);
    }
    if gp_from_traffic - next.gp > MARGIN {
        findings.push(Finding::InsufficientGpAfterLoot {
            expected_gp: gp_from_traffic,
        });
    }

    Reconciliation {
        player: next.name.clone(),
        prev: prev.clone(),
        next: next.clone(),
        decayed_ep,
        decayed_ep2,
        decayed_gp,
        decayed_gp2,
        potential_next_ep,
        gp_from_traffic,
        relevant_awards,
        loot,
        findings,
    }
}
