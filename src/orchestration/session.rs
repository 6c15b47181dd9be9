//! The audit session: explicit state threaded through each file-processing
//! call (latest snapshot per player, active configuration, player filter,
//! traffic index). No ambient state.

use crate::config::{AuditConfig, ConfigError};
use crate::datasource::{parse_standings_line, TrafficLog};
use crate::domain::{PlayerName, StandingsSnapshot};
use crate::engine::{reconcile, Reconciliation};
use chrono::NaiveDate;
use std::collections::HashMap;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

#[derive(Debug, Error)]
pub enum SessionError {
    /// An embedded configuration override failed to deserialize. Fatal:
    /// continuing with a guessed configuration would make every subsequent
    /// comparison confidently wrong.
    #[error("embedded config override failed: {0}")]
    ConfigOverride(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub struct AuditSession {
    config: AuditConfig,
    filter: Option<String>,
    traffic: TrafficLog,
    latest: HashMap<PlayerName, StandingsSnapshot>,
}

impl AuditSession {
    pub fn new(config: AuditConfig, traffic: TrafficLog, filter: Option<String>) -> Self {
        Self {
            config,
            filter,
            traffic,
            latest: HashMap::new(),
        }
    }

    /// The configuration currently in effect (startup value or the most
    /// recent embedded override).
    pub fn active_config(&self) -> &AuditConfig {
        &self.config
    }

    /// Process one standings file dated `date`, reconciling each player
    /// against their previously stored snapshot.
    ///
    /// Files must be handed over in ascending log-id order; the week-over-week
    /// decay comparison is only meaningful chronologically.
    pub async fn process_file<R: AsyncBufRead + Unpin>(
        &mut self,
        reader: R,
        date: NaiveDate,
    ) -> Result<Vec<Reconciliation>, SessionError> {
        let mut out = Vec::new();
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await? {
            let trimmed = line.trim_start();
            if trimmed.is_empty() {
                continue;
            }

            // A `{`-prefixed line is an embedded configuration override; it
            // replaces the active config for all subsequent comparisons.
            if trimmed.starts_with('{') {
                self.config = AuditConfig::from_embedded(trimmed)?;
                tracing::info!(config = ?self.config, "applied embedded config override");
                continue;
            }

            let snapshot = match parse_standings_line(&line, date, self.config.base_gp) {
                Ok(snapshot) => snapshot,
                Err(err) => {
                    tracing::warn!(line = %line, error = %err, "skipping malformed standings line");
                    continue;
                }
            };

            if let Some(prev) = self.latest.get(&snapshot.name) {
                if self.matches_filter(&snapshot.name) {
                    let window = self.traffic.window(&snapshot.name, prev.date, snapshot.date);
                    out.push(reconcile(prev, &snapshot, &window, &self.config));
                }
            }
            // The new snapshot supersedes the stored one even for filtered
            // players, so priors stay correct if the filter changes.
            self.latest.insert(snapshot.name.clone(), snapshot);
        }

        Ok(out)
    }

    fn matches_filter(&self, name: &PlayerName) -> bool {
        match &self.filter {
            Some(prefix) => name.starts_with(prefix),
            None => true,
        }
    }
}
