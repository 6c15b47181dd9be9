//! Parsing the addon's traffic log table dump into per-player award records.
//!
//! The log is a Lua-style table literal: a sentinel marker line introduces
//! the table, each record is a bracketed block of quoted scalar lines, and
//! the table ends at a closing-bracket line. The parser is a line-oriented
//! state machine; it tolerates purely structural noise but treats a lost
//! stream position as fatal for the whole log.

use crate::domain::{ItemRef, PlayerName, TransactionRecord};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

/// Sentinel introducing the traffic table; everything before it is ignored.
const TRAFFIC_MARKER: &str = "TRAFFIC = {";

/// One quoted scalar line: `"payload",`.
static QUOTED_VAL: Lazy<Regex> = Lazy::new(|| Regex::new(r#"^\s*"(.*)","#).unwrap());

/// An encoded item link with its bracketed display name.
static ITEM_VAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^\s*".*Hitem:([0-9]+).*?\[(.*?)\]"#).unwrap());

/// First run of at least two digits anywhere in the line.
static TIMESTAMP_VAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9][0-9]+").unwrap());

#[derive(Debug, Error)]
pub enum TrafficLogError {
    /// No epoch timestamp found even after the one-line lookahead. The
    /// stream position is unknowable past this point, so the whole parse
    /// aborts.
    #[error("no timestamp in traffic record for {target:?} (candidate line {line:?})")]
    MissingTimestamp { target: String, line: String },
    #[error("traffic log ended inside a record for {target:?}")]
    UnexpectedEof { target: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A record that could not be parsed but whose boundary was still found.
#[derive(Debug, Clone)]
pub struct SkippedRecord {
    pub target: String,
    pub reason: String,
}

/// Per-player award records extracted from one traffic log.
#[derive(Debug, Default)]
pub struct TrafficLog {
    entries: HashMap<PlayerName, Vec<TransactionRecord>>,
    /// Records skipped with a known next-record boundary; surfaced so the
    /// caller can log them rather than lose them silently.
    pub skipped: Vec<SkippedRecord>,
}

impl TrafficLog {
    /// Parse a full traffic log stream.
    pub async fn parse<R: AsyncBufRead + Unpin>(reader: R) -> Result<Self, TrafficLogError> {
        let mut lines = reader.lines();

        loop {
            match lines.next_line().await? {
                // A log with no traffic table yields an empty index.
                None => return Ok(Self::default()),
                Some(line) if line.contains(TRAFFIC_MARKER) => break,
                Some(_) => {}
            }
        }

        let mut log = Self::default();
        loop {
            // Opening bracket of the next record, or the table's own
            // closing bracket, which ends the parse successfully.
            let Some(open) = lines.next_line().await? else {
                break;
            };
            if open.contains('}') {
                break;
            }

            match read_record(&mut lines).await? {
                RecordOutcome::Parsed(record) => {
                    log.entries
                        .entry(record.target.clone())
                        .or_default()
                        .push(record);
                }
                RecordOutcome::Skipped(skipped) => {
                    tracing::warn!(
                        target = %skipped.target,
                        reason = %skipped.reason,
                        "skipping malformed traffic record"
                    );
                    log.skipped.push(skipped);
                }
            }
        }

        // File order is chronological in practice but never guaranteed; sort
        // so the first/previous-award logic downstream cannot silently
        // misbehave on an out-of-order log.
        for records in log.entries.values_mut() {
            records.sort_by_key(|r| r.timestamp);
        }

        Ok(log)
    }

    /// All traffic for a player, oldest first.
    pub fn for_player(&self, name: &PlayerName) -> &[TransactionRecord] {
        self.entries.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Records attributed to the comparison window `(after, until]`.
    ///
    /// An award logged on the day the new snapshot was exported belongs to
    /// the period that snapshot closes; awards on the previous snapshot's
    /// own day were already reflected in it.
    pub fn window(
        &self,
        name: &PlayerName,
        after: NaiveDate,
        until: NaiveDate,
    ) -> Vec<TransactionRecord> {
        self.for_player(name)
            .iter()
            .filter(|r| {
                let day = r.timestamp.date_naive();
                day > after && day <= until
            })
            .cloned()
            .collect()
    }

    /// Number of players with at least one record.
    pub fn player_count(&self) -> usize {
        self.entries.len()
    }

    /// Total number of parsed records.
    pub fn record_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}

enum RecordOutcome {
    Parsed(TransactionRecord),
    Skipped(SkippedRecord),
}

enum IntRead {
    Value(i64),
    Malformed { raw: String },
}

async fn read_record<R: AsyncBufRead + Unpin>(
    lines: &mut Lines<R>,
) -> Result<RecordOutcome, TrafficLogError> {
    let target = read_string(lines, "").await?;
    let giver = read_string(lines, &target).await?;
    let message = read_string(lines, &target).await?;

    let mut numbers = [0i64; 4];
    let fields = ["EP-before", "EP-after", "GP-before", "GP-after"];
    for (slot, field) in numbers.iter_mut().zip(fields) {
        match read_int(lines, &target).await? {
            IntRead::Value(value) => *slot = value,
            IntRead::Malformed { raw } => {
                // The record is lost but the stream position is not: the
                // closing-bracket scan finds the next record boundary.
                skip_to_close(lines, &target).await?;
                return Ok(RecordOutcome::Skipped(SkippedRecord {
                    target,
                    reason: format!("non-numeric {} payload in {:?}", field, raw),
                }));
            }
        }
    }

    let item_line = require_line(lines, &target).await?;
    let (item, mut candidate) = match parse_item(&item_line) {
        Some(item) => (Some(item), require_line(lines, &target).await?),
        None => (None, item_line),
    };

    let timestamp = match parse_timestamp(&candidate) {
        Some(ts) => ts,
        None => {
            // Single documented lookahead: some records carry one extra
            // structural line before the timestamp.
            candidate = require_line(lines, &target).await?;
            match parse_timestamp(&candidate) {
                Some(ts) => ts,
                None => {
                    return Err(TrafficLogError::MissingTimestamp {
                        target,
                        line: candidate,
                    })
                }
            }
        }
    };

    // Remaining lines up to the closing bracket are extra/future fields.
    skip_to_close(lines, &target).await?;

    Ok(RecordOutcome::Parsed(TransactionRecord {
        target: PlayerName::sanitize(&target),
        giver,
        message,
        ep_before: numbers[0],
        ep_after: numbers[1],
        gp_before: numbers[2],
        gp_after: numbers[3],
        item,
        timestamp,
    }))
}

async fn require_line<R: AsyncBufRead + Unpin>(
    lines: &mut Lines<R>,
    target: &str,
) -> Result<String, TrafficLogError> {
    lines
        .next_line()
        .await?
        .ok_or_else(|| TrafficLogError::UnexpectedEof {
            target: target.to_string(),
        })
}

/// Read a quoted string field. A line with no quoted payload contributes the
/// empty string; structural noise never fails a string field.
async fn read_string<R: AsyncBufRead + Unpin>(
    lines: &mut Lines<R>,
    target: &str,
) -> Result<String, TrafficLogError> {
    let line = require_line(lines, target).await?;
    tracing::trace!(line = %line, "traffic string field");
    Ok(QUOTED_VAL
        .captures(&line)
        .map(|caps| caps[1].to_string())
        .unwrap_or_default())
}

/// Read a quoted numeric field. Blank (or absent) payloads are the unknown
/// sentinel, not zero; a non-blank non-numeric payload loses the record.
async fn read_int<R: AsyncBufRead + Unpin>(
    lines: &mut Lines<R>,
    target: &str,
) -> Result<IntRead, TrafficLogError> {
    let line = require_line(lines, target).await?;
    tracing::trace!(line = %line, "traffic numeric field");
    let payload = QUOTED_VAL
        .captures(&line)
        .map(|caps| caps[1].to_string())
        .unwrap_or_default();
    if payload.trim().is_empty() {
        return Ok(IntRead::Value(TransactionRecord::UNKNOWN));
    }
    match payload.trim().parse::<i64>() {
        Ok(value) => Ok(IntRead::Value(value)),
        Err(_) => Ok(IntRead::Malformed { raw: line }),
    }
}

async fn skip_to_close<R: AsyncBufRead + Unpin>(
    lines: &mut Lines<R>,
    target: &str,
) -> Result<(), TrafficLogError> {
    loop {
        match lines.next_line().await? {
            None => {
                return Err(TrafficLogError::UnexpectedEof {
                    target: target.to_string(),
                })
            }
            Some(line) if line.trim_start().starts_with('}') => return Ok(()),
            Some(_) => {}
        }
    }
}

fn parse_item(line: &str) -> Option<ItemRef> {
    let caps = ITEM_VAL.captures(line)?;
    let id = caps[1].parse::<i64>().ok()?;
    Some(ItemRef {
        id,
        name: caps[2].to_string(),
    })
}

fn parse_timestamp(line: &str) -> Option<DateTime<Utc>> {
    let digits = TIMESTAMP_VAL.find(line)?;
    let secs = digits.as_str().parse::<i64>().ok()?;
    Utc.timestamp_opt(secs, 0).single()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quoted_val_captures_payload() {
        let caps = QUOTED_VAL.captures("\t\t\"Auslander\", -- [1]").unwrap();
        assert_eq!(&caps[1], "Auslander");
    }

    #[test]
    fn test_quoted_val_ignores_structural_line() {
        assert!(QUOTED_VAL.captures("\t\t}, -- [3]").is_none());
    }

    #[test]
    fn test_parse_item_from_link() {
        let line = "\t\t\"|cff9d9d9d|Hitem:19019::::::::60|h[Thunderfury]|h|r\", -- [8]";
        let item = parse_item(line).unwrap();
        assert_eq!(item.id, 19019);
        assert_eq!(item.name, "Thunderfury");
    }

    #[test]
    fn test_parse_item_rejects_plain_line() {
        assert!(parse_item("\t\t\"1612345678\", -- [8]").is_none());
    }

    #[test]
    fn test_parse_timestamp_finds_first_digit_run() {
        let ts = parse_timestamp("\t\t\"1612345678\", -- [9]").unwrap();
        assert_eq!(ts.timestamp(), 1_612_345_678);
    }

    #[test]
    fn test_parse_timestamp_requires_two_digits() {
        assert!(parse_timestamp("\t\t\"x\", -- a").is_none());
        // A single digit is not a timestamp; two or more are.
        assert!(parse_timestamp("only 7 here").is_none());
        assert!(parse_timestamp("now 77").is_some());
    }
}
