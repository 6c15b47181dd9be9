//! Parsing one line of a weekly standings export.

use crate::domain::{PlayerName, StandingsSnapshot};
use chrono::NaiveDate;
use thiserror::Error;

/// The malformed-record condition: the line cannot become a snapshot.
///
/// Blank fields are not errors (they take documented defaults); only a
/// missing mandatory field or a non-blank, non-numeric payload is.
#[derive(Debug, Error)]
pub enum StandingsParseError {
    #[error("expected at least 3 comma-separated fields, found {found}")]
    TooFewFields { found: usize },
    #[error("non-numeric {field} field: {raw:?}")]
    BadNumber { field: &'static str, raw: String },
    #[error("unreadable record: {0}")]
    Csv(String),
}

/// Parse one export line into a snapshot dated `date`.
///
/// Field order: `name,class,role[,EP][,GP][,PR]`. Trailing fields are
/// optional; a field that is present but blank is treated as absent. EP
/// defaults to 0, GP to `base_gp`, PR to the ratio derived from the other
/// two.
pub fn parse_standings_line(
    line: &str,
    date: NaiveDate,
    base_gp: i64,
) -> Result<StandingsSnapshot, StandingsParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());

    let record = match reader.records().next() {
        Some(Ok(record)) => record,
        Some(Err(e)) => return Err(StandingsParseError::Csv(e.to_string())),
        None => return Err(StandingsParseError::TooFewFields { found: 0 }),
    };

    if record.len() < 3 {
        return Err(StandingsParseError::TooFewFields {
            found: record.len(),
        });
    }

    let name = PlayerName::sanitize(record.get(0).unwrap_or_default());
    let class = record.get(1).unwrap_or_default().to_string();
    let role = record.get(2).unwrap_or_default().to_string();

    let ep = match present(&record, 3) {
        None => 0,
        Some(raw) => parse_int(raw, "EP")?,
    };
    let gp = match present(&record, 4) {
        None => base_gp,
        Some(raw) => parse_int(raw, "GP")?,
    };
    let pr = match present(&record, 5) {
        None => StandingsSnapshot::derived_pr(ep, gp),
        Some(raw) => raw
            .parse::<f64>()
            .map_err(|_| StandingsParseError::BadNumber {
                field: "PR",
                raw: raw.to_string(),
            })?,
    };

    Ok(StandingsSnapshot {
        name,
        class,
        role,
        ep,
        gp,
        pr,
        date,
    })
}

/// A field counts as present only when it exists and is non-blank.
fn present<'a>(record: &'a csv::StringRecord, idx: usize) -> Option<&'a str> {
    record.get(idx).map(str::trim).filter(|s| !s.is_empty())
}

fn parse_int(raw: &str, field: &'static str) -> Result<i64, StandingsParseError> {
    raw.parse::<i64>().map_err(|_| StandingsParseError::BadNumber {
        field,
        raw: raw.to_string(),
    })
}
