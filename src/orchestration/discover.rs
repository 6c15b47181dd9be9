//! Discovery and ordering of standings snapshot files.

use chrono::NaiveDate;
use regex::Regex;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiscoverError {
    #[error("failed to read directory {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid filename marker {marker:?}: {source}")]
    BadMarker {
        marker: String,
        source: regex::Error,
    },
}

/// One discovered standings export, with its ordering id and snapshot date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandingsFile {
    pub path: PathBuf,
    pub id: u64,
    pub date: NaiveDate,
}

/// Find standings exports under `dir` whose filenames carry the marker token
/// followed by a decimal id, and somewhere after it an 8-digit `YYYYMMDD`
/// date. Results are sorted ascending by id, the order the session requires.
///
/// Files matching the marker but missing a usable date are skipped with a
/// warning rather than guessed at: a wrong date silently corrupts every
/// window computation downstream.
pub fn discover(dir: &Path, marker: &str) -> Result<Vec<StandingsFile>, DiscoverError> {
    let pattern = Regex::new(&format!(r"{}([0-9]+)\D*?([0-9]{{8}})", regex::escape(marker)))
        .map_err(|source| DiscoverError::BadMarker {
            marker: marker.to_string(),
            source,
        })?;

    let entries = std::fs::read_dir(dir).map_err(|source| DiscoverError::Io {
        path: dir.display().to_string(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| DiscoverError::Io {
            path: dir.display().to_string(),
            source,
        })?;
        let path = entry.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !name.contains(marker) {
            continue;
        }

        let Some(caps) = pattern.captures(name) else {
            tracing::warn!(file = %name, "standings file has no id/date after marker, skipping");
            continue;
        };
        let Ok(id) = caps[1].parse::<u64>() else {
            tracing::warn!(file = %name, "standings file id overflows, skipping");
            continue;
        };
        let Some(date) = NaiveDate::parse_from_str(&caps[2], "%Y%m%d").ok() else {
            tracing::warn!(file = %name, raw = &caps[2], "standings file date is not a calendar date, skipping");
            continue;
        };

        files.push(StandingsFile { path, id, date });
    }

    files.sort_by(|a, b| a.id.cmp(&b.id).then_with(|| a.path.cmp(&b.path)));
    Ok(files)
}
