//! Domain primitives: PlayerName.

use serde::{Deserialize, Serialize};

/// A player name as used for standings/traffic correlation.
///
/// Guild exports occasionally contain decorated names with characters outside
/// the 7-bit ASCII range; those characters are dropped (not replaced) at
/// construction so both data sources key on the same spelling.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerName(String);

impl PlayerName {
    /// Build a PlayerName, stripping every non-ASCII character.
    pub fn sanitize(raw: &str) -> Self {
        PlayerName(raw.chars().filter(|c| c.is_ascii()).collect())
    }

    /// Get the sanitized name as a string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-sensitive prefix match, used by the player filter.
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.0.starts_with(prefix)
    }
}

impl std::fmt::Display for PlayerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
