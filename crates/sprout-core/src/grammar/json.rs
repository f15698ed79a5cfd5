//! JSON form of a grammar.
//!
//! Rules serialize as a list in declaration order, so the entry rule and
//! `rule_order` survive a round trip.

use super::types::Grammar;

/// Error building or loading a grammar.
#[derive(Debug)]
pub enum GrammarError {
    DuplicateRule(String),
    DuplicateForeign(String),
    Json(serde_json::Error),
    Binary(postcard::Error),
}

impl std::fmt::Display for GrammarError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateRule(name) => write!(f, "rule `{name}` is already defined"),
            Self::DuplicateForeign(alias) => {
                write!(f, "foreign grammar `{alias}` is already registered")
            }
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Binary(e) => write!(f, "binary decode error: {e}"),
        }
    }
}

impl std::error::Error for GrammarError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json(e) => Some(e),
            Self::Binary(e) => Some(e),
            Self::DuplicateRule(_) | Self::DuplicateForeign(_) => None,
        }
    }
}

impl Grammar {
    pub fn from_json(json: &str) -> Result<Self, GrammarError> {
        serde_json::from_str(json).map_err(GrammarError::Json)
    }

    pub fn to_json(&self) -> Result<String, GrammarError> {
        serde_json::to_string_pretty(self).map_err(GrammarError::Json)
    }
}
