//! Director's pre-analysis of a story outline.

use serde::{Deserialize, Serialize};

/// Short analysis report plus the estimated number of main characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(rename_all = "camelCase")]
pub struct StorySuggestion {
    /// Markdown report covering theme, pacing, style and shot allocation
    suggestion: String,
    /// Estimated number of main characters to design
    character_count: u32,
}

impl StorySuggestion {
    /// Create a suggestion.
    pub fn new(suggestion: impl Into<String>, character_count: u32) -> Self {
        Self {
            suggestion: suggestion.into(),
            character_count,
        }
    }
}
