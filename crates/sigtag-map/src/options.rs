//! Options for tag resolution.

use serde::{Deserialize, Serialize};

/// Placeholder some sources write into empty metadata cells.
pub const DEFAULT_PLACEHOLDER: &str = "nan";

/// Number of similar tags reported for an unknown tag.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 3;

/// Options shared by normalization and resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolveOptions {
    /// Maximum number of similar tags listed for an unresolved tag.
    pub suggestion_limit: usize,
    /// Case-sensitive token treated as an empty metadata cell.
    pub placeholder: String,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
        }
    }
}

impl ResolveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_suggestion_limit(mut self, limit: usize) -> Self {
        self.suggestion_limit = limit;
        self
    }

    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = placeholder.into();
        self
    }

    /// Trims `raw` and returns it unless it is empty or the placeholder.
    pub fn clean(&self, raw: &str) -> Option<String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == self.placeholder {
            None
        } else {
            Some(trimmed.to_string())
        }
    }
}
