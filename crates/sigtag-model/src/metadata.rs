//! Tag metadata supplied alongside a signal table.

use serde::{Deserialize, Serialize};

use crate::table::SignalTable;

/// Parallel tag-name and description lists.
///
/// Nominally aligned with the table's columns by position, but the lists
/// may disagree in length with each other and with the table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagMetadata {
    pub tag_names: Vec<String>,
    pub descriptions: Vec<String>,
}

impl TagMetadata {
    pub fn new(tag_names: Vec<String>, descriptions: Vec<String>) -> Self {
        Self {
            tag_names,
            descriptions,
        }
    }

    /// Drops `count` leading entries from both lists.
    ///
    /// Sources often describe the time/index column first; that entry has
    /// no counterpart among the data columns.
    #[must_use]
    pub fn skip_leading(mut self, count: usize) -> Self {
        let tags = count.min(self.tag_names.len());
        let descriptions = count.min(self.descriptions.len());
        self.tag_names.drain(..tags);
        self.descriptions.drain(..descriptions);
        self
    }
}

/// One table column together with its cleaned metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRecord {
    pub position: usize,
    /// Column name as it appears in the table.
    pub column: String,
    /// Cleaned tag; `None` when empty or the placeholder token.
    pub tag: Option<String>,
    /// Trimmed description; `None` when empty or the placeholder token.
    pub description: Option<String>,
}

/// A loaded data source: table, metadata and a display label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SignalSource {
    pub label: String,
    pub table: SignalTable,
    pub metadata: TagMetadata,
}

impl SignalSource {
    pub fn new(label: impl Into<String>, table: SignalTable, metadata: TagMetadata) -> Self {
        Self {
            label: label.into(),
            table,
            metadata,
        }
    }
}
