//! Overview of a source's tag metadata.

use serde::{Deserialize, Serialize};

use sigtag_model::{ColumnRecord, SignalSource};

use crate::diagnostics::Diagnostic;
use crate::normalize::{DuplicateTag, normalize_metadata};
use crate::options::ResolveOptions;

const SAMPLE_RECORDS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataSummary {
    pub label: String,
    pub tag_names: usize,
    pub descriptions: usize,
    pub columns: usize,
    pub rows: usize,
    /// Positions usable after clipping.
    pub usable_positions: usize,
    /// Distinct cleaned tags in the mapping.
    pub mapped_tags: usize,
    /// Records without a usable tag.
    pub untagged: usize,
    pub duplicates: Vec<DuplicateTag>,
    /// First tagged records.
    pub samples: Vec<ColumnRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

pub fn summarize_metadata(source: &SignalSource, options: &ResolveOptions) -> MetadataSummary {
    let normalized = normalize_metadata(&source.metadata, &source.table, options);
    let untagged = normalized
        .records
        .iter()
        .filter(|record| record.tag.is_none())
        .count();
    MetadataSummary {
        label: source.label.clone(),
        tag_names: source.metadata.tag_names.len(),
        descriptions: source.metadata.descriptions.len(),
        columns: source.table.width(),
        rows: source.table.height(),
        usable_positions: normalized.records.len(),
        mapped_tags: normalized.mapping.len(),
        untagged,
        samples: normalized
            .records
            .iter()
            .filter(|record| record.tag.is_some())
            .take(SAMPLE_RECORDS)
            .cloned()
            .collect(),
        duplicates: normalized.duplicates,
        diagnostics: normalized.diagnostics,
    }
}
