//! Metadata normalization: parallel tag/description lists to a tag mapping.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use sigtag_model::{ColumnRecord, SignalTable, TagMetadata};

use crate::diagnostics::Diagnostic;
use crate::options::ResolveOptions;

/// A tag seen at more than one position.
///
/// `positions` holds every position in order, the mapped (first) one included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateTag {
    pub tag: String,
    pub positions: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagEntry {
    pub tag: String,
    pub position: usize,
    pub description: Option<String>,
}

/// Cleaned tag to column-position mapping. First occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagMapping {
    entries: Vec<TagEntry>,
    index: BTreeMap<String, usize>,
}

impl TagMapping {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn position(&self, tag: &str) -> Option<usize> {
        self.entry(tag).map(|entry| entry.position)
    }

    pub fn entry(&self, tag: &str) -> Option<&TagEntry> {
        self.index.get(tag).map(|&idx| &self.entries[idx])
    }

    /// Description recorded for the first occurrence of `tag`.
    pub fn description(&self, tag: &str) -> Option<&str> {
        self.entry(tag).and_then(|entry| entry.description.as_deref())
    }

    /// Entries in metadata position order.
    pub fn entries(&self) -> &[TagEntry] {
        &self.entries
    }

    /// Known tags with a case-insensitive substring relation to `requested`.
    pub fn similar_tags(&self, requested: &str, limit: usize) -> Vec<String> {
        let needle = requested.to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.entries
            .iter()
            .filter(|entry| {
                let known = entry.tag.to_lowercase();
                known.contains(&needle) || needle.contains(&known)
            })
            .take(limit)
            .map(|entry| entry.tag.clone())
            .collect()
    }

    fn insert(&mut self, record: &ColumnRecord, tag: String) {
        self.index.insert(tag.clone(), self.entries.len());
        self.entries.push(TagEntry {
            tag,
            position: record.position,
            description: record.description.clone(),
        });
    }
}

/// Output of [`normalize_metadata`].
#[derive(Debug, Clone, Default)]
pub struct NormalizedMetadata {
    pub records: Vec<ColumnRecord>,
    pub mapping: TagMapping,
    pub duplicates: Vec<DuplicateTag>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Zips tag names, descriptions and column names into per-column records.
///
/// All three sources are clipped to their common length. A disagreement is
/// reported as [`Diagnostic::MetadataMismatch`] and is never fatal.
pub fn column_records(
    metadata: &TagMetadata,
    column_names: &[&str],
    options: &ResolveOptions,
) -> (Vec<ColumnRecord>, Option<Diagnostic>) {
    let tag_count = metadata.tag_names.len();
    let description_count = metadata.descriptions.len();
    let column_count = column_names.len();
    let safe_len = tag_count.min(description_count).min(column_count);

    let mismatch = if tag_count != description_count || tag_count != column_count {
        warn!(
            tag_names = tag_count,
            descriptions = description_count,
            columns = column_count,
            clipped_to = safe_len,
            "metadata size mismatch"
        );
        Some(Diagnostic::MetadataMismatch {
            tag_names: tag_count,
            descriptions: description_count,
            columns: column_count,
            clipped_to: safe_len,
        })
    } else {
        None
    };

    let records = metadata
        .tag_names
        .iter()
        .zip(&metadata.descriptions)
        .zip(column_names)
        .enumerate()
        .map(|(position, ((tag, description), column))| ColumnRecord {
            position,
            column: (*column).to_string(),
            tag: options.clean(tag),
            description: options.clean(description),
        })
        .collect();
    (records, mismatch)
}

/// Builds the tag mapping for `table` from its metadata lists.
///
/// Pure apart from `tracing` output; callers rebuild it per request.
pub fn normalize_metadata(
    metadata: &TagMetadata,
    table: &SignalTable,
    options: &ResolveOptions,
) -> NormalizedMetadata {
    let (records, mismatch) = column_records(metadata, &table.column_names(), options);
    let mut mapping = TagMapping::default();
    let mut duplicate_positions: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    let mut duplicate_order = Vec::new();

    for record in &records {
        let Some(tag) = record.tag.clone() else {
            continue;
        };
        if let Some(first) = mapping.position(&tag) {
            let positions = duplicate_positions.entry(tag.clone()).or_insert_with(|| {
                duplicate_order.push(tag.clone());
                vec![first]
            });
            positions.push(record.position);
        } else {
            mapping.insert(record, tag);
        }
    }

    let duplicates: Vec<DuplicateTag> = duplicate_order
        .into_iter()
        .map(|tag| DuplicateTag {
            positions: duplicate_positions.remove(&tag).unwrap_or_default(),
            tag,
        })
        .collect();
    debug!(
        mapped = mapping.len(),
        duplicates = duplicates.len(),
        "normalized tag metadata"
    );

    NormalizedMetadata {
        records,
        mapping,
        duplicates,
        diagnostics: mismatch.into_iter().collect(),
    }
}
