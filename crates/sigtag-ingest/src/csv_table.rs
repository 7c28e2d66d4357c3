//! CSV sources with tag metadata stored in header rows.
//!
//! The default layout is three header rows (column names, tag names,
//! descriptions) followed by the samples. Metadata rows that start with
//! extra cells (row labels, an index entry) are realigned with
//! [`IngestOptions::metadata_offset`].

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use csv::ReaderBuilder;
use tracing::{debug, info_span};

use sigtag_model::{SignalColumn, SignalSource, SignalTable, SignalValue, TagMetadata};

use crate::error::{IngestError, Result};

/// Row indices (zero-based, after blank rows are dropped) of the header rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvLayout {
    pub header_row: usize,
    pub tag_row: usize,
    pub description_row: usize,
}

impl Default for CsvLayout {
    fn default() -> Self {
        Self {
            header_row: 0,
            tag_row: 1,
            description_row: 2,
        }
    }
}

impl CsvLayout {
    /// First row holding samples.
    pub fn data_start(&self) -> usize {
        self.header_row.max(self.tag_row).max(self.description_row) + 1
    }
}

#[derive(Debug, Clone, Default)]
pub struct IngestOptions {
    pub layout: CsvLayout,
    /// Leading metadata entries to drop before positional alignment.
    pub metadata_offset: usize,
    /// Display label; defaults to the file stem.
    pub label: Option<String>,
}

impl IngestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_layout(mut self, layout: CsvLayout) -> Self {
        self.layout = layout;
        self
    }

    #[must_use]
    pub fn with_metadata_offset(mut self, offset: usize) -> Self {
        self.metadata_offset = offset;
        self
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    trimmed.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Makes column names unique the way dataframe readers do: the second `X`
/// becomes `X.1`, the third `X.2`, skipping names already taken. Blank
/// names become `Unnamed: {index}`.
pub fn disambiguate_headers(headers: &[String]) -> Vec<String> {
    let mut used: BTreeSet<String> = BTreeSet::new();
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    headers
        .iter()
        .enumerate()
        .map(|(idx, raw)| {
            let base = if raw.is_empty() {
                format!("Unnamed: {idx}")
            } else {
                raw.clone()
            };
            let mut name = base.clone();
            if used.contains(&name) {
                let count = counts.entry(base.clone()).or_insert(0);
                loop {
                    *count += 1;
                    let candidate = format!("{base}.{count}");
                    if !used.contains(&candidate) {
                        name = candidate;
                        break;
                    }
                }
            }
            used.insert(name.clone());
            name
        })
        .collect()
}

/// Reads a CSV file into a [`SignalSource`].
///
/// Tag and description rows keep their own lengths so a misaligned file
/// reaches the normalizer as-is. Data rows are padded or truncated to the
/// header width.
pub fn read_signal_csv(path: &Path, options: &IngestOptions) -> Result<SignalSource> {
    let _span = info_span!("read_signal_csv", path = %path.display()).entered();
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|source| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

    let mut raw_rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| IngestError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        let row: Vec<String> = record.iter().map(str::to_string).collect();
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        raw_rows.push(row);
    }

    let layout = options.layout;
    let data_start = layout.data_start();
    if raw_rows.len() < data_start {
        return Err(IngestError::MissingHeaderRows {
            path: path.to_path_buf(),
            expected: data_start,
            found: raw_rows.len(),
        });
    }

    let headers: Vec<String> = raw_rows[layout.header_row]
        .iter()
        .map(|cell| normalize_header(cell))
        .collect();
    let headers = disambiguate_headers(&headers);
    let tag_names = raw_rows[layout.tag_row].clone();
    let descriptions = raw_rows[layout.description_row].clone();

    let mut values: Vec<Vec<SignalValue>> = vec![Vec::new(); headers.len()];
    for row in &raw_rows[data_start..] {
        for (idx, column) in values.iter_mut().enumerate() {
            let cell = row.get(idx).map_or("", String::as_str);
            column.push(SignalValue::parse_cell(cell));
        }
    }

    let table: SignalTable = headers
        .into_iter()
        .zip(values)
        .map(|(name, values)| SignalColumn::new(name, values))
        .collect();
    debug!(
        columns = table.width(),
        rows = table.height(),
        tags = tag_names.len(),
        descriptions = descriptions.len(),
        "loaded csv source"
    );

    let metadata =
        TagMetadata::new(tag_names, descriptions).skip_leading(options.metadata_offset);
    let label = options.label.clone().unwrap_or_else(|| {
        path.file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    });
    Ok(SignalSource::new(label, table, metadata))
}
