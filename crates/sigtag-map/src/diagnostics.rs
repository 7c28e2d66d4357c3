//! Structured diagnostics returned alongside resolution results.
//!
//! Nothing in this crate fails a whole request. Conditions a caller may care
//! about are collected as [`Diagnostic`] values and also emitted through
//! `tracing`, so callers can log, assert on, or ignore them.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Why a requested tag did not make it into the extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum UnresolvedReason {
    /// The tag is not present in the metadata mapping.
    NotInMapping,
    /// The mapping points past the table's last column.
    PositionOutOfRange { position: usize, width: usize },
    /// The expected column is gone and no substitute was found.
    ColumnMissing { column: String },
}

impl fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInMapping => write!(f, "not in metadata"),
            Self::PositionOutOfRange { position, width } => {
                write!(f, "position {position} out of range (width {width})")
            }
            Self::ColumnMissing { column } => write!(f, "column '{column}' not found"),
        }
    }
}

/// Discriminant of [`Diagnostic`], useful for filtering and counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    MetadataMismatch,
    UnresolvedTag,
    DuplicateSelection,
    ColumnSubstituted,
    ExtractionFailure,
    ClassificationFailure,
    EmptyIntersection,
}

impl DiagnosticKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MetadataMismatch => "metadata_mismatch",
            Self::UnresolvedTag => "unresolved_tag",
            Self::DuplicateSelection => "duplicate_selection",
            Self::ColumnSubstituted => "column_substituted",
            Self::ExtractionFailure => "extraction_failure",
            Self::ClassificationFailure => "classification_failure",
            Self::EmptyIntersection => "empty_intersection",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Tag, description and column counts disagree; positions were clipped.
    MetadataMismatch {
        tag_names: usize,
        descriptions: usize,
        columns: usize,
        clipped_to: usize,
    },
    UnresolvedTag {
        tag: String,
        reason: UnresolvedReason,
        /// Similar known tags. Informational only, never auto-selected.
        suggestions: Vec<String>,
    },
    /// A second requested tag pointed at an already selected column.
    DuplicateSelection { tag: String, column: String },
    /// The expected column was absent and a renamed one was used instead.
    ColumnSubstituted {
        tag: String,
        expected: String,
        actual: String,
    },
    ExtractionFailure {
        message: String,
        attempted: Vec<String>,
        /// Leading table columns, for comparison with `attempted`.
        sample_columns: Vec<String>,
        /// Column names sharing a base name before the first `.`.
        ambiguous_columns: Vec<(String, Vec<String>)>,
    },
    ClassificationFailure { signal: String, message: String },
    EmptyIntersection { sources: usize },
}

impl Diagnostic {
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Self::MetadataMismatch { .. } => DiagnosticKind::MetadataMismatch,
            Self::UnresolvedTag { .. } => DiagnosticKind::UnresolvedTag,
            Self::DuplicateSelection { .. } => DiagnosticKind::DuplicateSelection,
            Self::ColumnSubstituted { .. } => DiagnosticKind::ColumnSubstituted,
            Self::ExtractionFailure { .. } => DiagnosticKind::ExtractionFailure,
            Self::ClassificationFailure { .. } => DiagnosticKind::ClassificationFailure,
            Self::EmptyIntersection { .. } => DiagnosticKind::EmptyIntersection,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MetadataMismatch {
                tag_names,
                descriptions,
                columns,
                clipped_to,
            } => write!(
                f,
                "metadata size mismatch: {tag_names} tags, {descriptions} descriptions, \
                 {columns} columns; using first {clipped_to}"
            ),
            Self::UnresolvedTag {
                tag,
                reason,
                suggestions,
            } => {
                write!(f, "unresolved tag '{tag}': {reason}")?;
                if !suggestions.is_empty() {
                    write!(f, " (similar: {})", suggestions.join(", "))?;
                }
                Ok(())
            }
            Self::DuplicateSelection { tag, column } => {
                write!(f, "skipped '{tag}': column '{column}' already selected")
            }
            Self::ColumnSubstituted {
                tag,
                expected,
                actual,
            } => write!(f, "'{tag}': column '{expected}' replaced by '{actual}'"),
            Self::ExtractionFailure {
                message, attempted, ..
            } => write!(
                f,
                "extraction failed for {} column(s): {message}",
                attempted.len()
            ),
            Self::ClassificationFailure { signal, message } => {
                write!(f, "could not classify '{signal}': {message}")
            }
            Self::EmptyIntersection { sources } => {
                write!(f, "no common signals across {sources} source(s)")
            }
        }
    }
}

/// Counts diagnostics of one kind.
pub fn count_kind(diagnostics: &[Diagnostic], kind: DiagnosticKind) -> usize {
    diagnostics.iter().filter(|d| d.kind() == kind).count()
}
