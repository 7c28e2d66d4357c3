//! Tag-to-column resolution and signal classification.
//!
//! The flow for one request is:
//!
//! 1. [`normalize_metadata`] turns parallel tag/description lists into a
//!    [`TagMapping`] (first occurrence wins, lengths clipped).
//! 2. [`resolve_tags`] maps requested tags to table columns and extracts
//!    them, renamed to their tags, in request order.
//! 3. [`common_signals`] intersects extractions from several sources.
//! 4. [`classify_signals`] splits the result into discrete and continuous
//!    signals, ordered by the request.
//!
//! [`build_plan`] runs all four steps and packages the result for a
//! [`SignalRenderer`]. Every step reports problems as [`Diagnostic`]s
//! instead of failing.

#![deny(unsafe_code)]

pub mod classify;
pub mod diagnostics;
pub mod merge;
pub mod normalize;
pub mod options;
pub mod plan;
pub mod resolve;
pub mod summary;

pub use classify::{
    BOOLEAN_TOKENS, Classification, ClassifyError, SignalKind, classify_column, classify_signals,
    classify_values, distinct_values,
};
pub use diagnostics::{Diagnostic, DiagnosticKind, UnresolvedReason, count_kind};
pub use merge::{MergeOutcome, common_signals, intersect_ordered};
pub use normalize::{
    DuplicateTag, NormalizedMetadata, TagEntry, TagMapping, column_records, normalize_metadata,
};
pub use options::ResolveOptions;
pub use plan::{
    DioState, PlanOutcome, PlannedSignal, PlotPlan, Rendered, SeriesTrace, SignalRenderer,
    SourceReport, StepReport, build_plan, dio_level, source_label,
};
pub use resolve::{Resolution, ResolvedSignal, ResolvedTag, UnresolvedTag, reconcile, resolve_tags};
pub use summary::{MetadataSummary, summarize_metadata};
