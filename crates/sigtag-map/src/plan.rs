//! Per-request pipeline: resolve every source, merge, classify, and hand the
//! result to a renderer.

use serde::{Deserialize, Serialize};
use tracing::{info, info_span, warn};

use sigtag_model::{SignalColumn, SignalSource, SignalTable, SignalValue};

use crate::classify::{Classification, ON_TOKENS, classify_signals};
use crate::diagnostics::Diagnostic;
use crate::merge::common_signals;
use crate::normalize::{DuplicateTag, TagMapping, normalize_metadata};
use crate::options::ResolveOptions;
use crate::resolve::{ResolvedTag, UnresolvedTag, resolve_tags};

/// Last observed state of a digital trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DioState {
    On,
    Off,
}

impl DioState {
    /// `On` when the sample reads as a high boolean token.
    pub fn from_value(value: &SignalValue) -> Self {
        if ON_TOKENS.contains(&value.to_token().as_str()) {
            Self::On
        } else {
            Self::Off
        }
    }
}

/// Maps a digital sample to 1.0 (high), 0.0 (low) or `None`.
pub fn dio_level(value: &SignalValue) -> Option<f64> {
    let token = value.to_token();
    if ON_TOKENS.contains(&token.as_str()) {
        Some(1.0)
    } else if ["OFF", "0", "0.0", "FALSE"].contains(&token.as_str()) {
        Some(0.0)
    } else {
        None
    }
}

/// One source's samples for a planned signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesTrace {
    pub label: String,
    pub points: Vec<Option<f64>>,
    /// Only set for discrete signals.
    pub final_state: Option<DioState>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedSignal {
    pub tag: String,
    pub description: Option<String>,
    pub traces: Vec<SeriesTrace>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlotPlan {
    /// Labels of the sources that contributed data, in input order.
    pub labels: Vec<String>,
    pub discrete: Vec<PlannedSignal>,
    pub continuous: Vec<PlannedSignal>,
}

/// Receives planned signals for presentation.
///
/// Implementations are called once per non-empty group.
pub trait SignalRenderer {
    type Output;
    type Error;

    fn render_discrete(
        &mut self,
        signals: &[PlannedSignal],
        labels: &[String],
    ) -> Result<Self::Output, Self::Error>;

    fn render_continuous(
        &mut self,
        signals: &[PlannedSignal],
        labels: &[String],
    ) -> Result<Self::Output, Self::Error>;
}

/// Rendered outputs; `None` where the group had no signals.
#[derive(Debug)]
pub struct Rendered<O> {
    pub discrete: Option<O>,
    pub continuous: Option<O>,
}

impl PlotPlan {
    pub fn signal_count(&self) -> usize {
        self.discrete.len() + self.continuous.len()
    }

    pub fn render<R: SignalRenderer>(
        &self,
        renderer: &mut R,
    ) -> Result<Rendered<R::Output>, R::Error> {
        let discrete = if self.discrete.is_empty() {
            None
        } else {
            Some(renderer.render_discrete(&self.discrete, &self.labels)?)
        };
        let continuous = if self.continuous.is_empty() {
            None
        } else {
            Some(renderer.render_continuous(&self.continuous, &self.labels)?)
        };
        Ok(Rendered {
            discrete,
            continuous,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlanOutcome {
    /// No source yielded any resolved column.
    NoData,
    NoCommonSignals,
    Ready(PlotPlan),
}

impl PlanOutcome {
    pub fn plan(&self) -> Option<&PlotPlan> {
        match self {
            Self::Ready(plan) => Some(plan),
            Self::NoData | Self::NoCommonSignals => None,
        }
    }
}

/// Resolution details for one source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceReport {
    pub label: String,
    pub resolved: Vec<ResolvedTag>,
    pub unresolved: Vec<UnresolvedTag>,
    pub duplicates: Vec<DuplicateTag>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    pub outcome: PlanOutcome,
    pub sources: Vec<SourceReport>,
    pub classification: Option<Classification>,
    /// Diagnostics not tied to a single source.
    pub diagnostics: Vec<Diagnostic>,
}

impl StepReport {
    /// Every diagnostic raised while building the step, sources first.
    pub fn all_diagnostics(&self) -> Vec<&Diagnostic> {
        let mut all: Vec<&Diagnostic> = self
            .sources
            .iter()
            .flat_map(|source| &source.diagnostics)
            .collect();
        if let Some(classification) = &self.classification {
            all.extend(&classification.diagnostics);
        }
        all.extend(&self.diagnostics);
        all
    }
}

struct Extraction {
    label: String,
    mapping: TagMapping,
    table: SignalTable,
}

/// Display label for the source at `index`; `DF1`, `DF2`, ... when unnamed.
pub fn source_label(source: &SignalSource, index: usize) -> String {
    if source.label.trim().is_empty() {
        format!("DF{}", index + 1)
    } else {
        source.label.clone()
    }
}

/// Runs resolution, merge and classification for one tag request.
///
/// Sources with an empty extraction are skipped. The time column, when a
/// source has it, travels with the extraction but is never classified.
pub fn build_plan<S: AsRef<str>>(
    sources: &[SignalSource],
    requested: &[S],
    time_column: Option<&str>,
    options: &ResolveOptions,
) -> StepReport {
    let span = info_span!("plan", sources = sources.len(), requested = requested.len());
    let _guard = span.enter();

    let mut reports = Vec::with_capacity(sources.len());
    let mut extractions = Vec::new();
    for (index, source) in sources.iter().enumerate() {
        let label = source_label(source, index);
        let normalized = normalize_metadata(&source.metadata, &source.table, options);
        let resolution = resolve_tags(&normalized.mapping, &source.table, requested, options);

        let mut diagnostics = normalized.diagnostics;
        diagnostics.extend(resolution.diagnostics);
        reports.push(SourceReport {
            label: label.clone(),
            resolved: resolution.resolved,
            unresolved: resolution.unresolved,
            duplicates: normalized.duplicates,
            diagnostics,
        });

        if resolution.extracted.is_empty() {
            warn!(source = %label, "no data extracted");
            continue;
        }
        let mut table = resolution.extracted;
        if let Some(time) = time_column
            && !table.contains(time)
            && let Some(column) = source.table.column(time)
        {
            table.push_column(column.clone());
        }
        extractions.push(Extraction {
            label,
            mapping: normalized.mapping,
            table,
        });
    }

    let Some(first) = extractions.first() else {
        info!("no source produced data");
        return StepReport {
            outcome: PlanOutcome::NoData,
            sources: reports,
            classification: None,
            diagnostics: Vec::new(),
        };
    };

    let tables: Vec<SignalTable> = extractions.iter().map(|e| e.table.clone()).collect();
    let merged = common_signals(&tables, time_column);
    if let Some(diagnostic) = merged.diagnostic(tables.len()) {
        return StepReport {
            outcome: PlanOutcome::NoCommonSignals,
            sources: reports,
            classification: None,
            diagnostics: vec![diagnostic],
        };
    }

    let order: Vec<&str> = requested.iter().map(|tag| tag.as_ref().trim()).collect();
    let classification = classify_signals(&first.table, merged.signals(), &order);
    let labels: Vec<String> = extractions.iter().map(|e| e.label.clone()).collect();
    let plan = PlotPlan {
        discrete: classification
            .discrete
            .iter()
            .map(|tag| planned_signal(tag, &first.mapping, &extractions, true))
            .collect(),
        continuous: classification
            .continuous
            .iter()
            .map(|tag| planned_signal(tag, &first.mapping, &extractions, false))
            .collect(),
        labels,
    };
    info!(
        discrete = plan.discrete.len(),
        continuous = plan.continuous.len(),
        "plan ready"
    );
    StepReport {
        outcome: PlanOutcome::Ready(plan),
        sources: reports,
        classification: Some(classification),
        diagnostics: Vec::new(),
    }
}

fn planned_signal(
    tag: &str,
    mapping: &TagMapping,
    extractions: &[Extraction],
    discrete: bool,
) -> PlannedSignal {
    let traces = extractions
        .iter()
        .filter_map(|extraction| {
            let column = extraction.table.column(tag)?;
            Some(trace(&extraction.label, column, discrete))
        })
        .collect();
    PlannedSignal {
        tag: tag.to_string(),
        description: mapping.description(tag).map(str::to_string),
        traces,
    }
}

fn trace(label: &str, column: &SignalColumn, discrete: bool) -> SeriesTrace {
    if discrete {
        SeriesTrace {
            label: label.to_string(),
            points: column.values.iter().map(dio_level).collect(),
            final_state: Some(
                column
                    .values
                    .last()
                    .map_or(DioState::Off, DioState::from_value),
            ),
        }
    } else {
        SeriesTrace {
            label: label.to_string(),
            points: column
                .values
                .iter()
                .map(|value| value.as_f64().filter(|v| !v.is_nan()))
                .collect(),
            final_state: None,
        }
    }
}
