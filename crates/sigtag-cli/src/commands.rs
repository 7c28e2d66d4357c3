use std::time::Instant;

use anyhow::{Context, Result, bail};
use serde::Serialize;
use tracing::{info, info_span, warn};

use sigtag_ingest::{IngestOptions, StepConfig, load_step_config, read_signal_csv};
use sigtag_map::{
    MetadataSummary, PlanOutcome, ResolveOptions, StepReport, build_plan, summarize_metadata,
};
use sigtag_model::SignalSource;

use crate::cli::{InspectArgs, RunArgs, SourceArgs};

/// Outcome of one configured step.
#[derive(Debug, Clone, Serialize)]
pub struct StepResult {
    pub name: String,
    pub tags: Vec<String>,
    pub report: StepReport,
}

impl StepResult {
    pub fn has_plot(&self) -> bool {
        matches!(self.report.outcome, PlanOutcome::Ready(_))
    }
}

pub fn resolve_options(args: &SourceArgs) -> ResolveOptions {
    ResolveOptions::new().with_placeholder(args.placeholder.clone())
}

/// Loads every CSV source; `labels[i]` names the i-th file when given.
pub fn load_sources(args: &SourceArgs, labels: &[String]) -> Result<Vec<SignalSource>> {
    if labels.len() > args.files.len() {
        bail!(
            "{} labels given for {} files",
            labels.len(),
            args.files.len()
        );
    }
    args.files
        .iter()
        .enumerate()
        .map(|(index, path)| {
            let mut options = IngestOptions::new().with_metadata_offset(args.metadata_offset);
            if let Some(label) = labels.get(index) {
                options = options.with_label(label.clone());
            }
            read_signal_csv(path, &options).with_context(|| format!("load {}", path.display()))
        })
        .collect()
}

pub fn run_inspect(args: &InspectArgs) -> Result<Vec<MetadataSummary>> {
    let sources = load_sources(&args.sources, &[])?;
    let options = resolve_options(&args.sources);
    Ok(sources
        .iter()
        .map(|source| summarize_metadata(source, &options))
        .collect())
}

pub fn run_steps(args: &RunArgs) -> Result<Vec<StepResult>> {
    let mut config = load_step_config(&args.steps)
        .with_context(|| format!("load steps from {}", args.steps.display()))?;
    if let Some(time_column) = &args.time_column {
        config.time_column = Some(time_column.clone());
    }
    let sources = load_sources(&args.sources, &args.labels)?;
    let options = resolve_options(&args.sources).with_suggestion_limit(args.suggestion_limit);
    Ok(plan_steps(&config, &sources, &options))
}

/// Builds a plan for every step. A step without a plot is reported, never fatal.
pub fn plan_steps(
    config: &StepConfig,
    sources: &[SignalSource],
    options: &ResolveOptions,
) -> Vec<StepResult> {
    let start = Instant::now();
    let results: Vec<StepResult> = config
        .steps
        .iter()
        .enumerate()
        .map(|(index, step)| {
            let name = config.step_name(index);
            let span = info_span!("step", step = %name);
            let _guard = span.enter();
            let report = build_plan(sources, &step.tags, config.time_column.as_deref(), options);
            match &report.outcome {
                PlanOutcome::Ready(plan) => info!(signals = plan.signal_count(), "step planned"),
                PlanOutcome::NoData => warn!("no data for step"),
                PlanOutcome::NoCommonSignals => warn!("no common signals across sources"),
            }
            StepResult {
                name,
                tags: step.tags.clone(),
                report,
            }
        })
        .collect();
    info!(
        steps = results.len(),
        planned = results.iter().filter(|r| r.has_plot()).count(),
        duration_ms = start.elapsed().as_millis(),
        "steps complete"
    );
    results
}
