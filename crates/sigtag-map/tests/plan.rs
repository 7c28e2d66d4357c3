use sigtag_map::{
    DiagnosticKind, DioState, MergeOutcome, PlanOutcome, PlannedSignal, ResolveOptions,
    SignalRenderer, build_plan, common_signals, dio_level, intersect_ordered,
};
use sigtag_model::{SignalColumn, SignalSource, SignalTable, SignalValue, TagMetadata};

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

fn plant_source(label: &str) -> SignalSource {
    let table = SignalTable::new(vec![
        SignalColumn::from_values("Date", ["t0", "t1", "t2"]),
        SignalColumn::from_values("Pump running", ["ON", "OFF", "ON"]),
        SignalColumn::from_values("Tank temp", [20.5, 21.0, 22.5]),
        SignalColumn::from_values("Valve", [1.0, 0.0, 0.0]),
    ]);
    let metadata = TagMetadata::new(
        strings(&["", "PUMP_01", "TEMP_01", "VLV_01"]),
        strings(&["", "Pump running", "Tank temperature", "Inlet valve"]),
    );
    SignalSource::new(label, table, metadata)
}

#[test]
fn merge_keeps_first_source_order() {
    let a = SignalTable::new(vec![
        SignalColumn::from_values("X", [1.0]),
        SignalColumn::from_values("Y", [1.0]),
        SignalColumn::from_values("Z", [1.0]),
    ]);
    let b = SignalTable::new(vec![
        SignalColumn::from_values("Z", [1.0]),
        SignalColumn::from_values("Y", [1.0]),
        SignalColumn::from_values("W", [1.0]),
    ]);
    assert_eq!(
        common_signals(&[a, b], None),
        MergeOutcome::Common(vec!["Y".into(), "Z".into()])
    );
}

#[test]
fn merge_excludes_time_column() {
    let sets = vec![vec!["Date", "A"], vec!["A", "Date"]];
    assert_eq!(intersect_ordered(&sets, Some("Date")), vec!["A".to_string()]);
    let only_time = vec![vec!["Date"], vec!["Date"]];
    assert!(intersect_ordered(&only_time, Some("Date")).is_empty());
}

#[test]
fn merge_of_nothing_is_empty() {
    assert_eq!(common_signals(&[], None), MergeOutcome::NoCommonSignals);
}

#[test]
fn dio_levels_map_boolean_tokens() {
    assert_eq!(dio_level(&SignalValue::from("ON")), Some(1.0));
    assert_eq!(dio_level(&SignalValue::from("off")), Some(0.0));
    assert_eq!(dio_level(&SignalValue::Bool(true)), Some(1.0));
    assert_eq!(dio_level(&SignalValue::Number(0.0)), Some(0.0));
    assert_eq!(dio_level(&SignalValue::Missing), None);
    assert_eq!(DioState::from_value(&SignalValue::Missing), DioState::Off);
}

#[test]
fn single_source_plan_classifies_in_request_order() {
    let sources = vec![plant_source("2024-08")];
    let report = build_plan(
        &sources,
        &["VLV_01", "TEMP_01", "PUMP_01", "NOPE"],
        Some("Date"),
        &ResolveOptions::default(),
    );

    let PlanOutcome::Ready(plan) = &report.outcome else {
        panic!("expected a plan, got {:?}", report.outcome);
    };
    let discrete: Vec<&str> = plan.discrete.iter().map(|s| s.tag.as_str()).collect();
    let continuous: Vec<&str> = plan.continuous.iter().map(|s| s.tag.as_str()).collect();
    assert_eq!(discrete, vec!["VLV_01", "PUMP_01"]);
    assert_eq!(continuous, vec!["TEMP_01"]);
    assert_eq!(plan.labels, vec!["2024-08"]);

    let pump = &plan.discrete[1];
    assert_eq!(pump.description.as_deref(), Some("Pump running"));
    assert_eq!(pump.traces[0].points, vec![Some(1.0), Some(0.0), Some(1.0)]);
    assert_eq!(pump.traces[0].final_state, Some(DioState::On));
    assert_eq!(plan.discrete[0].traces[0].final_state, Some(DioState::Off));
    assert_eq!(
        plan.continuous[0].traces[0].points,
        vec![Some(20.5), Some(21.0), Some(22.5)]
    );

    assert_eq!(report.sources[0].unresolved[0].tag, "NOPE");
    let kinds: Vec<DiagnosticKind> = report.all_diagnostics().iter().map(|d| d.kind()).collect();
    assert_eq!(kinds, vec![DiagnosticKind::UnresolvedTag]);
}

#[test]
fn multi_source_plan_intersects_and_labels_sources() {
    let mut second = plant_source("");
    second.metadata.tag_names[2] = "TEMP_99".to_string();
    let sources = vec![plant_source("A"), second];

    let report = build_plan(
        &sources,
        &["PUMP_01", "TEMP_01"],
        Some("Date"),
        &ResolveOptions::default(),
    );

    let plan = report.outcome.plan().expect("plan");
    assert_eq!(plan.labels, vec!["A", "DF2"]);
    assert_eq!(plan.signal_count(), 1);
    assert_eq!(plan.discrete[0].tag, "PUMP_01");
    assert_eq!(plan.discrete[0].traces.len(), 2);
    assert!(plan.continuous.is_empty());
}

#[test]
fn disjoint_sources_have_no_common_signals() {
    let mut second = plant_source("B");
    second.metadata.tag_names = strings(&["", "P2", "T2", "V2"]);
    let sources = vec![plant_source("A"), second];

    let report = build_plan(&sources, &["PUMP_01", "P2"], None, &ResolveOptions::default());

    assert_eq!(report.outcome, PlanOutcome::NoCommonSignals);
    assert!(report.classification.is_none());
    assert!(
        report
            .all_diagnostics()
            .iter()
            .any(|d| d.kind() == DiagnosticKind::EmptyIntersection)
    );
}

#[test]
fn unresolvable_request_yields_no_data() {
    let sources = vec![plant_source("A")];
    let report = build_plan(&sources, &["NOPE"], Some("Date"), &ResolveOptions::default());
    assert_eq!(report.outcome, PlanOutcome::NoData);
}

#[derive(Default)]
struct RecordingRenderer {
    calls: Vec<(String, Vec<String>)>,
}

impl SignalRenderer for RecordingRenderer {
    type Output = usize;
    type Error = std::convert::Infallible;

    fn render_discrete(
        &mut self,
        signals: &[PlannedSignal],
        _labels: &[String],
    ) -> Result<usize, Self::Error> {
        self.calls.push((
            "discrete".into(),
            signals.iter().map(|s| s.tag.clone()).collect(),
        ));
        Ok(signals.len())
    }

    fn render_continuous(
        &mut self,
        signals: &[PlannedSignal],
        _labels: &[String],
    ) -> Result<usize, Self::Error> {
        self.calls.push((
            "continuous".into(),
            signals.iter().map(|s| s.tag.clone()).collect(),
        ));
        Ok(signals.len())
    }
}

#[test]
fn renderer_is_skipped_for_empty_groups() {
    let sources = vec![plant_source("A")];
    let report = build_plan(&sources, &["PUMP_01"], Some("Date"), &ResolveOptions::default());
    let plan = report.outcome.plan().expect("plan");

    let mut renderer = RecordingRenderer::default();
    let rendered = plan.render(&mut renderer).expect("render");

    assert_eq!(rendered.discrete, Some(1));
    assert_eq!(rendered.continuous, None);
    assert_eq!(
        renderer.calls,
        vec![("discrete".to_string(), vec!["PUMP_01".to_string()])]
    );
}
