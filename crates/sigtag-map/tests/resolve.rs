use sigtag_map::{
    Diagnostic, DiagnosticKind, Resolution, ResolveOptions, ResolvedTag, UnresolvedReason,
    count_kind, normalize_metadata, reconcile, resolve_tags,
};
use sigtag_model::{SignalColumn, SignalTable, SignalValue, TagMetadata};

fn table(names: &[&str]) -> SignalTable {
    names
        .iter()
        .enumerate()
        .map(|(idx, name)| SignalColumn::from_values(*name, [idx as f64, idx as f64 + 0.5]))
        .collect()
}

fn metadata(tags: &[&str]) -> TagMetadata {
    TagMetadata::new(
        tags.iter().map(|t| (*t).to_string()).collect(),
        tags.iter().map(|t| format!("{t} description")).collect(),
    )
}

fn resolve(table: &SignalTable, tags: &[&str], requested: &[&str]) -> Resolution {
    let options = ResolveOptions::default();
    let normalized = normalize_metadata(&metadata(tags), table, &options);
    resolve_tags(&normalized.mapping, table, requested, &options)
}

#[test]
fn resolves_in_request_order_and_renames_to_tags() {
    let table = table(&["c0", "c1", "c2"]);
    let resolution = resolve(&table, &["A", "B", "C"], &["C", " A "]);

    assert_eq!(resolution.resolved_tags(), vec!["C", "A"]);
    assert_eq!(resolution.extracted.column_names(), vec!["C", "A"]);
    assert_eq!(
        resolution.resolved,
        vec![
            ResolvedTag {
                tag: "C".into(),
                column: "c2".into()
            },
            ResolvedTag {
                tag: "A".into(),
                column: "c0".into()
            },
        ]
    );
    assert_eq!(
        resolution.extracted.column("C").unwrap().values,
        vec![SignalValue::Number(2.0), SignalValue::Number(2.5)]
    );
    assert!(resolution.unresolved.is_empty());
}

#[test]
fn signals_expose_tag_column_and_values() {
    let table = table(&["c0", "c1"]);
    let resolution = resolve(&table, &["A", "B"], &["B"]);
    let signals: Vec<_> = resolution.signals().collect();
    assert_eq!(signals.len(), 1);
    assert_eq!(signals[0].tag, "B");
    assert_eq!(signals[0].column, "c1");
    assert_eq!(signals[0].values.len(), 2);
}

#[test]
fn repeated_tag_is_resolved_once() {
    let table = table(&["c0", "c1"]);
    let resolution = resolve(&table, &["A", "B"], &["A", "B", "A"]);

    assert_eq!(resolution.resolved_tags(), vec!["A", "B"]);
    assert_eq!(
        count_kind(&resolution.diagnostics, DiagnosticKind::DuplicateSelection),
        1
    );
    assert!(resolution.unresolved.is_empty());
}

#[test]
fn empty_request_is_empty_result() {
    let table = table(&["c0"]);
    let resolution = resolve(&table, &["A"], &[]);

    assert!(resolution.is_empty());
    assert!(resolution.resolved.is_empty());
    assert!(resolution.unresolved.is_empty());
    assert!(resolution.diagnostics.is_empty());
}

#[test]
fn nothing_resolved_reports_every_tag() {
    let table = table(&["c0"]);
    let resolution = resolve(&table, &["A"], &["X", "Y"]);

    assert!(resolution.is_empty());
    assert_eq!(resolution.unresolved_tags(), vec!["X", "Y"]);
}

#[test]
fn unknown_tag_gets_suggestions_but_is_not_selected() {
    let table = table(&["c0", "c1"]);
    let resolution = resolve(&table, &["FOO_BAR_2", "OTHER"], &["FOO_BAR"]);

    assert!(resolution.is_empty());
    assert_eq!(resolution.unresolved_tags(), vec!["FOO_BAR"]);
    assert_eq!(
        resolution.diagnostics,
        vec![Diagnostic::UnresolvedTag {
            tag: "FOO_BAR".into(),
            reason: UnresolvedReason::NotInMapping,
            suggestions: vec!["FOO_BAR_2".into()],
        }]
    );
}

#[test]
fn suggestions_are_capped() {
    let table = table(&["c0", "c1", "c2", "c3", "c4"]);
    let resolution = resolve(
        &table,
        &["PT_1", "PT_2", "PT_3", "PT_4", "PT_5"],
        &["pt"],
    );
    let Diagnostic::UnresolvedTag { suggestions, .. } = &resolution.diagnostics[0] else {
        panic!("expected unresolved tag diagnostic");
    };
    assert_eq!(suggestions, &vec!["PT_1", "PT_2", "PT_3"]);
}

#[test]
fn disambiguated_duplicate_column_is_labelled_with_tag() {
    let table = table(&["c0", "TEMP_01", "c2", "c3", "c4", "TEMP_01.1"]);
    let resolution = resolve(
        &table,
        &["A", "OLD_TEMP", "C", "D", "E", "TEMP_01"],
        &["TEMP_01"],
    );

    assert_eq!(resolution.resolved[0].column, "TEMP_01.1");
    assert_eq!(resolution.extracted.column_names(), vec!["TEMP_01"]);
    assert_eq!(
        resolution.extracted.column("TEMP_01").unwrap().values[0],
        SignalValue::Number(5.0)
    );
}

#[test]
fn position_beyond_table_is_unresolved() {
    // metadata longer than the table: the clipped mapping cannot point past
    // the end, so build the mapping against a wider table
    let wide = table(&["c0", "c1", "c2"]);
    let narrow = table(&["c0"]);
    let options = ResolveOptions::default();
    let normalized = normalize_metadata(&metadata(&["A", "B", "C"]), &wide, &options);
    let resolution = resolve_tags(&normalized.mapping, &narrow, &["A", "C"], &options);

    assert_eq!(resolution.resolved_tags(), vec!["A"]);
    assert_eq!(resolution.unresolved[0].tag, "C");
    assert_eq!(
        resolution.unresolved[0].reason,
        UnresolvedReason::PositionOutOfRange {
            position: 2,
            width: 1
        }
    );
}

#[test]
fn reconcile_substitutes_suffixed_column() {
    let table = table(&["PUMP.1", "FLOW"]);
    let mut resolution = Resolution::default();
    let reconciled = reconcile(
        &table,
        vec![
            ResolvedTag {
                tag: "P".into(),
                column: "PUMP".into(),
            },
            ResolvedTag {
                tag: "F".into(),
                column: "FLOW".into(),
            },
            ResolvedTag {
                tag: "V".into(),
                column: "VALVE".into(),
            },
        ],
        &mut resolution,
    );

    assert_eq!(
        reconciled,
        vec![
            ResolvedTag {
                tag: "P".into(),
                column: "PUMP.1".into()
            },
            ResolvedTag {
                tag: "F".into(),
                column: "FLOW".into()
            },
        ]
    );
    assert_eq!(
        resolution.diagnostics[0],
        Diagnostic::ColumnSubstituted {
            tag: "P".into(),
            expected: "PUMP".into(),
            actual: "PUMP.1".into(),
        }
    );
    assert_eq!(resolution.unresolved_tags(), vec!["V"]);
}

#[test]
fn ragged_table_yields_extraction_failure() {
    let table = SignalTable::new(vec![
        SignalColumn::from_values("c0", [1.0, 2.0]),
        SignalColumn::from_values("c1", [1.0]),
        SignalColumn::from_values("c1.1", [1.0, 2.0]),
    ]);
    let resolution = resolve(&table, &["A", "B", "B2"], &["A", "B"]);

    assert!(resolution.is_empty());
    assert!(resolution.resolved.is_empty());
    let failure = resolution
        .diagnostics
        .iter()
        .find(|d| d.kind() == DiagnosticKind::ExtractionFailure)
        .expect("extraction failure");
    let Diagnostic::ExtractionFailure {
        attempted,
        sample_columns,
        ambiguous_columns,
        ..
    } = failure
    else {
        unreachable!();
    };
    assert_eq!(attempted, &vec!["c0".to_string(), "c1".to_string()]);
    assert_eq!(sample_columns.len(), 3);
    assert_eq!(ambiguous_columns[0].0, "c1");
}

fn tentative(pairs: &[(&str, &str)]) -> Vec<ResolvedTag> {
    pairs
        .iter()
        .map(|(tag, column)| ResolvedTag {
            tag: (*tag).to_string(),
            column: (*column).to_string(),
        })
        .collect()
}

#[test]
fn reconcile_never_hands_out_a_substituted_column_again() {
    let table = table(&["PUMP.1", "FLOW"]);
    let mut resolution = Resolution::default();
    let reconciled = reconcile(
        &table,
        tentative(&[("P", "PUMP"), ("Q", "PUMP.1")]),
        &mut resolution,
    );

    assert_eq!(reconciled, tentative(&[("P", "PUMP.1")]));
    assert_eq!(
        resolution.diagnostics[1],
        Diagnostic::DuplicateSelection {
            tag: "Q".into(),
            column: "PUMP.1".into(),
        }
    );
}

#[test]
fn reconcile_skips_used_columns_when_substituting() {
    let table = table(&["PUMP.1", "PUMP.2", "FLOW"]);
    let mut resolution = Resolution::default();
    let reconciled = reconcile(
        &table,
        tentative(&[("P", "PUMP.1"), ("Q", "PUMP")]),
        &mut resolution,
    );

    assert_eq!(reconciled, tentative(&[("P", "PUMP.1"), ("Q", "PUMP.2")]));
    assert_eq!(
        resolution.diagnostics,
        vec![Diagnostic::ColumnSubstituted {
            tag: "Q".into(),
            expected: "PUMP".into(),
            actual: "PUMP.2".into(),
        }]
    );
}
