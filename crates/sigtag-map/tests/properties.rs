use std::collections::BTreeSet;

use proptest::prelude::*;

use sigtag_map::{ResolveOptions, classify_signals, normalize_metadata, resolve_tags};
use sigtag_model::{SignalColumn, SignalTable, SignalValue, TagMetadata};

fn value_strategy() -> impl Strategy<Value = SignalValue> {
    prop_oneof![
        Just(SignalValue::Missing),
        any::<bool>().prop_map(SignalValue::Bool),
        (-5i64..5).prop_map(SignalValue::from),
        prop::sample::select(vec!["ON", "OFF", "A", "B", "1.0", "x"]).prop_map(SignalValue::from),
    ]
}

fn table_strategy() -> impl Strategy<Value = SignalTable> {
    (1usize..8, 1usize..6).prop_flat_map(|(width, height)| {
        prop::collection::vec(prop::collection::vec(value_strategy(), height), width).prop_map(
            |columns| {
                columns
                    .into_iter()
                    .enumerate()
                    .map(|(idx, values)| SignalColumn::new(format!("S{idx}"), values))
                    .collect::<SignalTable>()
            },
        )
    })
}

proptest! {
    #[test]
    fn classification_partitions_input(table in table_strategy()) {
        let names: Vec<&str> = table.column_names();
        let classification = classify_signals(&table, &names, &names);

        prop_assert_eq!(classification.len(), names.len());
        let discrete: BTreeSet<&String> = classification.discrete.iter().collect();
        let continuous: BTreeSet<&String> = classification.continuous.iter().collect();
        prop_assert!(discrete.is_disjoint(&continuous));
    }

    #[test]
    fn resolution_never_repeats_tags_or_columns(
        requested in prop::collection::vec(
            prop::sample::select(vec!["T0", "T1", "T2", "T3", "X"]),
            0..12,
        )
    ) {
        let table: SignalTable = (0..4)
            .map(|idx| SignalColumn::from_values(format!("c{idx}"), [idx as f64]))
            .collect();
        // the last column repeats T1, so T3 never resolves
        let metadata = TagMetadata::new(
            vec!["T0".into(), "T1".into(), "T2".into(), "T1".into()],
            vec![String::new(); 4],
        );
        let options = ResolveOptions::default();
        let normalized = normalize_metadata(&metadata, &table, &options);
        let resolution = resolve_tags(&normalized.mapping, &table, &requested, &options);

        let tags: BTreeSet<&str> = resolution.resolved.iter().map(|r| r.tag.as_str()).collect();
        let columns: BTreeSet<&str> =
            resolution.resolved.iter().map(|r| r.column.as_str()).collect();
        prop_assert_eq!(tags.len(), resolution.resolved.len());
        prop_assert_eq!(columns.len(), resolution.resolved.len());
        prop_assert_eq!(resolution.extracted.width(), resolution.resolved.len());
    }

    #[test]
    fn mismatched_metadata_never_panics(
        tags in prop::collection::vec("[A-C ]{0,3}", 0..10),
        descriptions in prop::collection::vec("[a-c]{0,3}", 0..10),
        width in 0usize..10,
    ) {
        let table: SignalTable = (0..width)
            .map(|idx| SignalColumn::from_values(format!("c{idx}"), [idx as f64]))
            .collect();
        let limit = tags.len().min(descriptions.len()).min(width);
        let normalized = normalize_metadata(
            &TagMetadata::new(tags.clone(), descriptions),
            &table,
            &ResolveOptions::default(),
        );
        prop_assert_eq!(normalized.records.len(), limit);
        let options = ResolveOptions::default();
        let resolution = resolve_tags(&normalized.mapping, &table, &tags, &options);
        prop_assert!(resolution.resolved.len() <= limit);
    }
}
