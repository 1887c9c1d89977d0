//! Property-based tests for the join and deduplication steps

use std::collections::BTreeSet;

use polars::prelude::*;
use proptest::prelude::*;

use disaster_response_etl::combiner::clean_data;
use disaster_response_etl::loader::{column_names, inner_join};

fn id_frame(ids: &BTreeSet<i64>, extra: &str) -> DataFrame {
    let ids: Vec<i64> = ids.iter().copied().collect();
    let labels: Vec<String> = ids.iter().map(|id| format!("{extra}-{id}")).collect();
    DataFrame::new(vec![
        Column::new("id".into(), ids),
        Column::new(extra.into(), labels),
    ])
    .expect("Failed to build frame")
}

proptest! {
    #[test]
    fn join_cardinality_matches_shared_ids(
        left in prop::collection::btree_set(0i64..50, 0..30),
        right in prop::collection::btree_set(0i64..50, 0..30),
    ) {
        let joined = inner_join(&id_frame(&left, "message"), &id_frame(&right, "categories"), "id")
            .expect("Join failed");
        let shared: Vec<i64> = left.intersection(&right).copied().collect();
        prop_assert_eq!(joined.height(), shared.len());

        let ids: Vec<Option<i64>> = joined.column("id").expect("id column").i64().expect("integer ids").into_iter().collect();
        let expected: Vec<Option<i64>> = shared.into_iter().map(Some).collect();
        prop_assert_eq!(ids, expected);
    }

    #[test]
    fn repeated_rows_are_written_once(
        labels in prop::collection::vec((0u8..2, 0u8..2), 1..20),
        copies in 1usize..4,
    ) {
        let mut ids = Vec::new();
        let mut categories = Vec::new();
        for _ in 0..copies {
            for (i, (related, request)) in labels.iter().enumerate() {
                ids.push(i64::try_from(i).expect("index fits"));
                categories.push(format!("related-{related};request-{request}"));
            }
        }
        let joined = DataFrame::new(vec![
            Column::new("id".into(), ids),
            Column::new("categories".into(), categories),
        ])
        .expect("Failed to build frame");

        let cleaned = clean_data(&joined, "categories", ';').expect("Clean failed");
        prop_assert_eq!(cleaned.table.height(), labels.len());
        prop_assert_eq!(cleaned.duplicates_removed, labels.len() * (copies - 1));
        prop_assert_eq!(column_names(&cleaned.table), ["id", "related", "request"]);
    }
}
