use docket_core::audit::{FieldComparators, diff_snapshots};
use docket_core::model::award::Award;
use docket_core::{ActorId, FilterCriteria, Patch, Record, RecordStore, Snapshot};
use proptest::prelude::*;
use serde_json::{Value, json};

/// A small pool of field names so generated snapshots overlap.
fn arb_field() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("title".to_string()),
        Just("code".to_string()),
        Just("employer".to_string()),
        Just("duration".to_string()),
        Just("gazette_number".to_string()),
    ]
}

/// Non-null scalar values, so value inequality is exactly change.
fn arb_value() -> impl Strategy<Value = Value> {
    prop_oneof![
        "[a-z]{0,8}".prop_map(Value::from),
        any::<i32>().prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
    ]
}

fn arb_snapshot() -> impl Strategy<Value = Snapshot> {
    proptest::collection::btree_map(arb_field(), arb_value(), 0..5)
}

fn draft(title: &str) -> Award {
    Award {
        code: "AW-P".into(),
        title: title.into(),
        union_name: "HSU".into(),
        ..Award::default()
    }
}

proptest! {
    /// The diff contains exactly the keys whose values differ, no others.
    #[test]
    fn diff_keys_are_exactly_the_differing_keys(
        old in arb_snapshot(),
        new in arb_snapshot(),
    ) {
        let changes = diff_snapshots(&old, &new, &FieldComparators::new());

        for (field, change) in &changes {
            prop_assert_ne!(old.get(field), new.get(field), "field {} did not differ", field);
            prop_assert_eq!(change.old.as_ref(), old.get(field));
            prop_assert_eq!(change.new.as_ref(), new.get(field));
        }
        for field in old.keys().chain(new.keys()) {
            if old.get(field) != new.get(field) {
                prop_assert!(changes.contains_key(field), "missing change for {}", field);
            }
        }
    }

    /// Diffing a snapshot against itself is always empty.
    #[test]
    fn diff_self_is_empty(snap in arb_snapshot()) {
        prop_assert!(diff_snapshots(&snap, &snap, &FieldComparators::new()).is_empty());
    }

    /// Patching named fields never disturbs unnamed ones.
    #[test]
    fn patch_leaves_unnamed_fields_untouched(
        employer in "[A-Za-z ]{1,20}",
        duration in "[0-9] years",
    ) {
        let mut store = RecordStore::new();
        let actor = ActorId::from("prop");
        let created = store
            .create(draft("Teachers Award 2024"), &actor)
            .expect("create");

        let patch = Patch::new()
            .set("employer", json!(employer))
            .set("duration", json!(duration.clone()));
        let updated = store.update(&created.id, &patch, &actor).expect("update");

        prop_assert_eq!(updated.employer, employer);
        prop_assert_eq!(updated.duration, duration);
        prop_assert_eq!(updated.title, created.title);
        prop_assert_eq!(updated.code, created.code);
        prop_assert_eq!(updated.id, created.id);
    }

    /// Filtering the same state twice gives the same view.
    #[test]
    fn filtering_is_idempotent(needle in "[a-z]{0,6}") {
        let mut store = RecordStore::new();
        let actor = ActorId::from("prop");
        for n in 0..6 {
            store
                .create(draft(&format!("Award number {n}")), &actor)
                .expect("create");
        }

        let criteria = FilterCriteria::new().search(needle);
        let first: Vec<_> = store.visible(&criteria).iter().map(|r| r.id.clone()).collect();
        let second: Vec<_> = store.visible(&criteria).iter().map(|r| r.id.clone()).collect();
        prop_assert_eq!(first, second);
    }
}

/// Ids minted in a tight loop are pairwise distinct, even within one
/// millisecond.
#[test]
fn rapid_creates_mint_distinct_ids() {
    let mut store = RecordStore::new();
    let actor = ActorId::from("loop");
    let mut seen = std::collections::BTreeSet::new();
    for n in 0..1_000 {
        let created = store
            .create(draft(&format!("Award {n}")), &actor)
            .expect("create");
        assert!(seen.insert(created.id.clone()), "duplicate id {}", created.id);
    }
    assert_eq!(store.len(), 1_000);
}

/// The store-level invariant behind the property above: a collection never
/// holds two records with one id.
#[test]
fn collection_ids_stay_unique_across_the_lifecycle() {
    let mut store = RecordStore::new();
    let actor = ActorId::from("loop");
    for n in 0..50 {
        store
            .create(draft(&format!("Award {n}")), &actor)
            .expect("create");
    }
    let ids: Vec<_> = store.records().iter().map(Record::id).collect();
    let unique: std::collections::BTreeSet<_> = ids.iter().collect();
    assert_eq!(ids.len(), unique.len());
}
