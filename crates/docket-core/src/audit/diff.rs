//! Field-level snapshot diffing.
//!
//! For every field in the union of the two snapshots' keys, unequal values
//! produce an `{old, new}` pair; equal fields never appear. JSON `null` is
//! treated as absent, so a create diffed against the empty baseline records
//! exactly the fields that were actually set.
//!
//! Values compare by `serde_json::Value` equality. Callers needing a
//! different rule for a specific field (a looser date comparison, an
//! order-insensitive list) register a per-field comparator at store
//! construction time.

use crate::audit::FieldChange;
use crate::model::record::Snapshot;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Equality predicate for one field's values. Returns `true` when the two
/// values should be considered unchanged.
pub type FieldComparator = fn(&Value, &Value) -> bool;

/// Per-field overrides of the default value-equality comparison.
#[derive(Debug, Clone, Default)]
pub struct FieldComparators(BTreeMap<String, FieldComparator>);

impl FieldComparators {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a comparator for `field`, replacing any previous one.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, comparator: FieldComparator) -> Self {
        self.0.insert(field.into(), comparator);
        self
    }

    fn values_equal(&self, field: &str, old: &Value, new: &Value) -> bool {
        self.0.get(field).map_or(old == new, |cmp| cmp(old, new))
    }
}

/// Compute the field-level change set between two snapshots.
///
/// The result contains exactly the fields whose values differ; a field
/// absent (or null) on one side appears with only the other side set.
#[must_use]
pub fn diff_snapshots(
    old: &Snapshot,
    new: &Snapshot,
    comparators: &FieldComparators,
) -> BTreeMap<String, FieldChange> {
    let fields: BTreeSet<&String> = old.keys().chain(new.keys()).collect();

    let mut changes = BTreeMap::new();
    for field in fields {
        let old_value = non_null(old.get(field));
        let new_value = non_null(new.get(field));

        let equal = match (old_value, new_value) {
            (Some(a), Some(b)) => comparators.values_equal(field, a, b),
            (None, None) => true,
            _ => false,
        };

        if !equal {
            changes.insert(
                field.clone(),
                FieldChange {
                    old: old_value.cloned(),
                    new: new_value.cloned(),
                },
            );
        }
    }
    changes
}

/// JSON null is "no value": a field set to null and a missing field diff
/// identically.
fn non_null(value: Option<&Value>) -> Option<&Value> {
    value.filter(|v| !v.is_null())
}

#[cfg(test)]
mod tests {
    use super::{FieldComparators, diff_snapshots};
    use crate::model::record::Snapshot;
    use serde_json::{Value, json};

    fn snap(pairs: &[(&str, Value)]) -> Snapshot {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn changed_fields_only() {
        let old = snap(&[("title", json!("Old")), ("status", json!("draft"))]);
        let new = snap(&[("title", json!("Old")), ("status", json!("active"))]);

        let changes = diff_snapshots(&old, &new, &FieldComparators::new());
        assert_eq!(changes.len(), 1);
        let change = &changes["status"];
        assert_eq!(change.old, Some(json!("draft")));
        assert_eq!(change.new, Some(json!("active")));
    }

    #[test]
    fn identical_snapshots_produce_no_changes() {
        let old = snap(&[("title", json!("Same")), ("documents", json!(["a", "b"]))]);
        assert!(diff_snapshots(&old, &old.clone(), &FieldComparators::new()).is_empty());
    }

    #[test]
    fn empty_baseline_records_every_set_field() {
        let new = snap(&[
            ("title", json!("Teachers Award 2024")),
            ("description", json!(null)),
        ]);
        let changes = diff_snapshots(&Snapshot::new(), &new, &FieldComparators::new());
        assert_eq!(changes.len(), 1, "null field must not be recorded");
        assert_eq!(changes["title"].old, None);
        assert_eq!(changes["title"].new, Some(json!("Teachers Award 2024")));
    }

    #[test]
    fn removal_records_old_side_only() {
        let old = snap(&[("title", json!("Gone"))]);
        let changes = diff_snapshots(&old, &Snapshot::new(), &FieldComparators::new());
        assert_eq!(changes["title"].old, Some(json!("Gone")));
        assert_eq!(changes["title"].new, None);
    }

    #[test]
    fn null_to_value_and_back() {
        let unset = snap(&[("description", json!(null))]);
        let set = snap(&[("description", json!("varied by consent"))]);

        let forward = diff_snapshots(&unset, &set, &FieldComparators::new());
        assert_eq!(forward["description"].old, None);
        assert_eq!(forward["description"].new, Some(json!("varied by consent")));

        let backward = diff_snapshots(&set, &unset, &FieldComparators::new());
        assert_eq!(backward["description"].old, Some(json!("varied by consent")));
        assert_eq!(backward["description"].new, None);
    }

    #[test]
    fn nested_values_compare_structurally() {
        let old = snap(&[("documents", json!(["a"]))]);
        let new = snap(&[("documents", json!(["a", "b"]))]);
        let changes = diff_snapshots(&old, &new, &FieldComparators::new());
        assert!(changes.contains_key("documents"));
    }

    #[test]
    fn per_field_comparator_overrides_equality() {
        fn length_only(a: &Value, b: &Value) -> bool {
            a.as_array().map(Vec::len) == b.as_array().map(Vec::len)
        }

        let comparators = FieldComparators::new().with("documents", length_only);
        let old = snap(&[("documents", json!(["a"]))]);
        let new = snap(&[("documents", json!(["b"]))]);

        // Same length: the override reports the field unchanged.
        assert!(diff_snapshots(&old, &new, &comparators).is_empty());
        // Other fields still use value equality.
        let old2 = snap(&[("title", json!("x"))]);
        let new2 = snap(&[("title", json!("y"))]);
        assert_eq!(diff_snapshots(&old2, &new2, &comparators).len(), 1);
    }
}
