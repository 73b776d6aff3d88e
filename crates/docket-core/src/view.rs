//! Filter criteria and the derived display view.
//!
//! Filtering is deterministic and order-preserving: text search first, then
//! AND-combined equality filters, then the optional date sort. With no sort
//! requested, the result keeps the collection's insertion order — "select
//! all" semantics depend on the visible order matching the stored order.

use crate::model::record::{ParseEnumError, Record, Snapshot};
use crate::model::record_id::RecordId;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Direction for the optional date sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateSort {
    /// Most recent date first.
    Newest,
    /// Oldest date first.
    Oldest,
}

impl DateSort {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
        }
    }
}

impl fmt::Display for DateSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateSort {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" => Ok(Self::Newest),
            "oldest" => Ok(Self::Oldest),
            _ => Err(ParseEnumError {
                expected: "date sort",
                got: s.to_string(),
            }),
        }
    }
}

/// Independent display predicates, AND-combined.
///
/// An empty criteria value constrains nothing: every record is visible in
/// insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Case-insensitive substring match against the record's search fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,

    /// Field name → required value. Values compare against the snapshot
    /// (string fields against strings, so `"active"` matches a status).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub equals: BTreeMap<String, Value>,

    /// Ordering directive, not a filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_sort: Option<DateSort>,
}

impl FilterCriteria {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style text search.
    #[must_use]
    pub fn search(mut self, needle: impl Into<String>) -> Self {
        self.search = Some(needle.into());
        self
    }

    /// Builder-style equality filter on one field.
    #[must_use]
    pub fn equals(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.equals.insert(field.into(), value.into());
        self
    }

    /// Builder-style date sort.
    #[must_use]
    pub const fn sorted(mut self, sort: DateSort) -> Self {
        self.date_sort = Some(sort);
        self
    }

    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.search.is_none() && self.equals.is_empty() && self.date_sort.is_none()
    }

    /// Whether one snapshot passes the search and equality predicates.
    #[must_use]
    pub fn matches(&self, snapshot: &Snapshot, search_fields: &[&str]) -> bool {
        if let Some(needle) = &self.search {
            let needle = needle.trim().to_lowercase();
            if !needle.is_empty() {
                let hit = search_fields.iter().any(|field| {
                    snapshot
                        .get(*field)
                        .and_then(Value::as_str)
                        .is_some_and(|text| text.to_lowercase().contains(&needle))
                });
                if !hit {
                    return false;
                }
            }
        }

        self.equals
            .iter()
            .all(|(field, expected)| snapshot.get(field) == Some(expected))
    }
}

/// The derived display tuple consumed by the UI layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState<R> {
    /// Records passing the filter, in display order.
    pub records: Vec<R>,
    /// The selection set at derivation time, sorted.
    pub selected_ids: Vec<RecordId>,
    /// Size of the whole collection, ignoring filters.
    pub total_count: usize,
}

/// Indices of the records passing `criteria`, in display order.
///
/// Filtering preserves input order; the optional date sort is stable, so
/// records sharing a date keep their insertion order. Applying the same
/// criteria to the same records twice yields the same result.
#[must_use]
pub fn visible_indices<R: Record>(records: &[R], criteria: &FilterCriteria) -> Vec<usize> {
    let mut hits: Vec<(usize, Snapshot)> = records
        .iter()
        .enumerate()
        .map(|(i, r)| (i, r.snapshot()))
        .filter(|(_, snap)| criteria.matches(snap, R::SEARCH_FIELDS))
        .collect();

    if let Some(sort) = criteria.date_sort {
        let date_of = |snap: &Snapshot| -> String {
            snap.get(R::DATE_FIELD)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        match sort {
            DateSort::Oldest => hits.sort_by_key(|(_, snap)| date_of(snap)),
            DateSort::Newest => {
                hits.sort_by(|(_, a), (_, b)| date_of(b).cmp(&date_of(a)));
            }
        }
    }

    hits.into_iter().map(|(i, _)| i).collect()
}

#[cfg(test)]
mod tests {
    use super::{DateSort, FilterCriteria, visible_indices};
    use crate::model::award::{Award, AwardStatus, AwardType};
    use serde_json::json;
    use std::str::FromStr;

    fn award(code: &str, title: &str, status: AwardStatus, registered: &str) -> Award {
        Award {
            code: code.into(),
            title: title.into(),
            union_name: "Health Services Union".into(),
            award_type: AwardType::Mwb,
            status,
            registration_date: registered.into(),
            ..Award::default()
        }
    }

    fn fixture() -> Vec<Award> {
        vec![
            award("AW-001", "Teachers Award 2024", AwardStatus::Active, "2024-03-01"),
            award("AW-002", "Nurses Award 2023", AwardStatus::Draft, "2023-06-15"),
            award("AW-003", "Transport Agreement", AwardStatus::Active, "2024-01-20"),
        ]
    }

    #[test]
    fn unconstrained_criteria_keeps_insertion_order() {
        let records = fixture();
        let idx = visible_indices(&records, &FilterCriteria::new());
        assert_eq!(idx, vec![0, 1, 2]);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let records = fixture();
        let idx = visible_indices(&records, &FilterCriteria::new().search("teachers"));
        assert_eq!(idx, vec![0]);

        // Matches across any search field (code here).
        let idx = visible_indices(&records, &FilterCriteria::new().search("aw-00"));
        assert_eq!(idx, vec![0, 1, 2]);
    }

    #[test]
    fn equality_filters_and_combine() {
        let records = fixture();
        let criteria = FilterCriteria::new()
            .equals("status", json!("active"))
            .search("award");
        let idx = visible_indices(&records, &criteria);
        assert_eq!(idx, vec![0]);
    }

    #[test]
    fn date_sort_newest_and_oldest() {
        let records = fixture();
        let newest = visible_indices(&records, &FilterCriteria::new().sorted(DateSort::Newest));
        assert_eq!(newest, vec![0, 2, 1]);
        let oldest = visible_indices(&records, &FilterCriteria::new().sorted(DateSort::Oldest));
        assert_eq!(oldest, vec![1, 2, 0]);
    }

    #[test]
    fn date_sort_is_stable_for_equal_dates() {
        let records = vec![
            award("AW-001", "First", AwardStatus::Active, "2024-01-01"),
            award("AW-002", "Second", AwardStatus::Active, "2024-01-01"),
        ];
        let idx = visible_indices(&records, &FilterCriteria::new().sorted(DateSort::Newest));
        assert_eq!(idx, vec![0, 1]);
    }

    #[test]
    fn filtering_is_idempotent() {
        let records = fixture();
        let criteria = FilterCriteria::new()
            .equals("status", json!("active"))
            .sorted(DateSort::Oldest);
        let first = visible_indices(&records, &criteria);
        let second = visible_indices(&records, &criteria);
        assert_eq!(first, second);
    }

    #[test]
    fn blank_search_matches_everything() {
        let records = fixture();
        let idx = visible_indices(&records, &FilterCriteria::new().search("   "));
        assert_eq!(idx.len(), 3);
    }

    #[test]
    fn date_sort_parse_roundtrip() {
        for sort in [DateSort::Newest, DateSort::Oldest] {
            assert_eq!(DateSort::from_str(&sort.to_string()).unwrap(), sort);
        }
        assert!(DateSort::from_str("recent").is_err());
    }

    #[test]
    fn criteria_serde_roundtrip() {
        let criteria = FilterCriteria::new()
            .search("award")
            .equals("status", json!("active"))
            .sorted(DateSort::Newest);
        let json = serde_json::to_string(&criteria).expect("serialize");
        let back: FilterCriteria = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, criteria);
    }
}
