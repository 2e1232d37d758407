//! Derived view model
//!
//! Pure functions from `(records, filter)` to the visible subset and its
//! aggregate statistics. Nothing here touches the network or mutates input,
//! so calling `derive_view` twice with the same arguments yields equal
//! results.

use crate::traits::JourneyRecord;
use crate::view::filter::{FilterState, SortField, SortOrder};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Which records the aggregate stats are computed over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatsScope {
    /// Only the records that pass the filter
    #[default]
    Visible,
    /// The whole loaded collection, regardless of filter
    All,
}

/// Aggregate numbers for a page header
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DerivedStats {
    /// Size of the loaded collection
    pub total: usize,
    /// Number of records that passed the filter
    pub visible: usize,
    /// Number of records the aggregates below were computed over
    pub counted: usize,
    pub by_category: BTreeMap<String, usize>,
    pub by_status: BTreeMap<String, usize>,
    /// Percentage share per category (0-100), empty when nothing was counted
    pub category_share: BTreeMap<String, f64>,
    /// Mean of each metric the record type declares; 0.0 for empty groups
    pub averages: BTreeMap<String, f64>,
}

impl DerivedStats {
    /// Average of a metric; 0.0 for unknown metrics or empty groups
    pub fn average(&self, metric: &str) -> f64 {
        self.averages.get(metric).copied().unwrap_or(0.0)
    }

    pub fn count_for_category(&self, key: &str) -> usize {
        self.by_category.get(key).copied().unwrap_or(0)
    }

    pub fn count_for_status(&self, key: &str) -> usize {
        self.by_status.get(key).copied().unwrap_or(0)
    }

    /// Percentage of counted records in the given status (0-100)
    pub fn status_percentage(&self, key: &str) -> f64 {
        percentage(self.count_for_status(key), self.counted)
    }
}

/// Visible subset plus stats
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedView<'a, R> {
    pub visible: Vec<&'a R>,
    pub stats: DerivedStats,
}

impl<'a, R> DerivedView<'a, R> {
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }

    /// Owned copies of the visible records
    pub fn to_owned_records(&self) -> Vec<R>
    where
        R: Clone,
    {
        self.visible.iter().map(|r| (*r).clone()).collect()
    }
}

/// Derive the visible subset and stats over it
pub fn derive_view<'a, R: JourneyRecord>(
    records: &'a [R],
    filter: &FilterState,
) -> DerivedView<'a, R> {
    derive_view_scoped(records, filter, StatsScope::Visible)
}

/// Derive the visible subset, computing stats over the chosen scope
pub fn derive_view_scoped<'a, R: JourneyRecord>(
    records: &'a [R],
    filter: &FilterState,
    scope: StatsScope,
) -> DerivedView<'a, R> {
    let mut visible: Vec<&R> = records.iter().filter(|r| filter.matches(*r)).collect();
    sort_records(&mut visible, filter.sort_field, filter.sort_order);

    let stats = match scope {
        StatsScope::Visible => compute_stats(records.len(), visible.len(), &visible),
        StatsScope::All => {
            let all: Vec<&R> = records.iter().collect();
            compute_stats(records.len(), visible.len(), &all)
        }
    };

    DerivedView { visible, stats }
}

/// Stable sort; equal keys keep their collection order in both directions
pub fn sort_records<R: JourneyRecord>(records: &mut [&R], field: SortField, order: SortOrder) {
    records.sort_by(|a, b| {
        let ordering = compare(*a, *b, field);
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

fn compare<R: JourneyRecord>(a: &R, b: &R, field: SortField) -> Ordering {
    match field {
        SortField::Date => a.date().cmp(&b.date()),
        SortField::Title => a.title().to_lowercase().cmp(&b.title().to_lowercase()),
    }
}

fn compute_stats<R: JourneyRecord>(total: usize, visible: usize, counted: &[&R]) -> DerivedStats {
    let mut by_category: BTreeMap<String, usize> = BTreeMap::new();
    let mut by_status: BTreeMap<String, usize> = BTreeMap::new();

    for record in counted {
        *by_category
            .entry(record.category_key().to_string())
            .or_default() += 1;
        if let Some(status) = record.status_key() {
            *by_status.entry(status.to_string()).or_default() += 1;
        }
    }

    let category_share = by_category
        .iter()
        .map(|(key, count)| (key.clone(), percentage(*count, counted.len())))
        .collect();

    let averages = R::METRICS
        .iter()
        .map(|name| {
            let values: Vec<f64> = counted
                .iter()
                .filter_map(|r| r.metric(name))
                .filter(|v| v.is_finite())
                .collect();
            (name.to_string(), mean(&values))
        })
        .collect();

    DerivedStats {
        total,
        visible,
        counted: counted.len(),
        by_category,
        by_status,
        category_share,
        averages,
    }
}

/// Arithmetic mean; 0.0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// `part / whole * 100`; 0.0 when `whole` is zero
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::parse_iso;
    use crate::domains::checkin::{CheckIn, Mood};
    use crate::domains::memory::{MediaKind, Memory, MemoryCategory};
    use crate::view::filter::DateRange;

    fn memory(id: &str, title: &str, category: MemoryCategory, date: &str) -> Memory {
        Memory {
            id: id.into(),
            title: title.into(),
            description: None,
            category: category.into(),
            media: MediaKind::Photo.into(),
            date_taken: parse_iso(date).unwrap(),
            location: None,
            tags: vec![],
            is_favorite: false,
            media_url: None,
        }
    }

    fn check_in(id: &str, date: &str, mood: Mood, mood_score: u8, connection_score: u8) -> CheckIn {
        CheckIn {
            id: id.into(),
            date: parse_iso(date).unwrap(),
            mood: mood.into(),
            mood_score,
            connection_score,
            gratitude: None,
            note: None,
            tags: vec![],
        }
    }

    fn sample() -> Vec<Memory> {
        let mut beach = memory("1", "Beach day", MemoryCategory::Travel, "2025-01-01");
        beach.tags = vec!["Summer".into()];
        beach.description = Some("Sunset at the pier".into());
        vec![
            beach,
            memory("2", "Dinner", MemoryCategory::Date, "2025-02-01"),
            memory("3", "Road trip", MemoryCategory::Travel, "2025-03-10"),
            memory("4", "Picnic", MemoryCategory::Date, "2025-02-01"),
        ]
    }

    fn ids<R: JourneyRecord>(view: &DerivedView<'_, R>) -> Vec<String> {
        view.visible
            .iter()
            .map(|r| r.record_id().to_string())
            .collect()
    }

    #[test]
    fn test_visible_is_exactly_matching_subset() {
        let records = sample();
        let filter = FilterState::new()
            .with_category("travel")
            .with_date_range(DateRange::until(parse_iso("2025-02-28").unwrap()));
        let view = derive_view(&records, &filter);

        assert_eq!(ids(&view), vec!["1"]);
        for record in &records {
            let shown = view.visible.iter().any(|r| r.id == record.id);
            assert_eq!(shown, filter.matches(record));
        }
    }

    #[test]
    fn test_search_matches_title_description_and_tags() {
        let records = sample();
        for term in ["BEACH", "pier", "summer"] {
            let view = derive_view(&records, &FilterState::new().with_search(term));
            assert_eq!(ids(&view), vec!["1"], "term {}", term);
        }
    }

    #[test]
    fn test_sort_desc_keeps_insertion_order_on_ties() {
        let records = sample();
        let view = derive_view(&records, &FilterState::new().with_order(SortOrder::Desc));
        assert_eq!(ids(&view), vec!["3", "2", "4", "1"]);

        let view = derive_view(&records, &FilterState::new().with_order(SortOrder::Asc));
        assert_eq!(ids(&view), vec!["1", "2", "4", "3"]);
    }

    #[test]
    fn test_sort_by_title() {
        let records = sample();
        let filter = FilterState::new().with_sort(SortField::Title, SortOrder::Asc);
        let view = derive_view(&records, &filter);
        assert_eq!(ids(&view), vec!["1", "2", "4", "3"]);
    }

    #[test]
    fn test_derive_is_idempotent() {
        let records = sample();
        let filter = FilterState::new().with_search("a");
        assert_eq!(derive_view(&records, &filter), derive_view(&records, &filter));
    }

    #[test]
    fn test_category_counts_and_share() {
        let records = sample();
        let view = derive_view(&records, &FilterState::new());

        assert_eq!(view.stats.total, 4);
        assert_eq!(view.stats.count_for_category("travel"), 2);
        assert_eq!(view.stats.category_share.get("date"), Some(&50.0));
    }

    #[test]
    fn test_scope_all_ignores_filter_for_stats() {
        let records = sample();
        let filter = FilterState::new().with_category("date");
        let view = derive_view_scoped(&records, &filter, StatsScope::All);

        assert_eq!(view.visible.len(), 2);
        assert_eq!(view.stats.visible, 2);
        assert_eq!(view.stats.counted, 4);
        assert_eq!(view.stats.count_for_category("travel"), 2);
    }

    #[test]
    fn test_averages_over_visible() {
        let records = vec![
            check_in("a", "2025-01-01", Mood::Happy, 8, 6),
            check_in("b", "2025-01-02", Mood::Sad, 4, 10),
        ];
        let view = derive_view(&records, &FilterState::new());
        assert_eq!(view.stats.average("mood_score"), 6.0);
        assert_eq!(view.stats.average("connection_score"), 8.0);

        let view = derive_view(&records, &FilterState::new().with_category("happy"));
        assert_eq!(view.stats.average("mood_score"), 8.0);
    }

    #[test]
    fn test_empty_collection_averages_are_zero() {
        let records: Vec<CheckIn> = vec![];
        let view = derive_view(&records, &FilterState::new());

        for metric in CheckIn::METRICS {
            assert_eq!(view.stats.averages.get(*metric), Some(&0.0));
        }
        assert!(view.stats.category_share.is_empty());
        assert_eq!(view.stats.status_percentage("anything"), 0.0);
    }

    #[test]
    fn test_filter_excluding_everything_gives_zero_averages() {
        let records = vec![check_in("a", "2025-01-01", Mood::Happy, 8, 6)];
        let view = derive_view(&records, &FilterState::new().with_category("sad"));
        assert!(view.is_empty());
        assert_eq!(view.stats.average("mood_score"), 0.0);
        assert!(!view.stats.average("mood_score").is_nan());
    }
}
