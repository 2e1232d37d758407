//! Filter state owned by a page
//!
//! `FilterState` is the full set of search/filter/sort choices on a page.
//! `FilterParams` is the subset the backend understands and is sent along
//! with list requests.

use crate::traits::JourneyRecord;
use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Key the UI uses for "no category/type filter"
pub const ALL: &str = "all";

/// Field used to order the visible records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Date,
    Title,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    /// Newest first
    #[default]
    Desc,
}

impl SortOrder {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "asc" | "ascending" | "oldest" => Some(Self::Asc),
            "desc" | "descending" | "newest" => Some(Self::Desc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Inclusive date range; open ends are unbounded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn between(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }

    pub fn since(from: DateTime<Utc>) -> Self {
        Self {
            from: Some(from),
            to: None,
        }
    }

    pub fn until(to: DateTime<Utc>) -> Self {
        Self {
            from: None,
            to: Some(to),
        }
    }

    /// The `days` days up to and including `now`
    pub fn last_days(now: DateTime<Utc>, days: i64) -> Self {
        Self::between(now - Duration::days(days), now)
    }

    /// The calendar month containing `date`
    pub fn month_of(date: DateTime<Utc>) -> Self {
        let start = Utc
            .with_ymd_and_hms(date.year(), date.month(), 1, 0, 0, 0)
            .single()
            .unwrap_or(date);
        let (next_year, next_month) = if date.month() == 12 {
            (date.year() + 1, 1)
        } else {
            (date.year(), date.month() + 1)
        };
        let end = Utc
            .with_ymd_and_hms(next_year, next_month, 1, 0, 0, 0)
            .single()
            .map(|next| next - Duration::nanoseconds(1))
            .unwrap_or(date);
        Self::between(start, end)
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    pub fn contains(&self, date: DateTime<Utc>) -> bool {
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }
}

/// Search/filter/sort choices of one page.
///
/// Absent predicates (`None`, empty strings or `"all"`) filter nothing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterState {
    pub category: Option<String>,
    pub record_type: Option<String>,
    pub search: String,
    pub sort_field: SortField,
    pub sort_order: SortOrder,
    pub date_range: DateRange,
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_type(mut self, record_type: impl Into<String>) -> Self {
        self.record_type = Some(record_type.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_sort(mut self, field: SortField, order: SortOrder) -> Self {
        self.sort_field = field;
        self.sort_order = order;
        self
    }

    pub fn with_order(mut self, order: SortOrder) -> Self {
        self.sort_order = order;
        self
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = range;
        self
    }

    /// Category predicate, if one is active
    pub fn active_category(&self) -> Option<&str> {
        active(self.category.as_deref())
    }

    /// Type predicate, if one is active
    pub fn active_type(&self) -> Option<&str> {
        active(self.record_type.as_deref())
    }

    /// Trimmed search text, if any
    pub fn active_search(&self) -> Option<&str> {
        let search = self.search.trim();
        (!search.is_empty()).then_some(search)
    }

    /// Whether any predicate would hide records
    pub fn is_filtering(&self) -> bool {
        self.active_category().is_some()
            || self.active_type().is_some()
            || self.active_search().is_some()
            || !self.date_range.is_unbounded()
    }

    /// Clear every predicate, keeping the sort
    pub fn reset(&mut self) {
        self.category = None;
        self.record_type = None;
        self.search.clear();
        self.date_range = DateRange::default();
    }

    /// Whether a record satisfies every active predicate
    pub fn matches<R: JourneyRecord>(&self, record: &R) -> bool {
        matches_predicates(
            record,
            self.active_category(),
            self.active_type(),
            self.active_search(),
            &self.date_range,
        )
    }

    /// The backend-relevant subset of this state
    pub fn params(&self) -> FilterParams {
        FilterParams {
            category: self.active_category().map(str::to_string),
            record_type: self.active_type().map(str::to_string),
            search: self.active_search().map(str::to_string),
            date_range: self.date_range,
        }
    }
}

/// Filter parameters sent to the backend with list requests
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterParams {
    pub category: Option<String>,
    pub record_type: Option<String>,
    pub search: Option<String>,
    pub date_range: DateRange,
}

impl FilterParams {
    /// Query string pairs, omitting inactive fields
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(ref category) = self.category {
            query.push(("category", category.clone()));
        }
        if let Some(ref record_type) = self.record_type {
            query.push(("type", record_type.clone()));
        }
        if let Some(ref search) = self.search {
            query.push(("search", search.clone()));
        }
        if let Some(from) = self.date_range.from {
            query.push(("from", from.to_rfc3339()));
        }
        if let Some(to) = self.date_range.to {
            query.push(("to", to.to_rfc3339()));
        }
        query
    }

    /// Server-side matching, as a mock backend would apply it
    pub fn matches<R: JourneyRecord>(&self, record: &R) -> bool {
        let search = self.search.as_deref().map(str::trim);
        matches_predicates(
            record,
            active(self.category.as_deref()),
            active(self.record_type.as_deref()),
            search.filter(|s| !s.is_empty()),
            &self.date_range,
        )
    }
}

fn active(value: Option<&str>) -> Option<&str> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case(ALL))
}

fn matches_predicates<R: JourneyRecord>(
    record: &R,
    category: Option<&str>,
    record_type: Option<&str>,
    search: Option<&str>,
    range: &DateRange,
) -> bool {
    if let Some(category) = category {
        if !record.category_key().eq_ignore_ascii_case(category) {
            return false;
        }
    }

    if let Some(record_type) = record_type {
        match record.type_key() {
            Some(key) if key.eq_ignore_ascii_case(record_type) => {}
            _ => return false,
        }
    }

    if let Some(search) = search {
        if !matches_search(record, search) {
            return false;
        }
    }

    range.contains(record.date())
}

fn matches_search<R: JourneyRecord>(record: &R, search: &str) -> bool {
    let needle = search.to_lowercase();
    record
        .search_texts()
        .iter()
        .any(|text| text.to_lowercase().contains(&needle))
        || record
            .tags()
            .iter()
            .any(|t| t.to_lowercase().contains(&needle))
}
