//! Paginated and sectioned presentation of visible records

use crate::traits::JourneyRecord;
use chrono::Datelike;
use serde::Serialize;

/// One page of items
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    /// 1-based page number actually served (clamped into range)
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
}

impl<'a, T> Page<'a, T> {
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

/// Slice `items` into pages of `per_page` and return page `page` (1-based).
///
/// Out-of-range page numbers are clamped; an empty input yields one empty
/// page, so `total_pages` is never zero.
pub fn paginate<T>(items: &[T], page: usize, per_page: usize) -> Page<'_, T> {
    let per_page = per_page.max(1);
    let total_items = items.len();
    let total_pages = total_items.div_ceil(per_page).max(1);
    let page = page.clamp(1, total_pages);

    let start = ((page - 1) * per_page).min(total_items);
    let end = (start + per_page).min(total_items);

    Page {
        items: &items[start..end],
        page,
        per_page,
        total_pages,
        total_items,
    }
}

/// A labelled group of records
#[derive(Debug, Clone, PartialEq)]
pub struct Section<'a, R> {
    /// Display label, e.g. "January 2025" or "2025"
    pub label: String,
    pub year: i32,
    /// Month number (1-12), `None` for year sections
    pub month: Option<u32>,
    pub items: Vec<&'a R>,
}

/// Group records by calendar month, keeping their current order.
///
/// Consecutive records from the same month form one section, so a sorted
/// input yields one section per month.
pub fn group_by_month<'a, R: JourneyRecord>(records: &[&'a R]) -> Vec<Section<'a, R>> {
    let mut sections: Vec<Section<'a, R>> = Vec::new();

    for record in records {
        let date = record.date();
        let (year, month) = (date.year(), date.month());
        match sections.last_mut() {
            Some(last) if last.year == year && last.month == Some(month) => {
                last.items.push(*record)
            }
            _ => sections.push(Section {
                label: date.format("%B %Y").to_string(),
                year,
                month: Some(month),
                items: vec![*record],
            }),
        }
    }

    sections
}

/// Group records by year, keeping their current order
pub fn group_by_year<'a, R: JourneyRecord>(records: &[&'a R]) -> Vec<Section<'a, R>> {
    let mut sections: Vec<Section<'a, R>> = Vec::new();

    for record in records {
        let year = record.date().year();
        match sections.last_mut() {
            Some(last) if last.year == year => last.items.push(*record),
            _ => sections.push(Section {
                label: year.to_string(),
                year,
                month: None,
                items: vec![*record],
            }),
        }
    }

    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::parse_iso;
    use crate::domains::milestone::{Milestone, MilestoneKind};

    fn milestone(id: &str, date: &str) -> Milestone {
        Milestone {
            id: id.into(),
            title: format!("Milestone {}", id),
            description: None,
            kind: MilestoneKind::Adventure.into(),
            date: parse_iso(date).unwrap(),
            location: None,
            tags: vec![],
            photo_url: None,
        }
    }

    #[test]
    fn test_paginate_middle_and_last_page() {
        let items: Vec<u32> = (1..=25).collect();

        let page = paginate(&items, 2, 10);
        assert_eq!(page.items, &items[10..20]);
        assert!(page.has_next());
        assert!(page.has_prev());

        let last = paginate(&items, 3, 10);
        assert_eq!(last.items, &[21, 22, 23, 24, 25]);
        assert_eq!(last.total_pages, 3);
        assert!(!last.has_next());
    }

    #[test]
    fn test_paginate_clamps_out_of_range() {
        let items: Vec<u32> = (1..=5).collect();
        assert_eq!(paginate(&items, 0, 2).page, 1);
        assert_eq!(paginate(&items, 99, 2).page, 3);
    }

    #[test]
    fn test_paginate_empty_has_one_page() {
        let items: Vec<u32> = vec![];
        let page = paginate(&items, 1, 0);
        assert_eq!(page.total_pages, 1);
        assert!(page.items.is_empty());
        assert!(!page.has_next() && !page.has_prev());
    }

    #[test]
    fn test_group_by_month_and_year() {
        let records = vec![
            milestone("a", "2024-12-24"),
            milestone("b", "2025-01-01"),
            milestone("c", "2025-01-20"),
            milestone("d", "2025-03-02"),
        ];
        let refs: Vec<&Milestone> = records.iter().collect();

        let months = group_by_month(&refs);
        let labels: Vec<&str> = months.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["December 2024", "January 2025", "March 2025"]);
        assert_eq!(months[1].items.len(), 2);

        let years = group_by_year(&refs);
        assert_eq!(years.len(), 2);
        assert_eq!(years[1].items.len(), 3);
        assert_eq!(years[1].label, "2025");
    }
}
