//! Derived view model
//!
//! Turns a loaded collection plus the page's filter state into what the page
//! renders: the visible records, aggregate stats, pages and sections.

mod derive;
mod filter;
mod paging;

pub use derive::{
    derive_view, derive_view_scoped, mean, percentage, sort_records, DerivedStats, DerivedView,
    StatsScope,
};
pub use filter::{DateRange, FilterParams, FilterState, SortField, SortOrder, ALL};
pub use paging::{group_by_month, group_by_year, paginate, Page, Section};
