//! Record trait shared by every page collection

use crate::presentation::CategoryTable;
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

/// Trait for domain records loaded from a backend collection.
///
/// Implement this for each page's record type to use it with the
/// `CollectionLoader`, `derive_view` and `ModalCrudController`.
///
/// # Example
///
/// ```rust,ignore
/// impl JourneyRecord for Memory {
///     type Draft = MemoryDraft;
///     type Category = MemoryCategory;
///
///     fn collection() -> &'static str { "memories" }
///     fn record_id(&self) -> &str { &self.id }
///     fn title(&self) -> &str { &self.title }
///     fn date(&self) -> DateTime<Utc> { self.date_taken }
///     fn category(&self) -> MemoryCategory { self.category.resolve() }
///     fn category_key(&self) -> &str { self.category.as_str() }
///     fn from_draft(id: String, draft: MemoryDraft) -> Self { /* ... */ }
/// }
/// ```
pub trait JourneyRecord: Clone + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// Create/update payload sent to the backend
    type Draft: Clone + Send + Sync + Serialize + 'static;

    /// Category lookup table used for filtering and presentation
    type Category: CategoryTable;

    /// Names of the numeric fields averaged in derived stats
    const METRICS: &'static [&'static str] = &[];

    /// Collection identifier; maps to `/api/{collection}` on the backend
    fn collection() -> &'static str;

    /// Opaque unique key assigned by the backend
    fn record_id(&self) -> &str;

    fn title(&self) -> &str;

    /// The designated date used for sorting and date-range filtering
    fn date(&self) -> DateTime<Utc>;

    fn category(&self) -> Self::Category;

    fn description(&self) -> Option<&str> {
        None
    }

    /// Secondary discriminator (e.g. media kind of a memory)
    fn type_key(&self) -> Option<&str> {
        None
    }

    fn tags(&self) -> &[String] {
        &[]
    }

    /// Free text matched by search besides the tags; title and description by default
    fn search_texts(&self) -> Vec<&str> {
        std::iter::once(self.title())
            .chain(self.description())
            .collect()
    }

    fn status_key(&self) -> Option<&str> {
        None
    }

    /// Value of a named metric, `None` when the record has no value for it
    fn metric(&self, name: &str) -> Option<f64> {
        let _ = name;
        None
    }

    /// Materialize a record from a draft (mock backends and optimistic updates)
    fn from_draft(id: String, draft: Self::Draft) -> Self;

    /// Category key as stored on the backend; may name a category this
    /// client does not know, in which case `category()` is the fallback
    fn category_key(&self) -> &str {
        self.category().key()
    }
}
