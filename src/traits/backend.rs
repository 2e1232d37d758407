//! Backend collaborator trait

use crate::error::{JourneyError, Result};
use crate::traits::JourneyRecord;
use crate::view::FilterParams;
use async_trait::async_trait;

/// Conventional REST interface offered per domain collection.
///
/// Pages never talk to a global backend: one implementation is constructed at
/// application start and handed to each `CollectionLoader`. Implementations
/// report expected failures (network, `success: false`, malformed bodies) as
/// `Err`, never by panicking.
#[async_trait]
pub trait CollectionBackend<R: JourneyRecord>: Send + Sync {
    /// List records matching the backend-relevant filters
    async fn list(&self, filters: &FilterParams) -> Result<Vec<R>>;

    /// Create a record from a draft
    async fn create(&self, draft: &R::Draft) -> Result<R>;

    /// Replace the record `id` with the draft's values
    async fn update(&self, id: &str, draft: &R::Draft) -> Result<R>;

    /// Delete a record.
    ///
    /// Not every collection exposes deletion; the default reports
    /// `Unsupported`.
    async fn delete(&self, id: &str) -> Result<()> {
        let _ = id;
        Err(JourneyError::Unsupported(format!("delete on {}", R::collection())))
    }
}
