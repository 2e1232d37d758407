//! Love Journey SDK - collection view models for relationship pages
//!
//! Every Love Journey page (calendar, check-ins, goals, journal, memory vault,
//! timeline, time capsule, private vault) follows the same shape: load a
//! remote collection, filter and summarize it, decorate each record with a
//! category icon and color, and edit records through an add/edit dialog.
//!
//! # Architecture
//!
//! - **Fetcher** (`CollectionLoader`): sequenced, cancellable loads from an
//!   injected `CollectionBackend`
//! - **View model** (`derive_view`): pure filter/sort/stats derivation
//! - **Presentation** (`CategoryTable`): closed category enums with a fallback
//! - **Dialog** (`ModalCrudController`): Closed → Open → Submitting state machine
//!
//! # Example
//!
//! ```rust,ignore
//! use love_journey_sdk::{CollectionLoader, FilterState, HttpBackend, JourneyConfig};
//! use love_journey_sdk::domains::memory::Memory;
//! use std::sync::Arc;
//!
//! let config = JourneyConfig::load("journey.toml")?.with_env_overrides()?;
//! let backend = Arc::new(HttpBackend::<Memory>::new(config.clone())?);
//! let loader = CollectionLoader::new(backend, (&config).into());
//!
//! let filter = FilterState::new().with_category("travel");
//! loader.fetch(filter.params()).await;
//! let (visible, stats) = loader.view(&filter).await;
//! ```

// Core traits for records and backends
pub mod traits;

// Fetcher, dialog controller and backends
pub mod client;

// Filtering, sorting, stats and paging
pub mod view;

// Category lookup tables
pub mod presentation;

// Page record types
pub mod domains;

// Configuration
pub mod config;

// Wire types
pub mod types;

// Date parsing and serde helpers
pub mod dates;

// Form validation
pub mod validation;

// Error types
pub mod error;

// Re-export core traits
pub use traits::{CollectionBackend, JourneyRecord};

// Re-export client types
pub use client::{
    CollectionLoader, FetchOutcome, FormMode, LoadStatus, LoaderConfig, MemoryBackend,
    ModalCrudController, ModalState, RecordForm, SubmitOutcome,
};

#[cfg(feature = "http")]
pub use client::HttpBackend;

// Re-export view types
pub use view::{
    derive_view, DateRange, DerivedStats, DerivedView, FilterParams, FilterState, SortField,
    SortOrder,
};

// Re-export presentation types
pub use presentation::{resolve_presentation, CategoryKey, CategoryTable, Presentation};

pub use config::JourneyConfig;
pub use types::ApiEnvelope;
pub use validation::{FieldError, ValidationErrors};

// Re-export error types
pub use error::{JourneyError, Result};
