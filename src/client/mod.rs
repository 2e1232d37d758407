//! Page-side clients
//!
//! - `CollectionLoader`: fetches and caches one collection for a page
//! - `ModalCrudController`: the add/edit dialog state machine
//! - Backends: `HttpBackend` (REST) and `MemoryBackend` (mock mode)

mod controller;
#[cfg(feature = "http")]
mod http_backend;
mod loader;
mod memory_backend;

pub use controller::{
    FormMode, ModalCrudController, ModalState, RecordForm, SubmitOutcome, SubmitTicket,
};
#[cfg(feature = "http")]
pub use http_backend::{parse_envelope, parse_unit_envelope, HttpBackend};
pub use loader::{CollectionLoader, FetchOutcome, LoadStatus, LoaderConfig};
pub use memory_backend::MemoryBackend;
