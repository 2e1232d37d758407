//! Core traits for records and their backends
//!
//! These traits define the seams between page view models and the outside
//! world: what a record exposes to filtering/presentation, and what a backend
//! must offer for loading and writing a collection.

mod backend;
mod record;

pub use backend::CollectionBackend;
pub use record::JourneyRecord;
