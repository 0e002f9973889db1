//! Core catalog logic for libcat.
//! This crate is the single source of truth for catalog invariants.

pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::book::{
    next_book_id, Book, BookId, BookStatus, SearchField, StatusParseError, UnknownFieldError,
};
pub use service::catalog_service::{CatalogError, CatalogListing, CatalogResult, CatalogService};
pub use store::json_file::DEFAULT_CATALOG_FILE;
pub use store::{CatalogStorage, JsonFileStorage, MemoryStorage, StoreError, StoreResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
