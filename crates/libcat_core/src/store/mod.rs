//! Catalog persistence contracts and implementations.
//!
//! # Responsibility
//! - Define whole-collection load/save as the only way to reach stored books.
//! - Keep file format details out of service orchestration.
//!
//! # Invariants
//! - `load` never fails because storage is absent or malformed; both collapse
//!   to an empty catalog.
//! - `save` overwrites the full catalog and surfaces every write failure.

use crate::model::book::Book;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStorage;
pub use memory::MemoryStorage;

pub type StoreResult<T> = Result<T, StoreError>;

/// Unrecoverable storage failure.
#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Encode(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "catalog storage I/O failed at `{}`: {source}", path.display())
            }
            Self::Encode(err) => write!(f, "failed to encode catalog: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Encode(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Encode(value)
    }
}

/// Whole-collection storage for the catalog.
///
/// Implementations hold no catalog state between calls that callers can
/// observe other than through `load`.
pub trait CatalogStorage {
    fn load(&self) -> StoreResult<Vec<Book>>;
    fn save(&self, books: &[Book]) -> StoreResult<()>;
}

impl<S: CatalogStorage + ?Sized> CatalogStorage for &S {
    fn load(&self) -> StoreResult<Vec<Book>> {
        (**self).load()
    }

    fn save(&self, books: &[Book]) -> StoreResult<()> {
        (**self).save(books)
    }
}
