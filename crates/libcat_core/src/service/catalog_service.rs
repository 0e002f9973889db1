//! Catalog use-case service.
//!
//! # Responsibility
//! - Provide add/delete/search/list/status entry points for callers.
//! - Validate caller vocabulary (status tokens, field names) before any I/O.
//!
//! # Invariants
//! - Every call reloads the catalog; nothing is cached between calls.
//! - Mutations save the whole catalog; `delete_book` saves even on no match.
//! - `update_status` never saves when the status is invalid or the ID is
//!   missing.
//! - Log events carry IDs, counts and field names only, never book text.

use crate::model::book::{
    next_book_id, Book, BookId, BookStatus, SearchField, StatusParseError, UnknownFieldError,
};
use crate::store::{CatalogStorage, StoreError};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Service error for catalog use-cases.
#[derive(Debug)]
pub enum CatalogError {
    /// Storage could not be read or written.
    Storage(StoreError),
    /// Status text outside `available` / `checked_out`.
    InvalidStatus(String),
    /// No book carries the requested ID.
    NotFound(BookId),
    /// Field name outside `title` / `author` / `year`.
    UnknownField(String),
    /// The catalog already holds `BookId::MAX`; no higher ID exists.
    IdExhausted,
}

impl CatalogError {
    /// Whether the failure came from caller input rather than storage.
    pub fn is_caller_error(&self) -> bool {
        !matches!(self, Self::Storage(_) | Self::IdExhausted)
    }
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::InvalidStatus(value) => {
                write!(f, "invalid status `{value}`; expected available|checked_out")
            }
            Self::NotFound(id) => write!(f, "book not found: {id}"),
            Self::UnknownField(value) => {
                write!(f, "unknown search field `{value}`; expected title|author|year")
            }
            Self::IdExhausted => write!(f, "no book id left above {}", BookId::MAX),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::InvalidStatus(_)
            | Self::NotFound(_)
            | Self::UnknownField(_)
            | Self::IdExhausted => None,
        }
    }
}

impl From<StoreError> for CatalogError {
    fn from(value: StoreError) -> Self {
        Self::Storage(value)
    }
}

impl From<StatusParseError> for CatalogError {
    fn from(value: StatusParseError) -> Self {
        Self::InvalidStatus(value.0)
    }
}

impl From<UnknownFieldError> for CatalogError {
    fn from(value: UnknownFieldError) -> Self {
        Self::UnknownField(value.0)
    }
}

/// Result of listing the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogListing {
    Empty,
    Books(Vec<Book>),
}

impl CatalogListing {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Returns the listed books; empty for `Empty`.
    pub fn into_books(self) -> Vec<Book> {
        match self {
            Self::Empty => Vec::new(),
            Self::Books(books) => books,
        }
    }
}

/// Use-case service over a catalog storage backend.
pub struct CatalogService<S: CatalogStorage> {
    storage: S,
}

impl<S: CatalogStorage> CatalogService<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Appends a new available book and returns it.
    ///
    /// # Contract
    /// - ID is `max(existing) + 1`, or `1` for an empty catalog.
    /// - Title/author/year are stored as given.
    ///
    /// # Errors
    /// - `IdExhausted` when the highest ID is `BookId::MAX`; nothing is saved.
    pub fn add_book(
        &self,
        title: impl Into<String>,
        author: impl Into<String>,
        year: impl Into<String>,
    ) -> CatalogResult<Book> {
        let mut books = self.storage.load()?;
        let Some(id) = next_book_id(&books) else {
            warn!("event=book_add module=service status=error error_code=id_exhausted");
            return Err(CatalogError::IdExhausted);
        };
        let book = Book::new(id, title, author, year);
        books.push(book.clone());
        self.storage.save(&books)?;

        info!(
            "event=book_add module=service status=ok book_id={} books={}",
            book.id,
            books.len()
        );
        Ok(book)
    }

    /// Removes every book with `id` and saves, whether or not one matched.
    pub fn delete_book(&self, id: BookId) -> CatalogResult<()> {
        let mut books = self.storage.load()?;
        let before = books.len();
        books.retain(|book| book.id != id);
        // Why: delete reports success for unknown IDs, so the write is unconditional.
        self.storage.save(&books)?;

        info!(
            "event=book_delete module=service status=ok book_id={} removed={}",
            id,
            before - books.len()
        );
        Ok(())
    }

    /// Searches a field named by caller text.
    ///
    /// # Errors
    /// - `UnknownField` when `field` is not `title`, `author` or `year`; no
    ///   storage access happens in that case.
    pub fn search_books(&self, query: &str, field: &str) -> CatalogResult<Vec<Book>> {
        let field = match field.parse::<SearchField>() {
            Ok(field) => field,
            Err(err) => {
                warn!("event=book_search module=service status=error error_code=unknown_field");
                return Err(err.into());
            }
        };
        self.search_by(query, field)
    }

    /// Returns books whose `field` contains `query`, ignoring case.
    ///
    /// Catalog order is preserved. An empty query matches every book.
    pub fn search_by(&self, query: &str, field: SearchField) -> CatalogResult<Vec<Book>> {
        let needle = query.to_lowercase();
        let hits = self
            .storage
            .load()?
            .into_iter()
            .filter(|book| field.value_of(book).to_lowercase().contains(&needle))
            .collect::<Vec<_>>();

        info!(
            "event=book_search module=service status=ok field={} hits={}",
            field.as_str(),
            hits.len()
        );
        Ok(hits)
    }

    /// Returns the full catalog in insertion order.
    pub fn list_books(&self) -> CatalogResult<CatalogListing> {
        let books = self.storage.load()?;
        if books.is_empty() {
            return Ok(CatalogListing::Empty);
        }
        Ok(CatalogListing::Books(books))
    }

    /// Sets the status of book `id` from caller text.
    ///
    /// # Errors
    /// - `InvalidStatus` before any storage access.
    /// - `NotFound` after a full scan; nothing is saved.
    pub fn update_status(&self, id: BookId, new_status: &str) -> CatalogResult<Book> {
        let status = match new_status.parse::<BookStatus>() {
            Ok(status) => status,
            Err(err) => {
                warn!(
                    "event=book_status module=service status=error book_id={} error_code=invalid_status",
                    id
                );
                return Err(err.into());
            }
        };
        self.set_status(id, status)
    }

    /// Sets the status of the first book with `id` and saves.
    ///
    /// Any status may replace any other; there is no transition order.
    pub fn set_status(&self, id: BookId, status: BookStatus) -> CatalogResult<Book> {
        let mut books = self.storage.load()?;
        let Some(book) = books.iter_mut().find(|book| book.id == id) else {
            warn!(
                "event=book_status module=service status=error book_id={} error_code=not_found",
                id
            );
            return Err(CatalogError::NotFound(id));
        };

        book.status = status;
        let updated = book.clone();
        self.storage.save(&books)?;

        info!(
            "event=book_status module=service status=ok book_id={} new_status={}",
            id,
            status.as_str()
        );
        Ok(updated)
    }
}
