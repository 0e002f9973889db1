//! In-memory catalog storage.
//!
//! Used by tests and embedders that do not want a file on disk.

use super::{CatalogStorage, StoreResult};
use crate::model::book::Book;
use std::cell::{Cell, RefCell};

/// Catalog storage held in process memory.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    books: RefCell<Vec<Book>>,
    saves: Cell<usize>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates storage pre-populated with `books`, as if previously saved.
    pub fn with_books(books: Vec<Book>) -> Self {
        Self {
            books: RefCell::new(books),
            saves: Cell::new(0),
        }
    }

    /// Number of `save` calls observed so far.
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }

    /// Returns a copy of the stored catalog without counting as a load.
    pub fn snapshot(&self) -> Vec<Book> {
        self.books.borrow().clone()
    }
}

impl CatalogStorage for MemoryStorage {
    fn load(&self) -> StoreResult<Vec<Book>> {
        Ok(self.books.borrow().clone())
    }

    fn save(&self, books: &[Book]) -> StoreResult<()> {
        *self.books.borrow_mut() = books.to_vec();
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
