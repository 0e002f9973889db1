//! Catalog domain model.
//!
//! # Responsibility
//! - Define the book record persisted by the catalog store.
//! - Own the closed vocabularies for lending status and searchable fields.
//!
//! # Invariants
//! - Every book is identified by a positive `BookId` assigned by the store.
//! - Status is always one of the two `BookStatus` values.

pub mod book;
