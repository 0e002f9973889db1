//! Book record and its closed vocabularies.
//!
//! # Responsibility
//! - Define the canonical book shape and its wire names.
//! - Parse caller text into `BookStatus` / `SearchField` without dynamic lookup.
//! - Assign IDs with high-water-mark semantics.
//!
//! # Invariants
//! - IDs are never reused: the next ID is `max(existing) + 1`.
//! - No status other than `available` / `checked_out` can be constructed.

use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Store-assigned book identifier.
pub type BookId = u64;

/// Lending state of a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookStatus {
    /// On the shelf and lendable.
    Available,
    /// Lent out.
    CheckedOut,
}

impl BookStatus {
    /// Returns the persisted token for this status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::CheckedOut => "checked_out",
        }
    }
}

impl Display for BookStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller supplied a status token outside the allowed set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusParseError(pub String);

impl Display for StatusParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid status `{}`; expected available|checked_out",
            self.0
        )
    }
}

impl Error for StatusParseError {}

impl FromStr for BookStatus {
    type Err = StatusParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "available" => Ok(Self::Available),
            "checked_out" => Ok(Self::CheckedOut),
            other => Err(StatusParseError(other.to_string())),
        }
    }
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    #[serde(deserialize_with = "deserialize_positive_id")]
    pub id: BookId,
    pub title: String,
    pub author: String,
    /// Free-form text; not validated as a number.
    pub year: String,
    pub status: BookStatus,
}

impl Book {
    /// Creates an available book with the given store-assigned ID.
    pub fn new(
        id: BookId,
        title: impl Into<String>,
        author: impl Into<String>,
        year: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            author: author.into(),
            year: year.into(),
            status: BookStatus::Available,
        }
    }
}

impl Display for Book {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ID: {}, Title: {}, Author: {}, Year: {}, Status: {}",
            self.id, self.title, self.author, self.year, self.status
        )
    }
}

/// Textual attributes a search may target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Title,
    Author,
    Year,
}

impl SearchField {
    pub const ALL: [SearchField; 3] = [Self::Title, Self::Author, Self::Year];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Author => "author",
            Self::Year => "year",
        }
    }

    /// Returns the text of this field on `book`.
    pub fn value_of(self, book: &Book) -> &str {
        match self {
            Self::Title => book.title.as_str(),
            Self::Author => book.author.as_str(),
            Self::Year => book.year.as_str(),
        }
    }
}

/// Caller named a field that is not searchable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFieldError(pub String);

impl Display for UnknownFieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown search field `{}`; expected title|author|year",
            self.0
        )
    }
}

impl Error for UnknownFieldError {}

impl FromStr for SearchField {
    type Err = UnknownFieldError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "title" => Ok(Self::Title),
            "author" => Ok(Self::Author),
            "year" => Ok(Self::Year),
            _ => Err(UnknownFieldError(value.to_string())),
        }
    }
}

/// Returns the ID for the next book appended to `books`.
///
/// Pure function of the current catalog: `max(id) + 1`, or `1` when empty.
/// Deleted IDs below the current maximum are never handed out again, but
/// deleting the highest ID frees it for the next add.
///
/// Returns `None` when the maximum is already `BookId::MAX`.
pub fn next_book_id(books: &[Book]) -> Option<BookId> {
    books
        .iter()
        .map(|book| book.id)
        .max()
        .unwrap_or(0)
        .checked_add(1)
}

fn deserialize_positive_id<'de, D>(deserializer: D) -> Result<BookId, D::Error>
where
    D: Deserializer<'de>,
{
    let id = BookId::deserialize(deserializer)?;
    if id == 0 {
        return Err(serde::de::Error::custom("book id must be positive"));
    }
    Ok(id)
}
