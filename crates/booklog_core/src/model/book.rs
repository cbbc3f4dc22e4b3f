//! Book domain model.
//!
//! # Responsibility
//! - Define the persisted `Book` record and the `NewBook` insert payload.
//! - Provide the search field selector and catalog statistics shape.
//!
//! # Invariants
//! - `id` is assigned by the store, unique, and never reused or mutated.
//! - Title, author, year and genre are not validated by the core; duplicates
//!   and implausible years are accepted.

use std::fmt::{Display, Formatter};

/// Store-assigned identity of a book row.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type BookId = i64;

/// Book fields supplied by a caller before the store assigns an ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub year: i64,
    pub genre: String,
    /// Whether the user has finished the book.
    pub read_status: bool,
}

impl NewBook {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        year: i64,
        genre: impl Into<String>,
        read_status: bool,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            year,
            genre: genre.into(),
            read_status,
        }
    }
}

/// A persisted book record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub year: i64,
    pub genre: String,
    pub read_status: bool,
}

impl Book {
    /// Human-readable read state used by the text shell.
    pub fn read_label(&self) -> &'static str {
        if self.read_status {
            "Read"
        } else {
            "Unread"
        }
    }

    /// Returns the insert payload for this record, dropping its ID.
    pub fn to_new_book(&self) -> NewBook {
        NewBook {
            title: self.title.clone(),
            author: self.author.clone(),
            year: self.year,
            genre: self.genre.clone(),
            read_status: self.read_status,
        }
    }
}

/// Single-line listing form: `Title by Author (Year) - Genre - Read`.
impl Display for Book {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} by {} ({}) - {} - {}",
            self.title,
            self.author,
            self.year,
            self.genre,
            self.read_label()
        )
    }
}

/// Column selector for substring search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Title,
    Author,
    /// Matches when either title or author contains the query.
    Any,
}

impl SearchField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Author => "author",
            Self::Any => "any",
        }
    }

    /// Parses `title|author|any` (case-insensitive, surrounding whitespace ignored).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "title" => Some(Self::Title),
            "author" => Some(Self::Author),
            "any" => Some(Self::Any),
            _ => None,
        }
    }
}

/// Aggregate counts for the statistics view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogStats {
    pub total: u64,
    pub read: u64,
    /// `read / total * 100`, or `0.0` for an empty catalog.
    pub percentage_read: f64,
}

impl CatalogStats {
    pub fn from_counts(total: u64, read: u64) -> Self {
        let percentage_read = if total == 0 {
            0.0
        } else {
            read as f64 / total as f64 * 100.0
        };
        Self {
            total,
            read,
            percentage_read,
        }
    }
}
