//! Catalog use-case service.
//!
//! # Responsibility
//! - Expose add/remove/search/list/statistics over one repository handle.
//! - Resync the mirror file after every mutation.
//!
//! # Invariants
//! - Every successful mutation is followed by a snapshot attempt, including
//!   removals that matched nothing.
//! - Read-only operations never touch the mirror file.
//! - Cold-start seeding only runs against an empty store.

use crate::mirror::{MirrorError, MirrorFile};
use crate::model::book::{Book, BookId, CatalogStats, NewBook, SearchField};
use crate::repo::book_repo::{BookRepository, RepoError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog-level error, carrying the failing layer unchanged.
#[derive(Debug)]
pub enum CatalogError {
    Repo(RepoError),
    Mirror(MirrorError),
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Mirror(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Mirror(err) => Some(err),
        }
    }
}

impl From<RepoError> for CatalogError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<MirrorError> for CatalogError {
    fn from(value: MirrorError) -> Self {
        Self::Mirror(value)
    }
}

/// Operations every presentation shell drives.
pub trait BookCatalog {
    /// Stores a new book and resyncs the mirror.
    fn add_book(&self, book: &NewBook) -> CatalogResult<BookId>;
    /// Removes every book titled exactly `title`; returns the removed count.
    fn remove_book(&self, title: &str) -> CatalogResult<usize>;
    fn search_books(&self, field: SearchField, query: &str) -> CatalogResult<Vec<Book>>;
    fn list_books(&self) -> CatalogResult<Vec<Book>>;
    fn statistics(&self) -> CatalogResult<CatalogStats>;
    /// Writes the full catalog to the mirror, if one is configured.
    fn snapshot(&self) -> CatalogResult<()>;
}

/// Catalog service over a repository and an optional mirror file.
pub struct CatalogService<R: BookRepository> {
    repo: R,
    mirror: Option<MirrorFile>,
}

impl<R: BookRepository> CatalogService<R> {
    /// Creates a service without mirror write-through.
    pub fn new(repo: R) -> Self {
        Self { repo, mirror: None }
    }

    /// Creates a service that snapshots to `mirror` after each mutation.
    pub fn with_mirror(repo: R, mirror: MirrorFile) -> Self {
        Self {
            repo,
            mirror: Some(mirror),
        }
    }

    /// Loads the mirror file into the store when the store holds no books.
    ///
    /// Returns the number of loaded records; `0` when the store was already
    /// populated, no mirror is configured, or the mirror file is absent.
    ///
    /// # Errors
    /// - Malformed mirror content is returned as `CatalogError::Mirror`.
    pub fn seed_from_mirror(&self) -> CatalogResult<usize> {
        let Some(mirror) = self.mirror.as_ref() else {
            return Ok(0);
        };

        let existing = self.repo.count_books()?;
        if existing > 0 {
            info!("event=catalog_seed module=service status=skipped reason=store_not_empty existing={existing}");
            return Ok(0);
        }

        let loaded = mirror.load_into(&self.repo)?;
        info!("event=catalog_seed module=service status=ok loaded={loaded}");
        Ok(loaded)
    }
}

impl<R: BookRepository> BookCatalog for CatalogService<R> {
    fn add_book(&self, book: &NewBook) -> CatalogResult<BookId> {
        let id = self.repo.insert_book(book)?;
        info!("event=book_add module=service status=ok book_id={id}");
        self.snapshot()?;
        Ok(id)
    }

    fn remove_book(&self, title: &str) -> CatalogResult<usize> {
        let removed = self.repo.delete_by_title(title)?;
        info!("event=book_remove module=service status=ok removed={removed}");
        self.snapshot()?;
        Ok(removed)
    }

    fn search_books(&self, field: SearchField, query: &str) -> CatalogResult<Vec<Book>> {
        let hits = self.repo.find_by_substring(field, query)?;
        info!(
            "event=book_search module=service status=ok field={} hits={}",
            field.as_str(),
            hits.len()
        );
        Ok(hits)
    }

    fn list_books(&self) -> CatalogResult<Vec<Book>> {
        Ok(self.repo.list_books()?)
    }

    fn statistics(&self) -> CatalogResult<CatalogStats> {
        let total = self.repo.count_books()?;
        let read = self.repo.count_read()?;
        Ok(CatalogStats::from_counts(total, read))
    }

    fn snapshot(&self) -> CatalogResult<()> {
        if let Some(mirror) = self.mirror.as_ref() {
            mirror.snapshot(&self.repo)?;
        }
        Ok(())
    }
}
