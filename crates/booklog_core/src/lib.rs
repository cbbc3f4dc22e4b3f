//! Core catalog logic for Booklog.
//! This crate is the single source of truth for book catalog invariants.

pub mod db;
pub mod logging;
pub mod mirror;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use mirror::{MirrorError, MirrorFile, MirrorResult};
pub use model::book::{Book, BookId, CatalogStats, NewBook, SearchField};
pub use repo::book_repo::{BookRepository, RepoError, RepoResult, SqliteBookRepository};
pub use service::catalog_service::{BookCatalog, CatalogError, CatalogResult, CatalogService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
