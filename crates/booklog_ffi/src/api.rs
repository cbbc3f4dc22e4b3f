//! FFI use-case API for the Flutter form UI.
//!
//! # Responsibility
//! - Expose one sync function per form submission via FRB.
//! - Return the refreshed catalog view with every mutation response, so the
//!   UI redraws from the response instead of re-querying.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Each call opens its own connection and releases it before returning.
//! - Year bounds are a form concern; the core store accepts any integer.

use booklog_core::db::open_db;
use booklog_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, Book, BookCatalog,
    CatalogResult, CatalogService, MirrorFile, NewBook, SearchField, SqliteBookRepository,
};
use log::warn;
use std::path::PathBuf;
use std::sync::OnceLock;

const FORM_DB_FILE_NAME: &str = "booklog_form.sqlite3";
const MIRROR_EXTENSION: &str = "json";
const YEAR_MIN: i64 = 0;
const YEAR_MAX: i64 = 2100;
const STATUS_SUCCESS: &str = "success";
const STATUS_WARNING: &str = "warning";
const STATUS_ERROR: &str = "error";
const MENU_ITEMS: [&str; 6] = [
    "Add Book",
    "Remove Book",
    "Search Book",
    "Display All Books",
    "Statistics",
    "Exit",
];
static FORM_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Returns an empty string on success and the error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One book row as rendered by the form UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormBookItem {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub year: i64,
    pub genre: String,
    pub read_status: bool,
    /// Pre-rendered list line for simple views.
    pub display: String,
}

/// Response envelope for add/remove/bootstrap submissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormActionResponse {
    /// Whether the submission reached the store without failure.
    pub ok: bool,
    /// `success|warning|error`, mapped to the UI message style.
    pub status: String,
    /// Human-readable message for the UI.
    pub message: String,
    /// Full catalog after the submission; empty when it could not be read.
    pub books: Vec<FormBookItem>,
}

/// Response envelope for search and list views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormListResponse {
    pub ok: bool,
    pub status: String,
    pub message: String,
    pub books: Vec<FormBookItem>,
}

/// Response envelope for the statistics view.
#[derive(Debug, Clone, PartialEq)]
pub struct FormStatsResponse {
    pub ok: bool,
    pub message: String,
    pub total: u64,
    pub percentage_read: f64,
}

/// Returns sidebar menu labels in display order.
#[flutter_rust_bridge::frb(sync)]
pub fn form_menu_items() -> Vec<String> {
    MENU_ITEMS.iter().map(|item| (*item).to_string()).collect()
}

/// Seeds an empty store from the mirror file next to the database.
///
/// # FFI contract
/// - Sync call, DB-backed execution; may read the mirror file.
/// - Safe to call on every app start: a populated store is left unchanged.
/// - Never panics; malformed mirror content returns `ok=false`.
/// - `books` carries the catalog after seeding.
#[flutter_rust_bridge::frb(sync)]
pub fn form_bootstrap() -> FormActionResponse {
    match with_catalog(|catalog| {
        let loaded = catalog.seed_from_mirror()?;
        Ok((loaded, catalog.list_books()?))
    }) {
        Ok((0, books)) => action_response(STATUS_SUCCESS, "Library ready.", books),
        Ok((loaded, books)) => action_response(
            STATUS_SUCCESS,
            format!("Loaded {loaded} book(s) from backup."),
            books,
        ),
        Err(message) => action_failure(format!("form_bootstrap failed: {message}")),
    }
}

/// Adds a book from the add form.
///
/// Field text is stored exactly as submitted, matching the text shell.
///
/// # FFI contract
/// - Sync call, DB-backed execution; rewrites the mirror file on success.
/// - Years outside `0..=2100` return `ok=false, status=warning` without
///   touching the store.
/// - Never panics; storage failures return `ok=false, status=error`.
/// - `books` carries the current catalog for every outcome except errors.
#[flutter_rust_bridge::frb(sync)]
pub fn form_add_book(
    title: String,
    author: String,
    year: i64,
    genre: String,
    read_status: bool,
) -> FormActionResponse {
    if !(YEAR_MIN..=YEAR_MAX).contains(&year) {
        return match with_catalog(|catalog| catalog.list_books()) {
            Ok(books) => FormActionResponse {
                ok: false,
                status: STATUS_WARNING.to_string(),
                message: format!("Publication year must be between {YEAR_MIN} and {YEAR_MAX}."),
                books: to_form_items(books),
            },
            Err(message) => action_failure(format!("form_add_book failed: {message}")),
        };
    }

    let book = NewBook::new(title, author, year, genre, read_status);
    match with_catalog(|catalog| {
        catalog.add_book(&book)?;
        catalog.list_books()
    }) {
        Ok(books) => action_response(
            STATUS_SUCCESS,
            format!("'{}' has been added!", book.title),
            books,
        ),
        Err(message) => action_failure(format!("form_add_book failed: {message}")),
    }
}

/// Removes every book whose title equals `title` exactly.
///
/// # FFI contract
/// - Sync call, DB-backed execution; rewrites the mirror file even when
///   nothing matched.
/// - No match is not an error: returns `ok=true, status=warning`.
/// - Never panics; storage failures return `ok=false, status=error`.
/// - `books` carries the catalog after removal.
#[flutter_rust_bridge::frb(sync)]
pub fn form_remove_book(title: String) -> FormActionResponse {
    match with_catalog(|catalog| {
        let removed = catalog.remove_book(&title)?;
        Ok((removed, catalog.list_books()?))
    }) {
        Ok((0, books)) => action_response(
            STATUS_WARNING,
            format!("No book titled '{title}' was found."),
            books,
        ),
        Ok((removed, books)) => action_response(
            STATUS_SUCCESS,
            format!("'{title}' has been removed! ({removed} book(s))"),
            books,
        ),
        Err(message) => action_failure(format!("form_remove_book failed: {message}")),
    }
}

/// Searches by `field` (`title|author|any`; blank means `any`).
///
/// # FFI contract
/// - Sync call, read-only DB execution.
/// - Never panics; an unknown field returns `ok=false, status=warning`.
#[flutter_rust_bridge::frb(sync)]
pub fn form_search_books(query: String, field: String) -> FormListResponse {
    let field = if field.trim().is_empty() {
        SearchField::Any
    } else {
        match SearchField::parse(&field) {
            Some(field) => field,
            None => {
                return list_failure(
                    STATUS_WARNING,
                    format!("Unknown search field `{}`; use title, author or any.", field.trim()),
                );
            }
        }
    };

    match with_catalog(|catalog| catalog.search_books(field, &query)) {
        Ok(books) if books.is_empty() => list_response(STATUS_WARNING, "No books found!", books),
        Ok(books) => list_response(
            STATUS_SUCCESS,
            format!("Found {} book(s).", books.len()),
            books,
        ),
        Err(message) => list_failure(STATUS_ERROR, format!("form_search_books failed: {message}")),
    }
}

/// Lists every book in storage order.
#[flutter_rust_bridge::frb(sync)]
pub fn form_list_books() -> FormListResponse {
    match with_catalog(|catalog| catalog.list_books()) {
        Ok(books) if books.is_empty() => {
            list_response(STATUS_WARNING, "No books in the library.", books)
        }
        Ok(books) => list_response(
            STATUS_SUCCESS,
            format!("{} book(s) in the library.", books.len()),
            books,
        ),
        Err(message) => list_failure(STATUS_ERROR, format!("form_list_books failed: {message}")),
    }
}

/// Returns total count and read percentage.
#[flutter_rust_bridge::frb(sync)]
pub fn form_statistics() -> FormStatsResponse {
    match with_catalog(|catalog| catalog.statistics()) {
        Ok(stats) => FormStatsResponse {
            ok: true,
            message: format!(
                "Total Books: {}, Percentage Read: {:.2}%",
                stats.total, stats.percentage_read
            ),
            total: stats.total,
            percentage_read: stats.percentage_read,
        },
        Err(message) => FormStatsResponse {
            ok: false,
            message: format!("form_statistics failed: {message}"),
            total: 0,
            percentage_read: 0.0,
        },
    }
}

fn resolve_form_db_path() -> PathBuf {
    FORM_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("BOOKLOG_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(FORM_DB_FILE_NAME)
        })
        .clone()
}

fn with_catalog<T>(
    f: impl FnOnce(&CatalogService<SqliteBookRepository<'_>>) -> CatalogResult<T>,
) -> Result<T, String> {
    let db_path = resolve_form_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("catalog DB open failed: {err}"))?;
    let repo = SqliteBookRepository::try_new(&conn)
        .map_err(|err| format!("catalog repo init failed: {err}"))?;
    let mirror = MirrorFile::new(db_path.with_extension(MIRROR_EXTENSION));
    let service = CatalogService::with_mirror(repo, mirror);
    f(&service).map_err(|err| {
        warn!("event=form_action module=ffi status=error");
        err.to_string()
    })
}

fn to_form_item(book: Book) -> FormBookItem {
    let display = format!(
        "{} by {} ({}), Genre: {}, Read: {}",
        book.title,
        book.author,
        book.year,
        book.genre,
        if book.read_status { "Yes" } else { "No" }
    );
    FormBookItem {
        id: book.id,
        title: book.title,
        author: book.author,
        year: book.year,
        genre: book.genre,
        read_status: book.read_status,
        display,
    }
}

fn to_form_items(books: Vec<Book>) -> Vec<FormBookItem> {
    books.into_iter().map(to_form_item).collect()
}

fn action_response(status: &str, message: impl Into<String>, books: Vec<Book>) -> FormActionResponse {
    FormActionResponse {
        ok: true,
        status: status.to_string(),
        message: message.into(),
        books: to_form_items(books),
    }
}

fn action_failure(message: impl Into<String>) -> FormActionResponse {
    FormActionResponse {
        ok: false,
        status: STATUS_ERROR.to_string(),
        message: message.into(),
        books: Vec::new(),
    }
}

fn list_response(status: &str, message: impl Into<String>, books: Vec<Book>) -> FormListResponse {
    FormListResponse {
        ok: true,
        status: status.to_string(),
        message: message.into(),
        books: to_form_items(books),
    }
}

fn list_failure(status: &str, message: impl Into<String>) -> FormListResponse {
    FormListResponse {
        ok: false,
        status: status.to_string(),
        message: message.into(),
        books: Vec::new(),
    }
}
