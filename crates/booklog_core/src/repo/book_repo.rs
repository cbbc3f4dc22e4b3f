//! Book repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert/delete/query/count APIs over the `books` table.
//! - Keep SQL text inside the core persistence boundary.
//!
//! # Invariants
//! - Results are always returned in storage (`id`) order.
//! - `delete_by_title` removes every row with an exactly equal title.
//! - Substring search treats `%` and `_` in the query as literal characters.

use crate::db::schema::{table_columns, table_exists, BOOKS_COLUMNS, BOOKS_TABLE};
use crate::db::DbError;
use crate::model::book::{Book, BookId, NewBook, SearchField};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const BOOK_SELECT_SQL: &str = "SELECT
    id,
    title,
    author,
    year,
    genre,
    read_status
FROM books";

const LIKE_ESCAPE_CHAR: char = '\\';

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for book persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Connection does not contain the expected table.
    MissingRequiredTable(&'static str),
    /// Table exists but lacks a column the repository reads or writes.
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "required column `{table}.{column}` is missing")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted book data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for the book catalog.
pub trait BookRepository {
    /// Appends one record and returns its store-assigned ID.
    fn insert_book(&self, book: &NewBook) -> RepoResult<BookId>;
    /// Removes every record whose title equals `title` (case-sensitive).
    fn delete_by_title(&self, title: &str) -> RepoResult<usize>;
    /// Returns records whose `field` contains `pattern`.
    fn find_by_substring(&self, field: SearchField, pattern: &str) -> RepoResult<Vec<Book>>;
    fn list_books(&self) -> RepoResult<Vec<Book>>;
    fn count_books(&self) -> RepoResult<u64>;
    fn count_read(&self) -> RepoResult<u64>;
}

/// SQLite-backed book repository borrowing an open connection.
pub struct SqliteBookRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteBookRepository<'conn> {
    /// Wraps a connection after checking the `books` table shape.
    ///
    /// # Errors
    /// - `MissingRequiredTable` when `books` does not exist.
    /// - `MissingRequiredColumn` for the first absent column.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        if !table_exists(conn, BOOKS_TABLE)? {
            return Err(RepoError::MissingRequiredTable(BOOKS_TABLE));
        }

        let present = table_columns(conn, BOOKS_TABLE)?;
        if let Some(column) = BOOKS_COLUMNS
            .iter()
            .copied()
            .find(|column| !present.iter().any(|name| name == *column))
        {
            return Err(RepoError::MissingRequiredColumn {
                table: BOOKS_TABLE,
                column,
            });
        }

        Ok(Self { conn })
    }

    fn query_books(&self, sql: &str, pattern: Option<&str>) -> RepoResult<Vec<Book>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = match pattern {
            Some(pattern) => stmt.query([pattern])?,
            None => stmt.query([])?,
        };

        let mut books = Vec::new();
        while let Some(row) = rows.next()? {
            books.push(parse_book_row(row)?);
        }
        Ok(books)
    }

    fn count_where(&self, predicate: &str) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM books WHERE {predicate};"),
            [],
            |row| row.get(0),
        )?;
        u64::try_from(count).map_err(|_| RepoError::InvalidData(format!("negative count {count}")))
    }
}

impl BookRepository for SqliteBookRepository<'_> {
    fn insert_book(&self, book: &NewBook) -> RepoResult<BookId> {
        self.conn.execute(
            "INSERT INTO books (title, author, year, genre, read_status)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                book.title.as_str(),
                book.author.as_str(),
                book.year,
                book.genre.as_str(),
                bool_to_int(book.read_status),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn delete_by_title(&self, title: &str) -> RepoResult<usize> {
        let removed = self
            .conn
            .execute("DELETE FROM books WHERE title = ?1;", [title])?;
        Ok(removed)
    }

    fn find_by_substring(&self, field: SearchField, pattern: &str) -> RepoResult<Vec<Book>> {
        let predicate = match field {
            SearchField::Title => "title LIKE ?1 ESCAPE '\\'",
            SearchField::Author => "author LIKE ?1 ESCAPE '\\'",
            SearchField::Any => "(title LIKE ?1 ESCAPE '\\' OR author LIKE ?1 ESCAPE '\\')",
        };
        let sql = format!("{BOOK_SELECT_SQL} WHERE {predicate} ORDER BY id ASC;");
        let pattern = like_contains_pattern(pattern);
        self.query_books(&sql, Some(pattern.as_str()))
    }

    fn list_books(&self) -> RepoResult<Vec<Book>> {
        self.query_books(&format!("{BOOK_SELECT_SQL} ORDER BY id ASC;"), None)
    }

    fn count_books(&self) -> RepoResult<u64> {
        self.count_where("1 = 1")
    }

    fn count_read(&self) -> RepoResult<u64> {
        self.count_where("read_status = 1")
    }
}

fn parse_book_row(row: &Row<'_>) -> RepoResult<Book> {
    let id: BookId = row.get("id")?;

    let read_status = match row.get::<_, Option<i64>>("read_status")? {
        Some(0) => false,
        Some(1) => true,
        other => {
            return Err(RepoError::InvalidData(format!(
                "invalid read_status value `{other:?}` in books.read_status (id={id})"
            )));
        }
    };

    Ok(Book {
        id,
        title: required_text(row, "title", id)?,
        author: required_text(row, "author", id)?,
        year: row.get::<_, Option<i64>>("year")?.ok_or_else(|| {
            RepoError::InvalidData(format!("missing year in books.year (id={id})"))
        })?,
        genre: required_text(row, "genre", id)?,
        read_status,
    })
}

fn required_text(row: &Row<'_>, column: &str, id: BookId) -> RepoResult<String> {
    row.get::<_, Option<String>>(column)?.ok_or_else(|| {
        RepoError::InvalidData(format!("missing {column} in books.{column} (id={id})"))
    })
}

/// Builds a `LIKE` pattern matching `needle` anywhere, with wildcards escaped.
fn like_contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_') || ch == LIKE_ESCAPE_CHAR {
            pattern.push(LIKE_ESCAPE_CHAR);
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::like_contains_pattern;

    #[test]
    fn like_pattern_wraps_and_escapes_wildcards() {
        assert_eq!(like_contains_pattern("herbert"), "%herbert%");
        assert_eq!(like_contains_pattern("100%_x"), "%100\\%\\_x%");
        assert_eq!(like_contains_pattern("a\\b"), "%a\\\\b%");
        assert_eq!(like_contains_pattern(""), "%%");
    }
}
