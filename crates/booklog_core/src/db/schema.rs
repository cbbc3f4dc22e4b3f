//! Catalog schema definition.
//!
//! The `books` layout is shared with databases written by earlier versions
//! of the tool, so columns are nullable and untyped beyond SQLite affinity.

use super::DbResult;
use rusqlite::Connection;

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Table holding every book record.
pub const BOOKS_TABLE: &str = "books";

/// Columns every `books` table must expose, in declaration order.
pub const BOOKS_COLUMNS: &[&str] = &["id", "title", "author", "year", "genre", "read_status"];

/// Ensures the `books` table exists.
///
/// Idempotent: existing tables and rows are left untouched.
pub fn initialize(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

/// Returns whether `table` exists in the connected database.
pub fn table_exists(conn: &Connection, table: &str) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

/// Returns the column names of `table` in declaration order.
pub fn table_columns(conn: &Connection, table: &str) -> DbResult<Vec<String>> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1);")?;
    let names = stmt
        .query_map([table], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(names)
}
