use booklog_core::db::schema::{initialize, table_columns, table_exists, BOOKS_COLUMNS};
use booklog_core::db::{open_db, open_db_in_memory};
use booklog_core::{BookRepository, NewBook, SqliteBookRepository};

#[test]
fn open_db_in_memory_creates_books_table() {
    let conn = open_db_in_memory().unwrap();

    assert!(table_exists(&conn, "books").unwrap());
    assert_eq!(table_columns(&conn, "books").unwrap(), BOOKS_COLUMNS);
}

#[test]
fn initialize_twice_keeps_schema_and_rows() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();
    repo.insert_book(&NewBook::new("Dune", "Frank Herbert", 1965, "Sci-Fi", true))
        .unwrap();

    initialize(&conn).unwrap();
    initialize(&conn).unwrap();

    assert_eq!(table_columns(&conn, "books").unwrap(), BOOKS_COLUMNS);
    assert_eq!(repo.count_books().unwrap(), 1);
}

#[test]
fn reopening_file_database_preserves_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.db");

    {
        let conn = open_db(&path).unwrap();
        let repo = SqliteBookRepository::try_new(&conn).unwrap();
        repo.insert_book(&NewBook::new("Emma", "Jane Austen", 1815, "Novel", false))
            .unwrap();
    }

    let conn = open_db(&path).unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();
    let books = repo.list_books().unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].title, "Emma");
}

#[test]
fn opening_database_created_by_older_tool_reuses_its_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("legacy.db");

    let conn = rusqlite::Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE books (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT,
            author TEXT,
            year INTEGER,
            genre TEXT,
            read_status BOOLEAN
        );
        INSERT INTO books (title, author, year, genre, read_status)
        VALUES ('Dune', 'Frank Herbert', 1965, 'Sci-Fi', 1);",
    )
    .unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();
    let books = repo.list_books().unwrap();
    assert_eq!(books.len(), 1);
    assert!(books[0].read_status);
}
