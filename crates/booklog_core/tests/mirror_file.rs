use booklog_core::db::open_db_in_memory;
use booklog_core::{BookRepository, MirrorError, MirrorFile, NewBook, SqliteBookRepository};
use std::fs;

fn sample_books() -> Vec<NewBook> {
    vec![
        NewBook::new("Dune", "Frank Herbert", 1965, "Sci-Fi", true),
        NewBook::new("Emma", "Jane Austen", 1815, "Novel", false),
        NewBook::new("Dune", "Frank Herbert", 1965, "Sci-Fi", true),
    ]
}

#[test]
fn snapshot_then_load_into_empty_store_reproduces_records() {
    let dir = tempfile::tempdir().unwrap();
    let mirror = MirrorFile::new(dir.path().join("library.json"));

    let source_conn = open_db_in_memory().unwrap();
    let source = SqliteBookRepository::try_new(&source_conn).unwrap();
    for book in sample_books() {
        source.insert_book(&book).unwrap();
    }
    assert_eq!(mirror.snapshot(&source).unwrap(), 3);

    let target_conn = open_db_in_memory().unwrap();
    let target = SqliteBookRepository::try_new(&target_conn).unwrap();
    assert_eq!(mirror.load_into(&target).unwrap(), 3);

    let reloaded: Vec<NewBook> = target
        .list_books()
        .unwrap()
        .iter()
        .map(|book| book.to_new_book())
        .collect();
    assert_eq!(reloaded, sample_books());
}

#[test]
fn snapshot_writes_pretty_json_with_ids_and_boolean_read_status() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.json");
    let mirror = MirrorFile::new(&path);

    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();
    let id = repo
        .insert_book(&NewBook::new("Dune", "Frank Herbert", 1965, "Sci-Fi", true))
        .unwrap();
    mirror.snapshot(&repo).unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains('\n'));
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        value,
        serde_json::json!([{
            "id": id,
            "title": "Dune",
            "author": "Frank Herbert",
            "year": 1965,
            "genre": "Sci-Fi",
            "read_status": true
        }])
    );
}

#[test]
fn snapshot_fully_overwrites_previous_content() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.json");
    fs::write(&path, "[{\"stale\": true}, {\"stale\": true}]").unwrap();
    let mirror = MirrorFile::new(&path);

    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();
    mirror.snapshot(&repo).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value, serde_json::json!([]));
    let leftovers = fs::read_dir(dir.path()).unwrap().count();
    assert_eq!(leftovers, 1);
}

#[test]
fn snapshot_creates_missing_parent_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("library.json");
    let mirror = MirrorFile::new(&path);

    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();
    mirror.snapshot(&repo).unwrap();

    assert!(path.exists());
}

#[test]
fn load_missing_file_is_a_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let mirror = MirrorFile::new(dir.path().join("absent.json"));

    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    assert_eq!(mirror.load_into(&repo).unwrap(), 0);
    assert_eq!(repo.count_books().unwrap(), 0);
}

#[test]
fn load_malformed_file_fails_without_inserting() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.json");
    fs::write(
        &path,
        r#"[{"title": "Dune", "author": "Frank Herbert", "year": 1965, "genre": "Sci-Fi", "read_status": true},
            {"title": "Broken""#,
    )
    .unwrap();
    let mirror = MirrorFile::new(&path);

    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    let err = mirror.load_into(&repo).unwrap_err();
    assert!(matches!(err, MirrorError::Malformed { .. }));
    assert_eq!(repo.count_books().unwrap(), 0);
}

#[test]
fn load_rejects_records_missing_fields() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.json");
    fs::write(&path, r#"[{"title": "Dune"}]"#).unwrap();
    let mirror = MirrorFile::new(&path);

    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();

    assert!(matches!(
        mirror.load_into(&repo),
        Err(MirrorError::Malformed { .. })
    ));
}

#[test]
fn load_accepts_legacy_files_with_integer_read_status() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.json");
    fs::write(
        &path,
        r#"[
    {
        "title": "Dune",
        "author": "Frank Herbert",
        "year": 1965,
        "genre": "Sci-Fi",
        "read_status": 1
    },
    {
        "title": "Emma",
        "author": "Jane Austen",
        "year": 1815,
        "genre": "Novel",
        "read_status": 0
    }
]"#,
    )
    .unwrap();
    let mirror = MirrorFile::new(&path);

    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();
    assert_eq!(mirror.load_into(&repo).unwrap(), 2);

    let books = repo.list_books().unwrap();
    assert!(books[0].read_status);
    assert!(!books[1].read_status);
}

#[test]
fn load_into_populated_store_duplicates_records() {
    let dir = tempfile::tempdir().unwrap();
    let mirror = MirrorFile::new(dir.path().join("library.json"));

    let conn = open_db_in_memory().unwrap();
    let repo = SqliteBookRepository::try_new(&conn).unwrap();
    repo.insert_book(&NewBook::new("Dune", "Frank Herbert", 1965, "Sci-Fi", true))
        .unwrap();
    mirror.snapshot(&repo).unwrap();

    mirror.load_into(&repo).unwrap();

    assert_eq!(repo.count_books().unwrap(), 2);
}
