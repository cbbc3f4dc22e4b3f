//! File-backed JSON mirror.
//!
//! The on-disk shape is a pretty-printed array of objects with keys
//! `id, title, author, year, genre, read_status`. Files produced by older
//! tooling omit `id` and store `read_status` as `0/1`; both are accepted on
//! load.

use crate::model::book::{Book, BookId, NewBook};
use crate::repo::book_repo::{BookRepository, RepoError};
use log::{error, info};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tempfile::NamedTempFile;

const JSON_INDENT: &[u8] = b"    ";

pub type MirrorResult<T> = Result<T, MirrorError>;

/// Mirror-layer error for file I/O, parsing and store writes.
#[derive(Debug)]
pub enum MirrorError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    /// File exists but is not a valid mirror document.
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
    Repo(RepoError),
}

impl Display for MirrorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "mirror file `{}` I/O failed: {source}", path.display())
            }
            Self::Malformed { path, source } => {
                write!(f, "mirror file `{}` is malformed: {source}", path.display())
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for MirrorError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Malformed { source, .. } => Some(source),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for MirrorError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct MirrorRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<BookId>,
    title: String,
    author: String,
    year: i64,
    genre: String,
    #[serde(deserialize_with = "deserialize_read_status")]
    read_status: bool,
}

impl From<&Book> for MirrorRecord {
    fn from(book: &Book) -> Self {
        Self {
            id: Some(book.id),
            title: book.title.clone(),
            author: book.author.clone(),
            year: book.year,
            genre: book.genre.clone(),
            read_status: book.read_status,
        }
    }
}

impl From<MirrorRecord> for NewBook {
    fn from(record: MirrorRecord) -> Self {
        NewBook {
            title: record.title,
            author: record.author,
            year: record.year,
            genre: record.genre,
            read_status: record.read_status,
        }
    }
}

fn deserialize_read_status<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ReadStatusRepr {
        Bool(bool),
        Int(i64),
    }

    match ReadStatusRepr::deserialize(deserializer)? {
        ReadStatusRepr::Bool(value) => Ok(value),
        ReadStatusRepr::Int(0) => Ok(false),
        ReadStatusRepr::Int(1) => Ok(true),
        ReadStatusRepr::Int(other) => Err(de::Error::custom(format!(
            "read_status must be true/false or 0/1, got {other}"
        ))),
    }
}

/// Handle to the mirror file at a fixed path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorFile {
    path: PathBuf,
}

impl MirrorFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Inserts every mirrored record into `repo` and returns how many were loaded.
    ///
    /// A missing file loads nothing. Records are appended without
    /// deduplication, so loading into a populated store duplicates rows.
    ///
    /// # Errors
    /// - `Malformed` when the file cannot be parsed; nothing is inserted.
    /// - `Io` for any read failure other than a missing file.
    /// - `Repo` when an insert fails; earlier inserts stay in the store.
    pub fn load_into<R>(&self, repo: &R) -> MirrorResult<usize>
    where
        R: BookRepository + ?Sized,
    {
        let started_at = Instant::now();
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!("event=mirror_load module=mirror status=skipped reason=missing_file");
                return Ok(0);
            }
            Err(source) => {
                error!("event=mirror_load module=mirror status=error error_code=read_failed");
                return Err(self.io_error(source));
            }
        };

        let records: Vec<MirrorRecord> = serde_json::from_str(&raw).map_err(|source| {
            error!("event=mirror_load module=mirror status=error error_code=malformed");
            MirrorError::Malformed {
                path: self.path.clone(),
                source,
            }
        })?;

        let loaded = records.len();
        for record in records {
            repo.insert_book(&NewBook::from(record))?;
        }

        info!(
            "event=mirror_load module=mirror status=ok records={loaded} duration_ms={}",
            started_at.elapsed().as_millis()
        );
        Ok(loaded)
    }

    /// Overwrites the mirror file with every record in `repo`.
    ///
    /// Returns the number of records written.
    pub fn snapshot<R>(&self, repo: &R) -> MirrorResult<usize>
    where
        R: BookRepository + ?Sized,
    {
        let started_at = Instant::now();
        let books = repo.list_books()?;
        let records = books.iter().map(MirrorRecord::from).collect::<Vec<_>>();

        let mut body = Vec::new();
        let formatter = PrettyFormatter::with_indent(JSON_INDENT);
        let mut serializer = serde_json::Serializer::with_formatter(&mut body, formatter);
        records
            .serialize(&mut serializer)
            .map_err(|source| self.io_error(io::Error::other(source)))?;
        body.push(b'\n');

        if let Err(err) = self.write_atomically(&body) {
            error!("event=mirror_snapshot module=mirror status=error error_code=write_failed");
            return Err(err);
        }

        info!(
            "event=mirror_snapshot module=mirror status=ok records={} duration_ms={}",
            records.len(),
            started_at.elapsed().as_millis()
        );
        Ok(records.len())
    }

    fn write_atomically(&self, body: &[u8]) -> MirrorResult<()> {
        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;

        let mut temp = NamedTempFile::new_in(parent).map_err(|source| self.io_error(source))?;
        temp.write_all(body).map_err(|source| self.io_error(source))?;
        temp.flush().map_err(|source| self.io_error(source))?;
        temp.persist(&self.path)
            .map_err(|err| self.io_error(err.error))?;
        Ok(())
    }

    fn io_error(&self, source: io::Error) -> MirrorError {
        MirrorError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::MirrorRecord;

    #[test]
    fn record_accepts_legacy_integer_read_status_without_id() {
        let record: MirrorRecord = serde_json::from_str(
            r#"{"title": "Dune", "author": "Frank Herbert", "year": 1965, "genre": "Sci-Fi", "read_status": 1}"#,
        )
        .unwrap();
        assert_eq!(record.id, None);
        assert!(record.read_status);
    }

    #[test]
    fn record_rejects_out_of_range_integer_read_status() {
        let result = serde_json::from_str::<MirrorRecord>(
            r#"{"title": "t", "author": "a", "year": 1, "genre": "g", "read_status": 7}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn record_requires_all_book_fields() {
        let result = serde_json::from_str::<MirrorRecord>(
            r#"{"title": "t", "author": "a", "genre": "g", "read_status": false}"#,
        );
        assert!(result.is_err());
    }
}
