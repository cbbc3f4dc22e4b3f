//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data access contract for book records.
//! - Isolate SQLite query details from catalog orchestration.
//!
//! # Invariants
//! - Repository APIs surface storage failures unchanged; nothing retries.
//! - Read paths reject malformed persisted rows instead of masking them.

pub mod book_repo;
