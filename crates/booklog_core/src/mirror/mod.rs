//! JSON mirror of the full catalog.
//!
//! # Responsibility
//! - Write a human-readable snapshot of every book after each mutation.
//! - Seed a store from an existing snapshot at cold start.
//!
//! # Invariants
//! - A missing mirror file is the only load failure that is swallowed.
//! - Malformed content is rejected before any row is inserted.
//! - Snapshots fully replace the previous file via temp-file rename.

pub mod json_file;

pub use json_file::{MirrorError, MirrorFile, MirrorResult};
