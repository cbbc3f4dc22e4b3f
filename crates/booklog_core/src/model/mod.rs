//! Catalog domain model.
//!
//! # Responsibility
//! - Define the book record shared by the store, mirror file and shells.
//! - Keep presentation helpers (summary lines, read labels) next to the data.
//!
//! # Invariants
//! - Every stored book is identified by a store-assigned `BookId`.
//! - Books are never edited in place; only created and deleted.

pub mod book;
