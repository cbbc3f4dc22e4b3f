//! Flutter-facing bindings for the book catalog form UI.

pub mod api;
