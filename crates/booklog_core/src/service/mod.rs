//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository and mirror calls into catalog operations.
//! - Keep presentation shells decoupled from storage details.

pub mod catalog_service;
