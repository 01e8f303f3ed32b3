//! Outline use-case services.
//!
//! # Responsibility
//! - Turn user commands on one open document into validated tree changes.
//! - Keep shells decoupled from tree internals.

pub mod narrative_service;
pub mod outline_service;
