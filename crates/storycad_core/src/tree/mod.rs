//! In-memory story outline.
//!
//! # Responsibility
//! - Place story elements into the Explorer, Narrator and Trash views.
//! - Keep parent/child links consistent across structural mutations.
//!
//! # Invariants
//! - Nodes are addressed by arena handles (`NodeId`), never by reference.
//! - Tree operations are synchronous and leave no partial mutation on error.

pub mod node;
pub mod snapshot;
pub mod story_tree;
