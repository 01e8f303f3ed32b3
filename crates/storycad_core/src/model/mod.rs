//! Story domain model.
//!
//! # Responsibility
//! - Define the canonical story element shape shared by all outline views.
//! - Own element identity through a per-document registry.
//!
//! # Invariants
//! - Every element is identified by a stable, non-nil `ElementId`.
//! - Elements are never duplicated; views only hold references by id.

pub mod element;
pub mod registry;
