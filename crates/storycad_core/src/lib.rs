//! Core outline logic for StoryCAD.
//! This crate owns the story tree, its views and every rule that edits them.

pub mod api;
pub mod config;
pub mod document;
pub mod logging;
pub mod model;
pub mod service;
pub mod tree;

pub use config::{ConfigError, CoreConfig, DocumentConfig};
pub use document::{DocumentError, StoryDocument, TreeChange, TreeObserver};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::element::{ElementId, ElementValidationError, StoryElement, StoryItemType};
pub use model::registry::{ElementRegistry, RegistryError};
pub use service::narrative_service::{CopyReport, DeleteReport, NarrativeError, NarrativeService};
pub use service::outline_service::{
    DestinationIssue, OutlineDelete, OutlineError, OutlineService,
};
pub use tree::node::{NodeId, StoryNodeItem, StoryViewType};
pub use tree::snapshot::{NodeSnapshot, OutlineSnapshot};
pub use tree::story_tree::{StoryTree, TreeError, TreeResult};

/// Minimal health-check API for shell integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
