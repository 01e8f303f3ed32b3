//! Shell-facing command API.
//!
//! # Responsibility
//! - Expose one function per outline command with a flat response envelope.
//! - Translate service errors into the status-bar text users see.
//!
//! # Invariants
//! - Functions never panic; every failure becomes `ok = false`.
//! - A rejected command leaves the document untouched.

use crate::document::StoryDocument;
use crate::model::element::StoryItemType;
use crate::service::narrative_service::{NarrativeError, NarrativeService};
use crate::service::outline_service::{self, OutlineError, OutlineService};
use crate::tree::node::{NodeId, StoryViewType};
use serde::Serialize;

/// Generic action response envelope for outline commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionResponse {
    /// Whether the command succeeded.
    pub ok: bool,
    /// Human-readable status line.
    pub message: String,
    /// Node created or touched by the command, when there is one.
    pub node_id: Option<String>,
    /// Number of nodes the command affected.
    pub count: usize,
}

impl ActionResponse {
    fn success(message: impl Into<String>, node_id: Option<NodeId>, count: usize) -> Self {
        Self {
            ok: true,
            message: message.into(),
            node_id: node_id.map(|id| id.to_string()),
            count,
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            node_id: None,
            count: 0,
        }
    }
}

/// One search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchItem {
    pub node_id: String,
    pub name: String,
    pub kind: StoryItemType,
}

/// Search response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResponse {
    /// Matches in outline order (empty on failure).
    pub items: Vec<SearchItem>,
    pub message: String,
}

/// Copies the selection to the Narrator view.
pub fn copy_to_narrator(doc: &mut StoryDocument, selected: Option<NodeId>) -> ActionResponse {
    match NarrativeService::new(doc).copy_selected(selected) {
        Ok(report) => {
            let count = report.copied_count();
            let message = match report.source_kind {
                StoryItemType::Scene => format!("Copied {}", report.source_name),
                _ => format!("Copied {count} scene(s) from {}.", report.source_name),
            };
            ActionResponse::success(message, report.copied.first().copied(), count)
        }
        Err(err) => narrative_failure(&err),
    }
}

/// Copies every Explorer scene not yet in the Narrator view.
pub fn copy_all_unused_scenes(doc: &mut StoryDocument) -> ActionResponse {
    match NarrativeService::new(doc).copy_all_unused_scenes() {
        Ok(report) => {
            let count = report.copied_count();
            ActionResponse::success(
                format!("Copied {count} unused scene(s)."),
                report.copied.first().copied(),
                count,
            )
        }
        Err(err) => narrative_failure(&err),
    }
}

/// Removes the selection from the Narrator view.
pub fn delete_from_narrator(doc: &mut StoryDocument, selected: Option<NodeId>) -> ActionResponse {
    match NarrativeService::new(doc).delete_from_narrator(selected) {
        Ok(report) => {
            ActionResponse::success(format!("Deleted {}", report.name), selected, report.removed)
        }
        Err(err) => narrative_failure(&err),
    }
}

/// Appends a new section to the Narrator view.
pub fn create_section(doc: &mut StoryDocument, name: &str) -> ActionResponse {
    match NarrativeService::new(doc).create_section(name) {
        Ok(node) => {
            let label = doc
                .tree()
                .get(node)
                .map(|item| item.name().to_string())
                .unwrap_or_default();
            ActionResponse::success(format!("Created section {label}"), Some(node), 1)
        }
        Err(err) => narrative_failure(&err),
    }
}

/// Drops `source` immediately before `target`.
pub fn move_node(
    doc: &mut StoryDocument,
    source: Option<NodeId>,
    target: Option<NodeId>,
) -> ActionResponse {
    match OutlineService::new(doc).move_node(source, target) {
        Ok(()) => ActionResponse::success("Drag and drop successful", source, 1),
        Err(OutlineError::ProtectedNode(_)) => ActionResponse::failure("Invalid drag source"),
        Err(err) => ActionResponse::failure(err.user_message()),
    }
}

/// Deletes the selection: Explorer nodes go to the trash, everything else
/// is removed.
pub fn delete_node(doc: &mut StoryDocument, selected: Option<NodeId>) -> ActionResponse {
    match OutlineService::new(doc).delete_node(selected) {
        Ok(outcome) => ActionResponse::success(
            format!("Deleted {}", outcome.name),
            selected,
            outcome.affected,
        ),
        Err(OutlineError::ProtectedNode(_)) => {
            ActionResponse::failure("You can't delete this node!")
        }
        Err(err) => ActionResponse::failure(err.user_message()),
    }
}

/// Moves a top-level trash item back into the Explorer view.
pub fn restore_from_trash(doc: &mut StoryDocument, selected: Option<NodeId>) -> ActionResponse {
    match OutlineService::new(doc).restore_from_trash(selected) {
        Ok(()) => {
            let name = selected
                .and_then(|id| doc.tree().get(id))
                .map(|item| item.name().to_string())
                .unwrap_or_default();
            ActionResponse::success(format!("Restored {name}"), selected, 1)
        }
        Err(err) => ActionResponse::failure(err.user_message()),
    }
}

/// Permanently removes everything in the trash.
pub fn empty_trash(doc: &mut StoryDocument) -> ActionResponse {
    match OutlineService::new(doc).empty_trash() {
        Ok(removed) => ActionResponse::success(
            format!("Removed {removed} node(s) from the trash."),
            None,
            removed,
        ),
        Err(err) => ActionResponse::failure(err.user_message()),
    }
}

/// Finds nodes of one view by name.
pub fn search(doc: &StoryDocument, view: StoryViewType, query: &str) -> SearchResponse {
    let hits = match outline_service::search(doc, view, query) {
        Ok(hits) => hits,
        Err(err) => {
            return SearchResponse {
                items: Vec::new(),
                message: err.user_message().to_string(),
            }
        }
    };

    let items: Vec<SearchItem> = hits
        .into_iter()
        .filter_map(|id| doc.tree().get(id))
        .map(|node| SearchItem {
            node_id: node.id().to_string(),
            name: node.name().to_string(),
            kind: node.kind(),
        })
        .collect();
    SearchResponse {
        message: format!("Found {} node(s).", items.len()),
        items,
    }
}

fn narrative_failure(err: &NarrativeError) -> ActionResponse {
    ActionResponse::failure(err.user_message())
}
