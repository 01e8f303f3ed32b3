//! Explorer outline use-cases: drag-and-drop, trash and search.
//!
//! # Responsibility
//! - Validate drag sources and drop targets before any structural change.
//! - Route deletes by view: Explorer to trash, Narrator and Trash for good.
//! - Restore trashed subtrees and empty the trash.
//!
//! # Invariants
//! - Nothing is dropped into, or dragged out of, the trash.
//! - Trashed elements keep no Narrator placement.
//! - Elements without any remaining node are released from the registry.

use crate::document::{StoryDocument, TreeChange};
use crate::model::element::{ElementId, StoryItemType};
use crate::tree::node::{NodeId, StoryViewType};
use crate::tree::story_tree::TreeError;
use log::{info, warn};
use regex::RegexBuilder;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Why a drop target was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationIssue {
    /// Target is a view root; moves insert before the target, so roots
    /// cannot take a sibling.
    ViewRoot,
    /// Target lives under the trash root.
    InTrash,
    /// Target belongs to a different view than the source.
    OtherView,
    /// Target is the source itself or one of its descendants.
    OwnSubtree,
}

/// Errors from outline use-cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutlineError {
    /// Nothing is selected, or the handle is stale.
    InvalidSelection,
    /// View roots and the trash can cannot be moved or deleted.
    ProtectedNode(NodeId),
    /// Drag source sits in the trash.
    InvalidSource(NodeId),
    /// Drop target refused.
    InvalidDestination {
        node: NodeId,
        issue: DestinationIssue,
    },
    /// Only direct children of the trash root can be restored.
    NotRestorable(NodeId),
    /// Search text is blank.
    InvalidQuery(String),
    /// Structural failure from the story tree.
    Tree(TreeError),
}

impl OutlineError {
    /// Short status line suitable for the shell status bar.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidSelection => "No node selected.",
            Self::ProtectedNode(_) => "You can't move or delete this node!",
            Self::InvalidSource(_) => "Invalid drag source",
            Self::InvalidDestination { issue, .. } => match issue {
                DestinationIssue::ViewRoot => "Drag target is not below root",
                DestinationIssue::InTrash => "Drag to Trashcan invalid",
                DestinationIssue::OtherView | DestinationIssue::OwnSubtree => {
                    "Invalid drag target"
                }
            },
            Self::NotRestorable(_) => "Only top-level trash items can be restored.",
            Self::InvalidQuery(_) => "Enter some text to search for.",
            Self::Tree(_) => "The outline could not be changed.",
        }
    }
}

impl Display for OutlineError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSelection => write!(f, "no outline node selected"),
            Self::ProtectedNode(node) => write!(f, "outline node is protected: {node}"),
            Self::InvalidSource(node) => write!(f, "invalid drag source: {node}"),
            Self::InvalidDestination { node, issue } => {
                write!(f, "invalid drop target {node}: {issue:?}")
            }
            Self::NotRestorable(node) => {
                write!(f, "node {node} is not a top-level trash item")
            }
            Self::InvalidQuery(query) => write!(f, "invalid search query `{query}`"),
            Self::Tree(err) => write!(f, "{err}"),
        }
    }
}

impl Error for OutlineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Tree(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TreeError> for OutlineError {
    fn from(value: TreeError) -> Self {
        match value {
            TreeError::ProtectedNode(node) => Self::ProtectedNode(node),
            TreeError::InvalidSource(node) => Self::InvalidSource(node),
            other => Self::Tree(other),
        }
    }
}

/// Outcome of one outline delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineDelete {
    /// Display name of the deleted node.
    pub name: String,
    /// View the node was deleted from.
    pub view: StoryViewType,
    /// Nodes moved to the trash or removed, the selected node included.
    pub affected: usize,
    /// Narrator copies removed alongside an Explorer delete.
    pub narrator_removed: usize,
    /// Elements dropped from the registry.
    pub released: usize,
}

/// Explorer outline tool operating on one open document.
pub struct OutlineService<'doc> {
    doc: &'doc mut StoryDocument,
}

impl<'doc> OutlineService<'doc> {
    pub fn new(doc: &'doc mut StoryDocument) -> Self {
        Self { doc }
    }

    /// Checks that `source` may start a drag.
    pub fn validate_drag_source(&self, source: Option<NodeId>) -> Result<NodeId, OutlineError> {
        let tree = self.doc.tree();
        let node = source
            .and_then(|id| tree.get(id))
            .ok_or(OutlineError::InvalidSelection)?;
        if node.parent().is_none() {
            return Err(OutlineError::ProtectedNode(node.id()));
        }
        if tree.is_in_trash(node.id()) {
            return Err(OutlineError::InvalidSource(node.id()));
        }
        Ok(node.id())
    }

    /// Checks that `target` may accept a drop.
    pub fn validate_drop_target(&self, target: Option<NodeId>) -> Result<NodeId, OutlineError> {
        let tree = self.doc.tree();
        let target = target
            .filter(|id| tree.contains(*id))
            .ok_or(OutlineError::InvalidSelection)?;
        if tree.depth(target) == Some(0) {
            return Err(OutlineError::InvalidDestination {
                node: target,
                issue: DestinationIssue::ViewRoot,
            });
        }
        if tree.is_in_trash(target) {
            return Err(OutlineError::InvalidDestination {
                node: target,
                issue: DestinationIssue::InTrash,
            });
        }
        Ok(target)
    }

    /// Drops `source` immediately before `target`.
    pub fn move_node(
        &mut self,
        source: Option<NodeId>,
        target: Option<NodeId>,
    ) -> Result<(), OutlineError> {
        let (source, target) = match self.validate_move(source, target) {
            Ok(pair) => pair,
            Err(err) => {
                warn!(
                    "event=outline_move module=outline status=rejected reason={:?}",
                    err
                );
                return Err(err);
            }
        };

        self.doc.tree_mut().move_node(source, target)?;
        let parent = self
            .doc
            .tree()
            .parent(source)
            .ok_or(OutlineError::Tree(TreeError::NodeNotFound(source)))?;
        info!(
            "event=outline_move module=outline status=ok node={} before={} parent={}",
            source, target, parent
        );
        self.doc.commit(TreeChange::NodeMoved {
            node: source,
            parent,
        });
        Ok(())
    }

    /// Deletes the selected node according to the view it lives in.
    ///
    /// - Explorer: subtree moves to the end of the trash; Narrator copies of
    ///   its elements are removed.
    /// - Narrator: subtree is removed from the Narrator view.
    /// - Trash: subtree is removed for good.
    pub fn delete_node(&mut self, selected: Option<NodeId>) -> Result<OutlineDelete, OutlineError> {
        let node = selected
            .and_then(|id| self.doc.tree().get(id))
            .ok_or(OutlineError::InvalidSelection)?;
        if node.is_root() || node.kind() == StoryItemType::TrashCan {
            warn!(
                "event=outline_delete module=outline status=rejected reason=protected node={}",
                node.id()
            );
            return Err(OutlineError::ProtectedNode(node.id()));
        }
        let (id, view, name) = (node.id(), node.view(), node.name().to_string());

        let outcome = match view {
            StoryViewType::Explorer => self.trash_explorer_node(id, name)?,
            StoryViewType::Narrator | StoryViewType::Trash => {
                let removed = self.doc.tree_mut().delete_node(id, view)?;
                let released = self.doc.release_orphans(&removed);
                self.doc.commit(TreeChange::NodeDeleted {
                    view,
                    removed: removed.len(),
                });
                OutlineDelete {
                    name,
                    view,
                    affected: removed.len(),
                    narrator_removed: 0,
                    released,
                }
            }
        };
        info!(
            "event=outline_delete module=outline status=ok node={} view={} affected={} released={}",
            id, view, outcome.affected, outcome.released
        );
        Ok(outcome)
    }

    /// Moves a top-level trash item back to the end of the Explorer view.
    pub fn restore_from_trash(&mut self, selected: Option<NodeId>) -> Result<(), OutlineError> {
        let tree = self.doc.tree();
        let node = selected
            .and_then(|id| tree.get(id))
            .ok_or(OutlineError::InvalidSelection)?;
        let id = node.id();
        if node.parent() != Some(tree.root(StoryViewType::Trash)) {
            warn!(
                "event=outline_restore module=outline status=rejected node={}",
                id
            );
            return Err(OutlineError::NotRestorable(id));
        }

        self.doc
            .tree_mut()
            .relocate_to_view_end(id, StoryViewType::Explorer)?;
        info!("event=outline_restore module=outline status=ok node={}", id);
        self.doc.commit(TreeChange::NodeRestored { node: id });
        Ok(())
    }

    /// Removes everything in the trash.
    ///
    /// Returns the number of removed nodes.
    pub fn empty_trash(&mut self) -> Result<usize, OutlineError> {
        let trash_root = self.doc.root(StoryViewType::Trash);
        let items = self.doc.tree().children(trash_root).to_vec();
        let mut removed: Vec<ElementId> = Vec::new();
        for item in items {
            removed.extend(self.doc.tree_mut().delete_node(item, StoryViewType::Trash)?);
        }
        if removed.is_empty() {
            return Ok(0);
        }

        let released = self.doc.release_orphans(&removed);
        info!(
            "event=outline_empty_trash module=outline status=ok removed={} released={}",
            removed.len(),
            released
        );
        self.doc.commit(TreeChange::TrashEmptied {
            removed: removed.len(),
        });
        Ok(removed.len())
    }

    /// Finds nodes of `view` whose name contains `query`, ignoring case.
    ///
    /// See [`search`].
    pub fn search(&self, view: StoryViewType, query: &str) -> Result<Vec<NodeId>, OutlineError> {
        search(&*self.doc, view, query)
    }

    fn validate_move(
        &self,
        source: Option<NodeId>,
        target: Option<NodeId>,
    ) -> Result<(NodeId, NodeId), OutlineError> {
        let source = self.validate_drag_source(source)?;
        let target = self.validate_drop_target(target)?;
        let tree = self.doc.tree();
        if tree.is_ancestor_or_self(source, target) {
            return Err(OutlineError::InvalidDestination {
                node: target,
                issue: DestinationIssue::OwnSubtree,
            });
        }
        let source_view = tree.get(source).map(|node| node.view());
        let target_view = tree.get(target).map(|node| node.view());
        if source_view != target_view {
            return Err(OutlineError::InvalidDestination {
                node: target,
                issue: DestinationIssue::OtherView,
            });
        }
        Ok((source, target))
    }

    fn trash_explorer_node(&mut self, id: NodeId, name: String) -> Result<OutlineDelete, OutlineError> {
        let tree = self.doc.tree();
        let moved: Vec<ElementId> = tree.flatten(id).map(|node| node.uuid()).collect();
        let narrator_root = tree.root(StoryViewType::Narrator);
        let narrator_copies: Vec<NodeId> = tree
            .flatten(narrator_root)
            .filter(|node| !node.is_root() && moved.contains(&node.uuid()))
            .map(|node| node.id())
            .collect();

        self.doc
            .tree_mut()
            .relocate_to_view_end(id, StoryViewType::Trash)?;
        let mut narrator_removed = 0;
        for copy in narrator_copies {
            // An earlier copy may have taken this one along as a descendant.
            if self.doc.tree().contains(copy) {
                narrator_removed += self
                    .doc
                    .tree_mut()
                    .delete_node(copy, StoryViewType::Narrator)?
                    .len();
            }
        }

        self.doc.commit(TreeChange::NodeTrashed { node: id });
        Ok(OutlineDelete {
            name,
            view: StoryViewType::Explorer,
            affected: moved.len(),
            narrator_removed,
            released: 0,
        })
    }
}

/// Finds nodes of `view` whose name contains `query`, ignoring case.
///
/// The query is matched literally. Results are in pre-order; the view root
/// is included when it matches.
///
/// # Errors
/// - `InvalidQuery` when `query` is blank.
pub fn search(
    doc: &StoryDocument,
    view: StoryViewType,
    query: &str,
) -> Result<Vec<NodeId>, OutlineError> {
    let needle = query.trim();
    if needle.is_empty() {
        return Err(OutlineError::InvalidQuery(query.to_string()));
    }
    let matcher = RegexBuilder::new(&regex::escape(needle))
        .case_insensitive(true)
        .build()
        .map_err(|_| OutlineError::InvalidQuery(query.to_string()))?;

    let tree = doc.tree();
    Ok(tree
        .flatten(tree.root(view))
        .filter(|node| matcher.is_match(node.name()))
        .map(|node| node.id())
        .collect())
}
