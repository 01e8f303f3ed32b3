//! Narrator view synchronization use-cases.
//!
//! # Responsibility
//! - Copy Explorer scenes into the Narrator view on demand.
//! - Delete nodes from the Narrator view and create Narrator sections.
//!
//! # Invariants
//! - The Narrator view never holds two nodes for the same element.
//! - Only `Scene` nodes are copied; folders and sections are walked through.
//! - Every candidate is validated before the first node is appended.
//! - A missing registry entry is a defect: logged at `error`, nothing mutated.

use crate::document::{DocumentError, StoryDocument, TreeChange};
use crate::model::element::{ElementId, StoryElement, StoryItemType};
use crate::tree::node::{NodeId, StoryViewType};
use crate::tree::story_tree::TreeError;
use log::{error, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from narrator use-cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NarrativeError {
    /// Nothing is selected.
    InvalidSelection,
    /// Selected node kind cannot be copied.
    InvalidSourceType { node: NodeId, kind: StoryItemType },
    /// Selected node sits in the trash.
    TrashedSource(NodeId),
    /// Scene already appears in the Narrator view.
    AlreadyPresent { node: NodeId, element: ElementId },
    /// View roots and the trash can cannot be deleted.
    ProtectedNode(NodeId),
    /// Delete target is not part of the Narrator view.
    NotInNarratorView(NodeId),
    /// Section name is blank.
    InvalidName,
    /// Node references an element the registry does not know.
    MissingElement { node: NodeId, element: ElementId },
    /// Structural failure from the story tree.
    Tree(TreeError),
    /// Document rejected a new element.
    Document(DocumentError),
}

impl NarrativeError {
    /// Short status line suitable for the tool's message area.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidSelection => "No node selected.",
            Self::InvalidSourceType { .. } => "You can't copy that.",
            Self::TrashedSource(_) => "You can't copy from the trash.",
            Self::AlreadyPresent { .. } => "This scene already appears in the narrative view.",
            Self::ProtectedNode(_) => "You can't delete this node!",
            Self::NotInNarratorView(_) => "You can't delete from here!",
            Self::InvalidName => "Section name can't be blank.",
            Self::MissingElement { .. } | Self::Tree(_) | Self::Document(_) => {
                "Error copying nodes."
            }
        }
    }
}

impl Display for NarrativeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSelection => write!(f, "no outline node selected"),
            Self::InvalidSourceType { node, kind } => {
                write!(f, "cannot copy {kind} node {node} to the narrator view")
            }
            Self::TrashedSource(node) => write!(f, "cannot copy trashed node {node}"),
            Self::AlreadyPresent { node, element } => write!(
                f,
                "element {element} of node {node} already appears in the narrator view"
            ),
            Self::ProtectedNode(node) => write!(f, "cannot delete protected node {node}"),
            Self::NotInNarratorView(node) => {
                write!(f, "node {node} is not in the narrator view")
            }
            Self::InvalidName => write!(f, "section name must not be blank"),
            Self::MissingElement { node, element } => write!(
                f,
                "node {node} references unregistered element {element}"
            ),
            Self::Tree(err) => write!(f, "{err}"),
            Self::Document(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NarrativeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Tree(err) => Some(err),
            Self::Document(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DocumentError> for NarrativeError {
    fn from(value: DocumentError) -> Self {
        match value {
            DocumentError::Tree(err) => Self::Tree(err),
            other => Self::Document(other),
        }
    }
}

impl From<TreeError> for NarrativeError {
    fn from(value: TreeError) -> Self {
        Self::Tree(value)
    }
}

/// Outcome of one copy command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyReport {
    /// Selected node kind, or `Root` for copy-all.
    pub source_kind: StoryItemType,
    /// Display name of the selection (Explorer root name for copy-all).
    pub source_name: String,
    /// New Narrator nodes, in append order.
    pub copied: Vec<NodeId>,
    /// Scenes skipped because they were already in the Narrator view.
    pub already_present: usize,
}

impl CopyReport {
    pub fn copied_count(&self) -> usize {
        self.copied.len()
    }
}

/// Outcome of one Narrator delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteReport {
    /// Display name of the deleted node.
    pub name: String,
    /// Nodes removed, the selected node included.
    pub removed: usize,
    /// Elements dropped from the registry because no placement remained.
    pub released: usize,
}

/// Narrator view tool operating on one open document.
pub struct NarrativeService<'doc> {
    doc: &'doc mut StoryDocument,
}

impl<'doc> NarrativeService<'doc> {
    pub fn new(doc: &'doc mut StoryDocument) -> Self {
        Self { doc }
    }

    /// Copies the selected scene, or every unused scene under the selected
    /// folder/section, to the end of the Narrator view.
    ///
    /// # Errors
    /// - `InvalidSelection` when `selected` is `None` or unknown.
    /// - `TrashedSource` when the selection is in the trash.
    /// - `AlreadyPresent` when a selected scene is already narrated.
    /// - `InvalidSourceType` for any kind other than scene/folder/section.
    /// - `MissingElement` when a candidate has no registry entry.
    pub fn copy_selected(&mut self, selected: Option<NodeId>) -> Result<CopyReport, NarrativeError> {
        let Some(selected) = selected else {
            warn!("event=narrative_copy module=narrative status=rejected reason=no_selection");
            return Err(NarrativeError::InvalidSelection);
        };
        let tree = self.doc.tree();
        let node = tree.get(selected).ok_or(NarrativeError::InvalidSelection)?;
        let (kind, name, uuid) = (node.kind(), node.name().to_string(), node.uuid());
        if tree.is_in_trash(selected) {
            warn!(
                "event=narrative_copy module=narrative status=rejected reason=trashed node={}",
                selected
            );
            return Err(NarrativeError::TrashedSource(selected));
        }

        info!(
            "event=narrative_copy module=narrative status=start node={} kind={}",
            selected, kind
        );
        if kind.is_copyable_to_narrator() {
            let narrator_root = tree.root(StoryViewType::Narrator);
            if tree.contains_element(narrator_root, uuid) {
                warn!(
                    "event=narrative_copy module=narrative status=rejected reason=already_present node={} element={}",
                    selected, uuid
                );
                return Err(NarrativeError::AlreadyPresent {
                    node: selected,
                    element: uuid,
                });
            }
            return self.append_scenes(kind, name, vec![selected]);
        }
        if kind.is_container() {
            let scenes = tree
                .flatten(selected)
                .skip(1)
                .filter(|node| node.kind().is_copyable_to_narrator())
                .map(|node| node.id())
                .collect();
            return self.append_scenes(kind, name, scenes);
        }

        warn!(
            "event=narrative_copy module=narrative status=rejected reason=source_type node={} kind={}",
            selected, kind
        );
        Err(NarrativeError::InvalidSourceType {
            node: selected,
            kind,
        })
    }

    /// Copies every Explorer scene missing from the Narrator view.
    ///
    /// Running it again right away copies nothing.
    pub fn copy_all_unused_scenes(&mut self) -> Result<CopyReport, NarrativeError> {
        let tree = self.doc.tree();
        let explorer_root = tree.root(StoryViewType::Explorer);
        let name = tree
            .get(explorer_root)
            .map(|node| node.name().to_string())
            .unwrap_or_default();
        let scenes = tree
            .children(explorer_root)
            .iter()
            .flat_map(move |top| tree.flatten(*top))
            .filter(|node| node.kind().is_copyable_to_narrator())
            .map(|node| node.id())
            .collect();
        self.append_scenes(StoryItemType::Root, name, scenes)
    }

    /// Removes the selected node (and its subtree) from the Narrator view.
    ///
    /// # Errors
    /// - `InvalidSelection` when `selected` is `None` or unknown.
    /// - `ProtectedNode` for the Narrator root, the Trash root and the trash can.
    /// - `NotInNarratorView` for nodes of any other view.
    pub fn delete_from_narrator(
        &mut self,
        selected: Option<NodeId>,
    ) -> Result<DeleteReport, NarrativeError> {
        let Some(selected) = selected else {
            warn!("event=narrative_delete module=narrative status=rejected reason=no_selection");
            return Err(NarrativeError::InvalidSelection);
        };
        let node = self
            .doc
            .tree()
            .get(selected)
            .ok_or(NarrativeError::InvalidSelection)?;
        if node.is_root() || node.kind() == StoryItemType::TrashCan {
            warn!(
                "event=narrative_delete module=narrative status=rejected reason=protected node={}",
                selected
            );
            return Err(NarrativeError::ProtectedNode(selected));
        }
        if node.view() != StoryViewType::Narrator {
            warn!(
                "event=narrative_delete module=narrative status=rejected reason=wrong_view node={} view={}",
                selected,
                node.view()
            );
            return Err(NarrativeError::NotInNarratorView(selected));
        }
        let name = node.name().to_string();

        let removed = self
            .doc
            .tree_mut()
            .delete_node(selected, StoryViewType::Narrator)?;
        let released = self.doc.release_orphans(&removed);
        info!(
            "event=narrative_delete module=narrative status=ok node={} removed={} released={}",
            selected,
            removed.len(),
            released
        );
        self.doc.commit(TreeChange::NodeDeleted {
            view: StoryViewType::Narrator,
            removed: removed.len(),
        });
        Ok(DeleteReport {
            name,
            removed: removed.len(),
            released,
        })
    }

    /// Appends a new section element to the Narrator root.
    pub fn create_section(&mut self, name: &str) -> Result<NodeId, NarrativeError> {
        let element = StoryElement::new(StoryItemType::Section, name)
            .map_err(|_| NarrativeError::InvalidName)?;
        let uuid = element.uuid;
        let narrator_root = self.doc.root(StoryViewType::Narrator);
        let node = self.doc.insert_element(narrator_root, element)?;
        info!(
            "event=narrative_section module=narrative status=ok node={} element={}",
            node, uuid
        );
        self.doc.commit(TreeChange::SectionCreated { node });
        Ok(node)
    }

    /// Validates every candidate scene, then appends the ones not yet present.
    fn append_scenes(
        &mut self,
        source_kind: StoryItemType,
        source_name: String,
        candidates: Vec<NodeId>,
    ) -> Result<CopyReport, NarrativeError> {
        let mut elements = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let uuid = self
                .doc
                .tree()
                .get(candidate)
                .map(|node| node.uuid())
                .ok_or(NarrativeError::InvalidSelection)?;
            let Some(element) = self.doc.registry().get(uuid) else {
                error!(
                    "event=narrative_copy module=narrative status=error reason=registry_miss node={} element={}",
                    candidate, uuid
                );
                return Err(NarrativeError::MissingElement {
                    node: candidate,
                    element: uuid,
                });
            };
            elements.push(element.clone());
        }

        let narrator_root = self.doc.root(StoryViewType::Narrator);
        let mut copied = Vec::new();
        let mut already_present = 0;
        for element in &elements {
            if self.doc.tree().contains_element(narrator_root, element.uuid) {
                already_present += 1;
                continue;
            }
            let node = self.doc.tree_mut().place(narrator_root, element)?;
            info!(
                "event=narrative_copy module=narrative status=ok node={} element={}",
                node, element.uuid
            );
            copied.push(node);
        }

        info!(
            "event=narrative_copy module=narrative status=done source_kind={} copied={} already_present={}",
            source_kind,
            copied.len(),
            already_present
        );
        if !copied.is_empty() {
            self.doc.commit(TreeChange::NodesCopied {
                nodes: copied.clone(),
            });
        }
        Ok(CopyReport {
            source_kind,
            source_name,
            copied,
            already_present,
        })
    }
}
