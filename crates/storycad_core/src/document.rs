//! Open-document context.
//!
//! # Responsibility
//! - Own the element registry and story tree of one open story.
//! - Track the unsaved-changes flag and fan change events out to observers.
//!
//! # Invariants
//! - Every node references an element present in the registry.
//! - An element leaves the registry only when its last placement is gone.
//! - Each successful command emits exactly one `TreeChange`.

use crate::config::DocumentConfig;
use crate::model::element::{ElementId, ElementValidationError, StoryElement, StoryItemType};
use crate::model::registry::{ElementRegistry, RegistryError};
use crate::tree::node::{NodeId, StoryViewType};
use crate::tree::snapshot::OutlineSnapshot;
use crate::tree::story_tree::{StoryTree, TreeError};
use log::debug;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from document-level editing helpers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// Element name or id failed validation.
    Element(ElementValidationError),
    /// Registry rejected the element.
    Registry(RegistryError),
    /// Tree rejected the placement or mutation.
    Tree(TreeError),
    /// No registered element has this id.
    ElementNotFound(ElementId),
    /// View roots cannot be created through editing helpers.
    InvalidKind(StoryItemType),
}

impl Display for DocumentError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Element(err) => write!(f, "{err}"),
            Self::Registry(err) => write!(f, "{err}"),
            Self::Tree(err) => write!(f, "{err}"),
            Self::ElementNotFound(id) => write!(f, "story element not found: {id}"),
            Self::InvalidKind(kind) => write!(f, "cannot add a {kind} element to an outline"),
        }
    }
}

impl Error for DocumentError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Element(err) => Some(err),
            Self::Registry(err) => Some(err),
            Self::Tree(err) => Some(err),
            Self::ElementNotFound(_) | Self::InvalidKind(_) => None,
        }
    }
}

impl From<ElementValidationError> for DocumentError {
    fn from(value: ElementValidationError) -> Self {
        Self::Element(value)
    }
}

impl From<RegistryError> for DocumentError {
    fn from(value: RegistryError) -> Self {
        Self::Registry(value)
    }
}

impl From<TreeError> for DocumentError {
    fn from(value: TreeError) -> Self {
        Self::Tree(value)
    }
}

/// Change notification delivered after a successful command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TreeChange {
    ElementAdded { node: NodeId, element: ElementId },
    ElementRenamed { element: ElementId, nodes: usize },
    NodesCopied { nodes: Vec<NodeId> },
    SectionCreated { node: NodeId },
    NodeMoved { node: NodeId, parent: NodeId },
    NodeDeleted { view: StoryViewType, removed: usize },
    NodeTrashed { node: NodeId },
    NodeRestored { node: NodeId },
    TrashEmptied { removed: usize },
}

impl TreeChange {
    fn event_name(&self) -> &'static str {
        match self {
            Self::ElementAdded { .. } => "element_added",
            Self::ElementRenamed { .. } => "element_renamed",
            Self::NodesCopied { .. } => "nodes_copied",
            Self::SectionCreated { .. } => "section_created",
            Self::NodeMoved { .. } => "node_moved",
            Self::NodeDeleted { .. } => "node_deleted",
            Self::NodeTrashed { .. } => "node_trashed",
            Self::NodeRestored { .. } => "node_restored",
            Self::TrashEmptied { .. } => "trash_emptied",
        }
    }
}

/// Presentation-side listener for outline changes.
pub trait TreeObserver {
    fn on_tree_changed(&mut self, change: &TreeChange);
}

/// One open story: registry, outline views, dirty flag and observers.
pub struct StoryDocument {
    registry: ElementRegistry,
    tree: StoryTree,
    changed: bool,
    observers: Vec<Box<dyn TreeObserver>>,
}

impl StoryDocument {
    /// Creates an empty story with default view root names.
    pub fn new(title: impl Into<String>) -> Result<Self, DocumentError> {
        Self::with_config(title, &DocumentConfig::default())
    }

    /// Creates an empty story whose Explorer root is named `title`.
    pub fn with_config(
        title: impl Into<String>,
        config: &DocumentConfig,
    ) -> Result<Self, DocumentError> {
        let overview = StoryElement::new(StoryItemType::Root, title)?;
        let narrator = StoryElement::new(StoryItemType::Root, config.narrator_view_name.as_str())?;
        let trash = StoryElement::new(StoryItemType::TrashCan, config.trash_name.as_str())?;
        let tree = StoryTree::new(&overview, &narrator, &trash)?;

        let mut registry = ElementRegistry::new();
        registry.insert(overview)?;
        registry.insert(narrator)?;
        registry.insert(trash)?;

        Ok(Self {
            registry,
            tree,
            changed: false,
            observers: Vec::new(),
        })
    }

    pub fn registry(&self) -> &ElementRegistry {
        &self.registry
    }

    #[cfg(test)]
    pub(crate) fn registry_mut(&mut self) -> &mut ElementRegistry {
        &mut self.registry
    }

    pub fn tree(&self) -> &StoryTree {
        &self.tree
    }

    pub(crate) fn tree_mut(&mut self) -> &mut StoryTree {
        &mut self.tree
    }

    /// Root node of one view.
    pub fn root(&self, view: StoryViewType) -> NodeId {
        self.tree.root(view)
    }

    pub fn element(&self, uuid: ElementId) -> Option<&StoryElement> {
        self.registry.get(uuid)
    }

    /// Whether there are changes since creation or the last `mark_saved`.
    pub fn is_changed(&self) -> bool {
        self.changed
    }

    /// Clears the unsaved-changes flag after an external save.
    pub fn mark_saved(&mut self) {
        self.changed = false;
    }

    /// Registers an observer for subsequent change events.
    pub fn subscribe(&mut self, observer: Box<dyn TreeObserver>) {
        self.observers.push(observer);
    }

    /// Creates a new element and places it as the last child of `parent`.
    ///
    /// # Errors
    /// - `InvalidKind` for `Root` and `TrashCan`.
    /// - Element validation and tree placement failures; nothing is
    ///   registered when placement fails.
    pub fn add_element(
        &mut self,
        parent: NodeId,
        kind: StoryItemType,
        name: impl Into<String>,
    ) -> Result<NodeId, DocumentError> {
        if matches!(kind, StoryItemType::Root | StoryItemType::TrashCan) {
            return Err(DocumentError::InvalidKind(kind));
        }
        let element = StoryElement::new(kind, name)?;
        let uuid = element.uuid;
        let node = self.insert_element(parent, element)?;
        self.commit(TreeChange::ElementAdded {
            node,
            element: uuid,
        });
        Ok(node)
    }

    /// Registers `element` and places it under `parent` without notifying.
    ///
    /// Nothing is registered when placement fails.
    pub(crate) fn insert_element(
        &mut self,
        parent: NodeId,
        element: StoryElement,
    ) -> Result<NodeId, DocumentError> {
        if self.registry.contains(element.uuid) {
            return Err(RegistryError::DuplicateElement(element.uuid).into());
        }
        let node = self.tree.place(parent, &element)?;
        self.registry.insert(element)?;
        Ok(node)
    }

    /// Renames an element and every node placing it.
    pub fn rename_element(
        &mut self,
        uuid: ElementId,
        name: impl Into<String>,
    ) -> Result<usize, DocumentError> {
        let element = self
            .registry
            .get_mut(uuid)
            .ok_or(DocumentError::ElementNotFound(uuid))?;
        element.rename(name)?;
        let name = element.name.clone();
        let nodes = self.tree.rename_element_nodes(uuid, &name);
        self.commit(TreeChange::ElementRenamed {
            element: uuid,
            nodes,
        });
        Ok(nodes)
    }

    /// Drops registry entries among `uuids` that no longer have any node.
    ///
    /// Returns the number of released elements.
    pub fn release_orphans(&mut self, uuids: &[ElementId]) -> usize {
        let mut released = 0;
        for uuid in uuids {
            if self.tree.placements(*uuid).is_empty() && self.registry.remove(*uuid).is_some() {
                released += 1;
            }
        }
        released
    }

    /// Nested read model of one view.
    pub fn snapshot(&self, view: StoryViewType) -> Option<OutlineSnapshot> {
        OutlineSnapshot::capture(&self.tree, view)
    }

    /// Marks the document changed and notifies observers.
    pub(crate) fn commit(&mut self, change: TreeChange) {
        self.changed = true;
        debug!(
            "event=tree_changed module=document status=ok change={} observers={}",
            change.event_name(),
            self.observers.len()
        );
        for observer in &mut self.observers {
            observer.on_tree_changed(&change);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DocumentError, StoryDocument, TreeChange, TreeObserver};
    use crate::model::element::StoryItemType;
    use crate::tree::node::StoryViewType;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder(Rc<RefCell<Vec<TreeChange>>>);

    impl TreeObserver for Recorder {
        fn on_tree_changed(&mut self, change: &TreeChange) {
            self.0.borrow_mut().push(change.clone());
        }
    }

    #[test]
    fn new_document_has_three_clean_roots() {
        let doc = StoryDocument::new("Hamlet").unwrap();
        assert_eq!(doc.tree().len(), 3);
        assert_eq!(doc.registry().len(), 3);
        assert!(!doc.is_changed());

        let narrator = doc.tree().get(doc.root(StoryViewType::Narrator)).unwrap();
        assert_eq!(narrator.name(), "Narrative View");
        let trash = doc.tree().get(doc.root(StoryViewType::Trash)).unwrap();
        assert_eq!(trash.kind(), StoryItemType::TrashCan);
    }

    #[test]
    fn add_element_notifies_and_marks_changed() {
        let mut doc = StoryDocument::new("Hamlet").unwrap();
        let events = Rc::new(RefCell::new(Vec::new()));
        doc.subscribe(Box::new(Recorder(events.clone())));

        let root = doc.root(StoryViewType::Explorer);
        let node = doc.add_element(root, StoryItemType::Scene, "Ghost").unwrap();

        assert!(doc.is_changed());
        let uuid = doc.tree().get(node).unwrap().uuid();
        assert_eq!(
            events.borrow().as_slice(),
            &[TreeChange::ElementAdded {
                node,
                element: uuid
            }]
        );

        doc.mark_saved();
        assert!(!doc.is_changed());
    }

    #[test]
    fn add_element_rejects_root_kinds_and_trash_parent() {
        let mut doc = StoryDocument::new("Hamlet").unwrap();
        let root = doc.root(StoryViewType::Explorer);
        let err = doc
            .add_element(root, StoryItemType::TrashCan, "Bin")
            .unwrap_err();
        assert_eq!(err, DocumentError::InvalidKind(StoryItemType::TrashCan));

        let trash = doc.root(StoryViewType::Trash);
        assert!(doc.add_element(trash, StoryItemType::Scene, "Lost").is_err());
        assert_eq!(doc.registry().len(), 3);
        assert!(!doc.is_changed());
    }

    #[test]
    fn rename_updates_every_placement() {
        let mut doc = StoryDocument::new("Hamlet").unwrap();
        let root = doc.root(StoryViewType::Explorer);
        let node = doc.add_element(root, StoryItemType::Scene, "Ghost").unwrap();
        let uuid = doc.tree().get(node).unwrap().uuid();

        let touched = doc.rename_element(uuid, "  The   Ghost ").unwrap();
        assert_eq!(touched, 1);
        assert_eq!(doc.tree().get(node).unwrap().name(), "The Ghost");
        assert_eq!(doc.element(uuid).unwrap().name, "The Ghost");
    }
}
