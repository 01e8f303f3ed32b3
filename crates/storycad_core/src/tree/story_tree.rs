//! Arena-backed multi-view story outline.
//!
//! # Responsibility
//! - Hold the Explorer, Narrator and Trash hierarchies in one node arena.
//! - Provide structural queries and the few mutations the outline allows.
//!
//! # Invariants
//! - Exactly one root per view; roots have no parent.
//! - A node's `parent` and its parent's `children` always agree.
//! - Within one view no two nodes reference the same element id.
//! - Failed mutations leave the tree untouched.

use crate::model::element::{ElementId, StoryElement, StoryItemType};
use crate::tree::node::{NodeId, StoryNodeItem, StoryViewType};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by story tree operations.
pub type TreeResult<T> = Result<T, TreeError>;

/// Structural errors from story tree operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Handle does not resolve to a live node.
    NodeNotFound(NodeId),
    /// Node is a view root or the trash can and cannot be moved or deleted.
    ProtectedNode(NodeId),
    /// Node cannot be used as a move source (e.g. it sits in the trash).
    InvalidSource(NodeId),
    /// Node cannot be used as a move or placement destination.
    InvalidDestination(NodeId),
    /// Node does not belong to the view the caller named.
    WrongView {
        node: NodeId,
        view: StoryViewType,
    },
    /// Element already has a node in the target view.
    DuplicatePlacement {
        element: ElementId,
        view: StoryViewType,
    },
    /// Root element kind does not match the view role.
    InvalidRoot {
        view: StoryViewType,
        kind: StoryItemType,
    },
}

impl Display for TreeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NodeNotFound(id) => write!(f, "outline node not found: {id}"),
            Self::ProtectedNode(id) => write!(f, "outline node is protected: {id}"),
            Self::InvalidSource(id) => write!(f, "outline node cannot be moved: {id}"),
            Self::InvalidDestination(id) => {
                write!(f, "outline node is not a valid destination: {id}")
            }
            Self::WrongView { node, view } => {
                write!(f, "outline node {node} is not in the {view} view")
            }
            Self::DuplicatePlacement { element, view } => {
                write!(f, "element {element} already appears in the {view} view")
            }
            Self::InvalidRoot { view, kind } => {
                write!(f, "{view} view cannot be rooted at a {kind} element")
            }
        }
    }
}

impl Error for TreeError {}

/// Multi-rooted outline arena.
#[derive(Debug, Clone)]
pub struct StoryTree {
    nodes: Vec<Option<StoryNodeItem>>,
    live: usize,
    explorer_root: NodeId,
    narrator_root: NodeId,
    trash_root: NodeId,
}

impl StoryTree {
    /// Creates a tree with one root per view.
    ///
    /// # Errors
    /// - `InvalidRoot` when Explorer/Narrator roots are not `Root` elements or
    ///   the trash root is not a `TrashCan` element.
    pub fn new(
        explorer: &StoryElement,
        narrator: &StoryElement,
        trash: &StoryElement,
    ) -> TreeResult<Self> {
        for (view, element, expected) in [
            (StoryViewType::Explorer, explorer, StoryItemType::Root),
            (StoryViewType::Narrator, narrator, StoryItemType::Root),
            (StoryViewType::Trash, trash, StoryItemType::TrashCan),
        ] {
            if element.kind != expected {
                return Err(TreeError::InvalidRoot {
                    view,
                    kind: element.kind,
                });
            }
        }

        let mut tree = Self {
            nodes: Vec::new(),
            live: 0,
            explorer_root: NodeId(0),
            narrator_root: NodeId(0),
            trash_root: NodeId(0),
        };
        tree.explorer_root = tree.alloc(explorer, None, StoryViewType::Explorer);
        tree.narrator_root = tree.alloc(narrator, None, StoryViewType::Narrator);
        tree.trash_root = tree.alloc(trash, None, StoryViewType::Trash);
        Ok(tree)
    }

    /// Returns the root node of one view.
    pub fn root(&self, view: StoryViewType) -> NodeId {
        match view {
            StoryViewType::Explorer => self.explorer_root,
            StoryViewType::Narrator => self.narrator_root,
            StoryViewType::Trash => self.trash_root,
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&StoryNodeItem> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(StoryNodeItem::parent)
    }

    /// Returns direct children, or an empty slice for unknown handles.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(StoryNodeItem::children).unwrap_or(&[])
    }

    /// Number of ancestors above `id`; view roots are depth 0.
    pub fn depth(&self, id: NodeId) -> Option<usize> {
        let mut cursor = self.get(id)?;
        let mut depth = 0;
        while let Some(parent) = cursor.parent {
            cursor = self.get(parent)?;
            depth += 1;
        }
        Some(depth)
    }

    /// Walks parents up to the root of the view holding `id`.
    pub fn view_root_of(&self, id: NodeId) -> Option<NodeId> {
        let mut cursor = self.get(id)?;
        while let Some(parent) = cursor.parent {
            cursor = self.get(parent)?;
        }
        Some(cursor.id)
    }

    /// Whether `id` lives under (or is) the trash root.
    pub fn is_in_trash(&self, id: NodeId) -> bool {
        self.view_root_of(id) == Some(self.trash_root)
    }

    /// Number of live nodes across all views.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Number of nodes in one view, root included.
    pub fn view_len(&self, view: StoryViewType) -> usize {
        self.flatten(self.root(view)).count()
    }

    /// Pre-order traversal of the subtree rooted at `id` (root first).
    ///
    /// Unknown handles produce an empty sequence.
    pub fn flatten(&self, id: NodeId) -> Flatten<'_> {
        let stack = if self.contains(id) { vec![id] } else { Vec::new() };
        Flatten { tree: self, stack }
    }

    /// Whether any node under `root` references `uuid`.
    pub fn contains_element(&self, root: NodeId, uuid: ElementId) -> bool {
        self.flatten(root).any(|node| node.uuid == uuid)
    }

    /// Returns every node referencing `uuid`, in arena order.
    pub fn placements(&self, uuid: ElementId) -> Vec<NodeId> {
        self.nodes
            .iter()
            .flatten()
            .filter(|node| node.uuid == uuid)
            .map(|node| node.id)
            .collect()
    }

    /// Appends a node for `element` as the last child of `parent`.
    ///
    /// The new node joins `parent`'s view.
    ///
    /// # Errors
    /// - `NodeNotFound` when `parent` is unknown.
    /// - `InvalidDestination` when `parent` is in the trash.
    /// - `DuplicatePlacement` when the element already appears in that view.
    pub fn place(&mut self, parent: NodeId, element: &StoryElement) -> TreeResult<NodeId> {
        let view = self.node(parent)?.view;
        if view == StoryViewType::Trash {
            return Err(TreeError::InvalidDestination(parent));
        }
        if self.contains_element(self.root(view), element.uuid) {
            return Err(TreeError::DuplicatePlacement {
                element: element.uuid,
                view,
            });
        }

        let id = self.alloc(element, Some(parent), view);
        self.node_mut(parent)?.children.push(id);
        Ok(id)
    }

    /// Moves `source` to sit immediately before `target` among `target`'s
    /// siblings.
    ///
    /// # Errors
    /// - `NodeNotFound` when either handle is unknown.
    /// - `ProtectedNode` when `source` is a view root.
    /// - `InvalidSource` when `source` is in the trash.
    /// - `InvalidDestination` when `target` is a view root, is in the trash,
    ///   lives in another view, or lies inside `source`'s own subtree.
    pub fn move_node(&mut self, source: NodeId, target: NodeId) -> TreeResult<()> {
        let source_node = self.node(source)?;
        let target_node = self.node(target)?;

        let Some(old_parent) = source_node.parent else {
            return Err(TreeError::ProtectedNode(source));
        };
        if self.is_in_trash(source) {
            return Err(TreeError::InvalidSource(source));
        }
        let Some(new_parent) = target_node.parent else {
            return Err(TreeError::InvalidDestination(target));
        };
        if self.is_in_trash(target)
            || source_node.view != target_node.view
            || self.is_ancestor_or_self(source, target)
        {
            return Err(TreeError::InvalidDestination(target));
        }
        if !self.children(new_parent).contains(&target) {
            return Err(TreeError::NodeNotFound(target));
        }

        self.detach(source, old_parent)?;
        let siblings = &mut self.node_mut(new_parent)?.children;
        let index = siblings
            .iter()
            .position(|child| *child == target)
            .unwrap_or(siblings.len());
        siblings.insert(index, source);
        self.node_mut(source)?.parent = Some(new_parent);
        Ok(())
    }

    /// Removes `id` and its whole subtree from `view`.
    ///
    /// Returns the element ids whose nodes were removed, in pre-order.
    ///
    /// # Errors
    /// - `NodeNotFound` when `id` is unknown.
    /// - `ProtectedNode` for view roots and the trash can.
    /// - `WrongView` when `id` is not part of `view`.
    pub fn delete_node(&mut self, id: NodeId, view: StoryViewType) -> TreeResult<Vec<ElementId>> {
        let node = self.node(id)?;
        if node.is_root || node.kind == StoryItemType::TrashCan {
            return Err(TreeError::ProtectedNode(id));
        }
        if node.view != view {
            return Err(TreeError::WrongView { node: id, view });
        }
        let Some(parent) = node.parent else {
            return Err(TreeError::ProtectedNode(id));
        };

        let doomed: Vec<NodeId> = self.flatten(id).map(StoryNodeItem::id).collect();
        self.detach(id, parent)?;

        let mut removed = Vec::with_capacity(doomed.len());
        for node_id in doomed {
            if let Some(node) = self.nodes.get_mut(node_id.0).and_then(Option::take) {
                removed.push(node.uuid);
                self.live -= 1;
            }
        }
        Ok(removed)
    }

    /// Moves a subtree to the end of another view's root, re-flagging every
    /// moved node with the new view.
    ///
    /// # Errors
    /// - `ProtectedNode` for view roots and the trash can.
    /// - `InvalidDestination` when `id` already belongs to `view`.
    /// - `DuplicatePlacement` when any moved element already appears in `view`.
    pub fn relocate_to_view_end(&mut self, id: NodeId, view: StoryViewType) -> TreeResult<()> {
        let node = self.node(id)?;
        if node.is_root || node.kind == StoryItemType::TrashCan {
            return Err(TreeError::ProtectedNode(id));
        }
        let destination = self.root(view);
        if node.view == view {
            return Err(TreeError::InvalidDestination(destination));
        }
        let Some(old_parent) = node.parent else {
            return Err(TreeError::ProtectedNode(id));
        };

        let moved: Vec<(NodeId, ElementId)> = self
            .flatten(id)
            .map(|node| (node.id, node.uuid))
            .collect();
        if let Some((_, element)) = moved
            .iter()
            .find(|(_, uuid)| self.contains_element(destination, *uuid))
        {
            return Err(TreeError::DuplicatePlacement {
                element: *element,
                view,
            });
        }

        self.detach(id, old_parent)?;
        self.node_mut(destination)?.children.push(id);
        self.node_mut(id)?.parent = Some(destination);
        for (node_id, _) in moved {
            self.node_mut(node_id)?.view = view;
        }
        Ok(())
    }

    /// Updates the display name on every node referencing `uuid`.
    ///
    /// Returns the number of nodes touched.
    pub fn rename_element_nodes(&mut self, uuid: ElementId, name: &str) -> usize {
        let mut touched = 0;
        for node in self.nodes.iter_mut().flatten() {
            if node.uuid == uuid {
                node.name = name.to_string();
                touched += 1;
            }
        }
        touched
    }

    fn alloc(
        &mut self,
        element: &StoryElement,
        parent: Option<NodeId>,
        view: StoryViewType,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes
            .push(Some(StoryNodeItem::new(id, element, parent, view)));
        self.live += 1;
        id
    }

    fn node(&self, id: NodeId) -> TreeResult<&StoryNodeItem> {
        self.get(id).ok_or(TreeError::NodeNotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> TreeResult<&mut StoryNodeItem> {
        self.nodes
            .get_mut(id.0)
            .and_then(Option::as_mut)
            .ok_or(TreeError::NodeNotFound(id))
    }

    fn detach(&mut self, id: NodeId, parent: NodeId) -> TreeResult<()> {
        self.node_mut(parent)?.children.retain(|child| *child != id);
        self.node_mut(id)?.parent = None;
        Ok(())
    }

    /// Whether `ancestor` is `id` or one of its ancestors.
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }
}

/// Iterative pre-order walk over one subtree.
///
/// Borrowing the tree keeps the walk a pure read; calling
/// [`StoryTree::flatten`] again restarts it.
pub struct Flatten<'a> {
    tree: &'a StoryTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Flatten<'a> {
    type Item = &'a StoryNodeItem;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            if let Some(node) = self.tree.get(id) {
                self.stack.extend(node.children.iter().rev().copied());
                return Some(node);
            }
        }
        None
    }
}
