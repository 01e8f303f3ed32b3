//! Outline node handles and read model.

use crate::model::element::{ElementId, StoryElement, StoryItemType};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Arena handle for one outline node.
///
/// Handles are never reused within one tree, so a stale handle resolves to
/// `None` instead of aliasing a newer node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Raw arena index, stable for the lifetime of the tree.
    pub fn index(self) -> usize {
        self.0
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Outline view a node belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoryViewType {
    /// Primary structural outline.
    Explorer,
    /// Scenes in reading order.
    Narrator,
    /// Quarantine for deleted elements.
    Trash,
}

impl StoryViewType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Explorer => "explorer",
            Self::Narrator => "narrator",
            Self::Trash => "trash",
        }
    }
}

impl Display for StoryViewType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Placement of one story element inside one view.
///
/// `parent` is navigational only; the arena owns every node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryNodeItem {
    pub(crate) id: NodeId,
    pub(crate) uuid: ElementId,
    pub(crate) name: String,
    pub(crate) kind: StoryItemType,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) view: StoryViewType,
    pub(crate) is_root: bool,
}

impl StoryNodeItem {
    pub(crate) fn new(
        id: NodeId,
        element: &StoryElement,
        parent: Option<NodeId>,
        view: StoryViewType,
    ) -> Self {
        Self {
            id,
            uuid: element.uuid,
            name: element.name.clone(),
            kind: element.kind,
            parent,
            children: Vec::new(),
            view,
            is_root: parent.is_none(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Id of the referenced element.
    pub fn uuid(&self) -> ElementId {
        self.uuid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> StoryItemType {
        self.kind
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn view(&self) -> StoryViewType {
        self.view
    }

    pub fn is_root(&self) -> bool {
        self.is_root
    }
}
