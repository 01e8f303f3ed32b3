//! Serializable outline read model for presentation layers.

use crate::model::element::{ElementId, StoryItemType};
use crate::tree::node::{NodeId, StoryNodeItem, StoryViewType};
use crate::tree::story_tree::StoryTree;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Nested copy of one node and its descendants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub node_id: NodeId,
    pub uuid: ElementId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: StoryItemType,
    pub children: Vec<NodeSnapshot>,
}

/// Snapshot of one whole view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineSnapshot {
    pub view: StoryViewType,
    pub root: NodeSnapshot,
}

impl OutlineSnapshot {
    /// Captures the current state of `view`.
    pub fn capture(tree: &StoryTree, view: StoryViewType) -> Option<Self> {
        let root = snapshot_node(tree, tree.root(view))?;
        Some(Self { view, root })
    }

    /// Renders the outline as indented lines, two spaces per level.
    pub fn to_indented_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        let mut stack = vec![(&self.root, 0usize)];
        while let Some((node, level)) = stack.pop() {
            lines.push(format!("{}{} ({})", "  ".repeat(level), node.name, node.kind));
            stack.extend(node.children.iter().rev().map(|child| (child, level + 1)));
        }
        lines
    }
}

/// Builds the nested snapshot bottom-up from one iterative pre-order walk.
fn snapshot_node(tree: &StoryTree, id: NodeId) -> Option<NodeSnapshot> {
    let order: Vec<&StoryNodeItem> = tree.flatten(id).collect();
    let mut built: HashMap<NodeId, NodeSnapshot> = HashMap::with_capacity(order.len());
    // Reverse pre-order visits every child before its parent.
    for node in order.into_iter().rev() {
        let children = node
            .children()
            .iter()
            .filter_map(|child| built.remove(child))
            .collect();
        built.insert(
            node.id(),
            NodeSnapshot {
                node_id: node.id(),
                uuid: node.uuid(),
                name: node.name().to_string(),
                kind: node.kind(),
                children,
            },
        );
    }
    built.remove(&id)
}
