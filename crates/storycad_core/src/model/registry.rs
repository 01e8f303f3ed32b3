//! Element registry owned by one open document.
//!
//! # Responsibility
//! - Map element ids to the canonical `StoryElement` records.
//! - Reject duplicate identities at insertion time.
//!
//! # Invariants
//! - Each `ElementId` maps to exactly one element.
//! - Iteration order is deterministic (`ElementId` ascending).

use crate::model::element::{ElementId, StoryElement};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Registry mutation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// An element with the same id is already registered.
    DuplicateElement(ElementId),
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateElement(id) => write!(f, "element already registered: {id}"),
        }
    }
}

impl Error for RegistryError {}

/// Id-to-element map for one document.
#[derive(Debug, Clone, Default)]
pub struct ElementRegistry {
    elements: BTreeMap<ElementId, StoryElement>,
}

impl ElementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one element.
    pub fn insert(&mut self, element: StoryElement) -> Result<ElementId, RegistryError> {
        let uuid = element.uuid;
        if self.elements.contains_key(&uuid) {
            return Err(RegistryError::DuplicateElement(uuid));
        }
        self.elements.insert(uuid, element);
        Ok(uuid)
    }

    pub fn get(&self, uuid: ElementId) -> Option<&StoryElement> {
        self.elements.get(&uuid)
    }

    pub fn get_mut(&mut self, uuid: ElementId) -> Option<&mut StoryElement> {
        self.elements.get_mut(&uuid)
    }

    /// Removes and returns one element, if present.
    pub fn remove(&mut self, uuid: ElementId) -> Option<StoryElement> {
        self.elements.remove(&uuid)
    }

    pub fn contains(&self, uuid: ElementId) -> bool {
        self.elements.contains_key(&uuid)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StoryElement> {
        self.elements.values()
    }
}
