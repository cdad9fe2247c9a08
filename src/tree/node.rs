use indexmap::IndexMap;
use serde::Serialize;

use super::TreeError;

/// An insertion-order-preserving mapping from key to child node.
///
/// Insertion order determines the order sections and keys are written
/// back to the backing file, so output stays stable across rewrites.
pub type Branch = IndexMap<String, SectionNode>;

/// A single node in the configuration tree.
///
/// Every value is stored as a string; the backing format performs no type
/// coercion. All traversal logic dispatches on the variant tag explicitly.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SectionNode {
    /// A flat `key = value` entry.
    Leaf(String),
    /// A named section holding further keys or subsections.
    Branch(Branch),
}

impl SectionNode {
    /// Returns the children if this node is a section.
    pub fn as_branch(&self) -> Option<&Branch> {
        match self {
            SectionNode::Branch(children) => Some(children),
            SectionNode::Leaf(_) => None,
        }
    }

    /// Returns the children mutably if this node is a section.
    pub fn as_branch_mut(&mut self) -> Option<&mut Branch> {
        match self {
            SectionNode::Branch(children) => Some(children),
            SectionNode::Leaf(_) => None,
        }
    }

    /// Returns the value if this node is a flat entry.
    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            SectionNode::Leaf(value) => Some(value),
            SectionNode::Branch(_) => None,
        }
    }

    /// Whether this node is a section.
    pub fn is_branch(&self) -> bool {
        matches!(self, SectionNode::Branch(_))
    }
}

/// The root of the configuration tree: top-level sections by name.
///
/// The root itself behaves as a synthetic section; values never live
/// directly at the root because the backing format has no place to put
/// a key that precedes every header.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct ConfigTree {
    root: Branch,
}

impl ConfigTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// The top-level sections.
    pub fn root(&self) -> &Branch {
        &self.root
    }

    /// The top-level sections, mutably.
    pub fn root_mut(&mut self) -> &mut Branch {
        &mut self.root
    }

    /// Whether the tree has no sections at all.
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }
}

/// Validates a single section or key name against the backing format.
///
/// Rejects names that are empty or contain a character the format treats
/// as structural, so a programmatic insert can never produce text that
/// fails to round-trip.
///
/// # Errors
/// Returns `TreeError::InvalidComponent` if the name is unusable.
pub fn validate_component(name: &str) -> Result<(), TreeError> {
    const STRUCTURAL: &[char] = &['[', ']', '=', '.', '#', ';', '\n', '\r'];

    if name.trim().is_empty() || name.contains(STRUCTURAL) {
        return Err(TreeError::InvalidComponent(name.to_string()));
    }

    Ok(())
}
