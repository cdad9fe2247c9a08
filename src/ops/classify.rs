use serde::Serialize;

use crate::store::ConfigStore;
use crate::tree::{SectionNode, SectionPath, resolve_branch};

use super::OpError;

/// Whether a node is a section or a flat value, for presentation layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// A section that can hold further entries.
    Section,
    /// A flat `key = value` entry.
    Value,
}

/// One child of a resolved section, with everything the presentation
/// layer needs to render it.
#[derive(Debug, Clone, Serialize)]
pub struct ChildEntry {
    /// The child's key within its section.
    pub name: String,
    /// The full dotted path of the child.
    pub path: String,
    /// Whether the child is a section or a value.
    pub kind: NodeKind,
    /// The value, for flat entries.
    pub value: Option<String>,
    /// Whether the child is a buildable unit.
    pub buildable: bool,
}

/// Classifies a section as a buildable unit.
///
/// A section is buildable iff its path is exactly `application`, exactly
/// `library`, or names a direct child of `library`. Classification is
/// purely positional; resolution itself never special-cases these names.
pub fn is_buildable_unit(path: &SectionPath) -> bool {
    match path.segments() {
        [top] => top.as_str() == "application" || top.as_str() == "library",
        [top, _] => top.as_str() == "library",
        _ => false,
    }
}

/// Lists the children of the section at `path` (the root for an empty
/// path), in insertion order.
///
/// # Errors
/// Returns `OpError::SectionNotFound` if the path is absent or lands on
/// a value.
pub fn children_of(store: &ConfigStore, path: &SectionPath) -> Result<Vec<ChildEntry>, OpError> {
    let tree = store.snapshot();
    let children =
        resolve_branch(&tree, path).map_err(|_| OpError::SectionNotFound(path.to_string()))?;

    Ok(children
        .iter()
        .map(|(name, node)| {
            let child_path = path.child(name);
            let (kind, value) = match node {
                SectionNode::Branch(_) => (NodeKind::Section, None),
                SectionNode::Leaf(value) => (NodeKind::Value, Some(value.clone())),
            };

            ChildEntry {
                name: name.clone(),
                buildable: kind == NodeKind::Section && is_buildable_unit(&child_path),
                path: child_path.to_string(),
                kind,
                value,
            }
        })
        .collect())
}
