use std::fmt;

use super::{Branch, ConfigTree, SectionNode, TreeError};

/// A dotted path addressing one node from the root of the tree.
///
/// The display form (`library.mathlib`) and the parse form are exact
/// inverses: a path built while walking down the tree always resolves
/// back to the same node when fed to [`resolve`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SectionPath {
    segments: Vec<String>,
}

impl SectionPath {
    /// The empty path, addressing the synthetic root section.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parses a dotted path. Empty text yields the root path; empty
    /// segments (stray or doubled dots) are dropped.
    pub fn parse(text: &str) -> Self {
        let segments = text
            .split('.')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();

        Self { segments }
    }

    /// Builds a path from owned segments.
    pub fn from_segments(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// The individual key segments, root-first.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Whether this is the empty (root) path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The path of this node's child named `name`.
    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        Self { segments }
    }

    /// The path with the final segment removed, or `None` at the root.
    pub fn parent(&self) -> Option<Self> {
        if self.segments.is_empty() {
            return None;
        }

        Some(Self {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// The final segment, or `None` at the root.
    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }
}

impl fmt::Display for SectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl From<&str> for SectionPath {
    fn from(text: &str) -> Self {
        Self::parse(text)
    }
}

/// A resolved node reference. The root is a synthetic section with no
/// node of its own, so resolution distinguishes it structurally.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'t> {
    /// The path landed on a section (including the root).
    Branch(&'t Branch),
    /// The path landed on a flat value.
    Leaf(&'t str),
}

/// Walks `path` down from the root of `tree`.
///
/// Every segment but the last must name an existing section; descending
/// through a value fails with `NotABranch` and a missing segment fails
/// with `NotFound`. Neither is used for control flow elsewhere.
///
/// # Errors
/// Returns `TreeError::NotFound` or `TreeError::NotABranch` as above.
pub fn resolve<'t>(tree: &'t ConfigTree, path: &SectionPath) -> Result<NodeRef<'t>, TreeError> {
    let mut current = tree.root();

    for (depth, segment) in path.segments().iter().enumerate() {
        let walked = || path.segments()[..=depth].join(".");

        let node = current
            .get(segment)
            .ok_or_else(|| TreeError::NotFound(walked()))?;

        if depth == path.segments().len() - 1 {
            return Ok(match node {
                SectionNode::Branch(children) => NodeRef::Branch(children),
                SectionNode::Leaf(value) => NodeRef::Leaf(value),
            });
        }

        current = node
            .as_branch()
            .ok_or_else(|| TreeError::NotABranch(walked()))?;
    }

    Ok(NodeRef::Branch(tree.root()))
}

/// Resolves `path` and requires the result to be a section.
///
/// # Errors
/// Returns `TreeError::NotFound` or `TreeError::NotABranch` if the path
/// is absent or lands on a value.
pub fn resolve_branch<'t>(tree: &'t ConfigTree, path: &SectionPath) -> Result<&'t Branch, TreeError> {
    match resolve(tree, path)? {
        NodeRef::Branch(children) => Ok(children),
        NodeRef::Leaf(_) => Err(TreeError::NotABranch(path.to_string())),
    }
}

/// Mutable counterpart of [`resolve_branch`], used by in-place edits.
///
/// # Errors
/// Returns `TreeError::NotFound` or `TreeError::NotABranch` if the path
/// is absent or lands on a value.
pub fn resolve_branch_mut<'t>(
    tree: &'t mut ConfigTree,
    path: &SectionPath,
) -> Result<&'t mut Branch, TreeError> {
    let mut current = tree.root_mut();

    for (depth, segment) in path.segments().iter().enumerate() {
        let walked = path.segments()[..=depth].join(".");

        let node = current
            .get_mut(segment)
            .ok_or(TreeError::NotFound(walked.clone()))?;

        current = node
            .as_branch_mut()
            .ok_or(TreeError::NotABranch(walked))?;
    }

    Ok(current)
}
