use serde::Serialize;
use tracing::{debug, instrument};

use crate::store::ConfigStore;
use crate::tree::{SectionNode, SectionPath, resolve_branch_mut};

use super::OpError;

/// The key under which a buildable unit stores its dependency list.
pub(super) const DEPENDENCIES_KEY: &str = "dependencies";

/// The result of a dependency add: duplicate adds succeed with a
/// distinct no-change signal instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DependencyOutcome {
    /// The dependency was appended and persisted.
    Added,
    /// The dependency was already listed; nothing was written.
    AlreadyPresent,
}

/// Splits a stored dependency string into its entries.
///
/// Entries are comma-separated; whitespace around each entry is trimmed
/// and empty or duplicate entries are dropped, so a hand-corrupted file
/// normalizes on the next write. Order of first appearance is kept.
pub fn parse_dependency_list(raw: &str) -> Vec<String> {
    let mut entries: Vec<String> = Vec::new();

    for part in raw.split(',') {
        let entry = part.trim();
        if !entry.is_empty() && !entries.iter().any(|existing| existing == entry) {
            entries.push(entry.to_string());
        }
    }

    entries
}

/// Joins dependency entries into the canonical stored form: commas, no
/// surrounding spaces. Read tolerates spaces; write never emits them.
pub fn join_dependency_list(entries: &[String]) -> String {
    entries.join(",")
}

/// Appends `name` to the dependency list of the section at `section`,
/// unless it is already listed.
///
/// The list is re-read against the current tree inside the commit, so a
/// reload that happened since the caller last looked cannot be clobbered.
/// An add that finds the name already present is a no-op reported as
/// [`DependencyOutcome::AlreadyPresent`].
///
/// # Errors
/// * `OpError::SectionNotFound` - the section is absent.
/// * `OpError::InvalidName` - the name fails the allow-list pattern.
/// * `OpError::Store` - persistence failed; nothing was written.
#[instrument(skip(store))]
pub fn add_dependency(
    store: &ConfigStore,
    section: &SectionPath,
    name: &str,
) -> Result<DependencyOutcome, OpError> {
    let name = name.trim();
    if !super::library::is_valid_name(name) {
        return Err(OpError::InvalidName(name.to_string()));
    }

    // Cheap pre-check on a snapshot so a duplicate add never rewrites
    // the file at all.
    if dependency_listed(store, section, name)? {
        debug!("Dependency already present; nothing to do");
        return Ok(DependencyOutcome::AlreadyPresent);
    }

    let mut outcome = DependencyOutcome::Added;

    store.commit(|tree| {
        let children = resolve_branch_mut(tree, section)
            .map_err(|_| OpError::SectionNotFound(section.to_string()))?;

        let current = match children.get(DEPENDENCIES_KEY) {
            Some(SectionNode::Leaf(value)) => value.as_str(),
            Some(SectionNode::Branch(_)) => {
                return Err(OpError::Tree(crate::tree::TreeError::NotALeaf(
                    section.child(DEPENDENCIES_KEY).to_string(),
                )));
            }
            None => "",
        };

        let mut entries = parse_dependency_list(current);
        if entries.iter().any(|entry| entry == name) {
            // The tree changed between the snapshot check and the
            // commit; still a no-op, still a success.
            outcome = DependencyOutcome::AlreadyPresent;
            return Ok(());
        }

        entries.push(name.to_string());
        children.insert(
            DEPENDENCIES_KEY.to_string(),
            SectionNode::Leaf(join_dependency_list(&entries)),
        );

        Ok(())
    })?;

    Ok(outcome)
}

fn dependency_listed(
    store: &ConfigStore,
    section: &SectionPath,
    name: &str,
) -> Result<bool, OpError> {
    let tree = store.snapshot();
    let children = crate::tree::resolve_branch(&tree, section)
        .map_err(|_| OpError::SectionNotFound(section.to_string()))?;

    let listed = match children.get(DEPENDENCIES_KEY) {
        Some(SectionNode::Leaf(value)) => {
            parse_dependency_list(value).iter().any(|entry| entry == name)
        }
        _ => false,
    };

    Ok(listed)
}
