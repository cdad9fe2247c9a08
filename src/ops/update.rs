use tracing::instrument;

use crate::store::ConfigStore;
use crate::tree::{SectionNode, SectionPath, resolve_branch_mut, validate_component};

use super::OpError;

/// Sets `key = value` inside the section at `path`, then persists and
/// notifies.
///
/// Values are plain strings; no type validation is performed. An
/// existing entry under `key` is replaced. The section is resolved
/// against the tree as of commit time.
///
/// # Errors
/// * `OpError::RootSection` - `path` is the root; values need a section.
/// * `OpError::SectionNotFound` - the section is absent or is a value.
/// * `OpError::Tree` - `key` contains a structural character.
/// * `OpError::InvalidValue` - `value` spans multiple lines.
/// * `OpError::Store` - persistence failed; nothing was written.
#[instrument(skip(store, value))]
pub fn update_value(
    store: &ConfigStore,
    path: &SectionPath,
    key: &str,
    value: &str,
) -> Result<(), OpError> {
    if path.is_root() {
        return Err(OpError::RootSection);
    }
    validate_component(key)?;

    // A value runs to the end of its line; an embedded newline would
    // break the round trip with the backing text.
    if value.contains(['\n', '\r']) {
        return Err(OpError::InvalidValue(value.to_string()));
    }

    store.commit(|tree| {
        let children = resolve_branch_mut(tree, path)
            .map_err(|_| OpError::SectionNotFound(path.to_string()))?;

        children.insert(key.to_string(), SectionNode::Leaf(value.trim().to_string()));
        Ok(())
    })
}
