use std::{fmt, str::FromStr, sync::LazyLock};

use regex::Regex;
use serde::Serialize;
use tracing::{info, instrument};

use crate::scaffold::Scaffolder;
use crate::store::ConfigStore;
use crate::tree::{Branch, ConfigTree, SectionNode, SectionPath, resolve_branch};

use super::{OpError, dependency::DEPENDENCIES_KEY, parse_dependency_list};

/// Allow-list for library and dependency names.
static NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)] // the literal is a valid pattern
    Regex::new(r"^[A-Za-z0-9_-]+$").unwrap()
});

/// The closed set of library kinds the build framework can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LibraryKind {
    /// Statically linked archive.
    Static,
    /// Dynamically linked object.
    Dynamic,
}

impl fmt::Display for LibraryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LibraryKind::Static => write!(f, "static"),
            LibraryKind::Dynamic => write!(f, "dynamic"),
        }
    }
}

impl FromStr for LibraryKind {
    type Err = String;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text.trim() {
            "static" => Ok(LibraryKind::Static),
            "dynamic" => Ok(LibraryKind::Dynamic),
            other => Err(format!(
                "unknown library type '{other}': expected 'static' or 'dynamic'"
            )),
        }
    }
}

/// A section eligible for a dependency list, as reported to callers.
#[derive(Debug, Clone, Serialize)]
pub struct BuildableUnit {
    /// Dotted path of the section (`application` or `library.<name>`).
    pub path: String,
    /// The unit's dependency list, normalized.
    pub dependencies: Vec<String>,
}

pub(super) fn is_valid_name(name: &str) -> bool {
    NAME_PATTERN.is_match(name)
}

/// Sanitizes a library name, then validates it against the allow-list.
///
/// Leading path separators and relative-path prefixes (`/`, `\`, `./`,
/// `../`) are stripped before validation, so `../evil` reduces to `evil`
/// and passes; what remains must be letters, digits, `_` or `-`.
///
/// # Errors
/// Returns `OpError::InvalidName` carrying the original input when the
/// sanitized remainder fails the pattern.
pub fn sanitize_name(raw: &str) -> Result<String, OpError> {
    let mut name = raw.trim();

    loop {
        let stripped = name
            .strip_prefix("../")
            .or_else(|| name.strip_prefix("./"))
            .or_else(|| name.strip_prefix("..\\"))
            .or_else(|| name.strip_prefix(".\\"))
            .or_else(|| name.strip_prefix('/'))
            .or_else(|| name.strip_prefix('\\'));

        match stripped {
            Some(rest) => name = rest,
            None => break,
        }
    }

    if !is_valid_name(name) {
        return Err(OpError::InvalidName(raw.to_string()));
    }

    Ok(name.to_string())
}

/// Creates the `library.<name>` section, gated on external scaffolding.
///
/// The flow is: sanitize and validate the name, check for a duplicate,
/// run the scaffolder (which generates the library's sources outside
/// this store), and only then mutate the tree. The duplicate check is
/// repeated against the tree as of commit time because a file-watch
/// reload may have replaced it while the scaffolder ran. On any failure
/// the tree and the backing file are left untouched.
///
/// Registering the new library as a dependency of an existing unit is a
/// separate, caller-confirmed step via
/// [`add_dependency`](super::add_dependency).
///
/// # Errors
/// * `OpError::InvalidName` - the sanitized name fails the allow-list.
/// * `OpError::DuplicateLibrary` - `library.<name>` already exists.
/// * `OpError::ScaffoldFailed` - the external action failed; its
///   diagnostics are carried verbatim.
/// * `OpError::Store` - persistence failed.
#[instrument(skip(store, scaffolder))]
pub async fn add_library(
    store: &ConfigStore,
    raw_name: &str,
    kind: LibraryKind,
    scaffolder: &dyn Scaffolder,
) -> Result<String, OpError> {
    let name = sanitize_name(raw_name)?;

    // Fail fast before the external action; re-checked at commit time.
    if library_exists(&store.snapshot(), &name) {
        return Err(OpError::DuplicateLibrary(name));
    }

    let output = scaffolder
        .scaffold(&name, kind)
        .await
        .map_err(|e| OpError::ScaffoldFailed {
            name: name.clone(),
            details: e.to_string(),
        })?;

    if !output.success {
        return Err(OpError::ScaffoldFailed {
            name,
            details: output.diagnostics(),
        });
    }

    store.commit(|tree| {
        if library_exists(tree, &name) {
            return Err(OpError::DuplicateLibrary(name.clone()));
        }

        let library = tree
            .root_mut()
            .entry("library".to_string())
            .or_insert_with(|| SectionNode::Branch(Branch::new()));

        let children = library
            .as_branch_mut()
            .ok_or_else(|| OpError::SectionNotFound("library".to_string()))?;

        let mut fields = Branch::new();
        fields.insert("path".to_string(), SectionNode::Leaf(name.clone()));
        fields.insert("type".to_string(), SectionNode::Leaf(kind.to_string()));
        fields.insert(
            DEPENDENCIES_KEY.to_string(),
            SectionNode::Leaf(String::new()),
        );
        children.insert(name.clone(), SectionNode::Branch(fields));

        Ok(())
    })?;

    info!(library = %name, %kind, "Library added");
    Ok(name)
}

/// Collects the buildable units currently in the tree with their
/// normalized dependency lists: `application` first if present, then
/// each `library.<name>` in insertion order.
pub fn list_buildable_units(store: &ConfigStore) -> Vec<BuildableUnit> {
    let tree = store.snapshot();
    let mut units = Vec::new();

    let mut push_unit = |path: SectionPath, children: &Branch| {
        let dependencies = match children.get(DEPENDENCIES_KEY) {
            Some(SectionNode::Leaf(raw)) => parse_dependency_list(raw),
            _ => Vec::new(),
        };

        units.push(BuildableUnit {
            path: path.to_string(),
            dependencies,
        });
    };

    if let Ok(children) = resolve_branch(&tree, &SectionPath::parse("application")) {
        push_unit(SectionPath::parse("application"), children);
    }

    if let Ok(libraries) = resolve_branch(&tree, &SectionPath::parse("library")) {
        for (name, node) in libraries {
            if let SectionNode::Branch(children) = node {
                push_unit(SectionPath::parse("library").child(name), children);
            }
        }
    }

    units
}

fn library_exists(tree: &ConfigTree, name: &str) -> bool {
    resolve_branch(tree, &SectionPath::parse("library"))
        .map(|children| children.contains_key(name))
        .unwrap_or(false)
}
