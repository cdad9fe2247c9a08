use super::{ConfigTree, SectionNode, SectionPath, TreeError};

/// Parses backing text into a configuration tree.
///
/// Recognizes `[name]` and `[parent.child]` headers followed by flat
/// `key = value` lines. Whitespace around names, keys and values is
/// trimmed; blank lines and `#`/`;` comment lines are skipped. A compound
/// header creates each missing ancestor section on the way down.
///
/// # Errors
/// Returns `TreeError::Parse` with a 1-based line number for a malformed
/// header, a line that is neither header nor assignment, a key before the
/// first header, or a header that collides with an existing value.
pub fn parse_document(text: &str) -> Result<ConfigTree, TreeError> {
    let mut tree = ConfigTree::new();
    let mut current: Option<SectionPath> = None;

    for (index, raw) in text.lines().enumerate() {
        let line = raw.trim();
        let line_number = index + 1;

        if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
            continue;
        }

        if line.starts_with('[') {
            let header = parse_header(line, line_number)?;
            ensure_section(&mut tree, &header, line_number)?;
            current = Some(header);
            continue;
        }

        let Some((key, value)) = line.split_once('=') else {
            return Err(TreeError::Parse {
                line: line_number,
                details: format!("expected '[section]' or 'key = value', got '{line}'"),
            });
        };

        let key = key.trim();
        if key.is_empty() {
            return Err(TreeError::Parse {
                line: line_number,
                details: "assignment with an empty key".to_string(),
            });
        }

        let Some(section) = &current else {
            return Err(TreeError::Parse {
                line: line_number,
                details: format!("key '{key}' appears before any section header"),
            });
        };

        let children = super::resolve_branch_mut(&mut tree, section).map_err(|e| {
            TreeError::Parse {
                line: line_number,
                details: e.to_string(),
            }
        })?;

        children.insert(key.to_string(), SectionNode::Leaf(value.trim().to_string()));
    }

    Ok(tree)
}

fn parse_header(line: &str, line_number: usize) -> Result<SectionPath, TreeError> {
    let Some(inner) = line.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) else {
        return Err(TreeError::Parse {
            line: line_number,
            details: format!("unterminated section header '{line}'"),
        });
    };

    let path = SectionPath::parse(inner);
    if path.is_root() {
        return Err(TreeError::Parse {
            line: line_number,
            details: "empty section header".to_string(),
        });
    }

    Ok(path)
}

/// Creates the section at `path`, materializing missing ancestors.
/// Re-opening an existing section is allowed and merges into it.
fn ensure_section(
    tree: &mut ConfigTree,
    path: &SectionPath,
    line_number: usize,
) -> Result<(), TreeError> {
    let mut current = tree.root_mut();

    for (depth, segment) in path.segments().iter().enumerate() {
        let node = current
            .entry(segment.clone())
            .or_insert_with(|| SectionNode::Branch(super::Branch::new()));

        current = node.as_branch_mut().ok_or_else(|| TreeError::Parse {
            line: line_number,
            details: format!(
                "section '{}' collides with an existing value",
                path.segments()[..=depth].join(".")
            ),
        })?;
    }

    Ok(())
}
