use super::{Branch, ConfigTree, SectionNode, SectionPath};

/// Renders a configuration tree back to backing text.
///
/// Sections are emitted in insertion order, depth-first. A compound path
/// becomes a single literal `[parent.child]` header with exactly one `.`
/// per nesting level; no escaping is ever introduced because structural
/// characters are rejected at name-validation time. Within a section the
/// flat values come first, then the subsections. Headers for sections
/// that hold only subsections are omitted (the parser re-creates them),
/// except that an entirely empty section keeps its header so it survives
/// the round trip.
pub fn render_document(tree: &ConfigTree) -> String {
    let mut blocks = Vec::new();
    render_branch(&SectionPath::root(), tree.root(), &mut blocks);

    if blocks.is_empty() {
        return String::new();
    }

    let mut text = blocks.join("\n\n");
    text.push('\n');
    text
}

fn render_branch(path: &SectionPath, children: &Branch, blocks: &mut Vec<String>) {
    let leaves: Vec<(&String, &str)> = children
        .iter()
        .filter_map(|(key, node)| node.as_leaf().map(|value| (key, value)))
        .collect();

    // The root is synthetic and never gets a header of its own.
    if !path.is_root() && (!leaves.is_empty() || children.is_empty()) {
        let mut block = format!("[{path}]");

        for (key, value) in &leaves {
            block.push('\n');
            if value.is_empty() {
                block.push_str(&format!("{key} ="));
            } else {
                block.push_str(&format!("{key} = {value}"));
            }
        }

        blocks.push(block);
    }

    for (name, node) in children {
        if let SectionNode::Branch(grandchildren) = node {
            render_branch(&path.child(name), grandchildren, blocks);
        }
    }
}
