//! In-memory model of the build framework's configuration file.
//!
//! The backing format is line-oriented: bracketed section headers
//! (`[application]`, `[library.mathlib]`) followed by flat `key = value`
//! lines. The model is a tree of [`SectionNode`]s addressed by dotted
//! [`SectionPath`]s, with parsing and rendering kept as exact inverses so
//! the tree and the backing text stay convergent.

mod node;
mod parse;
mod path;
mod render;


pub use node::{Branch, ConfigTree, SectionNode, validate_component};
pub use parse::parse_document;
pub use path::{NodeRef, SectionPath, resolve, resolve_branch, resolve_branch_mut};
pub use render::render_document;

use thiserror::Error;

/// Errors produced by the configuration tree model.
#[derive(Error, Debug)]
pub enum TreeError {
    /// The backing text could not be parsed.
    #[error("parse error at line {line}: {details}")]
    Parse {
        /// 1-based line number in the backing text.
        line: usize,
        /// What was wrong with the line.
        details: String,
    },

    /// A path did not resolve to any node.
    #[error("no section or value at '{0}'")]
    NotFound(String),

    /// A path tried to descend through a plain value.
    #[error("cannot descend into '{0}': it is a value, not a section")]
    NotABranch(String),

    /// A value was expected but a section was found.
    #[error("expected a value at '{0}', found a section")]
    NotALeaf(String),

    /// A section or key name contains a character the backing format
    /// treats as structural.
    #[error("invalid name '{0}': must not be empty or contain '[', ']', '=', '.', '#', ';' or newlines")]
    InvalidComponent(String),
}
