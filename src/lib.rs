//! Mortar - configuration model and front end for an external build
//! framework.
//!
//! Mortar owns the framework's bracket-sectioned configuration file as
//! an addressable tree and keeps the file and the in-memory view
//! convergent. The main pieces:
//!
//! - A parsed, path-addressed configuration tree with round-trip
//!   serialization
//! - A write-through store that rewrites the whole file per edit and
//!   notifies observers
//! - File watching so external edits reload the tree silently
//! - Library and dependency operations gated on an external scaffolding
//!   action
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use mortar::store::ConfigStore;
//! use mortar::tree::SectionPath;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = ConfigStore::load("project.cfg")?;
//! let node = store.get_node(&SectionPath::parse("application"))?;
//! println!("application: {node:?}");
//! # Ok(())
//! # }
//! ```

/// Configuration tree model: nodes, paths, parsing and rendering.
pub mod tree;

/// Write-through configuration store with change notification.
pub mod store;

/// Value, dependency and library operations over the store.
pub mod ops;

/// The external scaffolding collaborator gating library creation.
pub mod scaffold;

/// Command-line interface over the configuration store.
pub mod cli;

/// Tracing setup for the mortar binary.
pub mod tracing_config;
