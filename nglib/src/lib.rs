//! # nglib
//!
//! Core library for deriving hierarchical asset menus from node graph
//! documents.
//!
//! Library authors lay out frames, group nodes and `NAME: VALUE` labels in a
//! reserved node tree; `nglib` scans that convention, validates it, and turns
//! it into deterministic per-file menu records that a front end can
//! materialize without ever opening the source documents.
//!
//! ## Features
//!
//! - **Document model**: JSON node graph documents with typed trees and nodes
//! - **Scanner**: total partition of a tree into frames, property frames,
//!   groups and variable nodes
//! - **Variable parsing**: `ICON`, `GROUP_INDEX` and `SORT_INDEX` assignments
//!   from value node labels
//! - **Assembler**: menu hierarchy with stable ids, group buckets and
//!   expandability
//! - **Config store**: atomic per-file JSON records under `menu_configs/`
//! - **Library list**: TOML-backed registry of source files
//! - **Activation**: append-with-dedup of node groups into working documents
//!
//! ## Modules
//!
//! - [`doc`] - Node graph document model and JSON persistence
//! - [`scan`] - Tree scanner
//! - [`vars`] - Variable label parsing
//! - [`assemble`] - Menu tree assembler and derivation pipeline
//! - [`config`] - Derived record types and the on-disk store
//! - [`library`] - Registered source file list
//! - [`append`] - Group activation into working documents
//! - [`icons`] - Known icon identifiers
//! - [`error`] - Error taxonomy

/// Menu tree assembler and the per-document derivation pipeline.
pub mod assemble;

/// Group activation: appending library groups into working documents.
pub mod append;

/// Derived menu records and the atomic on-disk config store.
pub mod config;

/// Node graph document model and JSON persistence.
pub mod doc;

/// Error taxonomy shared across the crate.
pub mod error;

/// Known icon identifiers and label normalization.
pub mod icons;

/// Registered source file list.
pub mod library;

/// Menu node types, group keys and the id generator.
pub mod menu;

/// Tree scanner: partitions a node tree into the authoring convention's
/// node classes.
pub mod scan;

/// `NAME: VALUE` variable parsing from value node labels.
pub mod vars;

#[macro_use]
extern crate log;

pub use append::{AppendOutcome, append_group, base_name};
pub use assemble::{assemble, derive_document};
pub use config::{CONFIG_DIR_NAME, ConfigRecord, ConfigStore, TreeConfig};
pub use doc::{Document, GraphNode, NodeKind, NodeTree, TreeKind};
pub use error::{Error, LookupError, Result, ValidationError};
pub use library::{LIBRARY_FILE_NAME, Library, LibraryEntry};
pub use menu::{GroupKey, LeafItem, MenuNode};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
