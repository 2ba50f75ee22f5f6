//! Error types and result definitions for menu derivation.
//!
//! Derivation failures are split into three classes, matching how they are
//! surfaced to the user:
//!
//! - [`ValidationError`] - graph metadata problems; always fatal to the whole
//!   derivation run for the offending source file, never retried.
//! - [`LookupError`] - activation-time problems (a referenced sub-graph or
//!   source file is gone); fatal to that single activation only.
//! - I/O and format errors, wrapped with the path they occurred on.

use std::path::PathBuf;

use thiserror::Error;

use crate::doc::TreeKind;

/// Convenience result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Top-level error type for all library operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Graph metadata failed validation; no config record is written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A referenced file or sub-graph could not be found at activation time.
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// Reading a document or record failed.
    #[error("failed to read {path}")]
    Read {
        /// Path that could not be read.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing a document or record failed; prior on-disk state is untouched.
    #[error("failed to write {path}")]
    Write {
        /// Path that could not be written.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document or config record could not be parsed or encoded.
    #[error("invalid JSON in {path}")]
    Json {
        /// Offending file.
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The library entry cache could not be parsed.
    #[error("invalid library cache {path}")]
    LibraryCache {
        /// Offending file.
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The library entry cache could not be encoded.
    #[error("failed to encode library cache")]
    LibraryEncode(#[from] toml::ser::Error),

    /// A library entry with the same name already exists.
    #[error("library entry '{name}' already exists")]
    DuplicateEntry {
        /// Conflicting entry name.
        name: String,
    },
}

/// Fatal validation errors raised while deriving menus from a node graph.
///
/// Messages are multi-line: the first line is the headline, following lines
/// carry context identifying the offending node(s). One validation error
/// aborts the whole derivation for that source file - there is no partial
/// output.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A value node label did not split into exactly `NAME: VALUE`.
    #[error("invalid variable data, labels should contain exactly one colon\nerror at: '{label}' - {node}")]
    MalformedLabel {
        /// The raw label.
        label: String,
        /// Name of the offending node.
        node: String,
    },

    /// The variable name is not part of the fixed schema.
    #[error("'{name}' is not a valid variable name\nerror at: '{label}' - {node}")]
    UnknownVariable {
        /// The unrecognized name.
        name: String,
        /// The raw label.
        label: String,
        /// Name of the offending node.
        node: String,
    },

    /// An `ICON` value is not in the known icon table.
    #[error("'{value}' is not a valid icon name\nerror at: '{label}' - {node}")]
    InvalidIcon {
        /// The normalized icon value.
        value: String,
        /// The raw label.
        label: String,
        /// Name of the offending node.
        node: String,
    },

    /// A `GROUP_INDEX`/`SORT_INDEX` value is not a non-negative integer.
    #[error("{name} '{value}' is not a non-negative integer\nerror at: '{label}' - {node}")]
    InvalidIndex {
        /// Variable name the value was assigned to.
        name: String,
        /// The rejected value.
        value: String,
        /// The raw label.
        label: String,
        /// Name of the offending node.
        node: String,
    },

    /// The same variable was assigned twice to one menu or property frame.
    #[error("variable '{name}' has been defined multiple times for {target}\nfirst at: {first}\nerror at: {node}")]
    DuplicateVariable {
        /// Variable name assigned twice.
        name: String,
        /// Description of the target (menu or property frame id).
        target: String,
        /// Node carrying the first assignment.
        first: String,
        /// Node carrying the duplicate assignment.
        node: String,
    },

    /// A property frame is parented to another property frame.
    #[error("property frame cannot be nested inside another property frame\nerror at: '{label}' - {node}\ninside: {parent}")]
    NestedPropertyFrame {
        /// Label of the inner frame.
        label: String,
        /// Name of the inner frame node.
        node: String,
        /// Name of the enclosing property frame node.
        parent: String,
    },

    /// A regular frame is parented to a property frame.
    #[error("frame cannot be parented to a property frame\nerror at: '{label}' - {node}\ninside: {parent}")]
    FrameInPropertyFrame {
        /// Label of the frame.
        label: String,
        /// Name of the frame node.
        node: String,
        /// Name of the enclosing property frame node.
        parent: String,
    },

    /// A node names a parent that does not exist in its tree.
    #[error("node '{node}' references unknown parent '{parent}'")]
    UnknownParent {
        /// Child node name.
        node: String,
        /// Missing parent name.
        parent: String,
    },

    /// A node is parented to something that is not a frame.
    #[error("node '{node}' is parented to '{parent}', which is not a frame")]
    BadParent {
        /// Child node name.
        node: String,
        /// Non-frame parent name.
        parent: String,
    },

    /// A group node has no referenced sub-graph.
    #[error("group node '{node}' does not reference a node tree")]
    GroupWithoutTree {
        /// Name of the group node.
        node: String,
    },

    /// Two distinct node names hashed to the same menu id.
    #[error("menu id collision: '{first}' and '{second}' both map to {id}")]
    IdCollision {
        /// The colliding id.
        id: String,
        /// Node name registered first.
        first: String,
        /// Node name that collided.
        second: String,
    },

    /// Two same-kind trees claim the reserved library tree name.
    #[error("multiple {kind} trees named '{name}'")]
    DuplicateLibraryTree {
        /// The tree kind.
        kind: String,
        /// The reserved name.
        name: String,
    },
}

/// Activation-time lookup failures.
///
/// These never abort anything beyond the single activation that raised them;
/// other menu entries stay usable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LookupError {
    /// The originating library document is gone.
    #[error("source document not found: {path}")]
    SourceMissing {
        /// Missing document path.
        path: PathBuf,
    },

    /// The named sub-graph is not in the source document's group table.
    #[error("node group '{name}' not found in {path}")]
    GroupMissing {
        /// Requested sub-graph name.
        name: String,
        /// Document that was searched.
        path: PathBuf,
    },

    /// The target document has no tree to insert into.
    #[error("target document has no {} tree", kind.map(|k| k.as_str()).unwrap_or("node"))]
    TreeMissing {
        /// Requested tree kind, if one was asked for.
        kind: Option<TreeKind>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_is_multiline() {
        let err = ValidationError::MalformedLabel {
            label: "ICON MESH_CUBE".to_string(),
            node: "Value.003".to_string(),
        };
        let msg = err.to_string();
        let mut lines = msg.lines();
        assert_eq!(
            lines.next().unwrap(),
            "invalid variable data, labels should contain exactly one colon"
        );
        assert_eq!(lines.next().unwrap(), "error at: 'ICON MESH_CUBE' - Value.003");
    }

    #[test]
    fn test_duplicate_variable_names_both_nodes() {
        let err = ValidationError::DuplicateVariable {
            name: "GROUP_INDEX".to_string(),
            target: "menu NGL_MT_ML_GEO_main".to_string(),
            first: "Value.001".to_string(),
            node: "Value.002".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Value.001"));
        assert!(msg.contains("Value.002"));
    }
}
