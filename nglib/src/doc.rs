//! Library document model.
//!
//! A library document is the on-disk JSON stand-in for a host file holding
//! node graphs. It carries a list of node trees (one per editor kind) plus
//! the document's table of reusable sub-graphs.
//!
//! # Document File Format
//!
//! ```json
//! {
//!   "trees": [
//!     {
//!       "kind": "geometry",
//!       "name": "Nodegroup Library",
//!       "nodes": [
//!         { "name": "Frame.001", "kind": "frame", "label": "Utilities" },
//!         { "name": "Group", "kind": "group", "parent": "Frame.001",
//!           "node_tree": "Smooth Edges", "width": 140.0 }
//!       ]
//!     }
//!   ],
//!   "node_groups": [ { "name": "Smooth Edges" } ]
//! }
//! ```

use std::{
    collections::BTreeMap,
    fmt, fs,
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result, ValidationError};

/// Reserved name of the tree scanned for menu structure, one per kind.
pub const LIBRARY_TREE_NAME: &str = "Nodegroup Library";

/// Custom color marking a frame as a property frame.
pub const PROPERTY_FRAME_COLOR: [f32; 3] = [0.0, 1.0, 1.0];

/// Node tree flavor, the structural kind a derived config is keyed by.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum TreeKind {
    /// Geometry node tree.
    Geometry,
    /// Shader node tree.
    Shader,
    /// Compositor node tree.
    Compositor,
    /// Texture node tree.
    Texture,
}

impl TreeKind {
    /// All kinds, in the order they are scanned.
    pub const ALL: [TreeKind; 4] = [
        TreeKind::Geometry,
        TreeKind::Shader,
        TreeKind::Compositor,
        TreeKind::Texture,
    ];

    /// Short uppercase prefix embedded in derived menu ids.
    pub fn prefix(&self) -> &'static str {
        match self {
            TreeKind::Geometry => "GEO",
            TreeKind::Shader => "SHAD",
            TreeKind::Compositor => "COMP",
            TreeKind::Texture => "TEX",
        }
    }

    /// Lowercase name as it appears in documents and records.
    pub fn as_str(&self) -> &'static str {
        match self {
            TreeKind::Geometry => "geometry",
            TreeKind::Shader => "shader",
            TreeKind::Compositor => "compositor",
            TreeKind::Texture => "texture",
        }
    }
}

impl fmt::Display for TreeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural kind of a graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Structural grouping node; becomes a menu.
    Frame,
    /// Node referencing a reusable sub-graph; becomes a menu action.
    Group,
    /// Node repurposed as inline `NAME: VALUE` metadata.
    Value,
    /// Any other node kind; ignored by the scanner.
    #[serde(other)]
    Other,
}

fn default_width() -> f32 {
    140.0
}

/// A single node as read from a library document.
///
/// Only the fields the derivation cares about are modeled; everything else a
/// host would store is out of scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    /// Node identity, unique within its tree.
    pub name: String,
    /// Structural kind.
    pub kind: NodeKind,
    /// Display label. Doubles as metadata storage on value nodes.
    #[serde(default)]
    pub label: String,
    /// Name of the enclosing frame, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Muted nodes are skipped by the scanner.
    #[serde(default)]
    pub mute: bool,
    /// Whether the node carries a custom color.
    #[serde(default)]
    pub use_custom_color: bool,
    /// Custom color, checked against the property frame marker.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<[f32; 3]>,
    /// Referenced sub-graph name (group nodes only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_tree: Option<String>,
    /// Display width used when the group is inserted.
    #[serde(default = "default_width")]
    pub width: f32,
}

impl GraphNode {
    /// Whether this frame is a property frame (reserved cyan marker).
    pub fn is_property_frame(&self) -> bool {
        self.kind == NodeKind::Frame
            && self.use_custom_color
            && self.color == Some(PROPERTY_FRAME_COLOR)
    }
}

/// One node tree inside a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeTree {
    /// Tree flavor.
    pub kind: TreeKind,
    /// Tree name; the library tree uses [`LIBRARY_TREE_NAME`].
    pub name: String,
    /// Nodes, in document order.
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
}

impl NodeTree {
    /// Look up a node by name.
    pub fn node(&self, name: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Resolve a node's enclosing frame.
    ///
    /// Returns `Ok(None)` for parentless nodes. A dangling parent reference
    /// or a parent that is not a frame is a validation error.
    pub fn parent_frame(&self, node: &GraphNode) -> Result<Option<&GraphNode>, ValidationError> {
        let Some(parent_name) = &node.parent else {
            return Ok(None);
        };
        let parent = self
            .node(parent_name)
            .ok_or_else(|| ValidationError::UnknownParent {
                node: node.name.clone(),
                parent: parent_name.clone(),
            })?;
        if parent.kind != NodeKind::Frame {
            return Err(ValidationError::BadParent {
                node: node.name.clone(),
                parent: parent.name.clone(),
            });
        }
        Ok(Some(parent))
    }
}

/// A named reusable sub-graph stored in a document's group table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeGroupDef {
    /// Sub-graph name; activation keys on this.
    pub name: String,
    /// Optional free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A library document: node trees plus the sub-graph table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// Node trees, at most one library tree per kind.
    #[serde(default)]
    pub trees: Vec<NodeTree>,
    /// Reusable sub-graphs defined by this document.
    #[serde(default)]
    pub node_groups: Vec<NodeGroupDef>,
}

impl Document {
    /// Load a document from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the document back as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, content).map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Collect the library trees, keyed by kind in scan order.
    ///
    /// Each kind gets looked up explicitly; two same-kind trees carrying the
    /// reserved name is a named error rather than a silent pick.
    pub fn library_trees(&self) -> Result<BTreeMap<TreeKind, &NodeTree>, ValidationError> {
        let mut found: BTreeMap<TreeKind, &NodeTree> = BTreeMap::new();
        for tree in &self.trees {
            if tree.name != LIBRARY_TREE_NAME {
                continue;
            }
            if found.insert(tree.kind, tree).is_some() {
                return Err(ValidationError::DuplicateLibraryTree {
                    kind: tree.kind.to_string(),
                    name: LIBRARY_TREE_NAME.to_string(),
                });
            }
        }
        Ok(found)
    }

    /// First tree of the given kind, or the first tree at all when `None`.
    pub fn tree_of_kind_mut(&mut self, kind: Option<TreeKind>) -> Option<&mut NodeTree> {
        match kind {
            Some(k) => self.trees.iter_mut().find(|t| t.kind == k),
            None => self.trees.first_mut(),
        }
    }

    /// Look up a sub-graph definition by exact name.
    pub fn node_group(&self, name: &str) -> Option<&NodeGroupDef> {
        self.node_groups.iter().find(|g| g.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(name: &str, label: &str) -> GraphNode {
        GraphNode {
            name: name.to_string(),
            kind: NodeKind::Frame,
            label: label.to_string(),
            parent: None,
            mute: false,
            use_custom_color: false,
            color: None,
            node_tree: None,
            width: default_width(),
        }
    }

    #[test]
    fn test_property_frame_marker() {
        let mut node = frame("Frame.001", "");
        assert!(!node.is_property_frame());

        node.use_custom_color = true;
        node.color = Some(PROPERTY_FRAME_COLOR);
        assert!(node.is_property_frame());

        // 颜色不完全匹配时不是属性框
        node.color = Some([0.0, 1.0, 0.99]);
        assert!(!node.is_property_frame());

        node.color = Some(PROPERTY_FRAME_COLOR);
        node.use_custom_color = false;
        assert!(!node.is_property_frame());
    }

    #[test]
    fn test_unknown_node_kind_deserializes_to_other() {
        let node: GraphNode = serde_json::from_str(
            r#"{ "name": "Math", "kind": "math", "label": "" }"#,
        )
        .unwrap();
        assert_eq!(node.kind, NodeKind::Other);
        assert_eq!(node.width, 140.0);
    }

    #[test]
    fn test_parent_frame_resolution() {
        let tree = NodeTree {
            kind: TreeKind::Geometry,
            name: LIBRARY_TREE_NAME.to_string(),
            nodes: vec![
                frame("Frame.001", "Utilities"),
                GraphNode {
                    parent: Some("Frame.001".to_string()),
                    ..frame("Frame.002", "Mesh")
                },
                GraphNode {
                    parent: Some("Gone".to_string()),
                    ..frame("Frame.003", "")
                },
            ],
        };

        let child = tree.node("Frame.002").unwrap();
        let parent = tree.parent_frame(child).unwrap().unwrap();
        assert_eq!(parent.name, "Frame.001");

        let dangling = tree.node("Frame.003").unwrap();
        let err = tree.parent_frame(dangling).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownParent {
                node: "Frame.003".to_string(),
                parent: "Gone".to_string(),
            }
        );
    }

    #[test]
    fn test_duplicate_library_tree_is_rejected() {
        let tree = |kind| NodeTree {
            kind,
            name: LIBRARY_TREE_NAME.to_string(),
            nodes: Vec::new(),
        };
        let doc = Document {
            trees: vec![tree(TreeKind::Geometry), tree(TreeKind::Shader)],
            node_groups: Vec::new(),
        };
        assert_eq!(doc.library_trees().unwrap().len(), 2);

        let doc = Document {
            trees: vec![tree(TreeKind::Geometry), tree(TreeKind::Geometry)],
            node_groups: Vec::new(),
        };
        assert!(matches!(
            doc.library_trees(),
            Err(ValidationError::DuplicateLibraryTree { .. })
        ));
    }
}
