//! Graph scanner: total partition of a tree's nodes.
//!
//! Scanning never fails. Node kinds that do not participate in menu
//! derivation are simply left out, and absence of any expected kind yields
//! empty lists.

use crate::doc::{GraphNode, NodeKind, NodeTree};

/// The four disjoint node classifications a derivation run works from.
#[derive(Debug, Default)]
pub struct ScanLists<'a> {
    /// Regular structural frames; each becomes a menu.
    pub frames: Vec<&'a GraphNode>,
    /// Cyan-marked frames annotating the group they wrap.
    pub property_frames: Vec<&'a GraphNode>,
    /// Group nodes referencing reusable sub-graphs.
    pub groups: Vec<&'a GraphNode>,
    /// Unmuted value nodes carrying `NAME: VALUE` metadata.
    pub variables: Vec<&'a GraphNode>,
}

impl ScanLists<'_> {
    /// Whether the tree holds any menu structure worth a config.
    ///
    /// Trees without a single frame or group node are skipped by the
    /// serializer, matching the source convention.
    pub fn has_menu_nodes(&self) -> bool {
        !self.frames.is_empty() || !self.property_frames.is_empty() || !self.groups.is_empty()
    }
}

/// Partition a tree's nodes into the scanner's four lists.
pub fn scan(tree: &NodeTree) -> ScanLists<'_> {
    let mut lists = ScanLists::default();
    for node in &tree.nodes {
        match node.kind {
            NodeKind::Frame => {
                if node.is_property_frame() {
                    lists.property_frames.push(node);
                } else {
                    lists.frames.push(node);
                }
            }
            NodeKind::Group => lists.groups.push(node),
            NodeKind::Value => {
                if !node.mute {
                    lists.variables.push(node);
                }
            }
            NodeKind::Other => {}
        }
    }
    debug!(
        "scanned '{}' ({}): {} frames, {} property frames, {} groups, {} variables",
        tree.name,
        tree.kind,
        lists.frames.len(),
        lists.property_frames.len(),
        lists.groups.len(),
        lists.variables.len()
    );
    lists
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::{LIBRARY_TREE_NAME, PROPERTY_FRAME_COLOR, TreeKind};

    fn tree(nodes: Vec<GraphNode>) -> NodeTree {
        NodeTree {
            kind: TreeKind::Geometry,
            name: LIBRARY_TREE_NAME.to_string(),
            nodes,
        }
    }

    fn node(name: &str, kind: NodeKind) -> GraphNode {
        GraphNode {
            name: name.to_string(),
            kind,
            label: String::new(),
            parent: None,
            mute: false,
            use_custom_color: false,
            color: None,
            node_tree: None,
            width: 140.0,
        }
    }

    #[test]
    fn test_scan_is_total_on_empty_tree() {
        let empty = tree(Vec::new());
        let lists = scan(&empty);
        assert!(lists.frames.is_empty());
        assert!(lists.property_frames.is_empty());
        assert!(lists.groups.is_empty());
        assert!(lists.variables.is_empty());
        assert!(!lists.has_menu_nodes());
    }

    #[test]
    fn test_scan_partitions_by_kind_and_marker() {
        let mut prop = node("Frame.002", NodeKind::Frame);
        prop.use_custom_color = true;
        prop.color = Some(PROPERTY_FRAME_COLOR);

        let mut muted = node("Value.002", NodeKind::Value);
        muted.mute = true;

        let t = tree(vec![
            node("Frame.001", NodeKind::Frame),
            prop,
            node("Group", NodeKind::Group),
            node("Value.001", NodeKind::Value),
            muted,
            node("Math", NodeKind::Other),
        ]);

        let lists = scan(&t);
        assert_eq!(lists.frames.len(), 1);
        assert_eq!(lists.property_frames.len(), 1);
        assert_eq!(lists.groups.len(), 1);
        // muted value nodes are excluded
        assert_eq!(lists.variables.len(), 1);
        assert_eq!(lists.variables[0].name, "Value.001");
        assert!(lists.has_menu_nodes());
    }
}
