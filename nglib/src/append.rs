//! Activation: appending a library node group into a working document.
//!
//! Re-activating the same group must not pile up `.001`-suffixed duplicates
//! of the group definition. An existing definition whose base name matches
//! is bound instead of importing a fresh copy; only the instance node is new.

use std::{path::Path, sync::OnceLock};

use regex::Regex;

use crate::{
    doc::{Document, GraphNode, NodeKind, TreeKind},
    error::{LookupError, Result},
};

/// What an activation actually did to the target document.
#[derive(Debug, Clone, PartialEq)]
pub struct AppendOutcome {
    /// Name of the group definition the instance points at.
    pub group: String,
    /// Name of the instance node added to the target tree.
    pub node: String,
    /// True when an existing definition was bound instead of imported.
    pub reused: bool,
}

/// Strip a trailing duplicate suffix such as `.001` from a name.
pub fn base_name(name: &str) -> &str {
    static SUFFIX: OnceLock<Regex> = OnceLock::new();
    let re = SUFFIX.get_or_init(|| Regex::new(r"\.\d+$").unwrap());
    match re.find(name) {
        Some(m) => &name[..m.start()],
        None => name,
    }
}

fn unique_node_name(tree_nodes: &[GraphNode], base: &str) -> String {
    if !tree_nodes.iter().any(|n| n.name == base) {
        return base.to_string();
    }
    let mut counter = 1u32;
    loop {
        let candidate = format!("{base}.{counter:03}");
        if !tree_nodes.iter().any(|n| n.name == candidate) {
            return candidate;
        }
        counter += 1;
    }
}

/// Append the group named `group` from the document at `source` into
/// `target`, instancing it in the tree of `kind` (or the first tree).
///
/// Any lookup failure aborts the single activation and leaves `target`
/// untouched.
pub fn append_group(
    source: &Path,
    group: &str,
    target: &mut Document,
    kind: Option<TreeKind>,
    width: Option<f32>,
) -> Result<AppendOutcome> {
    if !source.exists() {
        return Err(LookupError::SourceMissing {
            path: source.to_path_buf(),
        }
        .into());
    }
    let source_doc = Document::load(source)?;
    let def = source_doc
        .node_group(group)
        .ok_or_else(|| LookupError::GroupMissing {
            name: group.to_string(),
            path: source.to_path_buf(),
        })?;

    let has_tree = match kind {
        Some(k) => target.trees.iter().any(|t| t.kind == k),
        None => !target.trees.is_empty(),
    };
    if !has_tree {
        return Err(LookupError::TreeMissing { kind }.into());
    }

    // Bind to an existing definition whose base name matches; the target may
    // already carry the group under a suffixed name from an earlier import.
    let existing = target
        .node_groups
        .iter()
        .find(|g| base_name(&g.name) == group);
    let (group_name, reused) = match existing {
        Some(g) => (g.name.clone(), true),
        None => {
            target.node_groups.push(def.clone());
            (def.name.clone(), false)
        }
    };

    let tree = target
        .tree_of_kind_mut(kind)
        .ok_or(LookupError::TreeMissing { kind })?;

    let node_name = unique_node_name(&tree.nodes, group);
    tree.nodes.push(GraphNode {
        name: node_name.clone(),
        kind: NodeKind::Group,
        label: String::new(),
        parent: None,
        mute: false,
        use_custom_color: false,
        color: None,
        node_tree: Some(group_name.clone()),
        width: width.unwrap_or(140.0),
    });

    Ok(AppendOutcome {
        group: group_name,
        node: node_name,
        reused,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::{NodeGroupDef, NodeTree};

    fn source_doc() -> Document {
        Document {
            trees: Vec::new(),
            node_groups: vec![NodeGroupDef {
                name: "Smooth Edges".to_string(),
                description: Some("Bevel then shade smooth".to_string()),
            }],
        }
    }

    fn target_doc() -> Document {
        Document {
            trees: vec![NodeTree {
                kind: TreeKind::Geometry,
                name: "Working".to_string(),
                nodes: Vec::new(),
            }],
            node_groups: Vec::new(),
        }
    }

    fn write_source(dir: &tempfile::TempDir) -> std::path::PathBuf {
        let path = dir.path().join("Mesh Utils.json");
        source_doc().save(&path).unwrap();
        path
    }

    #[test]
    fn test_base_name_strips_numeric_suffix() {
        assert_eq!(base_name("Smooth Edges.001"), "Smooth Edges");
        assert_eq!(base_name("Smooth Edges.12"), "Smooth Edges");
        assert_eq!(base_name("Smooth Edges"), "Smooth Edges");
        // 后缀必须是纯数字
        assert_eq!(base_name("v1.2a"), "v1.2a");
    }

    #[test]
    fn test_first_activation_imports_definition() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_source(&dir);
        let mut target = target_doc();

        let outcome = append_group(&source, "Smooth Edges", &mut target, None, None).unwrap();
        assert!(!outcome.reused);
        assert_eq!(outcome.group, "Smooth Edges");
        assert_eq!(outcome.node, "Smooth Edges");
        assert_eq!(target.node_groups.len(), 1);
        assert_eq!(target.trees[0].nodes[0].node_tree.as_deref(), Some("Smooth Edges"));
    }

    #[test]
    fn test_reactivation_binds_existing_definition() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_source(&dir);
        let mut target = target_doc();

        append_group(&source, "Smooth Edges", &mut target, None, None).unwrap();
        let outcome = append_group(&source, "Smooth Edges", &mut target, None, Some(200.0)).unwrap();

        assert!(outcome.reused);
        assert_eq!(target.node_groups.len(), 1, "definition must not duplicate");
        assert_eq!(outcome.node, "Smooth Edges.001");
        assert_eq!(target.trees[0].nodes[1].width, 200.0);
    }

    #[test]
    fn test_suffixed_definition_counts_as_existing() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_source(&dir);
        let mut target = target_doc();
        target.node_groups.push(NodeGroupDef {
            name: "Smooth Edges.003".to_string(),
            description: None,
        });

        let outcome = append_group(&source, "Smooth Edges", &mut target, None, None).unwrap();
        assert!(outcome.reused);
        assert_eq!(outcome.group, "Smooth Edges.003");
        assert_eq!(target.node_groups.len(), 1);
    }

    #[test]
    fn test_lookup_failures_leave_target_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_source(&dir);

        let mut target = target_doc();
        let err = append_group(&source, "Missing", &mut target, None, None).unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Lookup(LookupError::GroupMissing { .. })
        ));
        assert!(target.node_groups.is_empty());
        assert!(target.trees[0].nodes.is_empty());

        let err = append_group(Path::new("/nope.json"), "X", &mut target, None, None).unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Lookup(LookupError::SourceMissing { .. })
        ));
    }

    #[test]
    fn test_missing_tree_kind_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_source(&dir);
        let mut target = target_doc();

        let err = append_group(&source, "Smooth Edges", &mut target, Some(TreeKind::Shader), None)
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::Error::Lookup(LookupError::TreeMissing {
                kind: Some(TreeKind::Shader)
            })
        ));

        assert!(
            target.node_groups.is_empty(),
            "a missing tree must not leave an imported definition behind"
        );

        // no kind requested and no trees at all
        let mut empty = Document::default();
        let err = append_group(&source, "Smooth Edges", &mut empty, None, None).unwrap_err();
        match err {
            crate::error::Error::Lookup(e @ LookupError::TreeMissing { kind: None }) => {
                assert_eq!(e.to_string(), "target document has no node tree");
            }
            other => panic!("expected TreeMissing, got {other:?}"),
        }
        assert!(empty.node_groups.is_empty());
    }
}
