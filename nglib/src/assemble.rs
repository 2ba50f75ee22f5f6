//! Tree assembler: turns scanned node lists into a menu tree.
//!
//! Each library tree is assembled independently. The pipeline is strict:
//! any validation error aborts the whole run for the source file and nothing
//! is written, leaving the previous record authoritative.

use std::{
    collections::{BTreeMap, HashMap},
    path::Path,
};

use crate::{
    config::{ConfigRecord, TreeConfig},
    doc::{Document, NodeTree, TreeKind},
    error::{Result, ValidationError},
    menu::{GroupKey, IdGenerator, LeafItem, MenuItems, MenuNode},
    scan::{ScanLists, scan},
    vars::{Assignment, VarName, VarValue, parse_variable},
};

/// Variable assignments buffered per target before finalization.
type VarMap = BTreeMap<VarName, (VarValue, String)>;

/// A menu under construction: flat child lists, unbucketed.
#[derive(Debug, Default)]
struct MenuDraft {
    label: String,
    submenus: Vec<String>,
    nodegroups: Vec<String>,
    vars: VarMap,
}

/// Derive the full config record for one document.
///
/// The record's `filepath` is stored as given; callers pass the canonical
/// absolute path. Library trees without a single frame or group node are
/// skipped, so a document with no menu structure yields an empty `configs`
/// map rather than an error.
pub fn derive_document(filepath: &Path, doc: &Document) -> Result<ConfigRecord> {
    let main_name = filepath
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut configs = BTreeMap::new();
    for (kind, tree) in doc.library_trees()? {
        let lists = scan(tree);
        if !lists.has_menu_nodes() {
            debug!("skipping {kind} tree of '{main_name}': no frames or groups");
            continue;
        }
        let mut ids = IdGenerator::new(&main_name);
        let config = assemble(&mut ids, kind, tree, &lists, &main_name)?;
        configs.insert(kind, config);
    }

    Ok(ConfigRecord {
        filepath: filepath.display().to_string(),
        configs,
    })
}

/// Assemble one tree's menu structure.
///
/// `main_label` becomes the root menu's label (the source file's name).
pub fn assemble(
    ids: &mut IdGenerator,
    kind: TreeKind,
    tree: &NodeTree,
    lists: &ScanLists,
    main_label: &str,
) -> Result<TreeConfig, ValidationError> {
    let root = ids.root_id(kind);
    let mut menus: BTreeMap<String, MenuDraft> = BTreeMap::new();
    menus.insert(
        root.clone(),
        MenuDraft {
            label: main_label.to_string(),
            ..Default::default()
        },
    );

    // Property frames first: nesting check, then an empty metadata buffer
    // each. Buffers are merged into the wrapped group's leaf and discarded;
    // they never reach the record.
    let mut prop_buffers: HashMap<String, VarMap> = HashMap::new();
    for node in &lists.property_frames {
        if let Some(parent) = tree.parent_frame(node)?
            && parent.is_property_frame()
        {
            return Err(ValidationError::NestedPropertyFrame {
                label: node.label.clone(),
                node: node.name.clone(),
                parent: parent.name.clone(),
            });
        }
        let id = ids.menu_id(kind, &node.name)?;
        prop_buffers.insert(id, VarMap::new());
    }

    // Regular frames become menus. Create every draft before linking so
    // child frames may precede their parents in document order.
    for node in &lists.frames {
        let id = ids.menu_id(kind, &node.name)?;
        menus.insert(
            id,
            MenuDraft {
                label: node.label.clone(),
                ..Default::default()
            },
        );
    }
    for node in &lists.frames {
        let id = ids.menu_id(kind, &node.name)?;
        let parent_id = match tree.parent_frame(node)? {
            Some(parent) if parent.is_property_frame() => {
                return Err(ValidationError::FrameInPropertyFrame {
                    label: node.label.clone(),
                    node: node.name.clone(),
                    parent: parent.name.clone(),
                });
            }
            Some(parent) => ids.menu_id(kind, &parent.name)?,
            None => root.clone(),
        };
        menus
            .get_mut(&parent_id)
            .expect("frame parents are registered menus")
            .submenus
            .push(id);
    }

    // Variables attach to the enclosing property frame or menu; the root
    // menu is the fallback for parentless nodes.
    for node in &lists.variables {
        let assignment = parse_variable(node)?;
        match tree.parent_frame(node)? {
            Some(parent) if parent.is_property_frame() => {
                let pid = ids.menu_id(kind, &parent.name)?;
                let buffer = prop_buffers
                    .get_mut(&pid)
                    .expect("property frames are registered before variables");
                insert_var(buffer, assignment, &format!("property frame {pid}"))?;
            }
            Some(parent) => {
                let pid = ids.menu_id(kind, &parent.name)?;
                let draft = menus
                    .get_mut(&pid)
                    .expect("frame parents are registered menus");
                insert_var(&mut draft.vars, assignment, &format!("menu {pid}"))?;
            }
            None => {
                let draft = menus.get_mut(&root).expect("root menu always exists");
                insert_var(&mut draft.vars, assignment, &format!("menu {root}"))?;
            }
        }
    }

    // Groups become leaves. A group wrapped by a property frame climbs one
    // extra level and takes the buffered metadata with it.
    let mut nodegroups: BTreeMap<String, LeafItem> = BTreeMap::new();
    for node in &lists.groups {
        let id = ids.menu_id(kind, &node.name)?;
        let node_tree = node
            .node_tree
            .clone()
            .ok_or_else(|| ValidationError::GroupWithoutTree {
                node: node.name.clone(),
            })?;

        let (parent_id, extra) = match tree.parent_frame(node)? {
            Some(parent) if parent.is_property_frame() => {
                let pid = ids.menu_id(kind, &parent.name)?;
                let extra = prop_buffers.get(&pid).cloned().unwrap_or_default();
                let parent_id = match tree.parent_frame(parent)? {
                    Some(grand) => ids.menu_id(kind, &grand.name)?,
                    None => root.clone(),
                };
                (parent_id, extra)
            }
            Some(parent) => (ids.menu_id(kind, &parent.name)?, VarMap::new()),
            None => (root.clone(), VarMap::new()),
        };

        let mut leaf = LeafItem {
            label: node.label.clone(),
            width: node.width,
            node_tree,
            icon: None,
            group_index: None,
            sort_index: None,
        };
        if let Some((VarValue::Icon(name), _)) = extra.get(&VarName::Icon) {
            leaf.icon = Some(name.clone());
        }
        if let Some((VarValue::Index(i), _)) = extra.get(&VarName::GroupIndex) {
            leaf.group_index = Some(*i);
        }
        if let Some((VarValue::Index(i), _)) = extra.get(&VarName::SortIndex) {
            leaf.sort_index = Some(*i);
        }

        nodegroups.insert(id.clone(), leaf);
        menus
            .get_mut(&parent_id)
            .expect("group parents are registered menus")
            .nodegroups
            .push(id);
    }

    // Finalize: sort children deterministically, compute expandability from
    // a one-level lookahead, and bucket by group key.
    let mut finished: BTreeMap<String, MenuNode> = BTreeMap::new();
    for (id, draft) in &menus {
        let mut submenu_ids = draft.submenus.clone();
        submenu_ids.sort_by(|a, b| menus[a].label.cmp(&menus[b].label));

        let mut leaf_ids = draft.nodegroups.clone();
        leaf_ids.sort_by(|a, b| nodegroups[a].node_tree.cmp(&nodegroups[b].node_tree));

        let is_expandable =
            !submenu_ids.is_empty() && submenu_ids.iter().all(|s| menus[s].submenus.is_empty());

        let mut items = MenuItems::default();
        for sid in submenu_ids {
            let key = match menus[&sid].vars.get(&VarName::GroupIndex) {
                Some((VarValue::Index(i), _)) => GroupKey::Index(*i),
                _ => GroupKey::Ungrouped,
            };
            items.submenus.entry(key).or_default().push(sid);
        }
        for lid in leaf_ids {
            let key = match nodegroups[&lid].group_index {
                Some(i) => GroupKey::Index(i),
                None => GroupKey::Ungrouped,
            };
            items.nodegroups.entry(key).or_default().push(lid);
        }

        let icon = match draft.vars.get(&VarName::Icon) {
            Some((VarValue::Icon(name), _)) => Some(name.clone()),
            _ => None,
        };
        let index_var = |name: VarName| match draft.vars.get(&name) {
            Some((VarValue::Index(i), _)) => Some(*i),
            _ => None,
        };

        finished.insert(
            id.clone(),
            MenuNode {
                label: draft.label.clone(),
                items,
                is_expandable,
                icon,
                group_index: index_var(VarName::GroupIndex),
                sort_index: index_var(VarName::SortIndex),
            },
        );
    }

    Ok(TreeConfig {
        menus: finished,
        nodegroups,
    })
}

fn insert_var(map: &mut VarMap, assignment: Assignment, target: &str) -> Result<(), ValidationError> {
    if let Some((_, first)) = map.get(&assignment.name) {
        return Err(ValidationError::DuplicateVariable {
            name: assignment.name.to_string(),
            target: target.to_string(),
            first: first.clone(),
            node: assignment.node,
        });
    }
    map.insert(assignment.name, (assignment.value, assignment.node));
    Ok(())
}
