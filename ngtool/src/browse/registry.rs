//! Menu registry: every persisted record loaded into one owned value.
//!
//! The registry is rebuilt wholesale on reload and swapped in atomically;
//! a failed rebuild leaves the previous registry untouched.

use std::{collections::BTreeMap, path::PathBuf};

use nglib::{
    config::ConfigStore,
    library::Library,
    menu::{GroupKey, LeafItem, MenuNode},
};

/// A root menu: one library tree of one source file.
#[derive(Debug, Clone)]
pub struct RootMenu {
    /// Display label, with the library entry's prefix applied.
    pub label: String,
    /// Id of the root [`MenuNode`].
    pub id: String,
    /// Source document the tree was derived from.
    pub source: PathBuf,
}

/// A leaf with the source document it activates from.
#[derive(Debug, Clone)]
pub struct LeafEntry {
    pub item: LeafItem,
    pub source: PathBuf,
}

#[derive(Debug, Default)]
pub struct MenuRegistry {
    pub roots: Vec<RootMenu>,
    menus: BTreeMap<String, MenuNode>,
    leaves: BTreeMap<String, LeafEntry>,
}

impl MenuRegistry {
    /// Build the registry from every record in the store.
    ///
    /// When the library list has entries, only records of enabled entries are
    /// registered and the entry's prefix decorates the root label; an empty
    /// list registers everything.
    pub fn load(store: &ConfigStore, library: &Library) -> nglib::Result<Self> {
        let mut registry = Self::default();

        for (_, record) in store.load_all()? {
            let source = PathBuf::from(&record.filepath);
            let prefix = if library.entries.is_empty() {
                Some("")
            } else {
                library
                    .enabled()
                    .find(|e| e.filepath == source)
                    .map(|e| e.prefix.as_str())
            };
            let Some(prefix) = prefix else {
                continue;
            };

            for (_, config) in &record.configs {
                let Some(root_id) = config.root_id() else {
                    continue;
                };
                let root_label = &config.menus[root_id].label;
                let label = if prefix.is_empty() {
                    root_label.clone()
                } else {
                    format!("{prefix} {root_label}")
                };
                registry.roots.push(RootMenu {
                    label,
                    id: root_id.to_string(),
                    source: source.clone(),
                });
                for (id, menu) in &config.menus {
                    registry.menus.insert(id.clone(), menu.clone());
                }
                for (id, leaf) in &config.nodegroups {
                    registry.leaves.insert(
                        id.clone(),
                        LeafEntry {
                            item: leaf.clone(),
                            source: source.clone(),
                        },
                    );
                }
            }
        }

        registry.roots.sort_by(|a, b| a.label.cmp(&b.label));
        Ok(registry)
    }

    pub fn menu(&self, id: &str) -> Option<&MenuNode> {
        self.menus.get(id)
    }

    pub fn leaf(&self, id: &str) -> Option<&LeafEntry> {
        self.leaves.get(id)
    }

    /// Flatten a menu's buckets into display rows, separators between
    /// buckets, in pinned group order.
    pub fn rows_of(&self, menu: &MenuNode) -> Vec<Row> {
        let mut keys: Vec<GroupKey> = menu
            .items
            .submenus
            .keys()
            .chain(menu.items.nodegroups.keys())
            .copied()
            .collect();
        keys.sort();
        keys.dedup();

        let mut rows = Vec::new();
        for key in keys {
            if !rows.is_empty() {
                rows.push(Row::Separator);
            }
            if let Some(ids) = menu.items.submenus.get(&key) {
                rows.extend(ids.iter().cloned().map(Row::Submenu));
            }
            if let Some(ids) = menu.items.nodegroups.get(&key) {
                rows.extend(ids.iter().cloned().map(Row::Leaf));
            }
        }
        rows
    }

    /// Leaf ids of a menu in pinned group order, without separators.
    pub fn leaf_ids_of(&self, menu: &MenuNode) -> Vec<String> {
        menu.items
            .nodegroups
            .values()
            .flat_map(|ids| ids.iter().cloned())
            .collect()
    }
}

/// One display row of a compact menu.
#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    Submenu(String),
    Leaf(String),
    Separator,
}

impl Row {
    pub fn is_selectable(&self) -> bool {
        !matches!(self, Row::Separator)
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use nglib::{Document, derive_document, doc::*, library::LibraryEntry};

    use super::*;

    fn store_with_record(dir: &Path, source: &Path) -> ConfigStore {
        let doc = Document {
            trees: vec![NodeTree {
                kind: TreeKind::Geometry,
                name: LIBRARY_TREE_NAME.to_string(),
                nodes: vec![
                    GraphNode {
                        name: "F1".to_string(),
                        kind: NodeKind::Frame,
                        label: "Utilities".to_string(),
                        parent: None,
                        mute: false,
                        use_custom_color: false,
                        color: None,
                        node_tree: None,
                        width: 140.0,
                    },
                    GraphNode {
                        name: "G1".to_string(),
                        kind: NodeKind::Group,
                        label: String::new(),
                        parent: Some("F1".to_string()),
                        mute: false,
                        use_custom_color: false,
                        color: None,
                        node_tree: Some("Smooth Edges".to_string()),
                        width: 140.0,
                    },
                ],
            }],
            node_groups: Vec::new(),
        };
        let record = derive_document(source, &doc).unwrap();
        let store = ConfigStore::new(dir.join("menu_configs"));
        store.write("Mesh Utils", &record).unwrap();
        store
    }

    #[test]
    fn test_empty_library_registers_everything() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("Mesh Utils.json");
        let store = store_with_record(dir.path(), &source);

        let registry = MenuRegistry::load(&store, &Library::default()).unwrap();
        assert_eq!(registry.roots.len(), 1);
        assert_eq!(registry.roots[0].label, "Mesh Utils");

        let root = registry.menu(&registry.roots[0].id).unwrap();
        let rows = registry.rows_of(root);
        assert_eq!(rows.len(), 1);
        assert!(matches!(&rows[0], Row::Submenu(_)));
    }

    #[test]
    fn test_disabled_entries_are_hidden_and_prefix_applies() {
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("Mesh Utils.json");
        let store = store_with_record(dir.path(), &source);

        let mut library = Library::default();
        library
            .add(LibraryEntry {
                name: "Mesh Utils".to_string(),
                filepath: source.clone(),
                prefix: "[GN]".to_string(),
                is_enabled: true,
            })
            .unwrap();

        let registry = MenuRegistry::load(&store, &library).unwrap();
        assert_eq!(registry.roots.len(), 1);
        assert_eq!(registry.roots[0].label, "[GN] Mesh Utils");
        assert_eq!(registry.roots[0].source, source);

        library.set_enabled("Mesh Utils", false);
        let registry = MenuRegistry::load(&store, &library).unwrap();
        assert!(registry.roots.is_empty());
    }
}
