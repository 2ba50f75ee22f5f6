//! Menu tree value types and deterministic id generation.
//!
//! Menu ids are pure functions of the source file name and the node name, so
//! re-running a derivation on an unchanged graph reproduces the exact same
//! record. Collisions between distinct node names are detected and rejected
//! instead of silently overwriting a menu.

use std::{
    cmp::Ordering,
    collections::{BTreeMap, HashMap},
    fmt,
    str::FromStr,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use sha2::{Digest, Sha256};

use crate::{doc::TreeKind, error::ValidationError};

/// Id prefix shared by every generated menu, mirroring the host-side
/// `<ADDON>_MT_` convention.
pub const ID_PREFIX: &str = "NGL_MT";

/// Grouping key for submenu/leaf buckets.
///
/// Ordering is pinned explicitly: the ungrouped bucket always sorts first,
/// remaining buckets ascend numerically. Keys serialize as strings (`"None"`
/// or the decimal index) so they can act as JSON map keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    /// No `GROUP_INDEX` assigned; always the first bucket.
    Ungrouped,
    /// Explicit `GROUP_INDEX` value.
    Index(u32),
}

impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (GroupKey::Ungrouped, GroupKey::Ungrouped) => Ordering::Equal,
            (GroupKey::Ungrouped, GroupKey::Index(_)) => Ordering::Less,
            (GroupKey::Index(_), GroupKey::Ungrouped) => Ordering::Greater,
            (GroupKey::Index(a), GroupKey::Index(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Ungrouped => f.write_str("None"),
            GroupKey::Index(i) => write!(f, "{i}"),
        }
    }
}

impl FromStr for GroupKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "None" {
            return Ok(GroupKey::Ungrouped);
        }
        s.parse::<u32>()
            .map(GroupKey::Index)
            .map_err(|_| format!("invalid group key '{s}'"))
    }
}

impl Serialize for GroupKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for GroupKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

/// Child id lists of one menu, bucketed by group key.
///
/// Within a bucket, submenus are ordered by child label and leaves by
/// referenced sub-graph name; buckets iterate in pinned [`GroupKey`] order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MenuItems {
    /// Child submenu ids per bucket.
    pub submenus: BTreeMap<GroupKey, Vec<String>>,
    /// Child leaf ids per bucket.
    pub nodegroups: BTreeMap<GroupKey, Vec<String>>,
}

/// One derived menu.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuNode {
    /// Display label; the root menu carries the source file's name.
    pub label: String,
    /// Bucketed child ids.
    pub items: MenuItems,
    /// Whether the menu may be flattened into side-by-side columns:
    /// true iff it has at least one submenu and none of those submenus has
    /// submenus of its own (a one-level lookahead, not recursive).
    pub is_expandable: bool,
    /// Optional icon from an `ICON:` variable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Bucket this menu lands in inside its parent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_index: Option<u32>,
    /// Free numeric sort key, carried through for consumers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_index: Option<u32>,
}

/// One insertable node-group reference (a menu leaf).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeafItem {
    /// Authored label; may be empty.
    pub label: String,
    /// Display width used when the group is inserted.
    pub width: f32,
    /// Referenced sub-graph name; the activation key.
    pub node_tree: String,
    /// Optional icon merged from the enclosing property frame.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Bucket this leaf lands in inside its menu.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_index: Option<u32>,
    /// Free numeric sort key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_index: Option<u32>,
}

impl LeafItem {
    /// Label to render: the authored label, or the sub-graph name when unset.
    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.node_tree
        } else {
            &self.label
        }
    }
}

/// Deterministic id generator for one derivation run.
///
/// Ids look like `NGL_MT_{abbr}_{PREFIX}_{hash}`: a source-file abbreviation,
/// the tree-kind prefix, and the first 8 bytes of
/// `SHA-256(main_name + node_name)` in lowercase hex. The root menu uses the
/// literal `main` in place of the hash.
#[derive(Debug)]
pub struct IdGenerator {
    main_name: String,
    abbr: String,
    // id -> node name, for collision detection
    assigned: HashMap<String, String>,
}

/// Abbreviation of a source file name: first character of each of the first
/// ten `_`-separated words, spaces mapped to underscores.
pub fn abbreviate(main_name: &str) -> String {
    main_name
        .replace(' ', "_")
        .split('_')
        .take(10)
        .filter_map(|word| word.chars().next())
        .collect()
}

impl IdGenerator {
    /// Generator for one source file, identified by its stem.
    pub fn new(main_name: &str) -> Self {
        IdGenerator {
            main_name: main_name.to_string(),
            abbr: abbreviate(main_name),
            assigned: HashMap::new(),
        }
    }

    /// The source-file abbreviation embedded in every id.
    pub fn abbr(&self) -> &str {
        &self.abbr
    }

    /// The root menu id for a tree kind.
    pub fn root_id(&self, kind: TreeKind) -> String {
        self.idname("main", kind)
    }

    /// Derive (and register) the id for a named node.
    ///
    /// Calling this twice for the same node name is fine; two different node
    /// names mapping to the same id is a hard error.
    pub fn menu_id(&mut self, kind: TreeKind, node_name: &str) -> Result<String, ValidationError> {
        let digest = Sha256::digest(format!("{}{}", self.main_name, node_name));
        let hash = hex::encode(&digest[..8]);
        let id = self.idname(&hash, kind);

        if let Some(first) = self.assigned.get(&id) {
            if first != node_name {
                return Err(ValidationError::IdCollision {
                    id,
                    first: first.clone(),
                    second: node_name.to_string(),
                });
            }
        } else {
            self.assigned.insert(id.clone(), node_name.to_string());
        }
        Ok(id)
    }

    fn idname(&self, name: &str, kind: TreeKind) -> String {
        format!("{ID_PREFIX}_{}_{}_{name}", self.abbr, kind.prefix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_key_order_is_ungrouped_then_numeric() {
        let mut keys = vec![
            GroupKey::Index(10),
            GroupKey::Index(2),
            GroupKey::Ungrouped,
            GroupKey::Index(0),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![
                GroupKey::Ungrouped,
                GroupKey::Index(0),
                GroupKey::Index(2),
                GroupKey::Index(10),
            ]
        );
    }

    #[test]
    fn test_group_key_string_round_trip() {
        for key in [GroupKey::Ungrouped, GroupKey::Index(0), GroupKey::Index(42)] {
            let s = key.to_string();
            assert_eq!(s.parse::<GroupKey>().unwrap(), key);
        }
        assert!("nope".parse::<GroupKey>().is_err());
        assert!("-1".parse::<GroupKey>().is_err());
    }

    #[test]
    fn test_group_key_as_json_map_key() {
        let mut map: BTreeMap<GroupKey, Vec<String>> = BTreeMap::new();
        map.insert(GroupKey::Index(2), vec!["b".to_string()]);
        map.insert(GroupKey::Ungrouped, vec!["a".to_string()]);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"None":["a"],"2":["b"]}"#);

        let back: BTreeMap<GroupKey, Vec<String>> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, map);
    }

    #[test]
    fn test_abbreviation() {
        assert_eq!(abbreviate("Mesh Utils"), "MU");
        assert_eq!(abbreviate("my_node_library"), "mnl");
        assert_eq!(abbreviate("one"), "o");
    }

    #[test]
    fn test_ids_are_deterministic() {
        let mut a = IdGenerator::new("Mesh Utils");
        let mut b = IdGenerator::new("Mesh Utils");
        let id_a = a.menu_id(TreeKind::Geometry, "Frame.001").unwrap();
        let id_b = b.menu_id(TreeKind::Geometry, "Frame.001").unwrap();
        assert_eq!(id_a, id_b);
        assert!(id_a.starts_with("NGL_MT_MU_GEO_"));

        // repeated registration of the same node is not a collision
        assert_eq!(a.menu_id(TreeKind::Geometry, "Frame.001").unwrap(), id_a);

        // same node name in a different kind gets a different id
        let id_shad = a.menu_id(TreeKind::Shader, "Frame.001").unwrap();
        assert_ne!(id_a, id_shad);
    }

    #[test]
    fn test_root_id_uses_literal_main() {
        let ids = IdGenerator::new("Mesh Utils");
        assert_eq!(ids.root_id(TreeKind::Texture), "NGL_MT_MU_TEX_main");
    }

    #[test]
    fn test_leaf_label_falls_back_to_node_tree() {
        let leaf = LeafItem {
            label: String::new(),
            width: 140.0,
            node_tree: "Smooth Edges".to_string(),
            icon: None,
            group_index: None,
            sort_index: None,
        };
        assert_eq!(leaf.display_label(), "Smooth Edges");
    }
}
