//! Metadata parser for `NAME: VALUE` variable labels.
//!
//! Value nodes are repurposed as inline metadata: their label must split into
//! exactly one name and one value. The name is checked against a fixed schema
//! and the value is validated and normalized per name. Validation is
//! fail-fast: one bad label aborts the whole derivation for its source file.

use std::fmt;

use crate::{
    doc::GraphNode,
    error::ValidationError,
    icons,
};

/// The fixed variable schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VarName {
    /// Icon identifier shown next to the menu or leaf.
    Icon,
    /// Bucket key used when grouping submenus/leaves.
    GroupIndex,
    /// Free numeric sort key carried through to the record.
    SortIndex,
}

impl VarName {
    /// Parse the uppercase schema name, e.g. `GROUP_INDEX`.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "ICON" => Some(VarName::Icon),
            "GROUP_INDEX" => Some(VarName::GroupIndex),
            "SORT_INDEX" => Some(VarName::SortIndex),
            _ => None,
        }
    }

    /// Canonical uppercase spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            VarName::Icon => "ICON",
            VarName::GroupIndex => "GROUP_INDEX",
            VarName::SortIndex => "SORT_INDEX",
        }
    }
}

impl fmt::Display for VarName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated, normalized variable value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VarValue {
    /// Normalized icon identifier from the known table.
    Icon(String),
    /// Non-negative index.
    Index(u32),
}

impl fmt::Display for VarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarValue::Icon(name) => f.write_str(name),
            VarValue::Index(i) => write!(f, "{i}"),
        }
    }
}

/// One parsed variable assignment, not yet attached to a target.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    /// Schema name.
    pub name: VarName,
    /// Validated value.
    pub value: VarValue,
    /// Name of the value node the assignment came from.
    pub node: String,
    /// The label in canonical `NAME: value` form.
    ///
    /// A host-resident run would write this back onto the node as a
    /// presentation affordance; a headless run only reports it.
    pub canonical_label: String,
}

/// Parse and validate one value node's label.
pub fn parse_variable(node: &GraphNode) -> Result<Assignment, ValidationError> {
    let parts: Vec<&str> = node.label.split(':').collect();
    if parts.len() != 2 {
        return Err(ValidationError::MalformedLabel {
            label: node.label.clone(),
            node: node.name.clone(),
        });
    }
    let raw_name = parts[0].trim();
    let raw_value = parts[1].trim();

    let name = VarName::parse(raw_name).ok_or_else(|| ValidationError::UnknownVariable {
        name: raw_name.to_string(),
        label: node.label.clone(),
        node: node.name.clone(),
    })?;

    let value = match name {
        VarName::Icon => {
            let normalized = icons::normalize(raw_value);
            if !icons::is_known(&normalized) {
                return Err(ValidationError::InvalidIcon {
                    value: normalized,
                    label: node.label.clone(),
                    node: node.name.clone(),
                });
            }
            VarValue::Icon(normalized)
        }
        VarName::GroupIndex | VarName::SortIndex => {
            VarValue::Index(parse_index(name, raw_value, node)?)
        }
    };

    let canonical_label = format!("{name}: {value}");
    Ok(Assignment {
        name,
        value,
        node: node.name.clone(),
        canonical_label,
    })
}

// Stricter than str::parse::<u32>: no sign, digits only.
fn parse_index(name: VarName, raw: &str, node: &GraphNode) -> Result<u32, ValidationError> {
    let invalid = || ValidationError::InvalidIndex {
        name: name.to_string(),
        value: raw.to_string(),
        label: node.label.clone(),
        node: node.name.clone(),
    };
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    raw.parse::<u32>().map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::NodeKind;

    fn value_node(label: &str) -> GraphNode {
        GraphNode {
            name: "Value.001".to_string(),
            kind: NodeKind::Value,
            label: label.to_string(),
            parent: None,
            mute: false,
            use_custom_color: false,
            color: None,
            node_tree: None,
            width: 140.0,
        }
    }

    #[test]
    fn test_missing_and_extra_colons_are_malformed() {
        for label in ["ICON MESH_CUBE", "A:B:C", ""] {
            let err = parse_variable(&value_node(label)).unwrap_err();
            assert!(
                matches!(err, ValidationError::MalformedLabel { .. }),
                "label {label:?} should be malformed, got {err:?}"
            );
        }
    }

    #[test]
    fn test_unknown_variable_name() {
        let err = parse_variable(&value_node("WIDTH: 12")).unwrap_err();
        assert_eq!(
            err,
            ValidationError::UnknownVariable {
                name: "WIDTH".to_string(),
                label: "WIDTH: 12".to_string(),
                node: "Value.001".to_string(),
            }
        );
    }

    #[test]
    fn test_icon_is_normalized_and_validated() {
        let a = parse_variable(&value_node("ICON:  'mesh_cube'")).unwrap();
        assert_eq!(a.value, VarValue::Icon("MESH_CUBE".to_string()));
        assert_eq!(a.canonical_label, "ICON: MESH_CUBE");

        // 变量名匹配是区分大小写的
        let err = parse_variable(&value_node("icon: MESH_CUBE")).unwrap_err();
        assert!(matches!(err, ValidationError::UnknownVariable { .. }));

        let err = parse_variable(&value_node("ICON: SPAGHETTI")).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidIcon { .. }));
    }

    #[test]
    fn test_indices_must_be_non_negative_integers() {
        let a = parse_variable(&value_node("GROUP_INDEX: 3")).unwrap();
        assert_eq!(a.value, VarValue::Index(3));
        assert_eq!(a.canonical_label, "GROUP_INDEX: 3");

        for bad in ["-1", "+3", "3.5", "three", ""] {
            let err = parse_variable(&value_node(&format!("SORT_INDEX: {bad}"))).unwrap_err();
            assert!(
                matches!(err, ValidationError::InvalidIndex { .. })
                    || matches!(err, ValidationError::MalformedLabel { .. }),
                "value {bad:?} should be rejected"
            );
        }
    }
}
