//! The fixed table of icon identifiers accepted by `ICON:` variables.

/// Known icon identifiers, as the menu materializer understands them.
///
/// `ICON` variable values are matched against this table after quote
/// stripping and uppercasing.
pub const ICON_NAMES: &[&str] = &[
    "NONE",
    "QUESTION",
    "ERROR",
    "CANCEL",
    "ADD",
    "REMOVE",
    "ASSET_MANAGER",
    "NODETREE",
    "NODE",
    "MATERIAL",
    "TEXTURE",
    "WORLD",
    "SCENE_DATA",
    "MESH_CUBE",
    "MESH_PLANE",
    "MESH_UVSPHERE",
    "MESH_ICOSPHERE",
    "MESH_CYLINDER",
    "MESH_TORUS",
    "MESH_MONKEY",
    "CURVE_BEZCURVE",
    "CURVE_NCURVE",
    "LIGHT",
    "LIGHT_POINT",
    "LIGHT_SUN",
    "LIGHT_SPOT",
    "CAMERA_DATA",
    "IMAGE_DATA",
    "FILE_FOLDER",
    "MODIFIER",
    "PARTICLES",
    "PHYSICS",
    "GEOMETRY_NODES",
    "SHADING_RENDERED",
    "SHADING_WIRE",
    "SNAP_FACE",
    "COLOR",
    "BRUSH_DATA",
    "FORCE_TURBULENCE",
    "TOOL_SETTINGS",
];

/// Normalize a raw `ICON:` value: strip quotes, trim, uppercase.
///
/// Validation against [`ICON_NAMES`] is the caller's job; normalization and
/// membership are separate so error messages can show the normalized form.
pub fn normalize(raw: &str) -> String {
    raw.replace(['\'', '"'], "").trim().to_uppercase()
}

/// Whether a normalized icon name is in the known table.
pub fn is_known(name: &str) -> bool {
    ICON_NAMES.contains(&name)
}
