//! Persisted config records and the on-disk store.
//!
//! One record per source document, written as pretty-printed JSON under the
//! config directory. Writes are full replacements through a temp file plus
//! rename, so a crashed or failed run can never leave a half-written record:
//! the previous record stays authoritative until a new derivation succeeds.
//!
//! # Record File Format
//!
//! ```json
//! {
//!   "filepath": "/abs/path/Mesh Utils.json",
//!   "configs": {
//!     "geometry": {
//!       "menus": { "NGL_MT_MU_GEO_main": { "label": "Mesh Utils", ... } },
//!       "nodegroups": { "NGL_MT_MU_GEO_ab12...": { "node_tree": "...", ... } }
//!     }
//!   }
//! }
//! ```

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{
    doc::TreeKind,
    error::{Error, Result},
    menu::{LeafItem, MenuNode},
};

/// Directory name the records live under, relative to the tool root.
pub const CONFIG_DIR_NAME: &str = "menu_configs";

/// The derived menu structure of one tree kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeConfig {
    /// Menus keyed by derived id.
    pub menus: BTreeMap<String, MenuNode>,
    /// Leaf items keyed by derived id.
    pub nodegroups: BTreeMap<String, LeafItem>,
}

impl TreeConfig {
    /// Id of the root menu (the one ending in the literal `main`).
    pub fn root_id(&self) -> Option<&str> {
        self.menus
            .keys()
            .find(|id| id.ends_with("_main"))
            .map(String::as_str)
    }
}

/// The persisted unit of output: one source document's derivation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigRecord {
    /// Absolute path of the source document the menus came from.
    pub filepath: String,
    /// Per-kind derived configs; kinds without menu structure are absent.
    pub configs: BTreeMap<TreeKind, TreeConfig>,
}

/// Slugify a source file name into a record file stem.
///
/// Lowercases, maps runs of non-alphanumeric characters to single dashes and
/// trims them from the ends.
pub fn slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    out
}

/// The on-disk record store (one JSON file per source document).
#[derive(Debug, Clone)]
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    /// Store rooted at the given directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        ConfigStore { dir: dir.into() }
    }

    /// The store directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Record path for a source file stem.
    pub fn record_path(&self, main_name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", slug(main_name)))
    }

    /// Persist a record, fully replacing any previous one for this source.
    ///
    /// The record is serialized to a temp file in the store directory and
    /// renamed into place.
    pub fn write(&self, main_name: &str, record: &ConfigRecord) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).map_err(|source| Error::Write {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.record_path(main_name);
        let content = serde_json::to_string_pretty(record).map_err(|source| Error::Json {
            path: path.clone(),
            source,
        })?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content).map_err(|source| Error::Write {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| Error::Write {
            path: path.clone(),
            source,
        })?;

        info!("wrote config record {}", path.display());
        Ok(path)
    }

    /// Load one record.
    pub fn load(&self, path: &Path) -> Result<ConfigRecord> {
        let content = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load every record in the store, sorted by file name.
    ///
    /// A missing store directory is an empty store, not an error.
    pub fn load_all(&self) -> Result<Vec<(PathBuf, ConfigRecord)>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(Error::Read {
                    path: self.dir.clone(),
                    source,
                });
            }
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("json"))
            .collect();
        paths.sort();

        let mut records = Vec::with_capacity(paths.len());
        for path in paths {
            let record = self.load(&path)?;
            records.push((path, record));
        }
        Ok(records)
    }
}
