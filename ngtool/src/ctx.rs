//! Application context and state management.
//!
//! This module provides the [`AppContext`] type which holds the global state
//! for the ngtool application: the workspace root and the paths derived from
//! it for the entry list and the config store.

use std::path::{Path, PathBuf};

use anyhow::Context;
use nglib::{
    config::{CONFIG_DIR_NAME, ConfigStore},
    library::{LIBRARY_FILE_NAME, Library},
};

/// Path configuration grouping all path-related fields.
#[derive(Debug, Clone)]
pub struct PathConfig {
    /// Workspace root directory; everything else hangs off it.
    pub root: PathBuf,
}

impl PathConfig {
    /// Path of the library entry list.
    pub fn library_file(&self) -> PathBuf {
        self.root.join(LIBRARY_FILE_NAME)
    }

    /// Directory holding the derived per-file records.
    pub fn config_dir(&self) -> PathBuf {
        self.root.join(CONFIG_DIR_NAME)
    }
}

/// The main application context holding all state.
///
/// Constructed once in `main` from the global `--root` flag and passed to
/// every command handler.
#[derive(Debug, Clone)]
pub struct AppContext {
    /// Path configuration for the workspace.
    pub paths: PathConfig,
}

impl AppContext {
    pub fn new(root: &Path) -> Self {
        Self {
            paths: PathConfig {
                root: root.to_path_buf(),
            },
        }
    }

    /// Config store rooted under the workspace.
    pub fn store(&self) -> ConfigStore {
        ConfigStore::new(self.paths.config_dir())
    }

    /// Load the library entry list, or an empty one when absent.
    pub fn load_library(&self) -> anyhow::Result<Library> {
        let path = self.paths.library_file();
        Library::load(&path).with_context(|| format!("loading library list {}", path.display()))
    }

    pub fn save_library(&self, library: &Library) -> anyhow::Result<()> {
        let path = self.paths.library_file();
        library
            .save(&path)
            .with_context(|| format!("saving library list {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_hang_off_root() {
        let ctx = AppContext::new(Path::new("/work"));
        assert_eq!(ctx.paths.library_file(), PathBuf::from("/work/.library.toml"));
        assert_eq!(ctx.paths.config_dir(), PathBuf::from("/work/menu_configs"));
    }

    #[test]
    fn test_missing_library_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = AppContext::new(dir.path());
        let lib = ctx.load_library().unwrap();
        assert!(lib.entries.is_empty());
    }
}
