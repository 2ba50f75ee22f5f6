//! Persistent list of registered library source files.
//!
//! The list lives next to the derived records as a TOML file and carries the
//! per-file enable flag and menu prefix used by the materializer.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default file name for the entry list, relative to the workspace root.
pub const LIBRARY_FILE_NAME: &str = ".library.toml";

/// One registered source file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LibraryEntry {
    /// Display name, unique within the list.
    pub name: String,
    /// Path of the source document.
    pub filepath: PathBuf,
    /// Prefix shown before the file's root menu label.
    #[serde(default)]
    pub prefix: String,
    /// Disabled entries keep their records but are hidden from menus.
    #[serde(default = "default_enabled")]
    pub is_enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// The full entry list, in registration order.
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq)]
pub struct Library {
    #[serde(default)]
    pub entries: Vec<LibraryEntry>,
}

impl Library {
    /// Load the list from `path`, or an empty list if the file is absent.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| Error::LibraryCache {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let raw = toml::to_string_pretty(self)?;
        fs::write(path, raw).map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn get(&self, name: &str) -> Option<&LibraryEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Register a new entry. Names are unique keys.
    pub fn add(&mut self, entry: LibraryEntry) -> Result<()> {
        if self.get(&entry.name).is_some() {
            return Err(Error::DuplicateEntry { name: entry.name });
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Remove an entry by name. Returns it if it was present.
    pub fn remove(&mut self, name: &str) -> Option<LibraryEntry> {
        let pos = self.entries.iter().position(|e| e.name == name)?;
        Some(self.entries.remove(pos))
    }

    /// Flip the enable flag. Returns false if no entry matches.
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> bool {
        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(entry) => {
                entry.is_enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Entries that should appear in materialized menus.
    pub fn enabled(&self) -> impl Iterator<Item = &LibraryEntry> {
        self.entries.iter().filter(|e| e.is_enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str) -> LibraryEntry {
        LibraryEntry {
            name: name.to_string(),
            filepath: PathBuf::from(format!("/library/{name}.json")),
            prefix: String::new(),
            is_enabled: true,
        }
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let mut lib = Library::default();
        lib.add(entry("Mesh Utils")).unwrap();
        let err = lib.add(entry("Mesh Utils")).unwrap_err();
        assert!(matches!(err, Error::DuplicateEntry { name } if name == "Mesh Utils"));
    }

    #[test]
    fn test_enable_flag_filters_entries() {
        let mut lib = Library::default();
        lib.add(entry("A")).unwrap();
        lib.add(entry("B")).unwrap();
        assert!(lib.set_enabled("B", false));
        assert!(!lib.set_enabled("missing", false));

        let names: Vec<&str> = lib.enabled().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["A"]);
    }

    #[test]
    fn test_round_trips_through_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(LIBRARY_FILE_NAME);

        let mut lib = Library::default();
        lib.add(entry("Mesh Utils")).unwrap();
        lib.set_enabled("Mesh Utils", false);
        lib.save(&path).unwrap();

        let loaded = Library::load(&path).unwrap();
        assert_eq!(loaded, lib);
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let lib = Library::load(Path::new("/nonexistent/.library.toml")).unwrap();
        assert!(lib.entries.is_empty());
    }
}
