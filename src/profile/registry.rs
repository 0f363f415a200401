//! Profile registry
//!
//! Indexes profiles by id. Built-in dialects are compiled into the binary
//! with `include_dir!`; extra definitions are loaded from directories of
//! `*.toml` files.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use include_dir::{include_dir, Dir};
use walkdir::WalkDir;

use super::{ProfileDefinition, ProfileRef, TableProfile, DEFAULT_EXTENSION_PREFIX};
use crate::error::{BuildError, Result};

/// Built-in profile definitions
static BUILTIN_PROFILES: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/profiles");

/// Profiles indexed by id
#[derive(Debug, Clone)]
pub struct ProfileRegistry {
    profiles: BTreeMap<String, ProfileRef>,
    extension_prefix: String,
}

impl Default for ProfileRegistry {
    fn default() -> Self {
        Self {
            profiles: BTreeMap::new(),
            extension_prefix: DEFAULT_EXTENSION_PREFIX.to_string(),
        }
    }
}

impl ProfileRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in dialects
    pub fn builtin() -> Result<Self> {
        let mut registry = Self::new();
        registry.load_embedded(&BUILTIN_PROFILES)?;
        Ok(registry)
    }

    /// Prefix applied to definitions loaded afterwards that omit their own
    pub fn with_extension_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.extension_prefix = prefix.into();
        self
    }

    /// Add a profile; an existing profile with the same id is replaced and returned
    pub fn register(&mut self, profile: ProfileRef) -> Option<ProfileRef> {
        tracing::debug!(id = profile.id(), version = %profile.version(), "registering profile");
        self.profiles.insert(profile.id().to_string(), profile)
    }

    /// Register a parsed definition
    pub fn register_definition(&mut self, definition: ProfileDefinition) -> ProfileRef {
        let profile: ProfileRef = Arc::new(TableProfile::new(definition, &self.extension_prefix));
        self.register(Arc::clone(&profile));
        profile
    }

    /// Parse TOML text and register it
    pub fn load_str(&mut self, source: &str) -> Result<ProfileRef> {
        let definition = ProfileDefinition::from_toml_str(source)?;
        Ok(self.register_definition(definition))
    }

    /// Load one definition file
    pub fn load_file(&mut self, path: &Path) -> Result<ProfileRef> {
        let source = std::fs::read_to_string(path)?;
        self.load_str(&source).map_err(|e| match e {
            BuildError::Toml(inner) => {
                BuildError::InvalidProfile(format!("{}: {}", path.display(), inner))
            }
            other => other,
        })
    }

    /// Load every `*.toml` under `dir` (recursively, in path order).
    /// Returns the number of profiles loaded.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize> {
        if !dir.is_dir() {
            return Err(BuildError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("profile directory not found: {}", dir.display()),
            )));
        }

        let mut loaded = 0;
        for entry in WalkDir::new(dir)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || path.extension().map(|e| e != "toml").unwrap_or(true) {
                continue;
            }
            self.load_file(path)?;
            loaded += 1;
        }

        tracing::debug!(dir = %dir.display(), loaded, "loaded profile directory");
        Ok(loaded)
    }

    fn load_embedded(&mut self, dir: &Dir<'static>) -> Result<()> {
        for file in dir.files() {
            if file.path().extension().map(|e| e != "toml").unwrap_or(true) {
                continue;
            }
            let source = file.contents_utf8().ok_or_else(|| {
                BuildError::InvalidProfile(format!("{} is not UTF-8", file.path().display()))
            })?;
            self.load_str(source)?;
        }
        for subdir in dir.dirs() {
            self.load_embedded(subdir)?;
        }
        Ok(())
    }

    /// Fetch a profile by id
    pub fn get(&self, id: &str) -> Result<ProfileRef> {
        self.profiles
            .get(id)
            .cloned()
            .ok_or_else(|| BuildError::UnknownProfile(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.profiles.contains_key(id)
    }

    /// Registered ids in sorted order
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    pub fn profiles(&self) -> impl Iterator<Item = &ProfileRef> {
        self.profiles.values()
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_profiles() {
        let registry = ProfileRegistry::builtin().unwrap();
        assert_eq!(registry.ids().collect::<Vec<_>>(), vec!["3.1", "3.2"]);
    }

    #[test]
    fn test_builtin_gates_differ() {
        let registry = ProfileRegistry::builtin().unwrap();
        let v31 = registry.get("3.1").unwrap();
        let v32 = registry.get("3.2").unwrap();

        let tag31 = v31.allowed_keys_for("Tag");
        let tag32 = v32.allowed_keys_for("Tag");
        assert!(!tag31.iter().any(|k| k == "summary"));
        assert!(tag32.iter().any(|k| k == "summary"));
    }

    #[test]
    fn test_unknown_profile() {
        let registry = ProfileRegistry::builtin().unwrap();
        assert!(matches!(registry.get("9.9"), Err(BuildError::UnknownProfile(id)) if id == "9.9"));
    }

    #[test]
    fn test_register_replaces_same_id() {
        let mut registry = ProfileRegistry::new();
        registry
            .load_str("id = \"1.0\"\nversion = \"1.0.0\"\n")
            .unwrap();
        registry
            .load_str("id = \"1.0\"\nversion = \"1.0.1\"\n")
            .unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("1.0").unwrap().version().patch, 1);
    }

    #[test]
    fn test_load_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("widgets.toml"),
            "id = \"w1\"\nversion = \"1.0.0\"\n[nodes.Widget]\nkeys = [\"foo\"]\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let mut registry = ProfileRegistry::new().with_extension_prefix("ext-");
        let loaded = registry.load_dir(dir.path()).unwrap();

        assert_eq!(loaded, 1);
        let profile = registry.get("w1").unwrap();
        assert_eq!(profile.extension_prefix(), "ext-");
    }

    #[test]
    fn test_load_dir_missing() {
        let mut registry = ProfileRegistry::new();
        assert!(registry.load_dir(Path::new("/definitely/not/here")).is_err());
    }
}
