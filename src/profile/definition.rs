//! Profile definitions
//!
//! Profiles are data. A definition file looks like:
//!
//! ```toml
//! id = "3.2"
//! version = "3.2.0"
//! extension_prefix = "x-"
//!
//! [nodes.Tag]
//! keys = ["name", "summary", "description", "externalDocs", "parent", "kind", "x-"]
//!
//! [nodes.OpenApiDocument]
//! keys = ["openapi", "$self", "info", "x-"]
//! aliases = { self = "$self" }
//! ```

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use semver::Version;
use serde::{Deserialize, Serialize};

use super::{Profile, DEFAULT_EXTENSION_PREFIX};
use crate::error::{BuildError, Result};

/// Parsed profile definition file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileDefinition {
    /// Profile identifier ("3.1")
    pub id: String,

    /// Dialect version ("3.1.0")
    pub version: Version,

    #[serde(default)]
    pub description: Option<String>,

    /// Overrides the configured extension prefix
    #[serde(default)]
    pub extension_prefix: Option<String>,

    /// Per node type rules
    #[serde(default)]
    pub nodes: BTreeMap<String, NodeRules>,
}

/// Key rules for one node type
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeRules {
    #[serde(default)]
    pub keys: Vec<String>,

    /// Alternate spelling -> canonical key
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

impl ProfileDefinition {
    /// Parse a definition from TOML text
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let definition: ProfileDefinition = toml::from_str(source)?;
        definition.validate()?;
        Ok(definition)
    }

    fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(BuildError::InvalidProfile("profile id must not be empty".to_string()));
        }
        for (node, rules) in &self.nodes {
            if node.is_empty() {
                return Err(BuildError::InvalidProfile(format!(
                    "profile {}: empty node type name",
                    self.id
                )));
            }
            if rules.keys.iter().any(String::is_empty) {
                return Err(BuildError::InvalidProfile(format!(
                    "profile {}: node {} lists an empty key",
                    self.id, node
                )));
            }
            for (alias, target) in &rules.aliases {
                if !rules.keys.contains(target) {
                    return Err(BuildError::InvalidProfile(format!(
                        "profile {}: alias {}.{} points at undeclared key '{}'",
                        self.id, node, alias, target
                    )));
                }
            }
        }
        Ok(())
    }
}

// =============================================================================
// TableProfile
// =============================================================================

/// Profile backed by a key table
#[derive(Debug, Clone)]
pub struct TableProfile {
    id: String,
    version: Version,
    description: Option<String>,
    extension_prefix: String,
    keys: HashMap<String, Vec<String>>,
    aliases: HashMap<String, HashMap<String, String>>,
}

impl TableProfile {
    /// Build from a definition, using `fallback_prefix` when the definition omits one
    pub fn new(definition: ProfileDefinition, fallback_prefix: &str) -> Self {
        let extension_prefix = definition
            .extension_prefix
            .unwrap_or_else(|| fallback_prefix.to_string());

        let mut keys = HashMap::with_capacity(definition.nodes.len());
        let mut aliases = HashMap::new();
        for (node, rules) in definition.nodes {
            if !rules.aliases.is_empty() {
                aliases.insert(node.clone(), rules.aliases.into_iter().collect());
            }
            keys.insert(node, rules.keys);
        }

        Self {
            id: definition.id,
            version: definition.version,
            description: definition.description,
            extension_prefix,
            keys,
            aliases,
        }
    }

    /// Parse and build in one step
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let definition = ProfileDefinition::from_toml_str(source)?;
        Ok(Self::new(definition, DEFAULT_EXTENSION_PREFIX))
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

impl TryFrom<ProfileDefinition> for TableProfile {
    type Error = BuildError;

    fn try_from(definition: ProfileDefinition) -> Result<Self> {
        definition.validate()?;
        Ok(Self::new(definition, DEFAULT_EXTENSION_PREFIX))
    }
}

impl Profile for TableProfile {
    fn id(&self) -> &str {
        &self.id
    }

    fn version(&self) -> &Version {
        &self.version
    }

    fn allowed_keys_for(&self, node_type: &str) -> &[String] {
        self.keys.get(node_type).map(Vec::as_slice).unwrap_or(&[])
    }

    fn normalize_key<'a>(&self, node_type: &str, key: &'a str) -> Cow<'a, str> {
        match self.aliases.get(node_type).and_then(|a| a.get(key)) {
            Some(canonical) => Cow::Owned(canonical.clone()),
            None => Cow::Borrowed(key),
        }
    }

    fn extension_prefix(&self) -> &str {
        &self.extension_prefix
    }

    fn node_types(&self) -> Vec<&str> {
        let mut nodes: Vec<&str> = self.keys.keys().map(String::as_str).collect();
        nodes.sort_unstable();
        nodes
    }
}
