//! Dialect Profiles
//!
//! A profile declares, per node type, which keys a builder may set. Every
//! mutator of a guarded builder asks the profile (through a [`FeatureGuard`])
//! before accepting a value, so supporting a new dialect means shipping a
//! new profile table rather than touching any builder.
//!
//! ## Structure
//!
//! - [`definition`] - TOML profile definitions and the table-backed profile
//! - [`registry`] - built-in and on-disk profiles indexed by id
//! - [`guard`] - key legality checks with extension wildcards
//! - [`context`] - ambient default profile and override stack

pub mod context;
pub mod definition;
pub mod guard;
pub mod registry;

pub use context::ProfileContext;
pub use definition::{NodeRules, ProfileDefinition, TableProfile};
pub use guard::FeatureGuard;
pub use registry::ProfileRegistry;

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use semver::Version;

/// Extension prefix used when a profile does not declare one
pub const DEFAULT_EXTENSION_PREFIX: &str = "x-";

/// Shared handle to an immutable profile
pub type ProfileRef = Arc<dyn Profile>;

/// A dialect version's key policy
pub trait Profile: fmt::Debug + Send + Sync {
    /// Short identifier, conventionally "MAJOR.MINOR" (e.g. "3.1")
    fn id(&self) -> &str;

    /// Full dialect version
    fn version(&self) -> &Version;

    /// Keys legal on `node_type`. Unknown node types yield an empty slice.
    fn allowed_keys_for(&self, node_type: &str) -> &[String];

    /// Map a key spelled under another dialect version onto this profile's spelling
    fn normalize_key<'a>(&self, node_type: &str, key: &'a str) -> Cow<'a, str>;

    /// Prefix marking vendor-extension keys
    fn extension_prefix(&self) -> &str {
        DEFAULT_EXTENSION_PREFIX
    }

    /// Node types this profile has rules for
    fn node_types(&self) -> Vec<&str>;
}

/// Look up a built-in profile ("3.1" or "3.2")
pub fn builtin(id: &str) -> crate::Result<ProfileRef> {
    ProfileRegistry::builtin()?.get(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        let profile = builtin("3.2").unwrap();
        assert_eq!(profile.id(), "3.2");
        assert_eq!(profile.version(), &Version::new(3, 2, 0));
        assert!(builtin("2.0").is_err());
    }
}
