//! Feature guard
//!
//! The single legality check shared by every gated mutator. Lookup order:
//!
//! 1. fetch the allowed key set for the node type (unknown types: empty set)
//! 2. normalize the key through the profile's aliases
//! 3. direct membership
//! 4. extension wildcard: the node lists the profile's extension prefix as
//!    a key, and the normalized key starts with that prefix
//!
//! Nothing is allowed by default.

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

use super::{ProfileContext, ProfileRef};
use crate::error::{BuildError, Result};

/// Key legality gate bound to one profile
#[derive(Debug, Clone)]
pub struct FeatureGuard {
    profile: ProfileRef,
}

impl PartialEq for FeatureGuard {
    fn eq(&self, other: &Self) -> bool {
        self.profile.id() == other.profile.id()
            && self.profile.version() == other.profile.version()
    }
}

impl FeatureGuard {
    pub fn new(profile: ProfileRef) -> Self {
        Self { profile }
    }

    /// Guard for the ambient profile
    pub fn current() -> Result<Self> {
        ProfileContext::current().map(Self::new)
    }

    pub fn profile(&self) -> &ProfileRef {
        &self.profile
    }

    pub fn profile_id(&self) -> &str {
        self.profile.id()
    }

    pub fn is_allowed_key(&self, node_type: &str, key: &str) -> bool {
        let allowed = self.profile.allowed_keys_for(node_type);
        if allowed.is_empty() {
            return false;
        }

        let normalized = self.profile.normalize_key(node_type, key);
        if allowed.iter().any(|k| *k == normalized) {
            return true;
        }

        let prefix = self.profile.extension_prefix();
        !prefix.is_empty()
            && normalized.starts_with(prefix)
            && allowed.iter().any(|k| k == prefix)
    }

    /// Fails with `FeatureNotSupported` naming `node_type.key` and the profile id
    pub fn assert_allowed_key(&self, node_type: &str, key: &str) -> Result<()> {
        if self.is_allowed_key(node_type, key) {
            return Ok(());
        }
        tracing::debug!(
            node = node_type,
            key,
            profile = self.profile.id(),
            "key rejected by profile"
        );
        Err(BuildError::feature(node_type, key, self.profile.id()))
    }

    pub fn assert_allowed_keys(&self, node_type: &str, keys: &[&str]) -> Result<()> {
        keys.iter()
            .try_for_each(|key| self.assert_allowed_key(node_type, key))
    }

    /// Closest legal key for a rejected one, if anything is similar enough
    pub fn suggest(&self, node_type: &str, key: &str) -> Option<String> {
        let matcher = SkimMatcherV2::default().ignore_case();
        let prefix = self.profile.extension_prefix();

        self.profile
            .allowed_keys_for(node_type)
            .iter()
            .filter(|candidate| candidate.as_str() != prefix)
            .filter_map(|candidate| {
                // either direction: "sumary" vs "summary", "doc" vs "externalDocs"
                let forward = matcher.fuzzy_match(candidate, key);
                let backward = matcher.fuzzy_match(key, candidate);
                forward.max(backward).map(|score| (score, candidate))
            })
            .max_by_key(|(score, _)| *score)
            .map(|(_, candidate)| candidate.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::profile::TableProfile;

    fn guard(source: &str) -> FeatureGuard {
        FeatureGuard::new(Arc::new(TableProfile::from_toml_str(source).unwrap()))
    }

    const WIDGETS: &str = r#"
        id = "1.0"
        version = "1.0.0"

        [nodes.Widget]
        keys = ["name", "colour", "x-"]
        aliases = { color = "colour" }

        [nodes.Gizmo]
        keys = ["name"]
    "#;

    #[test]
    fn test_direct_and_alias_membership() {
        let g = guard(WIDGETS);
        assert!(g.is_allowed_key("Widget", "name"));
        assert!(g.is_allowed_key("Widget", "color"));
        assert!(!g.is_allowed_key("Widget", "foo"));
    }

    #[test]
    fn test_extension_wildcard_is_per_node() {
        let g = guard(WIDGETS);
        assert!(g.is_allowed_key("Widget", "x-internal"));
        assert!(!g.is_allowed_key("Gizmo", "x-internal"));
    }

    #[test]
    fn test_unknown_node_fails_closed() {
        let g = guard(WIDGETS);
        assert!(!g.is_allowed_key("Gadget", "name"));
        assert!(!g.is_allowed_key("Gadget", "x-anything"));
    }

    #[test]
    fn test_assert_reports_feature_and_profile() {
        let g = guard(WIDGETS);
        match g.assert_allowed_key("Widget", "foo") {
            Err(BuildError::FeatureNotSupported { feature, profile }) => {
                assert_eq!(feature, "Widget.foo");
                assert_eq!(profile, "1.0");
            }
            other => panic!("expected FeatureNotSupported, got {:?}", other),
        }
    }

    #[test]
    fn test_assert_many_stops_at_first_bad_key() {
        let g = guard(WIDGETS);
        assert!(g.assert_allowed_keys("Widget", &["name", "colour"]).is_ok());
        let err = g
            .assert_allowed_keys("Widget", &["name", "size", "weight"])
            .unwrap_err();
        assert!(err.to_string().contains("Widget.size"));
    }

    #[test]
    fn test_suggest_near_miss() {
        let g = guard(WIDGETS);
        assert_eq!(g.suggest("Widget", "colr").as_deref(), Some("colour"));
        assert_eq!(g.suggest("Gadget", "name"), None);
    }
}
