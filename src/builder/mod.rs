//! Fluent Builders
//!
//! Every node follows one pattern:
//!
//! - fields are private and start unset
//! - mutators take `&self` and return a new value; the receiver is never
//!   touched ([`Persistent`])
//! - guarded nodes consult their [`FeatureGuard`] in every mutator, before
//!   anything else
//! - mutually exclusive fields are checked at the moment the second one is set
//! - `to_model()` ([`BuildsModel`]) checks required fields, assembles nested
//!   builders and reference placeholders, then hands everything to the
//!   canonical constructor
//!
//! Profile-aware nodes take their profile from [`ProfileContext`] in the
//! short factories, or explicitly through `with_profile` / `new(profile, ..)`.
//!
//! [`FeatureGuard`]: crate::profile::FeatureGuard
//! [`ProfileContext`]: crate::profile::ProfileContext

use serde_json::Value;

use crate::error::{BuildError, Result};
use crate::model::{Extensions, OrderedMap};
use crate::profile::{FeatureGuard, ProfileRef, DEFAULT_EXTENSION_PREFIX};

/// Implements the shared node traits for a builder struct with an
/// `extensions` field (and a `guard` field for profile-aware nodes)
macro_rules! builder_node {
    ($ty:ident, $node:literal) => {
        impl $crate::builder::Persistent for $ty {}

        impl $crate::builder::Extensible for $ty {
            const NODE_TYPE: &'static str = $node;

            fn extensions(&self) -> &$crate::model::Extensions {
                &self.extensions
            }

            fn extensions_mut(&mut self) -> &mut $crate::model::Extensions {
                &mut self.extensions
            }
        }
    };
    ($ty:ident, $node:literal, guarded) => {
        impl $crate::builder::Persistent for $ty {}

        impl $crate::builder::Extensible for $ty {
            const NODE_TYPE: &'static str = $node;

            fn extensions(&self) -> &$crate::model::Extensions {
                &self.extensions
            }

            fn extensions_mut(&mut self) -> &mut $crate::model::Extensions {
                &mut self.extensions
            }

            fn extension_guard(&self) -> Option<&$crate::profile::FeatureGuard> {
                Some(&self.guard)
            }
        }

        impl $crate::builder::ProfileAware for $ty {
            fn guard(&self) -> &$crate::profile::FeatureGuard {
                &self.guard
            }
        }
    };
}

pub mod assembler;
pub mod body;
pub mod common;
pub mod components;
pub mod document;
pub mod example;
pub mod header;
pub mod info;
pub mod link;
pub mod media;
pub mod parameter;
pub mod paths;
pub mod reference;
pub mod response;
pub mod schema;
pub mod security;
pub mod server;
pub mod tag;

pub use body::RequestBody;
pub use common::{Discriminator, ExternalDocs, Xml};
pub use components::{ComponentEntry, Components, Section};
pub use document::OpenApi;
pub use example::Example;
pub use header::Header;
pub use info::{Contact, Info, License};
pub use link::Link;
pub use media::{Encoding, MediaType};
pub use parameter::Parameter;
pub use paths::{Operation, PathItem, Paths};
pub use reference::{RefOr, Reference};
pub use response::{Response, Responses};
pub use schema::Schema;
pub use security::{OAuthFlow, OAuthFlows, SecurityRequirement, SecurityScheme};
pub use server::{Server, ServerVariable};
pub use tag::Tag;

// =============================================================================
// Traits
// =============================================================================

/// A builder that can produce its canonical node
pub trait BuildsModel {
    type Model;

    /// Assemble the canonical node. Calling this twice on the same value
    /// yields structurally equal results.
    fn to_model(&self) -> Result<Self::Model>;
}

/// Copy-on-write updates: derive a new value from the old one plus a patch
pub trait Persistent: Clone {
    fn update(&self, patch: impl FnOnce(&mut Self)) -> Self {
        let mut next = self.clone();
        patch(&mut next);
        next
    }

    fn try_update(&self, patch: impl FnOnce(&mut Self) -> Result<()>) -> Result<Self> {
        let mut next = self.clone();
        patch(&mut next)?;
        Ok(next)
    }
}

/// Builders bound to a dialect profile
pub trait ProfileAware {
    fn guard(&self) -> &FeatureGuard;

    fn profile(&self) -> &ProfileRef {
        self.guard().profile()
    }
}

/// Builders carrying an `x-*` extension bag
pub trait Extensible: Persistent {
    /// Node type name used for profile lookups and diagnostics
    const NODE_TYPE: &'static str;

    fn extensions(&self) -> &Extensions;

    fn extensions_mut(&mut self) -> &mut Extensions;

    /// Profile-aware nodes check extension keys against their profile
    fn extension_guard(&self) -> Option<&FeatureGuard> {
        None
    }

    /// Add or replace one extension
    fn extension(&self, key: impl Into<String>, value: impl Into<Value>) -> Result<Self> {
        let key = key.into();
        check_extension_key(Self::NODE_TYPE, self.extension_guard(), &key)?;
        let value = value.into();
        Ok(self.update(|node| {
            node.extensions_mut().insert(key, value);
        }))
    }

    /// Replace the whole extension bag
    fn with_extensions(&self, extensions: Extensions) -> Result<Self> {
        for key in extensions.keys() {
            check_extension_key(Self::NODE_TYPE, self.extension_guard(), key)?;
        }
        Ok(self.update(|node| *node.extensions_mut() = extensions))
    }
}

fn check_extension_key(node: &str, guard: Option<&FeatureGuard>, key: &str) -> Result<()> {
    match guard {
        Some(guard) => {
            let prefix = guard.profile().extension_prefix();
            if !key.starts_with(prefix) {
                return Err(BuildError::invalid(format!(
                    "{}: extension key '{}' must start with '{}'",
                    node, key, prefix
                )));
            }
            guard.assert_allowed_key(node, key)
        }
        None if key.starts_with(DEFAULT_EXTENSION_PREFIX) => Ok(()),
        None => Err(BuildError::invalid(format!(
            "{}: extension key '{}' must start with '{}'",
            node, key, DEFAULT_EXTENSION_PREFIX
        ))),
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Reject empty map keys
pub(crate) fn check_key(node: &str, field: &str, key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(BuildError::invalid(format!(
            "{}: {} keys must be non-empty strings",
            node, field
        )));
    }
    Ok(())
}

/// Reject empty strings for fields that must carry text
pub(crate) fn check_text(node: &str, field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(BuildError::because(format!("{}: {} cannot be empty", node, field)));
    }
    Ok(())
}

/// Validate a builder-or-reference argument
pub(crate) fn ref_or<B>(value: impl Into<RefOr<B>>) -> Result<RefOr<B>> {
    let value = value.into();
    value.check()?;
    Ok(value)
}

/// Collect `(name, builder-or-reference)` pairs, validating names and tokens
pub(crate) fn keyed<B, K, V>(
    node: &str,
    field: &str,
    entries: impl IntoIterator<Item = (K, V)>,
) -> Result<OrderedMap<RefOr<B>>>
where
    K: Into<String>,
    V: Into<RefOr<B>>,
{
    let mut map = OrderedMap::new();
    for (name, value) in entries {
        let name = name.into();
        check_key(node, field, &name)?;
        map.insert(name, ref_or(value)?);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyed_rejects_empty_name() {
        let err = keyed::<Schema, _, _>("Schema", "properties", [("", Schema::string())])
            .unwrap_err();
        assert!(matches!(err, BuildError::InvalidArgument(_)));
    }

    #[test]
    fn test_keyed_rejects_empty_reference() {
        let err = keyed::<Schema, _, _>("Schema", "properties", [("id", "")]).unwrap_err();
        assert!(matches!(err, BuildError::InvalidCombination(_)));
    }

    #[test]
    fn test_plain_node_extension_prefix() {
        let contact = Contact::create();
        assert!(contact.extension("x-team", "core").is_ok());
        assert!(contact.extension("team", "core").is_err());
    }
}
