//! Tag builder

use std::sync::Arc;

use super::assembler::assemble_opt;
use super::{check_text, BuildsModel, Extensible, ExternalDocs, Persistent};
use crate::error::{BuildError, Result};
use crate::model::{self, Extensions};
use crate::profile::{FeatureGuard, ProfileRef};

#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    guard: FeatureGuard,
    name: String,
    summary: Option<String>,
    description: Option<String>,
    external_docs: Option<ExternalDocs>,
    parent: Option<String>,
    kind: Option<String>,
    extensions: Extensions,
}

builder_node!(Tag, "Tag", guarded);

impl Tag {
    pub fn new(profile: &ProfileRef, name: impl Into<String>) -> Self {
        Self {
            guard: FeatureGuard::new(Arc::clone(profile)),
            name: name.into(),
            summary: None,
            description: None,
            external_docs: None,
            parent: None,
            kind: None,
            extensions: Extensions::new(),
        }
    }

    /// Tag under the ambient profile
    pub fn of(name: impl Into<String>) -> Result<Self> {
        Ok(Self::new(FeatureGuard::current()?.profile(), name))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self, description: impl Into<String>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "description")?;
        let description = description.into();
        Ok(self.update(|t| t.description = Some(description)))
    }

    pub fn external_docs(&self, docs: ExternalDocs) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "externalDocs")?;
        Ok(self.update(|t| t.external_docs = Some(docs)))
    }

    /// Short display name (3.2)
    pub fn summary(&self, summary: impl Into<String>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "summary")?;
        let summary = summary.into();
        Ok(self.update(|t| t.summary = Some(summary)))
    }

    /// Name of the enclosing tag (3.2)
    pub fn parent(&self, parent: impl Into<String>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "parent")?;
        let parent = parent.into();
        check_text(Self::NODE_TYPE, "parent", &parent)?;
        if parent == self.name {
            return Err(BuildError::because(format!(
                "Tag: '{}' cannot be its own parent",
                self.name
            )));
        }
        Ok(self.update(|t| t.parent = Some(parent)))
    }

    /// Tag category such as `nav` or `audience` (3.2)
    pub fn kind(&self, kind: impl Into<String>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "kind")?;
        let kind = kind.into();
        Ok(self.update(|t| t.kind = Some(kind)))
    }
}

impl BuildsModel for Tag {
    type Model = model::Tag;

    fn to_model(&self) -> Result<model::Tag> {
        if self.name.is_empty() {
            return Err(BuildError::required(Self::NODE_TYPE, "name"));
        }
        let tag = model::Tag {
            name: self.name.clone(),
            summary: self.summary.clone(),
            description: self.description.clone(),
            external_docs: assemble_opt(self.external_docs.as_ref())?,
            parent: self.parent.clone(),
            kind: self.kind.clone(),
            extensions: self.extensions.clone(),
        };
        Ok(tag.checked()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile;

    #[test]
    fn test_summary_rejected_under_31() {
        let v31 = profile::builtin("3.1").unwrap();
        match Tag::new(&v31, "pets").summary("Pets") {
            Err(BuildError::FeatureNotSupported { feature, profile }) => {
                assert_eq!(feature, "Tag.summary");
                assert_eq!(profile, "3.1");
            }
            other => panic!("expected FeatureNotSupported, got {:?}", other),
        }
    }

    #[test]
    fn test_hierarchy_under_32() {
        let v32 = profile::builtin("3.2").unwrap();
        let model = Tag::new(&v32, "cats")
            .summary("Cats")
            .unwrap()
            .parent("pets")
            .unwrap()
            .kind("nav")
            .unwrap()
            .to_model()
            .unwrap();
        assert_eq!(model.parent.as_deref(), Some("pets"));
        assert_eq!(model.kind.as_deref(), Some("nav"));
    }

    #[test]
    fn test_own_parent_rejected() {
        let v32 = profile::builtin("3.2").unwrap();
        assert!(matches!(
            Tag::new(&v32, "pets").parent("pets"),
            Err(BuildError::InvalidCombination(_))
        ));
    }

    #[test]
    fn test_extension_must_use_prefix() {
        let v31 = profile::builtin("3.1").unwrap();
        let tag = Tag::new(&v31, "pets");
        assert!(tag.extension("x-display", true).is_ok());
        assert!(matches!(
            tag.extension("display", true),
            Err(BuildError::InvalidArgument(_))
        ));
    }
}
