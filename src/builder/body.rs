//! Request body builder

use std::sync::Arc;

use super::assembler::assemble_keyed;
use super::media::by_mime;
use super::{BuildsModel, Extensible, MediaType, Persistent};
use crate::error::{BuildError, Result};
use crate::model::{self, CollectionKind, Extensions, OrderedMap};
use crate::profile::{FeatureGuard, ProfileRef};

#[derive(Debug, Clone, PartialEq)]
pub struct RequestBody {
    guard: FeatureGuard,
    description: Option<String>,
    content: OrderedMap<MediaType>,
    required: bool,
    extensions: Extensions,
}

builder_node!(RequestBody, "RequestBody", guarded);

impl RequestBody {
    pub fn with_profile(profile: &ProfileRef) -> Self {
        Self {
            guard: FeatureGuard::new(Arc::clone(profile)),
            description: None,
            content: OrderedMap::new(),
            required: false,
            extensions: Extensions::new(),
        }
    }

    pub fn create() -> Result<Self> {
        Ok(Self::with_profile(FeatureGuard::current()?.profile()))
    }

    pub fn description(&self, description: impl Into<String>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "description")?;
        let description = description.into();
        Ok(self.update(|b| b.description = Some(description)))
    }

    pub fn required(&self, required: bool) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "required")?;
        Ok(self.update(|b| b.required = required))
    }

    /// Add media types keyed by their MIME; a repeated MIME replaces the entry
    pub fn content(&self, media: impl IntoIterator<Item = MediaType>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "content")?;
        self.try_update(|b| by_mime(Self::NODE_TYPE, &mut b.content, media))
    }
}

impl BuildsModel for RequestBody {
    type Model = model::RequestBody;

    fn to_model(&self) -> Result<model::RequestBody> {
        let content = assemble_keyed(CollectionKind::MediaTypes, &self.content)?
            .ok_or_else(|| BuildError::required(Self::NODE_TYPE, "content"))?;
        let body = model::RequestBody {
            description: self.description.clone(),
            content,
            required: self.required,
            extensions: self.extensions.clone(),
        };
        Ok(body.checked()?)
    }
}
