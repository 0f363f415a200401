//! Media type and encoding builders
//!
//! A media type is keyed by its MIME string wherever it is collected
//! (request bodies, responses, parameter and header content), so the
//! builder carries the MIME alongside its fields.

use std::sync::Arc;

use serde_json::Value;

use super::assembler::{assemble_keyed, assemble_list, assemble_opt};
use super::{check_key, keyed, ref_or, BuildsModel, Example, Extensible, Header, Persistent, RefOr, Schema};
use crate::error::{BuildError, Result};
use crate::model::{self, CollectionKind, Extensions, OrderedMap};
use crate::profile::{FeatureGuard, ProfileRef};

// =============================================================================
// MediaType
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct MediaType {
    guard: FeatureGuard,
    mime: String,
    schema: Option<RefOr<Schema>>,
    item_schema: Option<RefOr<Schema>>,
    example: Option<Value>,
    examples: OrderedMap<RefOr<Example>>,
    encoding: OrderedMap<Encoding>,
    prefix_encoding: Vec<Encoding>,
    item_encoding: Option<Encoding>,
    extensions: Extensions,
}

builder_node!(MediaType, "MediaType", guarded);

impl MediaType {
    pub fn new(profile: &ProfileRef, mime: impl Into<String>) -> Self {
        Self {
            guard: FeatureGuard::new(Arc::clone(profile)),
            mime: mime.into(),
            schema: None,
            item_schema: None,
            example: None,
            examples: OrderedMap::new(),
            encoding: OrderedMap::new(),
            prefix_encoding: Vec::new(),
            item_encoding: None,
            extensions: Extensions::new(),
        }
    }

    /// Media type under the ambient profile
    pub fn of(mime: impl Into<String>) -> Result<Self> {
        Ok(Self::new(FeatureGuard::current()?.profile(), mime))
    }

    pub fn json() -> Result<Self> {
        Self::of("application/json")
    }

    pub fn xml() -> Result<Self> {
        Self::of("application/xml")
    }

    pub fn form() -> Result<Self> {
        Self::of("application/x-www-form-urlencoded")
    }

    pub fn multipart() -> Result<Self> {
        Self::of("multipart/form-data")
    }

    pub fn text() -> Result<Self> {
        Self::of("text/plain")
    }

    pub fn mime(&self) -> &str {
        &self.mime
    }

    pub fn schema(&self, schema: impl Into<RefOr<Schema>>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "schema")?;
        let schema = ref_or(schema)?;
        Ok(self.update(|m| m.schema = Some(schema)))
    }

    /// Schema for each item of a sequential media type (3.2)
    pub fn item_schema(&self, schema: impl Into<RefOr<Schema>>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "itemSchema")?;
        let schema = ref_or(schema)?;
        Ok(self.update(|m| m.item_schema = Some(schema)))
    }

    pub fn example(&self, example: impl Into<Value>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "example")?;
        if !self.examples.is_empty() {
            return Err(BuildError::because("MediaType: example and examples are mutually exclusive"));
        }
        let example = example.into();
        Ok(self.update(|m| m.example = Some(example)))
    }

    pub fn examples<K, V>(&self, entries: impl IntoIterator<Item = (K, V)>) -> Result<Self>
    where
        K: Into<String>,
        V: Into<RefOr<Example>>,
    {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "examples")?;
        if self.example.is_some() {
            return Err(BuildError::because("MediaType: example and examples are mutually exclusive"));
        }
        let examples = keyed(Self::NODE_TYPE, "examples", entries)?;
        Ok(self.update(|m| m.examples = examples))
    }

    /// Add one named example
    pub fn named_example(&self, name: impl Into<String>, example: impl Into<RefOr<Example>>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "examples")?;
        if self.example.is_some() {
            return Err(BuildError::because("MediaType: example and examples are mutually exclusive"));
        }
        let name = name.into();
        check_key(Self::NODE_TYPE, "examples", &name)?;
        let example = ref_or(example)?;
        Ok(self.update(|m| {
            m.examples.insert(name, example);
        }))
    }

    /// Encoding for one property of a form or multipart body
    pub fn encoding(&self, property: impl Into<String>, encoding: Encoding) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "encoding")?;
        if !self.prefix_encoding.is_empty() || self.item_encoding.is_some() {
            return Err(BuildError::because(
                "MediaType: encoding cannot be combined with prefixEncoding or itemEncoding",
            ));
        }
        let property = property.into();
        check_key(Self::NODE_TYPE, "encoding", &property)?;
        Ok(self.update(|m| {
            m.encoding.insert(property, encoding);
        }))
    }

    /// Positional encodings for a multipart sequence (3.2)
    pub fn prefix_encoding(&self, encodings: impl IntoIterator<Item = Encoding>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "prefixEncoding")?;
        self.check_no_encoding_map("prefixEncoding")?;
        let encodings: Vec<Encoding> = encodings.into_iter().collect();
        Ok(self.update(|m| m.prefix_encoding = encodings))
    }

    /// Encoding applied to every item of a multipart sequence (3.2)
    pub fn item_encoding(&self, encoding: Encoding) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "itemEncoding")?;
        self.check_no_encoding_map("itemEncoding")?;
        Ok(self.update(|m| m.item_encoding = Some(encoding)))
    }

    fn check_no_encoding_map(&self, field: &str) -> Result<()> {
        if !self.encoding.is_empty() {
            return Err(BuildError::because(format!(
                "MediaType: {} cannot be combined with encoding",
                field
            )));
        }
        Ok(())
    }
}

impl BuildsModel for MediaType {
    type Model = model::MediaType;

    fn to_model(&self) -> Result<model::MediaType> {
        let media = model::MediaType {
            schema: assemble_opt(self.schema.as_ref())?,
            item_schema: assemble_opt(self.item_schema.as_ref())?,
            example: self.example.clone(),
            examples: assemble_keyed(CollectionKind::Examples, &self.examples)?,
            encoding: assemble_keyed(CollectionKind::Encodings, &self.encoding)?,
            prefix_encoding: assemble_list(CollectionKind::EncodingList, &self.prefix_encoding)?,
            item_encoding: assemble_opt(self.item_encoding.as_ref())?,
            extensions: self.extensions.clone(),
        };
        Ok(media.checked()?)
    }
}

/// Collect media types keyed by MIME, rejecting empty MIME strings
pub(crate) fn by_mime(
    node: &str,
    target: &mut OrderedMap<MediaType>,
    media: impl IntoIterator<Item = MediaType>,
) -> Result<()> {
    for m in media {
        check_key(node, "content", m.mime())?;
        target.insert(m.mime().to_string(), m);
    }
    Ok(())
}

// =============================================================================
// Encoding
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Encoding {
    guard: FeatureGuard,
    content_type: Option<String>,
    headers: OrderedMap<RefOr<Header>>,
    style: Option<String>,
    explode: bool,
    allow_reserved: bool,
    extensions: Extensions,
}

builder_node!(Encoding, "Encoding", guarded);

impl Encoding {
    pub fn with_profile(profile: &ProfileRef) -> Self {
        Self {
            guard: FeatureGuard::new(Arc::clone(profile)),
            content_type: None,
            headers: OrderedMap::new(),
            style: None,
            explode: false,
            allow_reserved: false,
            extensions: Extensions::new(),
        }
    }

    pub fn create() -> Result<Self> {
        Ok(Self::with_profile(FeatureGuard::current()?.profile()))
    }

    pub fn content_type(&self, content_type: impl Into<String>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "contentType")?;
        let content_type = content_type.into();
        Ok(self.update(|e| e.content_type = Some(content_type)))
    }

    pub fn header(&self, name: impl Into<String>, header: impl Into<RefOr<Header>>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "headers")?;
        let name = name.into();
        check_key(Self::NODE_TYPE, "headers", &name)?;
        let header = ref_or(header)?;
        Ok(self.update(|e| {
            e.headers.insert(name, header);
        }))
    }

    pub fn style(&self, style: impl Into<String>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "style")?;
        let style = style.into();
        Ok(self.update(|e| e.style = Some(style)))
    }

    pub fn explode(&self, explode: bool) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "explode")?;
        Ok(self.update(|e| e.explode = explode))
    }

    pub fn allow_reserved(&self, allow_reserved: bool) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "allowReserved")?;
        Ok(self.update(|e| e.allow_reserved = allow_reserved))
    }
}

impl BuildsModel for Encoding {
    type Model = model::Encoding;

    fn to_model(&self) -> Result<model::Encoding> {
        let encoding = model::Encoding {
            content_type: self.content_type.clone(),
            headers: assemble_keyed(CollectionKind::Headers, &self.headers)?,
            style: self.style.clone(),
            explode: self.explode,
            allow_reserved: self.allow_reserved,
            extensions: self.extensions.clone(),
        };
        Ok(encoding.checked()?)
    }
}
