//! Header builder

use serde_json::Value;

use super::assembler::{assemble_keyed, assemble_opt};
use super::{check_key, keyed, ref_or, BuildsModel, Example, MediaType, Persistent, RefOr, Schema};
use crate::error::{BuildError, Result};
use crate::model::{self, CollectionKind, Extensions, KeyedCollection, OrderedMap};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Header {
    description: Option<String>,
    required: bool,
    deprecated: bool,
    style: Option<String>,
    explode: Option<bool>,
    schema: Option<RefOr<Schema>>,
    example: Option<Value>,
    examples: OrderedMap<RefOr<Example>>,
    content: Option<MediaType>,
    extensions: Extensions,
}

builder_node!(Header, "Header");

impl Header {
    pub fn create() -> Self {
        Self::default()
    }

    /// Header described by a schema
    pub fn of(schema: impl Into<RefOr<Schema>>) -> Result<Self> {
        Self::create().schema(schema)
    }

    pub fn description(&self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.update(|h| h.description = Some(description))
    }

    pub fn required(&self, required: bool) -> Self {
        self.update(|h| h.required = required)
    }

    pub fn deprecated(&self, deprecated: bool) -> Self {
        self.update(|h| h.deprecated = deprecated)
    }

    /// Headers only serialize as `simple`
    pub fn style(&self, style: impl Into<String>) -> Result<Self> {
        let style = style.into();
        if style != "simple" {
            return Err(BuildError::because(format!(
                "Header: style must be 'simple', got '{}'",
                style
            )));
        }
        Ok(self.update(|h| h.style = Some(style)))
    }

    pub fn explode(&self, explode: bool) -> Self {
        self.update(|h| h.explode = Some(explode))
    }

    pub fn schema(&self, schema: impl Into<RefOr<Schema>>) -> Result<Self> {
        self.check_no_content("schema")?;
        let schema = ref_or(schema)?;
        Ok(self.update(|h| h.schema = Some(schema)))
    }

    pub fn example(&self, example: impl Into<Value>) -> Result<Self> {
        self.check_no_content("example")?;
        if !self.examples.is_empty() {
            return Err(BuildError::because("Header: example and examples are mutually exclusive"));
        }
        let example = example.into();
        Ok(self.update(|h| h.example = Some(example)))
    }

    pub fn examples<K, V>(&self, entries: impl IntoIterator<Item = (K, V)>) -> Result<Self>
    where
        K: Into<String>,
        V: Into<RefOr<Example>>,
    {
        self.check_no_content("examples")?;
        if self.example.is_some() {
            return Err(BuildError::because("Header: example and examples are mutually exclusive"));
        }
        let examples = keyed("Header", "examples", entries)?;
        Ok(self.update(|h| h.examples = examples))
    }

    /// Content-style header: exactly one media type
    pub fn content(&self, media: MediaType) -> Result<Self> {
        if self.schema.is_some() || self.example.is_some() || !self.examples.is_empty() {
            return Err(BuildError::because(
                "Header: content cannot be combined with schema or example(s)",
            ));
        }
        check_key("Header", "content", media.mime())?;
        Ok(self.update(|h| h.content = Some(media)))
    }

    fn check_no_content(&self, field: &str) -> Result<()> {
        if self.content.is_some() {
            return Err(BuildError::because(format!(
                "Header: {} cannot be combined with content",
                field
            )));
        }
        Ok(())
    }
}

impl BuildsModel for Header {
    type Model = model::Header;

    fn to_model(&self) -> Result<model::Header> {
        let content = match &self.content {
            Some(media) => {
                let mut map = OrderedMap::new();
                map.insert(media.mime(), media.to_model()?);
                Some(KeyedCollection::try_new(CollectionKind::MediaTypes, map)?)
            }
            None => None,
        };

        let header = model::Header {
            description: self.description.clone(),
            required: self.required,
            deprecated: self.deprecated,
            style: self.style.clone(),
            explode: self.explode,
            schema: assemble_opt(self.schema.as_ref())?,
            example: self.example.clone(),
            examples: assemble_keyed(CollectionKind::Examples, &self.examples)?,
            content,
            extensions: self.extensions.clone(),
        };
        Ok(header.checked()?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::profile;

    #[test]
    fn test_schema_header() {
        let model = Header::of(Schema::integer())
            .unwrap()
            .description("Requests left in the window")
            .required(true)
            .to_model()
            .unwrap();
        assert!(model.required);
        assert!(model.schema.is_some());
        assert!(model.content.is_none());
    }

    #[test]
    fn test_schema_excludes_content() {
        let v31 = profile::builtin("3.1").unwrap();
        let h = Header::of(Schema::string()).unwrap();
        assert!(matches!(
            h.content(MediaType::new(&v31, "text/plain")),
            Err(BuildError::InvalidCombination(_))
        ));

        let h = Header::create().content(MediaType::new(&v31, "text/plain")).unwrap();
        assert!(h.schema(Schema::string()).is_err());
        assert_eq!(h.to_model().unwrap().content.unwrap().len(), 1);
    }

    #[test]
    fn test_style_must_be_simple() {
        assert!(Header::create().style("simple").is_ok());
        assert!(Header::create().style("form").is_err());
    }

    #[test]
    fn test_example_excludes_examples() {
        let h = Header::create().example(json!("42")).unwrap();
        assert!(h.examples([("a", Example::create())]).is_err());
    }
}
