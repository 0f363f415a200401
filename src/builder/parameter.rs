//! Parameter builder

use std::sync::Arc;

use serde_json::Value;

use super::assembler::{assemble_keyed, assemble_opt};
use super::{check_key, keyed, ref_or, BuildsModel, Example, Extensible, MediaType, Persistent, RefOr, Schema};
use crate::error::{BuildError, Result};
use crate::model::{self, CollectionKind, Extensions, KeyedCollection, OrderedMap, ParameterLocation};
use crate::profile::{FeatureGuard, ProfileRef};

#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    guard: FeatureGuard,
    name: String,
    location: ParameterLocation,
    description: Option<String>,
    required: Option<bool>,
    deprecated: bool,
    allow_empty_value: Option<bool>,
    style: Option<String>,
    explode: Option<bool>,
    allow_reserved: Option<bool>,
    schema: Option<RefOr<Schema>>,
    example: Option<Value>,
    examples: OrderedMap<RefOr<Example>>,
    content: Option<MediaType>,
    extensions: Extensions,
}

builder_node!(Parameter, "Parameter", guarded);

impl Parameter {
    /// Path parameters start out required
    pub fn new(profile: &ProfileRef, name: impl Into<String>, location: ParameterLocation) -> Self {
        Self {
            guard: FeatureGuard::new(Arc::clone(profile)),
            name: name.into(),
            location,
            description: None,
            required: (location == ParameterLocation::Path).then_some(true),
            deprecated: false,
            allow_empty_value: None,
            style: None,
            explode: None,
            allow_reserved: None,
            schema: None,
            example: None,
            examples: OrderedMap::new(),
            content: None,
            extensions: Extensions::new(),
        }
    }

    fn ambient(name: impl Into<String>, location: ParameterLocation) -> Result<Self> {
        Ok(Self::new(FeatureGuard::current()?.profile(), name, location))
    }

    pub fn query(name: impl Into<String>) -> Result<Self> {
        Self::ambient(name, ParameterLocation::Query)
    }

    pub fn path(name: impl Into<String>) -> Result<Self> {
        Self::ambient(name, ParameterLocation::Path)
    }

    pub fn header(name: impl Into<String>) -> Result<Self> {
        Self::ambient(name, ParameterLocation::Header)
    }

    pub fn cookie(name: impl Into<String>) -> Result<Self> {
        Self::ambient(name, ParameterLocation::Cookie)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> ParameterLocation {
        self.location
    }

    pub fn description(&self, description: impl Into<String>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "description")?;
        let description = description.into();
        Ok(self.update(|p| p.description = Some(description)))
    }

    pub fn required(&self, required: bool) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "required")?;
        if !required && self.location == ParameterLocation::Path {
            return Err(BuildError::because(format!(
                "Parameter: path parameter '{}' must stay required",
                self.name
            )));
        }
        Ok(self.update(|p| p.required = Some(required)))
    }

    pub fn deprecated(&self, deprecated: bool) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "deprecated")?;
        Ok(self.update(|p| p.deprecated = deprecated))
    }

    pub fn allow_empty_value(&self, allow: bool) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "allowEmptyValue")?;
        if self.location != ParameterLocation::Query {
            return Err(BuildError::because(format!(
                "Parameter: allowEmptyValue only applies to query parameters, not {}",
                self.location
            )));
        }
        Ok(self.update(|p| p.allow_empty_value = Some(allow)))
    }

    pub fn style(&self, style: impl Into<String>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "style")?;
        let style = style.into();
        Ok(self.update(|p| p.style = Some(style)))
    }

    pub fn explode(&self, explode: bool) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "explode")?;
        Ok(self.update(|p| p.explode = Some(explode)))
    }

    pub fn allow_reserved(&self, allow: bool) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "allowReserved")?;
        Ok(self.update(|p| p.allow_reserved = Some(allow)))
    }

    pub fn schema(&self, schema: impl Into<RefOr<Schema>>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "schema")?;
        self.check_no_content("schema")?;
        let schema = ref_or(schema)?;
        Ok(self.update(|p| p.schema = Some(schema)))
    }

    pub fn example(&self, example: impl Into<Value>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "example")?;
        self.check_no_content("example")?;
        if !self.examples.is_empty() {
            return Err(BuildError::because("Parameter: example and examples are mutually exclusive"));
        }
        let example = example.into();
        Ok(self.update(|p| p.example = Some(example)))
    }

    pub fn examples<K, V>(&self, entries: impl IntoIterator<Item = (K, V)>) -> Result<Self>
    where
        K: Into<String>,
        V: Into<RefOr<Example>>,
    {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "examples")?;
        self.check_no_content("examples")?;
        if self.example.is_some() {
            return Err(BuildError::because("Parameter: example and examples are mutually exclusive"));
        }
        let examples = keyed(Self::NODE_TYPE, "examples", entries)?;
        Ok(self.update(|p| p.examples = examples))
    }

    /// Content-style parameter: exactly one media type, no schema or examples
    pub fn content(&self, media: MediaType) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "content")?;
        if self.schema.is_some() || self.example.is_some() || !self.examples.is_empty() {
            return Err(BuildError::because(
                "Parameter: content cannot be combined with schema, example or examples",
            ));
        }
        check_key(Self::NODE_TYPE, "content", media.mime())?;
        Ok(self.update(|p| p.content = Some(media)))
    }

    fn check_no_content(&self, field: &str) -> Result<()> {
        if self.content.is_some() {
            return Err(BuildError::because(format!(
                "Parameter: {} cannot be combined with content",
                field
            )));
        }
        Ok(())
    }
}

impl BuildsModel for Parameter {
    type Model = model::Parameter;

    fn to_model(&self) -> Result<model::Parameter> {
        if self.name.is_empty() {
            return Err(BuildError::required(Self::NODE_TYPE, "name"));
        }
        let content = match &self.content {
            Some(media) => {
                let mut map = OrderedMap::new();
                map.insert(media.mime(), media.to_model()?);
                Some(KeyedCollection::try_new(CollectionKind::MediaTypes, map)?)
            }
            None => None,
        };

        let parameter = model::Parameter {
            name: self.name.clone(),
            location: self.location,
            description: self.description.clone(),
            required: self.required,
            deprecated: self.deprecated,
            allow_empty_value: self.allow_empty_value,
            style: self.style.clone(),
            explode: self.explode,
            allow_reserved: self.allow_reserved,
            schema: assemble_opt(self.schema.as_ref())?,
            example: self.example.clone(),
            examples: assemble_keyed(CollectionKind::Examples, &self.examples)?,
            content,
            extensions: self.extensions.clone(),
        };
        Ok(parameter.checked()?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::profile::{self, ProfileContext};

    #[test]
    fn test_path_parameter_starts_required() {
        let v31 = profile::builtin("3.1").unwrap();
        let p = Parameter::new(&v31, "petId", ParameterLocation::Path);
        assert!(p.required(false).is_err());
        assert_eq!(p.to_model().unwrap().required, Some(true));
    }

    #[test]
    fn test_ambient_factory() {
        let v31 = profile::builtin("3.1").unwrap();
        let model = ProfileContext::scoped(v31, || {
            Parameter::query("limit")
                .and_then(|p| p.schema(Schema::integer().minimum(1)))
                .and_then(|p| p.to_model())
        })
        .unwrap();
        assert_eq!(model.location, ParameterLocation::Query);
        assert_eq!(model.name, "limit");
    }

    #[test]
    fn test_allow_empty_value_query_only() {
        let v31 = profile::builtin("3.1").unwrap();
        let header = Parameter::new(&v31, "X-Id", ParameterLocation::Header);
        assert!(header.allow_empty_value(true).is_err());
        let query = Parameter::new(&v31, "q", ParameterLocation::Query);
        assert!(query.allow_empty_value(true).is_ok());
    }

    #[test]
    fn test_content_excludes_schema() {
        let v31 = profile::builtin("3.1").unwrap();
        let p = Parameter::new(&v31, "filter", ParameterLocation::Query)
            .content(MediaType::new(&v31, "application/json"))
            .unwrap();
        assert!(matches!(
            p.schema(Schema::string()),
            Err(BuildError::InvalidCombination(_))
        ));
        assert!(p.example(json!("x")).is_err());
    }

    #[test]
    fn test_content_keeps_serialization_fields() {
        let v31 = profile::builtin("3.1").unwrap();
        let p = Parameter::new(&v31, "filter", ParameterLocation::Query)
            .style("form")
            .unwrap()
            .explode(true)
            .unwrap()
            .content(MediaType::new(&v31, "application/json"))
            .unwrap()
            .allow_reserved(true)
            .unwrap();
        let model = p.to_model().unwrap();
        assert_eq!(model.style.as_deref(), Some("form"));
        assert_eq!(model.allow_reserved, Some(true));
        assert!(model.content.is_some());
    }

    #[test]
    fn test_empty_name_required_at_assembly() {
        let v31 = profile::builtin("3.1").unwrap();
        let err = Parameter::new(&v31, "", ParameterLocation::Query)
            .to_model()
            .unwrap_err();
        assert!(matches!(err, BuildError::RequiredMissing { .. }));
    }
}
