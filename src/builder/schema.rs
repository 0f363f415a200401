//! Schema builder
//!
//! Schema is not version-gated: JSON Schema keywords travel through both
//! dialects unchanged. Keywords without a dedicated field go into a keyword
//! bag (`keyword("minLength", 3)` or the typed sugar like `min_length(3)`).
//!
//! A schema can carry a name so that `properties([...])` can key children
//! by it:
//!
//! ```ignore
//! Schema::object().properties([
//!     Schema::integer().named("id"),
//!     Schema::string().named("name"),
//! ])?
//! ```

use serde_json::Value;

use super::assembler::{assemble_boxed, assemble_keyed, assemble_list, assemble_opt};
use super::{keyed, ref_or, BuildsModel, Discriminator, ExternalDocs, Persistent, RefOr, Xml};
use crate::error::{BuildError, Result};
use crate::model::{self, CollectionKind, Extensions, OrderedMap};

/// `additionalProperties` / `unevaluatedProperties` at builder level
#[derive(Debug, Clone, PartialEq)]
pub enum Openness {
    Bool(bool),
    Schema(Box<RefOr<Schema>>),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Schema {
    name: Option<String>,
    raw: Option<bool>,
    types: Vec<String>,
    title: Option<String>,
    description: Option<String>,
    format: Option<String>,
    default: Option<Value>,
    enum_values: Vec<Value>,
    const_value: Option<Value>,

    all_of: Vec<RefOr<Schema>>,
    any_of: Vec<RefOr<Schema>>,
    one_of: Vec<RefOr<Schema>>,
    not: Option<Box<RefOr<Schema>>>,

    items: Option<Box<RefOr<Schema>>>,
    prefix_items: Vec<RefOr<Schema>>,

    properties: OrderedMap<RefOr<Schema>>,
    pattern_properties: OrderedMap<RefOr<Schema>>,
    additional_properties: Option<Openness>,
    unevaluated_properties: Option<Openness>,
    dependent_schemas: OrderedMap<RefOr<Schema>>,
    required: Vec<String>,

    if_schema: Option<Box<RefOr<Schema>>>,
    then_schema: Option<Box<RefOr<Schema>>>,
    else_schema: Option<Box<RefOr<Schema>>>,

    content_media_type: Option<String>,
    content_encoding: Option<String>,
    content_schema: Option<Box<RefOr<Schema>>>,

    nullable: Option<bool>,
    read_only: Option<bool>,
    write_only: Option<bool>,
    deprecated: Option<bool>,

    discriminator: Option<Discriminator>,
    xml: Option<Xml>,
    external_docs: Option<ExternalDocs>,

    example: Option<Value>,
    examples: Vec<Value>,
    keywords: serde_json::Map<String, Value>,
    extensions: Extensions,
}

builder_node!(Schema, "Schema");

fn boxed(value: impl Into<RefOr<Schema>>) -> Result<Option<Box<RefOr<Schema>>>> {
    Ok(Some(Box::new(ref_or(value)?)))
}

fn list<V: Into<RefOr<Schema>>>(values: impl IntoIterator<Item = V>) -> Result<Vec<RefOr<Schema>>> {
    values.into_iter().map(|v| ref_or(v)).collect()
}

impl Schema {
    // -------------------------------------------------------------------------
    // Factories
    // -------------------------------------------------------------------------

    /// Schema with no keywords (accepts anything)
    pub fn create() -> Self {
        Self::default()
    }

    fn typed(ty: &str) -> Self {
        Self {
            types: vec![ty.to_string()],
            ..Self::default()
        }
    }

    pub fn object() -> Self {
        Self::typed("object")
    }

    pub fn array() -> Self {
        Self::typed("array")
    }

    pub fn string() -> Self {
        Self::typed("string")
    }

    pub fn integer() -> Self {
        Self::typed("integer")
    }

    pub fn number() -> Self {
        Self::typed("number")
    }

    pub fn boolean() -> Self {
        Self::typed("boolean")
    }

    pub fn null() -> Self {
        Self::typed("null")
    }

    /// Boolean schema `true`
    pub fn always() -> Self {
        Self {
            raw: Some(true),
            ..Self::default()
        }
    }

    /// Boolean schema `false`
    pub fn never() -> Self {
        Self {
            raw: Some(false),
            ..Self::default()
        }
    }

    // -------------------------------------------------------------------------
    // Naming
    // -------------------------------------------------------------------------

    /// Name used as the property key when passed to `properties`
    pub fn named(&self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.update(|s| s.name = Some(name))
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    // -------------------------------------------------------------------------
    // Core keywords
    // -------------------------------------------------------------------------

    pub fn types<S: Into<String>>(&self, types: impl IntoIterator<Item = S>) -> Self {
        let types: Vec<String> = types.into_iter().map(Into::into).collect();
        self.update(|s| s.types = types)
    }

    pub fn title(&self, title: impl Into<String>) -> Self {
        let title = title.into();
        self.update(|s| s.title = Some(title))
    }

    pub fn description(&self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.update(|s| s.description = Some(description))
    }

    pub fn format(&self, format: impl Into<String>) -> Self {
        let format = format.into();
        self.update(|s| s.format = Some(format))
    }

    pub fn as_uuid(&self) -> Self {
        self.format("uuid")
    }

    pub fn as_date_time(&self) -> Self {
        self.format("date-time")
    }

    pub fn as_date(&self) -> Self {
        self.format("date")
    }

    pub fn as_email(&self) -> Self {
        self.format("email")
    }

    pub fn as_uri(&self) -> Self {
        self.format("uri")
    }

    pub fn default_value(&self, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.update(|s| s.default = Some(value))
    }

    pub fn enum_values<V: Into<Value>>(&self, values: impl IntoIterator<Item = V>) -> Self {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        self.update(|s| s.enum_values = values)
    }

    pub fn const_value(&self, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.update(|s| s.const_value = Some(value))
    }

    // -------------------------------------------------------------------------
    // Composition
    // -------------------------------------------------------------------------

    pub fn all_of<V: Into<RefOr<Schema>>>(&self, schemas: impl IntoIterator<Item = V>) -> Result<Self> {
        let schemas = list(schemas)?;
        Ok(self.update(|s| s.all_of = schemas))
    }

    pub fn any_of<V: Into<RefOr<Schema>>>(&self, schemas: impl IntoIterator<Item = V>) -> Result<Self> {
        let schemas = list(schemas)?;
        Ok(self.update(|s| s.any_of = schemas))
    }

    pub fn one_of<V: Into<RefOr<Schema>>>(&self, schemas: impl IntoIterator<Item = V>) -> Result<Self> {
        let schemas = list(schemas)?;
        Ok(self.update(|s| s.one_of = schemas))
    }

    pub fn not(&self, schema: impl Into<RefOr<Schema>>) -> Result<Self> {
        let schema = boxed(schema)?;
        Ok(self.update(|s| s.not = schema))
    }

    // -------------------------------------------------------------------------
    // Arrays
    // -------------------------------------------------------------------------

    pub fn items(&self, schema: impl Into<RefOr<Schema>>) -> Result<Self> {
        let schema = boxed(schema)?;
        Ok(self.update(|s| s.items = schema))
    }

    pub fn prefix_items<V: Into<RefOr<Schema>>>(
        &self,
        schemas: impl IntoIterator<Item = V>,
    ) -> Result<Self> {
        let schemas = list(schemas)?;
        Ok(self.update(|s| s.prefix_items = schemas))
    }

    pub fn min_items(&self, n: u64) -> Self {
        self.keyword("minItems", n)
    }

    pub fn max_items(&self, n: u64) -> Self {
        self.keyword("maxItems", n)
    }

    pub fn unique_items(&self, unique: bool) -> Self {
        self.keyword("uniqueItems", unique)
    }

    // -------------------------------------------------------------------------
    // Objects
    // -------------------------------------------------------------------------

    /// Replace the properties with named child schemas
    pub fn properties(&self, children: impl IntoIterator<Item = Schema>) -> Result<Self> {
        let mut properties = OrderedMap::new();
        for child in children {
            let name = child
                .name
                .clone()
                .filter(|n| !n.is_empty())
                .ok_or_else(|| {
                    BuildError::because(
                        "Schema: properties() needs named child schemas; use named() or properties_named()",
                    )
                })?;
            properties.insert(name, RefOr::Builder(child));
        }
        Ok(self.update(|s| s.properties = properties))
    }

    /// Replace the properties with explicit `(name, schema-or-$ref)` pairs
    pub fn properties_named<K, V>(&self, entries: impl IntoIterator<Item = (K, V)>) -> Result<Self>
    where
        K: Into<String>,
        V: Into<RefOr<Schema>>,
    {
        let properties = keyed("Schema", "properties", entries)?;
        Ok(self.update(|s| s.properties = properties))
    }

    /// Add or replace one property
    pub fn property(&self, name: impl Into<String>, schema: impl Into<RefOr<Schema>>) -> Result<Self> {
        let name = name.into();
        super::check_key("Schema", "properties", &name)?;
        let schema = ref_or(schema)?;
        Ok(self.update(|s| {
            s.properties.insert(name, schema);
        }))
    }

    pub fn pattern_property(
        &self,
        pattern: impl Into<String>,
        schema: impl Into<RefOr<Schema>>,
    ) -> Result<Self> {
        let pattern = pattern.into();
        super::check_key("Schema", "patternProperties", &pattern)?;
        let schema = ref_or(schema)?;
        Ok(self.update(|s| {
            s.pattern_properties.insert(pattern, schema);
        }))
    }

    pub fn dependent_schema(
        &self,
        property: impl Into<String>,
        schema: impl Into<RefOr<Schema>>,
    ) -> Result<Self> {
        let property = property.into();
        super::check_key("Schema", "dependentSchemas", &property)?;
        let schema = ref_or(schema)?;
        Ok(self.update(|s| {
            s.dependent_schemas.insert(property, schema);
        }))
    }

    /// Required property names; each must be declared when properties are present
    pub fn required<S: Into<String>>(&self, names: impl IntoIterator<Item = S>) -> Result<Self> {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if !self.properties.is_empty() {
            if let Some(unknown) = names.iter().find(|n| !self.properties.contains_key(n)) {
                return Err(BuildError::because(format!(
                    "Schema: required property '{}' is not declared in properties",
                    unknown
                )));
            }
        }
        Ok(self.update(|s| s.required = names))
    }

    pub fn additional_properties(&self, allowed: bool) -> Self {
        self.update(|s| s.additional_properties = Some(Openness::Bool(allowed)))
    }

    pub fn additional_properties_schema(&self, schema: impl Into<RefOr<Schema>>) -> Result<Self> {
        let schema = Box::new(ref_or(schema)?);
        Ok(self.update(|s| s.additional_properties = Some(Openness::Schema(schema))))
    }

    pub fn unevaluated_properties(&self, allowed: bool) -> Self {
        self.update(|s| s.unevaluated_properties = Some(Openness::Bool(allowed)))
    }

    pub fn unevaluated_properties_schema(&self, schema: impl Into<RefOr<Schema>>) -> Result<Self> {
        let schema = Box::new(ref_or(schema)?);
        Ok(self.update(|s| s.unevaluated_properties = Some(Openness::Schema(schema))))
    }

    pub fn min_properties(&self, n: u64) -> Self {
        self.keyword("minProperties", n)
    }

    pub fn max_properties(&self, n: u64) -> Self {
        self.keyword("maxProperties", n)
    }

    // -------------------------------------------------------------------------
    // Conditionals
    // -------------------------------------------------------------------------

    pub fn if_schema(&self, schema: impl Into<RefOr<Schema>>) -> Result<Self> {
        let schema = boxed(schema)?;
        Ok(self.update(|s| s.if_schema = schema))
    }

    pub fn then_schema(&self, schema: impl Into<RefOr<Schema>>) -> Result<Self> {
        let schema = boxed(schema)?;
        Ok(self.update(|s| s.then_schema = schema))
    }

    pub fn else_schema(&self, schema: impl Into<RefOr<Schema>>) -> Result<Self> {
        let schema = boxed(schema)?;
        Ok(self.update(|s| s.else_schema = schema))
    }

    // -------------------------------------------------------------------------
    // Strings and numbers
    // -------------------------------------------------------------------------

    pub fn min_length(&self, n: u64) -> Self {
        self.keyword("minLength", n)
    }

    pub fn max_length(&self, n: u64) -> Self {
        self.keyword("maxLength", n)
    }

    pub fn pattern(&self, regex: impl Into<String>) -> Self {
        self.keyword("pattern", regex.into())
    }

    pub fn minimum(&self, n: impl Into<Value>) -> Self {
        self.keyword("minimum", n)
    }

    pub fn maximum(&self, n: impl Into<Value>) -> Self {
        self.keyword("maximum", n)
    }

    pub fn exclusive_minimum(&self, n: impl Into<Value>) -> Self {
        self.keyword("exclusiveMinimum", n)
    }

    pub fn exclusive_maximum(&self, n: impl Into<Value>) -> Self {
        self.keyword("exclusiveMaximum", n)
    }

    pub fn multiple_of(&self, n: impl Into<Value>) -> Self {
        self.keyword("multipleOf", n)
    }

    pub fn content_media_type(&self, media_type: impl Into<String>) -> Self {
        let media_type = media_type.into();
        self.update(|s| s.content_media_type = Some(media_type))
    }

    pub fn content_encoding(&self, encoding: impl Into<String>) -> Self {
        let encoding = encoding.into();
        self.update(|s| s.content_encoding = Some(encoding))
    }

    pub fn content_schema(&self, schema: impl Into<RefOr<Schema>>) -> Result<Self> {
        let schema = boxed(schema)?;
        Ok(self.update(|s| s.content_schema = schema))
    }

    /// Any other keyword, stored verbatim
    pub fn keyword(&self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        let name = name.into();
        let value = value.into();
        self.update(|s| {
            s.keywords.insert(name, value);
        })
    }

    // -------------------------------------------------------------------------
    // Annotations
    // -------------------------------------------------------------------------

    pub fn nullable(&self, nullable: bool) -> Self {
        self.update(|s| s.nullable = Some(nullable))
    }

    pub fn read_only(&self, read_only: bool) -> Result<Self> {
        if read_only && self.write_only == Some(true) {
            return Err(BuildError::because("Schema: readOnly and writeOnly cannot both be true"));
        }
        Ok(self.update(|s| s.read_only = Some(read_only)))
    }

    pub fn write_only(&self, write_only: bool) -> Result<Self> {
        if write_only && self.read_only == Some(true) {
            return Err(BuildError::because("Schema: readOnly and writeOnly cannot both be true"));
        }
        Ok(self.update(|s| s.write_only = Some(write_only)))
    }

    pub fn deprecated(&self, deprecated: bool) -> Self {
        self.update(|s| s.deprecated = Some(deprecated))
    }

    pub fn discriminator(&self, discriminator: Discriminator) -> Self {
        self.update(|s| s.discriminator = Some(discriminator))
    }

    pub fn xml(&self, xml: Xml) -> Self {
        self.update(|s| s.xml = Some(xml))
    }

    pub fn external_docs(&self, docs: ExternalDocs) -> Self {
        self.update(|s| s.external_docs = Some(docs))
    }

    pub fn example(&self, example: impl Into<Value>) -> Self {
        let example = example.into();
        self.update(|s| s.example = Some(example))
    }

    pub fn examples<V: Into<Value>>(&self, examples: impl IntoIterator<Item = V>) -> Self {
        let examples: Vec<Value> = examples.into_iter().map(Into::into).collect();
        self.update(|s| s.examples = examples)
    }
}

fn assemble_openness(value: Option<&Openness>) -> Result<Option<model::BoolOrSchema>> {
    Ok(match value {
        None => None,
        Some(Openness::Bool(b)) => Some(model::BoolOrSchema::Bool(*b)),
        Some(Openness::Schema(s)) => Some(model::BoolOrSchema::Schema(Box::new(s.to_model()?))),
    })
}

impl BuildsModel for Schema {
    type Model = model::Schema;

    fn to_model(&self) -> Result<model::Schema> {
        let schema = model::Schema {
            raw: self.raw,
            types: self.types.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            format: self.format.clone(),
            default: self.default.clone(),
            enum_values: self.enum_values.clone(),
            const_value: self.const_value.clone(),
            all_of: assemble_list(CollectionKind::SchemaList, &self.all_of)?,
            any_of: assemble_list(CollectionKind::SchemaList, &self.any_of)?,
            one_of: assemble_list(CollectionKind::SchemaList, &self.one_of)?,
            not: assemble_boxed(self.not.as_deref())?,
            items: assemble_boxed(self.items.as_deref())?,
            prefix_items: assemble_list(CollectionKind::SchemaList, &self.prefix_items)?,
            properties: assemble_keyed(CollectionKind::Schemas, &self.properties)?,
            pattern_properties: assemble_keyed(
                CollectionKind::PatternSchemas,
                &self.pattern_properties,
            )?,
            additional_properties: assemble_openness(self.additional_properties.as_ref())?,
            unevaluated_properties: assemble_openness(self.unevaluated_properties.as_ref())?,
            dependent_schemas: assemble_keyed(CollectionKind::Schemas, &self.dependent_schemas)?,
            required: self.required.clone(),
            if_schema: assemble_boxed(self.if_schema.as_deref())?,
            then_schema: assemble_boxed(self.then_schema.as_deref())?,
            else_schema: assemble_boxed(self.else_schema.as_deref())?,
            content_media_type: self.content_media_type.clone(),
            content_encoding: self.content_encoding.clone(),
            content_schema: assemble_boxed(self.content_schema.as_deref())?,
            nullable: self.nullable,
            read_only: self.read_only,
            write_only: self.write_only,
            deprecated: self.deprecated,
            discriminator: assemble_opt(self.discriminator.as_ref())?,
            xml: assemble_opt(self.xml.as_ref())?,
            external_docs: assemble_opt(self.external_docs.as_ref())?,
            example: self.example.clone(),
            examples: self.examples.clone(),
            keywords: self.keywords.clone(),
            extensions: self.extensions.clone(),
        };
        Ok(schema.checked()?)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn pet() -> Schema {
        Schema::object()
            .properties([
                Schema::integer().named("id"),
                Schema::string().named("name").min_length(1),
            ])
            .unwrap()
    }

    #[test]
    fn test_properties_keyed_by_name_in_order() {
        let model = pet().required(["id"]).unwrap().to_model().unwrap();
        let props = model.properties.unwrap();
        assert_eq!(props.keys().collect::<Vec<_>>(), vec!["id", "name"]);
        assert_eq!(model.required, vec!["id".to_string()]);
    }

    #[test]
    fn test_unnamed_property_rejected() {
        let err = Schema::object().properties([Schema::string()]).unwrap_err();
        assert!(matches!(err, BuildError::InvalidCombination(_)));
    }

    #[test]
    fn test_required_must_name_declared_property() {
        let err = pet().required(["id", "owner"]).unwrap_err();
        assert!(err.to_string().contains("'owner'"));
    }

    #[test]
    fn test_sugar_lands_in_keyword_bag() {
        let model = Schema::string()
            .min_length(2)
            .max_length(10)
            .pattern("^[a-z]+$")
            .as_uuid()
            .to_model()
            .unwrap();
        assert_eq!(model.keywords.get("minLength"), Some(&json!(2)));
        assert_eq!(model.keywords.get("pattern"), Some(&json!("^[a-z]+$")));
        assert_eq!(model.format.as_deref(), Some("uuid"));
    }

    #[test]
    fn test_read_only_excludes_write_only() {
        let s = Schema::string().read_only(true).unwrap();
        assert!(s.write_only(true).is_err());
        assert!(s.write_only(false).is_ok());
    }

    #[test]
    fn test_composition_accepts_refs_and_builders() {
        let model = Schema::create()
            .one_of([
                RefOr::from("#/components/schemas/Cat"),
                RefOr::from(Schema::null()),
            ])
            .unwrap()
            .to_model()
            .unwrap();
        let one_of = model.one_of.unwrap();
        assert_eq!(one_of.len(), 2);
        assert!(one_of.get(0).unwrap().is_ref());
    }

    #[test]
    fn test_empty_composition_is_absent() {
        let model = Schema::create().all_of(Vec::<Schema>::new()).unwrap().to_model().unwrap();
        assert!(model.all_of.is_none());
    }

    #[test]
    fn test_conditionals() {
        let model = Schema::object()
            .if_schema(Schema::create().property("kind", Schema::create().const_value("card")).unwrap())
            .unwrap()
            .then_schema("#/components/schemas/Card")
            .unwrap()
            .to_model()
            .unwrap();
        assert!(model.if_schema.is_some());
        assert!(model.then_schema.unwrap().is_ref());
        assert!(model.else_schema.is_none());
    }
}
