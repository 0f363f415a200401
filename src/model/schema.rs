//! Schema Object and its satellites (Discriminator, Xml)

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use super::{
    require_text, Extensions, ExternalDocumentation, ModelError, OrderedMap, RefOr, SchemaList,
    SchemaMap,
};

/// `additionalProperties` / `unevaluatedProperties`: a flag or a subschema
#[derive(Debug, Clone, PartialEq)]
pub enum BoolOrSchema {
    Bool(bool),
    Schema(Box<RefOr<Schema>>),
}

/// Schema Object (JSON Schema 2020-12 subset plus OAS add-ons)
#[derive(Debug, Clone, PartialEq, Default)]
#[non_exhaustive]
pub struct Schema {
    /// Boolean schema (`true` accepts everything, `false` nothing)
    pub raw: Option<bool>,
    pub types: Vec<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub format: Option<String>,
    pub default: Option<Value>,
    pub enum_values: Vec<Value>,
    pub const_value: Option<Value>,

    pub all_of: Option<SchemaList>,
    pub any_of: Option<SchemaList>,
    pub one_of: Option<SchemaList>,
    pub not: Option<Box<RefOr<Schema>>>,

    pub items: Option<Box<RefOr<Schema>>>,
    pub prefix_items: Option<SchemaList>,

    pub properties: Option<SchemaMap>,
    pub pattern_properties: Option<SchemaMap>,
    pub additional_properties: Option<BoolOrSchema>,
    pub unevaluated_properties: Option<BoolOrSchema>,
    pub dependent_schemas: Option<SchemaMap>,
    pub required: Vec<String>,

    pub if_schema: Option<Box<RefOr<Schema>>>,
    pub then_schema: Option<Box<RefOr<Schema>>>,
    pub else_schema: Option<Box<RefOr<Schema>>>,

    pub content_media_type: Option<String>,
    pub content_encoding: Option<String>,
    pub content_schema: Option<Box<RefOr<Schema>>>,

    pub nullable: Option<bool>,
    pub read_only: Option<bool>,
    pub write_only: Option<bool>,
    pub deprecated: Option<bool>,

    pub discriminator: Option<Discriminator>,
    pub xml: Option<Xml>,
    pub external_docs: Option<ExternalDocumentation>,

    pub example: Option<Value>,
    pub examples: Vec<Value>,
    /// Validation keywords without a dedicated field (minLength, maximum, ...)
    pub keywords: serde_json::Map<String, Value>,
    pub extensions: Extensions,
}

impl Schema {
    pub(crate) fn checked(self) -> Result<Self, ModelError> {
        if self.read_only == Some(true) && self.write_only == Some(true) {
            return Err(ModelError::invalid(
                "Schema",
                "readOnly and writeOnly cannot both be true",
            ));
        }
        if let Some(props) = &self.properties {
            if let Some(missing) = self.required.iter().find(|n| !props.contains_key(n)) {
                return Err(ModelError::invalid(
                    "Schema",
                    format!("required property '{}' is not declared in properties", missing),
                ));
            }
        }
        Ok(self)
    }

    pub fn is_boolean_schema(&self) -> bool {
        self.raw.is_some()
    }
}

// =============================================================================
// Discriminator
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct Discriminator {
    pub property_name: String,
    pub mapping: Option<OrderedMap<String>>,
    pub default_mapping: Option<String>,
    pub extensions: Extensions,
}

impl Discriminator {
    pub(crate) fn checked(self) -> Result<Self, ModelError> {
        require_text("Discriminator", "propertyName", &self.property_name)?;
        if let Some(map) = &self.mapping {
            if map.keys().any(str::is_empty) {
                return Err(ModelError::invalid("Discriminator", "mapping keys must not be empty"));
            }
        }
        Ok(self)
    }
}

// =============================================================================
// Xml
// =============================================================================

/// XML node kind (3.2 `nodeType`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XmlNodeType {
    Element,
    Attribute,
    Text,
    Cdata,
    None,
}

impl XmlNodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Element => "element",
            Self::Attribute => "attribute",
            Self::Text => "text",
            Self::Cdata => "cdata",
            Self::None => "none",
        }
    }
}

impl fmt::Display for XmlNodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for XmlNodeType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "element" => Ok(Self::Element),
            "attribute" => Ok(Self::Attribute),
            "text" => Ok(Self::Text),
            "cdata" => Ok(Self::Cdata),
            "none" => Ok(Self::None),
            other => Err(ModelError::UnknownVariant {
                kind: "XmlNodeType".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
#[non_exhaustive]
pub struct Xml {
    pub node_type: Option<XmlNodeType>,
    pub name: Option<String>,
    pub namespace: Option<String>,
    pub prefix: Option<String>,
    pub attribute: Option<bool>,
    pub wrapped: Option<bool>,
    pub extensions: Extensions,
}

impl Xml {
    pub(crate) fn checked(self) -> Result<Self, ModelError> {
        // nodeType supersedes the older attribute/wrapped flags
        if self.node_type.is_some() && (self.attribute.is_some() || self.wrapped.is_some()) {
            return Err(ModelError::invalid(
                "Xml",
                "nodeType cannot be combined with attribute or wrapped",
            ));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CollectionKind, KeyedCollection};

    #[test]
    fn test_required_must_be_declared() {
        let mut props = OrderedMap::new();
        props.insert("id", RefOr::Item(Schema::default()));
        let schema = Schema {
            properties: Some(KeyedCollection::try_new(CollectionKind::Schemas, props).unwrap()),
            required: vec!["id".into(), "name".into()],
            ..Schema::default()
        };

        let err = schema.checked().unwrap_err();
        assert!(err.to_string().contains("'name'"));
    }

    #[test]
    fn test_xml_node_type_conflicts_with_wrapped() {
        let xml = Xml {
            node_type: Some(XmlNodeType::Element),
            wrapped: Some(true),
            ..Xml::default()
        };
        assert!(xml.checked().is_err());
    }

    #[test]
    fn test_xml_node_type_parse() {
        assert_eq!("cdata".parse::<XmlNodeType>().unwrap(), XmlNodeType::Cdata);
        assert!("comment".parse::<XmlNodeType>().is_err());
    }
}
