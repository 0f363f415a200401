//! Payload-describing nodes: examples, media types, parameters, headers,
//! request bodies, responses and links

use std::fmt;
use std::str::FromStr;

use serde_json::Value;

use super::{
    require_text, EncodingList, EncodingMap, ExampleMap, Extensions, HeaderMap, LinkMap,
    MediaTypeMap, ModelError, RefOr, ResponseMap, Schema, Server,
};

// =============================================================================
// Example
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
#[non_exhaustive]
pub struct Example {
    pub summary: Option<String>,
    pub description: Option<String>,
    pub data_value: Option<Value>,
    pub serialized_value: Option<String>,
    pub external_value: Option<String>,
    pub value: Option<Value>,
    pub extensions: Extensions,
}

impl Example {
    pub(crate) fn checked(self) -> Result<Self, ModelError> {
        let set = [
            self.data_value.is_some(),
            self.serialized_value.is_some(),
            self.external_value.is_some(),
            self.value.is_some(),
        ];
        if set.iter().filter(|s| **s).count() > 1 {
            return Err(ModelError::invalid(
                "Example",
                "dataValue, serializedValue, externalValue and value are mutually exclusive",
            ));
        }
        Ok(self)
    }
}

// =============================================================================
// Encoding / MediaType
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
#[non_exhaustive]
pub struct Encoding {
    pub content_type: Option<String>,
    pub headers: Option<HeaderMap>,
    pub style: Option<String>,
    pub explode: bool,
    pub allow_reserved: bool,
    pub extensions: Extensions,
}

impl Encoding {
    pub(crate) fn checked(self) -> Result<Self, ModelError> {
        Ok(self)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
#[non_exhaustive]
pub struct MediaType {
    pub schema: Option<RefOr<Schema>>,
    pub item_schema: Option<RefOr<Schema>>,
    pub example: Option<Value>,
    pub examples: Option<ExampleMap>,
    pub encoding: Option<EncodingMap>,
    pub prefix_encoding: Option<EncodingList>,
    pub item_encoding: Option<Encoding>,
    pub extensions: Extensions,
}

impl MediaType {
    pub(crate) fn checked(self) -> Result<Self, ModelError> {
        if self.example.is_some() && self.examples.is_some() {
            return Err(ModelError::invalid("MediaType", "example and examples are mutually exclusive"));
        }
        if self.encoding.is_some() && (self.prefix_encoding.is_some() || self.item_encoding.is_some()) {
            return Err(ModelError::invalid(
                "MediaType",
                "encoding cannot be combined with prefixEncoding or itemEncoding",
            ));
        }
        Ok(self)
    }
}

// =============================================================================
// Header
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
#[non_exhaustive]
pub struct Header {
    pub description: Option<String>,
    pub required: bool,
    pub deprecated: bool,
    pub style: Option<String>,
    pub explode: Option<bool>,
    pub schema: Option<RefOr<Schema>>,
    pub example: Option<Value>,
    pub examples: Option<ExampleMap>,
    pub content: Option<MediaTypeMap>,
    pub extensions: Extensions,
}

impl Header {
    pub(crate) fn checked(self) -> Result<Self, ModelError> {
        if let Some(style) = &self.style {
            if style != "simple" {
                return Err(ModelError::invalid(
                    "Header",
                    format!("style must be 'simple', got '{}'", style),
                ));
            }
        }
        check_schema_or_content(
            "Header",
            self.schema.is_some() || self.example.is_some() || self.examples.is_some(),
            self.example.is_some() && self.examples.is_some(),
            self.content.as_ref().map(|c| c.len()),
        )?;
        Ok(self)
    }
}

/// Shared rules for Parameter and Header: schema-style XOR content-style,
/// example XOR examples, and a content map with exactly one media type
fn check_schema_or_content(
    node: &str,
    schema_side: bool,
    both_examples: bool,
    content_len: Option<usize>,
) -> Result<(), ModelError> {
    if both_examples {
        return Err(ModelError::invalid(node, "example and examples are mutually exclusive"));
    }
    if let Some(len) = content_len {
        if schema_side {
            return Err(ModelError::invalid(node, "schema/example(s) and content are mutually exclusive"));
        }
        if len != 1 {
            return Err(ModelError::invalid(node, "content must contain exactly one media type"));
        }
    }
    Ok(())
}

// =============================================================================
// Parameter
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterLocation {
    Query,
    Path,
    Header,
    Cookie,
}

impl ParameterLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Path => "path",
            Self::Header => "header",
            Self::Cookie => "cookie",
        }
    }
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParameterLocation {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "query" => Ok(Self::Query),
            "path" => Ok(Self::Path),
            "header" => Ok(Self::Header),
            "cookie" => Ok(Self::Cookie),
            other => Err(ModelError::UnknownVariant {
                kind: "ParameterLocation".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct Parameter {
    pub name: String,
    pub location: ParameterLocation,
    pub description: Option<String>,
    pub required: Option<bool>,
    pub deprecated: bool,
    pub allow_empty_value: Option<bool>,
    pub style: Option<String>,
    pub explode: Option<bool>,
    pub allow_reserved: Option<bool>,
    pub schema: Option<RefOr<Schema>>,
    pub example: Option<Value>,
    pub examples: Option<ExampleMap>,
    pub content: Option<MediaTypeMap>,
    pub extensions: Extensions,
}

impl Parameter {
    pub(crate) fn checked(self) -> Result<Self, ModelError> {
        require_text("Parameter", "name", &self.name)?;
        if self.location == ParameterLocation::Path && self.required != Some(true) {
            return Err(ModelError::invalid(
                "Parameter",
                format!("path parameter '{}' must be required", self.name),
            ));
        }
        check_schema_or_content(
            "Parameter",
            self.schema.is_some() || self.example.is_some() || self.examples.is_some(),
            self.example.is_some() && self.examples.is_some(),
            self.content.as_ref().map(|c| c.len()),
        )?;
        Ok(self)
    }
}

// =============================================================================
// RequestBody
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct RequestBody {
    pub description: Option<String>,
    pub content: MediaTypeMap,
    pub required: bool,
    pub extensions: Extensions,
}

impl RequestBody {
    pub(crate) fn checked(self) -> Result<Self, ModelError> {
        Ok(self)
    }
}

// =============================================================================
// Response / Responses
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
#[non_exhaustive]
pub struct Response {
    pub summary: Option<String>,
    pub description: Option<String>,
    pub headers: Option<HeaderMap>,
    pub content: Option<MediaTypeMap>,
    pub links: Option<LinkMap>,
    pub extensions: Extensions,
}

impl Response {
    pub(crate) fn checked(self) -> Result<Self, ModelError> {
        Ok(self)
    }
}

/// Responses Object. The `default` entry shares the keyed collection with
/// the status-code entries.
#[derive(Debug, Clone, PartialEq, Default)]
#[non_exhaustive]
pub struct Responses {
    pub entries: Option<ResponseMap>,
    pub extensions: Extensions,
}

impl Responses {
    pub(crate) fn checked(self) -> Result<Self, ModelError> {
        Ok(self)
    }

    pub fn get(&self, code: &str) -> Option<&RefOr<Response>> {
        self.entries.as_ref().and_then(|m| m.get(code))
    }

    pub fn default_response(&self) -> Option<&RefOr<Response>> {
        self.get("default")
    }

    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, |m| m.len())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_none()
    }
}

// =============================================================================
// Link
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
#[non_exhaustive]
pub struct Link {
    pub operation_ref: Option<String>,
    pub operation_id: Option<String>,
    pub parameters: serde_json::Map<String, Value>,
    pub request_body: Option<Value>,
    pub description: Option<String>,
    pub server: Option<Server>,
    pub extensions: Extensions,
}

impl Link {
    pub(crate) fn checked(self) -> Result<Self, ModelError> {
        match (&self.operation_ref, &self.operation_id) {
            (Some(_), Some(_)) => Err(ModelError::invalid(
                "Link",
                "operationRef and operationId are mutually exclusive",
            )),
            (None, None) => Err(ModelError::invalid(
                "Link",
                "one of operationRef or operationId is required",
            )),
            _ => Ok(self),
        }
    }
}
