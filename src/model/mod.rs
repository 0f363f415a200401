//! Canonical Document Model
//!
//! Immutable value tree produced by assembly. Builders never hand out these
//! types half-filled: every node is created through a validating constructor
//! (`checked`) that enforces the structural rules of the node itself.
//!
//! Nodes are `#[non_exhaustive]` so that code outside this crate can read
//! them freely but cannot bypass the constructors.
//!
//! The tree is acyclic. Cross-references are carried as [`Reference`]
//! values and are never resolved here.

pub mod collections;
pub mod content;
pub mod document;
pub mod schema;
pub mod security;

pub use collections::{CollectionKind, KeyedCollection, OrderedList, OrderedMap};
pub use content::{
    Encoding, Example, Header, Link, MediaType, Parameter, ParameterLocation, RequestBody,
    Response, Responses,
};
pub use document::{
    Components, Contact, ExternalDocumentation, Info, License, OpenApiDocument, Operation,
    PathItem, Paths, Server, ServerVariable, Tag, HTTP_METHODS,
};
pub use schema::{BoolOrSchema, Discriminator, Schema, Xml, XmlNodeType};
pub use security::{
    OAuthFlow, OAuthFlows, SecurityRequirement, SecurityScheme, SecuritySchemeType,
    API_KEY_LOCATIONS,
};

use thiserror::Error;

/// Extension bag: ordered `x-*` key to arbitrary document value
pub type Extensions = serde_json::Map<String, serde_json::Value>;

// --- Collection aliases ---

pub type SchemaMap = KeyedCollection<RefOr<Schema>>;
pub type SchemaList = OrderedList<RefOr<Schema>>;
pub type ResponseMap = KeyedCollection<RefOr<Response>>;
pub type ParameterMap = KeyedCollection<RefOr<Parameter>>;
pub type ParameterList = OrderedList<RefOr<Parameter>>;
pub type ExampleMap = KeyedCollection<RefOr<Example>>;
pub type RequestBodyMap = KeyedCollection<RefOr<RequestBody>>;
pub type HeaderMap = KeyedCollection<RefOr<Header>>;
pub type SecuritySchemeMap = KeyedCollection<RefOr<SecurityScheme>>;
pub type LinkMap = KeyedCollection<RefOr<Link>>;
pub type PathItemMap = KeyedCollection<RefOr<PathItem>>;
pub type MediaTypeMap = KeyedCollection<MediaType>;
pub type EncodingMap = KeyedCollection<Encoding>;
pub type EncodingList = OrderedList<Encoding>;
pub type ServerList = OrderedList<Server>;
pub type ServerVariableMap = KeyedCollection<ServerVariable>;
pub type TagList = OrderedList<Tag>;
pub type SecurityRequirementList = OrderedList<SecurityRequirement>;

// =============================================================================
// Errors
// =============================================================================

/// Structural errors raised by canonical constructors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("{kind} cannot be constructed from zero entries")]
    EmptyCollection { kind: CollectionKind },

    #[error("{node}: required field '{field}' is missing")]
    MissingField { node: String, field: String },

    #[error("{node}: {reason}")]
    Invalid { node: String, reason: String },

    #[error("Unknown {kind} value '{value}'")]
    UnknownVariant { kind: String, value: String },
}

impl ModelError {
    pub(crate) fn missing(node: &str, field: &str) -> Self {
        Self::MissingField {
            node: node.to_string(),
            field: field.to_string(),
        }
    }

    pub(crate) fn invalid(node: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            node: node.to_string(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Reference
// =============================================================================

/// Canonical `$ref` node
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Reference {
    pub reference: String,
    pub summary: Option<String>,
    pub description: Option<String>,
}

impl Reference {
    pub fn new(
        reference: impl Into<String>,
        summary: Option<String>,
        description: Option<String>,
    ) -> Result<Self, ModelError> {
        let reference = reference.into();
        if reference.is_empty() {
            return Err(ModelError::invalid("Reference", "\"$ref\" must not be empty"));
        }
        Ok(Self { reference, summary, description })
    }

    pub fn token(&self) -> &str {
        &self.reference
    }
}

/// A slot that holds either an inline node or a reference to one
#[derive(Debug, Clone, PartialEq)]
pub enum RefOr<T> {
    Item(T),
    Ref(Reference),
}

impl<T> RefOr<T> {
    pub fn is_ref(&self) -> bool {
        matches!(self, RefOr::Ref(_))
    }

    pub fn as_item(&self) -> Option<&T> {
        match self {
            RefOr::Item(item) => Some(item),
            RefOr::Ref(_) => None,
        }
    }

    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            RefOr::Ref(r) => Some(r),
            RefOr::Item(_) => None,
        }
    }
}

/// Reject empty strings for fields the model treats as required
pub(crate) fn require_text(node: &str, field: &str, value: &str) -> Result<(), ModelError> {
    if value.is_empty() {
        return Err(ModelError::missing(node, field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_requires_token() {
        assert!(Reference::new("", None, None).is_err());
        let r = Reference::new("#/components/schemas/Pet", Some("pet".into()), None).unwrap();
        assert_eq!(r.token(), "#/components/schemas/Pet");
        assert_eq!(r.summary.as_deref(), Some("pet"));
    }

    #[test]
    fn test_ref_or_accessors() {
        let r: RefOr<u8> = RefOr::Ref(Reference::new("#/x", None, None).unwrap());
        assert!(r.is_ref());
        assert!(r.as_item().is_none());
        assert_eq!(r.as_reference().map(|r| r.token()), Some("#/x"));

        let item: RefOr<u8> = RefOr::Item(7);
        assert_eq!(item.as_item(), Some(&7));
    }
}
