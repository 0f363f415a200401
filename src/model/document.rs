//! Document-level nodes: the root document, metadata, paths and components

use super::{
    require_text, Extensions, ExampleMap, HeaderMap, KeyedCollection, LinkMap, MediaType,
    ModelError, OrderedList,
    ParameterList, ParameterMap, PathItemMap, RefOr, RequestBody, RequestBodyMap, ResponseMap,
    Responses, SchemaMap, SecurityRequirementList, SecuritySchemeMap, ServerList,
    ServerVariableMap, TagList,
};

// =============================================================================
// Small leaf nodes
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct ExternalDocumentation {
    pub url: String,
    pub description: Option<String>,
    pub extensions: Extensions,
}

impl ExternalDocumentation {
    pub(crate) fn checked(self) -> Result<Self, ModelError> {
        require_text("ExternalDocumentation", "url", &self.url)?;
        Ok(self)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
#[non_exhaustive]
pub struct Contact {
    pub name: Option<String>,
    pub url: Option<String>,
    pub email: Option<String>,
    pub extensions: Extensions,
}

impl Contact {
    pub(crate) fn checked(self) -> Result<Self, ModelError> {
        if let Some(email) = &self.email {
            if !email.contains('@') {
                return Err(ModelError::invalid("Contact", format!("'{}' is not an email address", email)));
            }
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct License {
    pub name: String,
    /// SPDX expression
    pub identifier: Option<String>,
    pub url: Option<String>,
    pub extensions: Extensions,
}

impl License {
    pub(crate) fn checked(self) -> Result<Self, ModelError> {
        require_text("License", "name", &self.name)?;
        if self.identifier.is_some() && self.url.is_some() {
            return Err(ModelError::invalid("License", "identifier and url are mutually exclusive"));
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct Info {
    pub title: String,
    pub version: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub terms_of_service: Option<String>,
    pub contact: Option<Contact>,
    pub license: Option<License>,
    pub extensions: Extensions,
}

impl Info {
    pub(crate) fn checked(self) -> Result<Self, ModelError> {
        require_text("Info", "title", &self.title)?;
        require_text("Info", "version", &self.version)?;
        Ok(self)
    }
}

// =============================================================================
// Servers and tags
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct ServerVariable {
    pub default: String,
    pub description: Option<String>,
    pub enum_values: Vec<String>,
    pub extensions: Extensions,
}

impl ServerVariable {
    pub(crate) fn checked(self) -> Result<Self, ModelError> {
        if !self.enum_values.is_empty() && !self.enum_values.contains(&self.default) {
            return Err(ModelError::invalid(
                "ServerVariable",
                format!("default '{}' is not one of the enum values", self.default),
            ));
        }
        Ok(self)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct Server {
    pub url: String,
    pub description: Option<String>,
    pub variables: Option<ServerVariableMap>,
    pub extensions: Extensions,
}

impl Server {
    pub(crate) fn checked(self) -> Result<Self, ModelError> {
        require_text("Server", "url", &self.url)?;
        Ok(self)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct Tag {
    pub name: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub external_docs: Option<ExternalDocumentation>,
    pub parent: Option<String>,
    pub kind: Option<String>,
    pub extensions: Extensions,
}

impl Tag {
    pub(crate) fn checked(self) -> Result<Self, ModelError> {
        require_text("Tag", "name", &self.name)?;
        if self.parent.as_deref() == Some(self.name.as_str()) {
            return Err(ModelError::invalid("Tag", format!("tag '{}' cannot be its own parent", self.name)));
        }
        Ok(self)
    }
}

// =============================================================================
// Operations and paths
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct Operation {
    pub tags: Option<OrderedList<String>>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub external_docs: Option<ExternalDocumentation>,
    pub operation_id: Option<String>,
    pub parameters: Option<ParameterList>,
    pub request_body: Option<RefOr<RequestBody>>,
    pub responses: Responses,
    pub callbacks: Option<PathItemMap>,
    pub deprecated: bool,
    pub security: Option<SecurityRequirementList>,
    pub servers: Option<ServerList>,
    pub extensions: Extensions,
}

impl Operation {
    pub(crate) fn checked(self) -> Result<Self, ModelError> {
        if let Some(id) = &self.operation_id {
            require_text("Operation", "operationId", id)?;
        }
        Ok(self)
    }
}

/// HTTP methods a Path Item can carry
pub const HTTP_METHODS: [&str; 9] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace", "query",
];

#[derive(Debug, Clone, PartialEq, Default)]
#[non_exhaustive]
pub struct PathItem {
    pub reference: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub get: Option<Operation>,
    pub put: Option<Operation>,
    pub post: Option<Operation>,
    pub delete: Option<Operation>,
    pub options: Option<Operation>,
    pub head: Option<Operation>,
    pub patch: Option<Operation>,
    pub trace: Option<Operation>,
    pub query: Option<Operation>,
    /// Methods outside the fixed set, keyed by their HTTP spelling
    pub additional_operations: Option<KeyedCollection<Operation>>,
    pub servers: Option<ServerList>,
    pub parameters: Option<ParameterList>,
    pub extensions: Extensions,
}

impl PathItem {
    pub(crate) fn checked(self) -> Result<Self, ModelError> {
        if let Some(r) = &self.reference {
            require_text("PathItem", "$ref", r)?;
        }
        if let Some(extra) = &self.additional_operations {
            if let Some(fixed) = extra
                .keys()
                .find(|m| HTTP_METHODS.contains(&m.to_ascii_lowercase().as_str()))
            {
                return Err(ModelError::invalid(
                    "PathItem",
                    format!("'{}' has a fixed field and cannot be an additional operation", fixed),
                ));
            }
        }
        Ok(self)
    }

    pub fn operation(&self, method: &str) -> Option<&Operation> {
        match method {
            "get" => self.get.as_ref(),
            "put" => self.put.as_ref(),
            "post" => self.post.as_ref(),
            "delete" => self.delete.as_ref(),
            "options" => self.options.as_ref(),
            "head" => self.head.as_ref(),
            "patch" => self.patch.as_ref(),
            "trace" => self.trace.as_ref(),
            "query" => self.query.as_ref(),
            _ => None,
        }
    }

    /// Methods that carry an operation, in declaration order
    pub fn methods(&self) -> Vec<&'static str> {
        HTTP_METHODS
            .iter()
            .copied()
            .filter(|m| self.operation(m).is_some())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
#[non_exhaustive]
pub struct Paths {
    pub items: Option<PathItemMap>,
    pub extensions: Extensions,
}

impl Paths {
    pub(crate) fn checked(self) -> Result<Self, ModelError> {
        if let Some(items) = &self.items {
            if let Some(bad) = items.keys().find(|k| !k.starts_with('/')) {
                return Err(ModelError::invalid("Paths", format!("path '{}' must start with '/'", bad)));
            }
        }
        Ok(self)
    }

    pub fn get(&self, path: &str) -> Option<&RefOr<PathItem>> {
        self.items.as_ref().and_then(|m| m.get(path))
    }
}

// =============================================================================
// Components
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
#[non_exhaustive]
pub struct Components {
    pub schemas: Option<SchemaMap>,
    pub responses: Option<ResponseMap>,
    pub parameters: Option<ParameterMap>,
    pub examples: Option<ExampleMap>,
    pub request_bodies: Option<RequestBodyMap>,
    pub headers: Option<HeaderMap>,
    pub security_schemes: Option<SecuritySchemeMap>,
    pub links: Option<LinkMap>,
    pub callbacks: Option<PathItemMap>,
    pub path_items: Option<PathItemMap>,
    pub media_types: Option<KeyedCollection<RefOr<MediaType>>>,
    pub extensions: Extensions,
}

impl Components {
    pub(crate) fn checked(self) -> Result<Self, ModelError> {
        Ok(self)
    }

    /// True when every section collapsed to absent
    pub fn is_empty(&self) -> bool {
        self.schemas.is_none()
            && self.responses.is_none()
            && self.parameters.is_none()
            && self.examples.is_none()
            && self.request_bodies.is_none()
            && self.headers.is_none()
            && self.security_schemes.is_none()
            && self.links.is_none()
            && self.callbacks.is_none()
            && self.path_items.is_none()
            && self.media_types.is_none()
    }
}

// =============================================================================
// Root document
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct OpenApiDocument {
    pub openapi: String,
    pub info: Info,
    pub json_schema_dialect: Option<String>,
    pub self_uri: Option<String>,
    pub paths: Option<Paths>,
    pub webhooks: Option<PathItemMap>,
    pub components: Option<Components>,
    pub servers: Option<ServerList>,
    pub security: Option<SecurityRequirementList>,
    pub tags: Option<TagList>,
    pub external_docs: Option<ExternalDocumentation>,
    pub extensions: Extensions,
}

impl OpenApiDocument {
    pub(crate) fn checked(self) -> Result<Self, ModelError> {
        require_text("OpenApiDocument", "openapi", &self.openapi)?;
        if let Some(tags) = &self.tags {
            let mut seen = std::collections::HashSet::new();
            if let Some(dup) = tags.iter().find(|t| !seen.insert(t.name.as_str())) {
                return Err(ModelError::invalid(
                    "OpenApiDocument",
                    format!("tag '{}' is declared more than once", dup.name),
                ));
            }
        }
        Ok(self)
    }
}
