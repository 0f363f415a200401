//! Paths, path item and operation builders

use std::sync::Arc;

use super::assembler::{assemble_keyed, assemble_list, assemble_opt, assemble_values};
use super::{
    check_key, check_text, ref_or, BuildsModel, Extensible, ExternalDocs, Parameter, Persistent,
    RefOr, RequestBody, Response, Responses, SecurityRequirement, Server,
};
use crate::error::{BuildError, Result};
use crate::model::{self, CollectionKind, Extensions, OrderedMap, HTTP_METHODS};
use crate::profile::{FeatureGuard, ProfileRef};

// =============================================================================
// Paths
// =============================================================================

/// Path templates (`/pets/{id}`) mapped to path items
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Paths {
    items: OrderedMap<RefOr<PathItem>>,
    extensions: Extensions,
}

builder_node!(Paths, "Paths");

fn check_path(path: &str) -> Result<()> {
    if path.is_empty() || !path.starts_with('/') {
        return Err(BuildError::invalid(format!(
            "Paths: path '{}' must be non-empty and start with '/'",
            path
        )));
    }
    Ok(())
}

impl Paths {
    pub fn create() -> Self {
        Self::default()
    }

    /// Put a path item (or `$ref`) under `path`, replacing any previous entry
    pub fn path(&self, path: impl Into<String>, item: impl Into<RefOr<PathItem>>) -> Result<Self> {
        let path = path.into();
        check_path(&path)?;
        let item = ref_or(item)?;
        Ok(self.update(|p| {
            p.items.insert(path, item);
        }))
    }

    /// Attach an operation to `path`, creating the path item on first use
    pub fn on(&self, method: &str, path: impl Into<String>, operation: Operation) -> Result<Self> {
        let path = path.into();
        check_path(&path)?;
        let item = match self.items.get(&path) {
            Some(RefOr::Builder(existing)) => existing.operation(method, operation)?,
            Some(RefOr::Ref(_)) => {
                return Err(BuildError::because(format!(
                    "Paths: '{}' is a $ref and cannot take inline operations",
                    path
                )))
            }
            None => PathItem::with_profile(operation.guard.profile()).operation(method, operation)?,
        };
        Ok(self.update(|p| {
            p.items.insert(path, RefOr::Builder(item));
        }))
    }

    pub fn get(&self, path: impl Into<String>, operation: Operation) -> Result<Self> {
        self.on("get", path, operation)
    }

    pub fn put(&self, path: impl Into<String>, operation: Operation) -> Result<Self> {
        self.on("put", path, operation)
    }

    pub fn post(&self, path: impl Into<String>, operation: Operation) -> Result<Self> {
        self.on("post", path, operation)
    }

    pub fn delete(&self, path: impl Into<String>, operation: Operation) -> Result<Self> {
        self.on("delete", path, operation)
    }

    pub fn patch(&self, path: impl Into<String>, operation: Operation) -> Result<Self> {
        self.on("patch", path, operation)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.items.contains_key(path)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl BuildsModel for Paths {
    type Model = model::Paths;

    fn to_model(&self) -> Result<model::Paths> {
        let paths = model::Paths {
            items: assemble_keyed(CollectionKind::PathItems, &self.items)?,
            extensions: self.extensions.clone(),
        };
        Ok(paths.checked()?)
    }
}

// =============================================================================
// PathItem
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct PathItem {
    guard: FeatureGuard,
    reference: Option<String>,
    summary: Option<String>,
    description: Option<String>,
    operations: OrderedMap<Operation>,
    additional_operations: OrderedMap<Operation>,
    servers: Vec<Server>,
    parameters: Vec<RefOr<Parameter>>,
    extensions: Extensions,
}

builder_node!(PathItem, "PathItem", guarded);

impl PathItem {
    pub fn with_profile(profile: &ProfileRef) -> Self {
        Self {
            guard: FeatureGuard::new(Arc::clone(profile)),
            reference: None,
            summary: None,
            description: None,
            operations: OrderedMap::new(),
            additional_operations: OrderedMap::new(),
            servers: Vec::new(),
            parameters: Vec::new(),
            extensions: Extensions::new(),
        }
    }

    pub fn create() -> Result<Self> {
        Ok(Self::with_profile(FeatureGuard::current()?.profile()))
    }

    /// Inline `$ref` to a path item defined elsewhere
    pub fn reference(&self, token: impl Into<String>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "ref")?;
        let token = token.into();
        check_text(Self::NODE_TYPE, "$ref", &token)?;
        Ok(self.update(|p| p.reference = Some(token)))
    }

    pub fn summary(&self, summary: impl Into<String>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "summary")?;
        let summary = summary.into();
        Ok(self.update(|p| p.summary = Some(summary)))
    }

    pub fn description(&self, description: impl Into<String>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "description")?;
        let description = description.into();
        Ok(self.update(|p| p.description = Some(description)))
    }

    /// Attach an operation under `method` (case-insensitive). Methods
    /// outside the fixed set go to `additionalOperations`.
    pub fn operation(&self, method: &str, operation: Operation) -> Result<Self> {
        let lower = method.to_ascii_lowercase();
        if !HTTP_METHODS.contains(&lower.as_str()) {
            return self.additional_operation(method, operation);
        }
        self.guard.assert_allowed_key(Self::NODE_TYPE, &lower)?;
        Ok(self.update(|p| {
            p.operations.insert(lower, operation);
        }))
    }

    pub fn get(&self, operation: Operation) -> Result<Self> {
        self.operation("get", operation)
    }

    pub fn put(&self, operation: Operation) -> Result<Self> {
        self.operation("put", operation)
    }

    pub fn post(&self, operation: Operation) -> Result<Self> {
        self.operation("post", operation)
    }

    pub fn delete(&self, operation: Operation) -> Result<Self> {
        self.operation("delete", operation)
    }

    pub fn options(&self, operation: Operation) -> Result<Self> {
        self.operation("options", operation)
    }

    pub fn head(&self, operation: Operation) -> Result<Self> {
        self.operation("head", operation)
    }

    pub fn patch(&self, operation: Operation) -> Result<Self> {
        self.operation("patch", operation)
    }

    pub fn trace(&self, operation: Operation) -> Result<Self> {
        self.operation("trace", operation)
    }

    /// Safe, idempotent request with a body (3.2)
    pub fn query(&self, operation: Operation) -> Result<Self> {
        self.operation("query", operation)
    }

    /// Operation for a method without a fixed field, e.g. `COPY` (3.2)
    pub fn additional_operation(&self, method: impl Into<String>, operation: Operation) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "additionalOperations")?;
        let method = method.into();
        check_key(Self::NODE_TYPE, "additionalOperations", &method)?;
        if HTTP_METHODS.contains(&method.to_ascii_lowercase().as_str()) {
            return Err(BuildError::because(format!(
                "PathItem: '{}' has a fixed field; use operation() instead",
                method
            )));
        }
        Ok(self.update(|p| {
            p.additional_operations.insert(method, operation);
        }))
    }

    pub fn server(&self, server: Server) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "servers")?;
        Ok(self.update(|p| p.servers.push(server)))
    }

    /// Parameter shared by every operation under this path
    pub fn parameter(&self, parameter: impl Into<RefOr<Parameter>>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "parameters")?;
        let parameter = ref_or(parameter)?;
        Ok(self.update(|p| p.parameters.push(parameter)))
    }

    /// Methods carrying an operation, in insertion order
    pub fn methods(&self) -> Vec<&str> {
        self.operations
            .keys()
            .chain(self.additional_operations.keys())
            .collect()
    }
}

impl BuildsModel for PathItem {
    type Model = model::PathItem;

    fn to_model(&self) -> Result<model::PathItem> {
        let op = |method: &str| assemble_opt(self.operations.get(method));

        let item = model::PathItem {
            reference: self.reference.clone(),
            summary: self.summary.clone(),
            description: self.description.clone(),
            get: op("get")?,
            put: op("put")?,
            post: op("post")?,
            delete: op("delete")?,
            options: op("options")?,
            head: op("head")?,
            patch: op("patch")?,
            trace: op("trace")?,
            query: op("query")?,
            additional_operations: assemble_keyed(
                CollectionKind::Operations,
                &self.additional_operations,
            )?,
            servers: assemble_list(CollectionKind::ServerList, &self.servers)?,
            parameters: assemble_list(CollectionKind::ParameterList, &self.parameters)?,
            extensions: self.extensions.clone(),
        };
        Ok(item.checked()?)
    }
}

// =============================================================================
// Operation
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    guard: FeatureGuard,
    tags: Vec<String>,
    summary: Option<String>,
    description: Option<String>,
    external_docs: Option<ExternalDocs>,
    operation_id: Option<String>,
    parameters: Vec<RefOr<Parameter>>,
    request_body: Option<RefOr<RequestBody>>,
    responses: Option<Responses>,
    callbacks: OrderedMap<RefOr<PathItem>>,
    deprecated: bool,
    security: Vec<SecurityRequirement>,
    servers: Vec<Server>,
    extensions: Extensions,
}

builder_node!(Operation, "Operation", guarded);

impl Operation {
    pub fn with_profile(profile: &ProfileRef) -> Self {
        Self {
            guard: FeatureGuard::new(Arc::clone(profile)),
            tags: Vec::new(),
            summary: None,
            description: None,
            external_docs: None,
            operation_id: None,
            parameters: Vec::new(),
            request_body: None,
            responses: None,
            callbacks: OrderedMap::new(),
            deprecated: false,
            security: Vec::new(),
            servers: Vec::new(),
            extensions: Extensions::new(),
        }
    }

    pub fn create() -> Result<Self> {
        Ok(Self::with_profile(FeatureGuard::current()?.profile()))
    }

    pub fn tag(&self, tag: impl Into<String>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "tags")?;
        let tag = tag.into();
        check_text(Self::NODE_TYPE, "tags", &tag)?;
        Ok(self.update(|o| {
            if !o.tags.contains(&tag) {
                o.tags.push(tag);
            }
        }))
    }

    pub fn tags<S: Into<String>>(&self, tags: impl IntoIterator<Item = S>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "tags")?;
        let tags: Vec<String> = tags.into_iter().map(Into::into).collect();
        if tags.iter().any(String::is_empty) {
            return Err(BuildError::because("Operation: tag names cannot be empty"));
        }
        Ok(self.update(|o| o.tags = tags))
    }

    pub fn summary(&self, summary: impl Into<String>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "summary")?;
        let summary = summary.into();
        Ok(self.update(|o| o.summary = Some(summary)))
    }

    pub fn description(&self, description: impl Into<String>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "description")?;
        let description = description.into();
        Ok(self.update(|o| o.description = Some(description)))
    }

    pub fn external_docs(&self, docs: ExternalDocs) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "externalDocs")?;
        Ok(self.update(|o| o.external_docs = Some(docs)))
    }

    pub fn operation_id(&self, id: impl Into<String>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "operationId")?;
        let id = id.into();
        check_text(Self::NODE_TYPE, "operationId", &id)?;
        Ok(self.update(|o| o.operation_id = Some(id)))
    }

    pub fn deprecated(&self, deprecated: bool) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "deprecated")?;
        Ok(self.update(|o| o.deprecated = deprecated))
    }

    pub fn parameter(&self, parameter: impl Into<RefOr<Parameter>>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "parameters")?;
        let parameter = ref_or(parameter)?;
        Ok(self.update(|o| o.parameters.push(parameter)))
    }

    /// Replace all parameters
    pub fn parameters<V: Into<RefOr<Parameter>>>(
        &self,
        parameters: impl IntoIterator<Item = V>,
    ) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "parameters")?;
        let parameters = parameters
            .into_iter()
            .map(|p| ref_or(p))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.update(|o| o.parameters = parameters))
    }

    pub fn request_body(&self, body: impl Into<RefOr<RequestBody>>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "requestBody")?;
        let body = ref_or(body)?;
        Ok(self.update(|o| o.request_body = Some(body)))
    }

    pub fn responses(&self, responses: Responses) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "responses")?;
        Ok(self.update(|o| o.responses = Some(responses)))
    }

    /// Add one response under its own status
    pub fn response(&self, response: Response) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "responses")?;
        Ok(self.update(|o| {
            let responses = o.responses.take().unwrap_or_default();
            o.responses = Some(responses.add(response));
        }))
    }

    pub fn callback(&self, name: impl Into<String>, item: impl Into<RefOr<PathItem>>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "callbacks")?;
        let name = name.into();
        check_key(Self::NODE_TYPE, "callbacks", &name)?;
        let item = ref_or(item)?;
        Ok(self.update(|o| {
            o.callbacks.insert(name, item);
        }))
    }

    pub fn security(&self, requirement: SecurityRequirement) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "security")?;
        Ok(self.update(|o| o.security.push(requirement)))
    }

    pub fn server(&self, server: Server) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "servers")?;
        Ok(self.update(|o| o.servers.push(server)))
    }
}

impl BuildsModel for Operation {
    type Model = model::Operation;

    fn to_model(&self) -> Result<model::Operation> {
        let responses = self
            .responses
            .as_ref()
            .ok_or_else(|| BuildError::required(Self::NODE_TYPE, "responses"))?
            .to_model()?;

        let operation = model::Operation {
            tags: assemble_values(CollectionKind::TagNames, &self.tags)?,
            summary: self.summary.clone(),
            description: self.description.clone(),
            external_docs: assemble_opt(self.external_docs.as_ref())?,
            operation_id: self.operation_id.clone(),
            parameters: assemble_list(CollectionKind::ParameterList, &self.parameters)?,
            request_body: assemble_opt(self.request_body.as_ref())?,
            responses,
            callbacks: assemble_keyed(CollectionKind::Callbacks, &self.callbacks)?,
            deprecated: self.deprecated,
            security: assemble_list(CollectionKind::SecurityRequirementList, &self.security)?,
            servers: assemble_list(CollectionKind::ServerList, &self.servers)?,
            extensions: self.extensions.clone(),
        };
        Ok(operation.checked()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile;

    fn listed(profile: &ProfileRef) -> Operation {
        Operation::with_profile(profile)
            .operation_id("listPets")
            .unwrap()
            .response(Response::new(profile, "200").unwrap().description("OK").unwrap())
            .unwrap()
    }

    #[test]
    fn test_operation_requires_responses() {
        let v31 = profile::builtin("3.1").unwrap();
        let err = Operation::with_profile(&v31).to_model().unwrap_err();
        assert_eq!(err.to_string(), "Missing required field 'responses' on Operation");
    }

    #[test]
    fn test_paths_merge_operations_on_same_path() {
        let v31 = profile::builtin("3.1").unwrap();
        let paths = Paths::create()
            .get("/pets", listed(&v31))
            .unwrap()
            .post("/pets", listed(&v31).operation_id("createPet").unwrap())
            .unwrap();

        let model = paths.to_model().unwrap();
        let item = model.get("/pets").unwrap().as_item().unwrap();
        assert_eq!(item.methods(), vec!["get", "post"]);
    }

    #[test]
    fn test_path_must_start_with_slash() {
        let v31 = profile::builtin("3.1").unwrap();
        assert!(matches!(
            Paths::create().get("pets", listed(&v31)),
            Err(BuildError::InvalidArgument(_))
        ));
        assert!(matches!(
            Paths::create().path("", "#/components/pathItems/Pets"),
            Err(BuildError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_query_method_gated() {
        let v31 = profile::builtin("3.1").unwrap();
        let v32 = profile::builtin("3.2").unwrap();
        assert!(PathItem::with_profile(&v31).query(listed(&v31)).is_err());
        let item = PathItem::with_profile(&v32).query(listed(&v32)).unwrap();
        assert!(item.to_model().unwrap().query.is_some());
    }

    #[test]
    fn test_additional_operations() {
        let v32 = profile::builtin("3.2").unwrap();
        let item = PathItem::with_profile(&v32)
            .operation("COPY", listed(&v32))
            .unwrap();
        assert_eq!(item.methods(), vec!["COPY"]);
        let model = item.to_model().unwrap();
        assert!(model.additional_operations.unwrap().contains_key("COPY"));

        assert!(PathItem::with_profile(&v32)
            .additional_operation("get", listed(&v32))
            .is_err());

        let v31 = profile::builtin("3.1").unwrap();
        assert!(PathItem::with_profile(&v31).operation("COPY", listed(&v31)).is_err());
    }

    #[test]
    fn test_ref_alias_accepted() {
        let v31 = profile::builtin("3.1").unwrap();
        let item = PathItem::with_profile(&v31)
            .reference("#/components/pathItems/Pets")
            .unwrap();
        assert_eq!(
            item.to_model().unwrap().reference.as_deref(),
            Some("#/components/pathItems/Pets")
        );
    }

    #[test]
    fn test_empty_collections_are_absent() {
        let v31 = profile::builtin("3.1").unwrap();
        let model = listed(&v31).to_model().unwrap();
        assert!(model.tags.is_none());
        assert!(model.parameters.is_none());
        assert!(model.callbacks.is_none());
        assert!(model.security.is_none());
    }

    #[test]
    fn test_tags_deduplicated() {
        let v31 = profile::builtin("3.1").unwrap();
        let model = listed(&v31)
            .tag("pets")
            .unwrap()
            .tag("pets")
            .unwrap()
            .to_model()
            .unwrap();
        assert_eq!(model.tags.unwrap().len(), 1);
    }
}
