//! Root document builder

use std::sync::Arc;

use semver::Version;

use super::assembler::{assemble_keyed, assemble_list, assemble_opt};
use super::{
    check_key, check_text, ref_or, BuildsModel, Components, Extensible, ExternalDocs, Info,
    PathItem, Paths, Persistent, RefOr, SecurityRequirement, Server, Tag,
};
use crate::error::{BuildError, Result};
use crate::model::{self, CollectionKind, Extensions, OrderedMap};
use crate::profile::{self, FeatureGuard, ProfileRef};

/// Builder for a whole OpenAPI document
#[derive(Debug, Clone, PartialEq)]
pub struct OpenApi {
    guard: FeatureGuard,
    openapi: Option<String>,
    info: Option<Info>,
    json_schema_dialect: Option<String>,
    self_uri: Option<String>,
    paths: Option<Paths>,
    webhooks: OrderedMap<RefOr<PathItem>>,
    components: Option<Components>,
    servers: Vec<Server>,
    security: Vec<SecurityRequirement>,
    tags: Vec<Tag>,
    external_docs: Option<ExternalDocs>,
    extensions: Extensions,
}

builder_node!(OpenApi, "OpenApiDocument", guarded);

impl OpenApi {
    pub fn with_profile(profile: &ProfileRef) -> Self {
        Self {
            guard: FeatureGuard::new(Arc::clone(profile)),
            openapi: None,
            info: None,
            json_schema_dialect: None,
            self_uri: None,
            paths: None,
            webhooks: OrderedMap::new(),
            components: None,
            servers: Vec::new(),
            security: Vec::new(),
            tags: Vec::new(),
            external_docs: None,
            extensions: Extensions::new(),
        }
    }

    pub fn create() -> Result<Self> {
        Ok(Self::with_profile(FeatureGuard::current()?.profile()))
    }

    /// Document bound to a built-in profile, `openapi` preset to its version
    pub fn for_builtin(id: &str) -> Result<Self> {
        let profile = profile::builtin(id)?;
        let version = profile.version().to_string();
        Ok(Self::with_profile(&profile).update(|d| d.openapi = Some(version)))
    }

    pub fn oas31() -> Result<Self> {
        Self::for_builtin("3.1")
    }

    pub fn oas32() -> Result<Self> {
        Self::for_builtin("3.2")
    }

    /// Dialect version written to the `openapi` field, e.g. "3.1.0"
    pub fn openapi(&self, version: impl Into<String>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "openapi")?;
        let version = version.into();
        check_text(Self::NODE_TYPE, "openapi", &version)?;
        Ok(self.update(|d| d.openapi = Some(version)))
    }

    pub fn info(&self, info: Info) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "info")?;
        Ok(self.update(|d| d.info = Some(info)))
    }

    pub fn json_schema_dialect(&self, uri: impl Into<String>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "jsonSchemaDialect")?;
        let uri = uri.into();
        Ok(self.update(|d| d.json_schema_dialect = Some(uri)))
    }

    /// Canonical URI of this document (`$self`, 3.2)
    pub fn self_uri(&self, uri: impl Into<String>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "self")?;
        let uri = uri.into();
        check_text(Self::NODE_TYPE, "$self", &uri)?;
        Ok(self.update(|d| d.self_uri = Some(uri)))
    }

    pub fn paths(&self, paths: Paths) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "paths")?;
        Ok(self.update(|d| d.paths = Some(paths)))
    }

    /// Add one path item, creating the paths object on first use
    pub fn path(&self, path: impl Into<String>, item: impl Into<RefOr<PathItem>>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "paths")?;
        let paths = self.paths.clone().unwrap_or_default().path(path, item)?;
        Ok(self.update(|d| d.paths = Some(paths)))
    }

    pub fn webhook(&self, name: impl Into<String>, item: impl Into<RefOr<PathItem>>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "webhooks")?;
        let name = name.into();
        check_key(Self::NODE_TYPE, "webhooks", &name)?;
        let item = ref_or(item)?;
        Ok(self.update(|d| {
            d.webhooks.insert(name, item);
        }))
    }

    pub fn components(&self, components: Components) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "components")?;
        Ok(self.update(|d| d.components = Some(components)))
    }

    pub fn server(&self, server: Server) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "servers")?;
        Ok(self.update(|d| d.servers.push(server)))
    }

    pub fn security(&self, requirement: SecurityRequirement) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "security")?;
        Ok(self.update(|d| d.security.push(requirement)))
    }

    /// Declare a tag; names must be unique within the document
    pub fn tag(&self, tag: Tag) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "tags")?;
        if self.tags.iter().any(|t| t.name() == tag.name()) {
            return Err(BuildError::because(format!(
                "OpenApiDocument: tag '{}' is already declared",
                tag.name()
            )));
        }
        Ok(self.update(|d| d.tags.push(tag)))
    }

    pub fn external_docs(&self, docs: ExternalDocs) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "externalDocs")?;
        Ok(self.update(|d| d.external_docs = Some(docs)))
    }

    fn check_version(&self, openapi: &str) -> Result<()> {
        let declared = Version::parse(openapi)?;
        let dialect = self.guard.profile().version();
        if declared.major != dialect.major || declared.minor != dialect.minor {
            return Err(BuildError::because(format!(
                "OpenApiDocument: openapi '{}' does not match profile '{}' ({}.{})",
                openapi,
                self.guard.profile().id(),
                dialect.major,
                dialect.minor
            )));
        }
        Ok(())
    }
}

impl BuildsModel for OpenApi {
    type Model = model::OpenApiDocument;

    fn to_model(&self) -> Result<model::OpenApiDocument> {
        let openapi = self
            .openapi
            .clone()
            .ok_or_else(|| BuildError::required(Self::NODE_TYPE, "openapi"))?;
        self.check_version(&openapi)?;
        let info = self
            .info
            .as_ref()
            .ok_or_else(|| BuildError::required(Self::NODE_TYPE, "info"))?
            .to_model()?;

        let components = assemble_opt(self.components.as_ref())?
            .filter(|c| !(c.is_empty() && c.extensions.is_empty()));
        let paths = assemble_opt(self.paths.as_ref())?;

        tracing::debug!(
            openapi = %openapi,
            profile = self.guard.profile().id(),
            "assembling document"
        );

        let document = model::OpenApiDocument {
            openapi,
            info,
            json_schema_dialect: self.json_schema_dialect.clone(),
            self_uri: self.self_uri.clone(),
            paths,
            webhooks: assemble_keyed(CollectionKind::Webhooks, &self.webhooks)?,
            components,
            servers: assemble_list(CollectionKind::ServerList, &self.servers)?,
            security: assemble_list(CollectionKind::SecurityRequirementList, &self.security)?,
            tags: assemble_list(CollectionKind::TagList, &self.tags)?,
            external_docs: assemble_opt(self.external_docs.as_ref())?,
            extensions: self.extensions.clone(),
        };
        Ok(document.checked()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{Operation, Response, Schema};

    fn info(profile: &ProfileRef) -> Info {
        Info::with_profile(profile)
            .title("Pets")
            .unwrap()
            .version("1.0.0")
            .unwrap()
    }

    #[test]
    fn test_minimal_document() {
        let doc = OpenApi::oas31().unwrap();
        let v31 = doc.guard.profile().clone();
        let model = doc.info(info(&v31)).unwrap().to_model().unwrap();
        assert_eq!(model.openapi, "3.1.0");
        assert!(model.paths.is_none());
        assert!(model.components.is_none());
        assert!(model.tags.is_none());
    }

    #[test]
    fn test_openapi_and_info_required() {
        let v31 = profile::builtin("3.1").unwrap();
        let err = OpenApi::with_profile(&v31).to_model().unwrap_err();
        assert_eq!(err.to_string(), "Missing required field 'openapi' on OpenApiDocument");

        let err = OpenApi::oas31().unwrap().to_model().unwrap_err();
        assert_eq!(err.to_string(), "Missing required field 'info' on OpenApiDocument");
    }

    #[test]
    fn test_version_must_match_profile() {
        let v31 = profile::builtin("3.1").unwrap();
        let doc = OpenApi::with_profile(&v31).info(info(&v31)).unwrap();

        assert!(doc.openapi("3.1.1").unwrap().to_model().is_ok());
        assert!(matches!(
            doc.openapi("3.2.0").unwrap().to_model(),
            Err(BuildError::InvalidCombination(_))
        ));
        assert!(matches!(
            doc.openapi("three").unwrap().to_model(),
            Err(BuildError::Semver(_))
        ));
    }

    #[test]
    fn test_self_uri_gated() {
        assert!(OpenApi::oas31().unwrap().self_uri("https://example.com/api").is_err());
        let model = {
            let doc = OpenApi::oas32().unwrap();
            let v32 = doc.guard.profile().clone();
            doc.info(info(&v32))
                .unwrap()
                .self_uri("https://example.com/api")
                .unwrap()
                .to_model()
                .unwrap()
        };
        assert_eq!(model.self_uri.as_deref(), Some("https://example.com/api"));
    }

    #[test]
    fn test_empty_components_absent() {
        let v31 = profile::builtin("3.1").unwrap();
        let model = OpenApi::for_builtin("3.1")
            .unwrap()
            .info(info(&v31))
            .unwrap()
            .components(Components::with_profile(&v31))
            .unwrap()
            .to_model()
            .unwrap();
        assert!(model.components.is_none());
    }

    #[test]
    fn test_duplicate_tag_rejected() {
        let v31 = profile::builtin("3.1").unwrap();
        let doc = OpenApi::with_profile(&v31).tag(Tag::new(&v31, "pets")).unwrap();
        assert!(doc.tag(Tag::new(&v31, "pets")).is_err());
    }

    #[test]
    fn test_paths_and_webhooks() {
        let v31 = profile::builtin("3.1").unwrap();
        let op = Operation::with_profile(&v31)
            .response(Response::new(&v31, "200").unwrap().description("OK").unwrap())
            .unwrap();
        let model = OpenApi::oas31()
            .unwrap()
            .info(info(&v31))
            .unwrap()
            .path("/pets", PathItem::with_profile(&v31).get(op.clone()).unwrap())
            .unwrap()
            .webhook("newPet", PathItem::with_profile(&v31).post(op).unwrap())
            .unwrap()
            .components(Components::with_profile(&v31).schema("Pet", Schema::object()).unwrap())
            .unwrap()
            .to_model()
            .unwrap();
        assert!(model.paths.unwrap().get("/pets").is_some());
        assert!(model.webhooks.unwrap().contains_key("newPet"));
        assert!(model.components.unwrap().schemas.is_some());
    }
}
