//! Security scheme, OAuth flow and security requirement builders

use std::sync::Arc;

use super::assembler::assemble_opt;
use super::{check_key, check_text, BuildsModel, Extensible, Persistent};
use crate::error::{BuildError, Result};
use crate::model::{self, Extensions, OrderedMap, SecuritySchemeType, API_KEY_LOCATIONS};
use crate::profile::{FeatureGuard, ProfileRef};

// =============================================================================
// SecurityScheme
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct SecurityScheme {
    guard: FeatureGuard,
    scheme_type: SecuritySchemeType,
    description: Option<String>,
    name: Option<String>,
    location: Option<String>,
    scheme: Option<String>,
    bearer_format: Option<String>,
    flows: Option<OAuthFlows>,
    open_id_connect_url: Option<String>,
    oauth2_metadata_url: Option<String>,
    deprecated: Option<bool>,
    extensions: Extensions,
}

builder_node!(SecurityScheme, "SecurityScheme", guarded);

impl SecurityScheme {
    pub fn new(profile: &ProfileRef, scheme_type: SecuritySchemeType) -> Self {
        Self {
            guard: FeatureGuard::new(Arc::clone(profile)),
            scheme_type,
            description: None,
            name: None,
            location: None,
            scheme: None,
            bearer_format: None,
            flows: None,
            open_id_connect_url: None,
            oauth2_metadata_url: None,
            deprecated: None,
            extensions: Extensions::new(),
        }
    }

    fn ambient(scheme_type: SecuritySchemeType) -> Result<Self> {
        Ok(Self::new(FeatureGuard::current()?.profile(), scheme_type))
    }

    /// apiKey scheme carried in a header, query parameter or cookie
    pub fn api_key(name: impl Into<String>, location: impl Into<String>) -> Result<Self> {
        Self::ambient(SecuritySchemeType::ApiKey)?
            .key_name(name)?
            .key_location(location)
    }

    /// HTTP authentication scheme (`basic`, `bearer`, `digest`, ...)
    pub fn http(scheme: impl Into<String>) -> Result<Self> {
        Self::ambient(SecuritySchemeType::Http)?.scheme(scheme)
    }

    pub fn basic() -> Result<Self> {
        Self::http("basic")
    }

    pub fn bearer() -> Result<Self> {
        Self::http("bearer")
    }

    pub fn oauth2(flows: OAuthFlows) -> Result<Self> {
        Self::ambient(SecuritySchemeType::OAuth2)?.flows(flows)
    }

    pub fn open_id_connect(url: impl Into<String>) -> Result<Self> {
        Self::ambient(SecuritySchemeType::OpenIdConnect)?.open_id_connect_url(url)
    }

    pub fn mutual_tls() -> Result<Self> {
        Self::ambient(SecuritySchemeType::MutualTls)
    }

    pub fn scheme_type(&self) -> SecuritySchemeType {
        self.scheme_type
    }

    pub fn description(&self, description: impl Into<String>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "description")?;
        let description = description.into();
        Ok(self.update(|s| s.description = Some(description)))
    }

    /// Header, query or cookie name for apiKey schemes
    pub fn key_name(&self, name: impl Into<String>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "name")?;
        self.expect_type(SecuritySchemeType::ApiKey, "name")?;
        let name = name.into();
        check_text(Self::NODE_TYPE, "name", &name)?;
        Ok(self.update(|s| s.name = Some(name)))
    }

    pub fn key_location(&self, location: impl Into<String>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "in")?;
        self.expect_type(SecuritySchemeType::ApiKey, "in")?;
        let location = location.into();
        if !API_KEY_LOCATIONS.contains(&location.as_str()) {
            return Err(BuildError::because(format!(
                "SecurityScheme: apiKey 'in' must be one of header, query, cookie; got '{}'",
                location
            )));
        }
        Ok(self.update(|s| s.location = Some(location)))
    }

    pub fn scheme(&self, scheme: impl Into<String>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "scheme")?;
        self.expect_type(SecuritySchemeType::Http, "scheme")?;
        let scheme = scheme.into();
        check_text(Self::NODE_TYPE, "scheme", &scheme)?;
        Ok(self.update(|s| s.scheme = Some(scheme)))
    }

    /// Token format hint (`JWT`); bearer only
    pub fn bearer_format(&self, format: impl Into<String>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "bearerFormat")?;
        let is_bearer = self
            .scheme
            .as_deref()
            .is_some_and(|s| s.eq_ignore_ascii_case("bearer"));
        if !is_bearer {
            return Err(BuildError::because(
                "SecurityScheme: bearerFormat only applies to the http bearer scheme",
            ));
        }
        let format = format.into();
        Ok(self.update(|s| s.bearer_format = Some(format)))
    }

    pub fn flows(&self, flows: OAuthFlows) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "flows")?;
        Ok(self.update(|s| s.flows = Some(flows)))
    }

    pub fn open_id_connect_url(&self, url: impl Into<String>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "openIdConnectUrl")?;
        self.expect_type(SecuritySchemeType::OpenIdConnect, "openIdConnectUrl")?;
        let url = url.into();
        check_text(Self::NODE_TYPE, "openIdConnectUrl", &url)?;
        Ok(self.update(|s| s.open_id_connect_url = Some(url)))
    }

    /// Authorization server metadata URL (3.2)
    pub fn oauth2_metadata_url(&self, url: impl Into<String>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "oauth2MetadataUrl")?;
        self.expect_type(SecuritySchemeType::OAuth2, "oauth2MetadataUrl")?;
        let url = url.into();
        Ok(self.update(|s| s.oauth2_metadata_url = Some(url)))
    }

    /// 3.2
    pub fn deprecated(&self, deprecated: bool) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "deprecated")?;
        Ok(self.update(|s| s.deprecated = Some(deprecated)))
    }

    fn expect_type(&self, expected: SecuritySchemeType, field: &str) -> Result<()> {
        if self.scheme_type != expected {
            return Err(BuildError::because(format!(
                "SecurityScheme: {} only applies to {} schemes, this one is {}",
                field, expected, self.scheme_type
            )));
        }
        Ok(())
    }
}

impl BuildsModel for SecurityScheme {
    type Model = model::SecurityScheme;

    fn to_model(&self) -> Result<model::SecurityScheme> {
        let scheme = model::SecurityScheme {
            scheme_type: self.scheme_type,
            description: self.description.clone(),
            name: self.name.clone(),
            location: self.location.clone(),
            scheme: self.scheme.clone(),
            bearer_format: self.bearer_format.clone(),
            flows: assemble_opt(self.flows.as_ref())?,
            open_id_connect_url: self.open_id_connect_url.clone(),
            oauth2_metadata_url: self.oauth2_metadata_url.clone(),
            deprecated: self.deprecated,
            extensions: self.extensions.clone(),
        };
        Ok(scheme.checked()?)
    }
}

// =============================================================================
// OAuth
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct OAuthFlows {
    guard: FeatureGuard,
    implicit: Option<OAuthFlow>,
    password: Option<OAuthFlow>,
    client_credentials: Option<OAuthFlow>,
    authorization_code: Option<OAuthFlow>,
    device_authorization: Option<OAuthFlow>,
    extensions: Extensions,
}

builder_node!(OAuthFlows, "OAuthFlows", guarded);

impl OAuthFlows {
    pub fn with_profile(profile: &ProfileRef) -> Self {
        Self {
            guard: FeatureGuard::new(Arc::clone(profile)),
            implicit: None,
            password: None,
            client_credentials: None,
            authorization_code: None,
            device_authorization: None,
            extensions: Extensions::new(),
        }
    }

    pub fn create() -> Result<Self> {
        Ok(Self::with_profile(FeatureGuard::current()?.profile()))
    }

    pub fn implicit(&self, flow: OAuthFlow) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "implicit")?;
        Ok(self.update(|f| f.implicit = Some(flow)))
    }

    pub fn password(&self, flow: OAuthFlow) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "password")?;
        Ok(self.update(|f| f.password = Some(flow)))
    }

    pub fn client_credentials(&self, flow: OAuthFlow) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "clientCredentials")?;
        Ok(self.update(|f| f.client_credentials = Some(flow)))
    }

    pub fn authorization_code(&self, flow: OAuthFlow) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "authorizationCode")?;
        Ok(self.update(|f| f.authorization_code = Some(flow)))
    }

    /// RFC 8628 device flow (3.2)
    pub fn device_authorization(&self, flow: OAuthFlow) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "deviceAuthorization")?;
        Ok(self.update(|f| f.device_authorization = Some(flow)))
    }
}

impl BuildsModel for OAuthFlows {
    type Model = model::OAuthFlows;

    fn to_model(&self) -> Result<model::OAuthFlows> {
        let flows = model::OAuthFlows {
            implicit: assemble_opt(self.implicit.as_ref())?,
            password: assemble_opt(self.password.as_ref())?,
            client_credentials: assemble_opt(self.client_credentials.as_ref())?,
            authorization_code: assemble_opt(self.authorization_code.as_ref())?,
            device_authorization: assemble_opt(self.device_authorization.as_ref())?,
            extensions: self.extensions.clone(),
        };
        Ok(flows.checked()?)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct OAuthFlow {
    authorization_url: Option<String>,
    token_url: Option<String>,
    refresh_url: Option<String>,
    device_authorization_url: Option<String>,
    scopes: OrderedMap<String>,
    extensions: Extensions,
}

builder_node!(OAuthFlow, "OAuthFlow");

impl OAuthFlow {
    pub fn create() -> Self {
        Self::default()
    }

    pub fn authorization_url(&self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.update(|f| f.authorization_url = Some(url))
    }

    pub fn token_url(&self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.update(|f| f.token_url = Some(url))
    }

    pub fn refresh_url(&self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.update(|f| f.refresh_url = Some(url))
    }

    pub fn device_authorization_url(&self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.update(|f| f.device_authorization_url = Some(url))
    }

    pub fn scope(&self, name: impl Into<String>, description: impl Into<String>) -> Result<Self> {
        let name = name.into();
        check_key("OAuthFlow", "scopes", &name)?;
        let description = description.into();
        Ok(self.update(|f| {
            f.scopes.insert(name, description);
        }))
    }
}

impl BuildsModel for OAuthFlow {
    type Model = model::OAuthFlow;

    fn to_model(&self) -> Result<model::OAuthFlow> {
        let flow = model::OAuthFlow {
            authorization_url: self.authorization_url.clone(),
            token_url: self.token_url.clone(),
            refresh_url: self.refresh_url.clone(),
            device_authorization_url: self.device_authorization_url.clone(),
            scopes: self.scopes.clone(),
            extensions: self.extensions.clone(),
        };
        Ok(flow.checked()?)
    }
}

// =============================================================================
// SecurityRequirement
// =============================================================================

/// Scheme names mapped to the scopes an operation needs
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SecurityRequirement {
    requirements: OrderedMap<Vec<String>>,
}

impl Persistent for SecurityRequirement {}

impl SecurityRequirement {
    /// `{}`: makes security optional when listed alongside other requirements
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Requirement on one scheme
    pub fn of<S: Into<String>>(scheme: impl Into<String>, scopes: impl IntoIterator<Item = S>) -> Result<Self> {
        Self::anonymous().require(scheme, scopes)
    }

    pub fn require<S: Into<String>>(
        &self,
        scheme: impl Into<String>,
        scopes: impl IntoIterator<Item = S>,
    ) -> Result<Self> {
        let scheme = scheme.into();
        check_key("SecurityRequirement", "scheme", &scheme)?;
        let scopes: Vec<String> = scopes.into_iter().map(Into::into).collect();
        Ok(self.update(|r| {
            r.requirements.insert(scheme, scopes);
        }))
    }
}

impl BuildsModel for SecurityRequirement {
    type Model = model::SecurityRequirement;

    fn to_model(&self) -> Result<model::SecurityRequirement> {
        let requirement = model::SecurityRequirement {
            requirements: self.requirements.clone(),
        };
        Ok(requirement.checked()?)
    }
}
