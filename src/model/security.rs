//! Security schemes, OAuth flows and security requirements

use std::fmt;
use std::str::FromStr;

use super::{require_text, Extensions, ModelError, OrderedMap};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecuritySchemeType {
    ApiKey,
    Http,
    MutualTls,
    OAuth2,
    OpenIdConnect,
}

impl SecuritySchemeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ApiKey => "apiKey",
            Self::Http => "http",
            Self::MutualTls => "mutualTLS",
            Self::OAuth2 => "oauth2",
            Self::OpenIdConnect => "openIdConnect",
        }
    }
}

impl fmt::Display for SecuritySchemeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SecuritySchemeType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "apiKey" => Ok(Self::ApiKey),
            "http" => Ok(Self::Http),
            "mutualTLS" => Ok(Self::MutualTls),
            "oauth2" => Ok(Self::OAuth2),
            "openIdConnect" => Ok(Self::OpenIdConnect),
            other => Err(ModelError::UnknownVariant {
                kind: "SecuritySchemeType".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

/// Where an apiKey credential travels
pub const API_KEY_LOCATIONS: [&str; 3] = ["header", "query", "cookie"];

#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct SecurityScheme {
    pub scheme_type: SecuritySchemeType,
    pub description: Option<String>,
    pub name: Option<String>,
    pub location: Option<String>,
    pub scheme: Option<String>,
    pub bearer_format: Option<String>,
    pub flows: Option<OAuthFlows>,
    pub open_id_connect_url: Option<String>,
    pub oauth2_metadata_url: Option<String>,
    pub deprecated: Option<bool>,
    pub extensions: Extensions,
}

impl SecurityScheme {
    pub(crate) fn checked(self) -> Result<Self, ModelError> {
        const NODE: &str = "SecurityScheme";
        match self.scheme_type {
            SecuritySchemeType::ApiKey => {
                require_text(NODE, "name", self.name.as_deref().unwrap_or_default())?;
                let location = self.location.as_deref().unwrap_or_default();
                require_text(NODE, "in", location)?;
                if !API_KEY_LOCATIONS.contains(&location) {
                    return Err(ModelError::invalid(
                        NODE,
                        format!("apiKey 'in' must be one of header, query, cookie; got '{}'", location),
                    ));
                }
            }
            SecuritySchemeType::Http => {
                require_text(NODE, "scheme", self.scheme.as_deref().unwrap_or_default())?;
                if self.bearer_format.is_some()
                    && !self.scheme.as_deref().is_some_and(|s| s.eq_ignore_ascii_case("bearer"))
                {
                    return Err(ModelError::invalid(NODE, "bearerFormat only applies to the bearer scheme"));
                }
            }
            SecuritySchemeType::OAuth2 => {
                if self.flows.is_none() {
                    return Err(ModelError::missing(NODE, "flows"));
                }
            }
            SecuritySchemeType::OpenIdConnect => {
                require_text(
                    NODE,
                    "openIdConnectUrl",
                    self.open_id_connect_url.as_deref().unwrap_or_default(),
                )?;
            }
            SecuritySchemeType::MutualTls => {}
        }
        Ok(self)
    }
}

// =============================================================================
// OAuth
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
#[non_exhaustive]
pub struct OAuthFlow {
    pub authorization_url: Option<String>,
    pub token_url: Option<String>,
    pub refresh_url: Option<String>,
    pub device_authorization_url: Option<String>,
    /// scope name to description; may be empty
    pub scopes: OrderedMap<String>,
    pub extensions: Extensions,
}

impl OAuthFlow {
    pub(crate) fn checked(self) -> Result<Self, ModelError> {
        Ok(self)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
#[non_exhaustive]
pub struct OAuthFlows {
    pub implicit: Option<OAuthFlow>,
    pub password: Option<OAuthFlow>,
    pub client_credentials: Option<OAuthFlow>,
    pub authorization_code: Option<OAuthFlow>,
    pub device_authorization: Option<OAuthFlow>,
    pub extensions: Extensions,
}

impl OAuthFlows {
    pub(crate) fn checked(self) -> Result<Self, ModelError> {
        fn need(flow: &Option<OAuthFlow>, name: &str, urls: &[&str]) -> Result<(), ModelError> {
            let Some(flow) = flow else { return Ok(()) };
            for url in urls {
                let value = match *url {
                    "authorizationUrl" => &flow.authorization_url,
                    "tokenUrl" => &flow.token_url,
                    _ => &flow.device_authorization_url,
                };
                if value.as_deref().map_or(true, str::is_empty) {
                    return Err(ModelError::missing(&format!("OAuthFlows.{}", name), url));
                }
            }
            Ok(())
        }

        need(&self.implicit, "implicit", &["authorizationUrl"])?;
        need(&self.password, "password", &["tokenUrl"])?;
        need(&self.client_credentials, "clientCredentials", &["tokenUrl"])?;
        need(&self.authorization_code, "authorizationCode", &["authorizationUrl", "tokenUrl"])?;
        need(
            &self.device_authorization,
            "deviceAuthorization",
            &["deviceAuthorizationUrl", "tokenUrl"],
        )?;
        Ok(self)
    }
}

/// Scheme name to required scopes
#[derive(Debug, Clone, PartialEq, Default)]
#[non_exhaustive]
pub struct SecurityRequirement {
    pub requirements: OrderedMap<Vec<String>>,
}

impl SecurityRequirement {
    pub(crate) fn checked(self) -> Result<Self, ModelError> {
        if self.requirements.keys().any(str::is_empty) {
            return Err(ModelError::invalid("SecurityRequirement", "scheme names must not be empty"));
        }
        Ok(self)
    }

    /// `{}`: the anonymous requirement that makes security optional
    pub fn is_anonymous(&self) -> bool {
        self.requirements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheme(scheme_type: SecuritySchemeType) -> SecurityScheme {
        SecurityScheme {
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

    #[test]
    fn test_api_key_location_checked() {
        let mut s = scheme(SecuritySchemeType::ApiKey);
        s.name = Some("X-Api-Key".into());
        s.location = Some("body".into());
        assert!(s.clone().checked().is_err());

        s.location = Some("header".into());
        assert!(s.checked().is_ok());
    }

    #[test]
    fn test_oauth2_requires_flows() {
        let err = scheme(SecuritySchemeType::OAuth2).checked().unwrap_err();
        assert_eq!(err, ModelError::missing("SecurityScheme", "flows"));
    }

    #[test]
    fn test_authorization_code_needs_both_urls() {
        let flows = OAuthFlows {
            authorization_code: Some(OAuthFlow {
                authorization_url: Some("https://auth".into()),
                ..OAuthFlow::default()
            }),
            ..OAuthFlows::default()
        };
        let err = flows.checked().unwrap_err();
        assert!(err.to_string().contains("tokenUrl"));
    }
}
