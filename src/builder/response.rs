//! Response and Responses builders
//!
//! A response knows the status it answers (`200`, `4XX`, `default`), so
//! `Responses::of([...])` can key each one without repeating the code.

use std::sync::{Arc, OnceLock};

use regex::Regex;

use super::assembler::assemble_keyed;
use super::media::by_mime;
use super::{check_key, keyed, ref_or, BuildsModel, Extensible, Header, Link, MediaType, Persistent, RefOr};
use crate::error::{BuildError, Result};
use crate::model::{self, CollectionKind, Extensions, OrderedMap};
use crate::profile::{FeatureGuard, ProfileRef};

/// Key of the fallback response
pub const DEFAULT_STATUS: &str = "default";

fn status_pattern() -> &'static Regex {
    static STATUS: OnceLock<Regex> = OnceLock::new();
    STATUS.get_or_init(|| Regex::new(r"^(?:[1-5]\d{2}|[1-5]XX)$").expect("status pattern is valid"))
}

/// `default`, a concrete code (`404`) or a range (`4XX`)
pub fn is_valid_status(status: &str) -> bool {
    status == DEFAULT_STATUS || status_pattern().is_match(status)
}

fn check_status(status: &str) -> Result<()> {
    if !is_valid_status(status) {
        return Err(BuildError::because(format!(
            "Responses: invalid status '{}'; expected 'default', a code like '404' or a range like '4XX'",
            status
        )));
    }
    Ok(())
}

// =============================================================================
// Response
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    guard: FeatureGuard,
    status: String,
    summary: Option<String>,
    description: Option<String>,
    headers: OrderedMap<RefOr<Header>>,
    content: OrderedMap<MediaType>,
    links: OrderedMap<RefOr<Link>>,
    extensions: Extensions,
}

builder_node!(Response, "Response", guarded);

/// Factories for common statuses, each with its reason phrase as description
macro_rules! status_factories {
    ($($fn_name:ident => $code:literal, $reason:literal;)*) => {
        impl Response {
            $(
                #[doc = concat!("`", stringify!($code), " ", $reason, "`")]
                pub fn $fn_name() -> Result<Self> {
                    Self::code($code)?.description($reason)
                }
            )*
        }
    };
}

status_factories! {
    ok => 200, "OK";
    created => 201, "Created";
    accepted => 202, "Accepted";
    no_content => 204, "No Content";
    moved_permanently => 301, "Moved Permanently";
    found => 302, "Found";
    not_modified => 304, "Not Modified";
    bad_request => 400, "Bad Request";
    unauthorized => 401, "Unauthorized";
    payment_required => 402, "Payment Required";
    forbidden => 403, "Forbidden";
    not_found => 404, "Not Found";
    method_not_allowed => 405, "Method Not Allowed";
    conflict => 409, "Conflict";
    gone => 410, "Gone";
    unsupported_media_type => 415, "Unsupported Media Type";
    unprocessable_entity => 422, "Unprocessable Entity";
    too_many_requests => 429, "Too Many Requests";
    internal_server_error => 500, "Internal Server Error";
    not_implemented => 501, "Not Implemented";
    bad_gateway => 502, "Bad Gateway";
    service_unavailable => 503, "Service Unavailable";
    gateway_timeout => 504, "Gateway Timeout";
}

impl Response {
    /// Response for `status` under an explicit profile
    pub fn new(profile: &ProfileRef, status: impl Into<String>) -> Result<Self> {
        let status = status.into();
        check_status(&status)?;
        Ok(Self {
            guard: FeatureGuard::new(Arc::clone(profile)),
            status,
            summary: None,
            description: None,
            headers: OrderedMap::new(),
            content: OrderedMap::new(),
            links: OrderedMap::new(),
            extensions: Extensions::new(),
        })
    }

    /// Response for an HTTP status code (100-599) under the ambient profile
    pub fn code(code: u16) -> Result<Self> {
        if !(100..=599).contains(&code) {
            return Err(BuildError::invalid(format!("Response: invalid HTTP status {}", code)));
        }
        Self::new(FeatureGuard::current()?.profile(), code.to_string())
    }

    /// Status range such as `2XX`, under the ambient profile
    pub fn range(range: impl Into<String>) -> Result<Self> {
        Self::new(FeatureGuard::current()?.profile(), range)
    }

    /// The `default` response under the ambient profile
    pub fn fallback() -> Result<Self> {
        Self::new(FeatureGuard::current()?.profile(), DEFAULT_STATUS)
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// Short summary (3.2)
    pub fn summary(&self, summary: impl Into<String>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "summary")?;
        let summary = summary.into();
        Ok(self.update(|r| r.summary = Some(summary)))
    }

    pub fn description(&self, description: impl Into<String>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "description")?;
        let description = description.into();
        Ok(self.update(|r| r.description = Some(description)))
    }

    pub fn header(&self, name: impl Into<String>, header: impl Into<RefOr<Header>>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "headers")?;
        let name = name.into();
        check_key(Self::NODE_TYPE, "headers", &name)?;
        let header = ref_or(header)?;
        Ok(self.update(|r| {
            r.headers.insert(name, header);
        }))
    }

    /// Replace all headers
    pub fn headers<K, V>(&self, entries: impl IntoIterator<Item = (K, V)>) -> Result<Self>
    where
        K: Into<String>,
        V: Into<RefOr<Header>>,
    {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "headers")?;
        let headers = keyed(Self::NODE_TYPE, "headers", entries)?;
        Ok(self.update(|r| r.headers = headers))
    }

    /// Add media types keyed by their MIME
    pub fn content(&self, media: impl IntoIterator<Item = MediaType>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "content")?;
        self.try_update(|r| by_mime(Self::NODE_TYPE, &mut r.content, media))
    }

    pub fn link(&self, name: impl Into<String>, link: impl Into<RefOr<Link>>) -> Result<Self> {
        self.guard.assert_allowed_key(Self::NODE_TYPE, "links")?;
        let name = name.into();
        check_key(Self::NODE_TYPE, "links", &name)?;
        let link = ref_or(link)?;
        Ok(self.update(|r| {
            r.links.insert(name, link);
        }))
    }
}

impl BuildsModel for Response {
    type Model = model::Response;

    fn to_model(&self) -> Result<model::Response> {
        let response = model::Response {
            summary: self.summary.clone(),
            description: self.description.clone(),
            headers: assemble_keyed(CollectionKind::Headers, &self.headers)?,
            content: assemble_keyed(CollectionKind::MediaTypes, &self.content)?,
            links: assemble_keyed(CollectionKind::Links, &self.links)?,
            extensions: self.extensions.clone(),
        };
        Ok(response.checked()?)
    }
}

// =============================================================================
// Responses
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Responses {
    entries: OrderedMap<RefOr<Response>>,
    extensions: Extensions,
}

builder_node!(Responses, "Responses");

impl Responses {
    pub fn create() -> Self {
        Self::default()
    }

    /// Collect responses keyed by their own status
    pub fn of(responses: impl IntoIterator<Item = Response>) -> Self {
        let mut entries = OrderedMap::new();
        for response in responses {
            entries.insert(response.status.clone(), RefOr::Builder(response));
        }
        Self {
            entries,
            extensions: Extensions::new(),
        }
    }

    /// Add a response under its own status, replacing any previous entry
    pub fn add(&self, response: Response) -> Self {
        self.update(|r| {
            r.entries.insert(response.status.clone(), RefOr::Builder(response));
        })
    }

    /// Put a response or `$ref` under an explicit status
    pub fn put(&self, status: impl Into<String>, response: impl Into<RefOr<Response>>) -> Result<Self> {
        let status = status.into();
        check_status(&status)?;
        let response = ref_or(response)?;
        Ok(self.update(|r| {
            r.entries.insert(status, response);
        }))
    }

    /// Put a `$ref` under a status
    pub fn reference(&self, status: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        self.put(status, RefOr::<Response>::from(token.into()))
    }

    /// Set the `default` entry
    pub fn default_response(&self, response: impl Into<RefOr<Response>>) -> Result<Self> {
        self.put(DEFAULT_STATUS, response)
    }

    pub fn remove(&self, status: &str) -> Self {
        self.update(|r| {
            r.entries.remove(status);
        })
    }

    pub fn has(&self, status: &str) -> bool {
        self.entries.contains_key(status)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl BuildsModel for Responses {
    type Model = model::Responses;

    fn to_model(&self) -> Result<model::Responses> {
        let responses = model::Responses {
            entries: assemble_keyed(CollectionKind::Responses, &self.entries)?,
            extensions: self.extensions.clone(),
        };
        Ok(responses.checked()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{self, ProfileContext};

    #[test]
    fn test_status_validation() {
        for good in ["200", "404", "2XX", "5XX", "default"] {
            assert!(is_valid_status(good), "{}", good);
        }
        for bad in ["600", "20", "2xx", "6XX", "", "ok"] {
            assert!(!is_valid_status(bad), "{}", bad);
        }
    }

    #[test]
    fn test_code_out_of_range() {
        let v31 = profile::builtin("3.1").unwrap();
        let err = ProfileContext::scoped(v31, || Response::code(99)).unwrap_err();
        assert!(matches!(err, BuildError::InvalidArgument(_)));
    }

    #[test]
    fn test_sugar_sets_reason_phrase() {
        let v31 = profile::builtin("3.1").unwrap();
        let response = ProfileContext::scoped(v31, Response::not_found).unwrap();
        assert_eq!(response.status(), "404");
        assert_eq!(response.to_model().unwrap().description.as_deref(), Some("Not Found"));
    }

    #[test]
    fn test_three_entries_with_default_ref() {
        let v31 = profile::builtin("3.1").unwrap();
        let responses = Responses::of([
            Response::new(&v31, "200").unwrap().description("OK").unwrap(),
            Response::new(&v31, "404").unwrap().description("Not Found").unwrap(),
        ])
        .default_response("#/components/responses/Error")
        .unwrap();

        let model = responses.to_model().unwrap();
        assert_eq!(model.len(), 3);
        assert!(model.get("200").unwrap().as_item().is_some());
        assert!(model.default_response().unwrap().is_ref());
    }

    #[test]
    fn test_bad_status_key_rejected() {
        let err = Responses::create().reference("2xx", "#/x").unwrap_err();
        assert!(matches!(err, BuildError::InvalidCombination(_)));
    }

    #[test]
    fn test_remove_and_has() {
        let v31 = profile::builtin("3.1").unwrap();
        let responses = Responses::create().add(Response::new(&v31, "204").unwrap());
        assert!(responses.has("204"));
        let removed = responses.remove("204");
        assert!(!removed.has("204"));
        assert!(responses.has("204"));
        assert!(removed.to_model().unwrap().is_empty());
    }

    #[test]
    fn test_summary_gated() {
        let v31 = profile::builtin("3.1").unwrap();
        let v32 = profile::builtin("3.2").unwrap();
        assert!(Response::new(&v31, "200").unwrap().summary("ok").is_err());
        assert!(Response::new(&v32, "200").unwrap().summary("ok").is_ok());
    }
}
