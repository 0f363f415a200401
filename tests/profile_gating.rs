//! Key gating under a custom dialect
//!
//! The trimmed fixture withholds keys that both built-in dialects accept.
//! Builders bound to it must refuse those keys, and accept them again once
//! bound to a built-in profile.

use std::path::Path;

use oas_fluent::builder::{BuildsModel, Info, OpenApi, Operation, Parameter, Response, Tag};
use oas_fluent::model::ParameterLocation;
use oas_fluent::profile::{self, ProfileContext, ProfileRef, ProfileRegistry};
use oas_fluent::{BuildError, Extensible, Result};

fn trimmed() -> ProfileRef {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/oas-3.0-trimmed.toml");
    ProfileRegistry::new().load_file(&path).unwrap()
}

fn assert_refused<T: std::fmt::Debug>(result: Result<T>, expected: &str, profile_id: &str) {
    match result {
        Err(BuildError::FeatureNotSupported { feature, profile }) => {
            assert_eq!(feature, expected);
            assert_eq!(profile, profile_id);
        }
        other => panic!("{}: expected FeatureNotSupported, got {:?}", expected, other),
    }
}

fn listed(profile: &ProfileRef) -> Operation {
    Operation::with_profile(profile)
        .operation_id("listPets")
        .unwrap()
        .response(Response::new(profile, "200").unwrap().description("OK").unwrap())
        .unwrap()
}

// =============================================================================
// Common keys withheld
// =============================================================================

#[test]
fn test_info_summary_refused() {
    let p = trimmed();
    assert_refused(Info::with_profile(&p).summary("Pet store"), "Info.summary", "3.0");
    assert!(Info::with_profile(&p).description("Pet store").is_ok());
}

#[test]
fn test_operation_callbacks_refused() {
    let p = trimmed();
    assert_refused(
        listed(&p).callback("onAdopted", "#/components/callbacks/Adopted"),
        "Operation.callbacks",
        "3.0",
    );
    assert!(listed(&p).summary("List pets").is_ok());
}

#[test]
fn test_parameter_style_refused() {
    let p = trimmed();
    let param = Parameter::new(&p, "filter", ParameterLocation::Query);
    assert_refused(param.style("form"), "Parameter.style", "3.0");
    assert!(param.explode(true).is_ok());
}

#[test]
fn test_document_webhooks_refused() {
    let p = trimmed();
    assert_refused(
        OpenApi::with_profile(&p).webhook("newPet", "#/components/pathItems/NewPet"),
        "OpenApiDocument.webhooks",
        "3.0",
    );
}

#[test]
fn test_unknown_node_fails_closed() {
    let p = trimmed();
    assert_refused(Tag::new(&p, "pets").description("Pets"), "Tag.description", "3.0");
    assert_refused(Tag::new(&p, "pets").extension("x-order", 1), "Tag.x-order", "3.0");
}

#[test]
fn test_ambient_trimmed_profile_refuses() {
    let result = ProfileContext::scoped(trimmed(), || Info::create()?.summary("Pet store"));
    assert_refused(result, "Info.summary", "3.0");
}

// =============================================================================
// Same calls under built-in dialects
// =============================================================================

#[test]
fn test_builtin_profiles_accept_common_keys() {
    for id in ["3.1", "3.2"] {
        let p = profile::builtin(id).unwrap();
        assert!(Info::with_profile(&p).summary("Pet store").is_ok(), "{}", id);
        assert!(Parameter::new(&p, "filter", ParameterLocation::Query).style("form").is_ok(), "{}", id);
        assert!(Tag::new(&p, "pets").description("Pets").is_ok(), "{}", id);

        let op = listed(&p)
            .callback("onAdopted", "#/components/callbacks/Adopted")
            .unwrap();
        assert!(op.to_model().unwrap().callbacks.is_some(), "{}", id);

        assert!(
            OpenApi::with_profile(&p)
                .webhook("newPet", "#/components/pathItems/NewPet")
                .is_ok(),
            "{}",
            id
        );
    }
}

#[test]
fn test_trimmed_profile_still_builds_operations() {
    let p = trimmed();
    let model = listed(&p).tag("pets").unwrap().to_model().unwrap();
    assert_eq!(model.operation_id.as_deref(), Some("listPets"));
}
