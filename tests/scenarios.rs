//! End-to-end builder scenarios
//!
//! Builds small documents through the public API and checks the assembled
//! canonical nodes.

use std::fmt::Debug;
use std::path::Path;

use oas_fluent::builder::{
    BuildsModel, Components, Example, Header, Info, MediaType, OAuthFlow, OAuthFlows, OpenApi,
    Operation, Parameter, PathItem, Paths, RequestBody, Response, Responses, Schema, Section, Tag,
};
use oas_fluent::model::ParameterLocation;
use oas_fluent::profile::{self, FeatureGuard, ProfileContext, ProfileRegistry};
use oas_fluent::{BuildError, Extensible, Result};

fn fixtures_path() -> &'static Path {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").leak()
}

/// Minimal node type gated by the fixture profiles
#[derive(Debug, Clone)]
struct Widget {
    guard: FeatureGuard,
    foo: Option<String>,
}

impl Widget {
    fn create() -> Result<Self> {
        Ok(Self {
            guard: FeatureGuard::current()?,
            foo: None,
        })
    }

    fn foo(&self, foo: &str) -> Result<Self> {
        self.guard.assert_allowed_key("Widget", "foo")?;
        let mut next = self.clone();
        next.foo = Some(foo.to_string());
        Ok(next)
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_request_body_with_json_payload() {
    let v31 = profile::builtin("3.1").unwrap();
    let body = RequestBody::with_profile(&v31)
        .description("payload")
        .unwrap()
        .required(true)
        .unwrap()
        .content([MediaType::new(&v31, "application/json")
            .schema(Schema::object())
            .unwrap()])
        .unwrap();

    let model = body.to_model().unwrap();
    assert_eq!(model.description.as_deref(), Some("payload"));
    assert!(model.required);
    assert_eq!(model.content.len(), 1);
    assert_eq!(model.content.keys().collect::<Vec<_>>(), vec!["application/json"]);
}

#[test]
fn test_responses_with_default_reference() {
    let v31 = profile::builtin("3.1").unwrap();
    let responses = Responses::of([
        Response::new(&v31, "200").unwrap().description("OK").unwrap(),
        Response::new(&v31, "404").unwrap().description("Not found").unwrap(),
    ])
    .put("default", "#/components/responses/Error")
    .unwrap();

    let model = responses.to_model().unwrap();
    assert_eq!(model.len(), 3);
    assert!(model.get("200").unwrap().as_item().is_some());
    assert!(model.get("404").unwrap().as_item().is_some());

    let fallback = model.default_response().unwrap();
    assert_eq!(
        fallback.as_reference().unwrap().token(),
        "#/components/responses/Error"
    );
}

#[test]
fn test_response_without_content_or_headers() {
    let v31 = profile::builtin("3.1").unwrap();
    let model = Response::new(&v31, "204")
        .unwrap()
        .description("No Content")
        .unwrap()
        .to_model()
        .unwrap();
    assert!(model.content.is_none());
    assert!(model.headers.is_none());
    assert!(model.links.is_none());
}

#[test]
fn test_inline_value_after_external_value() {
    let example = Example::create()
        .external_value("https://example.com/pet.json")
        .unwrap();
    match example.value(serde_json::json!({"name": "Rex"})) {
        Err(BuildError::InvalidCombination(msg)) => assert!(msg.contains("externalValue")),
        other => panic!("expected InvalidCombination, got {:?}", other),
    }
}

#[test]
fn test_custom_profile_switch() {
    let mut registry = ProfileRegistry::new();
    registry.load_dir(fixtures_path()).unwrap();
    let strict = registry.get("widget-strict").unwrap();
    let loose = registry.get("widget-loose").unwrap();

    ProfileContext::push(strict);
    let result = Widget::create().unwrap().foo("bar");
    ProfileContext::pop().unwrap();
    match result {
        Err(BuildError::FeatureNotSupported { feature, profile }) => {
            assert_eq!(feature, "Widget.foo");
            assert_eq!(profile, "widget-strict");
        }
        other => panic!("expected FeatureNotSupported, got {:?}", other),
    }

    ProfileContext::push(loose);
    let widget = Widget::create().unwrap().foo("bar").unwrap();
    ProfileContext::pop().unwrap();
    assert_eq!(widget.foo.as_deref(), Some("bar"));
    assert_eq!(widget.guard.profile_id(), "widget-loose");
}

// =============================================================================
// Properties
// =============================================================================

/// (label, expected to succeed, mutator)
type Mutator<'a, B> = (&'static str, bool, Box<dyn Fn(&B) -> Result<B> + 'a>);

fn mutator<'a, B>(
    label: &'static str,
    succeeds: bool,
    f: impl Fn(&B) -> Result<B> + 'a,
) -> Mutator<'a, B> {
    let f: Box<dyn Fn(&B) -> Result<B> + 'a> = Box::new(f);
    (label, succeeds, f)
}

fn assert_receiver_unchanged<B: Clone + PartialEq + Debug>(base: &B, mutators: Vec<Mutator<'_, B>>) {
    for (label, succeeds, mutate) in mutators {
        let before = base.clone();
        let result = mutate(base);
        assert_eq!(*base, before, "{} changed its receiver", label);
        match result {
            Ok(next) => {
                assert!(succeeds, "{} was expected to fail", label);
                assert_ne!(next, before, "{} returned the receiver unchanged", label);
            }
            Err(err) => assert!(!succeeds, "{} failed: {}", label, err),
        }
    }
}

#[test]
fn test_mutators_leave_receiver_unchanged() {
    let v31 = profile::builtin("3.1").unwrap();

    let tag = Tag::new(&v31, "pets");
    assert_receiver_unchanged(
        &tag,
        vec![
            mutator("Tag.description", true, |t: &Tag| t.description("All about pets")),
            mutator("Tag.summary", false, |t: &Tag| t.summary("Pets")),
            mutator("Tag.x-order", true, |t: &Tag| t.extension("x-order", 1)),
            mutator("Tag.order", false, |t: &Tag| t.extension("order", 1)),
        ],
    );

    let info = Info::with_profile(&v31).title("Pets").unwrap();
    assert_receiver_unchanged(
        &info,
        vec![
            mutator("Info.summary", true, |i: &Info| i.summary("Pet store")),
            mutator("Info.version", true, |i: &Info| i.version("1.0.0")),
            mutator("Info.title empty", false, |i: &Info| i.title("")),
        ],
    );

    let operation = Operation::with_profile(&v31).operation_id("listPets").unwrap();
    assert_receiver_unchanged(
        &operation,
        vec![
            mutator("Operation.summary", true, |o: &Operation| o.summary("List pets")),
            mutator("Operation.responses", true, |o: &Operation| {
                o.response(Response::new(&v31, "200")?)
            }),
            mutator("Operation.callbacks", true, |o: &Operation| {
                o.callback("onAdopted", "#/components/callbacks/Adopted")
            }),
            mutator("Operation.requestBody empty", false, |o: &Operation| o.request_body("")),
            mutator("Operation.tags empty", false, |o: &Operation| o.tag("")),
        ],
    );

    let param = Parameter::new(&v31, "petId", ParameterLocation::Path);
    assert_receiver_unchanged(
        &param,
        vec![
            mutator("Parameter.description", true, |p: &Parameter| p.description("Pet id")),
            mutator("Parameter.schema", true, |p: &Parameter| p.schema(Schema::integer())),
            mutator("Parameter.required false", false, |p: &Parameter| p.required(false)),
            mutator("Parameter.allowEmptyValue", false, |p: &Parameter| p.allow_empty_value(true)),
        ],
    );

    let components = Components::with_profile(&v31).schema("Pet", Schema::object()).unwrap();
    assert_receiver_unchanged(
        &components,
        vec![
            mutator("Components.schemas", true, |c: &Components| {
                c.schema("Owner", Schema::object())
            }),
            mutator("Components.schemas wrong type", false, |c: &Components| {
                c.put(Section::Schemas, "Bad", Header::create())
            }),
            mutator("Components.mediaTypes", false, |c: &Components| {
                c.media_type("Json", MediaType::new(&v31, "application/json"))
            }),
        ],
    );

    let flow = OAuthFlow::create().token_url("https://auth.example.com/token");
    assert_receiver_unchanged(
        &OAuthFlows::with_profile(&v31),
        vec![
            mutator("OAuthFlows.password", true, |f: &OAuthFlows| f.password(flow.clone())),
            mutator("OAuthFlows.deviceAuthorization", false, |f: &OAuthFlows| {
                f.device_authorization(flow.clone())
            }),
        ],
    );

    let doc = OpenApi::with_profile(&v31).tag(Tag::new(&v31, "pets")).unwrap();
    assert_receiver_unchanged(
        &doc,
        vec![
            mutator("OpenApi.info", true, |d: &OpenApi| d.info(info.clone())),
            mutator("OpenApi.tags duplicate", false, |d: &OpenApi| d.tag(Tag::new(&v31, "pets"))),
            mutator("OpenApi.self", false, |d: &OpenApi| d.self_uri("https://example.com/api")),
        ],
    );

    let schema = Schema::object()
        .property("name", Schema::string())
        .unwrap()
        .read_only(true)
        .unwrap();
    assert_receiver_unchanged(
        &schema,
        vec![
            mutator("Schema.title", true, |s: &Schema| Ok(s.title("Pet"))),
            mutator("Schema.required unknown", false, |s: &Schema| s.required(["age"])),
            mutator("Schema.writeOnly", false, |s: &Schema| s.write_only(true)),
        ],
    );

    let example = Example::create()
        .external_value("https://example.com/pet.json")
        .unwrap();
    assert_receiver_unchanged(
        &example,
        vec![
            mutator("Example.summary", true, |e: &Example| Ok(e.summary("A pet"))),
            mutator("Example.value", false, |e: &Example| {
                e.value(serde_json::json!({"name": "Rex"}))
            }),
        ],
    );

    let responses = Responses::create().add(Response::new(&v31, "200").unwrap());
    assert_receiver_unchanged(
        &responses,
        vec![
            mutator("Responses.default", true, |r: &Responses| {
                r.default_response("#/components/responses/Error")
            }),
            mutator("Responses.2xx", false, |r: &Responses| r.reference("2xx", "#/x")),
        ],
    );
}

#[test]
fn test_assembly_is_idempotent() {
    let v31 = profile::builtin("3.1").unwrap();
    let doc = OpenApi::oas31()
        .unwrap()
        .info(Info::with_profile(&v31).title("Pets").unwrap().version("1.0.0").unwrap())
        .unwrap()
        .paths(
            Paths::create()
                .get(
                    "/pets",
                    Operation::with_profile(&v31)
                        .operation_id("listPets")
                        .unwrap()
                        .response(Response::new(&v31, "200").unwrap().description("OK").unwrap())
                        .unwrap(),
                )
                .unwrap(),
        )
        .unwrap()
        .components(
            Components::with_profile(&v31)
                .schema("Pet", Schema::object().property("name", Schema::string()).unwrap())
                .unwrap(),
        )
        .unwrap();

    assert_eq!(doc.to_model().unwrap(), doc.to_model().unwrap());
}

#[test]
fn test_collections_keep_insertion_order() {
    let v31 = profile::builtin("3.1").unwrap();
    let model = Components::with_profile(&v31)
        .schema("Zebra", Schema::object())
        .unwrap()
        .schema("Aardvark", Schema::object())
        .unwrap()
        .schema("Mole", Schema::object())
        .unwrap()
        .to_model()
        .unwrap();
    let schemas = model.schemas.unwrap();
    assert_eq!(schemas.keys().collect::<Vec<_>>(), vec!["Zebra", "Aardvark", "Mole"]);
    assert!(model.headers.is_none());
}

#[test]
fn test_gating_differs_between_builtin_profiles() {
    let v31 = profile::builtin("3.1").unwrap();
    let v32 = profile::builtin("3.2").unwrap();

    assert!(Tag::new(&v32, "pets").summary("Pets").is_ok());
    match Tag::new(&v31, "pets").summary("Pets") {
        Err(BuildError::FeatureNotSupported { feature, profile }) => {
            assert_eq!(feature, "Tag.summary");
            assert_eq!(profile, "3.1");
        }
        other => panic!("expected FeatureNotSupported, got {:?}", other),
    }

    let op = Operation::with_profile(&v32)
        .response(Response::new(&v32, "200").unwrap())
        .unwrap();
    assert!(PathItem::with_profile(&v32).query(op.clone()).is_ok());
    assert!(matches!(
        PathItem::with_profile(&v31).query(op),
        Err(BuildError::FeatureNotSupported { .. })
    ));
}

#[test]
fn test_reference_shorthand() {
    let v31 = profile::builtin("3.1").unwrap();
    let op = Operation::with_profile(&v31)
        .request_body("#/components/requestBodies/NewPet")
        .unwrap()
        .parameter("#/components/parameters/Limit")
        .unwrap()
        .response(Response::new(&v31, "200").unwrap().description("OK").unwrap())
        .unwrap();

    let model = op.to_model().unwrap();
    let body = model.request_body.unwrap();
    assert_eq!(body.as_reference().unwrap().token(), "#/components/requestBodies/NewPet");
    let params = model.parameters.unwrap();
    assert_eq!(
        params.get(0).unwrap().as_reference().unwrap().token(),
        "#/components/parameters/Limit"
    );

    assert!(matches!(
        Operation::with_profile(&v31).request_body(""),
        Err(BuildError::InvalidCombination(_))
    ));
    assert!(matches!(
        Header::of(""),
        Err(BuildError::InvalidCombination(_))
    ));
}

#[test]
fn test_scoped_profile_drives_ambient_factories() {
    let v32 = profile::builtin("3.2").unwrap();
    let doc = ProfileContext::scoped(v32, || -> Result<_> {
        OpenApi::create()?
            .openapi("3.2.0")?
            .info(Info::of("Pets", "2.0.0")?)?
            .tag(Tag::of("pets")?.summary("Pets")?)?
            .paths(Paths::create().get("/pets", Operation::create()?.response(Response::ok()?)?)?)?
            .to_model()
    })
    .unwrap();

    assert_eq!(doc.openapi, "3.2.0");
    assert_eq!(doc.tags.unwrap().get(0).unwrap().summary.as_deref(), Some("Pets"));
    assert_eq!(ProfileContext::depth(), 0);
}
