//! Example value exclusion grid
//!
//! An example holds at most one of dataValue, serializedValue,
//! externalValue and value. Every ordered pair of distinct forms fails;
//! setting the same form again replaces it.

use oas_fluent::builder::{BuildsModel, Example};
use oas_fluent::{BuildError, Result};
use serde_json::json;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Form {
    Data,
    Serialized,
    External,
    Inline,
}

const FORMS: [Form; 4] = [Form::Data, Form::Serialized, Form::External, Form::Inline];

fn set(example: &Example, form: Form) -> Result<Example> {
    match form {
        Form::Data => example.data_value(json!({"id": 1})),
        Form::Serialized => example.serialized_value("id=1"),
        Form::External => example.external_value("https://example.com/pet.json"),
        Form::Inline => example.value(json!({"id": 1})),
    }
}

#[test]
fn test_every_distinct_pair_rejected() {
    let mut checked = 0;
    for first in FORMS {
        let held = set(&Example::create(), first).unwrap();
        for second in FORMS.into_iter().filter(|f| *f != first) {
            match set(&held, second) {
                Err(BuildError::InvalidCombination(_)) => checked += 1,
                other => panic!("{:?} then {:?}: expected InvalidCombination, got {:?}", first, second, other),
            }
        }
    }
    assert_eq!(checked, 12);
}

#[test]
fn test_same_form_reset_succeeds() {
    for form in FORMS {
        let once = set(&Example::create(), form).unwrap();
        let twice = set(&once, form).unwrap();
        assert_eq!(once, twice);
        assert!(twice.to_model().is_ok());
    }
}

#[test]
fn test_checks_run_in_declared_order() {
    // value is checked against externalValue before the generic fallback
    let external = Example::create()
        .external_value("https://example.com/pet.json")
        .unwrap();
    let err = external.value(json!(1)).unwrap_err();
    assert!(err.to_string().contains("externalValue"));

    let serialized = Example::create().serialized_value("id=1").unwrap();
    let err = serialized.external_value("https://example.com/pet.json").unwrap_err();
    assert!(err.to_string().contains("serializedValue"));
}
