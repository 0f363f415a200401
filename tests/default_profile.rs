//! Process-wide default profile installed from configuration

use std::thread;

use oas_fluent::builder::{BuildsModel, Tag};
use oas_fluent::profile::{self, ProfileContext};
use oas_fluent::{FluentConfig, ProfileAware};

#[test]
fn test_installed_default_is_shared_and_overridable() {
    let mut config = FluentConfig::default();
    config.profiles.default = "3.2".to_string();
    let installed = config.install().unwrap();
    assert_eq!(installed.id(), "3.2");

    let tag = Tag::of("pets").unwrap().summary("Pets").unwrap();
    assert_eq!(tag.profile().id(), "3.2");

    // other threads see the default but not this thread's pushes
    ProfileContext::push(profile::builtin("3.1").unwrap());
    let seen = thread::spawn(|| ProfileContext::current().unwrap().id().to_string())
        .join()
        .unwrap();
    assert_eq!(seen, "3.2");
    assert!(Tag::of("pets").unwrap().summary("Pets").is_err());
    ProfileContext::pop().unwrap();

    assert_eq!(ProfileContext::current().unwrap().id(), "3.2");
    assert!(tag.to_model().is_ok());
}

#[test]
fn test_unknown_default_rejected() {
    let mut config = FluentConfig::default();
    config.profiles.default = "9.9".to_string();
    assert!(config.install().is_err());
}
