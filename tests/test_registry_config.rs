extern crate proppath;

mod common;

use std::fs;
use std::path::PathBuf;

use common::*;
use proppath::ds::value::{MapRef, Value};
use proppath::service::config::{EXPRESSION_BACKEND, REFLECT_BACKEND};
use proppath::service::{
    ConfigError, PropertyService, ReflectPropertyService, ServiceConfig, ServiceRegistry,
};

fn temp_config(name: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("proppath-{}-{}.toml", name, std::process::id()));
    fs::write(&path, content).unwrap();
    path
}

// ── Registry ─────────────────────────────────────────────────────────

#[test]
fn test_core_registry_has_both_backends() {
    let registry = ServiceRegistry::with_core();
    assert_eq!(registry.backend_names(), vec!["expression", "reflect"]);
    assert!(registry.has_backend(REFLECT_BACKEND));
    assert!(registry.has_backend(EXPRESSION_BACKEND));
    assert!(!ServiceRegistry::new().has_backend(REFLECT_BACKEND));
}

#[test]
fn test_create_configured_backend() {
    let registry = ServiceRegistry::default();
    for backend in &[REFLECT_BACKEND, EXPRESSION_BACKEND] {
        let service = registry
            .create(&ServiceConfig::new().with_backend(*backend))
            .unwrap();
        assert_eq!(service.name(), *backend);
        let target = object(ChildObject::new("edgar", "medgar@avoka.com"));
        assert_eq!(service.read(&target, "name").unwrap(), Value::from("edgar"));
    }
}

#[test]
fn test_unknown_backend() {
    let registry = ServiceRegistry::with_core();
    match registry.create(&ServiceConfig::new().with_backend("ognl")) {
        Err(ConfigError::UnknownBackend(name)) => assert_eq!(name, "ognl"),
        Err(other) => panic!("unexpected {}", other),
        Ok(service) => panic!("unexpected backend {}", service.name()),
    }
}

#[test]
fn test_register_custom_backend() {
    let mut registry = ServiceRegistry::new();
    registry.register("custom", |config| Box::new(ReflectPropertyService::with_config(config)));
    let service = registry
        .create(&ServiceConfig::new().with_backend("custom"))
        .unwrap();
    let map = Value::from(MapRef::new());
    service.write(&map, "k", Value::Int(1)).unwrap();
    assert_eq!(service.read(&map, "k").unwrap(), Value::Int(1));
}

// ── Configuration ────────────────────────────────────────────────────

#[test]
fn test_load_config_file() {
    let path = temp_config(
        "load",
        r#"
        [property_service]
        backend = "expression"
        getter_prefixes = ["get"]
        setter_prefix = "set"
        negative_cache = false
        "#,
    );
    let config = ServiceConfig::load(&path).unwrap();
    fs::remove_file(&path).ok();

    assert_eq!(config.backend, "expression");
    assert_eq!(config.getter_prefixes, vec!["get".to_string()]);
    assert!(!config.negative_cache);
}

#[test]
fn test_load_missing_file() {
    let path = std::env::temp_dir().join("proppath-does-not-exist.toml");
    assert!(matches!(ServiceConfig::load(&path), Err(ConfigError::Io(_))));
}

#[test]
fn test_malformed_config() {
    assert!(matches!(
        ServiceConfig::parse("[property_service\nbackend = 1"),
        Err(ConfigError::Parse(_))
    ));
    assert!(matches!(
        ServiceConfig::parse("[property_service]\nnegative_cache = \"yes\""),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_getter_prefixes_change_resolution() {
    // without "is", a boolean getter named isValid is no longer a property
    let config = ServiceConfig::parse(
        r#"
        [property_service]
        getter_prefixes = ["get"]
        "#,
    )
    .unwrap();
    let service = ServiceRegistry::with_core().create(&config).unwrap();
    let target = object(ParentObject::default());
    assert!(service.read(&target, "valid").unwrap_err().is_not_found());
    assert_eq!(service.read(&target, "isValid").unwrap(), Value::Bool(false));
}

#[test]
fn test_disabled_negative_cache() {
    let config = ServiceConfig::parse("[property_service]\nnegative_cache = false").unwrap();
    let service = ReflectPropertyService::with_config(&config);
    let target = object(ChildObject::default());
    for _ in 0..3 {
        assert!(service.read(&target, "username").unwrap_err().is_not_found());
    }
    assert_eq!(service.cache().missing_len(), 0);
    assert_eq!(service.cache().stats().negative_hits, 0);
}
