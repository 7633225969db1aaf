/// Unit tests for BindingKey and ResourceRef
use manifold_di::{BindingKey, ResourceRef};
use std::collections::BTreeMap;

#[test]
fn test_parameter_and_type_keys_are_distinct() {
    let by_name = BindingKey::parameter("connection");
    let by_type = BindingKey::typed("connection");
    assert_ne!(by_name, by_type);
    assert_eq!(by_name.display_name(), by_type.display_name());
    assert!(!by_name.is_type());
    assert!(by_type.is_type());
}

#[test]
fn test_key_equality() {
    assert_eq!(
        BindingKey::parameter("entityManager"),
        BindingKey::Parameter("entityManager".to_string())
    );
    assert_eq!(
        BindingKey::typed("Orm.EntityManager"),
        BindingKey::Type("Orm.EntityManager".to_string())
    );
    assert_ne!(BindingKey::parameter("a"), BindingKey::parameter("b"));
}

#[test]
fn test_key_display() {
    assert_eq!(BindingKey::parameter("registry").to_string(), "$registry");
    assert_eq!(
        BindingKey::typed("Orm.EntityManager").to_string(),
        "Orm.EntityManager"
    );
}

#[test]
fn test_keys_work_as_map_keys() {
    let mut bindings: BTreeMap<BindingKey, ResourceRef> = BTreeMap::new();
    bindings.insert(
        BindingKey::parameter("connection"),
        ResourceRef::new("db.customer_connection"),
    );
    bindings.insert(
        BindingKey::typed("Orm.EntityManager"),
        ResourceRef::new("orm.customer_manager"),
    );

    assert_eq!(bindings.len(), 2);
    assert_eq!(
        bindings[&BindingKey::parameter("connection")].id(),
        "db.customer_connection"
    );
    // overwriting the same key replaces the target
    bindings.insert(
        BindingKey::parameter("connection"),
        ResourceRef::new("db.other_connection"),
    );
    assert_eq!(bindings.len(), 2);
    assert_eq!(
        bindings[&BindingKey::parameter("connection")].id(),
        "db.other_connection"
    );
}

#[test]
fn test_resource_ref_conversions() {
    let from_str: ResourceRef = "orm.default_manager".into();
    let from_string: ResourceRef = String::from("orm.default_manager").into();
    assert_eq!(from_str, from_string);
    assert_eq!(from_str.id(), "orm.default_manager");
    assert_eq!(from_str.to_string(), "@orm.default_manager");
}
