use manifold_di::{
    AppEnv, BindingKey, BindingResolver, ChainConfig, ConnectionParams, ConstructorParam,
    ContainerBuilder, ContainerBuilderPassExt, EnvOverrides, NameBindingPass, ServiceDefinition,
    DEDICATED_TAG,
};

fn customer_chain() -> ChainConfig {
    ChainConfig::new("customer", "src/Customer/Entity", "App.Customer")
}

fn resolver() -> BindingResolver {
    BindingResolver::new(customer_chain(), EnvOverrides::none(), AppEnv::production())
}

fn seeded_container() -> ContainerBuilder {
    let mut container = ContainerBuilder::new();
    container.register_default_connection(ConnectionParams::default().with_dbname("app"));
    container
}

#[test]
fn end_to_end_customer_scenario() {
    let mut container = seeded_container();
    container.register_definition(
        ServiceDefinition::new("app.customer.service", "App.Customer.Service").with_signature(
            vec![
                ConstructorParam::new("registry", "Orm.EntityRegistry"),
                ConstructorParam::new("entityManager", "Orm.EntityManager"),
                ConstructorParam::new("logger", "App.Logger"),
            ],
        ),
    );

    resolver().run(&mut container).unwrap();

    let def = container.definition("app.customer.service").unwrap();
    assert_eq!(
        def.binding(&BindingKey::parameter("registry")).unwrap().id(),
        "customer.registry"
    );
    assert_eq!(
        def.binding(&BindingKey::parameter("entityManager")).unwrap().id(),
        "orm.customer_manager"
    );
    assert!(def.binding(&BindingKey::parameter("logger")).is_none());
    assert_eq!(def.bindings.len(), 2);
}

#[test]
fn pre_existing_connection_binding_never_changes() {
    let mut container = seeded_container();
    container.register_definition(
        ServiceDefinition::new("app.customer.reporting", "App.Customer.Reporting")
            .with_signature(vec![
                ConstructorParam::new("connection", "Db.Connection"),
                ConstructorParam::new("registry", "Orm.EntityRegistry"),
            ])
            .with_binding(BindingKey::parameter("connection"), "db.replica_connection"),
    );

    resolver().run(&mut container).unwrap();

    let def = container.definition("app.customer.reporting").unwrap();
    // Explicit user intent always wins for the name-based pass.
    assert_eq!(
        def.binding(&BindingKey::parameter("connection")).unwrap().id(),
        "db.replica_connection"
    );
    // The other role was still filled in.
    assert_eq!(
        def.binding(&BindingKey::parameter("registry")).unwrap().id(),
        "customer.registry"
    );
}

#[test]
fn proxy_types_receive_nothing() {
    let mut container = seeded_container();
    container.register_definition(
        ServiceDefinition::new("app.customer.proxy", "App.Customer.ServiceProxy")
            .with_signature(vec![ConstructorParam::new("connection", "Db.Connection")]),
    );

    resolver().run(&mut container).unwrap();

    assert!(container
        .definition("app.customer.proxy")
        .unwrap()
        .bindings
        .is_empty());
}

#[test]
fn service_locators_receive_nothing() {
    let mut container = seeded_container();
    container.register_definition(
        ServiceDefinition::new("app.service_locator.customer", "App.Customer.Locator")
            .with_signature(vec![ConstructorParam::new("connection", "Db.Connection")]),
    );
    // The marker is matched on the id with surrounding dots.
    container.register_definition(
        ServiceDefinition::new("x.service_locator.y", "App.Customer.OtherLocator")
            .with_signature(vec![ConstructorParam::new("connection", "Db.Connection")]),
    );

    resolver().run(&mut container).unwrap();

    assert!(container
        .definition("x.service_locator.y")
        .unwrap()
        .bindings
        .is_empty());
}

#[test]
fn abstract_interface_and_untyped_definitions_are_excluded() {
    let mut container = seeded_container();
    container.register_definition(
        ServiceDefinition::new("app.customer.abstract", "App.Customer.Base")
            .abstract_definition()
            .with_signature(vec![ConstructorParam::new("registry", "Orm.EntityRegistry")]),
    );
    container.register_definition(
        ServiceDefinition::new("app.customer.iface", "App.Customer.Contract")
            .interface_definition()
            .with_signature(vec![ConstructorParam::new("registry", "Orm.EntityRegistry")]),
    );
    container.register_definition(ServiceDefinition::untyped("app.customer.alias"));

    resolver().run(&mut container).unwrap();

    for id in ["app.customer.abstract", "app.customer.iface", "app.customer.alias"] {
        assert!(
            container.definition(id).unwrap().bindings.is_empty(),
            "{} must not be wired",
            id
        );
    }
}

#[test]
fn services_outside_the_namespace_are_excluded() {
    let mut container = seeded_container();
    container.register_definition(
        ServiceDefinition::new("app.shipping.service", "App.Shipping.Service")
            .with_signature(vec![ConstructorParam::new("registry", "Orm.EntityRegistry")]),
    );

    resolver().run(&mut container).unwrap();

    assert!(container
        .definition("app.shipping.service")
        .unwrap()
        .bindings
        .is_empty());
}

#[test]
fn unloadable_definition_does_not_abort_the_pass() {
    let mut container = seeded_container();
    container.register_definition(
        ServiceDefinition::new("app.customer.broken", "App.Customer.Broken").without_signature(),
    );
    container.register_definition(
        ServiceDefinition::new("app.customer.fine", "App.Customer.Fine")
            .with_signature(vec![ConstructorParam::new("entityManager", "Orm.EntityManager")]),
    );

    resolver().run(&mut container).unwrap();

    assert!(container
        .definition("app.customer.broken")
        .unwrap()
        .bindings
        .is_empty());
    assert_eq!(
        container
            .definition("app.customer.fine")
            .unwrap()
            .binding(&BindingKey::parameter("entityManager"))
            .unwrap()
            .id(),
        "orm.customer_manager"
    );
}

#[test]
fn wired_definitions_are_tagged_with_the_chain() {
    let mut container = seeded_container();
    container.register_definition(
        ServiceDefinition::new("app.customer.service", "App.Customer.Service")
            .with_signature(vec![ConstructorParam::new("registry", "Orm.EntityRegistry")]),
    );
    container.register_definition(
        ServiceDefinition::new("app.customer.plain", "App.Customer.Plain")
            .with_signature(vec![ConstructorParam::new("clock", "App.Clock")]),
    );

    resolver().run(&mut container).unwrap();

    let tagged = container.find_tagged(DEDICATED_TAG);
    assert_eq!(tagged.len(), 1);
    assert_eq!(tagged["app.customer.service"]["chain"], "customer");
}

#[test]
fn rerunning_the_pass_adds_nothing_new() {
    let mut container = seeded_container();
    container.register_definition(
        ServiceDefinition::new("app.customer.service", "App.Customer.Service")
            .with_signature(vec![ConstructorParam::new("registry", "Orm.EntityRegistry")]),
    );

    resolver().run(&mut container).unwrap();
    let bindings_before = container
        .definition("app.customer.service")
        .unwrap()
        .bindings
        .clone();
    let tags_before = container.definition("app.customer.service").unwrap().tags.len();

    container
        .run_pass(NameBindingPass::new(customer_chain()))
        .unwrap();

    let def = container.definition("app.customer.service").unwrap();
    assert_eq!(def.bindings, bindings_before);
    assert_eq!(def.tags.len(), tags_before);
}
