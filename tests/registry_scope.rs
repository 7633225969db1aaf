use manifold_di::{
    AppEnv, ChainConfig, ConnectionParams, ContainerBuilder, ContainerBuilderPassExt,
    DedicatedChainPass, EnvOverrides,
};
use std::sync::Arc;

fn billing_registry(container: &ContainerBuilder) -> Arc<manifold_di::EntityRegistry> {
    container
        .resource("billing.registry")
        .unwrap()
        .as_registry()
        .unwrap()
        .clone()
}

fn build_billing_chain() -> ContainerBuilder {
    let mut container = ContainerBuilder::new();
    container.register_default_connection(ConnectionParams::default().with_dbname("acme"));
    container
        .run_pass(DedicatedChainPass::new(
            ChainConfig::new("billing", "src/Billing/Entity", "Acme.Billing"),
            EnvOverrides::none(),
            AppEnv::production(),
        ))
        .unwrap();
    container
}

#[test]
fn lookup_inside_the_namespace_returns_the_chain_manager() {
    let container = build_billing_chain();
    let registry = billing_registry(&container);

    let manager = registry.manager_for("Acme.Billing.Invoice").unwrap().unwrap();
    assert_eq!(manager.entity_path(), "src/Billing/Entity");

    // Same memoized manager instance as the facade hands out.
    let via_facade = container.resource("orm.billing_manager").unwrap();
    assert!(Arc::ptr_eq(&manager, via_facade.as_manager().unwrap()));
}

#[test]
fn lookup_outside_the_namespace_is_absent_not_an_error() {
    let container = build_billing_chain();
    let registry = billing_registry(&container);

    assert!(registry.manager_for("Acme.Shipping.Label").unwrap().is_none());
    assert!(registry.manager_for("Acme").unwrap().is_none());
    // A namespace-shaped prefix without the dot boundary is not owned.
    assert!(registry.manager_for("Acme.BillingLegacy.Invoice").unwrap().is_none());
    // The namespace itself is not an entity.
    assert!(registry.manager_for("Acme.Billing").unwrap().is_none());
}

#[test]
fn registry_reports_its_scope() {
    let container = build_billing_chain();
    let registry = billing_registry(&container);
    assert_eq!(registry.entity_namespace(), "Acme.Billing");
    assert_eq!(registry.manager_id(), "orm.billing_manager");
}
