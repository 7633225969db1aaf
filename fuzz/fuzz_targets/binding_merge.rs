#![no_main]

use libfuzzer_sys::fuzz_target;
use manifold_di::{
    AppEnv, BindingKey, BindingResolver, ChainConfig, ConnectionParams, ConstructorParam,
    ContainerBuilder, EnvOverrides, ServiceDefinition,
};

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    // First byte selects how many parameters, second which ones are prebound.
    let param_count = (data[0] % 8) as usize;
    let prebound_mask = data[1];
    let names = ["registry", "entityManager", "connection", "logger", "clock", "bus", "cache", "mailer"];

    let mut def = ServiceDefinition::new("app.customer.svc", "App.Customer.Svc").with_signature(
        names[..param_count]
            .iter()
            .map(|name| ConstructorParam::new(*name, "App.Opaque"))
            .collect::<Vec<_>>(),
    );
    for (i, name) in names[..param_count].iter().enumerate() {
        if prebound_mask & (1u8 << i) != 0 {
            def = def.with_binding(BindingKey::parameter(*name), "db.user_supplied");
        }
    }
    let original = def.bindings.clone();

    let mut container = ContainerBuilder::new();
    container.register_default_connection(ConnectionParams::default().with_dbname("app"));
    container.register_definition(def);

    let chain = ChainConfig::new("customer", "src/Customer/Entity", "App.Customer");
    BindingResolver::new(chain, EnvOverrides::none(), AppEnv::production())
        .run(&mut container)
        .unwrap();

    // Invariant: pre-existing bindings are never altered by the name pass.
    let result = container.definition("app.customer.svc").unwrap();
    for (key, target) in &original {
        assert_eq!(result.binding(key).map(|r| r.id()), Some(target.id()));
    }
});
