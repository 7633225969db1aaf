//! Name-based injection pass: binds constructor parameters by role name.

use crate::chain::ChainConfig;
use crate::container::ContainerBuilder;
use crate::definition::{ServiceDefinition, Tag};
use crate::error::BindResult;
use crate::key::{BindingKey, ResourceRef};
use crate::passes::{CompilerPass, DEDICATED_TAG};

/// Parameter name bound to the chain's registry.
pub const ROLE_REGISTRY: &str = "registry";
/// Parameter name bound to the chain's manager.
pub const ROLE_MANAGER: &str = "entityManager";
/// Parameter name bound to the chain's connection.
pub const ROLE_CONNECTION: &str = "connection";

const PROXY_MARKER: &str = "Proxy";
const LOCATOR_MARKER: &str = ".service_locator.";

/// Binds eligible definitions' constructor parameters to chain resources by
/// exact parameter name.
///
/// A definition is eligible when all of the following hold: it has a concrete
/// implementation type under the chain's service namespace; it is neither
/// abstract nor an interface; its type name carries no proxy marker and its
/// id no service-locator marker. A definition whose constructor signature is
/// unavailable (type not loadable) contributes zero bindings and is skipped
/// silently; one bad definition never aborts the pass.
///
/// Existing bindings always win: the computed bindings form the base and the
/// definition's own entries are overlaid, so explicit user configuration is
/// never replaced.
///
/// # Examples
///
/// ```rust
/// use manifold_di::{
///     AppEnv, BindingKey, ChainConfig, ConnectionParams, ConstructorParam, ContainerBuilder,
///     ContainerBuilderPassExt, DedicatedChainPass, EnvOverrides, NameBindingPass,
///     ServiceDefinition,
/// };
///
/// let chain = ChainConfig::new("customer", "src/Customer/Entity", "App.Customer");
///
/// let mut container = ContainerBuilder::new();
/// container.register_default_connection(ConnectionParams::default());
/// container.register_definition(
///     ServiceDefinition::new("app.customer.orders", "App.Customer.OrderService")
///         .with_signature(vec![ConstructorParam::new("connection", "Db.Connection")]),
/// );
///
/// container
///     .run_pass(DedicatedChainPass::new(
///         chain.clone(),
///         EnvOverrides::none(),
///         AppEnv::production(),
///     ))
///     .unwrap()
///     .run_pass(NameBindingPass::new(chain))
///     .unwrap();
///
/// let def = container.definition("app.customer.orders").unwrap();
/// assert_eq!(
///     def.binding(&BindingKey::parameter("connection")).unwrap().id(),
///     "db.customer_connection"
/// );
/// ```
pub struct NameBindingPass {
    chain: ChainConfig,
}

impl NameBindingPass {
    /// Creates the pass for one chain.
    pub fn new(chain: ChainConfig) -> Self {
        Self { chain }
    }

    fn role_target(&self, param_name: &str) -> Option<ResourceRef> {
        match param_name {
            ROLE_REGISTRY => Some(ResourceRef::new(self.chain.registry_id())),
            ROLE_MANAGER => Some(ResourceRef::new(self.chain.manager_id())),
            ROLE_CONNECTION => Some(ResourceRef::new(self.chain.connection_id())),
            _ => None,
        }
    }

    fn eligible(&self, definition: &ServiceDefinition) -> bool {
        let implementation_type = match &definition.implementation_type {
            Some(ty) if !ty.is_empty() => ty,
            _ => return false,
        };
        if definition.is_abstract || definition.is_interface {
            return false;
        }
        if implementation_type.contains(PROXY_MARKER) {
            return false;
        }
        if definition.id.contains(LOCATOR_MARKER) {
            return false;
        }
        in_namespace(implementation_type, &self.chain.service_namespace)
    }
}

fn in_namespace(type_name: &str, namespace: &str) -> bool {
    type_name
        .strip_prefix(namespace)
        .is_some_and(|rest| rest.starts_with('.'))
}

impl CompilerPass for NameBindingPass {
    fn process(&self, container: &mut ContainerBuilder) -> BindResult<()> {
        let observers = container.observers();

        for id in container.definition_ids() {
            let definition = match container.definition(&id) {
                Some(def) => def,
                None => continue,
            };
            if !self.eligible(definition) {
                continue;
            }

            let signature = match &definition.signature {
                Some(params) => params,
                None => {
                    observers.definition_skipped(&id, "constructor signature unavailable");
                    continue;
                }
            };

            let needed: Vec<(BindingKey, ResourceRef)> = signature
                .iter()
                .filter_map(|param| {
                    self.role_target(&param.name)
                        .map(|target| (BindingKey::parameter(&param.name), target))
                })
                .collect();
            if needed.is_empty() {
                continue;
            }

            // Merge: needed bindings as base, existing entries overlaid.
            let definition = container
                .definition_mut(&id)
                .expect("definition disappeared mid-pass");
            let mut added = Vec::new();
            for (key, target) in needed {
                if definition.bindings.contains_key(&key) {
                    continue;
                }
                definition.bindings.insert(key.clone(), target);
                added.push(key);
            }

            if !added.is_empty() {
                if definition.tag(DEDICATED_TAG).is_none() {
                    definition.tags.push(
                        Tag::new(DEDICATED_TAG).with_attribute("chain", &self.chain.prefix),
                    );
                }
                observers.bindings_added(&id, &added);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::ConstructorParam;

    fn pass() -> NameBindingPass {
        NameBindingPass::new(ChainConfig::new("customer", "p", "App.Customer"))
    }

    #[test]
    fn abstract_and_interface_definitions_are_ineligible() {
        let pass = pass();
        let def = ServiceDefinition::new("a", "App.Customer.Svc").abstract_definition();
        assert!(!pass.eligible(&def));
        let def = ServiceDefinition::new("a", "App.Customer.Svc").interface_definition();
        assert!(!pass.eligible(&def));
    }

    #[test]
    fn proxy_and_locator_markers_are_ineligible() {
        let pass = pass();
        let def = ServiceDefinition::new("a", "App.Customer.SvcProxy");
        assert!(!pass.eligible(&def));
        let def = ServiceDefinition::new("a.service_locator.b", "App.Customer.Svc");
        assert!(!pass.eligible(&def));
    }

    #[test]
    fn namespace_boundary_is_a_dot() {
        let pass = pass();
        assert!(pass.eligible(&ServiceDefinition::new("a", "App.Customer.Svc")));
        assert!(!pass.eligible(&ServiceDefinition::new("a", "App.CustomerCare.Svc")));
        assert!(!pass.eligible(&ServiceDefinition::new("a", "App.Customer")));
    }

    #[test]
    fn role_table_targets_chain_ids() {
        let pass = pass();
        assert_eq!(pass.role_target("registry").unwrap().id(), "customer.registry");
        assert_eq!(
            pass.role_target("entityManager").unwrap().id(),
            "orm.customer_manager"
        );
        assert_eq!(
            pass.role_target("connection").unwrap().id(),
            "db.customer_connection"
        );
        assert!(pass.role_target("logger").is_none());
        // exact match only
        assert!(pass.role_target("Registry").is_none());
        assert!(pass.role_target("entity_manager").is_none());
    }

    #[test]
    fn unloadable_types_contribute_zero_bindings() {
        let mut container = ContainerBuilder::new();
        container.register_definition(
            ServiceDefinition::new("app.broken", "App.Customer.Broken").without_signature(),
        );
        pass().process(&mut container).unwrap();
        assert!(container.definition("app.broken").unwrap().bindings.is_empty());
    }

    #[test]
    fn existing_binding_is_never_replaced() {
        let mut container = ContainerBuilder::new();
        container.register_definition(
            ServiceDefinition::new("app.svc", "App.Customer.Svc")
                .with_signature(vec![ConstructorParam::new("connection", "Db.Connection")])
                .with_binding(BindingKey::parameter("connection"), "db.legacy_connection"),
        );
        pass().process(&mut container).unwrap();
        assert_eq!(
            container
                .definition("app.svc")
                .unwrap()
                .binding(&BindingKey::parameter("connection"))
                .unwrap()
                .id(),
            "db.legacy_connection"
        );
    }
}
