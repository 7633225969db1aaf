//! Marker-based injection pass: binds managers declared per type.

use std::sync::Arc;

use crate::chain::MANAGER_TYPE;
use crate::container::ContainerBuilder;
use crate::definition::Tag;
use crate::error::BindResult;
use crate::key::{BindingKey, ResourceRef};
use crate::passes::{CompilerPass, DEDICATED_TAG};

/// Extension point invoked when a marker names a manager that is not yet
/// registered.
///
/// The default is a no-op: the pass does not infer lazy-creation semantics.
/// Install a custom provisioner to create managers on demand. A provisioner
/// error skips only the definition that triggered it; the pass continues over
/// the rest.
pub trait ManagerProvisioner: Send + Sync {
    /// Called with the manager name the marker asked for.
    fn provision(&self, container: &mut ContainerBuilder, manager_name: &str) -> BindResult<()>;
}

/// The default provisioner: does nothing.
pub struct NoopProvisioner;

impl ManagerProvisioner for NoopProvisioner {
    fn provision(&self, _container: &mut ContainerBuilder, _manager_name: &str) -> BindResult<()> {
        Ok(())
    }
}

/// Binds one manager reference per marked definition, by declared type.
///
/// For every definition whose implementation type carries a
/// [`ManagerMarker`](crate::ManagerMarker), the pass:
///
/// 1. Resolves `orm.{manager_name}_manager`, invoking the provisioner hook
///    when that id is unregistered and the name is not `default`.
/// 2. Registers a discoverable typed alias `{manager_name}Manager` for the
///    declared manager type, idempotently.
/// 3. Binds the declared manager type to the manager id, **overwriting** any
///    pre-existing binding for that type key. This is the deliberate
///    asymmetry versus the name-based pass: a marker is explicit
///    configuration, so it is authoritative.
/// 4. Adds secondary repository bindings for classes whose repository
///    resource exists; the rest are skipped silently.
///
/// # Examples
///
/// ```rust
/// use manifold_di::{
///     BindingKey, ContainerBuilder, ContainerBuilderPassExt, ManagerMarker, MarkerBindingPass,
///     ServiceDefinition,
/// };
///
/// let mut container = ContainerBuilder::new();
/// container.register_definition(ServiceDefinition::new(
///     "app.reporting",
///     "App.Reporting.Exporter",
/// ));
/// container
///     .register_marker("App.Reporting.Exporter", ManagerMarker::named("reports"))
///     .unwrap();
///
/// container.run_pass(MarkerBindingPass::new()).unwrap();
///
/// let def = container.definition("app.reporting").unwrap();
/// assert_eq!(
///     def.binding(&BindingKey::typed("Orm.EntityManager")).unwrap().id(),
///     "orm.reports_manager"
/// );
/// assert_eq!(
///     container.typed_alias("Orm.EntityManager", "reportsManager"),
///     Some("orm.reports_manager")
/// );
/// ```
pub struct MarkerBindingPass {
    manager_type: String,
    provisioner: Arc<dyn ManagerProvisioner>,
}

impl MarkerBindingPass {
    /// Creates the pass with the default declared manager type and a no-op
    /// provisioner.
    pub fn new() -> Self {
        Self {
            manager_type: MANAGER_TYPE.to_string(),
            provisioner: Arc::new(NoopProvisioner),
        }
    }

    /// Overrides the declared manager type used for bindings and aliases.
    pub fn with_manager_type(mut self, manager_type: impl Into<String>) -> Self {
        self.manager_type = manager_type.into();
        self
    }

    /// Installs a provisioner for managers that markers name but no chain
    /// has registered.
    pub fn with_provisioner(mut self, provisioner: Arc<dyn ManagerProvisioner>) -> Self {
        self.provisioner = provisioner;
        self
    }
}

impl Default for MarkerBindingPass {
    fn default() -> Self {
        Self::new()
    }
}

/// Repository ids embed the class name lower-cased with `.` mapped to `_`.
fn sanitize_class_name(class_name: &str) -> String {
    class_name.to_lowercase().replace('.', "_")
}

impl CompilerPass for MarkerBindingPass {
    fn process(&self, container: &mut ContainerBuilder) -> BindResult<()> {
        let observers = container.observers();

        for id in container.definition_ids() {
            let marker = match container
                .definition(&id)
                .and_then(|def| def.implementation_type.as_deref())
                .and_then(|ty| container.marker_for(ty))
            {
                Some(marker) => marker.clone(),
                None => continue,
            };

            let manager_id = marker.manager_id();
            if !container.has_definition(&manager_id) && marker.manager_name != "default" {
                if let Err(err) = self.provisioner.provision(container, &marker.manager_name) {
                    observers
                        .definition_skipped(&id, &format!("manager provisioning failed: {}", err));
                    continue;
                }
            }

            let alias_name = format!("{}Manager", marker.manager_name);
            if container.register_typed_alias(&manager_id, &self.manager_type, &alias_name) {
                observers.alias_registered(&self.manager_type, &alias_name, &manager_id);
            }

            let secondary: Vec<(BindingKey, ResourceRef)> = marker
                .secondary_bindings
                .iter()
                .filter_map(|class_name| {
                    let repository_id = format!(
                        "{}.repository.{}",
                        manager_id,
                        sanitize_class_name(class_name)
                    );
                    container
                        .has_definition(&repository_id)
                        .then(|| (BindingKey::typed(class_name), ResourceRef::new(repository_id)))
                })
                .collect();

            let definition = container
                .definition_mut(&id)
                .expect("definition disappeared mid-pass");

            let mut added = vec![BindingKey::typed(&self.manager_type)];
            // Marker bindings are authoritative: overwrite the type key.
            definition.bindings.insert(
                BindingKey::typed(&self.manager_type),
                ResourceRef::new(&manager_id),
            );
            for (key, target) in secondary {
                definition.bindings.insert(key.clone(), target);
                added.push(key);
            }

            if definition.tag(DEDICATED_TAG).is_none() {
                let mut tag =
                    Tag::new(DEDICATED_TAG).with_attribute("manager", &marker.manager_name);
                if marker.lazy {
                    tag = tag.with_attribute("lazy", "true");
                }
                definition.tags.push(tag);
            }
            observers.bindings_added(&id, &added);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BindError;
    use crate::marker::ManagerMarker;
    use crate::definition::ServiceDefinition;

    #[test]
    fn sanitizes_class_names_for_repository_ids() {
        assert_eq!(
            sanitize_class_name("App.Customer.InvoiceRepository"),
            "app_customer_invoicerepository"
        );
    }

    #[test]
    fn missing_secondary_targets_are_skipped_silently() {
        let mut container = ContainerBuilder::new();
        container.register_definition(ServiceDefinition::new("app.svc", "App.Svc"));
        container
            .register_marker(
                "App.Svc",
                ManagerMarker::default().with_secondary_binding("App.MissingRepository"),
            )
            .unwrap();

        MarkerBindingPass::new().process(&mut container).unwrap();

        let def = container.definition("app.svc").unwrap();
        assert!(def.binding(&BindingKey::typed("App.MissingRepository")).is_none());
        // the manager binding itself still lands
        assert!(def.binding(&BindingKey::typed(MANAGER_TYPE)).is_some());
    }

    #[test]
    fn provisioner_failure_skips_only_that_definition() {
        struct FailingProvisioner;
        impl ManagerProvisioner for FailingProvisioner {
            fn provision(&self, _: &mut ContainerBuilder, name: &str) -> BindResult<()> {
                Err(BindError::NotFound(name.to_string()))
            }
        }

        let mut container = ContainerBuilder::new();
        container.register_definition(ServiceDefinition::new("app.broken", "App.Broken"));
        container.register_definition(ServiceDefinition::new("app.fine", "App.Fine"));
        container
            .register_marker("App.Broken", ManagerMarker::named("missing"))
            .unwrap();
        container
            .register_marker("App.Fine", ManagerMarker::default())
            .unwrap();

        MarkerBindingPass::new()
            .with_provisioner(Arc::new(FailingProvisioner))
            .process(&mut container)
            .unwrap();

        assert!(container
            .definition("app.broken")
            .unwrap()
            .bindings
            .is_empty());
        assert!(container
            .definition("app.fine")
            .unwrap()
            .binding(&BindingKey::typed(MANAGER_TYPE))
            .is_some());
    }

    #[test]
    fn default_manager_never_triggers_provisioning() {
        struct PanickingProvisioner;
        impl ManagerProvisioner for PanickingProvisioner {
            fn provision(&self, _: &mut ContainerBuilder, _: &str) -> BindResult<()> {
                panic!("must not be called for the default manager");
            }
        }

        let mut container = ContainerBuilder::new();
        container.register_definition(ServiceDefinition::new("app.svc", "App.Svc"));
        container
            .register_marker("App.Svc", ManagerMarker::default())
            .unwrap();

        MarkerBindingPass::new()
            .with_provisioner(Arc::new(PanickingProvisioner))
            .process(&mut container)
            .unwrap();
    }
}
