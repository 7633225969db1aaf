//! Resource registration pass: builds one chain's factory → connection →
//! manager → registry.

use std::sync::Arc;

use crate::chain::{ChainConfig, CONNECTION_TYPE, FACTORY_TYPE, MANAGER_TYPE, REGISTRY_TYPE};
use crate::container::ContainerBuilder;
use crate::definition::{ConstructorParam, ServiceDefinition};
use crate::error::{BindError, BindResult};
use crate::key::{BindingKey, ResourceRef};
use crate::passes::CompilerPass;
use crate::resources::{ConnectionFactory, ConnectionOpener, EntityRegistry, ResourceEntry};
use crate::settings::{AppEnv, ConnectionParams, EnvOverrides};

/// Registers the four resources of one dedicated chain.
///
/// The pass is idempotent: any resource id that already exists is skipped, so
/// running it twice for the same prefix yields exactly one set of four
/// resources. Nothing is constructed here: the connection and manager stay
/// behind the chain's memoizing factory and materialize on first use.
///
/// Parameter resolution happens once, up front: the inherited default
/// connection's parameters are cloned with the environment snapshot applied
/// (explicit override > inherited value > hard-coded fallback, with the
/// database-suffix rule keeping the chain off the default database).
///
/// # Examples
///
/// ```rust
/// use manifold_di::{
///     AppEnv, ChainConfig, ConnectionParams, ContainerBuilder, ContainerBuilderPassExt,
///     DedicatedChainPass, EnvOverrides,
/// };
///
/// let mut container = ContainerBuilder::new();
/// container.register_default_connection(ConnectionParams::default().with_dbname("app"));
///
/// let chain = ChainConfig::new("reports", "src/Reports/Entity", "App.Reports");
/// let pass = DedicatedChainPass::new(chain, EnvOverrides::none(), AppEnv::production());
/// container.run_pass(pass).unwrap();
///
/// assert!(container.has_definition("reports.connection_factory"));
/// assert!(container.has_definition("db.reports_connection"));
/// assert!(container.has_definition("orm.reports_manager"));
/// assert!(container.has_definition("reports.registry"));
///
/// // Resolution is deferred; materializing the connection applies the
/// // derived database name.
/// let connection = container.resource("db.reports_connection").unwrap();
/// let params = connection.as_connection().unwrap().params().clone();
/// assert_eq!(params.dbname.as_deref(), Some("app_reports"));
/// ```
pub struct DedicatedChainPass {
    config: ChainConfig,
    env: EnvOverrides,
    app_env: AppEnv,
    opener: Option<ConnectionOpener>,
}

impl DedicatedChainPass {
    /// Creates the pass for one chain from explicit snapshots.
    pub fn new(config: ChainConfig, env: EnvOverrides, app_env: AppEnv) -> Self {
        Self {
            config,
            env,
            app_env,
            opener: None,
        }
    }

    /// Installs a custom driver boundary on the chain's factory.
    pub fn with_opener_arc(mut self, opener: ConnectionOpener) -> Self {
        self.opener = Some(opener);
        self
    }

    fn inherited_params(&self, container: &ContainerBuilder) -> BindResult<ConnectionParams> {
        let id = self.config.default_connection();
        let resource = container.resource(id)?;
        let connection = resource.as_connection().ok_or_else(|| {
            BindError::InvalidChain(format!("{} is not a connection resource", id))
        })?;
        Ok(connection.params().clone())
    }

    fn chain_factory(&self, container: &ContainerBuilder) -> BindResult<Arc<ConnectionFactory>> {
        // Reuse the registered factory so later resources keep referencing
        // the same chain instance across repeated runs.
        let factory_id = self.config.factory_id();
        if container.has_resource(&factory_id) {
            let resource = container.resource(&factory_id)?;
            if let Some(existing) = resource.as_factory() {
                return Ok(existing.clone());
            }
        }
        let base = self.inherited_params(container)?;
        let resolved = base.with_overrides(&self.env, &self.config.database_suffix());
        let mut factory =
            ConnectionFactory::new(&self.config, resolved, self.app_env.dev_mode);
        if let Some(opener) = &self.opener {
            factory = factory.with_opener_arc(opener.clone());
        }
        Ok(Arc::new(factory))
    }

    fn register(
        &self,
        container: &mut ContainerBuilder,
        definition: ServiceDefinition,
        entry: ResourceEntry,
    ) {
        let id = definition.id.clone();
        if container.has_definition(&id) {
            container.observers().resource_skipped(&id);
            return;
        }
        container.register_definition(definition);
        container.insert_resource(id, entry);
    }
}

impl CompilerPass for DedicatedChainPass {
    fn process(&self, container: &mut ContainerBuilder) -> BindResult<()> {
        self.config.validate()?;

        let factory = self.chain_factory(container)?;
        let factory_id = self.config.factory_id();
        let connection_id = self.config.connection_id();
        let manager_id = self.config.manager_id();
        let registry_id = self.config.registry_id();

        self.register(
            container,
            ServiceDefinition::new(&factory_id, FACTORY_TYPE),
            ResourceEntry::Factory(factory.clone()),
        );

        self.register(
            container,
            ServiceDefinition::new(&connection_id, CONNECTION_TYPE)
                .with_signature(vec![ConstructorParam::new("factory", FACTORY_TYPE)])
                .with_binding(BindingKey::parameter("factory"), ResourceRef::new(&factory_id)),
            ResourceEntry::LazyConnection(factory.clone()),
        );

        self.register(
            container,
            ServiceDefinition::new(&manager_id, MANAGER_TYPE)
                .with_signature(vec![ConstructorParam::new("connection", CONNECTION_TYPE)])
                .with_binding(
                    BindingKey::parameter("connection"),
                    ResourceRef::new(&connection_id),
                ),
            ResourceEntry::LazyManager(factory.clone()),
        );

        let registry = Arc::new(EntityRegistry::new(&self.config, factory));
        self.register(
            container,
            ServiceDefinition::new(&registry_id, REGISTRY_TYPE)
                .with_signature(vec![ConstructorParam::new("entityManager", MANAGER_TYPE)])
                .with_binding(
                    BindingKey::parameter("entityManager"),
                    ResourceRef::new(&manager_id),
                ),
            ResourceEntry::Registry(registry),
        );

        container.observers().chain_registered(&self.config.prefix);
        Ok(())
    }
}
