//! Runtime resources backing a dedicated chain.
//!
//! The container registers *definitions* eagerly but constructs nothing at
//! registration time. Each chain owns one [`ConnectionFactory`] through which
//! the connection and manager materialize on first use; the factory memoizes
//! both, so a chain holds at most one connection and one manager for its
//! lifetime. Construction failures surface at first materialization as
//! [`BindError::ConstructionFailed`] with the driver cause attached, and only
//! poison the failing chain.

use std::sync::Arc;

#[cfg(feature = "once-cell")]
use once_cell::sync::OnceCell;
#[cfg(not(feature = "once-cell"))]
use std::sync::Mutex;

use crate::chain::ChainConfig;
use crate::error::{BindError, BindResult};
use crate::settings::ConnectionParams;

type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Driver boundary: turns resolved parameters into an open connection.
pub type ConnectionOpener =
    Arc<dyn Fn(&ConnectionParams) -> Result<ConnectionHandle, BoxedError> + Send + Sync>;

/// Opaque handle to a database connection.
///
/// The crate does not implement the driver; the handle only carries the
/// resolved parameters for introspection (`params()`) by collaborators.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    params: ConnectionParams,
}

impl ConnectionHandle {
    /// Creates a handle over resolved parameters.
    pub fn new(params: ConnectionParams) -> Self {
        Self { params }
    }

    /// Parameter introspection.
    pub fn params(&self) -> &ConnectionParams {
        &self.params
    }
}

/// ORM session bound to one connection and one set of mapped entities.
#[derive(Debug, Clone)]
pub struct ManagerHandle {
    connection: Arc<ConnectionHandle>,
    entity_path: String,
    dev_mode: bool,
}

impl ManagerHandle {
    /// The connection this manager operates on.
    pub fn connection(&self) -> &Arc<ConnectionHandle> {
        &self.connection
    }

    /// Filesystem location of the mapped entities.
    pub fn entity_path(&self) -> &str {
        &self.entity_path
    }

    /// Whether the manager was built in development mode.
    pub fn dev_mode(&self) -> bool {
        self.dev_mode
    }
}

/// Memoizing factory for one chain's connection and manager.
///
/// The memoization is an explicit once-initialized cell:
/// `once_cell::sync::OnceCell` under the `once-cell` feature, a
/// `Mutex<Option<…>>` otherwise. Failed constructions are not cached; every
/// use of a broken chain re-surfaces the error.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use manifold_di::{ChainConfig, ConnectionFactory, ConnectionParams};
///
/// let chain = ChainConfig::new("customer", "src/Customer/Entity", "App.Customer");
/// let params = ConnectionParams::default().with_dbname("app_customer");
/// let factory = ConnectionFactory::new(&chain, params, false);
///
/// let a = factory.create_connection().unwrap();
/// let b = factory.create_connection().unwrap();
/// assert!(Arc::ptr_eq(&a, &b)); // at most one connection per chain
/// ```
pub struct ConnectionFactory {
    connection_id: String,
    manager_id: String,
    entity_path: String,
    dev_mode: bool,
    params: ConnectionParams,
    opener: ConnectionOpener,

    #[cfg(feature = "once-cell")]
    connection: OnceCell<Arc<ConnectionHandle>>,
    #[cfg(not(feature = "once-cell"))]
    connection: Mutex<Option<Arc<ConnectionHandle>>>,

    #[cfg(feature = "once-cell")]
    manager: OnceCell<Arc<ManagerHandle>>,
    #[cfg(not(feature = "once-cell"))]
    manager: Mutex<Option<Arc<ManagerHandle>>>,
}

impl std::fmt::Debug for ConnectionFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionFactory")
            .field("connection_id", &self.connection_id)
            .field("manager_id", &self.manager_id)
            .field("entity_path", &self.entity_path)
            .field("dev_mode", &self.dev_mode)
            .finish()
    }
}

impl ConnectionFactory {
    /// Creates a factory for a chain over already-resolved parameters.
    pub fn new(chain: &ChainConfig, params: ConnectionParams, dev_mode: bool) -> Self {
        Self {
            connection_id: chain.connection_id(),
            manager_id: chain.manager_id(),
            entity_path: chain.entity_path.clone(),
            dev_mode,
            params,
            opener: Arc::new(|params| Ok(ConnectionHandle::new(params.clone()))),
            #[cfg(feature = "once-cell")]
            connection: OnceCell::new(),
            #[cfg(not(feature = "once-cell"))]
            connection: Mutex::new(None),
            #[cfg(feature = "once-cell")]
            manager: OnceCell::new(),
            #[cfg(not(feature = "once-cell"))]
            manager: Mutex::new(None),
        }
    }

    /// Replaces the driver boundary.
    ///
    /// The default opener constructs the handle directly. A custom opener can
    /// perform real driver work and fail; its error is attached as the cause
    /// of the resulting `ConstructionFailed`.
    pub fn with_opener<F>(self, opener: F) -> Self
    where
        F: Fn(&ConnectionParams) -> Result<ConnectionHandle, BoxedError> + Send + Sync + 'static,
    {
        self.with_opener_arc(Arc::new(opener))
    }

    /// Replaces the driver boundary with a shared opener.
    pub fn with_opener_arc(mut self, opener: ConnectionOpener) -> Self {
        self.opener = opener;
        self
    }

    /// The resolved parameters this factory opens connections with.
    pub fn params(&self) -> &ConnectionParams {
        &self.params
    }

    fn open(&self) -> BindResult<Arc<ConnectionHandle>> {
        (self.opener)(&self.params)
            .map(Arc::new)
            .map_err(|source| BindError::ConstructionFailed {
                resource: self.connection_id.clone(),
                source: Arc::from(source),
            })
    }

    fn build_manager(&self) -> BindResult<Arc<ManagerHandle>> {
        let connection = self.create_connection()?;
        Ok(Arc::new(ManagerHandle {
            connection,
            entity_path: self.entity_path.clone(),
            dev_mode: self.dev_mode,
        }))
    }

    /// Returns the chain's connection, opening it on first call.
    #[cfg(feature = "once-cell")]
    pub fn create_connection(&self) -> BindResult<Arc<ConnectionHandle>> {
        self.connection.get_or_try_init(|| self.open()).cloned()
    }

    /// Returns the chain's connection, opening it on first call.
    #[cfg(not(feature = "once-cell"))]
    pub fn create_connection(&self) -> BindResult<Arc<ConnectionHandle>> {
        let mut slot = self.connection.lock().unwrap();
        if let Some(existing) = slot.as_ref() {
            return Ok(existing.clone());
        }
        let opened = self.open()?;
        *slot = Some(opened.clone());
        Ok(opened)
    }

    /// Returns the chain's manager, constructing it (and the connection it
    /// wraps) on first call.
    #[cfg(feature = "once-cell")]
    pub fn create_manager(&self) -> BindResult<Arc<ManagerHandle>> {
        self.manager.get_or_try_init(|| self.build_manager()).cloned()
    }

    /// Returns the chain's manager, constructing it (and the connection it
    /// wraps) on first call.
    #[cfg(not(feature = "once-cell"))]
    pub fn create_manager(&self) -> BindResult<Arc<ManagerHandle>> {
        let mut slot = self.manager.lock().unwrap();
        if let Some(existing) = slot.as_ref() {
            return Ok(existing.clone());
        }
        let built = self.build_manager()?;
        *slot = Some(built.clone());
        Ok(built)
    }

    pub(crate) fn manager_id(&self) -> &str {
        &self.manager_id
    }
}

/// Lookup facade mapping entity type names to the responsible manager.
///
/// The registry is deliberately narrowed to its chain's entity namespace: a
/// lookup for a type outside the namespace returns `Ok(None)` ("not managed
/// here"), never an error, so a dedicated registry can never claim ownership
/// of entities from another bundle. An `Err` only occurs when the type *is*
/// managed here and the deferred manager construction fails.
///
/// # Examples
///
/// ```rust
/// use manifold_di::{ChainConfig, ConnectionFactory, ConnectionParams, EntityRegistry};
///
/// let chain = ChainConfig::new("billing", "src/Billing/Entity", "Acme.Billing");
/// let factory = ConnectionFactory::new(&chain, ConnectionParams::default(), false);
/// let registry = EntityRegistry::new(&chain, std::sync::Arc::new(factory));
///
/// assert!(registry.manager_for("Acme.Billing.Invoice").unwrap().is_some());
/// assert!(registry.manager_for("Acme.Shipping.Label").unwrap().is_none());
/// ```
#[derive(Debug)]
pub struct EntityRegistry {
    entity_namespace: String,
    factory: Arc<ConnectionFactory>,
}

impl EntityRegistry {
    /// Creates the registry for a chain over its factory.
    pub fn new(chain: &ChainConfig, factory: Arc<ConnectionFactory>) -> Self {
        Self {
            entity_namespace: chain.entity_namespace.clone(),
            factory,
        }
    }

    /// The namespace this registry claims.
    pub fn entity_namespace(&self) -> &str {
        &self.entity_namespace
    }

    /// Returns the manager responsible for `type_name`, or `None` when the
    /// type lies outside this registry's namespace.
    pub fn manager_for(&self, type_name: &str) -> BindResult<Option<Arc<ManagerHandle>>> {
        let owned = type_name
            .strip_prefix(&self.entity_namespace)
            .is_some_and(|rest| rest.starts_with('.'));
        if !owned {
            return Ok(None);
        }
        self.factory.create_manager().map(Some)
    }

    /// The id of the manager this registry hands out.
    pub fn manager_id(&self) -> &str {
        self.factory.manager_id()
    }
}

/// Container-side entry for a registered resource.
///
/// Chain entries reference the chain's factory and materialize through it,
/// which is what keeps the factory → connection → manager → registry order
/// both linear and lazy. `Connection` holds an already-open handle and is how
/// the pre-existing default connection is hosted.
#[derive(Debug, Clone)]
pub enum ResourceEntry {
    /// A chain's connection factory
    Factory(Arc<ConnectionFactory>),
    /// A chain's dedicated connection, materialized through its factory
    LazyConnection(Arc<ConnectionFactory>),
    /// A chain's manager, materialized through its factory
    LazyManager(Arc<ConnectionFactory>),
    /// A chain's entity registry
    Registry(Arc<EntityRegistry>),
    /// An already-open connection handle
    Connection(Arc<ConnectionHandle>),
}

/// A materialized resource returned by the container facade.
#[derive(Debug, Clone)]
pub enum Resource {
    /// Connection factory
    Factory(Arc<ConnectionFactory>),
    /// Open connection
    Connection(Arc<ConnectionHandle>),
    /// Manager
    Manager(Arc<ManagerHandle>),
    /// Entity registry
    Registry(Arc<EntityRegistry>),
}

impl Resource {
    /// The connection, if this resource is one.
    pub fn as_connection(&self) -> Option<&Arc<ConnectionHandle>> {
        match self {
            Resource::Connection(handle) => Some(handle),
            _ => None,
        }
    }

    /// The manager, if this resource is one.
    pub fn as_manager(&self) -> Option<&Arc<ManagerHandle>> {
        match self {
            Resource::Manager(handle) => Some(handle),
            _ => None,
        }
    }

    /// The registry, if this resource is one.
    pub fn as_registry(&self) -> Option<&Arc<EntityRegistry>> {
        match self {
            Resource::Registry(registry) => Some(registry),
            _ => None,
        }
    }

    /// The factory, if this resource is one.
    pub fn as_factory(&self) -> Option<&Arc<ConnectionFactory>> {
        match self {
            Resource::Factory(factory) => Some(factory),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_chain() -> ChainConfig {
        ChainConfig::new("customer", "src/Customer/Entity", "App.Customer")
    }

    #[test]
    fn manager_is_memoized_per_chain() {
        let factory = ConnectionFactory::new(&test_chain(), ConnectionParams::default(), true);
        let a = factory.create_manager().unwrap();
        let b = factory.create_manager().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert!(a.dev_mode());
        assert_eq!(a.entity_path(), "src/Customer/Entity");
    }

    #[test]
    fn manager_shares_the_chain_connection() {
        let factory = ConnectionFactory::new(&test_chain(), ConnectionParams::default(), false);
        let connection = factory.create_connection().unwrap();
        let manager = factory.create_manager().unwrap();
        assert!(Arc::ptr_eq(&connection, manager.connection()));
    }

    #[test]
    fn failed_open_attaches_cause_and_is_not_cached() {
        let factory = ConnectionFactory::new(&test_chain(), ConnectionParams::default(), false)
            .with_opener(|_| Err("access denied for user".into()));

        for _ in 0..2 {
            match factory.create_connection() {
                Err(BindError::ConstructionFailed { resource, source }) => {
                    assert_eq!(resource, "db.customer_connection");
                    assert!(source.to_string().contains("access denied"));
                }
                other => panic!("expected ConstructionFailed, got {:?}", other.map(|_| ())),
            }
        }
    }

    #[test]
    fn namespace_prefix_requires_dot_boundary() {
        let chain = test_chain();
        let factory = Arc::new(ConnectionFactory::new(&chain, ConnectionParams::default(), false));
        let registry = EntityRegistry::new(&chain, factory);
        // "App.CustomerCare" shares the string prefix but not the namespace.
        assert!(registry.manager_for("App.CustomerCare.Ticket").unwrap().is_none());
        assert!(registry.manager_for("App.Customer.Order").unwrap().is_some());
    }
}
