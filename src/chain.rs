//! Chain descriptors: one per dedicated resource prefix.

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::error::{BindError, BindResult};

/// Default connection resource id used when a chain names no alternate.
pub const DEFAULT_CONNECTION_ID: &str = "db.default_connection";

/// Declared type of a chain's connection factory definition.
pub const FACTORY_TYPE: &str = "Db.ConnectionFactory";
/// Declared type of a chain's connection definition.
pub const CONNECTION_TYPE: &str = "Db.Connection";
/// Declared type of a chain's manager definition.
pub const MANAGER_TYPE: &str = "Orm.EntityManager";
/// Declared type of a chain's registry definition.
pub const REGISTRY_TYPE: &str = "Orm.EntityRegistry";

/// Descriptor for one dedicated resource chain.
///
/// A chain is the four related resources sharing one prefix: connection
/// factory, connection, manager, and registry. The prefix scopes both the
/// derived resource ids and the environment variable names
/// (`{PREFIX}_DB_HOST` and friends); the namespaces limit which entities the
/// registry claims and which service definitions the name-based pass may
/// touch.
///
/// Id derivation is fixed:
///
/// | resource   | id                           |
/// |------------|------------------------------|
/// | factory    | `{prefix}.connection_factory`|
/// | connection | `db.{prefix}_connection`     |
/// | manager    | `orm.{prefix}_manager`       |
/// | registry   | `{prefix}.registry`          |
///
/// # Examples
///
/// ```rust
/// use manifold_di::ChainConfig;
///
/// let chain = ChainConfig::new("customer", "src/Customer/Entity", "App.Customer")
///     .with_service_namespace("App.Customer");
///
/// assert_eq!(chain.factory_id(), "customer.connection_factory");
/// assert_eq!(chain.connection_id(), "db.customer_connection");
/// assert_eq!(chain.manager_id(), "orm.customer_manager");
/// assert_eq!(chain.registry_id(), "customer.registry");
/// assert_eq!(chain.database_suffix(), "_customer");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct ChainConfig {
    /// Short identifier scoping resource ids and env var names
    pub prefix: String,
    /// Filesystem location of the chain's mapped entities
    pub entity_path: String,
    /// Namespace of entities the chain's registry claims
    pub entity_namespace: String,
    /// Namespace of services eligible for name-based binding
    pub service_namespace: String,
    /// Override for the derived database suffix (`_{prefix}` by default)
    pub database_suffix: Option<String>,
    /// Alternate default-connection resource to inherit parameters from
    pub default_connection_id: Option<String>,
}

impl ChainConfig {
    /// Creates a chain descriptor.
    ///
    /// The service namespace defaults to the entity namespace; override it
    /// with [`with_service_namespace`](Self::with_service_namespace) when
    /// services live elsewhere.
    pub fn new(
        prefix: impl Into<String>,
        entity_path: impl Into<String>,
        entity_namespace: impl Into<String>,
    ) -> Self {
        let entity_namespace = entity_namespace.into();
        Self {
            prefix: prefix.into(),
            entity_path: entity_path.into(),
            service_namespace: entity_namespace.clone(),
            entity_namespace,
            database_suffix: None,
            default_connection_id: None,
        }
    }

    /// Overrides the eligible service namespace.
    pub fn with_service_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.service_namespace = namespace.into();
        self
    }

    /// Overrides the derived database suffix.
    pub fn with_database_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.database_suffix = Some(suffix.into());
        self
    }

    /// Inherits parameters from an alternate default connection.
    pub fn with_default_connection(mut self, id: impl Into<String>) -> Self {
        self.default_connection_id = Some(id.into());
        self
    }

    /// `{prefix}.connection_factory`
    pub fn factory_id(&self) -> String {
        format!("{}.connection_factory", self.prefix)
    }

    /// `db.{prefix}_connection`
    pub fn connection_id(&self) -> String {
        format!("db.{}_connection", self.prefix)
    }

    /// `orm.{prefix}_manager`
    pub fn manager_id(&self) -> String {
        format!("orm.{}_manager", self.prefix)
    }

    /// `{prefix}.registry`
    pub fn registry_id(&self) -> String {
        format!("{}.registry", self.prefix)
    }

    /// The suffix appended to an inherited database name when no explicit
    /// name override exists. Keeps a dedicated chain off the default
    /// database.
    pub fn database_suffix(&self) -> String {
        match &self.database_suffix {
            Some(suffix) => suffix.clone(),
            None => format!("_{}", self.prefix),
        }
    }

    /// The resource id the chain inherits connection parameters from.
    pub fn default_connection(&self) -> &str {
        self.default_connection_id
            .as_deref()
            .unwrap_or(DEFAULT_CONNECTION_ID)
    }

    /// Loads a chain descriptor from a JSON document.
    ///
    /// ```json
    /// {
    ///   "prefix": "reports",
    ///   "entity_path": "src/Reports/Entity",
    ///   "entity_namespace": "App.Reports",
    ///   "service_namespace": "App.Reports",
    ///   "database_suffix": null,
    ///   "default_connection_id": null
    /// }
    /// ```
    #[cfg(feature = "config")]
    pub fn from_json(json: &str) -> BindResult<Self> {
        serde_json::from_str(json).map_err(|err| BindError::InvalidChain(err.to_string()))
    }

    /// Validates the descriptor before registration.
    ///
    /// The prefix must be non-empty lowercase `[a-z0-9_]` (it feeds both
    /// resource ids and env var names), and both namespaces must be present.
    pub fn validate(&self) -> BindResult<()> {
        if self.prefix.is_empty() {
            return Err(BindError::InvalidChain("prefix must not be empty".into()));
        }
        if !self
            .prefix
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(BindError::InvalidChain(format!(
                "prefix {:?} must match [a-z0-9_]+",
                self.prefix
            )));
        }
        if self.entity_namespace.is_empty() {
            return Err(BindError::InvalidChain(
                "entity namespace must not be empty".into(),
            ));
        }
        if self.service_namespace.is_empty() {
            return Err(BindError::InvalidChain(
                "service namespace must not be empty".into(),
            ));
        }
        Ok(())
    }
}
