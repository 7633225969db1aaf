//! # manifold-di
//!
//! Prefix-scoped database resource chains and convention-based binding
//! passes for dependency injection containers.
//!
//! ## Features
//!
//! - **Dedicated resource chains**: one factory → connection → manager →
//!   registry chain per prefix, registered idempotently
//! - **Environment overrides**: per-prefix `{PREFIX}_DB_*` variables loaded
//!   once into explicit snapshots, with safe database-name suffix derivation
//! - **Name-based injection**: constructor parameters named `registry`,
//!   `entityManager`, or `connection` bound to the chain's resources without
//!   ever overriding explicit configuration
//! - **Marker-based injection**: per-type manager declarations bound through
//!   the declared type, with typed aliases and repository side-bindings
//! - **Lazy materialization**: nothing connects at registration time;
//!   failures surface at first use with the driver cause attached
//!
//! ## Quick Start
//!
//! ```rust
//! use manifold_di::{
//!     AppEnv, BindingKey, BindingResolver, ChainConfig, ConnectionParams, ConstructorParam,
//!     ContainerBuilder, EnvOverrides, ServiceDefinition,
//! };
//!
//! // The host container hands over its object graph: definitions with
//! // ahead-of-time constructor signatures.
//! let mut container = ContainerBuilder::new();
//! container.register_default_connection(ConnectionParams::default().with_dbname("app"));
//! container.register_definition(
//!     ServiceDefinition::new("app.customer.service", "App.Customer.Service").with_signature(
//!         vec![
//!             ConstructorParam::new("registry", "Orm.EntityRegistry"),
//!             ConstructorParam::new("entityManager", "Orm.EntityManager"),
//!             ConstructorParam::new("logger", "App.Logger"),
//!         ],
//!     ),
//! );
//!
//! // One resolver per chain: registers the chain, then wires eligible
//! // definitions in the chain's service namespace.
//! let chain = ChainConfig::new("customer", "src/Customer/Entity", "App.Customer");
//! BindingResolver::new(chain, EnvOverrides::none(), AppEnv::production())
//!     .run(&mut container)
//!     .unwrap();
//!
//! let def = container.definition("app.customer.service").unwrap();
//! assert_eq!(
//!     def.binding(&BindingKey::parameter("registry")).unwrap().id(),
//!     "customer.registry"
//! );
//! assert_eq!(
//!     def.binding(&BindingKey::parameter("entityManager")).unwrap().id(),
//!     "orm.customer_manager"
//! );
//! assert!(def.binding(&BindingKey::parameter("logger")).is_none());
//! ```
//!
//! ## Registry narrowing
//!
//! Each chain's registry only claims entities under its own namespace:
//!
//! ```rust
//! use manifold_di::{ChainConfig, ConnectionFactory, ConnectionParams, EntityRegistry};
//! use std::sync::Arc;
//!
//! let chain = ChainConfig::new("billing", "src/Billing/Entity", "Acme.Billing");
//! let factory = Arc::new(ConnectionFactory::new(&chain, ConnectionParams::default(), false));
//! let registry = EntityRegistry::new(&chain, factory);
//!
//! assert!(registry.manager_for("Acme.Billing.Invoice").unwrap().is_some());
//! assert!(registry.manager_for("Acme.Shipping.Label").unwrap().is_none());
//! ```
//!
//! ## Precedence rules
//!
//! The two injection passes deliberately differ. The name-based pass infers
//! bindings, so anything the user configured wins; the marker-based pass
//! executes explicit declarations, so the marker wins:
//!
//! ```rust
//! use manifold_di::{
//!     BindingKey, ContainerBuilder, ContainerBuilderPassExt, ManagerMarker, MarkerBindingPass,
//!     ServiceDefinition,
//! };
//!
//! let mut container = ContainerBuilder::new();
//! container.register_definition(
//!     ServiceDefinition::new("app.svc", "App.Svc")
//!         .with_binding(BindingKey::typed("Orm.EntityManager"), "orm.old_manager"),
//! );
//! container
//!     .register_marker("App.Svc", ManagerMarker::named("reports"))
//!     .unwrap();
//! container.run_pass(MarkerBindingPass::new()).unwrap();
//!
//! let def = container.definition("app.svc").unwrap();
//! assert_eq!(
//!     def.binding(&BindingKey::typed("Orm.EntityManager")).unwrap().id(),
//!     "orm.reports_manager"
//! );
//! ```

// Module declarations
pub mod chain;
pub mod container;
pub mod definition;
pub mod error;
pub mod key;
pub mod marker;
pub mod observer;
pub mod passes;
pub mod resources;
pub mod settings;

// Re-export core types
pub use chain::{
    ChainConfig, CONNECTION_TYPE, DEFAULT_CONNECTION_ID, FACTORY_TYPE, MANAGER_TYPE, REGISTRY_TYPE,
};
pub use container::ContainerBuilder;
pub use definition::{ConstructorParam, ServiceDefinition, Tag};
pub use error::{BindError, BindResult};
pub use key::{BindingKey, ResourceRef};
pub use marker::ManagerMarker;
pub use observer::{LoggingObserver, PassObserver};
pub use passes::{
    BindingResolver, CompilerPass, ContainerBuilderPassExt, DedicatedChainPass, ManagerProvisioner,
    MarkerBindingPass, NameBindingPass, NoopProvisioner, DEDICATED_TAG,
};
pub use resources::{
    ConnectionFactory, ConnectionHandle, ConnectionOpener, EntityRegistry, ManagerHandle,
    Resource, ResourceEntry,
};
pub use settings::{
    AppEnv, ConnectionParams, EnvOverrides, DEFAULT_CHARSET, DEFAULT_DRIVER,
};
