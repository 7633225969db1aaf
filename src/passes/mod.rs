//! Compiler passes over the container builder.
//!
//! This module contains the pass seam plus the three concrete passes:
//! resource chain registration, name-based injection, and marker-based
//! injection, composed by [`BindingResolver`].

use crate::chain::ChainConfig;
use crate::container::ContainerBuilder;
use crate::error::BindResult;
use crate::resources::ConnectionOpener;
use crate::settings::{AppEnv, EnvOverrides};

pub mod chain;
pub mod marker;
pub mod name;

pub use chain::DedicatedChainPass;
pub use marker::{ManagerProvisioner, MarkerBindingPass, NoopProvisioner};
pub use name::NameBindingPass;

/// Tag attached to every definition an injection pass wires up.
pub const DEDICATED_TAG: &str = "manifold.dedicated";

/// A pass that can transform the container builder.
///
/// This trait is the unit of composition for container-build work: each pass
/// reads and mutates the definition set in one synchronous sweep during the
/// one-shot build phase.
///
/// # Example
///
/// ```rust
/// use manifold_di::{
///     BindResult, CompilerPass, ContainerBuilder, ContainerBuilderPassExt, ServiceDefinition,
/// };
///
/// struct StubPass;
///
/// impl CompilerPass for StubPass {
///     fn process(&self, container: &mut ContainerBuilder) -> BindResult<()> {
///         container.register_definition(ServiceDefinition::new("stub", "App.Stub"));
///         Ok(())
///     }
/// }
///
/// # fn main() -> BindResult<()> {
/// let mut container = ContainerBuilder::new();
/// container.run_pass(StubPass)?;
/// assert!(container.has_definition("stub"));
/// # Ok(())
/// # }
/// ```
pub trait CompilerPass {
    /// Runs this pass over the container builder.
    fn process(&self, container: &mut ContainerBuilder) -> BindResult<()>;
}

/// Extension trait for ContainerBuilder that runs passes in place.
pub trait ContainerBuilderPassExt {
    /// Runs a pass, returning the builder for chaining.
    fn run_pass<P: CompilerPass>(&mut self, pass: P) -> BindResult<&mut Self>;
}

impl ContainerBuilderPassExt for ContainerBuilder {
    fn run_pass<P: CompilerPass>(&mut self, pass: P) -> BindResult<&mut Self> {
        pass.process(self)?;
        Ok(self)
    }
}

/// The composed binding resolver for one chain.
///
/// Runs the resource registration pass first (idempotent), then the
/// name-based injection pass over the now-complete definition set, and
/// finally the marker-based injection pass when one is configured.
///
/// # Examples
///
/// ```rust
/// use manifold_di::{
///     AppEnv, BindingKey, BindingResolver, ChainConfig, ConnectionParams, ConstructorParam,
///     ContainerBuilder, EnvOverrides, ServiceDefinition,
/// };
///
/// let mut container = ContainerBuilder::new();
/// container.register_default_connection(ConnectionParams::default().with_dbname("app"));
/// container.register_definition(
///     ServiceDefinition::new("app.customer.service", "App.Customer.Service").with_signature(
///         vec![
///             ConstructorParam::new("registry", "Orm.EntityRegistry"),
///             ConstructorParam::new("entityManager", "Orm.EntityManager"),
///             ConstructorParam::new("logger", "App.Logger"),
///         ],
///     ),
/// );
///
/// let chain = ChainConfig::new("customer", "src/Customer/Entity", "App.Customer");
/// BindingResolver::new(chain, EnvOverrides::none(), AppEnv::production())
///     .run(&mut container)
///     .unwrap();
///
/// let def = container.definition("app.customer.service").unwrap();
/// assert_eq!(
///     def.binding(&BindingKey::parameter("entityManager")).unwrap().id(),
///     "orm.customer_manager"
/// );
/// assert!(def.binding(&BindingKey::parameter("logger")).is_none());
/// ```
pub struct BindingResolver {
    chain: ChainConfig,
    env: EnvOverrides,
    app_env: AppEnv,
    opener: Option<ConnectionOpener>,
    marker_pass: Option<MarkerBindingPass>,
}

impl BindingResolver {
    /// Creates a resolver from explicit configuration snapshots.
    pub fn new(chain: ChainConfig, env: EnvOverrides, app_env: AppEnv) -> Self {
        Self {
            chain,
            env,
            app_env,
            opener: None,
            marker_pass: None,
        }
    }

    /// Creates a resolver, loading the environment snapshots for the chain's
    /// prefix through the dedicated loaders.
    pub fn from_env(chain: ChainConfig) -> BindResult<Self> {
        let env = EnvOverrides::from_env(&chain.prefix)?;
        Ok(Self::new(chain, env, AppEnv::from_env()))
    }

    /// Installs a custom driver boundary on the chain's factory.
    pub fn with_opener(mut self, opener: ConnectionOpener) -> Self {
        self.opener = Some(opener);
        self
    }

    /// Enables the marker-based injection pass.
    pub fn with_marker_pass(mut self, pass: MarkerBindingPass) -> Self {
        self.marker_pass = Some(pass);
        self
    }

    /// Runs the composed passes over the container builder.
    pub fn run(&self, container: &mut ContainerBuilder) -> BindResult<()> {
        let mut chain_pass =
            DedicatedChainPass::new(self.chain.clone(), self.env.clone(), self.app_env);
        if let Some(opener) = &self.opener {
            chain_pass = chain_pass.with_opener_arc(opener.clone());
        }
        chain_pass.process(container)?;

        NameBindingPass::new(self.chain.clone()).process(container)?;

        if let Some(pass) = &self.marker_pass {
            pass.process(container)?;
        }
        Ok(())
    }
}

impl CompilerPass for BindingResolver {
    fn process(&self, container: &mut ContainerBuilder) -> BindResult<()> {
        self.run(container)
    }
}
