//! Binding key types for service definitions.

use std::fmt;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// Key for binding storage and lookup on a service definition.
///
/// A binding associates a constructor argument with the resource id the host
/// container should inject for it. Arguments can be addressed two ways, which
/// is why this is an enum rather than a bare string:
///
/// - **Parameter**: by exact constructor parameter name. Used by the
///   name-based injection pass, which matches parameters named after the
///   fixed resource roles (`registry`, `entityManager`, `connection`).
/// - **Type**: by declared parameter type. Used by the marker-based injection
///   pass, which binds the manager through its declared type regardless of
///   what the parameter is called.
///
/// # Examples
///
/// ```rust
/// use manifold_di::{BindingKey, ResourceRef, ServiceDefinition};
///
/// let mut def = ServiceDefinition::new("app.customer.service", "App.Customer.Service");
/// def.bindings.insert(
///     BindingKey::parameter("connection"),
///     ResourceRef::new("db.customer_connection"),
/// );
/// def.bindings.insert(
///     BindingKey::typed("Orm.EntityManager"),
///     ResourceRef::new("orm.customer_manager"),
/// );
///
/// assert!(def.bindings.contains_key(&BindingKey::parameter("connection")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub enum BindingKey {
    /// Constructor parameter name, e.g. `entityManager`
    Parameter(String),
    /// Declared parameter type, e.g. `Orm.EntityManager`
    Type(String),
}

impl BindingKey {
    /// Creates a parameter-name key.
    pub fn parameter(name: impl Into<String>) -> Self {
        BindingKey::Parameter(name.into())
    }

    /// Creates a declared-type key.
    pub fn typed(type_name: impl Into<String>) -> Self {
        BindingKey::Type(type_name.into())
    }

    /// Get the parameter name or type name for display.
    pub fn display_name(&self) -> &str {
        match self {
            BindingKey::Parameter(name) => name,
            BindingKey::Type(name) => name,
        }
    }

    /// Returns true for declared-type keys.
    pub fn is_type(&self) -> bool {
        matches!(self, BindingKey::Type(_))
    }
}

impl fmt::Display for BindingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingKey::Parameter(name) => write!(f, "${}", name),
            BindingKey::Type(name) => write!(f, "{}", name),
        }
    }
}

/// Reference to a registered resource or service id.
///
/// The value side of a binding: the id the host container resolves when it
/// instantiates the definition. This is a plain id reference, not a handle;
/// resources stay lazy until the facade materializes them.
///
/// # Examples
///
/// ```rust
/// use manifold_di::ResourceRef;
///
/// let manager = ResourceRef::new("orm.customer_manager");
/// assert_eq!(manager.id(), "orm.customer_manager");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct ResourceRef(String);

impl ResourceRef {
    /// Creates a reference to the given resource id.
    pub fn new(id: impl Into<String>) -> Self {
        ResourceRef(id.into())
    }

    /// The referenced resource id.
    pub fn id(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.0)
    }
}

impl From<&str> for ResourceRef {
    fn from(id: &str) -> Self {
        ResourceRef::new(id)
    }
}

impl From<String> for ResourceRef {
    fn from(id: String) -> Self {
        ResourceRef(id)
    }
}
