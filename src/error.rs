//! Error types for the binding resolver.

use std::fmt;
use std::sync::Arc;

/// Binding resolution errors
///
/// Represents the error conditions that can occur while registering resource
/// chains, running binding passes, or materializing chain resources.
///
/// Most pass-level problems are deliberately *not* errors: a definition whose
/// type cannot be introspected is skipped, a secondary binding whose target
/// does not exist is ignored, and a registry lookup outside its namespace
/// returns an absent result. The variants below cover the cases that must be
/// loud: asking the resource facade for an id that was never registered,
/// misconfigured chains or environment values, and deferred construction
/// failures surfacing at first use.
///
/// # Examples
///
/// ```rust
/// use manifold_di::{BindError, ContainerBuilder};
///
/// let container = ContainerBuilder::new();
/// match container.resource("db.reports_connection") {
///     Err(BindError::NotFound(id)) => {
///         assert_eq!(id, "db.reports_connection");
///     }
///     _ => unreachable!(),
/// }
/// ```
#[derive(Debug, Clone)]
pub enum BindError {
    /// Resource id was never registered (explicit lookup miss)
    NotFound(String),
    /// A second marker was registered for the same implementation type
    DuplicateMarker(String),
    /// Environment or configuration value could not be parsed
    InvalidParameter {
        /// Variable or field name
        name: String,
        /// The offending raw value
        value: String,
    },
    /// Chain descriptor failed validation
    InvalidChain(String),
    /// Deferred resource construction failed at first use
    ConstructionFailed {
        /// Resource id that failed to materialize
        resource: String,
        /// Underlying driver/collaborator error
        source: Arc<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindError::NotFound(id) => write!(f, "Resource not found: {}", id),
            BindError::DuplicateMarker(ty) => {
                write!(f, "Duplicate manager marker for type: {}", ty)
            }
            BindError::InvalidParameter { name, value } => {
                write!(f, "Invalid parameter {}: {:?}", name, value)
            }
            BindError::InvalidChain(msg) => write!(f, "Invalid chain: {}", msg),
            BindError::ConstructionFailed { resource, source } => {
                write!(f, "Construction of {} failed: {}", resource, source)
            }
        }
    }
}

impl std::error::Error for BindError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BindError::ConstructionFailed { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

/// Result type for binding operations
///
/// A convenience type alias for `Result<T, BindError>` used throughout
/// manifold-di, following the common Rust pattern of a crate-specific Result
/// type to reduce boilerplate in function signatures.
///
/// # Examples
///
/// ```rust
/// use manifold_di::{BindResult, BindError};
///
/// fn lookup(id: &str) -> BindResult<String> {
///     if id.is_empty() {
///         return Err(BindError::NotFound(id.to_string()));
///     }
///     Ok(id.to_string())
/// }
///
/// assert!(lookup("orm.default_manager").is_ok());
/// assert!(lookup("").is_err());
/// ```
pub type BindResult<T> = Result<T, BindError>;
