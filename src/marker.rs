//! Manager markers: declarative per-type manager selection.

use std::collections::BTreeSet;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// Declarative marker selecting a manager for an implementation type.
///
/// The marker is the side-table variant of a class-level attribute: at most
/// one marker may be registered per implementation type, populated during
/// static configuration of the graph rather than scanned at runtime. The
/// marker-based injection pass binds the manager named here through its
/// declared type, which (unlike the name-based pass) overwrites any
/// pre-existing binding for that type key: a marker is explicit configuration,
/// not inference.
///
/// `secondary_bindings` lists class names of repositories to bind alongside
/// the manager, resolved against
/// `orm.{manager_name}_manager.repository.{sanitized class name}` and skipped
/// silently when no such resource exists.
///
/// # Examples
///
/// ```rust
/// use manifold_di::ManagerMarker;
///
/// let marker = ManagerMarker::named("customer")
///     .lazy()
///     .with_secondary_binding("App.Customer.InvoiceRepository");
///
/// assert_eq!(marker.manager_name, "customer");
/// assert!(marker.lazy);
/// assert_eq!(marker.secondary_bindings.len(), 1);
///
/// // Default marker targets the "default" manager
/// assert_eq!(ManagerMarker::default().manager_name, "default");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct ManagerMarker {
    /// Manager identifier, expanded to `orm.{manager_name}_manager`
    pub manager_name: String,
    /// Request lazy manager references from the host container
    pub lazy: bool,
    /// Repository class names to bind alongside the manager
    pub secondary_bindings: BTreeSet<String>,
}

impl ManagerMarker {
    /// Creates a marker for the given manager name.
    pub fn named(manager_name: impl Into<String>) -> Self {
        Self {
            manager_name: manager_name.into(),
            lazy: false,
            secondary_bindings: BTreeSet::new(),
        }
    }

    /// Requests a lazy manager reference.
    pub fn lazy(mut self) -> Self {
        self.lazy = true;
        self
    }

    /// Adds a secondary repository binding by class name.
    pub fn with_secondary_binding(mut self, class_name: impl Into<String>) -> Self {
        self.secondary_bindings.insert(class_name.into());
        self
    }

    /// The resource id of the manager this marker selects.
    pub fn manager_id(&self) -> String {
        format!("orm.{}_manager", self.manager_name)
    }
}

impl Default for ManagerMarker {
    fn default() -> Self {
        Self::named("default")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manager_id_expands_name() {
        assert_eq!(ManagerMarker::named("reports").manager_id(), "orm.reports_manager");
        assert_eq!(ManagerMarker::default().manager_id(), "orm.default_manager");
    }
}
