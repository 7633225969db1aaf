//! Diagnostic observers for binding-pass traceability.
//!
//! The passes run once, silently, during container build; observers are the
//! hook for seeing what they did. Register one on the container to trace
//! which chains were registered, which definitions received bindings, and
//! which were skipped and why.

use std::sync::Arc;

use crate::key::BindingKey;

/// Observer trait for binding-pass events.
///
/// Observer calls are made synchronously while a pass runs. Keep
/// implementations lightweight; the container build is a one-shot startup
/// phase but can cover thousands of definitions.
///
/// # Examples
///
/// ```rust
/// use manifold_di::{BindingKey, ContainerBuilder, PassObserver};
/// use std::sync::Arc;
///
/// struct CountingObserver;
///
/// impl PassObserver for CountingObserver {
///     fn chain_registered(&self, prefix: &str) {
///         println!("chain up: {}", prefix);
///     }
///
///     fn bindings_added(&self, definition_id: &str, added: &[BindingKey]) {
///         println!("{} got {} bindings", definition_id, added.len());
///     }
/// }
///
/// let mut container = ContainerBuilder::new();
/// container.add_observer(Arc::new(CountingObserver));
/// ```
pub trait PassObserver: Send + Sync {
    /// Called after a chain's four resources are registered (or found
    /// already present) for a prefix.
    fn chain_registered(&self, prefix: &str);

    /// Called when a pass adds bindings to a definition.
    fn bindings_added(&self, definition_id: &str, added: &[BindingKey]);

    /// Called when a chain resource id already existed and registration was
    /// skipped.
    fn resource_skipped(&self, _id: &str) {}

    /// Called when a definition is passed over, with the reason.
    fn definition_skipped(&self, _definition_id: &str, _reason: &str) {}

    /// Called when a typed alias is registered.
    fn alias_registered(&self, _declared_type: &str, _alias_name: &str, _target_id: &str) {}
}

/// Container for registered observers.
///
/// Holds all registered observers and fans events out to them. Designed to
/// have minimal overhead when no observers are registered.
#[derive(Default, Clone)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn PassObserver>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    pub(crate) fn add(&mut self, observer: Arc<dyn PassObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn chain_registered(&self, prefix: &str) {
        for observer in &self.observers {
            observer.chain_registered(prefix);
        }
    }

    #[inline]
    pub(crate) fn bindings_added(&self, definition_id: &str, added: &[BindingKey]) {
        for observer in &self.observers {
            observer.bindings_added(definition_id, added);
        }
    }

    #[inline]
    pub(crate) fn resource_skipped(&self, id: &str) {
        for observer in &self.observers {
            observer.resource_skipped(id);
        }
    }

    #[inline]
    pub(crate) fn definition_skipped(&self, definition_id: &str, reason: &str) {
        for observer in &self.observers {
            observer.definition_skipped(definition_id, reason);
        }
    }

    #[inline]
    pub(crate) fn alias_registered(&self, declared_type: &str, alias_name: &str, target_id: &str) {
        for observer in &self.observers {
            observer.alias_registered(declared_type, alias_name, target_id);
        }
    }
}

/// Built-in observer that logs pass events to stdout.
///
/// A simple implementation useful for development and debugging. For
/// production use, implement a custom observer that feeds your own logging
/// infrastructure.
///
/// # Examples
///
/// ```rust
/// use manifold_di::{ContainerBuilder, LoggingObserver};
/// use std::sync::Arc;
///
/// let mut container = ContainerBuilder::new();
/// container.add_observer(Arc::new(LoggingObserver::new()));
/// ```
pub struct LoggingObserver {
    prefix: String,
}

impl LoggingObserver {
    /// Creates a new logging observer with the default prefix.
    pub fn new() -> Self {
        Self {
            prefix: "[manifold-di]".to_string(),
        }
    }

    /// Creates a new logging observer with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl PassObserver for LoggingObserver {
    fn chain_registered(&self, prefix: &str) {
        println!("{} Chain registered: {}", self.prefix, prefix);
    }

    fn bindings_added(&self, definition_id: &str, added: &[BindingKey]) {
        let keys: Vec<String> = added.iter().map(|k| k.to_string()).collect();
        println!(
            "{} Bound {}: {}",
            self.prefix,
            definition_id,
            keys.join(", ")
        );
    }

    fn resource_skipped(&self, id: &str) {
        println!("{} Already registered, skipping: {}", self.prefix, id);
    }

    fn definition_skipped(&self, definition_id: &str, reason: &str) {
        println!("{} Skipped {}: {}", self.prefix, definition_id, reason);
    }

    fn alias_registered(&self, declared_type: &str, alias_name: &str, target_id: &str) {
        println!(
            "{} Alias {} ({}) -> {}",
            self.prefix, alias_name, declared_type, target_id
        );
    }
}
