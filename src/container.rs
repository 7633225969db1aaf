//! Container builder: the host-container surface the passes operate on.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::chain::DEFAULT_CONNECTION_ID;
use crate::definition::ServiceDefinition;
use crate::error::{BindError, BindResult};
use crate::marker::ManagerMarker;
use crate::observer::{Observers, PassObserver};
use crate::resources::{ConnectionHandle, Resource, ResourceEntry};
use crate::settings::ConnectionParams;

#[cfg(feature = "ahash")]
type Map<K, V> = ahash::AHashMap<K, V>;
#[cfg(not(feature = "ahash"))]
type Map<K, V> = std::collections::HashMap<K, V>;

/// The object graph under construction.
///
/// Holds service definitions, the typed-alias table, the manager-marker
/// side-table, registered runtime resources, and pass observers. This is the
/// abstraction of the host container's registration API consumed by the
/// binding passes. It is not a general-purpose DI container.
///
/// Definitions use replace semantics on re-registration. The resource facade
/// is the one loud surface: [`resource`](Self::resource) on an id that was
/// never registered is a [`BindError::NotFound`], because asking for an
/// unregistered resource by name indicates a programming or configuration
/// error rather than an expected absence.
///
/// # Examples
///
/// ```rust
/// use manifold_di::{ContainerBuilder, ServiceDefinition};
///
/// let mut container = ContainerBuilder::new();
/// container.register_definition(ServiceDefinition::new(
///     "app.customer.service",
///     "App.Customer.Service",
/// ));
///
/// assert!(container.has_definition("app.customer.service"));
/// assert!(container.definition("app.shipping.service").is_none());
/// ```
#[derive(Default)]
pub struct ContainerBuilder {
    definitions: Map<String, ServiceDefinition>,
    aliases: Map<(String, String), String>,
    markers: Map<String, ManagerMarker>,
    resources: Map<String, ResourceEntry>,
    observers: Observers,
}

impl ContainerBuilder {
    /// Creates an empty container builder.
    pub fn new() -> Self {
        Self {
            definitions: Map::default(),
            aliases: Map::default(),
            markers: Map::default(),
            resources: Map::default(),
            observers: Observers::new(),
        }
    }

    // ----- Definitions -----

    /// Registers a definition, replacing any previous one with the same id.
    pub fn register_definition(&mut self, definition: ServiceDefinition) -> &mut Self {
        self.definitions.insert(definition.id.clone(), definition);
        self
    }

    /// Returns the definition for an id, if registered.
    pub fn definition(&self, id: &str) -> Option<&ServiceDefinition> {
        self.definitions.get(id)
    }

    /// Returns a mutable reference to the definition for an id.
    pub fn definition_mut(&mut self, id: &str) -> Option<&mut ServiceDefinition> {
        self.definitions.get_mut(id)
    }

    /// Checks whether a definition id is registered.
    pub fn has_definition(&self, id: &str) -> bool {
        self.definitions.contains_key(id)
    }

    /// All definition ids, sorted for deterministic pass traversal.
    pub fn definition_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.definitions.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Iterator over all definitions.
    pub fn definitions(&self) -> impl Iterator<Item = &ServiceDefinition> {
        self.definitions.values()
    }

    /// Finds definitions carrying a tag, mapping id to the attributes of the
    /// first occurrence of that tag on each definition.
    pub fn find_tagged(&self, tag_name: &str) -> BTreeMap<String, BTreeMap<String, String>> {
        self.definitions
            .values()
            .filter_map(|def| {
                def.tag(tag_name)
                    .map(|tag| (def.id.clone(), tag.attributes.clone()))
            })
            .collect()
    }

    // ----- Typed aliases -----

    /// Registers a discoverable alias: an argument of `declared_type` named
    /// `alias_name` resolves to `target_id`.
    ///
    /// Idempotent: returns `false` and leaves the existing entry untouched
    /// when the (type, name) pair is already registered.
    pub fn register_typed_alias(
        &mut self,
        target_id: impl Into<String>,
        declared_type: impl Into<String>,
        alias_name: impl Into<String>,
    ) -> bool {
        let key = (declared_type.into(), alias_name.into());
        if self.aliases.contains_key(&key) {
            return false;
        }
        self.aliases.insert(key, target_id.into());
        true
    }

    /// Looks up a typed alias target.
    pub fn typed_alias(&self, declared_type: &str, alias_name: &str) -> Option<&str> {
        self.aliases
            .get(&(declared_type.to_string(), alias_name.to_string()))
            .map(String::as_str)
    }

    // ----- Manager markers -----

    /// Attaches a manager marker to an implementation type.
    ///
    /// At most one marker may exist per type; a second registration is a
    /// [`BindError::DuplicateMarker`].
    pub fn register_marker(
        &mut self,
        type_name: impl Into<String>,
        marker: ManagerMarker,
    ) -> BindResult<()> {
        let type_name = type_name.into();
        if self.markers.contains_key(&type_name) {
            return Err(BindError::DuplicateMarker(type_name));
        }
        self.markers.insert(type_name, marker);
        Ok(())
    }

    /// Returns the marker attached to an implementation type, if any.
    pub fn marker_for(&self, type_name: &str) -> Option<&ManagerMarker> {
        self.markers.get(type_name)
    }

    // ----- Resources -----

    /// Registers a runtime resource entry under an id.
    ///
    /// Idempotent: returns `false` and keeps the existing entry when the id
    /// is already registered.
    pub fn insert_resource(&mut self, id: impl Into<String>, entry: ResourceEntry) -> bool {
        let id = id.into();
        if self.resources.contains_key(&id) {
            return false;
        }
        self.resources.insert(id, entry);
        true
    }

    /// Checks whether a resource id is registered.
    pub fn has_resource(&self, id: &str) -> bool {
        self.resources.contains_key(id)
    }

    /// Materializes and returns the resource registered under `id`.
    ///
    /// Unregistered ids fail loudly with [`BindError::NotFound`]. Chain
    /// resources materialize lazily through their factory here, so this is
    /// also where deferred construction failures surface.
    pub fn resource(&self, id: &str) -> BindResult<Resource> {
        let entry = self
            .resources
            .get(id)
            .ok_or_else(|| BindError::NotFound(id.to_string()))?;
        match entry {
            ResourceEntry::Factory(factory) => Ok(Resource::Factory(factory.clone())),
            ResourceEntry::LazyConnection(factory) => {
                factory.create_connection().map(Resource::Connection)
            }
            ResourceEntry::LazyManager(factory) => factory.create_manager().map(Resource::Manager),
            ResourceEntry::Registry(registry) => Ok(Resource::Registry(registry.clone())),
            ResourceEntry::Connection(handle) => Ok(Resource::Connection(handle.clone())),
        }
    }

    /// Registers the global default connection the chains inherit parameters
    /// from, under [`DEFAULT_CONNECTION_ID`].
    pub fn register_default_connection(&mut self, params: ConnectionParams) -> &mut Self {
        self.insert_resource(
            DEFAULT_CONNECTION_ID,
            ResourceEntry::Connection(Arc::new(ConnectionHandle::new(params))),
        );
        self
    }

    // ----- Observers -----

    /// Registers a pass observer.
    pub fn add_observer(&mut self, observer: Arc<dyn PassObserver>) -> &mut Self {
        self.observers.add(observer);
        self
    }

    pub(crate) fn observers(&self) -> Observers {
        self.observers.clone()
    }

    // ----- Diagnostics -----

    /// Renders a human-readable report of every definition's bindings.
    #[cfg(feature = "diagnostics")]
    pub fn dump_bindings(&self) -> String {
        use std::fmt::Write;

        let mut out = String::new();
        for id in self.definition_ids() {
            let def = self.definition(&id).expect("id came from the map");
            let _ = writeln!(
                out,
                "{} ({})",
                id,
                def.implementation_type.as_deref().unwrap_or("<untyped>")
            );
            for (key, target) in &def.bindings {
                let _ = writeln!(out, "  {} -> {}", key, target);
            }
            for tag in &def.tags {
                let _ = writeln!(out, "  #{}", tag.name);
            }
        }
        out
    }
}
