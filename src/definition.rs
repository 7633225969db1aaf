//! Service definitions for the object graph under construction.

use std::collections::BTreeMap;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::key::{BindingKey, ResourceRef};

#[cfg(feature = "smallvec")]
pub(crate) type ParamVec = smallvec::SmallVec<[ConstructorParam; 4]>;
#[cfg(not(feature = "smallvec"))]
pub(crate) type ParamVec = Vec<ConstructorParam>;

/// One constructor parameter of an implementation type.
///
/// Signatures are computed ahead of time by whatever static registration
/// mechanism builds the object graph and attached to the definition; the
/// passes never introspect types at runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct ConstructorParam {
    /// Parameter name as declared, e.g. `entityManager`
    pub name: String,
    /// Declared parameter type, e.g. `Orm.EntityManager`
    pub declared_type: String,
}

impl ConstructorParam {
    /// Creates a parameter from name and declared type.
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
        }
    }
}

/// Out-of-band marking attached to a definition.
///
/// Tags carry a name and free-form string attributes. The binding passes tag
/// every definition they touch so tooling can query what was wired and by
/// which chain (see [`ContainerBuilder::find_tagged`]).
///
/// [`ContainerBuilder::find_tagged`]: crate::ContainerBuilder::find_tagged
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
pub struct Tag {
    /// Tag name, e.g. `manifold.dedicated`
    pub name: String,
    /// Tag attributes
    pub attributes: BTreeMap<String, String>,
}

impl Tag {
    /// Creates a tag with no attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Adds an attribute to the tag.
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// One entry in the object graph being built.
///
/// Definitions are created by the host container before the passes run and
/// mutated in place by the injection passes: bindings and tags are added,
/// nothing is ever removed. Pre-existing bindings represent explicit user
/// configuration and are never overwritten by the name-based pass.
///
/// The constructor signature is an ahead-of-time table. `signature: None`
/// models a type that could not be loaded or introspected at graph
/// construction time; the passes treat such definitions as having no
/// injectable parameters and skip them without failing.
///
/// # Examples
///
/// ```rust
/// use manifold_di::{ConstructorParam, ServiceDefinition};
///
/// let def = ServiceDefinition::new("app.customer.service", "App.Customer.Service")
///     .with_signature(vec![
///         ConstructorParam::new("registry", "Orm.EntityRegistry"),
///         ConstructorParam::new("entityManager", "Orm.EntityManager"),
///         ConstructorParam::new("logger", "App.Logger"),
///     ]);
///
/// assert_eq!(def.id, "app.customer.service");
/// assert_eq!(def.signature.as_ref().unwrap().len(), 3);
/// assert!(def.bindings.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct ServiceDefinition {
    /// Unique string key in the container
    pub id: String,
    /// Concrete type this definition instantiates, absent for factory/alias
    /// only definitions
    pub implementation_type: Option<String>,
    /// Abstract definitions are never injection targets
    pub is_abstract: bool,
    /// Interface definitions are never injection targets
    pub is_interface: bool,
    /// Ordered constructor parameters; `None` when the type is not loadable
    pub signature: Option<ParamVec>,
    /// Parameter/type bindings; pre-existing entries always win over inferred
    /// ones
    pub bindings: BTreeMap<BindingKey, ResourceRef>,
    /// Out-of-band markings
    pub tags: Vec<Tag>,
}

impl ServiceDefinition {
    /// Creates a concrete definition with the given id and implementation type.
    ///
    /// The definition starts with an empty (but present) signature, no
    /// bindings, and no tags.
    pub fn new(id: impl Into<String>, implementation_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            implementation_type: Some(implementation_type.into()),
            is_abstract: false,
            is_interface: false,
            signature: Some(ParamVec::new()),
            bindings: BTreeMap::new(),
            tags: Vec::new(),
        }
    }

    /// Creates a definition with no implementation type (factory or alias
    /// backed).
    pub fn untyped(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            implementation_type: None,
            is_abstract: false,
            is_interface: false,
            signature: None,
            bindings: BTreeMap::new(),
            tags: Vec::new(),
        }
    }

    /// Replaces the constructor signature table.
    pub fn with_signature(mut self, params: impl IntoIterator<Item = ConstructorParam>) -> Self {
        self.signature = Some(params.into_iter().collect());
        self
    }

    /// Marks the signature as unavailable (type not loadable).
    pub fn without_signature(mut self) -> Self {
        self.signature = None;
        self
    }

    /// Marks the definition abstract.
    pub fn abstract_definition(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Marks the definition as an interface.
    pub fn interface_definition(mut self) -> Self {
        self.is_interface = true;
        self
    }

    /// Adds a pre-existing binding (explicit user configuration).
    pub fn with_binding(mut self, key: BindingKey, target: impl Into<ResourceRef>) -> Self {
        self.bindings.insert(key, target.into());
        self
    }

    /// Adds a tag.
    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tags.push(tag);
        self
    }

    /// Returns the first tag with the given name, if any.
    pub fn tag(&self, name: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.name == name)
    }

    /// Returns the binding target for a key, if bound.
    pub fn binding(&self, key: &BindingKey) -> Option<&ResourceRef> {
        self.bindings.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_produces_concrete_definition() {
        let def = ServiceDefinition::new("app.svc", "App.Svc")
            .with_signature(vec![ConstructorParam::new("connection", "Db.Connection")]);
        assert_eq!(def.implementation_type.as_deref(), Some("App.Svc"));
        assert!(!def.is_abstract);
        assert_eq!(def.signature.as_ref().unwrap()[0].name, "connection");
    }

    #[test]
    fn untyped_definition_has_no_signature() {
        let def = ServiceDefinition::untyped("app.alias");
        assert!(def.implementation_type.is_none());
        assert!(def.signature.is_none());
    }

    #[test]
    fn tag_lookup_finds_first_occurrence() {
        let def = ServiceDefinition::new("app.svc", "App.Svc")
            .with_tag(Tag::new("marked").with_attribute("chain", "customer"))
            .with_tag(Tag::new("marked").with_attribute("chain", "reports"));
        assert_eq!(
            def.tag("marked").unwrap().attributes.get("chain").unwrap(),
            "customer"
        );
        assert!(def.tag("absent").is_none());
    }
}
