//! Component registry
//!
//! Registration is the point where a component type becomes usable. The
//! declaration is validated first; a component that fails validation never
//! enters the registry, and since instances can only be created from a
//! [`ValidatedComponent`], no instance of it can exist.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::contract::{Component, ComponentDescriptor, ContractValidator};
use crate::error::ContractViolation;

/// A component declaration that passed contract validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedComponent {
    descriptor: Arc<ComponentDescriptor>,
}

impl ValidatedComponent {
    /// Validate a [`Component`] implementation
    pub fn of<T: Component>(validator: &ContractValidator) -> Result<Self, ContractViolation> {
        Self::from_descriptor(validator, ComponentDescriptor::of::<T>())
    }

    /// Validate a descriptor, e.g. one read from a manifest
    pub fn from_descriptor(
        validator: &ContractValidator,
        descriptor: ComponentDescriptor,
    ) -> Result<Self, ContractViolation> {
        validator.validate(&descriptor)?;
        Ok(Self {
            descriptor: Arc::new(descriptor),
        })
    }

    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn descriptor(&self) -> &ComponentDescriptor {
        &self.descriptor
    }
}

/// Registered component types, keyed by name
pub struct ComponentRegistry {
    validator: ContractValidator,
    components: BTreeMap<String, ValidatedComponent>,
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("components", &self.names())
            .finish()
    }
}

impl ComponentRegistry {
    /// Create a registry using the default contract rules
    pub fn new() -> Self {
        Self::with_validator(ContractValidator::new())
    }

    /// Create a registry with a custom validator
    pub fn with_validator(validator: ContractValidator) -> Self {
        Self {
            validator,
            components: BTreeMap::new(),
        }
    }

    /// Validate and register a component type
    pub fn register<T: Component>(&mut self) -> Result<ValidatedComponent, ContractViolation> {
        self.register_descriptor(ComponentDescriptor::of::<T>())
    }

    /// Validate and register a component declaration
    ///
    /// On failure the registry is left untouched. Registering a name twice
    /// replaces the earlier declaration.
    pub fn register_descriptor(
        &mut self,
        descriptor: ComponentDescriptor,
    ) -> Result<ValidatedComponent, ContractViolation> {
        let component = ValidatedComponent::from_descriptor(&self.validator, descriptor)?;

        if self.components.contains_key(component.name()) {
            tracing::warn!(component = component.name(), "Replacing registered component");
        }
        tracing::info!(
            component = component.name(),
            handlers = component.descriptor().handlers.len(),
            "Registered component"
        );

        self.components
            .insert(component.name().to_string(), component.clone());
        Ok(component)
    }

    /// Look up a registered component
    pub fn get(&self, name: &str) -> Option<&ValidatedComponent> {
        self.components.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<&str> {
        self.components.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}
