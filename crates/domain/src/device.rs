//! Device — a controlled piece of equipment with activation/deactivation
//! steps and a local key-name → action mapping.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::error::CatalogError;
use crate::id::DeviceId;

/// A controlled device.
///
/// Identity is [`Device::id`]; activities and the device-mapping handler
/// refer to devices by id and look them up in the owning
/// [`Catalog`](crate::catalog::Catalog).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    /// Steps run, in order, when the device becomes a participant.
    #[serde(default, alias = "activation")]
    pub activation_steps: Vec<Action>,
    /// Steps run, in order, when the device stops being a participant.
    #[serde(default, alias = "deactivation")]
    pub deactivation_steps: Vec<Action>,
    #[serde(default)]
    pub mappings: HashMap<String, Action>,
}

impl Device {
    /// Create a builder for constructing a [`Device`].
    #[must_use]
    pub fn builder() -> DeviceBuilder {
        DeviceBuilder::default()
    }

    /// Look up the action mapped to a local key name.
    #[must_use]
    pub fn mapping(&self, name: &str) -> Option<&Action> {
        self.mappings.get(name)
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::EmptyId`] when `id` is empty.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.id.is_empty() {
            return Err(CatalogError::EmptyId { kind: "device" });
        }
        Ok(())
    }
}

/// Step-by-step builder for [`Device`].
#[derive(Debug, Default)]
pub struct DeviceBuilder {
    id: Option<DeviceId>,
    activation_steps: Vec<Action>,
    deactivation_steps: Vec<Action>,
    mappings: HashMap<String, Action>,
}

impl DeviceBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<DeviceId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn activation(mut self, action: Action) -> Self {
        self.activation_steps.push(action);
        self
    }

    #[must_use]
    pub fn deactivation(mut self, action: Action) -> Self {
        self.deactivation_steps.push(action);
        self
    }

    #[must_use]
    pub fn mapping(mut self, name: impl Into<String>, action: Action) -> Self {
        self.mappings.insert(name.into(), action);
        self
    }

    /// Consume the builder, validate, and return a [`Device`].
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::EmptyId`] if `id` is missing or empty.
    pub fn build(self) -> Result<Device, CatalogError> {
        let device = Device {
            id: self.id.unwrap_or_else(|| DeviceId::new("")),
            activation_steps: self.activation_steps,
            deactivation_steps: self.deactivation_steps,
            mappings: self.mappings,
        };
        device.validate()?;
        Ok(device)
    }
}
