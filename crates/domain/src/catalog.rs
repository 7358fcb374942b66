//! Catalog — the owning store of devices, activities, input mappings and
//! templates loaded from configuration.
//!
//! Devices and activities live here only; everything else refers to them by
//! [`DeviceId`](crate::id::DeviceId) / [`ActivityId`](crate::id::ActivityId).
//! The catalog is read-only at runtime.

use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::activity::Activity;
use crate::device::Device;
use crate::error::CatalogError;
use crate::template::Template;

/// Static configuration data consumed by the core.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Catalog {
    pub devices: Vec<Device>,
    pub activities: Vec<Activity>,
    /// External event identifier → action.
    pub input_mappings: HashMap<String, Action>,
    /// Template name (also its scheme) → template.
    pub templates: BTreeMap<String, Template>,
}

impl Catalog {
    /// Check identity and reference invariants.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] when an id is empty or duplicated, or an
    /// activity references a device that does not exist.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut device_ids = HashSet::new();
        for device in &self.devices {
            device.validate()?;
            if !device_ids.insert(device.id.as_str()) {
                return Err(CatalogError::DuplicateDevice(device.id.to_string()));
            }
        }

        let mut activity_ids = HashSet::new();
        for activity in &self.activities {
            activity.validate()?;
            if !activity_ids.insert(activity.id.as_str()) {
                return Err(CatalogError::DuplicateActivity(activity.id.to_string()));
            }
            if let Some(missing) = activity
                .participants
                .iter()
                .find(|participant| !device_ids.contains(participant.as_str()))
            {
                return Err(CatalogError::UnknownParticipant {
                    activity: activity.id.to_string(),
                    device: missing.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Find a device by id.
    #[must_use]
    pub fn device(&self, id: &str) -> Option<&Device> {
        self.devices.iter().find(|device| device.id.as_str() == id)
    }

    /// Find an activity by id.
    #[must_use]
    pub fn activity(&self, id: &str) -> Option<&Activity> {
        self.activities
            .iter()
            .find(|activity| activity.id.as_str() == id)
    }

    /// Action mapped to an external event identifier.
    #[must_use]
    pub fn input_mapping(&self, identifier: &str) -> Option<&Action> {
        self.input_mappings.get(identifier)
    }
}
