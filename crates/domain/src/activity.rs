//! Activity — a named, switchable mode over a set of participant devices.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::action::Action;
use crate::error::CatalogError;
use crate::id::{ActivityId, DeviceId};

/// A switchable mode (e.g. "watch TV") that activates a specific set of
/// devices and exposes a local command-name → action mapping for the `cmd`
/// scheme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,
    #[serde(default)]
    pub description: String,
    /// Participant devices, by id, in activation order.
    #[serde(default)]
    pub participants: Vec<DeviceId>,
    /// Steps run after the participants are live.
    #[serde(default, alias = "setup")]
    pub setup_steps: Vec<Action>,
    #[serde(default)]
    pub mappings: HashMap<String, Action>,
}

impl Activity {
    /// Create a builder for constructing an [`Activity`].
    #[must_use]
    pub fn builder() -> ActivityBuilder {
        ActivityBuilder::default()
    }

    /// Look up the action mapped to a local command name.
    #[must_use]
    pub fn mapping(&self, command: &str) -> Option<&Action> {
        self.mappings.get(command)
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::EmptyId`] when `id` is empty.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.id.is_empty() {
            return Err(CatalogError::EmptyId { kind: "activity" });
        }
        Ok(())
    }
}

/// Step-by-step builder for [`Activity`].
#[derive(Debug, Default)]
pub struct ActivityBuilder {
    id: Option<ActivityId>,
    description: String,
    participants: Vec<DeviceId>,
    setup_steps: Vec<Action>,
    mappings: HashMap<String, Action>,
}

impl ActivityBuilder {
    #[must_use]
    pub fn id(mut self, id: impl Into<ActivityId>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn participant(mut self, device: impl Into<DeviceId>) -> Self {
        self.participants.push(device.into());
        self
    }

    #[must_use]
    pub fn setup(mut self, action: Action) -> Self {
        self.setup_steps.push(action);
        self
    }

    #[must_use]
    pub fn mapping(mut self, command: impl Into<String>, action: Action) -> Self {
        self.mappings.insert(command.into(), action);
        self
    }

    /// Consume the builder, validate, and return an [`Activity`].
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::EmptyId`] if `id` is missing or empty.
    pub fn build(self) -> Result<Activity, CatalogError> {
        let activity = Activity {
            id: self.id.unwrap_or_else(|| ActivityId::new("")),
            description: self.description,
            participants: self.participants,
            setup_steps: self.setup_steps,
            mappings: self.mappings,
        };
        activity.validate()?;
        Ok(activity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_build_activity_with_participants_in_order() {
        let activity = Activity::builder()
            .id("watch-tv")
            .description("Television with surround sound")
            .participant("tv")
            .participant("receiver")
            .setup(Action::parse("device:receiver:input-tv").unwrap())
            .build()
            .unwrap();

        assert_eq!(
            activity.participants,
            vec![DeviceId::new("tv"), DeviceId::new("receiver")]
        );
        assert_eq!(activity.setup_steps.len(), 1);
    }

    #[test]
    fn should_return_validation_error_when_id_missing() {
        let result = Activity::builder().participant("tv").build();
        assert_eq!(result, Err(CatalogError::EmptyId { kind: "activity" }));
    }

    #[test]
    fn should_resolve_local_command_mapping() {
        let activity = Activity::builder()
            .id("watch-tv")
            .mapping("volume-up", Action::parse("device:tv:vol-up").unwrap())
            .build()
            .unwrap();

        assert_eq!(
            activity.mapping("volume-up").map(ToString::to_string),
            Some("device:tv:vol-up".to_string())
        );
    }

    #[test]
    fn should_deserialize_from_toml_with_setup_alias() {
        let activity: Activity = toml::from_str(
            "
            id = 'radio'
            participants = ['receiver']
            setup = ['device:receiver:input-tuner']

            [mappings]
            next = 'device:receiver:preset-up'
            ",
        )
        .unwrap();

        assert_eq!(activity.id.as_str(), "radio");
        assert_eq!(activity.setup_steps.len(), 1);
        assert!(activity.mapping("next").is_some());
        assert!(activity.description.is_empty());
    }
}
