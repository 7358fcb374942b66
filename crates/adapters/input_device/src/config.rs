//! Input-device connector configuration.

use std::path::PathBuf;
use std::time::Duration;

use nexus_app::normalizer::Timing;
use serde::Deserialize;

use crate::error::InputDeviceError;

fn default_long_press_ms() -> u64 {
    1000
}

/// Parameters of one `[[connectors.input-device]]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InputDeviceConfig {
    /// Source id used in emitted identifiers (`input-device:<id>:…`).
    pub id: String,
    /// Event device to read, e.g. `/dev/input/by-id/usb-remote-event-kbd`.
    pub device: PathBuf,
    /// Hold time after which `long-pressed` is emitted, in milliseconds.
    #[serde(default = "default_long_press_ms")]
    pub long_press_ms: u64,
}

impl InputDeviceConfig {
    /// Check that required values are usable.
    ///
    /// # Errors
    ///
    /// Returns [`InputDeviceError::EmptyId`] when `id` is blank.
    pub fn validate(&self) -> Result<(), InputDeviceError> {
        if self.id.trim().is_empty() {
            return Err(InputDeviceError::EmptyId);
        }
        Ok(())
    }

    /// Timing profile handed to the normalizer. The kernel reports its own
    /// auto-repeat, so no synthetic repeat is configured.
    #[must_use]
    pub fn timing(&self) -> Timing {
        Timing {
            long_press: Duration::from_millis(self.long_press_ms),
            repeat: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_deserialize_from_toml() {
        let toml = r#"
            id = "remote"
            device = "/dev/input/event3"
        "#;
        let config: InputDeviceConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.id, "remote");
        assert_eq!(config.device, PathBuf::from("/dev/input/event3"));
        assert_eq!(config.long_press_ms, 1000);
        assert_eq!(config.timing().repeat, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn should_require_device() {
        let result: Result<InputDeviceConfig, _> = toml::from_str(r#"id = "remote""#);
        assert!(result.is_err());
    }

    #[test]
    fn should_reject_blank_id() {
        let config: InputDeviceConfig =
            toml::from_str("id = \" \"\ndevice = \"/dev/input/event0\"").unwrap();
        assert!(matches!(config.validate(), Err(InputDeviceError::EmptyId)));
    }
}
