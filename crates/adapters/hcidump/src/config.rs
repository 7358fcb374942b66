//! hcidump connector configuration.

use std::time::Duration;

use nexus_app::normalizer::{RepeatTiming, Timing};
use serde::Deserialize;

/// Parameters of one `[[connectors.hcidump]]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HciDumpConfig {
    /// Source id used in emitted identifiers (`hci:<id>:…`).
    pub id: String,
    /// Program and arguments producing the raw dump on stdout.
    pub command: Vec<String>,
    /// Attribute handles whose notifications are key events.
    pub handles: Vec<u16>,
    /// Hold time after which `long-pressed` is emitted, in milliseconds.
    pub long_press_ms: u64,
    /// Time from press to the first `held`, in milliseconds.
    pub repeat_delay_ms: u64,
    /// Time between `held` events, in milliseconds.
    pub repeat_interval_ms: u64,
}

impl Default for HciDumpConfig {
    fn default() -> Self {
        Self {
            id: "hci".to_string(),
            command: vec!["hcidump".to_string(), "-R".to_string()],
            handles: vec![0x001F, 0x0023],
            long_press_ms: 1000,
            repeat_delay_ms: 500,
            repeat_interval_ms: 50,
        }
    }
}

impl HciDumpConfig {
    /// Timing profile handed to the normalizer.
    #[must_use]
    pub fn timing(&self) -> Timing {
        Timing {
            long_press: Duration::from_millis(self.long_press_ms),
            repeat: Some(RepeatTiming {
                delay: Duration::from_millis(self.repeat_delay_ms),
                interval: Duration::from_millis(self.repeat_interval_ms.max(1)),
            }),
        }
    }
}
