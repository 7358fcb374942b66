//! MQTT handler configuration.

use std::time::Duration;

use serde::Deserialize;

/// Parameters of one `[[handlers.mqtt]]` table.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    /// Scheme the handler is registered under.
    pub id: String,
    /// MQTT client identifier used for every broker connection.
    pub client_id: String,
    /// Keep-alive interval in seconds.
    pub keep_alive_secs: u16,
    /// Longest wait for an acknowledgement on `result_topic`, in milliseconds.
    pub max_delay_ms: u64,
    /// Topic a device publishes to once it has executed a command.
    pub result_topic: Option<String>,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            id: "mqtt".to_string(),
            client_id: "nexus".to_string(),
            keep_alive_secs: 30,
            max_delay_ms: 250,
            result_topic: None,
        }
    }
}

impl MqttConfig {
    #[must_use]
    pub fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }

    #[must_use]
    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(u64::from(self.keep_alive_secs))
    }
}
