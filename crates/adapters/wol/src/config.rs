//! Wake-on-LAN handler configuration.

use serde::Deserialize;

/// Parameters of one `[[handlers.wol]]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WolConfig {
    /// Scheme the handler is registered under.
    pub id: String,
    /// UDP destination port of the magic packet.
    pub port: u16,
}

impl Default for WolConfig {
    fn default() -> Self {
        Self {
            id: "wol".to_string(),
            port: 9,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_default_to_discard_port() {
        let config: WolConfig = toml::from_str("").unwrap();
        assert_eq!(config, WolConfig::default());
        assert_eq!(config.port, 9);
    }

    #[test]
    fn should_deserialize_custom_port() {
        let config: WolConfig = toml::from_str("id = \"wake\"\nport = 7").unwrap();
        assert_eq!(config.id, "wake");
        assert_eq!(config.port, 7);
    }
}
