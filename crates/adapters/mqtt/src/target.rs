//! `mqtt://host[:port]/topic` addressing.

/// Broker port used when the target has none.
pub const DEFAULT_PORT: u16 = 1883;

/// Broker address plus topic extracted from an `mqtt:` scheme-specific part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerTarget {
    pub host: String,
    pub port: u16,
    /// Topic without the leading `/`.
    pub topic: String,
}

impl BrokerTarget {
    /// Parse `//host[:port]/topic/path`.
    ///
    /// # Errors
    ///
    /// Returns a short reason when the host or topic is missing or the port
    /// is not a number.
    pub fn parse(ssp: &str) -> Result<Self, &'static str> {
        let rest = ssp
            .strip_prefix("//")
            .ok_or("expected //HOST[:PORT]/TOPIC")?;
        let (authority, topic) = rest.split_once('/').ok_or("missing topic")?;
        if topic.is_empty() {
            return Err("missing topic");
        }
        let (host, port) = match authority.rsplit_once(':') {
            Some((host, port)) => (host, port.parse().map_err(|_| "invalid port")?),
            None => (authority, DEFAULT_PORT),
        };
        if host.is_empty() {
            return Err("missing host");
        }
        Ok(Self {
            host: host.to_string(),
            port,
            topic: topic.to_string(),
        })
    }

    /// `host:port`, used as the client cache key and in logs.
    #[must_use]
    pub fn broker(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
