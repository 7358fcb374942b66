//! HTTP handler configuration.

use std::time::Duration;

use serde::Deserialize;

/// Parameters of one `[[handlers.http]]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Scheme the handler is registered under.
    pub id: String,
    /// Whole-request timeout in milliseconds; none when absent.
    pub timeout_ms: Option<u64>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            id: "http".to_string(),
            timeout_ms: None,
        }
    }
}

impl HttpConfig {
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}
