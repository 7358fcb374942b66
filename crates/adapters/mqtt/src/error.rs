//! MQTT adapter error types.

use nexus_domain::error::ResolveError;

/// Errors specific to the MQTT adapter.
#[derive(Debug, thiserror::Error)]
pub enum MqttError {
    /// Subscribing to the acknowledgement topic failed.
    #[error("unable to subscribe to {topic}")]
    Subscribe {
        topic: String,
        #[source]
        source: rumqttc::ClientError,
    },

    /// The publish request could not be queued.
    #[error("unable to publish to {topic}")]
    Publish {
        topic: String,
        #[source]
        source: rumqttc::ClientError,
    },
}

impl From<MqttError> for ResolveError {
    fn from(err: MqttError) -> Self {
        Self::Handler(Box::new(err))
    }
}

