//! Connector port — input sources that feed event identifiers into the hub.

use std::sync::Arc;

use async_trait::async_trait;

use nexus_domain::error::ConnectError;

/// Receives event identifiers from input sources.
///
/// Implementations must be callable from any task; emission may block
/// briefly (e.g. while the admission queue decides whether to accept).
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Deliver one event identifier such as `input-device:remote:VOLUMEUP:pressed`.
    async fn emit(&self, identifier: String);
}

#[async_trait]
impl<T: EventSink + ?Sized> EventSink for Arc<T> {
    async fn emit(&self, identifier: String) {
        (**self).emit(identifier).await;
    }
}

/// Starts an input source.
///
/// `connect` is called once at startup, must spawn whatever background tasks
/// the source needs and return promptly. Those tasks deliver identifiers to
/// `sink` for as long as the source produces data.
pub trait Connector: Send + Sync {
    /// Typed parameters, deserialized from the connector's configuration table.
    type Parameters;

    /// Registry key of this connector (e.g. `"hcidump"`).
    fn kind(&self) -> &'static str;

    /// Open the source and start emitting into `sink`.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectError`] when the source cannot be opened.
    fn connect(
        &self,
        sink: Arc<dyn EventSink>,
        parameters: Self::Parameters,
    ) -> Result<(), ConnectError>;
}
