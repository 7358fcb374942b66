//! # nexus-adapter-input-device
//!
//! Linux input-device adapter — reads `struct input_event` records from an
//! event device (keyboards, IR receivers, USB remotes) and turns them into
//! key events.
//!
//! ## Identifiers
//!
//! | Record | Identifier |
//! |--------|------------|
//! | key | `input-device:<id>:KEY:<name>:<state>[:<modifiers>]` |
//! | sync | not emitted |
//! | anything else | `input-device:<id>:<type>:<code>:<value>` (hex) |
//!
//! Key names come from the kernel's `KEY_*` codes as known to `evdev`; unknown codes fall back to
//! four hex digits. The kernel's own auto-repeat surfaces as `held`.
//!
//! ## Dependency rule
//!
//! Same as other adapters: depends on `nexus-app` and `nexus-domain`.

mod config;
mod error;
pub mod event;
pub mod keys;
pub mod reader;

pub use config::InputDeviceConfig;
pub use error::InputDeviceError;

use std::sync::Arc;

use nexus_app::normalizer::KeyEventNormalizer;
use nexus_app::ports::{Connector, EventSink};
use nexus_domain::error::ConnectError;
use nexus_domain::key_event::SourceRef;

use crate::event::InputEventDecoder;
use crate::reader::RecordReader;

/// Registry key of this connector and identifier prefix of its events.
pub const CONNECTOR_KIND: &str = "input-device";

/// Connector reading one event device per configured source.
#[derive(Debug, Default, Clone, Copy)]
pub struct InputDeviceConnector;

impl Connector for InputDeviceConnector {
    type Parameters = InputDeviceConfig;

    fn kind(&self) -> &'static str {
        CONNECTOR_KIND
    }

    fn connect(
        &self,
        sink: Arc<dyn EventSink>,
        config: InputDeviceConfig,
    ) -> Result<(), ConnectError> {
        config.validate()?;
        let file = std::fs::File::open(&config.device).map_err(|source| {
            InputDeviceError::Open {
                path: config.device.clone(),
                source,
            }
        })?;

        let normalizer = KeyEventNormalizer::new(
            SourceRef::new(CONNECTOR_KIND, config.id.clone()),
            InputEventDecoder,
            config.timing(),
            sink,
        );
        normalizer.spawn(RecordReader::new(tokio::fs::File::from_std(file)));

        tracing::info!(
            source = %config.id,
            device = %config.device.display(),
            "input device opened"
        );
        Ok(())
    }
}
