//! # nexus-adapter-hcidump
//!
//! Bluetooth remote adapter — runs `hcidump -R` and turns GATT value
//! notifications from paired remotes into key events.
//!
//! ## How it works
//!
//! Many BLE remotes report button presses as value notifications on a fixed
//! attribute handle: a non-zero value while a button is down, an all-zero
//! value once it is released. The dump process prints every packet as a hex
//! line; this adapter parses those lines, keeps the notifications on the
//! configured handles and feeds them to a
//! [`KeyEventNormalizer`](nexus_app::normalizer::KeyEventNormalizer) with
//! synthetic auto-repeat.
//!
//! Emitted identifiers look like `hci:<id>:001f:41000000:pressed`.
//!
//! ## Dependency rule
//!
//! Same as other adapters: depends on `nexus-app` and `nexus-domain`.

mod config;
mod error;
pub mod frame;
pub mod reader;

pub use config::HciDumpConfig;
pub use error::HciDumpError;

use std::process::Stdio;
use std::sync::Arc;

use nexus_app::normalizer::KeyEventNormalizer;
use nexus_app::ports::{Connector, EventSink};
use nexus_domain::error::ConnectError;
use nexus_domain::key_event::SourceRef;
use tokio::io::BufReader;
use tokio::process::Command;

use crate::frame::NotificationDecoder;
use crate::reader::HexDumpReader;

/// Registry key of this connector.
pub const CONNECTOR_KIND: &str = "hcidump";

/// Identifier prefix of events from this source.
pub const KIND: &str = "hci";

/// Connector spawning one dump process per configured source.
#[derive(Debug, Default, Clone, Copy)]
pub struct HciDumpConnector;

impl Connector for HciDumpConnector {
    type Parameters = HciDumpConfig;

    fn kind(&self) -> &'static str {
        CONNECTOR_KIND
    }

    fn connect(
        &self,
        sink: Arc<dyn EventSink>,
        config: HciDumpConfig,
    ) -> Result<(), ConnectError> {
        let (program, args) = config
            .command
            .split_first()
            .ok_or(HciDumpError::EmptyCommand)?;
        let command_line = config.command.join(" ");

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| HciDumpError::Spawn {
                command: command_line.clone(),
                source,
            })?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| HciDumpError::NoStdout(command_line.clone()))?;

        let reader = HexDumpReader::new(BufReader::new(stdout)).with_child(child);
        let normalizer = KeyEventNormalizer::new(
            SourceRef::new(KIND, config.id.clone()),
            NotificationDecoder::new(config.handles.clone()),
            config.timing(),
            sink,
        );
        normalizer.spawn(reader);

        tracing::info!(source = %config.id, command = %command_line, "hcidump source started");
        Ok(())
    }
}
