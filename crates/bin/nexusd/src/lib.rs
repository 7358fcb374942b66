//! # nexusd — nexus daemon
//!
//! Composition root that wires all adapters together and runs the hub.
//!
//! ## Responsibilities
//! - Parse configuration (config file, env vars)
//! - Build the catalog, the resolver and its handlers from configuration
//! - Start the command processor behind the admission queue
//! - Start every configured input connector, feeding the admission queue
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

pub mod config;
pub mod registry;

use std::sync::Arc;

use nexus_app::admission::{AdmissionQueue, admission_queue};
use nexus_app::ports::EventSink;
use nexus_app::processor::CommandProcessor;
use tokio::task::JoinHandle;

use crate::config::Config;

/// A running hub: the processor task plus the queue feeding it.
#[derive(Debug)]
pub struct Hub {
    queue: AdmissionQueue,
    processor: JoinHandle<()>,
    connectors: usize,
}

impl Hub {
    /// Wire everything described by `config` and start it.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn start(config: Config) -> Self {
        let offer_timeout = config.offer_timeout();
        let catalog = Arc::new(config.catalog);
        let resolver =
            registry::build_resolver(&catalog, &config.handlers, config.resolution.max_hops);
        tracing::info!(
            devices = catalog.devices.len(),
            activities = catalog.activities.len(),
            input_mappings = catalog.input_mappings.len(),
            schemes = ?resolver.schemes().collect::<Vec<_>>(),
            "catalog loaded"
        );

        let (queue, receiver) = admission_queue(offer_timeout);
        let processor = CommandProcessor::new(Arc::clone(&catalog), resolver).spawn(receiver);

        let sink: Arc<dyn EventSink> = Arc::new(queue.clone());
        let connectors = registry::start_connectors(&config.connectors, &sink);
        tracing::info!(connectors, "hub started");

        Self {
            queue,
            processor,
            connectors,
        }
    }

    /// Queue shared by all sources; events offered here are processed like
    /// input from a connector.
    #[must_use]
    pub fn queue(&self) -> &AdmissionQueue {
        &self.queue
    }

    /// Number of connectors that started successfully.
    #[must_use]
    pub fn connectors(&self) -> usize {
        self.connectors
    }

    /// Stop the command processor. Connector tasks end with the runtime.
    pub fn shutdown(self) {
        self.processor.abort();
        tracing::info!("hub stopped");
    }
}
