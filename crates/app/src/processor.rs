//! Command processor — the single consumer of the admission queue.
//!
//! Every admitted event is looked up in the input-mapping table and resolved
//! to completion before the next one is taken. Only this task touches the
//! resolver and the activity state, which is what keeps them lock-free.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use nexus_domain::action::Action;
use nexus_domain::catalog::Catalog;
use tokio::task::JoinHandle;

use crate::activity::ActivityStateMachine;
use crate::admission::AdmissionReceiver;
use crate::resolver::ActionResolver;

/// Scheme of activity control actions (`activity:off`, `activity:switch:<id>`).
pub const ACTIVITY_SCHEME: &str = "activity";

/// Consumes event identifiers and drives the resolver.
#[derive(Debug)]
pub struct CommandProcessor {
    catalog: Arc<Catalog>,
    resolver: ActionResolver,
    activities: ActivityStateMachine,
}

impl CommandProcessor {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>, resolver: ActionResolver) -> Self {
        let activities = ActivityStateMachine::new(Arc::clone(&catalog));
        Self {
            catalog,
            resolver,
            activities,
        }
    }

    /// Current activity and device state.
    #[must_use]
    pub fn activities(&self) -> &ActivityStateMachine {
        &self.activities
    }

    /// Handle one event identifier end to end. Never fails: problems are
    /// logged and the processor moves on.
    #[tracing::instrument(skip(self))]
    pub async fn process(&mut self, identifier: &str) {
        let Some(action) = self.catalog.input_mapping(identifier).cloned() else {
            tracing::debug!("no input mapping, ignoring");
            return;
        };

        if action.scheme() == ACTIVITY_SCHEME {
            self.control_activity(&action).await;
            return;
        }

        if let Err(err) = self
            .resolver
            .resolve(action, self.activities.current_activity())
            .await
        {
            tracing::warn!(error = %err, "action chain aborted");
        }
    }

    async fn control_activity(&mut self, action: &Action) {
        let ssp = action.scheme_specific_part();
        if ssp == "off" {
            self.activities.turn_off(&self.resolver).await;
        } else if let Some(id) = ssp.strip_prefix("switch:") {
            self.activities.switch_to(id, &self.resolver).await;
        } else {
            tracing::info!(action = %action, "unknown activity command, ignoring");
        }
    }

    /// Drain `receiver` until every producer is gone. A handler that panics
    /// only loses its own event.
    pub async fn run(mut self, mut receiver: AdmissionReceiver) {
        tracing::info!("command processor started");
        while let Some(identifier) = receiver.take().await {
            let outcome = AssertUnwindSafe(self.process(&identifier))
                .catch_unwind()
                .await;
            if outcome.is_err() {
                tracing::error!(identifier = %identifier, "event processing panicked");
            }
        }
        tracing::info!("command processor stopped");
    }

    /// Run on a dedicated task.
    #[must_use]
    pub fn spawn(self, receiver: AdmissionReceiver) -> JoinHandle<()> {
        tokio::spawn(self.run(receiver))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use nexus_domain::activity::Activity;
    use nexus_domain::device::Device;
    use nexus_domain::error::ResolveError;

    use super::*;
    use crate::admission::{DEFAULT_OFFER_TIMEOUT, admission_queue};
    use crate::handlers::DeviceHandler;
    use crate::ports::{Handler, TerminalHandler};

    #[derive(Default)]
    struct HttpSpy {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl TerminalHandler for HttpSpy {
        async fn accept(&self, action: &Action) -> Result<(), ResolveError> {
            self.calls.lock().unwrap().push(action.target.to_string());
            assert!(
                !action.scheme_specific_part().ends_with("/panic"),
                "handler bug"
            );
            if action.scheme_specific_part().ends_with("/fail") {
                return Err(ResolveError::Handler(Box::new(std::io::Error::other(
                    "connection refused",
                ))));
            }
            Ok(())
        }
    }

    fn action(target: &str) -> Action {
        Action::parse(target).unwrap()
    }

    fn catalog() -> Catalog {
        let mut catalog = Catalog {
            devices: vec![
                Device::builder()
                    .id("tv")
                    .activation(action("http://tv/on"))
                    .deactivation(action("http://tv/off"))
                    .mapping("vol-up", action("http://tv/vol-up"))
                    .build()
                    .unwrap(),
            ],
            activities: vec![
                Activity::builder()
                    .id("watch-tv")
                    .participant("tv")
                    .mapping("volume-up", action("device:tv:vol-up"))
                    .build()
                    .unwrap(),
            ],
            ..Catalog::default()
        };
        for (identifier, target) in [
            ("remote:VOLUMEUP:pressed", "cmd:volume-up"),
            ("remote:POWER:pressed", "activity:switch:watch-tv"),
            ("remote:POWER:long-pressed", "activity:off"),
            ("remote:KARAOKE:pressed", "activity:switch:karaoke"),
            ("remote:RED:pressed", "http://tv/fail"),
            ("remote:GREEN:pressed", "http://tv/green"),
            ("remote:BLUE:pressed", "http://tv/panic"),
        ] {
            catalog
                .input_mappings
                .insert(identifier.to_string(), action(target));
        }
        catalog
    }

    fn processor() -> (CommandProcessor, Arc<HttpSpy>) {
        let catalog = Arc::new(catalog());
        let spy = Arc::new(HttpSpy::default());
        let mut resolver = ActionResolver::default();
        resolver.register(
            "device",
            Handler::continuing(DeviceHandler::new(Arc::clone(&catalog))),
        );
        resolver.register("http", Handler::Terminal(spy.clone()));
        (CommandProcessor::new(catalog, resolver), spy)
    }

    #[tokio::test]
    async fn should_ignore_cmd_without_current_activity() {
        let (mut processor, spy) = processor();
        processor.process("remote:VOLUMEUP:pressed").await;
        assert!(spy.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_resolve_cmd_through_activity_and_device_mapping() {
        let (mut processor, spy) = processor();
        processor.process("remote:POWER:pressed").await;
        spy.calls.lock().unwrap().clear();

        processor.process("remote:VOLUMEUP:pressed").await;

        assert_eq!(*spy.calls.lock().unwrap(), vec!["http://tv/vol-up"]);
    }

    #[tokio::test]
    async fn should_switch_and_turn_off_activity() {
        let (mut processor, spy) = processor();

        processor.process("remote:POWER:pressed").await;
        processor.process("remote:POWER:long-pressed").await;

        assert_eq!(
            *spy.calls.lock().unwrap(),
            vec!["http://tv/on", "http://tv/off"]
        );
        assert!(processor.activities().active_devices().is_empty());
    }

    #[tokio::test]
    async fn should_ignore_unknown_identifier_and_activity() {
        let (mut processor, spy) = processor();
        processor.process("remote:UNMAPPED:pressed").await;
        processor.process("remote:KARAOKE:pressed").await;
        assert!(spy.calls.lock().unwrap().is_empty());
        assert!(processor.activities().current_activity().is_none());
    }

    #[tokio::test]
    async fn should_keep_processing_after_a_failed_chain() {
        let (processor, spy) = processor();
        let (queue, receiver) = admission_queue(DEFAULT_OFFER_TIMEOUT);
        let task = processor.spawn(receiver);

        assert!(queue.offer("remote:RED:pressed".to_string()).await);
        assert!(queue.offer("remote:GREEN:pressed".to_string()).await);
        drop(queue);
        task.await.unwrap();

        assert_eq!(
            *spy.calls.lock().unwrap(),
            vec!["http://tv/fail", "http://tv/green"]
        );
    }

    #[tokio::test]
    async fn should_keep_processing_after_a_panicking_handler() {
        let (processor, spy) = processor();
        let (queue, receiver) = admission_queue(DEFAULT_OFFER_TIMEOUT);
        let task = processor.spawn(receiver);

        assert!(queue.offer("remote:BLUE:pressed".to_string()).await);
        assert!(queue.offer("remote:GREEN:pressed".to_string()).await);
        drop(queue);
        task.await.unwrap();

        assert_eq!(
            *spy.calls.lock().unwrap(),
            vec!["http://tv/panic", "http://tv/green"]
        );
    }
}
