//! # nexus-adapter-mqtt
//!
//! MQTT adapter — terminal handler for `mqtt://host[:port]/topic` actions.
//!
//! ## Responsibilities
//! - Keep one client per broker, created on first use and reused afterwards
//! - Publish the action payload with QoS 1, not retained
//! - Wait for an acknowledgement on the configured result topic, bounded by
//!   `max_delay_ms`, so commands reach devices one at a time
//!
//! ## Dependency rule
//! Same as other adapters: depends on `nexus-app` and `nexus-domain`.

mod config;
mod error;
mod target;

pub use config::MqttConfig;
pub use error::MqttError;
pub use target::{BrokerTarget, DEFAULT_PORT};

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use nexus_app::ports::TerminalHandler;
use nexus_domain::action::Action;
use nexus_domain::error::ResolveError;
use rumqttc::{AsyncClient, ConnectionError, Event, EventLoop, MqttOptions, Packet, QoS};
use tokio::sync::{Mutex, Notify};

/// Registry key of this handler.
pub const HANDLER_KIND: &str = "mqtt";

const REQUEST_CAPACITY: usize = 16;
const RECONNECT_DELAY: Duration = Duration::from_secs(1);

#[derive(Clone)]
struct Broker {
    client: AsyncClient,
    acknowledgements: Arc<Notify>,
}

/// Publishes actions to MQTT brokers.
pub struct MqttHandler {
    config: MqttConfig,
    brokers: Mutex<HashMap<String, Broker>>,
}

impl MqttHandler {
    #[must_use]
    pub fn new(config: MqttConfig) -> Self {
        Self {
            config,
            brokers: Mutex::new(HashMap::new()),
        }
    }

    /// Number of broker connections opened so far.
    #[cfg(test)]
    async fn broker_count(&self) -> usize {
        self.brokers.lock().await.len()
    }

    async fn broker(&self, target: &BrokerTarget) -> Result<Broker, MqttError> {
        let key = target.broker();
        let mut brokers = self.brokers.lock().await;
        if let Some(broker) = brokers.get(&key) {
            return Ok(broker.clone());
        }

        let mut options = MqttOptions::new(&self.config.client_id, &target.host, target.port);
        options.set_keep_alive(self.config.keep_alive());
        let (client, event_loop) = AsyncClient::new(options, REQUEST_CAPACITY);

        if let Some(topic) = &self.config.result_topic {
            client
                .subscribe(topic.as_str(), QoS::AtLeastOnce)
                .await
                .map_err(|source| MqttError::Subscribe {
                    topic: topic.clone(),
                    source,
                })?;
        }

        let broker = Broker {
            client,
            acknowledgements: Arc::new(Notify::new()),
        };
        tokio::spawn(drive(
            event_loop,
            broker.client.clone(),
            key.clone(),
            self.config.result_topic.clone(),
            Arc::clone(&broker.acknowledgements),
        ));
        tracing::info!(broker = %key, "mqtt client created");
        brokers.insert(key, broker.clone());
        Ok(broker)
    }
}

#[async_trait]
impl TerminalHandler for MqttHandler {
    async fn accept(&self, action: &Action) -> Result<(), ResolveError> {
        let scheme = action.scheme();
        let ssp = action.scheme_specific_part();
        if scheme != "mqtt" {
            return Err(ResolveError::malformed(
                scheme,
                ssp,
                "only mqtt targets are supported",
            ));
        }
        let target = BrokerTarget::parse(ssp)
            .map_err(|reason| ResolveError::malformed(scheme, ssp, reason))?;

        let broker = self.broker(&target).await?;
        let acknowledged = broker.acknowledgements.notified();

        let payload = action.payload.clone().unwrap_or_default();
        broker
            .client
            .publish(target.topic.as_str(), QoS::AtLeastOnce, false, payload)
            .await
            .map_err(|source| MqttError::Publish {
                topic: target.topic.clone(),
                source,
            })?;
        tracing::debug!(
            broker = %target.broker(),
            topic = %target.topic,
            "mqtt message published"
        );

        if tokio::time::timeout(self.config.max_delay(), acknowledged)
            .await
            .is_err()
        {
            tracing::debug!(topic = %target.topic, "no acknowledgement within max delay");
        }
        Ok(())
    }
}

/// Poll the connection; rumqttc reconnects on the next poll after an error.
/// Subscriptions do not survive a clean session, so the result topic is
/// subscribed again whenever a fresh session is acknowledged.
async fn drive(
    mut event_loop: EventLoop,
    client: AsyncClient,
    broker: String,
    result_topic: Option<String>,
    acknowledgements: Arc<Notify>,
) {
    loop {
        match event_loop.poll().await {
            Ok(Event::Incoming(Packet::Publish(publish))) => {
                if result_topic
                    .as_deref()
                    .is_some_and(|topic| is_topic(&publish.topic, topic))
                {
                    acknowledgements.notify_waiters();
                }
            }
            Ok(event) => {
                if let Some(topic) = resubscription(&event, result_topic.as_deref()) {
                    tracing::debug!(%broker, %topic, "subscribing to result topic");
                    if let Err(err) = client.subscribe(topic, QoS::AtLeastOnce).await {
                        tracing::warn!(%broker, %topic, error = %err, "mqtt subscribe failed");
                    }
                }
            }
            Err(ConnectionError::RequestsDone) => break,
            Err(err) => {
                tracing::warn!(%broker, error = %err, "mqtt connection failed");
                tokio::time::sleep(RECONNECT_DELAY).await;
            }
        }
    }
    tracing::debug!(%broker, "mqtt event loop stopped");
}

/// Topic to subscribe again after `event`, if it opened a fresh session.
fn resubscription<'a>(event: &Event, result_topic: Option<&'a str>) -> Option<&'a str> {
    match event {
        Event::Incoming(Packet::ConnAck(ack)) if !ack.session_present => result_topic,
        _ => None,
    }
}

fn is_topic(received: &impl AsRef<[u8]>, expected: &str) -> bool {
    received.as_ref() == expected.as_bytes()
}
