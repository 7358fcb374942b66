//! Explicit constructor registry.
//!
//! Maps the stable kind names used in `[[connectors.<kind>]]` and
//! `[[handlers.<kind>]]` tables to the functions that build them. A table
//! with an unknown kind, or whose constructor fails, is logged and skipped;
//! the remaining configuration still starts.

use std::sync::Arc;

use nexus_adapter_hcidump::HciDumpConnector;
use nexus_adapter_http::{HttpConfig, HttpHandler};
use nexus_adapter_input_device::InputDeviceConnector;
use nexus_adapter_mqtt::{MqttConfig, MqttHandler};
use nexus_adapter_wol::{WolConfig, WolHandler};
use nexus_app::handlers::delay::DELAY_SCHEME;
use nexus_app::handlers::device::DEVICE_SCHEME;
use nexus_app::handlers::{DelayHandler, DeviceHandler, TemplateHandler};
use nexus_app::ports::{Connector, EventSink, Handler};
use nexus_app::resolver::ActionResolver;
use nexus_domain::catalog::Catalog;
use nexus_domain::error::ConnectError;
use serde::de::DeserializeOwned;

use crate::config::ParameterTables;

type ConnectorConstructor = fn(toml::Table, Arc<dyn EventSink>) -> Result<(), ConnectError>;
type HandlerConstructor = fn(toml::Table) -> Result<(String, Handler), ConnectError>;

const CONNECTORS: &[(&str, ConnectorConstructor)] = &[
    (
        nexus_adapter_hcidump::CONNECTOR_KIND,
        connect::<HciDumpConnector>,
    ),
    (
        nexus_adapter_input_device::CONNECTOR_KIND,
        connect::<InputDeviceConnector>,
    ),
];

const HANDLERS: &[(&str, HandlerConstructor)] = &[
    (nexus_adapter_http::HANDLER_KIND, http),
    (nexus_adapter_mqtt::HANDLER_KIND, mqtt),
    (nexus_adapter_wol::HANDLER_KIND, wol),
];

/// Kinds accepted under `[[connectors.<kind>]]`.
fn connector_kinds() -> impl Iterator<Item = &'static str> {
    CONNECTORS.iter().map(|(kind, _)| *kind)
}

/// Kinds accepted under `[[handlers.<kind>]]`.
fn handler_kinds() -> impl Iterator<Item = &'static str> {
    HANDLERS.iter().map(|(kind, _)| *kind)
}

fn lookup<T: Copy>(table: &[(&str, T)], kind: &str) -> Option<T> {
    table
        .iter()
        .find(|(candidate, _)| *candidate == kind)
        .map(|(_, constructor)| *constructor)
}

fn parameters<T: DeserializeOwned>(
    kind: &'static str,
    table: toml::Table,
) -> Result<T, ConnectError> {
    toml::Value::Table(table)
        .try_into()
        .map_err(|source: toml::de::Error| ConnectError::Parameters {
            kind,
            source: Box::new(source),
        })
}

fn connect<C>(table: toml::Table, sink: Arc<dyn EventSink>) -> Result<(), ConnectError>
where
    C: Connector + Default,
    C::Parameters: DeserializeOwned,
{
    let connector = C::default();
    let parameters = parameters(connector.kind(), table)?;
    connector.connect(sink, parameters)
}

fn http(table: toml::Table) -> Result<(String, Handler), ConnectError> {
    let config: HttpConfig = parameters(nexus_adapter_http::HANDLER_KIND, table)?;
    let handler = HttpHandler::new(&config)?;
    Ok((config.id, Handler::terminal(handler)))
}

fn mqtt(table: toml::Table) -> Result<(String, Handler), ConnectError> {
    let config: MqttConfig = parameters(nexus_adapter_mqtt::HANDLER_KIND, table)?;
    let id = config.id.clone();
    Ok((id, Handler::terminal(MqttHandler::new(config))))
}

fn wol(table: toml::Table) -> Result<(String, Handler), ConnectError> {
    let config: WolConfig = parameters(nexus_adapter_wol::HANDLER_KIND, table)?;
    let handler = WolHandler::new(&config);
    Ok((config.id, Handler::terminal(handler)))
}

/// Build the resolver: templates, `device` and `delay` first, then every
/// configured handler in kind order. A later registration for the same
/// scheme replaces an earlier one.
#[must_use]
pub fn build_resolver(
    catalog: &Arc<Catalog>,
    handlers: &ParameterTables,
    max_hops: usize,
) -> ActionResolver {
    let mut resolver = ActionResolver::new(max_hops);

    for (name, definition) in &catalog.templates {
        match TemplateHandler::new(name.clone(), definition.clone()) {
            Ok(handler) => resolver.register(name.clone(), Handler::continuing(handler)),
            Err(err) => tracing::warn!(template = %name, error = %err, "skipping template"),
        }
    }
    resolver.register(
        DEVICE_SCHEME,
        Handler::continuing(DeviceHandler::new(Arc::clone(catalog))),
    );
    resolver.register(DELAY_SCHEME, Handler::terminal(DelayHandler));

    for (kind, tables) in handlers {
        let Some(constructor) = lookup(HANDLERS, kind) else {
            tracing::warn!(
                %kind,
                known = ?handler_kinds().collect::<Vec<_>>(),
                "unknown handler kind, skipping"
            );
            continue;
        };
        for table in tables {
            match constructor(table.clone()) {
                Ok((scheme, handler)) => resolver.register(scheme, handler),
                Err(err) => tracing::warn!(%kind, error = %err, "unable to build handler"),
            }
        }
    }
    resolver
}

/// Start every configured connector; returns how many are running.
pub fn start_connectors(connectors: &ParameterTables, sink: &Arc<dyn EventSink>) -> usize {
    let mut started = 0;
    for (kind, tables) in connectors {
        let Some(constructor) = lookup(CONNECTORS, kind) else {
            tracing::warn!(
                %kind,
                known = ?connector_kinds().collect::<Vec<_>>(),
                "unknown connector kind, skipping"
            );
            continue;
        };
        for table in tables {
            match constructor(table.clone(), Arc::clone(sink)) {
                Ok(()) => started += 1,
                Err(err) => {
                    let cause = std::error::Error::source(&err)
                        .map(ToString::to_string)
                        .unwrap_or_default();
                    tracing::warn!(%kind, error = %err, %cause, "unable to start connector");
                }
            }
        }
    }
    started
}
