//! `device:<ID>:<NAME>` — looks up a named mapping on a device.

use std::sync::Arc;

use async_trait::async_trait;

use nexus_domain::action::Action;
use nexus_domain::catalog::Catalog;
use nexus_domain::error::ResolveError;

use crate::ports::ContinuingHandler;

/// Scheme served by [`DeviceHandler`].
pub const DEVICE_SCHEME: &str = "device";

/// Rewrites `device:ID:NAME` into the device's mapping for `NAME`.
pub struct DeviceHandler {
    catalog: Arc<Catalog>,
}

impl DeviceHandler {
    #[must_use]
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }
}

/// `[_A-Za-z0-9]+(-[_A-Za-z0-9]+)*`
fn is_word(part: &str) -> bool {
    !part.is_empty()
        && part.split('-').all(|chunk| {
            !chunk.is_empty()
                && chunk
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'_')
        })
}

#[async_trait]
impl ContinuingHandler for DeviceHandler {
    async fn handle(&self, action: &Action) -> Result<Option<Action>, ResolveError> {
        let ssp = action.scheme_specific_part();
        let Some((id, name)) = ssp
            .split_once(':')
            .filter(|(id, name)| is_word(id) && is_word(name))
        else {
            return Err(ResolveError::malformed(
                DEVICE_SCHEME,
                ssp,
                "expected DEVICE:MAPPING",
            ));
        };

        let Some(device) = self.catalog.device(id) else {
            tracing::debug!(device = id, "unknown device");
            return Ok(None);
        };
        let mapped = device.mapping(name).cloned();
        if mapped.is_none() {
            tracing::debug!(device = id, mapping = name, "device has no such mapping");
        }
        Ok(mapped)
    }
}
