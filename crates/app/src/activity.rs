//! Activity state machine — decides which devices are live and runs their
//! activation, deactivation and setup steps in a deterministic order.
//!
//! Owned by the command processor task; never shared, so it needs no lock.

use std::sync::Arc;

use nexus_domain::action::Action;
use nexus_domain::activity::Activity;
use nexus_domain::catalog::Catalog;
use nexus_domain::id::{ActivityId, DeviceId};

use crate::resolver::ActionResolver;

/// Current activity and the devices that are switched on for it.
#[derive(Debug)]
pub struct ActivityStateMachine {
    catalog: Arc<Catalog>,
    current: Option<ActivityId>,
    active_devices: Vec<DeviceId>,
}

impl ActivityStateMachine {
    /// Start with no activity and no active devices.
    #[must_use]
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            current: None,
            active_devices: Vec::new(),
        }
    }

    /// The activity selected by the last successful [`switch_to`](Self::switch_to).
    #[must_use]
    pub fn current_activity(&self) -> Option<&Activity> {
        self.current
            .as_ref()
            .and_then(|id| self.catalog.activity(id.as_str()))
    }

    /// Devices currently switched on, in activation order.
    #[must_use]
    pub fn active_devices(&self) -> &[DeviceId] {
        &self.active_devices
    }

    /// Switch to the activity `id`: bring its participants live, run its setup
    /// steps, then make it current.
    ///
    /// Returns `false` (and changes nothing) when no such activity exists.
    #[tracing::instrument(skip(self, resolver))]
    pub async fn switch_to(&mut self, id: &str, resolver: &ActionResolver) -> bool {
        let catalog = Arc::clone(&self.catalog);
        let Some(activity) = catalog.activity(id) else {
            tracing::info!(activity = id, "unknown activity, ignoring");
            return false;
        };

        self.set_participants(&activity.participants, resolver).await;
        self.run_steps("setup", &activity.setup_steps, resolver).await;
        self.current = Some(activity.id.clone());
        tracing::info!(activity = %activity.id, "activity switched");
        true
    }

    /// Switch every device off. The current activity stays selected so that
    /// its command mappings keep resolving.
    #[tracing::instrument(skip_all)]
    pub async fn turn_off(&mut self, resolver: &ActionResolver) {
        self.set_participants(&[], resolver).await;
        tracing::info!("all devices off");
    }

    /// Move from the current device set to `target`.
    ///
    /// New devices are activated first, in `target` order. Devices that are no
    /// longer needed are deactivated afterwards, in their previous order.
    /// Devices present in both sets are left alone.
    pub async fn set_participants(&mut self, target: &[DeviceId], resolver: &ActionResolver) {
        let catalog = Arc::clone(&self.catalog);

        for id in target {
            if self.active_devices.contains(id) {
                continue;
            }
            match catalog.device(id.as_str()) {
                Some(device) => {
                    tracing::debug!(device = %id, "activating");
                    self.run_steps("activation", &device.activation_steps, resolver)
                        .await;
                }
                None => tracing::info!(device = %id, "unknown device, nothing to activate"),
            }
        }

        let superfluous: Vec<DeviceId> = self
            .active_devices
            .iter()
            .filter(|id| !target.contains(id))
            .cloned()
            .collect();
        self.active_devices = target.to_vec();

        for id in &superfluous {
            if let Some(device) = catalog.device(id.as_str()) {
                tracing::debug!(device = %id, "deactivating");
                self.run_steps("deactivation", &device.deactivation_steps, resolver)
                    .await;
            }
        }
    }

    /// Resolve each step as its own chain; a failing step does not stop the
    /// rest.
    async fn run_steps(&self, kind: &'static str, steps: &[Action], resolver: &ActionResolver) {
        for step in steps {
            if let Err(err) = resolver
                .resolve(step.clone(), self.current_activity())
                .await
            {
                tracing::warn!(error = %err, step = %step, kind, "step failed");
            }
        }
    }
}
