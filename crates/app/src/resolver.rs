//! Action resolver — follows an action through the handler registry until a
//! terminal handler consumes it.
//!
//! Resolution is a loop over scheme lookups:
//!
//! 1. `cmd:<name>` actions are first substituted with the current activity's
//!    mapping for `<name>` (when there is one).
//! 2. The handler registered for the action's scheme is looked up. No handler
//!    ends the chain quietly.
//! 3. A terminal handler performs its side effect and ends the chain; a
//!    continuing handler yields the next action (or ends the chain).
//!
//! Each iteration counts as a hop. Chains longer than the configured limit are
//! treated as cycles and aborted with [`ResolveError::ResolutionLoop`].

use std::collections::HashMap;

use nexus_domain::action::Action;
use nexus_domain::activity::Activity;
use nexus_domain::error::ResolveError;

use crate::ports::Handler;

/// Scheme of activity-local commands.
pub const CMD_SCHEME: &str = "cmd";

/// Default hop limit for a single resolution chain.
pub const DEFAULT_MAX_HOPS: usize = 32;

/// Scheme → handler registry plus the resolution loop.
#[derive(Debug)]
pub struct ActionResolver {
    handlers: HashMap<String, Handler>,
    max_hops: usize,
}

impl Default for ActionResolver {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HOPS)
    }
}

impl ActionResolver {
    /// Create an empty registry with the given hop limit.
    #[must_use]
    pub fn new(max_hops: usize) -> Self {
        Self {
            handlers: HashMap::new(),
            max_hops: max_hops.max(1),
        }
    }

    /// Register `handler` for `scheme`. A later registration for the same
    /// scheme replaces the earlier one.
    pub fn register(&mut self, scheme: impl Into<String>, handler: Handler) {
        let scheme = scheme.into();
        if self.handlers.insert(scheme.clone(), handler).is_some() {
            tracing::debug!(%scheme, "handler replaced");
        }
    }

    /// Whether a handler is registered for `scheme`.
    #[must_use]
    pub fn handles(&self, scheme: &str) -> bool {
        self.handlers.contains_key(scheme)
    }

    /// Registered schemes, in no particular order.
    pub fn schemes(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    /// Resolve `action` to completion.
    ///
    /// `activity` is the currently selected activity, used to substitute
    /// `cmd:` actions.
    ///
    /// # Errors
    ///
    /// Returns the first [`ResolveError`] raised by a handler, or
    /// [`ResolveError::ResolutionLoop`] when the hop limit is exceeded.
    #[tracing::instrument(skip_all, fields(action = %action))]
    pub async fn resolve(
        &self,
        action: Action,
        activity: Option<&Activity>,
    ) -> Result<(), ResolveError> {
        let mut current = action;
        let mut hops = 0;

        loop {
            if hops == self.max_hops {
                return Err(ResolveError::ResolutionLoop {
                    hops,
                    action: current.to_string(),
                });
            }
            hops += 1;

            if current.scheme() == CMD_SCHEME
                && let Some(mapped) =
                    activity.and_then(|a| a.mapping(current.scheme_specific_part()))
            {
                tracing::debug!(from = %current, to = %mapped, "activity command");
                current = mapped.clone();
                continue;
            }

            let Some(handler) = self.handlers.get(current.scheme()) else {
                tracing::info!(action = %current, "no handler for scheme, ignoring");
                return Ok(());
            };

            tracing::debug!(action = %current, hop = hops, "dispatching");
            match handler {
                Handler::Terminal(terminal) => return terminal.accept(&current).await,
                Handler::Continuing(continuing) => match continuing.handle(&current).await? {
                    Some(next) => current = next,
                    None => return Ok(()),
                },
            }
        }
    }
}
