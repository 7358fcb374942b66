//! Handler ports — the two shapes a scheme handler can take.
//!
//! Every action scheme (`http`, `mqtt`, `device`, …) is served by exactly one
//! handler. A handler either *terminates* the chain by performing a side
//! effect, or *continues* it by rewriting the action into another one.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use nexus_domain::action::Action;
use nexus_domain::error::ResolveError;

/// Performs a side effect and ends the resolution chain.
#[async_trait]
pub trait TerminalHandler: Send + Sync {
    /// Perform the side effect described by `action`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::MalformedAction`] when the action has the wrong
    /// shape, or [`ResolveError::Handler`] when the side effect failed.
    async fn accept(&self, action: &Action) -> Result<(), ResolveError>;
}

/// Rewrites an action into the next one to resolve.
#[async_trait]
pub trait ContinuingHandler: Send + Sync {
    /// Produce the next action, or `None` to end the chain quietly.
    ///
    /// # Errors
    ///
    /// Returns a [`ResolveError`] when the action cannot be rewritten.
    async fn handle(&self, action: &Action) -> Result<Option<Action>, ResolveError>;
}

/// A registered handler, tagged by how it participates in resolution.
#[derive(Clone)]
pub enum Handler {
    Terminal(Arc<dyn TerminalHandler>),
    Continuing(Arc<dyn ContinuingHandler>),
}

impl Handler {
    /// Wrap a terminal handler.
    pub fn terminal(handler: impl TerminalHandler + 'static) -> Self {
        Self::Terminal(Arc::new(handler))
    }

    /// Wrap a continuing handler.
    pub fn continuing(handler: impl ContinuingHandler + 'static) -> Self {
        Self::Continuing(Arc::new(handler))
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Terminal(_) => f.write_str("Handler::Terminal"),
            Self::Continuing(_) => f.write_str("Handler::Continuing"),
        }
    }
}
