//! Common error types used across the workspace.
//!
//! Each layer defines its own typed errors; the ones here describe
//! invalid configuration data and are raised while building the model.

/// Why a string could not be turned into an action target.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ActionParseError {
    /// The input was empty.
    #[error("action target is empty")]
    Empty,

    /// No `scheme:` prefix was found.
    #[error("action target {0:?} has no scheme")]
    MissingScheme(String),

    /// The scheme contains characters outside `[A-Za-z0-9+.-]` or does not
    /// start with a letter.
    #[error("action target {0:?} has an invalid scheme")]
    InvalidScheme(String),
}

/// Structural problems in a device/activity catalog.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    /// A device or activity was declared with an empty id.
    #[error("{kind} declared with an empty id")]
    EmptyId {
        /// `"device"` or `"activity"`.
        kind: &'static str,
    },

    /// Two devices share an id.
    #[error("duplicate device id {0:?}")]
    DuplicateDevice(String),

    /// Two activities share an id.
    #[error("duplicate activity id {0:?}")]
    DuplicateActivity(String),

    /// An activity lists a participant that is not a known device.
    #[error("activity {activity:?} references unknown device {device:?}")]
    UnknownParticipant {
        /// The referencing activity.
        activity: String,
        /// The missing device id.
        device: String,
    },

    /// A template pattern could not be compiled.
    #[error("template {name:?} is invalid: {reason}")]
    InvalidTemplate {
        /// The template (and scheme) name.
        name: String,
        /// What is wrong with it.
        reason: &'static str,
    },
}

/// Why a single resolution chain was aborted.
///
/// A missing handler for a scheme is *not* an error: it is a soft
/// configuration miss that ends the chain quietly.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// The scheme-specific part does not have the shape the handler needs.
    #[error("malformed {scheme} action {input:?}: {reason}")]
    MalformedAction {
        /// Scheme of the offending action.
        scheme: String,
        /// The offending scheme-specific part.
        input: String,
        /// What is wrong with it.
        reason: String,
    },

    /// A template handler received input its pattern does not match.
    #[error("action {input:?} did not match template {template:?}")]
    TemplateMismatch {
        /// The full action target.
        input: String,
        /// The template pattern.
        template: String,
    },

    /// The chain exceeded the hop limit and was assumed to be cyclic.
    #[error("resolution loop: gave up after {hops} hops at {action}")]
    ResolutionLoop {
        /// Number of hops taken.
        hops: usize,
        /// The action that would have been resolved next.
        action: String,
    },

    /// A terminal handler failed while performing its side effect.
    #[error("handler failed")]
    Handler(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ResolveError {
    /// Build a [`ResolveError::MalformedAction`].
    #[must_use]
    pub fn malformed(scheme: &str, input: &str, reason: impl Into<String>) -> Self {
        Self::MalformedAction {
            scheme: scheme.to_string(),
            input: input.to_string(),
            reason: reason.into(),
        }
    }
}

/// Why a connector or handler could not be set up.
#[derive(Debug, thiserror::Error)]
pub enum ConnectError {
    /// The parameter table did not describe a valid configuration.
    #[error("invalid parameters for {kind}")]
    Parameters {
        /// Connector or handler kind.
        kind: &'static str,
        /// Underlying deserialisation error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Opening the underlying stream failed.
    #[error("unable to open {what}")]
    Io {
        /// Device path or command line.
        what: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
