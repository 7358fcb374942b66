//! hcidump adapter error types.

use nexus_domain::error::ConnectError;

/// Errors raised while starting the dump process.
#[derive(Debug, thiserror::Error)]
pub enum HciDumpError {
    /// `command` was configured as an empty list.
    #[error("no dump command configured")]
    EmptyCommand,

    /// The dump process could not be started.
    #[error("unable to start {command}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The process was started without a stdout pipe.
    #[error("{0} has no stdout")]
    NoStdout(String),
}

impl From<HciDumpError> for ConnectError {
    fn from(err: HciDumpError) -> Self {
        match err {
            HciDumpError::Spawn { command, source } => Self::Io {
                what: command,
                source,
            },
            other => Self::Parameters {
                kind: crate::CONNECTOR_KIND,
                source: Box::new(other),
            },
        }
    }
}
