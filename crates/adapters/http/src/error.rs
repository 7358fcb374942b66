//! HTTP adapter error types.

use nexus_domain::error::{ConnectError, ResolveError};

/// Errors specific to the HTTP adapter.
#[derive(Debug, thiserror::Error)]
pub enum HttpError {
    /// The HTTP client could not be built.
    #[error("unable to build HTTP client")]
    Client(#[source] reqwest::Error),

    /// The request could not be sent or the response not received.
    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl From<HttpError> for ResolveError {
    fn from(err: HttpError) -> Self {
        Self::Handler(Box::new(err))
    }
}

impl From<HttpError> for ConnectError {
    fn from(err: HttpError) -> Self {
        Self::Parameters {
            kind: "http",
            source: Box::new(err),
        }
    }
}
