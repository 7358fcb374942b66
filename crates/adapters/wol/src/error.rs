//! Wake-on-LAN adapter error types.

use std::net::SocketAddr;

use nexus_domain::error::ResolveError;

/// Errors specific to the Wake-on-LAN adapter.
#[derive(Debug, thiserror::Error)]
pub enum WolError {
    /// No local UDP socket could be opened.
    #[error("unable to open UDP socket")]
    Socket(#[source] std::io::Error),

    /// The magic packet could not be sent.
    #[error("unable to send magic packet to {address}")]
    Send {
        address: SocketAddr,
        #[source]
        source: std::io::Error,
    },
}

impl From<WolError> for ResolveError {
    fn from(err: WolError) -> Self {
        Self::Handler(Box::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_convert_into_handler_error() {
        let err = WolError::Send {
            address: "192.168.1.255:9".parse().unwrap(),
            source: std::io::Error::other("network unreachable"),
        };
        assert_eq!(
            err.to_string(),
            "unable to send magic packet to 192.168.1.255:9"
        );
        let err: ResolveError = err.into();
        assert!(matches!(err, ResolveError::Handler(_)));
    }
}
