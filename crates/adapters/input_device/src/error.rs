//! Input-device adapter error types.

use std::path::PathBuf;

use nexus_domain::error::ConnectError;

/// Errors raised while opening an input device.
#[derive(Debug, thiserror::Error)]
pub enum InputDeviceError {
    /// The source id is blank.
    #[error("input device id must not be empty")]
    EmptyId,

    /// The device file could not be opened.
    #[error("unable to open {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<InputDeviceError> for ConnectError {
    fn from(err: InputDeviceError) -> Self {
        match err {
            InputDeviceError::Open { path, source } => Self::Io {
                what: path.display().to_string(),
                source,
            },
            other @ InputDeviceError::EmptyId => Self::Parameters {
                kind: crate::CONNECTOR_KIND,
                source: Box::new(other),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_display_open_error_with_path() {
        let err = InputDeviceError::Open {
            path: PathBuf::from("/dev/input/event9"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert_eq!(err.to_string(), "unable to open /dev/input/event9");
    }

    #[test]
    fn should_convert_to_connect_error() {
        let err: ConnectError = InputDeviceError::EmptyId.into();
        assert!(matches!(
            err,
            ConnectError::Parameters {
                kind: "input-device",
                ..
            }
        ));
    }
}
