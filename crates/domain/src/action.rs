//! Action — a routable command: a scheme-addressed target plus an optional
//! method and payload.
//!
//! The scheme selects the handler that resolves the action; the
//! scheme-specific part is opaque to everything but that handler.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ActionParseError;

/// A URI-like action target split into `scheme` and scheme-specific part.
///
/// `http://host/path` has scheme `http` and scheme-specific part
/// `//host/path`; `device:tv:power` has scheme `device` and scheme-specific
/// part `tv:power`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target {
    scheme: String,
    ssp: String,
}

impl Target {
    /// Parse a `scheme:rest` string.
    ///
    /// # Errors
    ///
    /// Returns [`ActionParseError`] when the input is empty, has no `:`
    /// separator, or the scheme is not `[A-Za-z][A-Za-z0-9+.-]*`.
    pub fn parse(input: &str) -> Result<Self, ActionParseError> {
        if input.is_empty() {
            return Err(ActionParseError::Empty);
        }
        let Some((scheme, ssp)) = input.split_once(':') else {
            return Err(ActionParseError::MissingScheme(input.to_string()));
        };
        if !is_valid_scheme(scheme) {
            return Err(ActionParseError::InvalidScheme(input.to_string()));
        }
        Ok(Self {
            scheme: scheme.to_string(),
            ssp: ssp.to_string(),
        })
    }

    /// The scheme, without the trailing `:`.
    #[must_use]
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Everything after the first `:`.
    #[must_use]
    pub fn scheme_specific_part(&self) -> &str {
        &self.ssp
    }
}

fn is_valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.scheme, self.ssp)
    }
}

impl FromStr for Target {
    type Err = ActionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// An immutable routable command.
///
/// In configuration an action is either a bare target string
/// (`"device:tv:power"`) or a table
/// `{ action = "http://…", method = "POST", payload = "…" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawAction", into = "RawAction")]
pub struct Action {
    pub target: Target,
    pub method: Option<String>,
    pub payload: Option<String>,
}

impl Action {
    /// An action with only a target.
    #[must_use]
    pub fn new(target: Target) -> Self {
        Self {
            target,
            method: None,
            payload: None,
        }
    }

    /// Parse a bare target string into an action without method/payload.
    ///
    /// # Errors
    ///
    /// See [`Target::parse`].
    pub fn parse(input: &str) -> Result<Self, ActionParseError> {
        Target::parse(input).map(Self::new)
    }

    #[must_use]
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    #[must_use]
    pub fn with_payload(mut self, payload: impl Into<String>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    /// Shorthand for `self.target.scheme()`.
    #[must_use]
    pub fn scheme(&self) -> &str {
        self.target.scheme()
    }

    /// Shorthand for `self.target.scheme_specific_part()`.
    #[must_use]
    pub fn scheme_specific_part(&self) -> &str {
        self.target.scheme_specific_part()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.target.fmt(f)?;
        if let Some(method) = &self.method {
            write!(f, " [{method}]")?;
        }
        Ok(())
    }
}

/// Wire shape of an [`Action`] in configuration files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawAction {
    Target(String),
    Full {
        action: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        method: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        payload: Option<String>,
    },
}

impl TryFrom<RawAction> for Action {
    type Error = ActionParseError;

    fn try_from(raw: RawAction) -> Result<Self, Self::Error> {
        match raw {
            RawAction::Target(target) => Self::parse(&target),
            RawAction::Full {
                action,
                method,
                payload,
            } => Ok(Self {
                target: Target::parse(&action)?,
                method,
                payload,
            }),
        }
    }
}

impl From<Action> for RawAction {
    fn from(action: Action) -> Self {
        if action.method.is_none() && action.payload.is_none() {
            return Self::Target(action.target.to_string());
        }
        Self::Full {
            action: action.target.to_string(),
            method: action.method,
            payload: action.payload,
        }
    }
}
