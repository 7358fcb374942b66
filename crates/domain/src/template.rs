//! Template — rewrites a scheme-specific part into a new action by pattern
//! matching.
//!
//! A template pattern such as `<room>/light` contains `<name>` placeholders
//! that each match one or more characters other than `:`. Everything else
//! matches literally and the whole input must match. Captured values are
//! substituted into the configured action URI, payload and query values.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use crate::action::{Action, Target};
use crate::error::{ActionParseError, CatalogError};

/// Template definition as written in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    /// Pattern matched against the incoming scheme-specific part.
    pub template: String,
    /// Action URI with `<name>` placeholders.
    pub action: String,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub payload: Option<String>,
    /// Query parameters appended to the action URI, in key order.
    #[serde(default)]
    pub query: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Placeholder(String),
}

/// Values captured by a successful match, in placeholder order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captures(Vec<(String, String)>);

impl Captures {
    /// Value captured for `name`, if the pattern has such a placeholder.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Replace every `<name>` occurrence in `input` with its captured value.
    #[must_use]
    pub fn substitute(&self, input: &str) -> String {
        self.0.iter().fold(input.to_string(), |acc, (name, value)| {
            acc.replace(&format!("<{name}>"), value)
        })
    }
}

/// A [`Template`] with its pattern parsed into segments.
#[derive(Debug, Clone)]
pub struct CompiledTemplate {
    definition: Template,
    segments: Vec<Segment>,
}

impl CompiledTemplate {
    /// Parse the template pattern.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidTemplate`] when the pattern is empty or
    /// declares the same placeholder twice.
    pub fn compile(name: &str, definition: Template) -> Result<Self, CatalogError> {
        if definition.template.is_empty() {
            return Err(CatalogError::InvalidTemplate {
                name: name.to_string(),
                reason: "empty pattern",
            });
        }
        let segments = parse_segments(&definition.template);
        let mut seen = Vec::new();
        for segment in &segments {
            if let Segment::Placeholder(placeholder) = segment {
                if seen.contains(&placeholder) {
                    return Err(CatalogError::InvalidTemplate {
                        name: name.to_string(),
                        reason: "duplicate placeholder",
                    });
                }
                seen.push(placeholder);
            }
        }
        Ok(Self {
            definition,
            segments,
        })
    }

    /// The pattern this template was compiled from.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.definition.template
    }

    /// Match `input` against the whole pattern.
    #[must_use]
    pub fn captures(&self, input: &str) -> Option<Captures> {
        let mut captured = Vec::new();
        match_from(&self.segments, input, &mut captured).then_some(Captures(captured))
    }

    /// Build the rewritten action from captured values.
    ///
    /// # Errors
    ///
    /// Returns [`ActionParseError`] when the substituted URI is not a valid
    /// action target.
    pub fn render(&self, captures: &Captures) -> Result<Action, ActionParseError> {
        let mut uri = captures.substitute(&self.definition.action);
        for (index, (key, value)) in self.definition.query.iter().enumerate() {
            let separator = if index == 0 { '?' } else { '&' };
            let value = form_urlencode(&captures.substitute(value));
            let _ = write!(uri, "{separator}{key}={value}");
        }
        Ok(Action {
            target: Target::parse(&uri)?,
            method: self.definition.method.clone(),
            payload: self
                .definition
                .payload
                .as_deref()
                .map(|payload| captures.substitute(payload)),
        })
    }
}

fn parse_segments(pattern: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut rest = pattern;

    while let Some(open) = rest.find('<') {
        let after = &rest[open + 1..];
        let name_len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        if name_len > 0 && after[name_len..].starts_with('>') {
            literal.push_str(&rest[..open]);
            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Placeholder(after[..name_len].to_string()));
            rest = &after[name_len + 1..];
        } else {
            literal.push_str(&rest[..=open]);
            rest = after;
        }
    }
    literal.push_str(rest);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    segments
}

/// Backtracking match; placeholders are greedy over `[^:]+`.
fn match_from(segments: &[Segment], input: &str, captured: &mut Vec<(String, String)>) -> bool {
    match segments.split_first() {
        None => input.is_empty(),
        Some((Segment::Literal(literal), rest)) => input
            .strip_prefix(literal.as_str())
            .is_some_and(|tail| match_from(rest, tail, captured)),
        Some((Segment::Placeholder(name), rest)) => {
            let limit = input.find(':').unwrap_or(input.len());
            for end in (1..=limit).rev() {
                if !input.is_char_boundary(end) {
                    continue;
                }
                captured.push((name.clone(), input[..end].to_string()));
                if match_from(rest, &input[end..], captured) {
                    return true;
                }
                captured.pop();
            }
            false
        }
    }
}

/// `application/x-www-form-urlencoded` encoding of a single value.
fn form_urlencode(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'.' | b'-' | b'*' | b'_' => {
                out.push(char::from(byte));
            }
            b' ' => out.push('+'),
            other => {
                let _ = write!(out, "%{other:02X}");
            }
        }
    }
    out
}
