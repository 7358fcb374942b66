//! Key-event vocabulary shared by every raw input source.
//!
//! Normalized key events are addressed by an identifier string of the form
//! `<source-kind>:<source-id>:<key-name>:<state>[:<modifiers>]`. That string
//! is the only coupling between input sources and the input-mapping table.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Derived state of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyState {
    Pressed,
    Released,
    /// Released before the long-press threshold.
    ShortPressed,
    /// Auto-repeat while the key stays down.
    Held,
    /// Emitted once when the key stays down past the long-press threshold.
    LongPressed,
    /// A key event whose raw value could not be classified.
    Unknown,
}

impl KeyState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pressed => "pressed",
            Self::Released => "released",
            Self::ShortPressed => "short-pressed",
            Self::Held => "held",
            Self::LongPressed => "long-pressed",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for KeyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Modifier semantics a key may carry. Declaration order is output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Shift,
    Ctrl,
    Alt,
    Meta,
}

impl Modifier {
    const ALL: [Self; 4] = [Self::Shift, Self::Ctrl, Self::Alt, Self::Meta];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Shift => "shift",
            Self::Ctrl => "ctrl",
            Self::Alt => "alt",
            Self::Meta => "meta",
        }
    }

    fn bit(self) -> u8 {
        match self {
            Self::Shift => 1,
            Self::Ctrl => 1 << 1,
            Self::Alt => 1 << 2,
            Self::Meta => 1 << 3,
        }
    }
}

/// Set of currently held modifiers; iterates in declaration order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ModifierSet(u8);

impl ModifierSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, modifier: Modifier) {
        self.0 |= modifier.bit();
    }

    pub fn remove(&mut self, modifier: Modifier) {
        self.0 &= !modifier.bit();
    }

    #[must_use]
    pub fn contains(self, modifier: Modifier) -> bool {
        self.0 & modifier.bit() != 0
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Modifier> {
        Modifier::ALL.into_iter().filter(move |m| self.contains(*m))
    }
}

impl fmt::Display for ModifierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, modifier) in self.iter().enumerate() {
            if index > 0 {
                f.write_str("+")?;
            }
            f.write_str(modifier.as_str())?;
        }
        Ok(())
    }
}

/// Identity of one raw input source, e.g. kind `input-device`, id `remote`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SourceRef {
    pub kind: &'static str,
    pub id: String,
}

impl SourceRef {
    #[must_use]
    pub fn new(kind: &'static str, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }

    /// Identifier of a normalized key event from this source.
    #[must_use]
    pub fn key_event(&self, key: &str, state: KeyState, modifiers: ModifierSet) -> String {
        if modifiers.is_empty() {
            format!("{}:{}:{key}:{state}", self.kind, self.id)
        } else {
            format!("{}:{}:{key}:{state}:{modifiers}", self.kind, self.id)
        }
    }

    /// Identifier of a non-key auxiliary event passed through verbatim.
    #[must_use]
    pub fn auxiliary(&self, detail: &str) -> String {
        format!("{}:{}:{detail}", self.kind, self.id)
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}
