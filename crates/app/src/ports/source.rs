//! Raw key source ports — framing and decoding of device byte streams.
//!
//! A key source is split in two: a [`FrameReader`] that cuts the underlying
//! stream into frames (fixed-size records, hex-dump lines, …) and a
//! [`FrameDecoder`] that classifies one frame as a key transition. The
//! normalizer owns the timing logic shared by every source.

use std::future::Future;
use std::io;

use nexus_domain::key_event::Modifier;

/// A key as reported by a decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawKey {
    /// Name used in the event identifier (e.g. `VOLUMEUP` or `001f:41`).
    pub name: String,
    /// Modifier semantics carried by this key, if any.
    pub modifier: Option<Modifier>,
}

impl RawKey {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modifier: None,
        }
    }

    #[must_use]
    pub fn with_modifier(mut self, modifier: Option<Modifier>) -> Self {
        self.modifier = modifier;
        self
    }
}

/// One decoded frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawInput {
    /// The key went down.
    Down(RawKey),
    /// The key went up.
    Up(RawKey),
    /// Every key currently down went up (e.g. an all-zero notification).
    UpAll,
    /// A full-state report: this key is now the only one down. Other held
    /// keys are released first; the key itself is pressed unless already
    /// down.
    Replace(RawKey),
    /// The source reported its own auto-repeat for the key.
    Repeat(RawKey),
    /// A key record whose value could not be classified.
    Unknown(RawKey),
    /// A non-key record, passed through with this detail string.
    Auxiliary(String),
}

/// Cuts a byte stream into frames.
pub trait FrameReader: Send + 'static {
    /// Read the next frame; `Ok(None)` signals end of stream.
    fn next_frame(&mut self) -> impl Future<Output = io::Result<Option<Vec<u8>>>> + Send;
}

/// Classifies a single frame.
pub trait FrameDecoder: Send + Sync + 'static {
    /// Decode `frame`, or `None` when it carries nothing of interest.
    fn decode(&self, frame: &[u8]) -> Option<RawInput>;
}
