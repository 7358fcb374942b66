//! # nexus-app
//!
//! Application layer — the hub's runtime core and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters implement:
//!   - `TerminalHandler` / `ContinuingHandler` — act on or rewrite an action
//!   - `Connector` — start an input source that emits event identifiers
//!   - `EventSink` — where input sources deliver those identifiers
//!   - `FrameReader` / `FrameDecoder` — raw byte framing for key sources
//! - Resolve actions through the handler registry (`ActionResolver`)
//! - Provide the built-in `device`, `delay` and template handlers
//! - Drive activity switching (`ActivityStateMachine`)
//! - Gate incoming events (`AdmissionQueue`) and process them one at a time
//!   (`CommandProcessor`)
//! - Turn raw key frames into normalized key events (`KeyEventNormalizer`)
//!
//! ## Dependency rule
//! Depends on `nexus-domain` only (plus `tokio` for tasks, channels and timers).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod activity;
pub mod admission;
pub mod handlers;
pub mod normalizer;
pub mod ports;
pub mod processor;
pub mod resolver;
