//! # nexus-domain
//!
//! Pure domain model for the nexus automation hub.
//!
//! ## Responsibilities
//! - Foundational types: typed identifiers, error conventions
//! - Define **Actions** (scheme-addressed commands with optional method/payload)
//! - Define **Devices** (activation/deactivation steps, local key mappings)
//! - Define **Activities** (participant sets, setup steps, local command mappings)
//! - Define **Templates** (pattern-driven action rewriting)
//! - Hold everything in a **Catalog** that owns devices and activities
//! - Define the **key-event vocabulary** shared by all input sources
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;

pub mod action;
pub mod activity;
pub mod catalog;
pub mod device;
pub mod key_event;
pub mod template;
