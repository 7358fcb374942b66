//! Linux key-code names (`KEY_*` in `input-event-codes.h`, prefix dropped).

use evdev::Key;
use nexus_domain::key_event::Modifier;

/// Name of `code` without the `KEY_` prefix, if it is a known key. Button
/// codes keep their `BTN_` prefix.
#[must_use]
pub fn key_name(code: u16) -> Option<String> {
    let name = format!("{:?}", Key::new(code));
    if let Some(stripped) = name.strip_prefix("KEY_") {
        Some(stripped.to_string())
    } else if name.starts_with("BTN_") {
        Some(name)
    } else {
        None
    }
}

/// Modifier semantics of `code`, if it is a modifier key.
#[must_use]
pub fn modifier(code: u16) -> Option<Modifier> {
    match Key::new(code) {
        Key::KEY_LEFTSHIFT | Key::KEY_RIGHTSHIFT => Some(Modifier::Shift),
        Key::KEY_LEFTCTRL | Key::KEY_RIGHTCTRL => Some(Modifier::Ctrl),
        Key::KEY_LEFTALT | Key::KEY_RIGHTALT => Some(Modifier::Alt),
        Key::KEY_LEFTMETA | Key::KEY_RIGHTMETA => Some(Modifier::Meta),
        _ => None,
    }
}
