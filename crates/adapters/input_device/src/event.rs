//! `struct input_event` decoding.
//!
//! | Offset | Field | Type |
//! |--------|-------|------|
//! | 0–15 | Timestamp | ignored |
//! | 16–17 | Type | u16 LE |
//! | 18–19 | Code | u16 LE |
//! | 20–23 | Value | i32 LE |

use nexus_app::ports::{FrameDecoder, RawInput, RawKey};

use crate::keys;

/// Size of one record on 64-bit kernels.
pub const RECORD_SIZE: usize = 24;

const EV_SYN: u16 = 0x00;
const EV_KEY: u16 = 0x01;

/// One decoded record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    pub kind: u16,
    pub code: u16,
    pub value: i32,
}

impl InputEvent {
    /// Decode a record, or `None` when `record` is too short.
    #[must_use]
    pub fn parse(record: &[u8]) -> Option<Self> {
        let field = record.get(16..RECORD_SIZE)?;
        Some(Self {
            kind: u16::from_le_bytes([field[0], field[1]]),
            code: u16::from_le_bytes([field[2], field[3]]),
            value: i32::from_le_bytes([field[4], field[5], field[6], field[7]]),
        })
    }
}

/// Key name used in identifiers: `KEY:<name>`, or `KEY:<code as 4 hex digits>`
/// for codes without a known name.
#[must_use]
pub fn key_label(code: u16) -> String {
    match keys::key_name(code) {
        Some(name) => format!("KEY:{name}"),
        None => format!("KEY:{code:04x}"),
    }
}

/// [`FrameDecoder`] for evdev records.
#[derive(Debug, Default, Clone, Copy)]
pub struct InputEventDecoder;

impl FrameDecoder for InputEventDecoder {
    fn decode(&self, frame: &[u8]) -> Option<RawInput> {
        let event = InputEvent::parse(frame)?;
        match event.kind {
            EV_SYN => None,
            EV_KEY => {
                let key = RawKey::new(key_label(event.code))
                    .with_modifier(keys::modifier(event.code));
                Some(match event.value {
                    0 => RawInput::Up(key),
                    1 => RawInput::Down(key),
                    2 => RawInput::Repeat(key),
                    _ => RawInput::Unknown(key),
                })
            }
            kind => Some(RawInput::Auxiliary(format!(
                "{kind:04x}:{:04x}:{:08x}",
                event.code, event.value
            ))),
        }
    }
}

#[cfg(test)]
pub(crate) fn record(kind: u16, code: u16, value: i32) -> Vec<u8> {
    let mut record = vec![0xEE; 16];
    record.extend_from_slice(&kind.to_le_bytes());
    record.extend_from_slice(&code.to_le_bytes());
    record.extend_from_slice(&value.to_le_bytes());
    record
}

#[cfg(test)]
mod tests {
    use nexus_domain::key_event::Modifier;

    use super::*;

    #[test]
    fn should_parse_fields_at_fixed_offsets() {
        let event = InputEvent::parse(&record(1, 115, 1)).unwrap();
        assert_eq!(
            event,
            InputEvent {
                kind: 1,
                code: 115,
                value: 1
            }
        );
        assert_eq!(InputEvent::parse(&[0; 23]), None);
    }

    #[test]
    fn should_decode_key_transitions() {
        let decoder = InputEventDecoder;
        let volume_up = RawKey::new("KEY:VOLUMEUP");
        assert_eq!(
            decoder.decode(&record(1, 115, 1)),
            Some(RawInput::Down(volume_up.clone()))
        );
        assert_eq!(
            decoder.decode(&record(1, 115, 2)),
            Some(RawInput::Repeat(volume_up.clone()))
        );
        assert_eq!(
            decoder.decode(&record(1, 115, 0)),
            Some(RawInput::Up(volume_up.clone()))
        );
        assert_eq!(
            decoder.decode(&record(1, 115, 7)),
            Some(RawInput::Unknown(volume_up))
        );
    }

    #[test]
    fn should_decode_unexpected_value_as_unknown() {
        assert_eq!(
            InputEventDecoder.decode(&record(1, 30, 3)),
            Some(RawInput::Unknown(RawKey::new("KEY:A")))
        );
    }

    #[test]
    fn should_attach_modifier_semantics() {
        assert_eq!(
            InputEventDecoder.decode(&record(1, 54, 1)),
            Some(RawInput::Down(
                RawKey::new("KEY:RIGHTSHIFT").with_modifier(Some(Modifier::Shift))
            ))
        );
    }

    #[test]
    fn should_fall_back_to_hex_name() {
        assert_eq!(
            InputEventDecoder.decode(&record(1, 0x2fe, 1)),
            Some(RawInput::Down(RawKey::new("KEY:02fe")))
        );
    }

    #[test]
    fn should_ignore_sync_and_pass_other_types_through() {
        assert_eq!(InputEventDecoder.decode(&record(0, 0, 0)), None);
        assert_eq!(
            InputEventDecoder.decode(&record(2, 7, -1)),
            Some(RawInput::Auxiliary("0002:0007:ffffffff".to_string()))
        );
        assert_eq!(
            InputEventDecoder.decode(&record(4, 4, 0x7002c)),
            Some(RawInput::Auxiliary("0004:0004:0007002c".to_string()))
        );
    }
}
