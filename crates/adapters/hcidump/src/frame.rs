//! ACL value-notification decoder.
//!
//! Pure functions over `&[u8]`; no process or Bluetooth dependency. Frames
//! are little-endian:
//!
//! | Offset | Field | Type |
//! |--------|-------|------|
//! | 0 | Packet type, `0x02` = ACL data | u8 |
//! | 1–2 | Connection handle + flags, flags (top nibble) must be `0x2` | u16 LE |
//! | 3–4 | ACL length, must equal L2CAP length + 4 | u16 LE |
//! | 5–6 | L2CAP length | u16 LE |
//! | 7–8 | Channel, must be `0x0004` (ATT) | u16 LE |
//! | 9 | ATT opcode, `0x1B` = value notification | u8 |
//! | 10–11 | Attribute handle | u16 LE |
//! | 12… | Value, `L2CAP length − 3` bytes | bytes |

use nexus_app::ports::{FrameDecoder, RawInput, RawKey};

const ACL_DATA: u8 = 0x02;
const START_FLAGS: u16 = 0x2;
const ATT_CHANNEL: u16 = 0x0004;
const VALUE_NOTIFICATION: u8 = 0x1B;
const HEADER_LEN: usize = 12;

/// A decoded value notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification<'a> {
    pub handle: u16,
    pub value: &'a [u8],
}

impl Notification<'_> {
    /// An all-zero value is what remotes send when the button is let go.
    #[must_use]
    pub fn is_release(&self) -> bool {
        self.value.iter().all(|b| *b == 0)
    }

    /// Key name: `<handle as 4 hex digits>:<value as hex>`.
    #[must_use]
    pub fn key_name(&self) -> String {
        format!("{:04x}:{}", self.handle, hex::encode(self.value))
    }
}

fn u16_at(frame: &[u8], offset: usize) -> Option<u16> {
    let bytes = frame.get(offset..offset + 2)?;
    Some(u16::from_le_bytes([bytes[0], bytes[1]]))
}

/// Parse one raw frame into a value notification, or `None` for any frame
/// that is not one.
#[must_use]
pub fn parse_notification(frame: &[u8]) -> Option<Notification<'_>> {
    if *frame.first()? != ACL_DATA {
        return None;
    }
    if u16_at(frame, 1)? >> 12 != START_FLAGS {
        return None;
    }
    let acl_len = u16_at(frame, 3)?;
    let l2cap_len = u16_at(frame, 5)?;
    if u32::from(acl_len) != u32::from(l2cap_len) + 4 {
        return None;
    }
    if u16_at(frame, 7)? != ATT_CHANNEL || *frame.get(9)? != VALUE_NOTIFICATION {
        return None;
    }
    let handle = u16_at(frame, 10)?;
    let value_len = usize::from(l2cap_len.checked_sub(3)?);
    let value = frame.get(HEADER_LEN..HEADER_LEN + value_len)?;
    Some(Notification { handle, value })
}

/// [`FrameDecoder`] that surfaces notifications on allow-listed handles.
#[derive(Debug, Clone)]
pub struct NotificationDecoder {
    handles: Vec<u16>,
}

impl NotificationDecoder {
    #[must_use]
    pub fn new(handles: Vec<u16>) -> Self {
        Self { handles }
    }
}

impl FrameDecoder for NotificationDecoder {
    fn decode(&self, frame: &[u8]) -> Option<RawInput> {
        let notification = parse_notification(frame)?;
        if !self.handles.contains(&notification.handle) {
            tracing::trace!(handle = notification.handle, "handle not in allow-list");
            return None;
        }
        // Each notification is the remote's full state: a new value means the
        // previous button is no longer down.
        if notification.is_release() {
            Some(RawInput::UpAll)
        } else {
            Some(RawInput::Replace(RawKey::new(notification.key_name())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(dump: &str) -> Vec<u8> {
        hex::decode(dump.replace(' ', "")).unwrap()
    }

    fn decoder() -> NotificationDecoder {
        NotificationDecoder::new(vec![0x001F, 0x0023])
    }

    #[test]
    fn should_decode_button_press_on_handle_1f() {
        let frame = bytes("02 01 2E 0B 00 07 00 04 00 1B 1F 00 41 00 00 00");

        let notification = parse_notification(&frame).unwrap();
        assert_eq!(notification.handle, 0x001F);
        assert_eq!(notification.value, &[0x41, 0, 0, 0]);
        assert!(!notification.is_release());

        assert_eq!(
            decoder().decode(&frame),
            Some(RawInput::Replace(RawKey::new("001f:41000000")))
        );
    }

    #[test]
    fn should_decode_all_zero_value_as_release() {
        let frame = bytes("02 01 2E 0B 00 07 00 04 00 1B 1F 00 00 00 00 00");
        assert_eq!(decoder().decode(&frame), Some(RawInput::UpAll));
    }

    #[test]
    fn should_decode_longer_value_on_handle_23() {
        let frame = bytes("02 01 2E 0F 00 0B 00 04 00 1B 23 00 00 00 1E 00 00 00 00 00");
        assert_eq!(
            decoder().decode(&frame),
            Some(RawInput::Replace(RawKey::new("0023:00001e0000000000")))
        );
    }

    #[test]
    fn should_ignore_handles_outside_allow_list() {
        let frame = bytes("02 01 2E 08 00 04 00 04 00 1B 40 00 07");
        assert!(parse_notification(&frame).is_some());
        assert_eq!(decoder().decode(&frame), None);
    }

    #[test]
    fn should_reject_continuation_fragment_flags() {
        let frame = bytes("02 01 1E 0B 00 07 00 04 00 1B 1F 00 41 00 00 00");
        assert_eq!(parse_notification(&frame), None);
    }

    #[test]
    fn should_reject_inconsistent_lengths() {
        let frame = bytes("02 01 2E 0C 00 07 00 04 00 1B 1F 00 41 00 00 00");
        assert_eq!(parse_notification(&frame), None);
    }

    #[test]
    fn should_reject_other_packet_types_and_opcodes() {
        assert_eq!(parse_notification(&bytes("04 0E 04 01 05 0C 00")), None);
        let write_response = bytes("02 01 2E 0B 00 07 00 04 00 13 1F 00 41 00 00 00");
        assert_eq!(parse_notification(&write_response), None);
    }

    #[test]
    fn should_reject_truncated_frames() {
        let frame = bytes("02 01 2E 0B 00 07 00 04 00 1B 1F 00 41 00");
        assert_eq!(parse_notification(&frame), None);
        assert_eq!(parse_notification(&[]), None);
    }
}
