//! Close frame payload.
//!
//! [RFC-6455 Section 5.5.1](https://datatracker.ietf.org/doc/html/rfc6455#section-5.5.1):
//! a close payload starts with a big-endian 16-bit status code,
//! optionally followed by a utf-8 reason.

/// 1000, normal closure.
pub const NORMAL: u16 = 1000;

/// 1001, endpoint going away.
pub const GOING_AWAY: u16 = 1001;

/// 1002, protocol error.
pub const PROTOCOL_ERROR: u16 = 1002;

/// 1009, message too big.
pub const MESSAGE_TOO_BIG: u16 = 1009;

/// Build a close payload.
#[inline]
pub fn encode_payload(code: u16, reason: &str) -> Vec<u8> {
    let mut payload = Vec::with_capacity(2 + reason.len());
    payload.extend_from_slice(&code.to_be_bytes());
    payload.extend_from_slice(reason.as_bytes());
    payload
}

/// Split a close payload into its code and reason.
///
/// An empty payload carries neither. A reason that is not
/// valid utf-8 is dropped.
#[inline]
pub fn decode_payload(payload: &[u8]) -> Option<(u16, Option<&str>)> {
    if payload.len() < 2 {
        return None;
    }
    let code = u16::from_be_bytes([payload[0], payload[1]]);
    let reason = match &payload[2..] {
        [] => None,
        rest => std::str::from_utf8(rest).ok(),
    };
    Some((code, reason))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn close_payload() {
        assert_eq!(encode_payload(NORMAL, ""), [0x03, 0xe8]);
        assert_eq!(encode_payload(PROTOCOL_ERROR, "Err"), [0x03, 0xea, b'E', b'r', b'r']);

        assert_eq!(decode_payload(&[]), None);
        assert_eq!(decode_payload(&[0x03, 0xe8]), Some((NORMAL, None)));
        assert_eq!(
            decode_payload(b"\x03\xeaErr"),
            Some((PROTOCOL_ERROR, Some("Err")))
        );
    }
}
