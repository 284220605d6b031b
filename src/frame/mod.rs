//! Websocket data frame.
//!
//! [RFC-6455 Section5](https://datatracker.ietf.org/doc/html/rfc6455#section-5)
//!
//! ```text
//! 0                   1                   2                   3
//! 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-------+-+-------------+-------------------------------+
//! |F|R|R|R| opcode|M| Payload len |    Extended payload length    |
//! |I|S|S|S|  (4)  |A|     (7)     |             (16/64)           |
//! |N|V|V|V|       |S|             |   (if payload len==126/127)   |
//! | |1|2|3|       |K|             |                               |
//! +-+-+-+-+-------+-+-------------+ - - - - - - - - - - - - - - - +
//! |     Extended payload length continued, if payload len == 127  |
//! + - - - - - - - - - - - - - - - +-------------------------------+
//! |                               |Masking-key, if MASK set to 1  |
//! +-------------------------------+-------------------------------+
//! | Masking-key (continued)       |          Payload Data         |
//! +-------------------------------- - - - - - - - - - - - - - - - +
//! :                     Payload Data continued ...                :
//! + - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - - +
//! |                     Payload Data continued ...                |
//! +---------------------------------------------------------------+
//! ```
//!

pub mod flag;
pub mod length;
pub mod mask;
pub mod close;

pub use flag::{Fin, Rsv, OpCode};
pub use length::PayloadLen;
pub use mask::Mask;

use crate::error::FrameError;

/// 2 + 8 + 4
pub const MAX_FRAME_HEAD_LEN: usize = 14;

/// Control frames carry at most 125 bytes.
pub const MAX_CONTROL_PAYLOAD: u64 = 125;

/// Websocket frame head.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHead {
    pub fin: Fin,
    pub rsv: Rsv,
    pub opcode: OpCode,
    pub mask: Mask,
    pub length: PayloadLen,
}

impl FrameHead {
    /// Constructor, reserved bits are left clear.
    #[inline]
    pub const fn new(fin: Fin, opcode: OpCode, mask: Mask, length: PayloadLen) -> Self {
        Self {
            fin,
            rsv: Rsv::NONE,
            opcode,
            mask,
            length,
        }
    }

    /// Number of bytes [`encode`](Self::encode) writes.
    #[inline]
    pub const fn encoded_len(&self) -> usize {
        let mask_len = match self.mask {
            Mask::Key(_) => 4,
            Mask::None => 0,
        };
        2 + self.length.ext_len() + mask_len
    }

    /// Encode to provided buffer, returns the count of written bytes.
    /// The caller should ensure the buffer is large enough,
    /// otherwise a [`FrameError::NotEnoughCapacity`] error will be returned.
    pub fn encode(&self, buf: &mut [u8]) -> Result<usize, FrameError> {
        let n = self.encoded_len();
        if buf.len() < n {
            return Err(FrameError::NotEnoughCapacity);
        }

        // fin, rsv, opcode
        buf[0] = self.fin as u8 | self.rsv.to_flag() | self.opcode as u8;

        // mask, payload length
        buf[1] = self.mask.to_flag() | self.length.to_flag();

        let mut pos = 2;

        // extended payload length
        match self.length {
            PayloadLen::Standard(_) => {}
            PayloadLen::Extended1(v) => buf[2..4].copy_from_slice(&v.to_be_bytes()),
            PayloadLen::Extended2(v) => buf[2..10].copy_from_slice(&v.to_be_bytes()),
        };
        pos += self.length.ext_len();

        // mask key
        if let Mask::Key(k) = self.mask {
            buf[pos..pos + 4].copy_from_slice(&k);
            pos += 4;
        }

        Ok(pos)
    }

    /// Parse from provided buffer, returns [`FrameHead`] and the count of read bytes
    /// if the parse succeeds.
    /// If there is not enough data to parse, a [`FrameError::NotEnoughData`] error
    /// will be returned.
    pub fn decode(buf: &[u8]) -> Result<(Self, usize), FrameError> {
        if buf.len() < 2 {
            return Err(FrameError::NotEnoughData);
        }

        // fin, rsv, opcode
        let b1 = buf[0];

        // mask, payload length
        let b2 = buf[1];

        let fin = Fin::from_flag(b1);
        let rsv = Rsv::from_flag(b1);
        let opcode = OpCode::from_flag(b1)?;

        let mut length = PayloadLen::from_flag(b2);
        let mut n = 2 + length.ext_len();
        let masked = Mask::is_flag_set(b2);

        if buf.len() < n + if masked { 4 } else { 0 } {
            return Err(FrameError::NotEnoughData);
        }

        match length {
            PayloadLen::Standard(_) => {}
            PayloadLen::Extended1(_) => length = PayloadLen::from_byte2([buf[2], buf[3]]),
            PayloadLen::Extended2(_) => {
                let mut b8 = [0_u8; 8];
                b8.copy_from_slice(&buf[2..10]);
                length = PayloadLen::from_byte8(b8);
            }
        };

        let mask = if masked {
            let key = [buf[n], buf[n + 1], buf[n + 2], buf[n + 3]];
            n += 4;
            Mask::Key(key)
        } else {
            Mask::None
        };

        Ok((
            FrameHead {
                fin,
                rsv,
                opcode,
                mask,
                length,
            },
            n,
        ))
    }
}

/// A whole websocket frame.
///
/// The payload is always held unmasked. `mask` records the key the frame
/// arrived with, or the key to apply when it is encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub fin: Fin,
    pub rsv: Rsv,
    pub opcode: OpCode,
    pub mask: Mask,
    pub payload: Vec<u8>,
}

impl Frame {
    /// Constructor, unmasked, reserved bits clear.
    #[inline]
    pub fn new(fin: Fin, opcode: OpCode, payload: Vec<u8>) -> Self {
        Self {
            fin,
            rsv: Rsv::NONE,
            opcode,
            mask: Mask::None,
            payload,
        }
    }

    #[inline]
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(Fin::Y, OpCode::Text, text.into().into_bytes())
    }

    #[inline]
    pub fn binary(data: impl Into<Vec<u8>>) -> Self { Self::new(Fin::Y, OpCode::Binary, data.into()) }

    #[inline]
    pub fn ping(data: impl Into<Vec<u8>>) -> Self { Self::new(Fin::Y, OpCode::Ping, data.into()) }

    #[inline]
    pub fn pong(data: impl Into<Vec<u8>>) -> Self { Self::new(Fin::Y, OpCode::Pong, data.into()) }

    /// Close with status 1000 and no reason.
    #[inline]
    pub fn close() -> Self { Self::close_with(close::NORMAL, "") }

    /// Close with status 1002 and a reason.
    #[inline]
    pub fn close_with_reason(reason: &str) -> Self { Self::close_with(close::PROTOCOL_ERROR, reason) }

    /// Close with a custom status and reason.
    #[inline]
    pub fn close_with(code: u16, reason: &str) -> Self {
        Self::new(Fin::Y, OpCode::Close, close::encode_payload(code, reason))
    }

    #[inline]
    pub fn with_fin(mut self, fin: Fin) -> Self {
        self.fin = fin;
        self
    }

    #[inline]
    pub fn with_mask(mut self, mask: Mask) -> Self {
        self.mask = mask;
        self
    }

    #[inline]
    pub fn is_fin(&self) -> bool { self.fin.is_set() }

    #[inline]
    pub fn is_control(&self) -> bool { self.opcode.is_control() }

    /// Status code of a close frame.
    #[inline]
    pub fn close_code(&self) -> Option<u16> {
        match self.opcode {
            OpCode::Close => close::decode_payload(&self.payload).map(|(code, _)| code),
            _ => None,
        }
    }

    /// Reason of a close frame.
    #[inline]
    pub fn close_reason(&self) -> Option<&str> {
        match self.opcode {
            OpCode::Close => close::decode_payload(&self.payload).and_then(|(_, r)| r),
            _ => None,
        }
    }

    /// Head describing this frame.
    #[inline]
    pub fn head(&self) -> FrameHead {
        FrameHead {
            fin: self.fin,
            rsv: self.rsv,
            opcode: self.opcode,
            mask: self.mask,
            length: PayloadLen::from_num(self.payload.len() as u64),
        }
    }

    /// Append the wire form of this frame to `buf`,
    /// masking the payload if a key is set.
    pub fn encode(&self, buf: &mut Vec<u8>) {
        let head = self.head();
        let beg = buf.len();
        let head_len = head.encoded_len();

        buf.resize(beg + head_len, 0);
        // the buffer was just sized to fit
        let _ = head.encode(&mut buf[beg..]);

        let data_beg = buf.len();
        buf.extend_from_slice(&self.payload);
        if let Mask::Key(key) = self.mask {
            mask::apply_mask4(key, &mut buf[data_beg..]);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn frame_head() {
        let head = FrameHead {
            fin: Fin::Y,
            rsv: Rsv::NONE,
            opcode: OpCode::Binary,
            mask: Mask::Key(mask::new_mask_key()),
            length: PayloadLen::from_num(4096),
        };

        let head2 = FrameHead {
            fin: Fin::N,
            rsv: Rsv {
                rsv1: true,
                rsv2: false,
                rsv3: true,
            },
            opcode: OpCode::Text,
            mask: Mask::None,
            length: PayloadLen::from_num(100000),
        };

        for head in [head, head2] {
            let mut buf = vec![0; 1024];

            let encode_n = head.encode(&mut buf).unwrap();
            assert_eq!(encode_n, head.encoded_len());

            let (head2, decode_n) = FrameHead::decode(&buf[0..encode_n + 128]).unwrap();

            assert_eq!(encode_n, decode_n);
            assert_eq!(head, head2);
        }
    }

    #[test]
    fn frame_head_partial() {
        let head = FrameHead::new(
            Fin::Y,
            OpCode::Binary,
            Mask::Key([1, 2, 3, 4]),
            PayloadLen::from_num(70000),
        );
        let mut buf = [0; MAX_FRAME_HEAD_LEN];
        let n = head.encode(&mut buf).unwrap();
        assert_eq!(n, MAX_FRAME_HEAD_LEN);

        for i in 0..n {
            assert_eq!(FrameHead::decode(&buf[..i]), Err(FrameError::NotEnoughData));
        }
        assert!(head.encode(&mut buf[..n - 1]).is_err());
    }

    #[test]
    fn encode_masked_frame() {
        let frame = Frame::text("Hello").with_mask(Mask::Key([0x37, 0xfa, 0x21, 0x3d]));
        let mut buf = Vec::new();
        frame.encode(&mut buf);

        // RFC-6455 Section 5.7
        assert_eq!(
            buf,
            [0x81, 0x85, 0x37, 0xfa, 0x21, 0x3d, 0x7f, 0x9f, 0x4d, 0x51, 0x58]
        );
    }

    #[test]
    fn close_frame() {
        assert_eq!(Frame::close().payload, [0x03, 0xe8]);
        assert_eq!(Frame::close_with_reason("Err").payload, [0x03, 0xea, b'E', b'r', b'r']);
        assert_eq!(Frame::close_with(4000, "Err").payload, [0x0f, 0xa0, b'E', b'r', b'r']);

        let frame = Frame::close_with_reason("Err");
        assert_eq!(frame.close_code(), Some(close::PROTOCOL_ERROR));
        assert_eq!(frame.close_reason(), Some("Err"));
        assert_eq!(Frame::ping("x").close_code(), None);
    }
}
