//! Fin flag, reserved bits and opcode.

use crate::error::FrameError;

/// Fin flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fin {
    /// a byte with its leading bit set
    Y = 0x80,

    /// a byte with its leading bit clear
    N = 0x00,
}

/// Reserved bits, carried through untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rsv {
    pub rsv1: bool,
    pub rsv2: bool,
    pub rsv3: bool,
}

/// Frame opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCode {
    /// denotes a continuation frame, 0x00
    Continue = 0x00,
    /// denotes a text frame, 0x01
    Text = 0x01,
    /// denotes a binary frame, 0x02
    Binary = 0x02,

    /// denotes a connection close, 0x08
    Close = 0x08,
    /// denotes a ping, 0x09
    Ping = 0x09,
    /// denotes a pong, 0x0a
    Pong = 0x0a,
}

impl Fin {
    /// Parse from byte.
    #[inline]
    pub const fn from_flag(b: u8) -> Self {
        if b & 0x80 == 0x80 {
            Fin::Y
        } else {
            Fin::N
        }
    }

    #[inline]
    pub const fn from_bool(fin: bool) -> Self {
        if fin {
            Fin::Y
        } else {
            Fin::N
        }
    }

    #[inline]
    pub const fn is_set(self) -> bool { matches!(self, Fin::Y) }
}

impl Rsv {
    /// All bits clear.
    pub const NONE: Rsv = Rsv {
        rsv1: false,
        rsv2: false,
        rsv3: false,
    };

    /// Parse from byte.
    #[inline]
    pub const fn from_flag(b: u8) -> Self {
        Self {
            rsv1: b & 0x40 != 0,
            rsv2: b & 0x20 != 0,
            rsv3: b & 0x10 != 0,
        }
    }

    /// Generate the flag bits.
    #[inline]
    pub const fn to_flag(self) -> u8 {
        (self.rsv1 as u8) << 6 | (self.rsv2 as u8) << 5 | (self.rsv3 as u8) << 4
    }
}

impl OpCode {
    /// Parse from byte.
    #[inline]
    pub const fn from_flag(b: u8) -> Result<Self, FrameError> {
        use OpCode::*;
        let opcode = match b & 0x0f {
            0x00 => Continue,
            0x01 => Text,
            0x02 => Binary,
            0x08 => Close,
            0x09 => Ping,
            0x0a => Pong,
            x => return Err(FrameError::IllegalOpCode(x)),
        };
        Ok(opcode)
    }

    /// Close, ping or pong.
    #[inline]
    pub const fn is_control(self) -> bool { self as u8 & 0x08 != 0 }
}
