use std::fmt::{Display, Formatter};

#[derive(Debug, PartialEq, Eq)]
pub enum FrameError {
    IllegalOpCode(u8),

    IllegalData,

    PayloadTooLarge(u64),

    Truncated,

    UnexpectedContinuation,

    UnexpectedIncomplete,

    FragmentedControl,

    MessageTooLarge(usize),

    NotEnoughData,

    NotEnoughCapacity,
}

impl Display for FrameError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use FrameError::*;
        match self {
            IllegalOpCode(b) => write!(f, "Illegal opcode value: {:#x}", b),
            IllegalData => write!(f, "Control frame payload exceeds 125 bytes"),
            PayloadTooLarge(n) => write!(f, "Frame payload too large: {} bytes", n),
            Truncated => write!(f, "Stream terminated mid-frame"),
            UnexpectedContinuation => write!(f, "Continuation frame without a fragmented message"),
            UnexpectedIncomplete => {
                write!(f, "New fragmented message while another is incomplete")
            }
            FragmentedControl => write!(f, "Control frame must not be fragmented"),
            MessageTooLarge(n) => write!(f, "Reassembled message exceeds {} bytes", n),
            NotEnoughData => write!(f, "Not enough data to parse"),
            NotEnoughCapacity => write!(f, "Not enough space to write to"),
        }
    }
}

// use default impl
impl std::error::Error for FrameError {}
