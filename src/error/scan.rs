use std::fmt::{Display, Formatter};

#[derive(Debug, PartialEq, Eq)]
pub enum ScanError {
    SegmentTooLarge(usize),
}

impl Display for ScanError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use ScanError::*;
        match self {
            SegmentTooLarge(n) => write!(f, "Segment exceeds {} bytes without a delimiter", n),
        }
    }
}

// use default impl
impl std::error::Error for ScanError {}
