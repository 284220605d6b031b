#![allow(missing_docs)]
//! Errors
//!
//! Transport-terminal conditions (disconnect, end of stream) are not errors,
//! they end a sequence with `Ok(None)`. Everything here is scoped to the
//! connection it was raised on.

mod frame;
mod scan;
mod multipart;
mod handshake;

pub use frame::FrameError;
pub use scan::ScanError;
pub use multipart::MultipartError;
pub use handshake::HandshakeError;

use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum Error {
    Frame(FrameError),

    Scan(ScanError),

    Multipart(MultipartError),

    Handshake(HandshakeError),

    Io(std::io::Error),
}

impl From<FrameError> for Error {
    fn from(e: FrameError) -> Self { Error::Frame(e) }
}

impl From<ScanError> for Error {
    fn from(e: ScanError) -> Self { Error::Scan(e) }
}

impl From<MultipartError> for Error {
    fn from(e: MultipartError) -> Self { Error::Multipart(e) }
}

impl From<HandshakeError> for Error {
    fn from(e: HandshakeError) -> Self { Error::Handshake(e) }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error { Error::Io(e) }
}

impl From<Error> for std::io::Error {
    fn from(e: Error) -> Self {
        use std::io::ErrorKind;
        match e {
            Error::Io(e) => e,
            e => std::io::Error::new(ErrorKind::InvalidData, e),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use Error::*;
        match self {
            Frame(e) => write!(f, "Frame error: {}", e),
            Scan(e) => write!(f, "Scan error: {}", e),
            Multipart(e) => write!(f, "Multipart error: {}", e),
            Handshake(e) => write!(f, "Handshake error: {}", e),
            Io(e) => write!(f, "Io error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        use Error::*;

        match self {
            Frame(e) => Some(e),
            Scan(e) => Some(e),
            Multipart(e) => Some(e),
            Handshake(e) => Some(e),
            Io(e) => Some(e),
        }
    }
}
