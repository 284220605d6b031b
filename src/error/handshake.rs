use std::fmt::{Display, Formatter};

/// Reasons an upgrade request is refused.
#[derive(Debug, PartialEq, Eq)]
pub enum HandshakeError {
    /// Not `GET`.
    HttpMethod,

    /// Not HTTP/1.1.
    HttpVersion,

    HttpHost,

    /// `upgrade` missing or not `websocket`.
    Upgrade,

    /// `connection` missing or without the `upgrade` token.
    Connection,

    SecWebSocketKey,

    /// `sec-websocket-version` missing or not 13.
    SecWebSocketVersion,

    /// The request is incomplete, read more and retry.
    NotEnoughData,

    /// The request did not end within this many bytes.
    RequestTooLarge(usize),

    Httparse(httparse::Error),
}

impl Display for HandshakeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use HandshakeError::*;
        match self {
            HttpMethod => write!(f, "Upgrade request must use GET"),
            HttpVersion => write!(f, "Upgrade request must be HTTP/1.1"),
            HttpHost => write!(f, "Upgrade request without host"),
            Upgrade => write!(f, "Upgrade header is not websocket"),
            Connection => write!(f, "Connection header lacks the upgrade token"),
            SecWebSocketKey => write!(f, "Upgrade request without sec-websocket-key"),
            SecWebSocketVersion => write!(f, "Websocket version is not 13"),
            NotEnoughData => write!(f, "Upgrade request is incomplete"),
            RequestTooLarge(n) => write!(f, "Upgrade request exceeds {} bytes", n),
            Httparse(e) => write!(f, "Malformed upgrade request: {}", e),
        }
    }
}

impl From<httparse::Error> for HandshakeError {
    fn from(e: httparse::Error) -> Self { HandshakeError::Httparse(e) }
}

impl std::error::Error for HandshakeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HandshakeError::Httparse(e) => Some(e),
            _ => None,
        }
    }
}
