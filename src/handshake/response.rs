//! Server upgrade response.
//!
//! From [RFC-6455 Section 4.2.2](https://datatracker.ietf.org/doc/html/rfc6455#section-4.2.2):
//!
//! ```text
//! HTTP/1.1 101 Switching Protocols
//! upgrade: websocket
//! connection: upgrade
//! sec-websocket-accept: s3pPLMBiTxaQ9kYGzzhZRbK+xOo=
//! ```
//!
//! If the server chooses not to accept the connection, it MUST
//! return an appropriate HTTP error code (e.g., 400 Bad Request).

use super::{write_header, derive_accept_key, Request};
use super::{HTTP_LINE_BREAK, HTTP_HEADER_SP, HTTP_STATUS_LINE, HTTP_REJECT_LINE};
use super::static_headers::*;

/// Http response presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Response {
    pub sec_accept: [u8; 28],
}

impl Response {
    /// Constructor, derive the accept key from the request's key.
    #[inline]
    pub fn new(request: &Request<'_>) -> Self {
        Self {
            sec_accept: derive_accept_key(request.sec_key),
        }
    }

    /// Append `101 Switching Protocols` to the buffer,
    /// return the number of written bytes.
    pub fn encode(&self, buf: &mut Vec<u8>) -> usize {
        let beg = buf.len();

        buf.extend_from_slice(HTTP_STATUS_LINE);
        buf.extend_from_slice(HTTP_LINE_BREAK);

        // upgrade: websocket
        write_header!(buf, HEADER_UPGRADE_NAME, HEADER_UPGRADE_VALUE);

        // connection: upgrade
        write_header!(buf, HEADER_CONNECTION_NAME, HEADER_CONNECTION_VALUE);

        // sec-websocket-accept: {sec_accept}
        write_header!(buf, HEADER_SEC_WEBSOCKET_ACCEPT_NAME, &self.sec_accept);

        // finish with CRLF
        buf.extend_from_slice(HTTP_LINE_BREAK);

        buf.len() - beg
    }

    /// Append `400 Bad Request` to the buffer,
    /// return the number of written bytes.
    pub fn reject(buf: &mut Vec<u8>) -> usize {
        let beg = buf.len();

        buf.extend_from_slice(HTTP_REJECT_LINE);
        buf.extend_from_slice(HTTP_LINE_BREAK);

        // connection: close
        write_header!(buf, HEADER_CONNECTION_NAME, b"close");

        // content-length: 0
        write_header!(buf, HEADER_CONTENT_LENGTH_NAME, b"0");

        buf.extend_from_slice(HTTP_LINE_BREAK);

        buf.len() - beg
    }
}
