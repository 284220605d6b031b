//! Client upgrade request.
//!
//! From [RFC-6455 Section 4.1](https://datatracker.ietf.org/doc/html/rfc6455#section-4.1):
//!
//! Once a connection to the server has been established (including a
//! connection via a proxy or over a TLS-encrypted tunnel), the client
//! MUST send an opening handshake to the server.  The handshake consists
//! of an HTTP Upgrade request, along with a list of required and
//! optional header fields.
//!
//! Example:
//!
//! ```text
//! GET /path HTTP/1.1
//! host: www.example.com
//! upgrade: websocket
//! connection: upgrade
//! sec-websocket-key: dGhlIHNhbXBsZSBub25jZQ==
//! sec-websocket-version: 13
//! ```
//!

use super::{handshake_check, has_token};
use super::{MAX_ALLOW_HEADERS, HTTP_METHOD};
use super::static_headers::*;

use crate::error::HandshakeError;

/// Verified upgrade request, borrowing the buffer it was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Request<'b> {
    pub path: &'b str,
    pub host: &'b [u8],
    pub sec_key: &'b [u8],
    /// Subprotocols offered by the client, if any.
    pub protocol: Option<&'b [u8]>,
}

impl<'b> Request<'b> {
    /// Parse from a provided buffer, return the request and
    /// the number of bytes parsed.
    ///
    /// `host`, `upgrade`, `connection`, `sec-websocket-key` and
    /// `sec-websocket-version` are required and checked (case insensitive).
    /// Other headers are ignored; at most [`MAX_ALLOW_HEADERS`] are accepted.
    ///
    /// If the buffer does not contain a complete http request,
    /// a [`HandshakeError::NotEnoughData`] error will be returned.
    pub fn decode(buf: &'b [u8]) -> Result<(Self, usize), HandshakeError> {
        let mut headers = [httparse::EMPTY_HEADER; MAX_ALLOW_HEADERS];
        let mut request = httparse::Request::new(&mut headers);

        let decode_n = match request.parse(buf)? {
            httparse::Status::Complete(n) => n,
            httparse::Status::Partial => return Err(HandshakeError::NotEnoughData),
        };

        // check method
        if request.method != Some(HTTP_METHOD) {
            return Err(HandshakeError::HttpMethod);
        }

        // check version, should be HTTP/1.1
        // ref: https://docs.rs/httparse/latest/src/httparse/lib.rs.html#581-596
        if request.version != Some(1) {
            return Err(HandshakeError::HttpVersion);
        }

        // first occurrence wins
        let find = |name: &[u8]| -> &'b [u8] {
            request
                .headers
                .iter()
                .find(|h| h.name.as_bytes().eq_ignore_ascii_case(name))
                .map_or(&b""[..], |h| h.value)
        };

        let host = find(HEADER_HOST_NAME);
        let upgrade = find(HEADER_UPGRADE_NAME);
        let connection = find(HEADER_CONNECTION_NAME);
        let sec_key = find(HEADER_SEC_WEBSOCKET_KEY_NAME);
        let sec_version = find(HEADER_SEC_WEBSOCKET_VERSION_NAME);
        let protocol = find(HEADER_SEC_WEBSOCKET_PROTOCOL_NAME);

        // check missing header
        handshake_check!(host, HandshakeError::HttpHost);
        handshake_check!(upgrade, HandshakeError::Upgrade);
        handshake_check!(connection, HandshakeError::Connection);
        handshake_check!(sec_key, HandshakeError::SecWebSocketKey);
        handshake_check!(sec_version, HandshakeError::SecWebSocketVersion);

        // check header value (case insensitive)
        handshake_check!(upgrade, HEADER_UPGRADE_VALUE, HandshakeError::Upgrade);
        handshake_check!(
            sec_version,
            HEADER_SEC_WEBSOCKET_VERSION_VALUE,
            HandshakeError::SecWebSocketVersion
        );

        // e.g. "keep-alive, Upgrade"
        if !has_token(connection, HEADER_CONNECTION_VALUE) {
            return Err(HandshakeError::Connection);
        }

        let path = request.path.unwrap_or("/");

        Ok((
            Self {
                path,
                host,
                sec_key,
                protocol: (!protocol.is_empty()).then_some(protocol),
            },
            decode_n,
        ))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use super::super::test::{make_headers, TEMPLATE_HEADERS};
    use rand::prelude::*;

    #[test]
    fn server_handshake() {
        for i in 0..=(MAX_ALLOW_HEADERS - 6) {
            let hdr_len: usize = thread_rng().gen_range(1..128);
            let headers = format!(
                "GET / HTTP/1.1\r\n{}\r\n",
                make_headers(i, hdr_len, TEMPLATE_HEADERS)
            );

            let (request, decode_n) = Request::decode(headers.as_bytes()).unwrap();

            assert_eq!(decode_n, headers.len());
            assert_eq!(request.path, "/");
            assert_eq!(request.host, b"www.example.com");
            assert_eq!(request.sec_key, b"dGhlIHNhbXBsZSBub25jZQ==");
            assert_eq!(request.protocol, None);
        }
    }

    #[test]
    fn server_handshake2() {
        macro_rules! run {
            ($host: expr, $path: expr, $sec_key: expr) => {{
                let headers = format!(
                    "GET {1} HTTP/1.1\r\n{0}\r\n",
                    make_headers(
                        16,
                        32,
                        &format!(
                            "Host: {0}\r\n\
                            Sec-WebSocket-Key: {1}\r\n\
                            Upgrade: WebSocket\r\n\
                            Connection: keep-alive, Upgrade\r\n\
                            Sec-WebSocket-Protocol: chat\r\n\
                            Sec-WebSocket-Version: 13",
                            $host, $sec_key
                        )
                    ),
                    $path
                );

                let (request, decode_n) = Request::decode(headers.as_bytes()).unwrap();
                assert_eq!(decode_n, headers.len());
                assert_eq!(request.host, $host.as_bytes());
                assert_eq!(request.path, $path);
                assert_eq!(request.sec_key, $sec_key.as_bytes());
                assert_eq!(request.protocol, Some(&b"chat"[..]));
            }};
        }

        run!("host", "/path", "key");
        run!("www.abc.com", "/path/to", "xxxxxx");
        run!("wwww.www.ww.w", "/path/to/to/path", "xxxxxxyyyy");
    }

    #[test]
    fn partial_request() {
        let full = format!("GET / HTTP/1.1\r\n{}\r\n\r\n", TEMPLATE_HEADERS);
        for n in 0..full.len() {
            assert_eq!(
                Request::decode(&full.as_bytes()[..n]),
                Err(HandshakeError::NotEnoughData)
            );
        }
        assert!(Request::decode(full.as_bytes()).is_ok());
    }

    #[test]
    fn bad_request() {
        macro_rules! fail {
            ($req: expr, $e: expr) => {
                assert_eq!(Request::decode($req.as_bytes()).map(|_| ()), Err($e));
            };
        }

        let without = |name: &str| -> String {
            let headers: Vec<&str> = TEMPLATE_HEADERS
                .split("\r\n")
                .filter(|h| !h.starts_with(name))
                .collect();
            format!("GET / HTTP/1.1\r\n{}\r\n\r\n", headers.join("\r\n"))
        };

        fail!(
            format!("POST / HTTP/1.1\r\n{}\r\n\r\n", TEMPLATE_HEADERS),
            HandshakeError::HttpMethod
        );
        fail!(
            format!("GET / HTTP/1.0\r\n{}\r\n\r\n", TEMPLATE_HEADERS),
            HandshakeError::HttpVersion
        );
        fail!(without("host"), HandshakeError::HttpHost);
        fail!(without("upgrade"), HandshakeError::Upgrade);
        fail!(without("connection"), HandshakeError::Connection);
        fail!(without("sec-websocket-key"), HandshakeError::SecWebSocketKey);
        fail!(without("sec-websocket-version"), HandshakeError::SecWebSocketVersion);
        fail!(
            format!(
                "GET / HTTP/1.1\r\n{}\r\n\r\n",
                TEMPLATE_HEADERS.replace("version: 13", "version: 8")
            ),
            HandshakeError::SecWebSocketVersion
        );
        fail!(
            format!(
                "GET / HTTP/1.1\r\n{}\r\n\r\n",
                TEMPLATE_HEADERS.replace("connection: upgrade", "connection: close")
            ),
            HandshakeError::Connection
        );
        fail!(
            format!(
                "GET / HTTP/1.1\r\n{}\r\n\r\n",
                make_headers(MAX_ALLOW_HEADERS, 8, TEMPLATE_HEADERS)
            ),
            HandshakeError::Httparse(httparse::Error::TooManyHeaders)
        );
    }
}
