//! Websocket endpoint.
//!
//! [`Endpoint::accept`] performs the server handshake over an async
//! stream and returns a [`Connection`], which pumps validated inbound
//! frames through a [`Handler`](crate::stream::Handler) and writes the
//! replies back.

mod server;
mod connection;

pub use connection::Connection;

use std::marker::PhantomData;

/// Client or server endpoint.
pub struct Endpoint<IO, Role> {
    _marker: PhantomData<IO>,
    __marker: PhantomData<Role>,
}

#[cfg(test)]
mod test {
    pub const REQUEST: &[u8] = b"\
    GET /ws HTTP/1.1\r\n\
    host: www.example.com\r\n\
    upgrade: websocket\r\n\
    connection: upgrade\r\n\
    sec-websocket-key: dGhlIHNhbXBsZSBub25jZQ==\r\n\
    sec-websocket-version: 13\r\n\r\n";

    pub const RESPONSE: &[u8] = b"\
        HTTP/1.1 101 Switching Protocols\r\n\
        upgrade: websocket\r\n\
        connection: upgrade\r\n\
        sec-websocket-accept: s3pPLMBiTxaQ9kYGzzhZRbK+xOo=\r\n\r\n";
}
