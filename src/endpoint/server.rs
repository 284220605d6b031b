use std::io;

use log::debug;
use tokio::io::{AsyncRead, AsyncWrite, AsyncReadExt, AsyncWriteExt, ReadHalf, WriteHalf};

use super::{Connection, Endpoint};

use crate::role::ServerRole;
use crate::handshake::{Request, Response};
use crate::error::{Error, HandshakeError};
use crate::limit::Limits;
use crate::source::ReadChunks;
use crate::stream::{FrameWriter, ValidatedStream};

impl<IO: AsyncRead + AsyncWrite + Unpin, Role: ServerRole> Endpoint<IO, Role> {
    /// Read the upgrade request, verify it and reply.
    ///
    /// The request must fit in [`Limits::max_request_len`] bytes. A request
    /// that fails verification is answered with `400 Bad Request`. Bytes
    /// read past the end of the request are handed to the frame stream.
    pub async fn accept(
        mut io: IO,
        limits: &Limits,
    ) -> Result<Connection<ReadHalf<IO>, WriteHalf<IO>, Role>, Error> {
        let mut buf = vec![0; limits.max_request_len];
        let mut offset = 0;

        let (path, response, decode_n) = loop {
            // provided buffer is filled, however it could not accommodate the request.
            if offset == buf.len() {
                Self::reject(&mut io).await?;
                return Err(HandshakeError::RequestTooLarge(buf.len()).into());
            }

            let n = io.read(&mut buf[offset..]).await?;

            // EOF, no more data
            if n == 0 {
                return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
            }

            offset += n;

            match Request::decode(&buf[..offset]) {
                Ok((request, decode_n)) => {
                    break (request.path.to_string(), Response::new(&request), decode_n)
                }
                Err(HandshakeError::NotEnoughData) => continue,
                Err(e) => {
                    debug!("handshake: rejected, {}", e);
                    Self::reject(&mut io).await?;
                    return Err(e.into());
                }
            }
        };

        let mut reply = Vec::new();
        response.encode(&mut reply);
        io.write_all(&reply).await?;
        io.flush().await?;

        debug!("handshake: accepted {}, {} bytes read ahead", path, offset - decode_n);

        buf.truncate(offset);
        let leftover = buf.split_off(decode_n);

        let (r, w) = tokio::io::split(io);
        let frames = ValidatedStream::new(
            ReadChunks::with_leftover(r, limits.read_chunk_size, leftover),
            limits,
        );
        Ok(Connection::new(path, frames, FrameWriter::new(w)))
    }

    async fn reject(io: &mut IO) -> io::Result<()> {
        let mut reply = Vec::new();
        Response::reject(&mut reply);
        io.write_all(&reply).await?;
        io.flush().await
    }
}
