use std::io;
use std::pin::Pin;
use std::task::{Context, Poll, ready};

use tokio::io::{AsyncRead, ReadBuf};

use super::ChunkSource;

/// Chunk source over an [`AsyncRead`].
///
/// Each chunk is the result of one read, at most `chunk_size` bytes.
/// A zero-byte read is the end of stream.
#[derive(Debug)]
pub struct ReadChunks<IO> {
    io: IO,
    chunk_size: usize,
    leftover: Option<Vec<u8>>,
}

impl<IO> ReadChunks<IO> {
    /// Constructor.
    #[inline]
    pub fn new(io: IO, chunk_size: usize) -> Self {
        Self {
            io,
            chunk_size: std::cmp::max(chunk_size, 1),
            leftover: None,
        }
    }

    /// Hand out `leftover` before reading from `io`,
    /// e.g. bytes read past the end of an upgrade request.
    #[inline]
    pub fn with_leftover(io: IO, chunk_size: usize, leftover: Vec<u8>) -> Self {
        let mut this = Self::new(io, chunk_size);
        if !leftover.is_empty() {
            this.leftover = Some(leftover);
        }
        this
    }

    #[inline]
    pub fn into_inner(self) -> IO { self.io }
}

impl<IO> AsRef<IO> for ReadChunks<IO> {
    #[inline]
    fn as_ref(&self) -> &IO { &self.io }
}

impl<IO> AsMut<IO> for ReadChunks<IO> {
    #[inline]
    fn as_mut(&mut self) -> &mut IO { &mut self.io }
}

impl<IO: AsyncRead + Unpin> ChunkSource for ReadChunks<IO> {
    fn poll_chunk(&mut self, cx: &mut Context<'_>) -> Poll<io::Result<Option<Vec<u8>>>> {
        if let Some(chunk) = self.leftover.take() {
            return Poll::Ready(Ok(Some(chunk)));
        }

        let mut chunk = vec![0; self.chunk_size];
        let mut buf = ReadBuf::new(&mut chunk);
        ready!(Pin::new(&mut self.io).poll_read(cx, &mut buf))?;

        let read_n = buf.filled().len();

        // EOF ?
        if read_n == 0 {
            return Poll::Ready(Ok(None));
        }

        chunk.truncate(read_n);
        Poll::Ready(Ok(Some(chunk)))
    }
}
