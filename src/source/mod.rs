//! Chunked byte source.
//!
//! The transport hands out bytes in pieces of its own choosing. A source
//! yields those pieces one at a time:
//!
//! - `Ok(Some(chunk))`, the next chunk, never empty;
//! - `Ok(None)`, a clean end of stream;
//! - `Err(e)`, a failure, where [`is_disconnect`] tells a vanished peer
//!   apart from other io errors.
//!
//! Once a source has returned `Ok(None)` or an error, callers never poll it
//! again.

use std::io;
use std::collections::VecDeque;
use std::task::{Context, Poll};

cfg_if::cfg_if! {
    if #[cfg(feature = "tokio")] {
        mod async_read;
        pub use async_read::ReadChunks;
    }
}

/// Pull interface over a chunked byte stream.
pub trait ChunkSource {
    /// Attempt to pull the next chunk.
    ///
    /// Returns `Poll::Pending` and arranges for a wakeup when no chunk
    /// is available yet.
    fn poll_chunk(&mut self, cx: &mut Context<'_>) -> Poll<io::Result<Option<Vec<u8>>>>;
}

impl<S: ChunkSource + ?Sized> ChunkSource for &mut S {
    #[inline]
    fn poll_chunk(&mut self, cx: &mut Context<'_>) -> Poll<io::Result<Option<Vec<u8>>>> {
        (**self).poll_chunk(cx)
    }
}

impl<S: ChunkSource + ?Sized> ChunkSource for Box<S> {
    #[inline]
    fn poll_chunk(&mut self, cx: &mut Context<'_>) -> Poll<io::Result<Option<Vec<u8>>>> {
        (**self).poll_chunk(cx)
    }
}

/// Whether an io error means the peer has gone away.
///
/// Such errors end a sequence like a clean end of stream does.
#[inline]
pub fn is_disconnect(e: &io::Error) -> bool {
    use io::ErrorKind::*;
    matches!(
        e.kind(),
        ConnectionReset | ConnectionAborted | BrokenPipe | NotConnected | UnexpectedEof
    )
}

/// In-memory source.
///
/// Hands out pre-split chunks, always ready.
#[derive(Debug, Clone, Default)]
pub struct Chunks {
    chunks: VecDeque<Vec<u8>>,
}

impl Chunks {
    /// Split `data` into chunks of at most `size` bytes.
    pub fn new(data: &[u8], size: usize) -> Self {
        let size = std::cmp::max(size, 1);
        Self {
            chunks: data.chunks(size).map(<[u8]>::to_vec).collect(),
        }
    }

    /// Use the provided chunks as they are. Empty chunks are skipped.
    pub fn from_chunks<I: IntoIterator<Item = Vec<u8>>>(chunks: I) -> Self {
        Self {
            chunks: chunks.into_iter().filter(|c| !c.is_empty()).collect(),
        }
    }

    /// Number of chunks not yet pulled.
    #[inline]
    pub fn remaining(&self) -> usize { self.chunks.len() }
}

impl ChunkSource for Chunks {
    #[inline]
    fn poll_chunk(&mut self, _: &mut Context<'_>) -> Poll<io::Result<Option<Vec<u8>>>> {
        Poll::Ready(Ok(self.chunks.pop_front()))
    }
}
