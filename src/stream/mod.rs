//! Websocket frame sequences.
//!
//! ```text
//! source -> FrameStream -> ValidatedStream -> Replies(handler) -> FrameWriter -> sink
//! ```
//!
//! Every stage owns its state and exposes a single `poll_next` (or its
//! `async fn next` wrapper). A disconnect or a clean end of stream ends a
//! sequence with `Ok(None)`, even inside a frame; any other failure is returned once, after which
//! the sequence stays ended.

mod decode;
mod validate;
mod handler;

cfg_if::cfg_if! {
    if #[cfg(feature = "tokio")] {
        mod write;
        pub use write::FrameWriter;
    }
}

pub use decode::FrameDecoder;
pub use validate::{Validator, ValidatedStream};
pub use handler::{Handler, Echo, Replies, echo, FAREWELL};

use std::future::poll_fn;
use std::task::{Context, Poll, ready};

use log::debug;

use crate::frame::Frame;
use crate::error::{Error, FrameError};
use crate::limit::Limits;
use crate::source::{ChunkSource, is_disconnect};

/// Lazy sequence of raw frames over a [`ChunkSource`].
#[derive(Debug)]
pub struct FrameStream<S> {
    source: S,
    decoder: FrameDecoder,
    done: bool,
}

impl<S> FrameStream<S> {
    /// Constructor.
    #[inline]
    pub fn new(source: S, limits: &Limits) -> Self {
        Self {
            source,
            decoder: FrameDecoder::new(limits),
            done: false,
        }
    }

    /// The sequence has ended, the source will not be polled again.
    #[inline]
    pub fn is_done(&self) -> bool { self.done }

    #[inline]
    pub fn into_inner(self) -> S { self.source }
}

impl<S> AsRef<S> for FrameStream<S> {
    #[inline]
    fn as_ref(&self) -> &S { &self.source }
}

impl<S: ChunkSource> FrameStream<S> {
    /// Attempt to produce the next frame.
    pub fn poll_next(&mut self, cx: &mut Context<'_>) -> Poll<Result<Option<Frame>, Error>> {
        if self.done {
            return Poll::Ready(Ok(None));
        }

        let res = ready!(self.decoder.poll_decode(&mut self.source, cx));

        let res = match res {
            Ok(Some(frame)) => return Poll::Ready(Ok(Some(frame))),
            Ok(None) => {
                debug!("frames: end of stream");
                Ok(None)
            }
            Err(Error::Io(e)) if is_disconnect(&e) => {
                debug!("frames: disconnected, {} bytes dropped", self.decoder.buffered());
                Ok(None)
            }
            Err(Error::Frame(FrameError::Truncated)) => {
                debug!("frames: end of stream mid-frame, {} bytes dropped", self.decoder.buffered());
                Ok(None)
            }
            Err(e) => Err(e),
        };

        self.done = true;
        Poll::Ready(res)
    }

    /// Produce the next frame, `None` once the stream has ended.
    #[inline]
    pub async fn next(&mut self) -> Result<Option<Frame>, Error> {
        poll_fn(|cx| self.poll_next(cx)).await
    }
}
