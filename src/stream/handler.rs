//! Frame handlers.

use std::collections::VecDeque;
use std::future::poll_fn;
use std::task::{Context, Poll, ready};

use super::ValidatedStream;
use crate::frame::{close, Frame, Mask, OpCode};
use crate::error::Error;
use crate::source::ChunkSource;

/// Reason carried by the close frame sent back by [`echo`].
pub const FAREWELL: &str = "Goodbye";

/// Turns inbound frames into outbound frames.
///
/// A handler may push any number of frames for each frame it is given,
/// including none. Frames pushed for one call are written before the
/// next inbound frame is handled.
pub trait Handler {
    fn handle(&mut self, frame: Frame, out: &mut Vec<Frame>);
}

impl<F> Handler for F
where
    F: FnMut(Frame, &mut Vec<Frame>),
{
    #[inline]
    fn handle(&mut self, frame: Frame, out: &mut Vec<Frame>) { self(frame, out) }
}

/// Reply to a single frame the way an echo server does.
///
/// - ping: pong with the same payload.
/// - pong: nothing.
/// - close: close with status 1000 and [`FAREWELL`].
/// - anything else: the same frame.
///
/// Replies are never masked.
pub fn echo(frame: Frame) -> Option<Frame> {
    match frame.opcode {
        OpCode::Ping => Some(Frame::pong(frame.payload)),
        OpCode::Pong => None,
        OpCode::Close => Some(Frame::close_with(close::NORMAL, FAREWELL)),
        _ => Some(frame.with_mask(Mask::None)),
    }
}

/// [`Handler`] built on [`echo`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Echo;

impl Handler for Echo {
    #[inline]
    fn handle(&mut self, frame: Frame, out: &mut Vec<Frame>) { out.extend(echo(frame)); }
}

/// Outbound frame sequence produced by a handler from an inbound one.
///
/// Order is preserved: every reply to a frame comes out before any reply
/// to the frames after it.
#[derive(Debug)]
pub struct Replies<S, H> {
    inbound: ValidatedStream<S>,
    handler: H,
    pending: VecDeque<Frame>,
    scratch: Vec<Frame>,
}

impl<S, H> Replies<S, H> {
    /// Constructor.
    #[inline]
    pub fn new(inbound: ValidatedStream<S>, handler: H) -> Self {
        Self {
            inbound,
            handler,
            pending: VecDeque::new(),
            scratch: Vec::new(),
        }
    }

    #[inline]
    pub fn into_inner(self) -> (ValidatedStream<S>, H) { (self.inbound, self.handler) }
}

impl<S: ChunkSource, H: Handler> Replies<S, H> {
    /// Attempt to produce the next outbound frame.
    pub fn poll_next(&mut self, cx: &mut Context<'_>) -> Poll<Result<Option<Frame>, Error>> {
        loop {
            if let Some(frame) = self.pending.pop_front() {
                return Poll::Ready(Ok(Some(frame)));
            }

            match ready!(self.inbound.poll_next(cx))? {
                Some(frame) => {
                    self.handler.handle(frame, &mut self.scratch);
                    self.pending.extend(self.scratch.drain(..));
                }
                None => return Poll::Ready(Ok(None)),
            }
        }
    }

    /// Produce the next outbound frame, `None` once the inbound side has
    /// ended and every reply has been taken.
    #[inline]
    pub async fn next(&mut self) -> Result<Option<Frame>, Error> {
        poll_fn(|cx| self.poll_next(cx)).await
    }
}
