//! Fragment reassembly.
//!
//! [RFC-6455 Section 5.4](https://datatracker.ietf.org/doc/html/rfc6455#section-5.4):
//! a message may be split into a first frame without fin, any number of
//! continuation frames, and a final continuation frame with fin. Control
//! frames are never fragmented, but may arrive between the fragments of
//! a message.

use std::future::poll_fn;
use std::task::{Context, Poll, ready};

use log::debug;

use super::FrameStream;
use crate::frame::{Fin, Frame, OpCode};
use crate::error::{Error, FrameError};
use crate::limit::Limits;
use crate::source::ChunkSource;

/// Reassembles continuation frames into whole messages.
///
/// Holds at most one incomplete message. It is dropped on any error.
#[derive(Debug, Default)]
pub struct Validator {
    last: Option<Frame>,
    max_message_size: Option<usize>,
}

impl Validator {
    /// Constructor.
    #[inline]
    pub fn new(limits: &Limits) -> Self {
        Self {
            last: None,
            max_message_size: limits.max_message_size,
        }
    }

    /// A fragmented message is waiting for its final frame.
    #[inline]
    pub fn is_accumulating(&self) -> bool { self.last.is_some() }

    /// Drop the incomplete message, if any.
    #[inline]
    pub fn reset(&mut self) { self.last = None; }

    /// Feed the next raw frame, get back a complete frame if there is one.
    pub fn validate(&mut self, frame: Frame) -> Result<Option<Frame>, FrameError> {
        let res = self.step(frame);
        if let Err(ref e) = res {
            debug!("validator: {}", e);
            self.last = None;
        }
        res
    }

    fn check_size(&self, len: usize) -> Result<(), FrameError> {
        match self.max_message_size {
            Some(max) if len > max => Err(FrameError::MessageTooLarge(max)),
            _ => Ok(()),
        }
    }

    fn step(&mut self, frame: Frame) -> Result<Option<Frame>, FrameError> {
        match (frame.opcode, frame.fin) {
            (OpCode::Continue, fin) => {
                let held = self.last.as_ref().ok_or(FrameError::UnexpectedContinuation)?;
                self.check_size(held.payload.len() + frame.payload.len())?;

                let Some(held) = self.last.as_mut() else {
                    return Err(FrameError::UnexpectedContinuation);
                };
                held.payload.extend_from_slice(&frame.payload);
                held.fin = fin;

                match fin {
                    Fin::Y => Ok(self.last.take()),
                    Fin::N => Ok(None),
                }
            }
            // a whole frame, control frames may interleave a fragmented message
            (opcode, Fin::Y) => {
                if !opcode.is_control() && self.last.is_some() {
                    return Err(FrameError::UnexpectedIncomplete);
                }
                Ok(Some(frame))
            }
            // first fragment
            (opcode, Fin::N) => {
                if self.last.is_some() {
                    return Err(FrameError::UnexpectedIncomplete);
                }
                if opcode.is_control() {
                    return Err(FrameError::FragmentedControl);
                }
                self.check_size(frame.payload.len())?;
                self.last = Some(frame);
                Ok(None)
            }
        }
    }
}

/// Lazy sequence of complete frames.
#[derive(Debug)]
pub struct ValidatedStream<S> {
    frames: FrameStream<S>,
    validator: Validator,
    done: bool,
}

impl<S> ValidatedStream<S> {
    /// Constructor.
    #[inline]
    pub fn new(source: S, limits: &Limits) -> Self {
        Self {
            frames: FrameStream::new(source, limits),
            validator: Validator::new(limits),
            done: false,
        }
    }

    #[inline]
    pub fn is_done(&self) -> bool { self.done }

    #[inline]
    pub fn into_inner(self) -> S { self.frames.into_inner() }
}

impl<S: ChunkSource> ValidatedStream<S> {
    /// Attempt to produce the next complete frame.
    pub fn poll_next(&mut self, cx: &mut Context<'_>) -> Poll<Result<Option<Frame>, Error>> {
        while !self.done {
            let frame = match ready!(self.frames.poll_next(cx)) {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    if self.validator.is_accumulating() {
                        debug!("validator: incomplete message discarded");
                    }
                    self.validator.reset();
                    self.done = true;
                    break;
                }
                Err(e) => {
                    self.validator.reset();
                    self.done = true;
                    return Poll::Ready(Err(e));
                }
            };

            match self.validator.validate(frame) {
                Ok(Some(frame)) => return Poll::Ready(Ok(Some(frame))),
                Ok(None) => continue,
                Err(e) => {
                    self.done = true;
                    return Poll::Ready(Err(e.into()));
                }
            }
        }
        Poll::Ready(Ok(None))
    }

    /// Produce the next complete frame, `None` once the stream has ended.
    #[inline]
    pub async fn next(&mut self) -> Result<Option<Frame>, Error> {
        poll_fn(|cx| self.poll_next(cx)).await
    }
}
