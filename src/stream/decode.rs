use std::task::{Context, Poll, ready};

use crate::frame::{Frame, FrameHead, Mask, MAX_CONTROL_PAYLOAD};
use crate::frame::mask::apply_mask4;
use crate::error::{Error, FrameError};
use crate::limit::Limits;
use crate::source::ChunkSource;

/// Frame decode state.
///
/// Owns the bytes read from a source but not yet turned into a frame.
/// Bytes past the end of a frame stay buffered for the next one, so the
/// source is always positioned at a frame boundary.
#[derive(Debug)]
pub struct FrameDecoder {
    buf: Vec<u8>,
    max_payload: u64,
}

impl FrameDecoder {
    /// Constructor.
    #[inline]
    pub fn new(limits: &Limits) -> Self {
        Self {
            buf: Vec::new(),
            max_payload: limits.max_frame_payload,
        }
    }

    /// Append bytes read from the source.
    #[inline]
    pub fn feed(&mut self, data: &[u8]) { self.buf.extend_from_slice(data); }

    /// Number of buffered bytes.
    #[inline]
    pub fn buffered(&self) -> usize { self.buf.len() }

    /// Decode one frame from the buffered bytes, `None` if more are needed.
    ///
    /// Control frames longer than 125 bytes and frames over the payload
    /// limit are rejected as soon as their head is complete.
    pub fn decode(&mut self) -> Result<Option<Frame>, FrameError> {
        let (head, head_len) = match FrameHead::decode(&self.buf) {
            Ok(x) => x,
            Err(FrameError::NotEnoughData) => return Ok(None),
            Err(e) => return Err(e),
        };

        let FrameHead {
            fin,
            rsv,
            opcode,
            mask,
            length,
        } = head;

        let len = length.to_num();
        if opcode.is_control() && len > MAX_CONTROL_PAYLOAD {
            return Err(FrameError::IllegalData);
        }
        if len > self.max_payload {
            return Err(FrameError::PayloadTooLarge(len));
        }
        let len = usize::try_from(len).map_err(|_| FrameError::PayloadTooLarge(len))?;

        let frame_len = head_len + len;
        // need to read more payload
        if self.buf.len() < frame_len {
            self.buf.reserve(frame_len - self.buf.len());
            return Ok(None);
        }

        let rest = self.buf.split_off(frame_len);
        let mut payload = std::mem::replace(&mut self.buf, rest);
        payload.drain(..head_len);

        // unmask payload data from client
        if let Mask::Key(key) = mask {
            apply_mask4(key, &mut payload);
        }

        Ok(Some(Frame {
            fin,
            rsv,
            opcode,
            mask,
            payload,
        }))
    }

    /// Decode the next frame, pulling chunks from `source` as needed.
    ///
    /// A clean end of stream before any byte of a frame gives `Ok(None)`,
    /// inside a frame it gives [`FrameError::Truncated`], which
    /// [`FrameStream`](super::FrameStream) turns into a quiet end.
    pub fn poll_decode<S: ChunkSource>(
        &mut self,
        source: &mut S,
        cx: &mut Context<'_>,
    ) -> Poll<Result<Option<Frame>, Error>> {
        loop {
            if let Some(frame) = self.decode()? {
                return Poll::Ready(Ok(Some(frame)));
            }

            match ready!(source.poll_chunk(cx))? {
                Some(chunk) => self.feed(&chunk),
                None if self.buf.is_empty() => return Poll::Ready(Ok(None)),
                None => return Poll::Ready(Err(FrameError::Truncated.into())),
            }
        }
    }
}
