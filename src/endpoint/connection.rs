use log::debug;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::frame::{close, Frame, OpCode};
use crate::error::{Error, FrameError};
use crate::role::RoleHelper;
use crate::source::{ReadChunks, is_disconnect};
use crate::stream::{FrameWriter, Handler, ValidatedStream};

/// An accepted websocket connection.
///
/// Inbound frames are reassembled and validated before they are seen,
/// outbound frames are masked as `Role` requires.
pub struct Connection<R, W, Role> {
    path: String,
    frames: ValidatedStream<ReadChunks<R>>,
    writer: FrameWriter<W, Role>,
}

impl<R, W, Role> Connection<R, W, Role> {
    #[inline]
    pub(super) fn new(
        path: String,
        frames: ValidatedStream<ReadChunks<R>>,
        writer: FrameWriter<W, Role>,
    ) -> Self {
        Self { path, frames, writer }
    }

    /// Request path of the upgrade request.
    #[inline]
    pub fn path(&self) -> &str { &self.path }

    #[inline]
    pub fn frames(&mut self) -> &mut ValidatedStream<ReadChunks<R>> { &mut self.frames }

    #[inline]
    pub fn writer(&mut self) -> &mut FrameWriter<W, Role> { &mut self.writer }

    #[inline]
    pub fn into_parts(self) -> (String, ValidatedStream<ReadChunks<R>>, FrameWriter<W, Role>) {
        (self.path, self.frames, self.writer)
    }
}

/// Close status sent back for a protocol violation.
fn close_code(e: &FrameError) -> (u16, &'static str) {
    match e {
        FrameError::PayloadTooLarge(_) | FrameError::MessageTooLarge(_) => {
            (close::MESSAGE_TOO_BIG, "message too big")
        }
        _ => (close::PROTOCOL_ERROR, "protocol error"),
    }
}

impl<R, W, Role> Connection<R, W, Role>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
    Role: RoleHelper,
{
    /// Feed every inbound frame to `handler` and write its replies, in order.
    ///
    /// Returns once a close frame has been written or the inbound side has
    /// ended. A protocol violation is answered with a close frame (1002, or
    /// 1009 for oversized data) and then returned.
    pub async fn serve<H: Handler>(self, mut handler: H) -> Result<(), Error> {
        let Connection {
            path,
            mut frames,
            mut writer,
        } = self;
        let mut out = Vec::new();

        loop {
            let frame = match frames.next().await {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    debug!("{}: inbound ended", path);
                    return Ok(());
                }
                Err(Error::Frame(e)) => {
                    let (code, reason) = close_code(&e);
                    debug!("{}: {}, closing with {}", path, e, code);
                    // the peer may already be gone
                    let _ = writer.send(Frame::close_with(code, reason)).await;
                    let _ = writer.shutdown().await;
                    return Err(e.into());
                }
                Err(e) => return Err(e),
            };

            handler.handle(frame, &mut out);

            for frame in out.drain(..) {
                let is_close = frame.opcode == OpCode::Close;

                match writer.send(frame).await {
                    Ok(()) => {}
                    Err(e) if is_disconnect(&e) => {
                        debug!("{}: disconnected while writing", path);
                        return Ok(());
                    }
                    Err(e) => return Err(e.into()),
                }

                if is_close {
                    debug!("{}: close sent", path);
                    let _ = writer.shutdown().await;
                    return Ok(());
                }
            }
        }
    }
}
