use std::marker::PhantomData;

use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::frame::Frame;
use crate::role::RoleHelper;

/// Writes frames to an [`AsyncWrite`], masked as the role requires.
///
/// Each frame is encoded into an owned buffer, then written in full and
/// flushed before `send` returns.
#[derive(Debug)]
pub struct FrameWriter<IO, Role> {
    io: IO,
    buf: Vec<u8>,
    _marker: PhantomData<Role>,
}

impl<IO, Role> FrameWriter<IO, Role> {
    /// Constructor.
    #[inline]
    pub fn new(io: IO) -> Self {
        Self {
            io,
            buf: Vec::new(),
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn into_inner(self) -> IO { self.io }
}

impl<IO, Role> AsRef<IO> for FrameWriter<IO, Role> {
    #[inline]
    fn as_ref(&self) -> &IO { &self.io }
}

impl<IO, Role> AsMut<IO> for FrameWriter<IO, Role> {
    #[inline]
    fn as_mut(&mut self) -> &mut IO { &mut self.io }
}

impl<IO: AsyncWrite + Unpin, Role: RoleHelper> FrameWriter<IO, Role> {
    /// Encode and write a frame.
    ///
    /// The frame's own mask is replaced with the role's.
    pub async fn send(&mut self, frame: Frame) -> std::io::Result<()> {
        let frame = frame.with_mask(Role::write_mask());

        self.buf.clear();
        frame.encode(&mut self.buf);

        self.io.write_all(&self.buf).await?;
        self.io.flush().await
    }

    /// Shutdown the write side.
    #[inline]
    pub async fn shutdown(&mut self) -> std::io::Result<()> { self.io.shutdown().await }
}
