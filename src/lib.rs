//! Streaming websocket frames and multipart bodies over chunked byte sources.
//!
//! ## Features
//! - Pull-based: every component waits only on its source.
//! - One connection, one owner; no shared state, no locks.
//! - Split delimiters across arbitrary chunk boundaries.
//! - Disconnects end a sequence quietly, protocol errors do not.
//!
//! ## High-level API
//!
//! - [`endpoint`]
//! - [`stream`]
//! - [`multipart`]
//!
//! ```ignore
//! {
//!     // handshake, then echo until the peer says goodbye
//!     let conn = Endpoint::<TcpStream, Server>::accept(tcp, &Limits::new()).await?;
//!     conn.serve(Echo).await?;
//! }
//! ```
//!
//! ```ignore
//! {
//!     // split a form body as it arrives
//!     let boundary = boundary_from_content_type(content_type).unwrap();
//!     let mut parts = MultipartSplitter::new(ReadChunks::new(body, 4096), &boundary)?;
//!     while let Some(part) = parts.next().await? {
//!         println!("{}: {} bytes", part.name(), part.body().len());
//!     }
//! }
//! ```
//!
//! ## Low-level API
//!
//! - [`source`]
//! - [`scan`]
//! - [`frame`]
//! - [`handshake`]
//!
//! Frame:
//!
//! ```ignore
//! {
//!     // encode a frame
//!     let mut buf = Vec::new();
//!     Frame::text("hello").encode(&mut buf);
//!
//!     // decode a frame head
//!     let (head, offset) = FrameHead::decode(&buf).unwrap();
//! }
//! ```
//!
//! Scanner:
//!
//! ```ignore
//! {
//!     let mut lines = DelimitedScanner::new(Chunks::new(b"a\nb\n", 3), "\n");
//!     while let Some(line) = lines.next().await? {
//!         // ...
//!     }
//! }
//! ```

pub mod role;
pub mod error;
pub mod limit;
pub mod source;
pub mod frame;
pub mod scan;
pub mod stream;
pub mod multipart;
pub mod handshake;

cfg_if::cfg_if! {
    if #[cfg(feature = "tokio")] {
        pub mod endpoint;
    }
}
