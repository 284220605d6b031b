//! Per-connection limits.
//!
//! Each component copies the [`Limits`] it is built with, so connections
//! never share them.

/// 4096
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

/// 16 MiB
pub const DEFAULT_MAX_FRAME_PAYLOAD: u64 = 16 << 20;

/// 8 KiB, the largest upgrade request accepted.
pub const DEFAULT_MAX_REQUEST_LEN: usize = 8 << 10;

/// Size limits applied while reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Largest payload a single frame may declare.
    pub max_frame_payload: u64,
    /// Largest reassembled message, `None` means unbounded.
    pub max_message_size: Option<usize>,
    /// Largest segment the scanner may hold without seeing a delimiter,
    /// `None` means unbounded.
    pub max_segment_len: Option<usize>,
    /// Upper bound of a chunk pulled from an io source.
    pub read_chunk_size: usize,
    /// Largest upgrade request.
    pub max_request_len: usize,
}

impl Limits {
    /// Default limits.
    #[inline]
    pub const fn new() -> Self {
        Self {
            max_frame_payload: DEFAULT_MAX_FRAME_PAYLOAD,
            max_message_size: None,
            max_segment_len: None,
            read_chunk_size: DEFAULT_CHUNK_SIZE,
            max_request_len: DEFAULT_MAX_REQUEST_LEN,
        }
    }

    #[inline]
    pub const fn with_max_frame_payload(mut self, n: u64) -> Self {
        self.max_frame_payload = n;
        self
    }

    #[inline]
    pub const fn with_max_message_size(mut self, n: usize) -> Self {
        self.max_message_size = Some(n);
        self
    }

    #[inline]
    pub const fn with_max_segment_len(mut self, n: usize) -> Self {
        self.max_segment_len = Some(n);
        self
    }

    /// A zero chunk size is raised to 1.
    #[inline]
    pub const fn with_read_chunk_size(mut self, n: usize) -> Self {
        self.read_chunk_size = if n == 0 { 1 } else { n };
        self
    }

    #[inline]
    pub const fn with_max_request_len(mut self, n: usize) -> Self {
        self.max_request_len = n;
        self
    }
}

impl Default for Limits {
    fn default() -> Self { Self::new() }
}
