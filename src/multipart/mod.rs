//! Streaming `multipart/form-data` splitter.
//!
//! [RFC-7578](https://datatracker.ietf.org/doc/html/rfc7578) body framing:
//!
//! ```text
//! preamble
//! --boundary\r\n
//! content-disposition: form-data; name="field"\r\n
//! \r\n
//! body\r\n
//! --boundary--\r\n
//! epilogue
//! ```
//!
//! The body is split on `\r\n--boundary` as it arrives, one part held in
//! memory at a time.

pub mod part;

pub use part::{Part, Headers, params};

use std::future::poll_fn;
use std::task::{Context, Poll, ready};

use log::{debug, trace};

use crate::error::{Error, MultipartError};
use crate::limit::Limits;
use crate::scan::DelimitedScanner;
use crate::source::ChunkSource;

/// 70, per RFC-2046.
pub const MAX_BOUNDARY_LEN: usize = 70;

/// Extract the boundary from a `multipart/*` content type value.
pub fn boundary_from_content_type(value: &str) -> Option<String> {
    let mime = value.split(';').next().unwrap_or(value).trim();
    if !mime.to_ascii_lowercase().starts_with("multipart/") {
        return None;
    }
    params(value)
        .into_iter()
        .find(|(k, _)| k == "boundary")
        .map(|(_, v)| v)
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SplitState {
    Preamble,
    Parts,
    Done,
}

/// Lazy sequence of [`Part`]s over a body [`ChunkSource`].
#[derive(Debug)]
pub struct MultipartSplitter<S> {
    scanner: DelimitedScanner<S>,
    state: SplitState,
}

impl<S> MultipartSplitter<S> {
    /// Constructor.
    ///
    /// The boundary must be 1 to 70 bytes without line breaks, otherwise
    /// [`MultipartError::InvalidBoundary`] is returned.
    pub fn new(source: S, boundary: &str) -> Result<Self, MultipartError> {
        if boundary.is_empty()
            || boundary.len() > MAX_BOUNDARY_LEN
            || boundary.bytes().any(|b| b == b'\r' || b == b'\n')
        {
            return Err(MultipartError::InvalidBoundary);
        }

        let mut delimiter = Vec::with_capacity(4 + boundary.len());
        delimiter.extend_from_slice(b"\r\n--");
        delimiter.extend_from_slice(boundary.as_bytes());

        // the first boundary may open the body without a line break
        let scanner = DelimitedScanner::new(source, delimiter).with_prefix(b"\r\n");

        Ok(Self {
            scanner,
            state: SplitState::Preamble,
        })
    }

    /// Apply [`Limits::max_segment_len`] to each part.
    #[inline]
    pub fn with_limits(mut self, limits: &Limits) -> Self {
        self.scanner = self.scanner.with_limits(limits);
        self
    }

    /// The terminal boundary was seen, or the sequence ended otherwise.
    #[inline]
    pub fn is_done(&self) -> bool { self.state == SplitState::Done }

    #[inline]
    pub fn into_inner(self) -> S { self.scanner.into_inner() }

    #[inline]
    fn fail<T>(&mut self, e: MultipartError) -> Poll<Result<T, Error>> {
        debug!("multipart: {}", e);
        self.state = SplitState::Done;
        Poll::Ready(Err(e.into()))
    }
}

impl<S: ChunkSource> MultipartSplitter<S> {
    /// Attempt to produce the next part.
    ///
    /// A body that ends before the terminal boundary ends the sequence
    /// like the terminal boundary would; the half-read part is dropped.
    pub fn poll_next(&mut self, cx: &mut Context<'_>) -> Poll<Result<Option<Part>, Error>> {
        loop {
            if self.state == SplitState::Done {
                return Poll::Ready(Ok(None));
            }

            // --boundary--, the epilogue is never read
            if self.state == SplitState::Parts {
                let terminal = match ready!(self.scanner.poll_peek(cx, 2)) {
                    Ok(head) => head.starts_with(b"--"),
                    Err(e) => {
                        self.state = SplitState::Done;
                        return Poll::Ready(Err(e));
                    }
                };
                if terminal {
                    trace!("multipart: terminal boundary");
                    self.state = SplitState::Done;
                    return Poll::Ready(Ok(None));
                }
            }

            let segment = match ready!(self.scanner.poll_next(cx)) {
                Ok(Some(seg)) if seg.is_delimited() => seg,
                Ok(Some(seg)) => {
                    debug!("multipart: body ended before the terminal boundary, {} bytes dropped", seg.len());
                    self.state = SplitState::Done;
                    return Poll::Ready(Ok(None));
                }
                Ok(None) => {
                    debug!("multipart: body ended before the terminal boundary");
                    self.state = SplitState::Done;
                    return Poll::Ready(Ok(None));
                }
                Err(e) => {
                    self.state = SplitState::Done;
                    return Poll::Ready(Err(e));
                }
            };

            match self.state {
                SplitState::Preamble => {
                    trace!("multipart: skip {} bytes of preamble", segment.len().saturating_sub(2));
                    self.state = SplitState::Parts;
                }
                SplitState::Parts => {
                    return match Part::parse(segment.into_bytes()) {
                        Ok(part) => {
                            trace!("multipart: part {:?}, {} bytes", part.name(), part.body().len());
                            Poll::Ready(Ok(Some(part)))
                        }
                        Err(e) => self.fail(e),
                    };
                }
                SplitState::Done => return Poll::Ready(Ok(None)),
            }
        }
    }

    /// Produce the next part, `None` after the terminal boundary.
    #[inline]
    pub async fn next(&mut self) -> Result<Option<Part>, Error> {
        poll_fn(|cx| self.poll_next(cx)).await
    }
}
