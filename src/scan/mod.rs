//! Delimited stream scanner.
//!
//! Splits a chunked byte stream on a literal delimiter without waiting for
//! the whole stream. A delimiter cut in two by a chunk boundary is held back
//! as a partial match and completed by the next chunk.

pub mod matcher;

pub use matcher::{ByteMatcher, MatchResult};

use std::future::poll_fn;
use std::ops::Deref;
use std::task::{Context, Poll, ready};

use log::trace;

use crate::error::{Error, ScanError};
use crate::limit::Limits;
use crate::source::{ChunkSource, is_disconnect};

/// Bytes between two delimiters, or between a delimiter and an end of
/// the stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    data: Vec<u8>,
    delimited: bool,
}

impl Segment {
    /// Whether a delimiter followed this segment. Only the last segment of
    /// a stream may lack one.
    #[inline]
    pub const fn is_delimited(&self) -> bool { self.delimited }

    #[inline]
    pub fn into_bytes(self) -> Vec<u8> { self.data }
}

impl Deref for Segment {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &[u8] { &self.data }
}

impl AsRef<[u8]> for Segment {
    #[inline]
    fn as_ref(&self) -> &[u8] { &self.data }
}

/// Scan state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    Scan,
    // source reached a clean end, flush what is left
    Drain,
    Done,
}

/// Lazy sequence of segments over a [`ChunkSource`].
#[derive(Debug)]
pub struct DelimitedScanner<S> {
    source: S,
    matcher: ByteMatcher,
    residual: Vec<u8>,
    // bytes of residual known not to start a delimiter
    searched: usize,
    state: ScanState,
    disconnected: bool,
    limit: Option<usize>,
}

impl<S> DelimitedScanner<S> {
    /// Constructor.
    ///
    /// # Panics
    ///
    /// Panics if `delimiter` is empty.
    #[inline]
    pub fn new(source: S, delimiter: impl Into<Vec<u8>>) -> Self {
        Self {
            source,
            matcher: ByteMatcher::new(delimiter),
            residual: Vec::new(),
            searched: 0,
            state: ScanState::Scan,
            disconnected: false,
            limit: None,
        }
    }

    /// Apply [`Limits::max_segment_len`].
    #[inline]
    pub fn with_limits(mut self, limits: &Limits) -> Self {
        self.limit = limits.max_segment_len;
        self
    }

    /// Scan `prefix` as if it had been read ahead of the first chunk.
    #[inline]
    pub fn with_prefix(mut self, prefix: &[u8]) -> Self {
        self.residual.splice(0..0, prefix.iter().copied());
        self.searched = 0;
        self
    }

    #[inline]
    pub fn delimiter(&self) -> &[u8] { self.matcher.delimiter() }

    /// The sequence has ended; `next` keeps returning `None`.
    #[inline]
    pub fn is_done(&self) -> bool { self.state == ScanState::Done }

    /// The sequence ended because the source reported a disconnect.
    #[inline]
    pub fn is_disconnected(&self) -> bool { self.disconnected }

    #[inline]
    pub fn into_inner(self) -> S { self.source }

    /// Split off the segment before `range`, keep the bytes after it.
    fn split(&mut self, beg: usize, end: usize) -> Segment {
        let rest = self.residual.split_off(end);
        let mut data = std::mem::replace(&mut self.residual, rest);
        data.truncate(beg);
        self.searched = 0;
        Segment {
            data,
            delimited: true,
        }
    }

    fn finish(&mut self) {
        self.state = ScanState::Done;
        self.residual = Vec::new();
        self.searched = 0;
    }
}

impl<S> AsRef<S> for DelimitedScanner<S> {
    #[inline]
    fn as_ref(&self) -> &S { &self.source }
}

impl<S: ChunkSource> DelimitedScanner<S> {
    /// Attempt to produce the next segment.
    ///
    /// Bytes already buffered are searched before anything new is read.
    pub fn poll_next(&mut self, cx: &mut Context<'_>) -> Poll<Result<Option<Segment>, Error>> {
        loop {
            match self.state {
                ScanState::Done => return Poll::Ready(Ok(None)),
                ScanState::Drain => {
                    let data = std::mem::take(&mut self.residual);
                    self.finish();
                    if data.is_empty() {
                        return Poll::Ready(Ok(None));
                    }
                    return Poll::Ready(Ok(Some(Segment {
                        data,
                        delimited: false,
                    })));
                }
                ScanState::Scan => {}
            }

            match self.matcher.find(&self.residual, self.searched) {
                MatchResult::Complete(r) => return Poll::Ready(Ok(Some(self.split(r.start, r.end)))),
                // keep the tail, it may complete with the next chunk
                MatchResult::Partial(r) => self.searched = r.start,
                MatchResult::NoMatch => self.searched = self.residual.len(),
            }

            if let Some(limit) = self.limit {
                if self.searched > limit {
                    self.finish();
                    return Poll::Ready(Err(ScanError::SegmentTooLarge(limit).into()));
                }
            }

            match ready!(self.source.poll_chunk(cx)) {
                Ok(Some(chunk)) => self.residual.extend_from_slice(&chunk),
                Ok(None) => self.state = ScanState::Drain,
                Err(e) if is_disconnect(&e) => {
                    trace!("scanner: source disconnected, {} bytes dropped", self.residual.len());
                    self.disconnected = true;
                    self.finish();
                }
                Err(e) => {
                    self.finish();
                    return Poll::Ready(Err(e.into()));
                }
            }
        }
    }

    /// Look at up to `n` bytes following the last delimiter, without
    /// consuming them.
    ///
    /// Reads only until `n` bytes are buffered. Fewer are returned once
    /// the source has ended; none after a disconnect.
    pub fn poll_peek(&mut self, cx: &mut Context<'_>, n: usize) -> Poll<Result<&[u8], Error>> {
        while self.state == ScanState::Scan && self.residual.len() < n {
            match ready!(self.source.poll_chunk(cx)) {
                Ok(Some(chunk)) => self.residual.extend_from_slice(&chunk),
                Ok(None) => self.state = ScanState::Drain,
                Err(e) if is_disconnect(&e) => {
                    trace!("scanner: source disconnected, {} bytes dropped", self.residual.len());
                    self.disconnected = true;
                    self.finish();
                }
                Err(e) => {
                    self.finish();
                    return Poll::Ready(Err(e.into()));
                }
            }
        }

        let n = std::cmp::min(n, self.residual.len());
        Poll::Ready(Ok(&self.residual[..n]))
    }

    /// Produce the next segment, `None` once the stream has ended.
    #[inline]
    pub async fn next(&mut self) -> Result<Option<Segment>, Error> {
        poll_fn(|cx| self.poll_next(cx)).await
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::source::Chunks;
    use crate::source::test::FailAfter;

    async fn collect<S: ChunkSource>(mut scanner: DelimitedScanner<S>) -> Vec<Vec<u8>> {
        let mut out = Vec::new();
        while let Some(seg) = scanner.next().await.unwrap() {
            out.push(seg.into_bytes());
        }
        out
    }

    #[tokio::test]
    async fn split_five_byte_chunks() {
        let source = Chunks::new(b"abc-xyz\n123-456-789", 5);
        let segments = collect(DelimitedScanner::new(source, "-")).await;
        assert_eq!(segments, [&b"abc"[..], b"xyz\n123", b"456", b"789"]);
    }

    #[tokio::test]
    async fn delimiter_across_chunks() {
        let data = b"one<=>two<=>three<=>";
        for size in 1..=data.len() {
            let segments = collect(DelimitedScanner::new(Chunks::new(data, size), "<=>")).await;
            assert_eq!(segments, [&b"one"[..], b"two", b"three"], "chunk size {}", size);
        }
    }

    #[tokio::test]
    async fn false_partial() {
        // "<=" is a prefix of the delimiter but never completes
        let data = b"a<=b<=>c<";
        for size in 1..=data.len() {
            let segments = collect(DelimitedScanner::new(Chunks::new(data, size), "<=>")).await;
            assert_eq!(segments, [&b"a<=b"[..], b"c<"]);
        }
    }

    #[tokio::test]
    async fn rejoin_any_chunking() {
        for _ in 0..200 {
            let len = rand::random::<usize>() % 64;
            let data: Vec<u8> = (0..len).map(|_| b"ab-"[rand::random::<usize>() % 3]).collect();
            let size = 1 + rand::random::<usize>() % 8;

            let mut scanner = DelimitedScanner::new(Chunks::new(&data, size), "a-");
            let mut joined = Vec::new();
            while let Some(seg) = scanner.next().await.unwrap() {
                joined.extend_from_slice(&seg);
                if seg.is_delimited() {
                    joined.extend_from_slice(b"a-");
                }
            }
            assert_eq!(joined, data);
        }
    }

    #[tokio::test]
    async fn empty_stream() {
        assert!(collect(DelimitedScanner::new(Chunks::new(b"", 4), "-")).await.is_empty());
        // a trailing delimiter leaves nothing behind
        assert_eq!(collect(DelimitedScanner::new(Chunks::new(b"a-", 4), "-")).await, [b"a"]);
        assert_eq!(
            collect(DelimitedScanner::new(Chunks::new(b"--", 4), "-")).await,
            [Vec::<u8>::new(), Vec::new()]
        );
    }

    #[tokio::test]
    async fn disconnect_ends_sequence() {
        let source = FailAfter {
            chunks: Chunks::new(b"a-b-half", 3),
            kind: std::io::ErrorKind::ConnectionReset,
        };
        let mut scanner = DelimitedScanner::new(source, "-");
        assert_eq!(&*scanner.next().await.unwrap().unwrap(), b"a");
        assert_eq!(&*scanner.next().await.unwrap().unwrap(), b"b");
        // the half-read segment is dropped
        assert!(scanner.next().await.unwrap().is_none());
        assert!(scanner.is_done());
        assert!(scanner.is_disconnected());
        assert!(scanner.next().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn io_error_propagates() {
        let source = FailAfter {
            chunks: Chunks::new(b"a-b", 3),
            kind: std::io::ErrorKind::PermissionDenied,
        };
        let mut scanner = DelimitedScanner::new(source, "-");
        assert_eq!(&*scanner.next().await.unwrap().unwrap(), b"a");
        assert!(matches!(scanner.next().await, Err(Error::Io(_))));
        assert!(scanner.next().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn prefix_is_scanned() {
        let scanner = DelimitedScanner::new(Chunks::new(b"-b-c", 1), "\n-").with_prefix(b"\n");
        assert_eq!(collect(scanner).await, [Vec::<u8>::new(), b"b-c".to_vec()]);
    }

    #[tokio::test]
    async fn peek_after_delimiter() {
        use std::future::poll_fn;

        let mut scanner = DelimitedScanner::new(Chunks::new(b"a-bcd", 1), "-");
        assert_eq!(&*scanner.next().await.unwrap().unwrap(), b"a");

        // only as much as asked for is read
        assert_eq!(poll_fn(|cx| scanner.poll_peek(cx, 2).map_ok(<[u8]>::to_vec)).await.unwrap(), b"bc");
        assert_eq!(scanner.as_ref().remaining(), 1);

        // peeked bytes stay part of the next segment
        assert_eq!(&*scanner.next().await.unwrap().unwrap(), b"bcd");

        assert!(poll_fn(|cx| scanner.poll_peek(cx, 2).map_ok(<[u8]>::is_empty)).await.unwrap());
    }

    #[tokio::test]
    async fn segment_limit() {
        let limits = Limits::new().with_max_segment_len(4);
        let mut scanner = DelimitedScanner::new(Chunks::new(b"ab-cdefgh-", 2), "-").with_limits(&limits);
        assert_eq!(&*scanner.next().await.unwrap().unwrap(), b"ab");
        assert!(matches!(
            scanner.next().await,
            Err(Error::Scan(ScanError::SegmentTooLarge(4)))
        ));
    }
}
