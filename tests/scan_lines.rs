use rand::prelude::*;
use tokio::io::AsyncWriteExt;

use lightweb::scan::DelimitedScanner;
use lightweb::source::{Chunks, ReadChunks};

use log::debug;

#[tokio::test]
async fn lines_over_pipe() {
    let _ = env_logger::try_init();

    let lines: Vec<String> = (0..500)
        .map(|i| format!("line {} {}", i, "x".repeat(thread_rng().gen_range(0..200))))
        .collect();
    let data = lines.join("\r\n");

    let (r, mut w) = tokio::io::duplex(256);
    let writer = tokio::spawn(async move {
        for piece in data.as_bytes().chunks(97) {
            w.write_all(piece).await.unwrap();
        }
        w.shutdown().await.unwrap();
    });

    let mut scanner = DelimitedScanner::new(ReadChunks::new(r, 61), "\r\n");
    let mut got = Vec::new();
    while let Some(seg) = scanner.next().await.unwrap() {
        got.push(String::from_utf8(seg.into_bytes()).unwrap());
    }
    debug!("{} lines", got.len());

    assert_eq!(got, lines);
    assert!(scanner.is_done());
    assert!(!scanner.is_disconnected());
    writer.await.unwrap();
}

#[tokio::test]
async fn long_delimiter_random_chunks() {
    let _ = env_logger::try_init();

    const DELIM: &[u8] = b"--==--";
    for _ in 0..50 {
        let segments: Vec<Vec<u8>> = (0..thread_rng().gen_range(1..20))
            .map(|_| {
                // only bytes of the delimiter, so partial matches are everywhere
                (0..thread_rng().gen_range(0..30))
                    .map(|_| *[b'-', b'='].choose(&mut thread_rng()).unwrap())
                    .collect::<Vec<u8>>()
            })
            .filter(|s| !s.windows(DELIM.len()).any(|w| w == DELIM))
            .collect();

        let data = segments.join(DELIM);
        let mut chunks = Vec::new();
        let mut rest = data.as_slice();
        while !rest.is_empty() {
            let n = thread_rng().gen_range(1..=rest.len());
            chunks.push(rest[..n].to_vec());
            rest = &rest[n..];
        }

        let mut scanner = DelimitedScanner::new(Chunks::from_chunks(chunks), DELIM);
        let mut joined = Vec::new();
        while let Some(seg) = scanner.next().await.unwrap() {
            joined.extend_from_slice(&seg);
            if seg.is_delimited() {
                joined.extend_from_slice(DELIM);
            }
        }

        // segments and delimiters rebuild the input exactly
        assert_eq!(joined, data);
    }
}
