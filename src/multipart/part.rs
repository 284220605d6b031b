//! A single form-data part.

use std::collections::HashMap;

use crate::error::MultipartError;

/// 32
pub const MAX_PART_HEADERS: usize = 32;

/// CRLF
pub const LINE_BREAK: &[u8] = b"\r\n";

/// Part headers, names compared case-insensitively.
///
/// A name seen twice keeps its last value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(HashMap<String, String>);

impl Headers {
    #[inline]
    pub fn new() -> Self { Self::default() }

    #[inline]
    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        self.0.insert(name.to_ascii_lowercase(), value.into());
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize { self.0.len() }

    #[inline]
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Lowercased names with their values, in no particular order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// One named section of a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    name: String,
    filename: Option<String>,
    headers: Headers,
    body: Vec<u8>,
}

impl Part {
    /// The `name` parameter of `content-disposition`.
    #[inline]
    pub fn name(&self) -> &str { &self.name }

    /// The `filename` parameter of `content-disposition`, if any.
    #[inline]
    pub fn filename(&self) -> Option<&str> { self.filename.as_deref() }

    #[inline]
    pub fn content_type(&self) -> Option<&str> { self.headers.get("content-type") }

    #[inline]
    pub fn headers(&self) -> &Headers { &self.headers }

    #[inline]
    pub fn body(&self) -> &[u8] { &self.body }

    #[inline]
    pub fn into_body(self) -> Vec<u8> { self.body }

    /// Parse a part from the bytes between two delimiters.
    ///
    /// `segment` starts with the rest of the boundary line, optional
    /// whitespace and a CRLF. The header block follows, ended by a blank
    /// line, then the body. The CRLF before the next boundary belongs to
    /// the delimiter and is not part of `segment`.
    pub fn parse(segment: Vec<u8>) -> Result<Self, MultipartError> {
        // transport padding after the boundary
        let pad = segment
            .iter()
            .take_while(|b| **b == b' ' || **b == b'\t')
            .count();
        if !segment[pad..].starts_with(LINE_BREAK) {
            return Err(MultipartError::InvalidBoundary);
        }
        let head_beg = pad + LINE_BREAK.len();

        let mut raw = [httparse::EMPTY_HEADER; MAX_PART_HEADERS];
        let (head_len, raw) = match httparse::parse_headers(&segment[head_beg..], &mut raw)? {
            httparse::Status::Complete(x) => x,
            httparse::Status::Partial => return Err(MultipartError::HeaderBlock),
        };

        let mut headers = Headers::new();
        for hdr in raw.iter() {
            let value = std::str::from_utf8(hdr.value).map_err(|_| MultipartError::HeaderEncoding)?;
            headers.insert(hdr.name, value.trim());
        }

        let disposition = headers
            .get("content-disposition")
            .ok_or(MultipartError::MissingDisposition)?;

        let mut name = None;
        let mut filename = None;
        for (key, value) in params(disposition) {
            match key.as_str() {
                "name" => name = Some(value),
                "filename" => filename = Some(value),
                _ => {}
            }
        }
        let name = name.ok_or(MultipartError::MissingName)?;

        let mut body = segment;
        body.drain(..head_beg + head_len);

        Ok(Part {
            name,
            filename,
            headers,
            body,
        })
    }
}

/// Parameters of a header value such as
/// `form-data; name="field"; filename="a.txt"`.
///
/// Keys are lowercased, quoted values unescaped. Whatever precedes the
/// first `;` is skipped.
pub fn params(value: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    let mut rest = match value.split_once(';') {
        Some((_, rest)) => rest,
        None => return out,
    };

    loop {
        let (key, after) = match rest.split_once('=') {
            Some(x) => x,
            None => break,
        };
        // a bare token before this key, e.g. "a; b; name=x"
        let key = key.rsplit(';').next().unwrap_or(key).trim();
        let after = after.trim_start();

        let (val, next) = match after.strip_prefix('"') {
            Some(quoted) => {
                let mut val = String::new();
                let mut end = quoted.len();
                let mut escaped = false;
                for (i, c) in quoted.char_indices() {
                    if escaped {
                        val.push(c);
                        escaped = false;
                    } else if c == '\\' {
                        escaped = true;
                    } else if c == '"' {
                        end = i + 1;
                        break;
                    } else {
                        val.push(c);
                    }
                }
                (val, &quoted[end..])
            }
            None => {
                let end = after.find(';').unwrap_or(after.len());
                (after[..end].trim().to_string(), &after[end..])
            }
        };

        if !key.is_empty() {
            out.push((key.to_ascii_lowercase(), val));
        }

        rest = match next.trim_start().strip_prefix(';') {
            Some(r) => r,
            None => break,
        };
    }

    out
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn disposition_params() {
        let p = params(r#"form-data; name="text1"; filename="a \"b\".txt""#);
        assert_eq!(
            p,
            [
                ("name".to_string(), "text1".to_string()),
                ("filename".to_string(), r#"a "b".txt"#.to_string()),
            ]
        );

        let p = params("form-data;Name=plain ; other ;x=\"semi;colon\"");
        assert_eq!(
            p,
            [
                ("name".to_string(), "plain".to_string()),
                ("x".to_string(), "semi;colon".to_string()),
            ]
        );

        assert!(params("form-data").is_empty());
    }

    #[test]
    fn parse_part() {
        let seg = b"\r\nContent-Disposition: form-data; name=\"f\"; filename=\"a.txt\"\r\n\
            Content-Type: text/plain\r\n\r\nline1\r\nline2"
            .to_vec();
        let part = Part::parse(seg).unwrap();
        assert_eq!(part.name(), "f");
        assert_eq!(part.filename(), Some("a.txt"));
        assert_eq!(part.content_type(), Some("text/plain"));
        assert_eq!(part.headers().get("CONTENT-TYPE"), Some("text/plain"));
        assert_eq!(part.body(), b"line1\r\nline2");
    }

    #[test]
    fn parse_empty_body() {
        let seg = b"  \r\ncontent-disposition: form-data; name=e\r\n\r\n".to_vec();
        let part = Part::parse(seg).unwrap();
        assert_eq!(part.name(), "e");
        assert!(part.body().is_empty());
    }

    #[test]
    fn duplicate_header_last_wins() {
        let seg = b"\r\nContent-Disposition: form-data; name=\"a\"\r\n\
            Content-Type: text/plain\r\ncontent-type: text/html\r\n\r\n"
            .to_vec();
        let part = Part::parse(seg).unwrap();
        assert_eq!(part.content_type(), Some("text/html"));
        assert_eq!(part.headers().len(), 2);
    }

    #[test]
    fn malformed_part() {
        macro_rules! fail {
            ($seg: expr, $e: pat) => {
                assert!(matches!(Part::parse($seg.to_vec()), Err($e)));
            };
        }
        fail!(b"x\r\n\r\n", MultipartError::InvalidBoundary);
        fail!(b"\r\nContent-Type: text/plain\r\n", MultipartError::HeaderBlock);
        fail!(b"\r\nno separator\r\n\r\n", MultipartError::Httparse(_));
        fail!(b"\r\nContent-Type: text/plain\r\n\r\n", MultipartError::MissingDisposition);
        fail!(b"\r\nContent-Disposition: form-data\r\n\r\n", MultipartError::MissingName);
    }
}
