use std::fmt::{Display, Formatter};

#[derive(Debug, PartialEq, Eq)]
pub enum MultipartError {
    InvalidBoundary,

    // part header block
    HeaderBlock,

    HeaderEncoding,

    MissingDisposition,

    MissingName,

    Httparse(httparse::Error),
}

impl Display for MultipartError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use MultipartError::*;
        match self {
            InvalidBoundary => write!(f, "Missing or illegal boundary"),
            HeaderBlock => write!(f, "Part headers are not terminated by a blank line"),
            HeaderEncoding => write!(f, "Part header value is not valid utf-8"),
            MissingDisposition => write!(f, "Missing content-disposition header"),
            MissingName => write!(f, "Missing name in content-disposition header"),
            Httparse(e) => write!(f, "Part header parse error: {}", e),
        }
    }
}

impl From<httparse::Error> for MultipartError {
    fn from(e: httparse::Error) -> Self { MultipartError::Httparse(e) }
}

impl std::error::Error for MultipartError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        if let MultipartError::Httparse(e) = self {
            Some(e)
        } else {
            None
        }
    }
}
