//! Error types shared by the request pipeline.

use std::io;
use std::path::PathBuf;

use crate::http::parser::ParseError;

/// Everything that can go wrong while serving one request.
///
/// A peer closing the connection is not an error; the frame reader reports
/// it as [`Frame::Closed`](crate::http::reader::Frame::Closed).
#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("malformed request: {0}")]
    MalformedRequest(#[from] ParseError),

    #[error("{} not found", .0.display())]
    NotFound(PathBuf),

    #[error("resolved path is {len} bytes, limit is {max}")]
    PathOverflow { len: usize, max: usize },

    #[error("request filled {capacity} byte buffer without a header terminator")]
    BufferOverflow { capacity: usize },

    #[error("{} is larger than {max} bytes", path.display())]
    ResourceTooLarge { path: PathBuf, max: u64 },

    #[error("{} changed while it was being opened", .0.display())]
    FileChanged(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, ServeError>;
