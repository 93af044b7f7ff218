#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("request line has no '/'")]
    MissingTarget,
    #[error("request target is not followed by a space")]
    UnterminatedTarget,
    #[error("request target is longer than {max} bytes")]
    TargetTooLong { max: usize },
    #[error("request target is not valid UTF-8")]
    InvalidEncoding,
    #[error("request target contains a NUL byte")]
    NulByte,
}

/// The part of the request line between the first `/` and the next space.
///
/// Stored without the leading `/`. Percent escapes are left as they are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTarget(String);

impl RequestTarget {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if any `/`-separated segment is `..`. Such targets are served
    /// as-is; callers only use this to log them.
    pub fn has_parent_segment(&self) -> bool {
        self.0.split('/').any(|segment| segment == "..")
    }
}

/// Extracts the request target from the first line of `raw`.
///
/// Only the request line is scanned: hitting CR, LF or the end of the
/// buffer before the closing space is a parse error, as is a target longer
/// than `max_len` bytes. Targets holding a NUL byte cannot name a file and
/// are rejected here rather than by the filesystem.
pub fn extract_target(raw: &[u8], max_len: usize) -> Result<RequestTarget, ParseError> {
    let line_end = raw
        .iter()
        .position(|&b| b == b'\r' || b == b'\n')
        .unwrap_or(raw.len());
    let line = &raw[..line_end];

    let start = line
        .iter()
        .position(|&b| b == b'/')
        .ok_or(ParseError::MissingTarget)?
        + 1;
    let rest = &line[start..];

    let len = rest
        .iter()
        .position(|&b| b == b' ')
        .ok_or(ParseError::UnterminatedTarget)?;
    if len > max_len {
        return Err(ParseError::TargetTooLong { max: max_len });
    }

    let raw_target = &rest[..len];
    if raw_target.contains(&0) {
        return Err(ParseError::NulByte);
    }

    let target = std::str::from_utf8(raw_target).map_err(|_| ParseError::InvalidEncoding)?;
    Ok(RequestTarget(target.to_string()))
}
