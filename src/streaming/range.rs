//! HTTP `Range` header parsing and partial-content response planning.

use thiserror::Error;

/// An inclusive byte interval requested by a client. A missing `last` means
/// "through the end of the file".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub first: u64,
    pub last: Option<u64>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RangeError {
    #[error("Invalid byte range: {0}")]
    Malformed(String),
}

/// Parse an HTTP `Range` header value.
///
/// Only the single-range form `bytes=<first>-<last>?` is recognized;
/// suffix ranges (`bytes=-500`) and multi-range requests are malformed.
/// An empty value means no range was requested.
pub fn parse_range(value: &str) -> Result<Option<ByteRange>, RangeError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let malformed = || RangeError::Malformed(value.to_string());

    let spec = trimmed.strip_prefix("bytes=").ok_or_else(malformed)?;
    let (first, last) = spec.split_once('-').ok_or_else(malformed)?;

    if first.is_empty() || !first.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    let first: u64 = first.parse().map_err(|_| malformed())?;

    // `last` is present whenever any digits matched, including `0`.
    let last = if last.is_empty() {
        None
    } else if last.bytes().all(|b| b.is_ascii_digit()) {
        Some(last.parse().map_err(|_| malformed())?)
    } else {
        return Err(malformed());
    };

    if let Some(last) = last {
        if last < first {
            return Err(malformed());
        }
    }

    Ok(Some(ByteRange { first, last }))
}

/// How to answer a request for a file of known size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponsePlan {
    /// 200 OK, the whole file.
    Whole { len: u64 },
    /// 206 Partial Content for the inclusive window `[first, last]`.
    Partial { first: u64, last: u64, total: u64 },
    /// 416 Range Not Satisfiable, no body.
    Unsatisfiable { total: u64 },
}

impl ResponsePlan {
    /// Number of body bytes the plan will produce.
    pub fn content_length(&self) -> u64 {
        match *self {
            ResponsePlan::Whole { len } => len,
            ResponsePlan::Partial { first, last, .. } => last - first + 1,
            ResponsePlan::Unsatisfiable { .. } => 0,
        }
    }
}

/// Decide status and byte window for a file of `file_size` bytes and an
/// optional parsed range. An open or past-EOF `last` is clamped to the final
/// byte; a `first` at or past EOF is unsatisfiable.
pub fn plan(file_size: u64, range: Option<ByteRange>) -> ResponsePlan {
    match range {
        None => ResponsePlan::Whole { len: file_size },
        Some(range) if range.first >= file_size => ResponsePlan::Unsatisfiable { total: file_size },
        Some(range) => {
            let last = range
                .last
                .map_or(file_size - 1, |l| l.min(file_size - 1));
            ResponsePlan::Partial {
                first: range.first,
                last,
                total: file_size,
            }
        }
    }
}
