//! Direct streaming with HTTP range requests.
//!
//! Serves files off disk, honouring a single `Range` window when requested.
//! The body is streamed in bounded chunks; the file handle lives only as
//! long as the response body, so a client disconnect mid-stream releases it.

use axum::{
    body::Body,
    http::{header, HeaderMap, StatusCode},
    response::Response,
};
use std::io::SeekFrom;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;

use super::range::{parse_range, plan, ResponsePlan};

/// Copy-loop chunk size.
const STREAM_BUF_SIZE: usize = 16 * 1024;

/// Serve a file with range request support.
///
/// Maps failures to the status the router should answer with: a malformed
/// `Range` header is 400, a missing or unreadable file is 404, and a range
/// starting at or past EOF is 416.
pub async fn serve_file(path: &Path, headers: &HeaderMap) -> Result<Response, StatusCode> {
    let range_header = headers
        .get(header::RANGE)
        .and_then(|h| h.to_str().ok())
        .unwrap_or("");
    let range = parse_range(range_header).map_err(|e| {
        tracing::debug!("Rejecting range header {range_header:?}: {e}");
        StatusCode::BAD_REQUEST
    })?;

    let metadata = tokio::fs::metadata(path)
        .await
        .map_err(|_| StatusCode::NOT_FOUND)?;
    if !metadata.is_file() {
        return Err(StatusCode::NOT_FOUND);
    }

    let file_size = metadata.len();
    let content_type = mime_guess::from_path(path).first_or_octet_stream();
    let last_modified = metadata.modified().ok().map(httpdate::fmt_http_date);

    match plan(file_size, range) {
        ResponsePlan::Unsatisfiable { .. } => {
            let response = Response::builder()
                .status(StatusCode::RANGE_NOT_SATISFIABLE)
                .header(header::ACCEPT_RANGES, "bytes")
                .body(Body::empty())
                .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
            Ok(response)
        }
        ResponsePlan::Whole { len } => {
            let file = File::open(path).await.map_err(|_| StatusCode::NOT_FOUND)?;
            let stream = ReaderStream::with_capacity(file, STREAM_BUF_SIZE);
            let body = Body::from_stream(stream);

            let mut builder = Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, content_type.as_ref())
                .header(header::CONTENT_LENGTH, len.to_string())
                .header(header::ACCEPT_RANGES, "bytes");
            if let Some(modified) = last_modified {
                builder = builder.header(header::LAST_MODIFIED, modified);
            }
            builder
                .body(body)
                .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
        }
        ResponsePlan::Partial { first, last, total } => {
            let length = last - first + 1;

            let mut file = File::open(path).await.map_err(|_| StatusCode::NOT_FOUND)?;
            file.seek(SeekFrom::Start(first))
                .await
                .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

            // `take` bounds the copy so the stream never reads past `last`.
            let stream = ReaderStream::with_capacity(file.take(length), STREAM_BUF_SIZE);
            let body = Body::from_stream(stream);

            let mut builder = Response::builder()
                .status(StatusCode::PARTIAL_CONTENT)
                .header(header::CONTENT_TYPE, content_type.as_ref())
                .header(header::CONTENT_LENGTH, length.to_string())
                .header(
                    header::CONTENT_RANGE,
                    format!("bytes {}-{}/{}", first, last, total),
                )
                .header(header::ACCEPT_RANGES, "bytes");
            if let Some(modified) = last_modified {
                builder = builder.header(header::LAST_MODIFIED, modified);
            }
            builder
                .body(body)
                .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
