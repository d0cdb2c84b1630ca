//! Request dispatch.
//!
//! Every read request is answered by exactly one of four strategies, checked
//! in a fixed order: playlist, thumbnail, raw file, directory listing. The
//! marker checks come first because both operate on paths that are not
//! literally directories.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, StatusCode, Uri},
    response::{IntoResponse, Response},
};

use super::AppContext;
use crate::{listing, playlist, render, streaming, MEDIALIST_M3U, SHOW_ALL_FLAG, THUMBNAIL_SELECTOR};

pub async fn serve_request(
    State(ctx): State<AppContext>,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let query = uri.query().unwrap_or("");
    let resolved = ctx.resolver.resolve(uri.path());
    tracing::debug!(
        path = %uri,
        resolved = %resolved.path.display(),
        support_asset = resolved.support_asset,
        trailing_slash = resolved.trailing_slash,
        "request"
    );

    // 1. Playlist resource for the containing directory.
    if resolved
        .path
        .file_name()
        .is_some_and(|name| name == MEDIALIST_M3U)
    {
        let dir = resolved
            .path
            .parent()
            .unwrap_or(ctx.config.webroot.as_path())
            .to_path_buf();
        let m3u = playlist::generate(&dir, &ctx.config.domain, ctx.config.port, &ctx.config.webroot);
        return match Response::builder()
            .status(StatusCode::OK)
            .header(header::ACCEPT_RANGES, "bytes")
            .header(header::CONTENT_TYPE, "audio/mpegurl")
            .header(header::CONTENT_LENGTH, m3u.len().to_string())
            .body(Body::from(m3u))
        {
            Ok(response) => response,
            Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        };
    }

    // 2. Thumbnail variant of an image, when the capability is present.
    // With no codec the marker is ignored and the request falls through to
    // raw serving of the underlying image.
    if query.contains(THUMBNAIL_SELECTOR) {
        if let Some(thumbnailer) = ctx.thumbnailer {
            // Decode/resize/encode is CPU-bound; keep it off the runtime
            // worker threads.
            let image_path = resolved.path.clone();
            let result =
                tokio::task::spawn_blocking(move || thumbnailer.make_thumbnail(&image_path))
                    .await;
            return match result {
                Err(e) => {
                    tracing::error!("Thumbnail task failed: {e}");
                    StatusCode::INTERNAL_SERVER_ERROR.into_response()
                }
                Ok(Ok(jpeg)) => match Response::builder()
                    .status(StatusCode::OK)
                    .header(header::ACCEPT_RANGES, "bytes")
                    .header(header::CONTENT_TYPE, "image/jpeg")
                    .header(header::CONTENT_LENGTH, jpeg.len().to_string())
                    .body(Body::from(jpeg))
                {
                    Ok(response) => response,
                    Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
                },
                Ok(Err(e)) => {
                    tracing::debug!(
                        "Thumbnail failed for {}: {e}",
                        resolved.path.display()
                    );
                    StatusCode::NOT_FOUND.into_response()
                }
            };
        }
    }

    // 3. Anything that is not a directory streams off disk.
    if !resolved.path.is_dir() {
        return match streaming::serve_file(&resolved.path, &headers).await {
            Ok(response) => response,
            Err(status) => status.into_response(),
        };
    }

    // 4. Directory listing.
    let include_hidden =
        ctx.config.show_hidden || query.split('&').any(|flag| flag == SHOW_ALL_FLAG);
    let entries = match listing::list(&resolved.path, include_hidden) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!("Cannot list {}: {e}", resolved.path.display());
            return StatusCode::NOT_FOUND.into_response();
        }
    };

    let page = render::directory_page(&ctx.config, &entries);
    match Response::builder()
        .status(StatusCode::OK)
        .header(header::ACCEPT_RANGES, "bytes")
        .header(header::CONTENT_TYPE, "text/html; charset=utf-8")
        .header(header::CONTENT_LENGTH, page.len().to_string())
        .body(Body::from(page))
    {
        Ok(response) => response,
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
    }
}
