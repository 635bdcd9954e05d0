//! Media file handler.
//!
//! Serves manifest and segment files out of the media directory with the
//! CORS headers the cross-host deployment model requires. The viewer and
//! this server run on different hosts/ports, so every response carries
//! permissive CORS headers, including plain responses without an `Origin`
//! header; that is why they are attached here rather than via a
//! preflight-only CORS layer.

use axum::{
    body::Body,
    extract::State,
    http::{header, Method, StatusCode, Uri},
    response::Response,
};

use crate::error::{io_code, Error};
use crate::server::AppContext;
use crate::store::FileKind;

/// Preflight results may be cached for 30 days.
const CORS_MAX_AGE: &str = "2592000";

/// Serve a file from the media directory.
///
/// `OPTIONS` short-circuits with 204 and never touches the filesystem.
/// Every other method reads the file; there are no write operations, so
/// method checking beyond that would only reject harmless requests.
pub async fn serve_media(State(ctx): State<AppContext>, method: Method, uri: Uri) -> Response {
    if method == Method::OPTIONS {
        return respond(StatusCode::NO_CONTENT, None, Body::empty());
    }

    let path = uri.path();
    tracing::debug!(%method, %path, "Media request");

    match ctx.store.read(path).await {
        Ok((bytes, kind)) => respond(StatusCode::OK, Some(kind), Body::from(bytes)),
        Err(Error::NotFound(_)) => {
            // Expected during rotation; not an error worth logging.
            respond(StatusCode::NOT_FOUND, None, Body::from("File not found"))
        }
        Err(Error::InvalidPath(p)) => {
            tracing::warn!("Rejected traversal attempt: {p}");
            respond(
                StatusCode::BAD_REQUEST,
                None,
                Body::from(format!("Invalid path: {p}")),
            )
        }
        Err(Error::Io { source }) => {
            tracing::error!("Failed to read {path}: {source}");
            respond(
                StatusCode::INTERNAL_SERVER_ERROR,
                None,
                Body::from(format!("Error reading file: {}", io_code(&source))),
            )
        }
    }
}

fn respond(status: StatusCode, kind: Option<FileKind>, body: Body) -> Response {
    let mut builder = Response::builder()
        .status(status)
        .header(header::ACCESS_CONTROL_ALLOW_ORIGIN, "*")
        .header(header::ACCESS_CONTROL_ALLOW_METHODS, "OPTIONS, POST, GET")
        .header(header::ACCESS_CONTROL_MAX_AGE, CORS_MAX_AGE);

    if let Some(kind) = kind {
        builder = builder.header(header::CONTENT_TYPE, kind.content_type());
    }

    builder.body(body).unwrap()
}
