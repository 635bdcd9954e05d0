//! Unified error type for hlscast.
//!
//! The store and HTTP layer funnel their failures into [`Error`], which
//! carries enough context for handlers to derive an HTTP status code via
//! [`Error::http_status`].

/// Unified error type covering the request-serving failure modes.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request path escapes the media directory or is otherwise
    /// unservable (absolute, contains a parent-traversal component).
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// No file exists at the requested path.
    #[error("File not found: {0}")]
    NotFound(String),

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },
}

impl Error {
    /// Map this error to an appropriate HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::InvalidPath(_) => 400,
            Error::NotFound(_) => 404,
            Error::Io { .. } => 500,
        }
    }
}

/// Short machine-readable code for an I/O error, surfaced in 500 bodies
/// for operability. Prefers the OS errno when one exists.
pub fn io_code(err: &std::io::Error) -> String {
    match err.raw_os_error() {
        Some(errno) => errno.to_string(),
        None => format!("{:?}", err.kind()),
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(Error::InvalidPath("..".into()).http_status(), 400);
        assert_eq!(Error::NotFound("x.ts".into()).http_status(), 404);
        let io = Error::from(std::io::Error::from(std::io::ErrorKind::PermissionDenied));
        assert_eq!(io.http_status(), 500);
    }

    #[test]
    fn io_code_uses_errno_when_available() {
        assert_eq!(io_code(&std::io::Error::from_raw_os_error(13)), "13");
    }

    #[test]
    fn io_code_falls_back_to_kind() {
        let err = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "short read");
        assert_eq!(io_code(&err), "UnexpectedEof");
    }
}
