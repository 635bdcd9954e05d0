//! Segment store accessor.
//!
//! Resolves request paths against the configured media directory and reads
//! file bytes. The directory is written by an external encoder that rotates
//! segment and index files, so reads are never cached: a stale buffer would
//! corrupt playback once the encoder rewrites a segment under the same name.

use std::path::{Component, Path, PathBuf};

use bytes::Bytes;

use crate::error::{Error, Result};

/// Content kind of a servable file, derived from its suffix. Drives the
/// HTTP content-type header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// HLS playlist (`.m3u8`).
    Manifest,
    /// MPEG transport-stream chunk (`.ts`).
    Segment,
    /// Anything else; served as opaque bytes.
    Other,
}

impl FileKind {
    pub fn from_path(path: &str) -> Self {
        if path.ends_with(".m3u8") {
            FileKind::Manifest
        } else if path.ends_with(".ts") {
            FileKind::Segment
        } else {
            FileKind::Other
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            FileKind::Manifest => "application/vnd.apple.mpegurl",
            FileKind::Segment => "video/MP2T",
            FileKind::Other => "application/octet-stream",
        }
    }
}

/// Read-only accessor for files under the media directory.
pub struct SegmentStore {
    root: PathBuf,
}

impl SegmentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a request path to an absolute path under the media root.
    ///
    /// Rejects empty paths and any path with a non-plain component
    /// (parent traversal, current-dir, prefixes); servable paths can
    /// never escape the root.
    pub fn resolve(&self, rel: &str) -> Result<PathBuf> {
        let rel = rel.trim_start_matches('/');
        let candidate = Path::new(rel);

        for component in candidate.components() {
            match component {
                Component::Normal(_) => {}
                _ => return Err(Error::InvalidPath(rel.to_string())),
            }
        }

        if rel.is_empty() {
            return Err(Error::InvalidPath(rel.to_string()));
        }

        Ok(self.root.join(candidate))
    }

    /// Read the current bytes of a file, uncached.
    ///
    /// A read racing the encoder's write may observe a short file; that is
    /// returned as-is rather than treated as an error.
    pub async fn read(&self, rel: &str) -> Result<(Bytes, FileKind)> {
        let path = self.resolve(rel)?;

        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok((Bytes::from(bytes), FileKind::from_path(rel))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(Error::NotFound(rel.to_string()))
            }
            Err(e) => Err(Error::Io { source: e }),
        }
    }

    /// Find the newest index playlist: the lexicographically last file name
    /// starting with `prefix`, excluding a name exactly equal to the bare
    /// prefix. Lexicographic order over the encoder's rotating names is
    /// used as a proxy for recency.
    pub fn latest_index(&self, prefix: &str) -> Result<Option<String>> {
        let mut names: Vec<String> = std::fs::read_dir(&self.root)?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| is_index_name(name, prefix))
            .collect();

        names.sort();
        Ok(names.pop())
    }
}

/// Whether a file name matches the live-index naming convention.
pub fn is_index_name(name: &str, prefix: &str) -> bool {
    name.starts_with(prefix) && name != prefix
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(files: &[&str]) -> (tempfile::TempDir, SegmentStore) {
        let dir = tempfile::tempdir().unwrap();
        for name in files {
            std::fs::write(dir.path().join(name), b"data").unwrap();
        }
        let store = SegmentStore::new(dir.path());
        (dir, store)
    }

    #[test]
    fn kind_from_suffix() {
        assert_eq!(FileKind::from_path("index1.m3u8"), FileKind::Manifest);
        assert_eq!(FileKind::from_path("seg042.ts"), FileKind::Segment);
        assert_eq!(FileKind::from_path("thumb.jpg"), FileKind::Other);
    }

    #[test]
    fn content_types() {
        assert_eq!(
            FileKind::Manifest.content_type(),
            "application/vnd.apple.mpegurl"
        );
        assert_eq!(FileKind::Segment.content_type(), "video/MP2T");
        assert_eq!(FileKind::Other.content_type(), "application/octet-stream");
    }

    #[test]
    fn resolve_rejects_traversal() {
        let (_dir, store) = store_with(&[]);
        assert!(matches!(
            store.resolve("../etc/passwd"),
            Err(Error::InvalidPath(_))
        ));
        assert!(matches!(
            store.resolve("a/../../b.ts"),
            Err(Error::InvalidPath(_))
        ));
        assert!(matches!(
            store.resolve("/etc/passwd/../x"),
            Err(Error::InvalidPath(_))
        ));
        assert!(matches!(store.resolve(""), Err(Error::InvalidPath(_))));
        assert!(matches!(store.resolve("/"), Err(Error::InvalidPath(_))));
    }

    #[test]
    fn resolve_accepts_nested_paths() {
        let (_dir, store) = store_with(&[]);
        let resolved = store.resolve("/sub/seg1.ts").unwrap();
        assert!(resolved.starts_with(store.root()));
        assert!(resolved.ends_with("sub/seg1.ts"));
    }

    #[tokio::test]
    async fn read_returns_current_bytes() {
        let (dir, store) = store_with(&["index1.m3u8"]);
        let (bytes, kind) = store.read("index1.m3u8").await.unwrap();
        assert_eq!(&bytes[..], b"data");
        assert_eq!(kind, FileKind::Manifest);

        // Overwrite and re-read; no caching.
        std::fs::write(dir.path().join("index1.m3u8"), b"rewritten").unwrap();
        let (bytes, _) = store.read("index1.m3u8").await.unwrap();
        assert_eq!(&bytes[..], b"rewritten");
    }

    #[tokio::test]
    async fn read_missing_is_not_found() {
        let (_dir, store) = store_with(&[]);
        assert!(matches!(
            store.read("missing.ts").await,
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn latest_index_sorts_and_excludes_bare_prefix() {
        let (_dir, store) = store_with(&[
            "index0.m3u8",
            "index2.m3u8",
            "index1.m3u8",
            "index",
            "seg0.ts",
        ]);
        assert_eq!(
            store.latest_index("index").unwrap(),
            Some("index2.m3u8".to_string())
        );
    }

    #[test]
    fn latest_index_empty_dir() {
        let (_dir, store) = store_with(&["seg0.ts"]);
        assert_eq!(store.latest_index("index").unwrap(), None);
    }

    #[test]
    fn index_name_convention() {
        assert!(is_index_name("index3.m3u8", "index"));
        assert!(!is_index_name("index", "index"));
        assert!(!is_index_name("seg3.ts", "index"));
    }
}
