//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`] which creates a temp media directory, default
//! config, store, hub, and watcher, and starts Axum on a random port for
//! HTTP- and WebSocket-level testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use hlscast::config::Config;
use hlscast::hub::LiveHub;
use hlscast::server::{create_router, AppContext};
use hlscast::store::SegmentStore;
use hlscast::watch::DirWatcher;

/// Test harness wrapping a fully-wired [`AppContext`] backed by a temp
/// media directory that tests can write into.
pub struct TestHarness {
    pub dir: tempfile::TempDir,
    pub ctx: AppContext,
    // Held so the filesystem watch stays alive for the test's duration.
    watcher: DirWatcher,
}

impl TestHarness {
    /// Start a server over an empty media directory on a random port.
    pub async fn with_server() -> (Self, SocketAddr) {
        Self::with_server_and_files(&[]).await
    }

    /// Start a server over a media directory pre-seeded with `files`
    /// (written before the watcher starts, so seeding emits no events).
    pub async fn with_server_and_files(files: &[&str]) -> (Self, SocketAddr) {
        let dir = tempfile::tempdir().expect("failed to create temp media dir");
        for name in files {
            std::fs::write(dir.path().join(name), b"#EXTM3U\n").expect("failed to seed file");
        }

        let mut config = Config::default();
        config.media.dir = dir.path().to_path_buf();

        let store = Arc::new(SegmentStore::new(dir.path()));
        let hub = Arc::new(LiveHub::new());

        let mut watcher = DirWatcher::new(config.media.clone(), hub.clone());
        watcher.start().expect("failed to start watcher");

        let ctx = AppContext {
            store,
            hub,
            config: Arc::new(config),
        };
        let app = create_router(ctx.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        (Self { dir, ctx, watcher }, addr)
    }

    /// Write a file into the media directory (visible to the watcher).
    pub fn write_file(&self, name: &str, data: &[u8]) {
        std::fs::write(self.dir.path().join(name), data).expect("failed to write media file");
    }
}
