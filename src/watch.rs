//! Directory watcher driving the live notification hub.
//!
//! Holds one filesystem watch on the media directory for the process
//! lifetime. Create/rename events for files matching the index naming
//! convention are forwarded over a channel to a single broadcast task, so
//! viewers receive events in the order the filesystem reported them.

use anyhow::{Context, Result};
use notify::{
    event::ModifyKind, Config as NotifyConfig, Event, EventKind, RecommendedWatcher,
    RecursiveMode, Watcher,
};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::config::MediaConfig;
use crate::hub::{LiveHub, SegmentEvent};
use crate::store::is_index_name;

/// Watches the media directory for newly written index playlists.
pub struct DirWatcher {
    config: MediaConfig,
    hub: Arc<LiveHub>,
    watcher: Option<RecommendedWatcher>,
}

impl DirWatcher {
    pub fn new(config: MediaConfig, hub: Arc<LiveHub>) -> Self {
        Self {
            config,
            hub,
            watcher: None,
        }
    }

    /// Start watching the media directory.
    ///
    /// Failure here is fatal to the hub's purpose (viewers would never
    /// learn of new segments), so the error propagates to the caller
    /// instead of being logged and swallowed.
    pub fn start(&mut self) -> Result<()> {
        let (event_tx, mut event_rx) = mpsc::channel::<String>(256);

        let prefix = self.config.index_prefix.clone();
        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| {
                let event = match res {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::warn!("Watch error: {e}");
                        return;
                    }
                };

                // The encoder exposes finished files via create/rename;
                // data writes to open files are not availability changes.
                if !is_availability_change(&event.kind) {
                    return;
                }

                for path in event.paths {
                    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                        continue;
                    };
                    if is_index_name(name, &prefix) {
                        let _ = event_tx.blocking_send(name.to_string());
                    }
                }
            },
            NotifyConfig::default(),
        )
        .context("Failed to create file watcher")?;

        watcher
            .watch(&self.config.dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch media directory: {:?}", self.config.dir))?;
        tracing::info!("Watching media directory: {:?}", self.config.dir);

        self.watcher = Some(watcher);

        // Single consumer task: the sole producer of viewer events, so
        // broadcast order matches filesystem observation order.
        let hub = self.hub.clone();
        let public_base = self.config.public_base.clone();
        tokio::spawn(async move {
            while let Some(name) = event_rx.recv().await {
                tracing::info!("New index playlist detected: {name}");
                hub.broadcast(SegmentEvent::for_file(&public_base, &name));
            }
        });

        Ok(())
    }

    /// Release the filesystem watch.
    pub fn stop(&mut self) {
        self.watcher = None;
        tracing::info!("Directory watcher stopped");
    }
}

fn is_availability_change(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Create(_) | EventKind::Modify(ModifyKind::Name(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, DataChange, RenameMode};

    #[test]
    fn create_and_rename_are_availability_changes() {
        assert!(is_availability_change(&EventKind::Create(CreateKind::File)));
        assert!(is_availability_change(&EventKind::Modify(ModifyKind::Name(
            RenameMode::To
        ))));
        assert!(!is_availability_change(&EventKind::Modify(
            ModifyKind::Data(DataChange::Content)
        )));
        assert!(!is_availability_change(&EventKind::Remove(
            notify::event::RemoveKind::File
        )));
    }
}
