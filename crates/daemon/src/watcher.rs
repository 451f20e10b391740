//! Filesystem watcher task.
//!
//! A notify watcher feeds raw OS notifications into a dedicated tokio
//! task that owns the [`ChangeDebouncer`]. Pause/resume travel as
//! explicit messages on a control channel rather than as a flag on
//! shared state, so the single-writer discipline on the debouncer's
//! per-path map holds by construction.

use std::path::PathBuf;

use notify::event::{ModifyKind, RenameMode};
use notify::{Event, EventKind, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, error};

use sync::{ChangeDebouncer, ChangeEvent, ChangeKind};

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum WatcherControl {
    Pause,
    Resume,
}

/// Handle used by reconciliation passes to stop notification delivery
/// while they intentionally mutate the sync folder.
#[derive(Debug, Clone)]
pub struct WatcherHandle {
    control: mpsc::Sender<WatcherControl>,
}

impl WatcherHandle {
    pub async fn pause(&self) {
        let _ = self.control.send(WatcherControl::Pause).await;
    }

    pub async fn resume(&self) {
        let _ = self.control.send(WatcherControl::Resume).await;
    }

    /// A handle with no watcher behind it; pause/resume become no-ops.
    /// Used by tests and tools that never start the watcher task.
    pub fn disconnected() -> Self {
        let (control, _) = mpsc::channel(1);
        Self { control }
    }

    /// A handle whose control messages land on the returned receiver
    /// instead of a watcher task. Lets tests observe pause/resume order.
    #[cfg(test)]
    pub(crate) fn connected(buffer: usize) -> (Self, mpsc::Receiver<WatcherControl>) {
        let (control, receiver) = mpsc::channel(buffer);
        (Self { control }, receiver)
    }
}

/// Start watching `sync_root` recursively. Returns the control handle
/// and the channel of debounced change events.
pub fn spawn(sync_root: PathBuf) -> anyhow::Result<(WatcherHandle, mpsc::Receiver<ChangeEvent>)> {
    let (raw_tx, mut raw_rx) = mpsc::channel::<ChangeEvent>(1024);

    let mut watcher = notify::recommended_watcher(move |result: notify::Result<Event>| {
        match result {
            Ok(event) => {
                for change in convert_event(&event) {
                    // the task side closing just means we are shutting down
                    let _ = raw_tx.blocking_send(change);
                }
            }
            Err(err) => error!(error = %err, "watcher error"),
        }
    })?;
    watcher.watch(&sync_root, RecursiveMode::Recursive)?;

    let (control_tx, mut control_rx) = mpsc::channel::<WatcherControl>(8);
    let (out_tx, out_rx) = mpsc::channel::<ChangeEvent>(1024);

    tokio::spawn(async move {
        // the OS watcher lives exactly as long as this task
        let _watcher = watcher;
        let mut debouncer = ChangeDebouncer::new();
        loop {
            tokio::select! {
                // control first: a queued pause takes effect before any
                // event that raced in behind it
                biased;
                control = control_rx.recv() => match control {
                    Some(WatcherControl::Pause) => debouncer.pause(),
                    Some(WatcherControl::Resume) => debouncer.resume(),
                    None => break,
                },
                raw = raw_rx.recv() => match raw {
                    Some(event) => {
                        if let Some(change) = debouncer.observe(event) {
                            debug!(path = %change.path.display(), kind = ?change.kind, "change detected");
                            if out_tx.send(change).await.is_err() {
                                break;
                            }
                        }
                    }
                    None => break,
                },
            }
        }
    });

    Ok((WatcherHandle { control: control_tx }, out_rx))
}

/// Map a raw notify event onto the engine's change categories. Rename
/// halves that arrive separately degrade to remove/create.
fn convert_event(event: &Event) -> Vec<ChangeEvent> {
    let paths = &event.paths;
    match &event.kind {
        EventKind::Create(_) => single(paths, ChangeKind::Created),
        EventKind::Remove(_) => single(paths, ChangeKind::Removed),
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) if paths.len() == 2 => {
            vec![ChangeEvent::new(
                paths[1].clone(),
                ChangeKind::Renamed {
                    from: paths[0].clone(),
                },
            )]
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => {
            single(paths, ChangeKind::Removed)
        }
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => single(paths, ChangeKind::Created),
        EventKind::Modify(_) => single(paths, ChangeKind::Modified),
        _ => Vec::new(),
    }
}

fn single(paths: &[PathBuf], kind: ChangeKind) -> Vec<ChangeEvent> {
    paths
        .first()
        .map(|p: &PathBuf| vec![ChangeEvent::new(p.clone(), kind)])
        .unwrap_or_default()
}
