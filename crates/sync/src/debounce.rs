//! Filesystem-change debouncing.
//!
//! OS watchers fire several notifications for one logical write, and
//! directory mtimes churn whenever a child changes. The debouncer turns
//! that stream into a clean "file actually changed" signal by tracking,
//! per path, the file's modification time rounded to one-decimal-second
//! resolution.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

/// Category of a raw filesystem notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Modified,
    Removed,
    /// Renames bypass debouncing entirely; `from` is the previous path.
    Renamed { from: PathBuf },
}

/// A filesystem notification, before or after debouncing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

impl ChangeEvent {
    pub fn new(path: impl Into<PathBuf>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// Per-path duplicate suppression with explicit pause/resume.
///
/// Owned by a single watcher task; the per-path map is transient state
/// and resets on restart.
#[derive(Debug, Default)]
pub struct ChangeDebouncer {
    last_seen: HashMap<PathBuf, i64>,
    paused: bool,
}

impl ChangeDebouncer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stop forwarding events. A reconciliation pass pauses the debouncer
    /// so its own writes do not re-trigger a sync.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Feed a raw notification through the debouncer. Returns the event
    /// if it represents a genuine change, `None` if it is noise.
    pub fn observe(&mut self, event: ChangeEvent) -> Option<ChangeEvent> {
        if self.paused {
            return None;
        }

        if matches!(event.kind, ChangeKind::Renamed { .. }) {
            return Some(event);
        }

        let bucket = mtime_bucket(&event.path);
        match self.last_seen.get(&event.path) {
            Some(&previous) if previous == bucket => None,
            _ => {
                self.last_seen.insert(event.path.clone(), bucket);
                // directory mtime churn from child writes is noise
                if event.path.is_dir() && event.kind == ChangeKind::Modified {
                    None
                } else {
                    Some(event)
                }
            }
        }
    }
}

/// Modification time rounded to single-decimal-second resolution, coarser
/// than the native timestamp so one logical write maps to one bucket.
/// Missing files (delete notifications) share a sentinel bucket.
fn mtime_bucket(path: &Path) -> i64 {
    std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map(|t| DateTime::<Utc>::from(t).timestamp_millis() / 100)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use filetime::FileTime;

    fn touch(dir: &Path, name: &str, mtime_secs: i64) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, b"contents").unwrap();
        filetime::set_file_mtime(&path, FileTime::from_unix_time(mtime_secs, 0)).unwrap();
        path
    }

    #[test]
    fn duplicate_notifications_collapse_to_one() {
        let dir = tempfile::tempdir().unwrap();
        let path = touch(dir.path(), "a.txt", 1_000_000);
        let mut debouncer = ChangeDebouncer::new();

        let first = debouncer.observe(ChangeEvent::new(&path, ChangeKind::Modified));
        let second = debouncer.observe(ChangeEvent::new(&path, ChangeKind::Modified));

        assert!(first.is_some());
        assert!(second.is_none());
    }

    #[test]
    fn new_mtime_bucket_forwards_again() {
        let dir = tempfile::tempdir().unwrap();
        let path = touch(dir.path(), "a.txt", 1_000_000);
        let mut debouncer = ChangeDebouncer::new();

        assert!(debouncer
            .observe(ChangeEvent::new(&path, ChangeKind::Modified))
            .is_some());

        filetime::set_file_mtime(&path, FileTime::from_unix_time(1_000_005, 0)).unwrap();
        assert!(debouncer
            .observe(ChangeEvent::new(&path, ChangeKind::Modified))
            .is_some());
    }

    #[test]
    fn directory_modified_is_always_suppressed() {
        let dir = tempfile::tempdir().unwrap();
        let subdir = dir.path().join("sub");
        std::fs::create_dir(&subdir).unwrap();
        let mut debouncer = ChangeDebouncer::new();

        assert!(debouncer
            .observe(ChangeEvent::new(&subdir, ChangeKind::Modified))
            .is_none());
    }

    #[test]
    fn directory_created_is_forwarded() {
        let dir = tempfile::tempdir().unwrap();
        let subdir = dir.path().join("sub");
        std::fs::create_dir(&subdir).unwrap();
        let mut debouncer = ChangeDebouncer::new();

        assert!(debouncer
            .observe(ChangeEvent::new(&subdir, ChangeKind::Created))
            .is_some());
    }

    #[test]
    fn rename_bypasses_debouncing() {
        let dir = tempfile::tempdir().unwrap();
        let path = touch(dir.path(), "a.txt", 1_000_000);
        let mut debouncer = ChangeDebouncer::new();

        // settle the timestamp bucket first
        debouncer.observe(ChangeEvent::new(&path, ChangeKind::Modified));

        let rename = ChangeEvent::new(
            &path,
            ChangeKind::Renamed {
                from: dir.path().join("old.txt"),
            },
        );
        assert!(debouncer.observe(rename.clone()).is_some());
        assert!(debouncer.observe(rename).is_some());
    }

    #[test]
    fn paused_debouncer_drops_everything() {
        let dir = tempfile::tempdir().unwrap();
        let path = touch(dir.path(), "a.txt", 1_000_000);
        let mut debouncer = ChangeDebouncer::new();

        debouncer.pause();
        assert!(debouncer
            .observe(ChangeEvent::new(&path, ChangeKind::Modified))
            .is_none());
        assert!(debouncer
            .observe(ChangeEvent::new(
                &path,
                ChangeKind::Renamed {
                    from: dir.path().join("old.txt")
                }
            ))
            .is_none());

        debouncer.resume();
        assert!(debouncer
            .observe(ChangeEvent::new(&path, ChangeKind::Modified))
            .is_some());
    }

    #[test]
    fn removed_file_notifications_share_a_bucket() {
        let dir = tempfile::tempdir().unwrap();
        let ghost = dir.path().join("ghost.txt");
        let mut debouncer = ChangeDebouncer::new();

        assert!(debouncer
            .observe(ChangeEvent::new(&ghost, ChangeKind::Removed))
            .is_some());
        assert!(debouncer
            .observe(ChangeEvent::new(&ghost, ChangeKind::Removed))
            .is_none());
    }
}
