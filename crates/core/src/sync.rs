//! Idempotent directory upload engine
//!
//! Walks a local directory tree and uploads every regular file to a bucket,
//! skipping keys that already exist remotely. Strictly sequential: one file's
//! existence check and upload complete before the next file begins. Per-file
//! failures are reported and never halt the traversal; only an invalid root
//! aborts the run.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::key::derive_key;
use crate::traits::ObjectStore;

/// Per-file events, delivered in traversal order as they happen
#[derive(Debug)]
pub enum SyncEvent {
    /// Key was absent and the file's full contents were transferred
    Uploaded {
        path: PathBuf,
        key: String,
        size_bytes: i64,
    },

    /// Exact key already present remotely; nothing transferred
    Skipped { path: PathBuf, key: String },

    /// This file's upload attempt failed; the traversal continues
    Failed {
        path: PathBuf,
        key: String,
        error: Error,
    },

    /// Existence check failed; the key is treated as absent and the upload
    /// still proceeds
    CheckFailed { key: String, error: Error },
}

/// Receives per-file events as the walk progresses
pub trait SyncReporter: Send + Sync {
    fn on_event(&self, event: &SyncEvent);
}

/// What a single upload attempt did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    Uploaded { size_bytes: i64 },
    Skipped,
    Failed,
}

/// Aggregate counters for one run
///
/// Returned for logging and tests; never used to decide the process exit
/// status, which stays 0 for a completed traversal regardless of per-file
/// failures.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncSummary {
    pub uploaded: u64,
    pub skipped: u64,
    pub failed: u64,
    pub bytes_uploaded: u64,
}

/// Drives the per-file upload decision over an [`ObjectStore`]
///
/// Holds the target bucket and key prefix; the client is borrowed so one
/// client serves the whole run.
pub struct Synchronizer<'a> {
    client: &'a dyn ObjectStore,
    bucket: String,
    prefix: String,
}

impl<'a> Synchronizer<'a> {
    pub fn new(
        client: &'a dyn ObjectStore,
        bucket: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            prefix: prefix.into(),
        }
    }

    /// Direct per-key existence query via `head_object`.
    ///
    /// Fails open: an indeterminate check (network failure, permission
    /// rejection) is reported and the key treated as absent so the upload is
    /// still attempted.
    async fn remote_exists(&self, key: &str, reporter: &dyn SyncReporter) -> bool {
        match self.client.head_object(&self.bucket, key).await {
            Ok(_) => true,
            Err(Error::NotFound(_)) => false,
            Err(error) => {
                warn!(key, %error, "existence check failed, treating key as absent");
                reporter.on_event(&SyncEvent::CheckFailed {
                    key: key.to_string(),
                    error,
                });
                false
            }
        }
    }

    /// Upload one local file to one remote key, unless the key exists.
    ///
    /// Every failure is absorbed here: reported through the reporter and
    /// terminal for this one file only.
    pub async fn upload_file(
        &self,
        local: &Path,
        key: &str,
        reporter: &dyn SyncReporter,
    ) -> FileOutcome {
        if self.remote_exists(key, reporter).await {
            reporter.on_event(&SyncEvent::Skipped {
                path: local.to_path_buf(),
                key: key.to_string(),
            });
            return FileOutcome::Skipped;
        }

        let data = match std::fs::read(local) {
            Ok(d) => d,
            Err(source) => {
                reporter.on_event(&SyncEvent::Failed {
                    path: local.to_path_buf(),
                    key: key.to_string(),
                    error: Error::LocalFile {
                        path: local.display().to_string(),
                        source,
                    },
                });
                return FileOutcome::Failed;
            }
        };

        let size_bytes = data.len() as i64;
        let content_type = mime_guess::from_path(local)
            .first()
            .map(|m| m.essence_str().to_string());

        match self
            .client
            .put_object(&self.bucket, key, data, content_type)
            .await
        {
            Ok(_) => {
                reporter.on_event(&SyncEvent::Uploaded {
                    path: local.to_path_buf(),
                    key: key.to_string(),
                    size_bytes,
                });
                FileOutcome::Uploaded { size_bytes }
            }
            Err(error) => {
                reporter.on_event(&SyncEvent::Failed {
                    path: local.to_path_buf(),
                    key: key.to_string(),
                    error,
                });
                FileOutcome::Failed
            }
        }
    }

    /// Walk `root` and upload every regular file under it.
    ///
    /// Fails fast with `Error::InvalidDirectory` before any remote call if
    /// `root` is not a directory. Traversal order is whatever the filesystem
    /// yields; symlinks are not followed. Unreadable entries are logged and
    /// skipped.
    pub async fn sync_directory(
        &self,
        root: &Path,
        reporter: &dyn SyncReporter,
    ) -> Result<SyncSummary> {
        if !root.is_dir() {
            return Err(Error::InvalidDirectory(root.display().to_string()));
        }

        let mut summary = SyncSummary::default();

        for entry in WalkDir::new(root).follow_links(false) {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    warn!("skipping unreadable entry: {e}");
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
            let key = derive_key(&self.prefix, relative);

            match self.upload_file(entry.path(), &key, reporter).await {
                FileOutcome::Uploaded { size_bytes } => {
                    summary.uploaded += 1;
                    summary.bytes_uploaded += size_bytes as u64;
                }
                FileOutcome::Skipped => summary.skipped += 1,
                FileOutcome::Failed => summary.failed += 1,
            }
        }

        debug!(
            uploaded = summary.uploaded,
            skipped = summary.skipped,
            failed = summary.failed,
            bytes = summary.bytes_uploaded,
            "directory sync complete"
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{MockObjectStore, ObjectInfo};
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    /// Records event descriptions in arrival order
    #[derive(Default)]
    struct RecordingReporter {
        events: Mutex<Vec<String>>,
    }

    impl RecordingReporter {
        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    impl SyncReporter for RecordingReporter {
        fn on_event(&self, event: &SyncEvent) {
            let label = match event {
                SyncEvent::Uploaded { key, .. } => format!("uploaded:{key}"),
                SyncEvent::Skipped { key, .. } => format!("skipped:{key}"),
                SyncEvent::Failed { key, error, .. } => format!("failed:{key}: {error}"),
                SyncEvent::CheckFailed { key, error } => format!("check-failed:{key}: {error}"),
            };
            self.events.lock().unwrap().push(label);
        }
    }

    fn write_file(dir: &TempDir, relative: &str, content: &[u8]) -> PathBuf {
        let path = dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    fn absent() -> Error {
        Error::NotFound("no such key".into())
    }

    #[tokio::test]
    async fn test_invalid_root_makes_no_remote_calls() {
        let temp_dir = TempDir::new().unwrap();
        let missing_root = temp_dir.path().join("no_such_dir");

        let mut mock = MockObjectStore::new();
        mock.expect_head_object().times(0);
        mock.expect_put_object().times(0);

        let reporter = RecordingReporter::default();
        let synchronizer = Synchronizer::new(&mock, "mybucket", "backup");
        let err = synchronizer
            .sync_directory(&missing_root, &reporter)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InvalidDirectory(_)));
        assert!(reporter.events().is_empty());
    }

    #[tokio::test]
    async fn test_uploads_absent_file_with_full_content() {
        let temp_dir = TempDir::new().unwrap();
        write_file(&temp_dir, "x.txt", b"hello");

        let mut mock = MockObjectStore::new();
        mock.expect_head_object()
            .withf(|bucket, key| bucket == "mybucket" && key == "backup/x.txt")
            .times(1)
            .returning(|_, _| Err(absent()));
        mock.expect_put_object()
            .withf(|bucket, key, data, _| {
                bucket == "mybucket" && key == "backup/x.txt" && data == b"hello"
            })
            .times(1)
            .returning(|_, key, data, _| Ok(ObjectInfo::object(key, data.len() as i64)));

        let reporter = RecordingReporter::default();
        let synchronizer = Synchronizer::new(&mock, "mybucket", "backup");
        let summary = synchronizer
            .sync_directory(temp_dir.path(), &reporter)
            .await
            .unwrap();

        assert_eq!(summary.uploaded, 1);
        assert_eq!(summary.skipped, 0);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.bytes_uploaded, 5);
        assert_eq!(reporter.events(), vec!["uploaded:backup/x.txt"]);
    }

    #[tokio::test]
    async fn test_skips_existing_key_without_transfer() {
        let temp_dir = TempDir::new().unwrap();
        write_file(&temp_dir, "x.txt", b"hello");

        let mut mock = MockObjectStore::new();
        mock.expect_head_object()
            .times(1)
            .returning(|_, key| Ok(ObjectInfo::object(key, 5)));
        mock.expect_put_object().times(0);

        let reporter = RecordingReporter::default();
        let synchronizer = Synchronizer::new(&mock, "mybucket", "backup");
        let summary = synchronizer
            .sync_directory(temp_dir.path(), &reporter)
            .await
            .unwrap();

        assert_eq!(summary.uploaded, 0);
        assert_eq!(summary.skipped, 1);
        assert_eq!(reporter.events(), vec!["skipped:backup/x.txt"]);
    }

    #[tokio::test]
    async fn test_nested_files_get_prefixed_relative_keys() {
        let temp_dir = TempDir::new().unwrap();
        write_file(&temp_dir, "x.txt", b"x");
        write_file(&temp_dir, "sub/y.txt", b"y");

        let uploaded_keys = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&uploaded_keys);

        let mut mock = MockObjectStore::new();
        mock.expect_head_object()
            .times(2)
            .returning(|_, _| Err(absent()));
        mock.expect_put_object()
            .times(2)
            .returning(move |_, key, data, _| {
                recorded.lock().unwrap().push(key.to_string());
                Ok(ObjectInfo::object(key, data.len() as i64))
            });

        let reporter = RecordingReporter::default();
        let synchronizer = Synchronizer::new(&mock, "mybucket", "backup");
        let summary = synchronizer
            .sync_directory(temp_dir.path(), &reporter)
            .await
            .unwrap();

        assert_eq!(summary.uploaded, 2);
        let mut keys = uploaded_keys.lock().unwrap().clone();
        keys.sort();
        assert_eq!(keys, vec!["backup/sub/y.txt", "backup/x.txt"]);
    }

    #[tokio::test]
    async fn test_rerun_skips_present_uploads_rest() {
        let temp_dir = TempDir::new().unwrap();
        write_file(&temp_dir, "x.txt", b"x");
        write_file(&temp_dir, "sub/y.txt", b"y");

        let mut mock = MockObjectStore::new();
        mock.expect_head_object().times(2).returning(|_, key| {
            if key == "backup/x.txt" {
                Ok(ObjectInfo::object(key, 1))
            } else {
                Err(absent())
            }
        });
        mock.expect_put_object()
            .withf(|_, key, _, _| key == "backup/sub/y.txt")
            .times(1)
            .returning(|_, key, data, _| Ok(ObjectInfo::object(key, data.len() as i64)));

        let reporter = RecordingReporter::default();
        let synchronizer = Synchronizer::new(&mock, "mybucket", "backup");
        let summary = synchronizer
            .sync_directory(temp_dir.path(), &reporter)
            .await
            .unwrap();

        assert_eq!(summary.uploaded, 1);
        assert_eq!(summary.skipped, 1);
        let events = reporter.events();
        assert!(events.contains(&"skipped:backup/x.txt".to_string()));
        assert!(events.contains(&"uploaded:backup/sub/y.txt".to_string()));
    }

    #[tokio::test]
    async fn test_failed_upload_does_not_halt_traversal() {
        let temp_dir = TempDir::new().unwrap();
        write_file(&temp_dir, "a.txt", b"a");
        write_file(&temp_dir, "b.txt", b"b");

        let mut mock = MockObjectStore::new();
        mock.expect_head_object()
            .times(2)
            .returning(|_, _| Err(absent()));
        mock.expect_put_object()
            .times(2)
            .returning(|_, key, data, _| {
                if key == "p/a.txt" {
                    Err(Error::Network("connection reset".into()))
                } else {
                    Ok(ObjectInfo::object(key, data.len() as i64))
                }
            });

        let reporter = RecordingReporter::default();
        let synchronizer = Synchronizer::new(&mock, "mybucket", "p");
        let summary = synchronizer
            .sync_directory(temp_dir.path(), &reporter)
            .await
            .unwrap();

        assert_eq!(summary.uploaded, 1);
        assert_eq!(summary.failed, 1);
        let events = reporter.events();
        assert!(events.iter().any(|e| e.starts_with("failed:p/a.txt")));
        assert!(events.contains(&"uploaded:p/b.txt".to_string()));
    }

    #[tokio::test]
    async fn test_existence_check_failure_fails_open() {
        let temp_dir = TempDir::new().unwrap();
        write_file(&temp_dir, "x.txt", b"hello");

        let mut mock = MockObjectStore::new();
        mock.expect_head_object()
            .times(1)
            .returning(|_, _| Err(Error::Network("timeout".into())));
        mock.expect_put_object()
            .times(1)
            .returning(|_, key, data, _| Ok(ObjectInfo::object(key, data.len() as i64)));

        let reporter = RecordingReporter::default();
        let synchronizer = Synchronizer::new(&mock, "mybucket", "");
        let summary = synchronizer
            .sync_directory(temp_dir.path(), &reporter)
            .await
            .unwrap();

        assert_eq!(summary.uploaded, 1);
        assert_eq!(summary.failed, 0);
        let events = reporter.events();
        assert_eq!(events.len(), 2);
        assert!(events[0].starts_with("check-failed:x.txt"));
        assert_eq!(events[1], "uploaded:x.txt");
    }

    #[tokio::test]
    async fn test_missing_local_file_reported_distinctly() {
        let temp_dir = TempDir::new().unwrap();
        let ghost = temp_dir.path().join("ghost.txt");

        let mut mock = MockObjectStore::new();
        mock.expect_head_object()
            .times(1)
            .returning(|_, _| Err(absent()));
        mock.expect_put_object().times(0);

        let reporter = RecordingReporter::default();
        let synchronizer = Synchronizer::new(&mock, "mybucket", "backup");
        let outcome = synchronizer
            .upload_file(&ghost, "backup/ghost.txt", &reporter)
            .await;

        assert_eq!(outcome, FileOutcome::Failed);
        let events = reporter.events();
        assert_eq!(events.len(), 1);
        assert!(events[0].starts_with("failed:backup/ghost.txt"));
        assert!(events[0].contains("Cannot read"));
    }

    #[tokio::test]
    async fn test_empty_prefix_uses_bare_relative_keys() {
        let temp_dir = TempDir::new().unwrap();
        write_file(&temp_dir, "sub/y.txt", b"y");

        let mut mock = MockObjectStore::new();
        mock.expect_head_object()
            .withf(|_, key| key == "sub/y.txt")
            .times(1)
            .returning(|_, _| Err(absent()));
        mock.expect_put_object()
            .withf(|_, key, _, _| key == "sub/y.txt")
            .times(1)
            .returning(|_, key, data, _| Ok(ObjectInfo::object(key, data.len() as i64)));

        let reporter = RecordingReporter::default();
        let synchronizer = Synchronizer::new(&mock, "mybucket", "");
        let summary = synchronizer
            .sync_directory(temp_dir.path(), &reporter)
            .await
            .unwrap();

        assert_eq!(summary.uploaded, 1);
    }
}
