//! Artifact Store — persists rendered PDFs under a per-caller namespace.
//!
//! The store is a key-value abstraction (`put` / `list` / `get` keyed by
//! sanitized caller id + artifact name) so the backend stays swappable.
//! The production backend is the local filesystem: one directory per
//! caller, created lazily, with atomic temp-file + rename writes.
//!
//! Caller ids are opaque strings. This module never inspects their
//! structure — it only sanitizes them for filesystem safety before use as
//! a path segment.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::io::ErrorKind;
use std::path::PathBuf;
use thiserror::Error;
use tokio::fs;
use tracing::info;
use uuid::Uuid;

/// Stem used when sanitization leaves nothing usable.
const FALLBACK_STEM: &str = "resume";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("artifact not found: {0}")]
    NotFound(String),

    #[error("invalid artifact name: {0}")]
    InvalidName(String),

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A persisted artifact. `stored_name` is the retrieval key.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredArtifact {
    pub stored_name: String,
    pub created_at: DateTime<Utc>,
}

/// Per-caller binary artifact storage. Artifacts are written once and read
/// many times; there is no update or delete.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    async fn put(
        &self,
        caller_id: &str,
        display_name: &str,
        bytes: &[u8],
    ) -> Result<StoredArtifact, StorageError>;

    async fn list(&self, caller_id: &str) -> Result<Vec<StoredArtifact>, StorageError>;

    async fn get(&self, caller_id: &str, stored_name: &str) -> Result<Vec<u8>, StorageError>;
}

/// Maps an arbitrary string onto the storage alphabet `[A-Za-z0-9._-]`.
/// Whitespace becomes `_`, anything else is dropped, leading dots are
/// stripped so the result can never alias `.` or `..`. Falls back to a
/// fixed stem when nothing usable remains.
pub fn sanitize_segment(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.trim().chars() {
        if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
            out.push(c);
        } else if c.is_whitespace() {
            out.push('_');
        }
    }
    let out = out.trim_start_matches('.');
    if out.chars().any(|c| c.is_ascii_alphanumeric()) {
        out.to_string()
    } else {
        FALLBACK_STEM.to_string()
    }
}

/// Rejects any requested name that could escape the caller's namespace:
/// characters outside the sanitization alphabet, dot-prefixed names, or
/// names with no alphanumeric character at all.
fn validate_stored_name(name: &str) -> Result<(), StorageError> {
    let in_alphabet = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'));
    let valid = !name.is_empty()
        && !name.starts_with('.')
        && in_alphabet
        && name.chars().any(|c| c.is_ascii_alphanumeric());
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidName(name.to_string()))
    }
}

/// Filesystem-backed artifact store rooted at a configurable directory.
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn namespace_dir(&self, caller_id: &str) -> PathBuf {
        self.root.join(sanitize_segment(caller_id))
    }
}

#[async_trait]
impl ArtifactStore for FsArtifactStore {
    async fn put(
        &self,
        caller_id: &str,
        display_name: &str,
        bytes: &[u8],
    ) -> Result<StoredArtifact, StorageError> {
        let dir = self.namespace_dir(caller_id);
        // Idempotent under concurrent first-time writers.
        fs::create_dir_all(&dir).await?;

        let stem = sanitize_segment(display_name);
        let millis = Utc::now().timestamp_millis();
        let mut stored_name = format!("{stem}-{millis}.pdf");
        let mut collision = 0u32;
        while fs::try_exists(dir.join(&stored_name)).await? {
            collision += 1;
            stored_name = format!("{stem}-{millis}-{collision}.pdf");
        }

        // Temp file carries a unique name so concurrent writers never clash,
        // and a dot prefix so a crashed write never shows up in list().
        let tmp = dir.join(format!(".tmp-{}", Uuid::new_v4()));
        fs::write(&tmp, bytes).await?;
        fs::rename(&tmp, dir.join(&stored_name)).await?;

        info!("Stored artifact {stored_name} ({} bytes)", bytes.len());

        Ok(StoredArtifact {
            stored_name,
            created_at: Utc::now(),
        })
    }

    async fn list(&self, caller_id: &str) -> Result<Vec<StoredArtifact>, StorageError> {
        let dir = self.namespace_dir(caller_id);
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut artifacts = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            let metadata = entry.metadata().await?;
            if !metadata.is_file() {
                continue;
            }
            let created_at = metadata
                .modified()
                .map(DateTime::<Utc>::from)
                .unwrap_or_else(|_| Utc::now());
            artifacts.push(StoredArtifact {
                stored_name: name,
                created_at,
            });
        }

        // Newest first. See DESIGN.md.
        artifacts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(artifacts)
    }

    async fn get(&self, caller_id: &str, stored_name: &str) -> Result<Vec<u8>, StorageError> {
        validate_stored_name(stored_name)?;
        let path = self.namespace_dir(caller_id).join(stored_name);
        match fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StorageError::NotFound(stored_name.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, FsArtifactStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FsArtifactStore::new(dir.path().to_path_buf());
        (dir, store)
    }

    #[test]
    fn test_sanitize_maps_whitespace_to_underscore() {
        assert_eq!(sanitize_segment("Jane Doe"), "Jane_Doe");
    }

    #[test]
    fn test_sanitize_drops_disallowed_characters() {
        assert_eq!(sanitize_segment("a/b\\c:d*e"), "abcde");
    }

    #[test]
    fn test_sanitize_strips_leading_dots() {
        assert_eq!(sanitize_segment("..hidden"), "hidden");
    }

    #[test]
    fn test_sanitize_falls_back_when_nothing_usable() {
        assert_eq!(sanitize_segment("@@@"), FALLBACK_STEM);
        assert_eq!(sanitize_segment(".."), FALLBACK_STEM);
        assert_eq!(sanitize_segment(""), FALLBACK_STEM);
    }

    #[tokio::test]
    async fn test_put_list_get_round_trip_is_byte_identical() {
        let (_dir, store) = store();
        let payload = b"%PDF-1.4 fake pdf bytes";

        let stored = store.put("caller-1", "Jane Doe", payload).await.unwrap();
        assert!(stored.stored_name.starts_with("Jane_Doe-"));
        assert!(stored.stored_name.ends_with(".pdf"));

        let listed = store.list("caller-1").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].stored_name, stored.stored_name);

        let bytes = store.get("caller-1", &stored.stored_name).await.unwrap();
        assert_eq!(bytes, payload);
    }

    #[tokio::test]
    async fn test_get_rejects_path_traversal() {
        let (_dir, store) = store();
        let err = store.get("caller-1", "../../etc/passwd").await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidName(_)));
    }

    #[tokio::test]
    async fn test_get_rejects_dot_dot_name() {
        let (_dir, store) = store();
        let err = store.get("caller-1", "..").await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidName(_)));
    }

    #[tokio::test]
    async fn test_get_absent_artifact_is_not_found() {
        let (_dir, store) = store();
        store.put("caller-1", "cv", b"x").await.unwrap();
        let err = store.get("caller-1", "missing-123.pdf").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_absent_namespace_is_empty() {
        let (_dir, store) = store();
        assert!(store.list("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_namespaces_are_disjoint() {
        let (_dir, store) = store();
        let stored = store.put("alice", "cv", b"alice bytes").await.unwrap();
        store.put("bob", "cv", b"bob bytes").await.unwrap();

        let err = store.get("bob", &stored.stored_name).await;
        // Bob's namespace has its own timestamped name; Alice's key must not
        // resolve there unless the names happened to collide — and even then
        // the content is Bob's own.
        match err {
            Err(StorageError::NotFound(_)) => {}
            Ok(bytes) => assert_eq!(bytes, b"bob bytes"),
            Err(e) => panic!("unexpected error: {e}"),
        }

        assert_eq!(store.list("alice").await.unwrap().len(), 1);
        assert_eq!(store.list("bob").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_repeated_puts_never_collide() {
        let (_dir, store) = store();
        for _ in 0..3 {
            store.put("caller-1", "Same Name", b"payload").await.unwrap();
        }
        assert_eq!(store.list("caller-1").await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_list_skips_temp_files() {
        let (_dir, store) = store();
        store.put("caller-1", "cv", b"x").await.unwrap();
        let dir = store.namespace_dir("caller-1");
        tokio::fs::write(dir.join(".tmp-leftover"), b"partial").await.unwrap();
        let listed = store.list("caller-1").await.unwrap();
        assert_eq!(listed.len(), 1);
    }
}
