use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use crate::document::ProfileDocument;
use crate::error::ErrorKind;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("profile document unavailable at {path}: {reason}")]
    Unavailable { path: PathBuf, reason: String },
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::Unavailable { .. } => ErrorKind::DocumentUnavailable,
        }
    }
}

/// Supplies the single profile document for the lifetime of the process.
///
/// `load` is idempotent: every successful call yields the same logical document.
/// The returned `Arc` is shared and immutable, so callers cannot alter the store.
pub trait DocumentStore: Send + Sync {
    fn load(&self) -> Result<Arc<ProfileDocument>, StoreError>;
}

/// Store over a document constructed by the caller (composition root or test).
#[derive(Debug, Clone)]
pub struct StaticDocumentStore {
    document: Arc<ProfileDocument>,
}

impl StaticDocumentStore {
    pub fn new(document: ProfileDocument) -> Self {
        Self {
            document: Arc::new(document),
        }
    }
}

impl DocumentStore for StaticDocumentStore {
    fn load(&self) -> Result<Arc<ProfileDocument>, StoreError> {
        Ok(Arc::clone(&self.document))
    }
}

/// Store backed by a JSON file, parsed on first successful load and cached.
///
/// Failed loads are not cached; the next call reads the file again.
#[derive(Debug)]
pub struct FileDocumentStore {
    path: PathBuf,
    cached: OnceLock<Arc<ProfileDocument>>,
}

impl FileDocumentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            cached: OnceLock::new(),
        }
    }

    fn read_document(&self) -> Result<ProfileDocument, StoreError> {
        let raw = std::fs::read_to_string(&self.path).map_err(|e| self.unavailable(e))?;
        ProfileDocument::from_json(&raw).map_err(|e| self.unavailable(e))
    }

    fn unavailable(&self, reason: impl std::fmt::Display) -> StoreError {
        StoreError::Unavailable {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }
}

impl DocumentStore for FileDocumentStore {
    fn load(&self) -> Result<Arc<ProfileDocument>, StoreError> {
        if let Some(document) = self.cached.get() {
            return Ok(Arc::clone(document));
        }

        let document = self.read_document().inspect_err(|err| {
            tracing::warn!(error = %err, "Failed to load profile document");
        })?;
        // A concurrent first load may have won the race; keep whichever landed.
        let document = self.cached.get_or_init(|| Arc::new(document));
        tracing::debug!(path = %self.path.display(), "Profile document loaded");
        Ok(Arc::clone(document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn static_store_returns_same_document_every_call() {
        let store = StaticDocumentStore::new(ProfileDocument::sample());
        let first = store.load().unwrap();
        let second = store.load().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.personal_info.name, "Your Name");
    }

    #[test]
    fn file_store_parses_and_caches() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = serde_json::to_string(&ProfileDocument::sample()).unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let store = FileDocumentStore::new(file.path());
        let first = store.load().expect("file document should load");
        assert_eq!(first.education[0].institution, "Stanford University");

        // Cached: later loads ignore changes on disk.
        std::fs::write(file.path(), "not json").unwrap();
        let second = store.load().expect("cached document should be served");
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn missing_file_maps_to_document_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileDocumentStore::new(dir.path().join("absent.json"));
        let err = store.load().expect_err("missing file must fail");
        assert_eq!(err.kind(), ErrorKind::DocumentUnavailable);
        assert!(err.to_string().contains("absent.json"));
    }

    #[test]
    fn failed_load_is_retried_on_next_call() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.json");
        std::fs::write(&path, "{ broken").unwrap();

        let store = FileDocumentStore::new(&path);
        assert!(store.load().is_err());

        std::fs::write(&path, r#"{ "personalInfo": { "name": "Recovered" } }"#).unwrap();
        let doc = store.load().expect("second attempt should read the fixed file");
        assert_eq!(doc.personal_info.name, "Recovered");
    }
}
