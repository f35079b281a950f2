use std::path::PathBuf;
use std::sync::Arc;

use resume_core::{DocumentStore, FileDocumentStore, ProfileDocument, StaticDocumentStore};

/// Default document location: `<config dir>/resume-mcp/resume.json`.
pub fn config_path() -> PathBuf {
    let config_dir = dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("resume-mcp");
    config_dir.join("resume.json")
}

/// Pick the document store for this process.
///
/// An explicit path always wins, even if the file is missing (calls then fail
/// with `document_unavailable`). Otherwise the config-dir file is used when it
/// exists, and the built-in sample when it does not.
pub fn open_store(explicit: Option<PathBuf>) -> Arc<dyn DocumentStore> {
    if let Some(path) = explicit {
        tracing::info!(path = %path.display(), "Serving profile document from file");
        return Arc::new(FileDocumentStore::new(path));
    }

    let default_path = config_path();
    if default_path.is_file() {
        tracing::info!(path = %default_path.display(), "Serving profile document from config dir");
        return Arc::new(FileDocumentStore::new(default_path));
    }

    tracing::info!("No profile document configured, serving built-in sample");
    Arc::new(StaticDocumentStore::new(ProfileDocument::sample()))
}
