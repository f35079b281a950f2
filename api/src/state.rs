use std::path::PathBuf;

use resume_mcp_runtime::Dispatcher;

/// Process configuration read from the environment (after `.env` is loaded).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    pub document_path: Option<PathBuf>,
    pub server_url: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            port: non_empty("PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(3000),
            document_path: non_empty("RESUME_DOCUMENT_PATH").map(PathBuf::from),
            server_url: non_empty("SERVER_URL").map(|url| url.trim_end_matches('/').to_string()),
        }
    }

    /// Base URL shown on the landing page.
    pub fn public_url(&self) -> String {
        self.server_url
            .clone()
            .unwrap_or_else(|| format!("http://localhost:{}", self.port))
    }
}

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Dispatcher,
    pub server_url: String,
}
