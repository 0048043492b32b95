use crate::auth::HttpBackend;
use crate::session::{FileStore, SessionStore};
use anyhow::{Context, Result};
use std::{path::PathBuf, time::Duration};

/// Settings shared by every subcommand.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub api_url: String,
    pub session_file: PathBuf,
    pub timeout: Duration,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(api_url: String, session_file: PathBuf, timeout: Duration) -> Self {
        Self {
            api_url,
            session_file,
            timeout,
        }
    }

    #[must_use]
    pub fn sessions(&self) -> SessionStore<FileStore> {
        SessionStore::new(FileStore::new(&self.session_file))
    }

    /// # Errors
    /// Returns an error if the API URL is unusable or the HTTP client cannot be built.
    pub fn backend(&self) -> Result<HttpBackend> {
        HttpBackend::new(&self.api_url, self.timeout)
            .with_context(|| format!("Could not set up the API client for {}", self.api_url))
    }
}
