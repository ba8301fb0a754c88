use async_trait::async_trait;
use rutaverde_core::config::LayeredConfig;
use rutaverde_core::{Result, RutaverdeError};
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;

/// Where the static GeoJSON documents come from
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Fetch the raw text of a document.
    ///
    /// Failures worth retrying are reported as [`RutaverdeError::Transport`].
    async fn fetch(&self, document: &str) -> Result<String>;

    /// Human-readable location, for logs
    fn describe(&self) -> String;
}

/// Documents served over HTTP under a base URL
pub struct HttpSource {
    base_url: String,
    client: reqwest::Client,
}

impl HttpSource {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), client: reqwest::Client::new() }
    }

    fn url_for(&self, document: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), document)
    }
}

#[async_trait]
impl DocumentSource for HttpSource {
    async fn fetch(&self, document: &str) -> Result<String> {
        let url = self.url_for(document);
        tracing::debug!(%url, "Fetching document");

        let response = self.client.get(&url).send().await.map_err(|e| RutaverdeError::Transport {
            document: document.to_string(),
            reason: format!("request to {} failed: {}", url, e),
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(document, status.as_u16()));
        }

        response.text().await.map_err(|e| RutaverdeError::Transport {
            document: document.to_string(),
            reason: format!("failed to read body: {}", e),
        })
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

/// Error for a non-success HTTP status. Rate limiting and server errors
/// are transient; any other client error is permanent.
pub fn status_error(document: &str, status: u16) -> RutaverdeError {
    if status == 429 || (500..600).contains(&status) {
        RutaverdeError::Transport { document: document.to_string(), reason: format!("HTTP {}", status) }
    } else {
        RutaverdeError::HttpStatus { document: document.to_string(), status }
    }
}

/// Documents in a directory on disk
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl DocumentSource for FileSource {
    async fn fetch(&self, document: &str) -> Result<String> {
        let path = self.root.join(document);
        tracing::debug!(path = %path.display(), "Reading document");

        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(text),
            // interrupted reads are retried like transport failures
            Err(e) if matches!(e.kind(), ErrorKind::Interrupted | ErrorKind::WouldBlock) => {
                Err(RutaverdeError::Transport { document: document.to_string(), reason: e.to_string() })
            }
            Err(e) => Err(RutaverdeError::Io(e)),
        }
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// Pick the source named by `data_url`: HTTP(S) URLs are fetched, anything
/// else is a directory.
pub fn source_from_config(config: &LayeredConfig) -> Arc<dyn DocumentSource> {
    if config.is_remote() {
        Arc::new(HttpSource::new(config.data_url.value.clone()))
    } else {
        Arc::new(FileSource::new(config.data_url.value.clone()))
    }
}
