//! Fetch-and-normalize for the two static documents.

use crate::pipeline::{normalize_sites, normalize_zones, Normalized};
use crate::preprocess::PreprocessContext;
use crate::source::{source_from_config, DocumentSource};
use rutaverde_core::config::LayeredConfig;
use rutaverde_core::document::parse_document;
use rutaverde_core::models::{SiteProperties, ZoneRecord};
use rutaverde_core::{Result, RutaverdeError};
use std::sync::Arc;
use std::time::Duration;

/// Bounded exponential backoff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts after the first one
    pub max_retries: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(30_000),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &LayeredConfig) -> Self {
        Self {
            max_retries: config.max_retries.value,
            base_delay: config.retry_base_delay(),
            max_delay: config.retry_max_delay(),
        }
    }

    /// Delay before retry number `retry` (0-based): `base * 2^retry`, capped.
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 2u32.checked_pow(retry).unwrap_or(u32::MAX);
        self.base_delay.checked_mul(factor).unwrap_or(self.max_delay).min(self.max_delay)
    }
}

/// Loads the zone and site documents from one source
pub struct Loader {
    source: Arc<dyn DocumentSource>,
    policy: RetryPolicy,
    zones_document: String,
    sites_document: String,
}

impl Loader {
    pub fn new(
        source: Arc<dyn DocumentSource>,
        policy: RetryPolicy,
        zones_document: impl Into<String>,
        sites_document: impl Into<String>,
    ) -> Self {
        Self {
            source,
            policy,
            zones_document: zones_document.into(),
            sites_document: sites_document.into(),
        }
    }

    pub fn from_config(config: &LayeredConfig) -> Self {
        let source = source_from_config(config);
        tracing::debug!(source = %source.describe(), "Document source selected");
        Self::new(
            source,
            RetryPolicy::from_config(config),
            config.zones_file.value.clone(),
            config.sites_file.value.clone(),
        )
    }

    pub fn zones_document(&self) -> &str {
        &self.zones_document
    }

    pub fn sites_document(&self) -> &str {
        &self.sites_document
    }

    /// Fetch a document, retrying transport failures with backoff.
    pub async fn fetch_with_retry(&self, document: &str) -> Result<String> {
        let mut attempt = 0u32;
        loop {
            attempt += 1;
            match self.source.fetch(document).await {
                Ok(text) => {
                    tracing::debug!(document, attempt, bytes = text.len(), "Document fetched");
                    return Ok(text);
                }
                Err(e) if e.is_retryable() && attempt <= self.policy.max_retries => {
                    let delay = self.policy.delay_for(attempt - 1);
                    tracing::warn!(
                        document,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Fetch failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    tracing::error!(document, attempt, error = %e, "Giving up on document");
                    return Err(RutaverdeError::LoadFailed {
                        document: document.to_string(),
                        attempts: attempt,
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    /// Load and normalize the zone collection.
    pub async fn load_zones(&self) -> Result<Normalized<ZoneRecord>> {
        let text = self.fetch_with_retry(&self.zones_document).await?;
        let document = parse_document(&self.zones_document, &text)?;
        let mut ctx = PreprocessContext::new();
        normalize_zones(document, &self.zones_document, &mut ctx)
    }

    /// Load and normalize the site collection.
    pub async fn load_sites(&self) -> Result<Normalized<SiteProperties>> {
        let text = self.fetch_with_retry(&self.sites_document).await?;
        let document = parse_document(&self.sites_document, &text)?;
        let mut ctx = PreprocessContext::new();
        normalize_sites(document, &self.sites_document, &mut ctx)
    }

    /// Load both documents concurrently. Each result stands on its own.
    pub async fn load_all(
        &self,
    ) -> (Result<Normalized<ZoneRecord>>, Result<Normalized<SiteProperties>>) {
        tokio::join!(self.load_zones(), self.load_sites())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_doubles_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_for(0), Duration::from_millis(1000));
        assert_eq!(policy.delay_for(1), Duration::from_millis(2000));
        assert_eq!(policy.delay_for(4), Duration::from_millis(16_000));
        assert_eq!(policy.delay_for(5), Duration::from_millis(30_000));
        assert_eq!(policy.delay_for(40), Duration::from_millis(30_000));
    }

    #[test]
    fn test_policy_from_config() {
        let policy = RetryPolicy::from_config(&LayeredConfig::with_defaults());
        assert_eq!(policy, RetryPolicy::default());
    }
}
