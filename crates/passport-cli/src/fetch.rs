use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde_json::Value;

use passport_core::config::FetchConfig;
use passport_credentials::{parse_document, CachingFetcher, CredentialError, DocumentFetcher};

/// Fetches documents over HTTP with a credential `Accept` header.
pub struct HttpFetcher {
    client: reqwest::Client,
    accept: String,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            accept: config.accept.clone(),
        })
    }

    fn error(url: &str, reason: impl ToString) -> CredentialError {
        CredentialError::Fetch {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Value, CredentialError> {
        tracing::debug!(url, accept = %self.accept, "fetching document");
        let response = self
            .client
            .get(url)
            .header(ACCEPT, &self.accept)
            .send()
            .await
            .map_err(|e| Self::error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::error(url, format!("HTTP {status}")));
        }

        let text = response.text().await.map_err(|e| Self::error(url, e))?;
        parse_document(url, &text)
    }
}

/// The fetcher every command uses, cached when configured.
pub fn fetcher(config: &FetchConfig) -> anyhow::Result<Arc<dyn DocumentFetcher>> {
    let http: Arc<dyn DocumentFetcher> = Arc::new(HttpFetcher::new(config)?);
    if config.cache {
        Ok(Arc::new(CachingFetcher::new(http)))
    } else {
        Ok(http)
    }
}
