//! Loading credential documents from URLs, files or standard input.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use serde::Deserialize;
use serde_json::Value;
use tokio::io::AsyncReadExt;

use crate::error::CredentialError;

/// Where a document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentReference {
    /// Standard input, written as `-`.
    Stdin,
    Url(String),
    File(PathBuf),
}

impl DocumentReference {
    /// Classify a reference string. `http` and `https` locators are
    /// fetched; any other `scheme://` locator is unsupported.
    pub fn parse(reference: &str) -> Result<Self, CredentialError> {
        if reference == "-" {
            return Ok(DocumentReference::Stdin);
        }
        if let Some((scheme, _)) = reference.split_once("://") {
            let scheme = scheme.to_ascii_lowercase();
            if scheme == "http" || scheme == "https" {
                return Ok(DocumentReference::Url(reference.to_string()));
            }
            return Err(CredentialError::UnsupportedReference(reference.to_string()));
        }
        Ok(DocumentReference::File(PathBuf::from(reference)))
    }
}

impl fmt::Display for DocumentReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentReference::Stdin => write!(f, "-"),
            DocumentReference::Url(url) => write!(f, "{url}"),
            DocumentReference::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Parse one JSON or YAML document.
pub fn parse_document(reference: &str, text: &str) -> Result<Value, CredentialError> {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return Ok(value);
    }
    serde_yaml::from_str::<Value>(text).map_err(|e| CredentialError::UnreadableDocument {
        reference: reference.to_string(),
        reason: e.to_string(),
    })
}

/// Parse a `---` separated YAML stream (JSON documents are valid YAML).
/// Empty documents in the stream are skipped.
pub fn parse_document_stream(reference: &str, text: &str) -> Result<Vec<Value>, CredentialError> {
    let mut documents = Vec::new();
    for document in serde_yaml::Deserializer::from_str(text) {
        let value = Value::deserialize(document).map_err(|e| CredentialError::UnreadableDocument {
            reference: reference.to_string(),
            reason: e.to_string(),
        })?;
        if !value.is_null() {
            documents.push(value);
        }
    }
    Ok(documents)
}

/// Fetches structured documents over the network.
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Value, CredentialError>;
}

/// Serves documents from memory.
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    documents: DashMap<String, Value>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, url: &str, document: Value) {
        self.documents.insert(url.to_string(), document);
    }

    pub fn with_document(self, url: &str, document: Value) -> Self {
        self.insert(url, document);
        self
    }
}

#[async_trait]
impl DocumentFetcher for MemoryFetcher {
    async fn fetch(&self, url: &str) -> Result<Value, CredentialError> {
        self.documents
            .get(url)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| CredentialError::Fetch {
                url: url.to_string(),
                reason: "not found".into(),
            })
    }
}

/// Remembers every successfully fetched document for the lifetime of the
/// fetcher. Failures are not cached.
pub struct CachingFetcher {
    inner: Arc<dyn DocumentFetcher>,
    cache: DashMap<String, Value>,
}

impl CachingFetcher {
    pub fn new(inner: Arc<dyn DocumentFetcher>) -> Self {
        Self {
            inner,
            cache: DashMap::new(),
        }
    }

    /// Number of cached documents.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }
}

#[async_trait]
impl DocumentFetcher for CachingFetcher {
    async fn fetch(&self, url: &str) -> Result<Value, CredentialError> {
        if let Some(hit) = self.cache.get(url) {
            tracing::trace!(url, "fetch cache hit");
            return Ok(hit.value().clone());
        }
        let document = self.inner.fetch(url).await?;
        self.cache.insert(url.to_string(), document.clone());
        Ok(document)
    }
}

/// Reads documents from any [`DocumentReference`].
#[derive(Clone)]
pub struct DocumentLoader {
    fetcher: Arc<dyn DocumentFetcher>,
}

impl DocumentLoader {
    pub fn new(fetcher: Arc<dyn DocumentFetcher>) -> Self {
        Self { fetcher }
    }

    /// Load every document at `reference`. A URL yields one document;
    /// files and standard input may hold a YAML stream.
    pub async fn load(&self, reference: &str) -> Result<Vec<Value>, CredentialError> {
        let parsed = DocumentReference::parse(reference)?;
        let documents = match &parsed {
            DocumentReference::Url(url) => vec![self.fetch(url).await?],
            DocumentReference::File(path) => {
                let text = tokio::fs::read_to_string(path).await.map_err(|e| {
                    CredentialError::UnreadableDocument {
                        reference: reference.to_string(),
                        reason: e.to_string(),
                    }
                })?;
                parse_document_stream(reference, &text)?
            }
            DocumentReference::Stdin => {
                let mut text = String::new();
                tokio::io::stdin()
                    .read_to_string(&mut text)
                    .await
                    .map_err(|e| CredentialError::UnreadableDocument {
                        reference: reference.to_string(),
                        reason: e.to_string(),
                    })?;
                parse_document_stream(reference, &text)?
            }
        };
        tracing::debug!(reference = %parsed, documents = documents.len(), "documents loaded");
        Ok(documents)
    }

    /// Load exactly one document from `reference`.
    pub async fn load_document(&self, reference: &str) -> Result<Value, CredentialError> {
        let mut documents = self.load(reference).await?;
        match documents.len() {
            1 => Ok(documents.remove(0)),
            n => Err(CredentialError::UnreadableDocument {
                reference: reference.to_string(),
                reason: format!("expected one document, found {n}"),
            }),
        }
    }

    async fn fetch(&self, url: &str) -> Result<Value, CredentialError> {
        self.fetcher
            .fetch(url)
            .await
            .map_err(|e| CredentialError::UnreadableDocument {
                reference: url.to_string(),
                reason: e.to_string(),
            })
    }
}
