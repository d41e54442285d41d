use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;

use crate::envelope::Envelope;
use crate::error::CredentialError;
use crate::verifier::ProofSigner;

/// Issues credentials by wrapping subjects and signing them.
pub struct CredentialIssuer {
    signer: Arc<dyn ProofSigner>,
    issuer: Option<String>,
}

impl CredentialIssuer {
    pub fn new(signer: Arc<dyn ProofSigner>) -> Self {
        Self { signer, issuer: None }
    }

    /// Issuer URL placed into every envelope.
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Wrap `subject` in a fresh envelope and sign it.
    pub async fn issue(&self, subject: Value) -> Result<Value, CredentialError> {
        let mut envelope = Envelope::new(subject).issued_at(Utc::now());
        if let Some(issuer) = &self.issuer {
            envelope = envelope.with_issuer(issuer.clone());
        }
        self.sign(envelope.build()).await
    }

    /// Sign an existing document. Any proof already present is replaced.
    pub async fn sign(&self, mut document: Value) -> Result<Value, CredentialError> {
        if let Value::Object(map) = &mut document {
            map.remove("proof");
        } else {
            return Err(CredentialError::SigningFailed("document must be a mapping".into()));
        }
        let signed = self.signer.sign(document).await?;
        tracing::debug!(id = ?signed.get("id"), "credential signed");
        Ok(signed)
    }
}
