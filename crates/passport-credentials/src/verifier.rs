use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::envelope::{credential_subject, wrap_claim};
use crate::error::CredentialError;
use crate::loader::DocumentFetcher;

/// The parts of a document's `proof` needed to find its verification
/// material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofDescriptor {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub proof_type: Option<String>,
    #[serde(rename = "verificationMethod")]
    pub verification_method: String,
    #[serde(rename = "proofPurpose", default, skip_serializing_if = "Option::is_none")]
    pub proof_purpose: Option<String>,
}

impl ProofDescriptor {
    /// Read the descriptor from a `proof` value.
    pub fn from_proof(proof: &Value) -> Result<Self, CredentialError> {
        match proof.get("verificationMethod").and_then(Value::as_str) {
            Some(method) if !method.is_empty() => Ok(Self {
                proof_type: proof.get("type").and_then(Value::as_str).map(str::to_string),
                verification_method: method.to_string(),
                proof_purpose: proof
                    .get("proofPurpose")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            }),
            _ => Err(CredentialError::MissingVerificationMethod),
        }
    }
}

/// Fetches the verification material a proof refers to. This is the only
/// callback handed to a [`ProofVerifier`].
#[async_trait]
pub trait VerificationMethodResolver: Send + Sync {
    async fn resolve(&self, proof: &ProofDescriptor) -> Result<Value, CredentialError>;
}

/// Resolves verification methods by fetching their URL.
pub struct FetchingMethodResolver {
    fetcher: Arc<dyn DocumentFetcher>,
}

impl FetchingMethodResolver {
    pub fn new(fetcher: Arc<dyn DocumentFetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl VerificationMethodResolver for FetchingMethodResolver {
    async fn resolve(&self, proof: &ProofDescriptor) -> Result<Value, CredentialError> {
        tracing::debug!(method = %proof.verification_method, "resolving verification method");
        self.fetcher.fetch(&proof.verification_method).await
    }
}

/// One signer in a verified delegation chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainLink {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
}

/// What a [`ProofVerifier`] reports for a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedProof {
    pub valid: bool,
    pub chain: Vec<ChainLink>,
}

/// Checks the proof attached to a document.
///
/// A well-formed proof that does not verify is reported with
/// `valid: false`; malformed input is a [`CredentialError::VerificationFailure`].
#[async_trait]
pub trait ProofVerifier: Send + Sync {
    async fn verify(
        &self,
        document: &Value,
        resolver: &dyn VerificationMethodResolver,
    ) -> Result<VerifiedProof, CredentialError>;
}

/// Attaches a proof to a document.
#[async_trait]
pub trait ProofSigner: Send + Sync {
    async fn sign(&self, document: Value) -> Result<Value, CredentialError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct VerifyOptions {
    /// Treat the input as a bare claim and wrap it in an envelope first.
    pub wrap_as_claim: bool,
}

/// Result of verifying a credential document.
#[derive(Debug, Clone)]
pub struct VerificationResult {
    pub valid: bool,
    /// The document that was verified, after any wrapping.
    pub document: Value,
    /// Its credential subject, or null.
    pub subject: Value,
    pub chain: Vec<ChainLink>,
}

impl VerificationResult {
    /// The organization of the last link in the chain.
    pub fn issuer(&self) -> Option<&str> {
        self.chain.last().and_then(|link| link.organization.as_deref())
    }
}

/// Verifies credential documents through an external proof verifier.
pub struct CredentialVerifier {
    verifier: Arc<dyn ProofVerifier>,
    resolver: Arc<dyn VerificationMethodResolver>,
}

impl CredentialVerifier {
    pub fn new(verifier: Arc<dyn ProofVerifier>, resolver: Arc<dyn VerificationMethodResolver>) -> Self {
        Self { verifier, resolver }
    }

    /// Verify `document`, wrapping it first when it is a bare claim.
    pub async fn verify(
        &self,
        document: Value,
        options: &VerifyOptions,
    ) -> Result<VerificationResult, CredentialError> {
        let document = if options.wrap_as_claim {
            wrap_claim(document)
        } else {
            document
        };

        let proof = self.verifier.verify(&document, self.resolver.as_ref()).await?;
        let subject = credential_subject(&document).cloned().unwrap_or(Value::Null);

        tracing::debug!(valid = proof.valid, chain = proof.chain.len(), "credential verified");
        Ok(VerificationResult {
            valid: proof.valid,
            subject,
            chain: proof.chain,
            document,
        })
    }
}
