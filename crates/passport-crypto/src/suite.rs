//! Ed25519 proof suite for credential documents.
//!
//! A proof is attached under `proof` and signs the document without it:
//!
//! ```json
//! { "type": "Ed25519Signature2020", "created": "...",
//!   "verificationMethod": "https://...", "proofPurpose": "assertionMethod",
//!   "proofValue": "<hex signature>" }
//! ```

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};

use passport_credentials::{
    ChainLink, CredentialError, ProofDescriptor, ProofSigner, ProofVerifier, VerificationMethodResolver,
    VerifiedProof,
};

use crate::error::CryptoError;
use crate::keys::{KeyPair, PublicKey};
use crate::signing::{self, Signature};

pub const PROOF_TYPE: &str = "Ed25519Signature2020";
pub const PROOF_PURPOSE: &str = "assertionMethod";

struct SigningIdentity {
    keypair: KeyPair,
    verification_method: String,
}

/// Signs and verifies Ed25519 credential proofs.
///
/// A suite built with [`Ed25519Suite::verifier`] holds no key and can only
/// verify.
pub struct Ed25519Suite {
    identity: Option<SigningIdentity>,
}

impl Ed25519Suite {
    /// A suite that signs with `keypair`, naming `verification_method` as
    /// the place its public key is published.
    pub fn signer(keypair: KeyPair, verification_method: &str) -> Self {
        Self {
            identity: Some(SigningIdentity {
                keypair,
                verification_method: verification_method.to_string(),
            }),
        }
    }

    pub fn verifier() -> Self {
        Self { identity: None }
    }

    pub fn public_key(&self) -> Option<PublicKey> {
        self.identity.as_ref().map(|id| id.keypair.public_key())
    }

    fn failure(e: CryptoError) -> CredentialError {
        CredentialError::VerificationFailure(e.to_string())
    }
}

#[async_trait]
impl ProofSigner for Ed25519Suite {
    async fn sign(&self, mut document: Value) -> Result<Value, CredentialError> {
        let identity = self
            .identity
            .as_ref()
            .ok_or_else(|| CredentialError::SigningFailed("suite has no signing key".into()))?;

        let payload =
            signing::signing_payload(&document).map_err(|e| CredentialError::SigningFailed(e.to_string()))?;
        let signature = signing::sign(&payload, &identity.keypair);

        let proof = json!({
            "type": PROOF_TYPE,
            "created": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            "verificationMethod": identity.verification_method,
            "proofPurpose": PROOF_PURPOSE,
            "proofValue": signature.to_hex(),
        });
        match &mut document {
            Value::Object(map) => {
                map.insert("proof".into(), proof);
            }
            _ => return Err(CredentialError::SigningFailed("document must be a mapping".into())),
        }
        Ok(document)
    }
}

#[async_trait]
impl ProofVerifier for Ed25519Suite {
    async fn verify(
        &self,
        document: &Value,
        resolver: &dyn VerificationMethodResolver,
    ) -> Result<VerifiedProof, CredentialError> {
        let Some(proof) = document.get("proof") else {
            tracing::debug!("document has no proof");
            return Ok(VerifiedProof {
                valid: false,
                chain: Vec::new(),
            });
        };

        let descriptor = ProofDescriptor::from_proof(proof)?;
        if descriptor.proof_type.as_deref() != Some(PROOF_TYPE) {
            return Err(CredentialError::VerificationFailure(format!(
                "unsupported proof type: {}",
                descriptor.proof_type.as_deref().unwrap_or("<none>")
            )));
        }
        let signature = proof
            .get("proofValue")
            .and_then(Value::as_str)
            .ok_or_else(|| CredentialError::VerificationFailure("proof has no proofValue".into()))
            .and_then(|hex| Signature::from_hex(hex).map_err(Self::failure))?;

        let method = resolver.resolve(&descriptor).await?;
        let key = method
            .get("publicKeyHex")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                CredentialError::VerificationFailure(format!(
                    "verification method {} has no publicKeyHex",
                    descriptor.verification_method
                ))
            })
            .and_then(|hex| PublicKey::from_hex(hex).map_err(Self::failure))?;

        let payload = signing::signing_payload(document).map_err(Self::failure)?;
        let valid = signing::verify(&payload, &signature, &key).is_ok();
        if !valid {
            tracing::warn!(method = %descriptor.verification_method, "signature does not match");
        }

        let mut chain = Vec::new();
        if let Some(controller) = method.get("controller").and_then(Value::as_str) {
            chain.push(ChainLink {
                id: controller.to_string(),
                organization: None,
            });
        }
        chain.push(ChainLink {
            id: method
                .get("id")
                .and_then(Value::as_str)
                .unwrap_or(&descriptor.verification_method)
                .to_string(),
            organization: method.get("organization").and_then(Value::as_str).map(str::to_string),
        });

        Ok(VerifiedProof { valid, chain })
    }
}
