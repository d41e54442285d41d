use std::path::Path;

use ed25519_dalek::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CryptoError;

/// Verification method type published for Ed25519 keys.
pub const VERIFICATION_KEY_TYPE: &str = "Ed25519VerificationKey2020";

/// Ed25519 key pair used to sign credentials.
pub struct KeyPair {
    signing_key: SigningKey,
}

impl KeyPair {
    /// Generate a new random key pair using OS-provided entropy.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Create a key pair from a 32-byte seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Create a key pair from raw bytes (32 bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != 32 {
            return Err(CryptoError::InvalidKeyLength {
                expected: 32,
                actual: bytes.len(),
            });
        }
        let mut seed = [0u8; 32];
        seed.copy_from_slice(bytes);
        let kp = Self::from_seed(&seed);
        seed.zeroize();
        Ok(kp)
    }

    /// Decode from a hex-encoded seed.
    pub fn from_hex(hex_str: &str) -> Result<Self, CryptoError> {
        let mut bytes = hex::decode(hex_str.trim())
            .map_err(|e| CryptoError::InvalidInput(format!("invalid hex: {}", e)))?;
        let kp = Self::from_bytes(&bytes);
        bytes.zeroize();
        kp
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey {
            verifying_key: self.signing_key.verifying_key(),
        }
    }

    /// Hex-encoded seed. Handle with care.
    pub fn secret_hex(&self) -> String {
        let mut bytes = self.signing_key.to_bytes();
        let encoded = hex::encode(bytes);
        bytes.zeroize();
        encoded
    }

    pub(crate) fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }
}

/// Ed25519 public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    verifying_key: VerifyingKey,
}

impl PublicKey {
    /// Create from raw bytes (32 bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let bytes_arr: [u8; 32] = bytes.try_into().map_err(|_| CryptoError::InvalidKeyLength {
            expected: 32,
            actual: bytes.len(),
        })?;
        let verifying_key = VerifyingKey::from_bytes(&bytes_arr)
            .map_err(|e| CryptoError::InvalidInput(format!("invalid public key: {}", e)))?;
        Ok(Self { verifying_key })
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        self.verifying_key.as_bytes()
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.as_bytes())
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| CryptoError::InvalidInput(format!("invalid hex: {}", e)))?;
        Self::from_bytes(&bytes)
    }

    pub(crate) fn verifying_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }
}

/// Describes a published verification method for `key`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MethodInfo {
    /// URL the method document is served from.
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub controller: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
}

/// The verification method document to publish at `info.id`.
pub fn verification_method_document(key: &PublicKey, info: &MethodInfo) -> Value {
    let mut document = json!({
        "id": info.id,
        "type": VERIFICATION_KEY_TYPE,
        "publicKeyHex": key.to_hex(),
    });
    if let Some(controller) = &info.controller {
        document["controller"] = Value::String(controller.clone());
    }
    if let Some(organization) = &info.organization {
        document["organization"] = Value::String(organization.clone());
    }
    document
}

/// A private key on disk, with the verification method it signs for.
#[derive(Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct KeyFile {
    #[serde(rename = "verificationMethod")]
    pub verification_method: String,
    #[serde(rename = "secretKeyHex")]
    secret_key_hex: String,
}

impl KeyFile {
    pub fn new(keypair: &KeyPair, verification_method: &str) -> Self {
        Self {
            verification_method: verification_method.to_string(),
            secret_key_hex: keypair.secret_hex(),
        }
    }

    pub fn keypair(&self) -> Result<KeyPair, CryptoError> {
        KeyPair::from_hex(&self.secret_key_hex)
    }

    pub fn load(path: &Path) -> Result<Self, CryptoError> {
        let mut content = std::fs::read_to_string(path)?;
        let parsed = serde_json::from_str(&content);
        content.zeroize();
        Ok(parsed?)
    }

    pub fn save(&self, path: &Path) -> Result<(), CryptoError> {
        let mut content = serde_json::to_string_pretty(self)?;
        let written = std::fs::write(path, &content);
        content.zeroize();
        Ok(written?)
    }
}
