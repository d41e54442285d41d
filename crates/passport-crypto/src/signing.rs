use ed25519_dalek::{Signer, Verifier};
use serde_json::{Map, Value};

use crate::error::CryptoError;
use crate::keys::{KeyPair, PublicKey};

/// Ed25519 signature (64 bytes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    inner: ed25519_dalek::Signature,
}

impl Signature {
    pub fn to_bytes(&self) -> [u8; 64] {
        self.inner.to_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let bytes_arr: [u8; 64] = bytes.try_into().map_err(|_| {
            CryptoError::InvalidInput(format!("signature must be 64 bytes, got {}", bytes.len()))
        })?;
        Ok(Self {
            inner: ed25519_dalek::Signature::from_bytes(&bytes_arr),
        })
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(hex_str)
            .map_err(|e| CryptoError::InvalidInput(format!("invalid hex: {}", e)))?;
        Self::from_bytes(&bytes)
    }
}

/// Sign a message using Ed25519.
pub fn sign(message: &[u8], keypair: &KeyPair) -> Signature {
    Signature {
        inner: keypair.signing_key().sign(message),
    }
}

/// Verify an Ed25519 signature.
pub fn verify(message: &[u8], signature: &Signature, pubkey: &PublicKey) -> Result<(), CryptoError> {
    pubkey
        .verifying_key()
        .verify(message, &signature.inner)
        .map_err(|_| CryptoError::SignatureVerificationFailed)
}

/// Bytes covered by a document signature: the document without its
/// `proof`, serialized with mapping keys sorted at every level.
pub fn signing_payload(document: &Value) -> Result<Vec<u8>, CryptoError> {
    let mut unsigned = document.clone();
    if let Value::Object(map) = &mut unsigned {
        map.remove("proof");
    }
    Ok(serde_json::to_vec(&canonical(unsigned))?)
}

fn canonical(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, canonical(v)))
                    .collect::<Map<String, Value>>(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonical).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sign_verify_roundtrip() {
        let kp = KeyPair::generate();
        let sig = sign(b"hello", &kp);
        assert!(verify(b"hello", &sig, &kp.public_key()).is_ok());
        assert!(verify(b"tampered", &sig, &kp.public_key()).is_err());
    }

    #[test]
    fn test_wrong_key() {
        let sig = sign(b"hello", &KeyPair::generate());
        assert!(matches!(
            verify(b"hello", &sig, &KeyPair::generate().public_key()),
            Err(CryptoError::SignatureVerificationFailed)
        ));
    }

    #[test]
    fn test_signature_hex() {
        let sig = sign(b"m", &KeyPair::from_seed(&[1u8; 32]));
        assert_eq!(Signature::from_hex(&sig.to_hex()).unwrap(), sig);
        assert!(Signature::from_hex("abcd").is_err());
    }

    #[test]
    fn test_payload_ignores_proof_and_key_order() {
        let a = json!({"b": 1, "a": {"y": 2, "x": 3}, "proof": {"proofValue": "00"}});
        let b = json!({"a": {"x": 3, "y": 2}, "b": 1});
        assert_eq!(signing_payload(&a).unwrap(), signing_payload(&b).unwrap());
        assert_eq!(signing_payload(&b).unwrap(), br#"{"a":{"x":3,"y":2},"b":1}"#.to_vec());
    }
}
