//! Passport Crypto — Ed25519 keys and the credential proof suite.

pub mod error;
pub mod keys;
pub mod signing;
pub mod suite;

pub use error::CryptoError;
pub use keys::{verification_method_document, KeyFile, KeyPair, MethodInfo, PublicKey};
pub use signing::{sign, signing_payload, verify, Signature};
pub use suite::Ed25519Suite;
