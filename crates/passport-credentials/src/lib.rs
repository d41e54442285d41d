//! Passport Credentials — Schema registry, lint engine, document loading
//! and verification.
//!
//! The cryptography itself lives behind the [`ProofSigner`] and
//! [`ProofVerifier`] traits; this crate owns envelope wrapping and the
//! verification-method callback.

pub mod envelope;
pub mod error;
pub mod issuer;
pub mod lint;
pub mod loader;
pub mod schema;
pub mod verifier;

pub use envelope::{credential_subject, document_id, file_stem, wrap_claim, Envelope};
pub use error::CredentialError;
pub use issuer::CredentialIssuer;
pub use lint::{LintIssue, LintReport, Linter, Severity};
pub use loader::{
    parse_document, parse_document_stream, CachingFetcher, DocumentFetcher, DocumentLoader,
    DocumentReference, MemoryFetcher,
};
pub use schema::{DisplayGroup, DisplayRow, Group, Node, Schema, SchemaDefinition, SchemaLookup, SchemaRegistry};
pub use verifier::{
    ChainLink, CredentialVerifier, FetchingMethodResolver, ProofDescriptor, ProofSigner, ProofVerifier,
    VerificationMethodResolver, VerificationResult, VerifiedProof, VerifyOptions,
};
