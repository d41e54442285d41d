use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use passport_core::{path, Path};

pub const CREDENTIALS_CONTEXT: &str = "https://www.w3.org/2018/credentials/v1";
pub const SCHEMA_ORG_CONTEXT: &str = "https://schema.org/";

/// Credential types every envelope carries.
pub const CREDENTIAL_TYPES: [&str; 2] = ["VerifiableCredential", "HealthCredential"];

const SUBJECT_PATHS: &[&str] = &["vc:credentialSubject", "credentialSubject"];

const ID_PATHS: &[&str] = &[
    "vc:credentialSubject/id",
    "vc:credentialSubject/vc:id",
    "credentialSubject/id",
    "credentialSubject/vc:id",
    "id",
    "vc:id",
];

/// Builder for a credential envelope around a subject.
#[derive(Debug, Clone)]
pub struct Envelope {
    subject: Value,
    id: String,
    issuer: Option<String>,
    issued_at: Option<DateTime<Utc>>,
}

impl Envelope {
    pub fn new(subject: Value) -> Self {
        Self {
            subject,
            id: format!("urn:uuid:{}", Uuid::now_v7()),
            issuer: None,
            issued_at: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn issued_at(mut self, at: DateTime<Utc>) -> Self {
        self.issued_at = Some(at);
        self
    }

    /// The envelope document.
    pub fn build(self) -> Value {
        let mut document = json!({
            "@context": [CREDENTIALS_CONTEXT, SCHEMA_ORG_CONTEXT],
            "id": self.id,
            "type": CREDENTIAL_TYPES,
        });
        if let Some(issuer) = self.issuer {
            path::set(&mut document, &Path::parse("issuer"), Value::String(issuer));
        }
        if let Some(at) = self.issued_at {
            path::set(
                &mut document,
                &Path::parse("issuanceDate"),
                Value::String(at.to_rfc3339_opts(SecondsFormat::Secs, true)),
            );
        }
        path::set(&mut document, &Path::parse("credentialSubject"), self.subject);
        document
    }
}

/// Wrap a raw claim as the subject of a minimal credential envelope.
pub fn wrap_claim(claim: Value) -> Value {
    Envelope::new(claim).build()
}

/// The credential subject of `document`, under either its prefixed or
/// plain name.
pub fn credential_subject(document: &Value) -> Option<&Value> {
    path::get_first(document, &Path::candidates(SUBJECT_PATHS))
}

/// The identifier of `document`, preferring the subject's id.
pub fn document_id(document: &Value) -> Option<&str> {
    path::get_first(document, &Path::candidates(ID_PATHS)).and_then(Value::as_str)
}

/// File name stem for an identifier: everything after the last `:`.
pub fn file_stem(id: &str) -> &str {
    id.rsplit(':').next().unwrap_or(id)
}
