/// Credential layer errors.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("unreadable document {reference}: {reason}")]
    UnreadableDocument { reference: String, reason: String },

    #[error("unsupported reference: {0}")]
    UnsupportedReference(String),

    #[error("fetch failed for {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("proof has no verification method")]
    MissingVerificationMethod,

    #[error("verification failed: {0}")]
    VerificationFailure(String),

    #[error("signing failed: {0}")]
    SigningFailed(String),

    #[error("invalid schema {name}: {reason}")]
    InvalidSchema { name: String, reason: String },

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CredentialError {
    fn from(e: serde_json::Error) -> Self {
        CredentialError::Serialization(e.to_string())
    }
}
