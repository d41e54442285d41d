pub mod generate;
pub mod init;
pub mod keygen;
pub mod lint;
pub mod sign;
pub mod verify;
pub mod write;

use std::io::Write as _;
use std::path::Path;
use std::sync::Arc;

use serde_json::Value;

use passport_core::{BatchReport, PassportConfig};
use passport_credentials::{CredentialIssuer, CredentialVerifier, DocumentLoader, FetchingMethodResolver};
use passport_crypto::{Ed25519Suite, KeyFile};

use crate::fetch;

/// Loader for `--in` references, fetching URLs over HTTP.
pub(crate) fn document_loader(config: &PassportConfig) -> anyhow::Result<DocumentLoader> {
    Ok(DocumentLoader::new(fetch::fetcher(&config.fetch)?))
}

/// Verifier resolving verification methods over HTTP.
pub(crate) fn credential_verifier(config: &PassportConfig) -> anyhow::Result<CredentialVerifier> {
    let resolver = FetchingMethodResolver::new(fetch::fetcher(&config.fetch)?);
    Ok(CredentialVerifier::new(
        Arc::new(Ed25519Suite::verifier()),
        Arc::new(resolver),
    ))
}

/// Issuer signing with the key at `key`. `verifier` overrides the
/// verification method recorded in the key file.
pub(crate) fn credential_issuer(
    key: &Path,
    verifier: Option<&str>,
    config: &PassportConfig,
) -> anyhow::Result<CredentialIssuer> {
    let key_file = KeyFile::load(key)?;
    let method = verifier
        .or(config.signing.verifier.as_deref())
        .unwrap_or(key_file.verification_method.as_str())
        .to_string();
    let suite = Ed25519Suite::signer(key_file.keypair()?, &method);
    let issuer = CredentialIssuer::new(Arc::new(suite));
    Ok(match &config.signing.issuer {
        Some(url) => issuer.with_issuer(url.clone()),
        None => issuer,
    })
}

/// Print documents to stdout as a `---` separated stream, one JSON
/// document per entry.
pub(crate) fn emit_stream<'a, I>(documents: I) -> anyhow::Result<()>
where
    I: IntoIterator<Item = &'a Value>,
{
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for document in documents {
        writeln!(out, "---")?;
        writeln!(out, "{}", serde_json::to_string(document)?)?;
    }
    out.flush()?;
    Ok(())
}

/// Successful outputs of `report`, in input order.
pub(crate) fn successes<T>(report: &BatchReport<T>) -> impl Iterator<Item = &T> {
    report.outcomes().iter().filter_map(|o| o.result.as_ref().ok())
}

/// Fail the command when any batch item failed.
pub(crate) fn finish<T>(report: &BatchReport<T>) -> anyhow::Result<()> {
    let summary = report.summary();
    if summary.failed > 0 {
        for outcome in report.outcomes() {
            if let Err(error) = &outcome.result {
                eprintln!("# document {}: {}", outcome.index, error);
            }
        }
        anyhow::bail!("{summary}");
    }
    Ok(())
}
