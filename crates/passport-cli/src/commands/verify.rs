//! `passport verify` — Verify credentials and show their fields.

use clap::Args;
use std::fmt::Write as _;

use passport_core::{run_batch, BatchReport, PassportConfig};
use passport_credentials::lint::data_type;
use passport_credentials::{document_id, SchemaRegistry, VerificationResult, VerifyOptions};

use super::{credential_verifier, document_loader, finish};
use crate::data;

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Input document (file, URL, or - for stdin).
    #[arg(long = "in", default_value = "-")]
    pub input: String,

    /// The document is the claim, not the whole credential.
    #[arg(long)]
    pub claim: bool,
}

/// Verify every document at `input`.
pub(crate) async fn verify_all(
    input: &str,
    claim: bool,
    config: &PassportConfig,
) -> anyhow::Result<BatchReport<VerificationResult>> {
    let documents = document_loader(config)?.load(input).await?;
    let verifier = credential_verifier(config)?;
    let options = VerifyOptions { wrap_as_claim: claim };

    let (verifier, options) = (&verifier, &options);
    Ok(run_batch(documents, config.concurrency(), |_, document| verifier.verify(document, options)).await)
}

/// Human-readable view of a verified credential.
pub(crate) fn render(result: &VerificationResult, schemas: &SchemaRegistry) -> String {
    let mut out = String::new();
    if let Some(id) = document_id(&result.document) {
        let _ = writeln!(out, "# {id}");
    }
    let _ = writeln!(out, "{}", if result.valid { "VALID" } else { "INVALID" });

    let schema = data_type(&result.subject).and_then(|t| schemas.by_data_type(t).found());
    if let Some(schema) = schema {
        for group in schema.project(&result.subject) {
            let _ = writeln!(out, "{}", group.name);
            for row in group.rows {
                let _ = writeln!(out, "  {}: {}", row.label, row.value);
            }
        }
    }
    if let Some(issuer) = result.issuer() {
        let _ = writeln!(out, "  Issuer: {issuer}");
    }
    out
}

pub async fn run(args: &VerifyArgs, config: &PassportConfig) -> anyhow::Result<()> {
    let schemas = data::load_schemas(&config.data.schemas_dir)?;
    let report = verify_all(&args.input, args.claim, config).await?;

    for outcome in report.outcomes() {
        if let Ok(result) = &outcome.result {
            print!("{}", render(result, &schemas));
        }
    }
    finish(&report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use passport_credentials::{ChainLink, SchemaDefinition};
    use serde_json::json;

    #[test]
    fn test_render() {
        let def: SchemaDefinition = serde_yaml::from_str(
            "groups:\n  - name: Patient\n    nodes:\n      - { id: schema:familyName, name: Family Name }\n",
        )
        .unwrap();
        let schemas = SchemaRegistry::from_definitions(vec![("schema:Patient".to_string(), def)]).unwrap();
        let subject = json!({"@type": "schema:Patient", "schema:familyName": "Lee"});
        let result = VerificationResult {
            valid: true,
            document: json!({"id": "urn:uuid:1", "credentialSubject": subject.clone()}),
            subject,
            chain: vec![ChainLink {
                id: "https://keys.example/k".into(),
                organization: Some("Example Health".into()),
            }],
        };
        assert_eq!(
            render(&result, &schemas),
            "# urn:uuid:1\nVALID\nPatient\n  Family Name: Lee\n  Issuer: Example Health\n"
        );
    }
}
