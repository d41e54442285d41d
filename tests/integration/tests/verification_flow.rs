//! Integration test: issue a signed credential from an assembled record,
//! verify it against a published verification method, and lint its claim.

use std::sync::Arc;

use passport_core::run_batch;
use passport_credentials::{
    CredentialError, CredentialIssuer, CredentialVerifier, FetchingMethodResolver, Linter, MemoryFetcher,
    SchemaDefinition, SchemaRegistry, Severity, VerifyOptions,
};
use passport_crypto::{verification_method_document, Ed25519Suite, KeyPair, MethodInfo};
use passport_integration_tests::{sample_records, schemas, templates, vaccination_recipe};
use passport_templates::Context;
use serde_json::{json, Value};

const METHOD: &str = "https://keys.example/health#key-1";
const CONTROLLER: &str = "https://keys.example/health";

fn keypair() -> KeyPair {
    KeyPair::from_seed(&[7u8; 32])
}

/// A fetcher publishing the verification method of `keypair`.
fn published(keypair: &KeyPair) -> Arc<MemoryFetcher> {
    let info = MethodInfo {
        id: METHOD.into(),
        controller: Some(CONTROLLER.into()),
        organization: Some("Toronto General Hospital".into()),
    };
    let fetcher = MemoryFetcher::new()
        .with_document(METHOD, verification_method_document(&keypair.public_key(), &info));
    Arc::new(fetcher)
}

fn issuer(keypair: KeyPair) -> CredentialIssuer {
    CredentialIssuer::new(Arc::new(Ed25519Suite::signer(keypair, METHOD))).with_issuer(CONTROLLER)
}

fn verifier(fetcher: Arc<MemoryFetcher>) -> CredentialVerifier {
    CredentialVerifier::new(
        Arc::new(Ed25519Suite::verifier()),
        Arc::new(FetchingMethodResolver::new(fetcher)),
    )
}

fn assembled(index: usize) -> Value {
    let record = sample_records().remove(index);
    let did = format!("did:example:{}", record["code"].as_str().unwrap());
    let context = Context::new().with_value("did", json!(did)).with_value("record", record);
    vaccination_recipe().assemble(&templates(), context).unwrap()
}

#[tokio::test]
async fn test_issue_verify_lint() {
    let keypair = keypair();
    let fetcher = published(&keypair);

    let credential = issuer(keypair).issue(assembled(0)).await.unwrap();
    assert_eq!(credential["issuer"], json!(CONTROLLER));
    assert_eq!(credential["credentialSubject"]["vc:id"], json!("did:example:A12-7734"));
    assert_eq!(credential["proof"]["verificationMethod"], json!(METHOD));

    let result = verifier(fetcher)
        .verify(credential, &VerifyOptions::default())
        .await
        .unwrap();
    assert!(result.valid);
    assert_eq!(result.issuer(), Some("Toronto General Hospital"));
    assert_eq!(result.chain.first().map(|l| l.id.as_str()), Some(CONTROLLER));

    let registry = schemas();
    let report = Linter::new(&registry).lint(&result.subject);
    assert!(report.is_valid(), "unexpected issues: {:?}", report.issues);
    assert_eq!(report.data_type.as_deref(), Some("schema:ImmunizationRecord"));
}

#[tokio::test]
async fn test_tampered_credential_is_invalid() {
    let keypair = keypair();
    let fetcher = published(&keypair);

    let mut credential = issuer(keypair).issue(assembled(0)).await.unwrap();
    credential["credentialSubject"]["schema:doseSequence"] = json!(3);

    let result = verifier(fetcher)
        .verify(credential, &VerifyOptions::default())
        .await
        .unwrap();
    assert!(!result.valid);
    assert_eq!(result.subject["schema:doseSequence"], json!(3));
}

#[tokio::test]
async fn test_other_key_is_invalid() {
    let fetcher = published(&keypair());
    let credential = issuer(KeyPair::from_seed(&[9u8; 32]))
        .issue(assembled(1))
        .await
        .unwrap();

    let result = verifier(fetcher)
        .verify(credential, &VerifyOptions::default())
        .await
        .unwrap();
    assert!(!result.valid);
}

#[tokio::test]
async fn test_unpublished_method_fails() {
    let credential = issuer(keypair()).issue(assembled(0)).await.unwrap();
    let err = verifier(Arc::new(MemoryFetcher::new()))
        .verify(credential, &VerifyOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, CredentialError::Fetch { .. }));
}

#[tokio::test]
async fn test_unsigned_claim_still_lints() {
    let mut claim = assembled(1);
    claim.as_object_mut().unwrap().remove("schema:lotNumber");

    let result = verifier(published(&keypair()))
        .verify(claim, &VerifyOptions { wrap_as_claim: true })
        .await
        .unwrap();
    assert!(!result.valid);
    assert!(result.chain.is_empty());

    let registry = schemas();
    let report = Linter::new(&registry).lint(&result.subject);
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].id, "schema:lotNumber");
    assert_eq!(report.issues[0].level, Severity::Warning);
}

#[tokio::test]
async fn test_batch_sign_reports_failures() {
    let issuer = issuer(keypair());
    let documents = vec![assembled(0), json!("not a record"), assembled(1)];

    let issuer = &issuer;
    let report = run_batch(documents, 2, |_, document| issuer.sign(document)).await;
    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failed(), 1);
    assert!(report.outcomes()[1].result.is_err());
    assert_eq!(
        report.outcomes()[2].result.as_ref().unwrap()["vc:id"],
        json!("did:example:B03-1190")
    );
}

#[test]
fn test_unknown_type_and_missing_field() {
    let registry = schemas();
    let linter = Linter::new(&registry);

    let report = linter.lint(&json!({"@type": "schema:Unknown"}));
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].id, "@type");
    assert_eq!(report.issues[0].issue, "schema:Unknown unknown");
    assert_eq!(report.issues[0].level, Severity::Error);

    let report = linter.lint(&json!({"@type": "schema:HealthCard", "schema:issuedBy": "Ontario"}));
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].issue, "schema:identifier missing/required");
}

#[test]
fn test_later_schema_load_wins() {
    let first: SchemaDefinition =
        serde_yaml::from_str("groups:\n  - name: A\n    nodes:\n      - { id: schema:a, name: A, required: true }\n")
            .unwrap();
    let second: SchemaDefinition =
        serde_yaml::from_str("groups:\n  - name: B\n    nodes:\n      - { id: schema:b, name: B, required: true }\n")
            .unwrap();

    let registry = SchemaRegistry::new();
    registry.load(vec![("schema:Thing".to_string(), first)]).unwrap();
    registry.load(vec![("schema:Thing".to_string(), second)]).unwrap();

    let report = Linter::new(&registry).lint(&json!({"@type": "schema:Thing"}));
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].id, "schema:b");
}
