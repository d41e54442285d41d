//! Integration test: assembling vaccination records from the sample
//! templates, recipe and input records.

use passport_integration_tests::{sample_records, templates, vaccination_recipe};
use passport_templates::{fill, Context, FieldDirectives, TemplateError};
use serde_json::{json, Value};

fn context(record: Value) -> Context {
    let did = format!("did:example:{}", record["code"].as_str().unwrap());
    Context::new()
        .with_value("did", json!(did))
        .with_value("record", record)
}

#[test]
fn test_sample_recipe_checks() {
    vaccination_recipe()
        .check(&templates())
        .expect("sample recipe references only earlier results");
}

#[test]
fn test_assemble_first_record() {
    let record = sample_records().remove(0);
    let out = vaccination_recipe()
        .assemble(&templates(), context(record))
        .unwrap();

    assert_eq!(out["@type"], json!("schema:ImmunizationRecord"));
    assert_eq!(out["vc:id"], json!("did:example:A12-7734"));
    assert_eq!(out["schema:immunizationDate"], json!("2021-01-01"));
    assert_eq!(out["schema:doseSequence"], json!(2));
    assert_eq!(out["schema:lotNumber"], json!("123-456-789"));

    // Null directives remove skeleton and binding values alike
    assert!(out.get("schema:name").is_none());
    assert!(out.get("schema:identifier").is_none());

    let patient = &out["schema:patient"];
    assert_eq!(
        patient,
        &json!({
            "@type": "schema:Patient",
            "schema:birthDate": "••••-••-19",
            "schema:familyName": "Lee",
            "schema:givenName": "Jordan",
            "schema:healthCard": {
                "@type": "schema:HealthCard",
                "schema:identifier": "••••-•••-674",
                "schema:issuedBy": "Ontario",
                "schema:validUntil": "2025-06-30",
            },
        })
    );
    assert!(patient.get("schema:additionalName").is_none());

    assert_eq!(
        out["schema:location"]["schema:address"],
        json!({
            "schema:addressCountry": "CA",
            "schema:addressRegion": "ON",
            "schema:addressLocality": "Toronto",
        })
    );
}

#[test]
fn test_rebound_result_is_used() {
    let record = sample_records().remove(0);
    let out = vaccination_recipe()
        .assemble(&templates(), context(record))
        .unwrap();

    // MedicalCondition is rebound to the recommendation wrapping it
    let prevention = &out["schema:primaryPrevention"];
    assert_eq!(prevention["@type"], json!("schema:ImmunizationRecommendation"));
    assert_eq!(prevention["schema:drug"]["schema:name"], json!("mRNA-1273"));
    assert_eq!(prevention["schema:healthCondition"]["schema:name"], json!("COVID-19"));
}

#[test]
fn test_missing_input_fields_are_omitted() {
    let record = sample_records().remove(1);
    let out = vaccination_recipe()
        .assemble(&templates(), context(record))
        .unwrap();

    let card = &out["schema:patient"]["schema:healthCard"];
    assert!(card.get("schema:validUntil").is_none());
    assert_eq!(card["schema:identifier"], json!("••••-•••-304"));
    assert_eq!(out["schema:doseSequence"], json!(1));
}

#[test]
fn test_assembly_is_deterministic() {
    let registry = templates();
    let recipe = vaccination_recipe();
    for record in sample_records() {
        let first = recipe.assemble(&registry, context(record.clone())).unwrap();
        let second = recipe.assemble(&registry, context(record)).unwrap();
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}

#[test]
fn test_patient_template_scenario() {
    let registry = templates();
    let patient = registry.by_name("Patient").unwrap();
    let ctx = Context::new().with_value("record", json!({"familyName": "Lee", "additionalName": "Sam"}));

    let out = fill(patient, &FieldDirectives::new().omit("schema:additionalName"), &ctx).unwrap();
    assert_eq!(out, json!({"@type": "schema:Patient", "schema:familyName": "Lee"}));
}

#[test]
fn test_unknown_template_in_chain() {
    let mut recipe = vaccination_recipe();
    recipe.steps[0].template = "Clinic".into();
    let record = sample_records().remove(0);
    assert!(matches!(
        recipe.assemble(&templates(), context(record)),
        Err(TemplateError::UnknownTemplate(name)) if name == "Clinic"
    ));
}
