//! Fixtures shared by the integration tests: the sample template, schema
//! and recipe definitions shipped under `data/`.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde_json::Value;

use passport_credentials::{parse_document_stream, SchemaDefinition, SchemaRegistry};
use passport_templates::{Recipe, TemplateDefinition, TemplateRegistry};

/// The workspace `data/` directory.
pub fn data_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../data")
}

fn read(relative: &str) -> String {
    let path = data_dir().join(relative);
    std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("reading {}: {e}", path.display()))
}

fn definitions<D: DeserializeOwned>(relative: &str) -> Vec<(String, D)> {
    let parsed: BTreeMap<String, D> =
        serde_yaml::from_str(&read(relative)).unwrap_or_else(|e| panic!("parsing {relative}: {e}"));
    parsed.into_iter().collect()
}

pub fn templates() -> TemplateRegistry {
    TemplateRegistry::from_definitions(definitions::<TemplateDefinition>("templates/health.yaml"))
        .expect("sample templates load")
}

pub fn schemas() -> SchemaRegistry {
    SchemaRegistry::from_definitions(definitions::<SchemaDefinition>("schemas/health.yaml"))
        .expect("sample schemas load")
}

pub fn vaccination_recipe() -> Recipe {
    serde_yaml::from_str(&read("recipes/vaccination.yaml")).expect("sample recipe parses")
}

pub fn sample_records() -> Vec<Value> {
    parse_document_stream("records/sample.yaml", &read("records/sample.yaml")).expect("sample records parse")
}
