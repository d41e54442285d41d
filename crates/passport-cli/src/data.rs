//! Loading template, schema and recipe definitions from disk.
//!
//! A definition directory holds YAML or JSON files, each a mapping from
//! name to definition. Files are read in name order.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::de::DeserializeOwned;

use passport_credentials::{SchemaDefinition, SchemaRegistry};
use passport_templates::{Recipe, TemplateDefinition, TemplateRegistry};

fn definition_files(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let path = entry?.path();
        let is_definition = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml" | "yml" | "json")
        );
        if path.is_file() && is_definition {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn read_definitions<D: DeserializeOwned>(dir: &Path) -> anyhow::Result<Vec<(String, D)>> {
    let mut definitions = Vec::new();
    for file in definition_files(dir)? {
        let text = std::fs::read_to_string(&file).with_context(|| format!("reading {}", file.display()))?;
        let parsed: BTreeMap<String, D> =
            serde_yaml::from_str(&text).with_context(|| format!("parsing {}", file.display()))?;
        tracing::debug!(file = %file.display(), definitions = parsed.len(), "definition file read");
        definitions.extend(parsed);
    }
    Ok(definitions)
}

pub fn load_templates(dir: &Path) -> anyhow::Result<TemplateRegistry> {
    let registry = TemplateRegistry::from_definitions(read_definitions::<TemplateDefinition>(dir)?)?;
    tracing::info!(templates = registry.len(), dir = %dir.display(), "templates loaded");
    Ok(registry)
}

pub fn load_schemas(dir: &Path) -> anyhow::Result<SchemaRegistry> {
    let registry = SchemaRegistry::from_definitions(read_definitions::<SchemaDefinition>(dir)?)?;
    tracing::info!(schemas = registry.len(), dir = %dir.display(), "schemas loaded");
    Ok(registry)
}

pub fn load_recipe(path: &Path) -> anyhow::Result<Recipe> {
    let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_yaml::from_str(&text).with_context(|| format!("parsing recipe {}", path.display()))
}
