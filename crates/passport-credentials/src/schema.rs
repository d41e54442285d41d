use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use passport_core::{is_empty, path, Path};

use crate::error::CredentialError;

fn default_show() -> bool {
    true
}

/// One field of a credential subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Location of the field inside the subject.
    pub id: Path,
    /// Display label.
    pub name: String,
    #[serde(default = "default_show")]
    pub show: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
}

impl Node {
    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }
}

/// A display group of nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    #[serde(default = "default_show")]
    pub show: bool,
    #[serde(default)]
    pub nodes: Vec<Node>,
}

/// A schema as written in a definition file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaDefinition {
    #[serde(default)]
    pub groups: Vec<Group>,
}

/// The expected shape of a credential subject with a given `@type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    data_type: String,
    groups: Vec<Group>,
}

/// A visible row of a projected subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayRow {
    pub label: String,
    pub value: String,
}

/// A visible group of a projected subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayGroup {
    pub name: String,
    pub rows: Vec<DisplayRow>,
}

impl Schema {
    pub fn new(data_type: &str, definition: SchemaDefinition) -> Result<Self, CredentialError> {
        for group in &definition.groups {
            if let Some(node) = group.nodes.iter().find(|n| n.id.is_root()) {
                return Err(CredentialError::InvalidSchema {
                    name: data_type.to_string(),
                    reason: format!("node {:?} in group {:?} has an empty id", node.name, group.name),
                });
            }
        }
        Ok(Self {
            data_type: data_type.to_string(),
            groups: definition.groups,
        })
    }

    pub fn data_type(&self) -> &str {
        &self.data_type
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Paths of every required node across all groups, in declaration
    /// order, without duplicates. Hidden groups and nodes are included.
    pub fn required_fields(&self) -> Vec<Path> {
        let mut seen = HashSet::new();
        self.groups
            .iter()
            .flat_map(|group| group.nodes.iter())
            .filter(|node| node.is_required())
            .filter(|node| seen.insert(node.id.clone()))
            .map(|node| node.id.clone())
            .collect()
    }

    /// The visible, non-empty fields of `subject`, grouped for display.
    /// Groups left without rows are dropped.
    pub fn project(&self, subject: &Value) -> Vec<DisplayGroup> {
        self.groups
            .iter()
            .filter(|group| group.show)
            .filter_map(|group| {
                let rows: Vec<DisplayRow> = group
                    .nodes
                    .iter()
                    .filter(|node| node.show)
                    .filter_map(|node| {
                        let value = path::get(subject, &node.id).filter(|v| !is_empty(v))?;
                        Some(DisplayRow {
                            label: node.name.clone(),
                            value: display_value(value),
                        })
                    })
                    .collect();
                if rows.is_empty() {
                    None
                } else {
                    Some(DisplayGroup {
                        name: group.name.clone(),
                        rows,
                    })
                }
            })
            .collect()
    }
}

fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Outcome of a schema lookup. An unknown type is ordinary input, so it
/// is reported as a value rather than an error.
#[derive(Debug, Clone)]
pub enum SchemaLookup {
    Found(Arc<Schema>),
    Missing,
}

impl SchemaLookup {
    pub fn found(self) -> Option<Arc<Schema>> {
        match self {
            SchemaLookup::Found(schema) => Some(schema),
            SchemaLookup::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, SchemaLookup::Missing)
    }
}

/// Registry of schemas keyed by data type.
///
/// Registering a data type that is already present replaces the earlier
/// schema, whether within one `load` call or across calls.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: DashMap<String, Arc<Schema>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_definitions<I>(definitions: I) -> Result<Self, CredentialError>
    where
        I: IntoIterator<Item = (String, SchemaDefinition)>,
    {
        let registry = Self::new();
        registry.load(definitions)?;
        Ok(registry)
    }

    /// Register a set of definitions. An invalid definition rejects the
    /// whole call.
    pub fn load<I>(&self, definitions: I) -> Result<usize, CredentialError>
    where
        I: IntoIterator<Item = (String, SchemaDefinition)>,
    {
        let staged = definitions
            .into_iter()
            .map(|(data_type, definition)| Schema::new(&data_type, definition))
            .collect::<Result<Vec<_>, _>>()?;

        let count = staged.len();
        for schema in staged {
            let data_type = schema.data_type().to_string();
            if self.schemas.insert(data_type.clone(), Arc::new(schema)).is_some() {
                tracing::warn!(data_type = %data_type, "schema replaced by later definition");
            }
        }

        tracing::debug!(loaded = count, total = self.schemas.len(), "schemas loaded");
        Ok(count)
    }

    /// Look up the schema for `data_type`.
    pub fn by_data_type(&self, data_type: &str) -> SchemaLookup {
        match self.schemas.get(data_type) {
            Some(entry) => SchemaLookup::Found(Arc::clone(entry.value())),
            None => SchemaLookup::Missing,
        }
    }

    /// All registered data types, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.schemas.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
