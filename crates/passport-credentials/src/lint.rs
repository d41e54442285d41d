//! Schema-driven linting of credential subjects.
//!
//! Linting never fails: an unknown type, a missing `@type` or a missing
//! required field are all reported as issues. An empty issue list means the
//! subject is valid.

use std::fmt;

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use passport_core::{is_empty, path, Path};

use crate::envelope::credential_subject;
use crate::schema::{SchemaLookup, SchemaRegistry};

/// Issue severity, ordered from least to most severe. Serialized as its
/// numeric level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn level(self) -> u8 {
        match self {
            Severity::Info => 10,
            Severity::Warning => 20,
            Severity::Error => 30,
        }
    }

    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            10 => Some(Severity::Info),
            20 => Some(Severity::Warning),
            30 => Some(Severity::Error),
            _ => None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.level())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let level = u8::deserialize(deserializer)?;
        Severity::from_level(level)
            .ok_or_else(|| de::Error::custom(format!("unknown severity level {level}")))
    }
}

/// A single lint finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintIssue {
    pub id: String,
    pub issue: String,
    pub level: Severity,
}

/// Outcome of linting one subject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintReport {
    /// The subject's `@type`, if it had one.
    pub data_type: Option<String>,
    pub issues: Vec<LintIssue>,
}

impl LintReport {
    /// True when no issues were found.
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// The most severe issue level, if any.
    pub fn max_severity(&self) -> Option<Severity> {
        self.issues.iter().map(|i| i.level).max()
    }
}

impl Serialize for LintReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.issues.serialize(serializer)
    }
}

/// The `@type` of a subject. A sequence of types yields its first string.
pub fn data_type(subject: &Value) -> Option<&str> {
    match subject.get("@type")? {
        Value::String(s) if !s.is_empty() => Some(s.as_str()),
        Value::Array(items) => items.iter().find_map(|v| v.as_str().filter(|s| !s.is_empty())),
        _ => None,
    }
}

/// Lints subjects against a schema registry.
pub struct Linter<'a> {
    schemas: &'a SchemaRegistry,
}

impl<'a> Linter<'a> {
    pub fn new(schemas: &'a SchemaRegistry) -> Self {
        Self { schemas }
    }

    /// Lint a credential subject.
    pub fn lint(&self, subject: &Value) -> LintReport {
        let Some(data_type) = data_type(subject) else {
            return LintReport {
                data_type: None,
                issues: vec![LintIssue {
                    id: "@type".into(),
                    issue: "@type missing".into(),
                    level: Severity::Error,
                }],
            };
        };

        let schema = match self.schemas.by_data_type(data_type) {
            SchemaLookup::Found(schema) => schema,
            SchemaLookup::Missing => {
                tracing::debug!(data_type, "no schema for data type");
                return LintReport {
                    data_type: Some(data_type.to_string()),
                    issues: vec![LintIssue {
                        id: "@type".into(),
                        issue: format!("{data_type} unknown"),
                        level: Severity::Error,
                    }],
                };
            }
        };

        let issues = schema
            .required_fields()
            .into_iter()
            .filter(|field| is_missing(subject, field))
            .map(|field| LintIssue {
                issue: format!("{field} missing/required"),
                id: field.to_string(),
                level: Severity::Warning,
            })
            .collect();

        LintReport {
            data_type: Some(data_type.to_string()),
            issues,
        }
    }

    /// Lint the subject of a full credential document.
    pub fn lint_document(&self, document: &Value) -> LintReport {
        self.lint(credential_subject(document).unwrap_or(&Value::Null))
    }
}

fn is_missing(subject: &Value, field: &Path) -> bool {
    path::get(subject, field).map_or(true, is_empty)
}
