use std::collections::{HashMap, HashSet};

use crate::error::TemplateError;
use crate::template::{Template, TemplateDefinition};

/// Registry of named templates.
///
/// Loaded once at startup and then only read; share it by reference (or
/// behind an `Arc`) across concurrent record pipelines.
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    templates: HashMap<String, Template>,
}

impl TemplateRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a single set of definitions.
    pub fn from_definitions<I>(definitions: I) -> Result<Self, TemplateError>
    where
        I: IntoIterator<Item = (String, TemplateDefinition)>,
    {
        let mut registry = Self::new();
        registry.load(definitions)?;
        Ok(registry)
    }

    /// Register a set of definitions.
    ///
    /// A name appearing twice in one call is rejected and nothing from the
    /// call is registered. Names from an earlier call are replaced.
    pub fn load<I>(&mut self, definitions: I) -> Result<usize, TemplateError>
    where
        I: IntoIterator<Item = (String, TemplateDefinition)>,
    {
        let mut seen = HashSet::new();
        let mut staged = Vec::new();

        for (name, definition) in definitions {
            if !seen.insert(name.clone()) {
                return Err(TemplateError::DuplicateTemplate(name));
            }
            let template = Template::new(&name, definition).map_err(|reason| {
                TemplateError::InvalidDefinition {
                    name: name.clone(),
                    reason,
                }
            })?;
            staged.push(template);
        }

        let count = staged.len();
        for template in staged {
            if self.templates.contains_key(template.name()) {
                tracing::debug!(template = template.name(), "template replaced");
            }
            self.templates.insert(template.name().to_string(), template);
        }

        tracing::debug!(loaded = count, total = self.templates.len(), "templates loaded");
        Ok(count)
    }

    /// Get a template by name.
    pub fn by_name(&self, name: &str) -> Result<&Template, TemplateError> {
        self.templates
            .get(name)
            .ok_or_else(|| TemplateError::UnknownTemplate(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// All template names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.templates.keys().cloned().collect();
        names.sort();
        names
    }

    /// Number of registered templates.
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn def(type_name: &str) -> TemplateDefinition {
        TemplateDefinition {
            fields: json!({ "@type": type_name }),
            ..Default::default()
        }
    }

    #[test]
    fn test_load_and_lookup() {
        let registry = TemplateRegistry::from_definitions(vec![
            ("Patient".to_string(), def("schema:Patient")),
            ("Hospital".to_string(), def("schema:Hospital")),
        ])
        .unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["Hospital", "Patient"]);
        let patient = registry.by_name("Patient").unwrap();
        assert_eq!(patient.fields()["@type"], json!("schema:Patient"));
    }

    #[test]
    fn test_unknown_template() {
        let registry = TemplateRegistry::new();
        assert!(matches!(
            registry.by_name("Nope"),
            Err(TemplateError::UnknownTemplate(name)) if name == "Nope"
        ));
    }

    #[test]
    fn test_duplicate_in_one_load_rejected() {
        let mut registry = TemplateRegistry::new();
        let result = registry.load(vec![
            ("Drug".to_string(), def("a")),
            ("Other".to_string(), def("b")),
            ("Drug".to_string(), def("c")),
        ]);
        assert!(matches!(result, Err(TemplateError::DuplicateTemplate(name)) if name == "Drug"));
        // Nothing from the failed call is registered
        assert!(registry.is_empty());
    }

    #[test]
    fn test_later_load_replaces() {
        let mut registry = TemplateRegistry::new();
        registry.load(vec![("Drug".to_string(), def("first"))]).unwrap();
        registry.load(vec![("Drug".to_string(), def("second"))]).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.by_name("Drug").unwrap().fields()["@type"], json!("second"));
    }

    #[test]
    fn test_invalid_definition() {
        let mut registry = TemplateRegistry::new();
        let bad = TemplateDefinition {
            fields: json!("scalar"),
            ..Default::default()
        };
        let result = registry.load(vec![("Bad".to_string(), bad)]);
        assert!(matches!(result, Err(TemplateError::InvalidDefinition { .. })));
    }
}
