//! Template invocation chains.
//!
//! A recipe lists template fills in the order they must run. Each step's
//! result is stored in the context under its `as` name, where later steps
//! can reference it. Steps are never reordered: referencing a result before
//! the step that produces it is an error.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use passport_core::denull;

use crate::context::Context;
use crate::error::TemplateError;
use crate::redaction::Redaction;
use crate::registry::TemplateRegistry;
use crate::resolver::fill;
use crate::template::{Directive, FieldDirectives};

/// One template fill within a recipe.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    /// Template name.
    pub template: String,
    /// Directives passed to the fill.
    #[serde(default)]
    pub fields: FieldDirectives,
    /// Name the result is stored under.
    #[serde(rename = "as", alias = "store_as")]
    pub store_as: String,
}

impl Step {
    pub fn new(template: &str, fields: FieldDirectives, store_as: &str) -> Self {
        Self {
            template: template.to_string(),
            fields,
            store_as: store_as.to_string(),
        }
    }
}

/// An ordered chain of template fills producing one output record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Constants added to the context before anything else runs.
    #[serde(default)]
    pub values: Map<String, Value>,
    /// Fields masked in the context before the first step.
    #[serde(default)]
    pub redact: Vec<Redaction>,
    pub steps: Vec<Step>,
    /// Name of the result returned by [`Recipe::assemble`].
    pub output: String,
}

impl Recipe {
    /// Check the recipe against `registry` without running it: every
    /// template exists, every result reference points at an earlier step,
    /// and the output is produced by some step.
    pub fn check(&self, registry: &TemplateRegistry) -> Result<(), TemplateError> {
        let mut produced: HashSet<&str> = HashSet::new();

        for step in &self.steps {
            let template = registry.by_name(&step.template)?;
            let effective = template.bindings().overlay(&step.fields);
            for (_, directive) in effective.iter() {
                if let Directive::Result(name) = directive {
                    if !produced.contains(name.as_str()) {
                        return Err(TemplateError::MissingDependency {
                            template: step.template.clone(),
                            result: name.clone(),
                        });
                    }
                }
            }
            produced.insert(step.store_as.as_str());
        }

        if !produced.contains(self.output.as_str()) {
            return Err(TemplateError::MissingOutput(self.output.clone()));
        }
        Ok(())
    }

    /// Run every step against `context` and return the output record with
    /// null entries stripped.
    pub fn assemble(&self, registry: &TemplateRegistry, context: Context) -> Result<Value, TemplateError> {
        let context = self.run(registry, context)?;
        let output = context
            .result(&self.output)
            .cloned()
            .ok_or_else(|| TemplateError::MissingOutput(self.output.clone()))?;
        Ok(denull(output))
    }

    /// Run every step and return the final context, with every step's
    /// result stored in it.
    pub fn run(&self, registry: &TemplateRegistry, mut context: Context) -> Result<Context, TemplateError> {
        for (name, value) in &self.values {
            context.insert(name, value.clone());
        }
        for redaction in &self.redact {
            redaction.apply(context.scope_mut());
        }

        for step in &self.steps {
            let template = registry.by_name(&step.template)?;
            let result = fill(template, &step.fields, &context)?;
            tracing::trace!(template = %step.template, store_as = %step.store_as, "recipe step done");
            context.add_result(&step.store_as, result);
        }

        Ok(context)
    }
}
