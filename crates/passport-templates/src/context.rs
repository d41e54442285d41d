use std::collections::BTreeSet;

use serde_json::{Map, Value};

/// The working scope a template is filled against.
///
/// Plain values (the input record, identifiers, dates) and named results
/// share one scope, so a path directive like `HealthCard/schema:identifier`
/// can reach into an earlier result. The context is built explicitly by the
/// caller; filling never mutates it.
#[derive(Debug, Clone)]
pub struct Context {
    scope: Value,
    results: BTreeSet<String>,
}

impl Default for Context {
    fn default() -> Self {
        Self {
            scope: Value::Object(Map::new()),
            results: BTreeSet::new(),
        }
    }
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a plain value under `name`.
    pub fn with_value(mut self, name: &str, value: Value) -> Self {
        self.insert(name, value);
        self
    }

    /// Add a plain value under `name`, replacing anything already there.
    pub fn insert(&mut self, name: &str, value: Value) {
        self.results.remove(name);
        self.put(name, value);
    }

    /// Store a resolved template result under `name`.
    pub fn add_result(&mut self, name: &str, result: Value) {
        self.put(name, result);
        self.results.insert(name.to_string());
    }

    pub fn with_result(mut self, name: &str, result: Value) -> Self {
        self.add_result(name, result);
        self
    }

    /// A previously stored result.
    pub fn result(&self, name: &str) -> Option<&Value> {
        if self.results.contains(name) {
            self.scope.get(name)
        } else {
            None
        }
    }

    pub fn has_result(&self, name: &str) -> bool {
        self.results.contains(name)
    }

    /// Names of all stored results.
    pub fn result_names(&self) -> impl Iterator<Item = &str> {
        self.results.iter().map(String::as_str)
    }

    /// The whole scope as a record, for path lookups.
    pub fn scope(&self) -> &Value {
        &self.scope
    }

    pub(crate) fn scope_mut(&mut self) -> &mut Value {
        &mut self.scope
    }

    fn put(&mut self, name: &str, value: Value) {
        if !self.scope.is_object() {
            self.scope = Value::Object(Map::new());
        }
        if let Some(map) = self.scope.as_object_mut() {
            map.insert(name.to_string(), value);
        }
    }
}
