use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use passport_core::Path;

/// How a single output field gets its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Leave the field out of the output entirely. Wins over any skeleton
    /// value at the same location.
    Omit,
    /// Copy the first non-empty value among these context paths. Omitted
    /// from the output when every candidate is empty.
    Path(Vec<Path>),
    /// Substitute a previously resolved named result.
    Result(String),
}

impl Directive {
    /// Single-candidate path directive.
    pub fn path(path: &str) -> Self {
        Directive::Path(vec![Path::parse(path)])
    }

    /// Ordered candidate path directive.
    pub fn first_of(paths: &[&str]) -> Self {
        Directive::Path(Path::candidates(paths))
    }

    pub fn result(name: &str) -> Self {
        Directive::Result(name.to_string())
    }

    fn from_value(value: Value) -> Result<Self, String> {
        match value {
            Value::Null => Ok(Directive::Omit),
            Value::String(path) => Ok(Directive::path(&path)),
            Value::Array(items) => {
                if items.is_empty() {
                    return Err("candidate path list must not be empty".into());
                }
                items
                    .into_iter()
                    .map(|item| match item {
                        Value::String(path) => Ok(Path::parse(&path)),
                        other => Err(format!("candidate path must be a string, got {other}")),
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(Directive::Path)
            }
            Value::Object(mut map) => match (map.remove("result"), map.is_empty()) {
                (Some(Value::String(name)), true) => Ok(Directive::Result(name)),
                _ => Err("object directive must be exactly {\"result\": <name>}".into()),
            },
            other => Err(format!("unsupported directive: {other}")),
        }
    }

    fn to_value(&self) -> Value {
        match self {
            Directive::Omit => Value::Null,
            Directive::Path(paths) if paths.len() == 1 => Value::String(paths[0].to_string()),
            Directive::Path(paths) => {
                Value::Array(paths.iter().map(|p| Value::String(p.to_string())).collect())
            }
            Directive::Result(name) => {
                let mut map = Map::new();
                map.insert("result".into(), Value::String(name.clone()));
                Value::Object(map)
            }
        }
    }
}

impl Serialize for Directive {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Directive {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Directive::from_value(value).map_err(de::Error::custom)
    }
}

/// Output field name → directive, in declaration order.
///
/// Output names are paths, so `schema:address/schema:addressCountry` sets a
/// nested field. Declaring the same output twice replaces the earlier
/// directive in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldDirectives {
    entries: Vec<(Path, Directive)>,
}

impl FieldDirectives {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, output: &str, directive: Directive) {
        let output = Path::parse(output);
        match self.entries.iter_mut().find(|(existing, _)| *existing == output) {
            Some(entry) => entry.1 = directive,
            None => self.entries.push((output, directive)),
        }
    }

    /// Bind `output` to a context path.
    pub fn path(mut self, output: &str, source: &str) -> Self {
        self.insert(output, Directive::path(source));
        self
    }

    /// Bind `output` to the first non-empty of several context paths.
    pub fn first_of(mut self, output: &str, sources: &[&str]) -> Self {
        self.insert(output, Directive::first_of(sources));
        self
    }

    /// Bind `output` to a named result.
    pub fn result(mut self, output: &str, name: &str) -> Self {
        self.insert(output, Directive::result(name));
        self
    }

    /// Omit `output`.
    pub fn omit(mut self, output: &str) -> Self {
        self.insert(output, Directive::Omit);
        self
    }

    /// These directives with `overrides` applied on top.
    pub fn overlay(&self, overrides: &FieldDirectives) -> FieldDirectives {
        let mut merged = self.clone();
        for (output, directive) in &overrides.entries {
            match merged.entries.iter_mut().find(|(existing, _)| existing == output) {
                Some(entry) => entry.1 = directive.clone(),
                None => merged.entries.push((output.clone(), directive.clone())),
            }
        }
        merged
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Path, &Directive)> {
        self.entries.iter().map(|(p, d)| (p, d))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for FieldDirectives {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (output, directive) in &self.entries {
            map.serialize_entry(&output.to_string(), directive)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FieldDirectives {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct DirectivesVisitor;

        impl<'de> Visitor<'de> for DirectivesVisitor {
            type Value = FieldDirectives;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a mapping of output field to directive")
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(FieldDirectives::default())
            }

            // Walk entries in document order; a `Map` would sort them.
            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut directives = FieldDirectives::default();
                while let Some((output, directive)) = access.next_entry::<String, Directive>()? {
                    directives.insert(&output, directive);
                }
                Ok(directives)
            }
        }

        deserializer.deserialize_any(DirectivesVisitor)
    }
}

/// A template as written in a definition file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TemplateDefinition {
    /// Skeleton record the output starts from.
    #[serde(default)]
    pub fields: Value,
    /// Default directives declared by the template itself.
    #[serde(default)]
    pub bindings: FieldDirectives,
}

/// A registered, immutable template.
#[derive(Debug, Clone)]
pub struct Template {
    name: String,
    fields: Value,
    bindings: FieldDirectives,
}

impl Template {
    /// Build a template from its definition. The skeleton must be a mapping
    /// (or absent).
    pub fn new(name: &str, definition: TemplateDefinition) -> Result<Self, String> {
        let fields = match definition.fields {
            Value::Null => Value::Object(Map::new()),
            Value::Object(map) => Value::Object(map),
            other => return Err(format!("fields must be a mapping, got {other}")),
        };
        Ok(Self {
            name: name.to_string(),
            fields,
            bindings: definition.bindings,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The skeleton record.
    pub fn fields(&self) -> &Value {
        &self.fields
    }

    pub fn bindings(&self) -> &FieldDirectives {
        &self.bindings
    }
}
