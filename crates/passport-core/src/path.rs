//! Slash-delimited paths into nested records.
//!
//! A path either resolves at its full depth or it is missing; there are no
//! partial matches. Numeric segments index into sequences, and act as plain
//! keys on mappings.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::record::is_blank;

/// A location inside a record, e.g. `record/card/identifier`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    /// Parse a slash-delimited path. Empty segments are ignored, so `""`
    /// and `"/"` both yield the root path.
    pub fn parse(path: &str) -> Self {
        let segments = path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();
        Self { segments }
    }

    /// The root path, addressing the record itself.
    pub fn root() -> Self {
        Self::default()
    }

    /// Build an ordered candidate list from string paths.
    pub fn candidates(paths: &[&str]) -> Vec<Path> {
        paths.iter().map(|p| Path::parse(p)).collect()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Append a segment, returning a new path.
    pub fn join(&self, segment: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(Path::parse(segment).segments);
        Self { segments }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

impl FromStr for Path {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Path::parse(s))
    }
}

impl From<&str> for Path {
    fn from(s: &str) -> Self {
        Path::parse(s)
    }
}

impl From<String> for Path {
    fn from(s: String) -> Self {
        Path::parse(&s)
    }
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Path {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Path::parse(&s))
    }
}

fn array_index(segment: &str) -> Option<usize> {
    segment.parse::<usize>().ok()
}

/// Value at `path`, or `None` if any segment is missing or the path runs
/// through a scalar.
pub fn get<'a>(record: &'a Value, path: &Path) -> Option<&'a Value> {
    path.segments
        .iter()
        .try_fold(record, |node, segment| match node {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => array_index(segment).and_then(|i| items.get(i)),
            _ => None,
        })
}

/// Value at `path`, falling back to `default`.
pub fn get_or<'a>(record: &'a Value, path: &Path, default: &'a Value) -> &'a Value {
    get(record, path).unwrap_or(default)
}

/// Mutable value at `path`.
pub fn get_mut<'a>(record: &'a mut Value, path: &Path) -> Option<&'a mut Value> {
    path.segments
        .iter()
        .try_fold(record, |node, segment| match node {
            Value::Object(map) => map.get_mut(segment),
            Value::Array(items) => array_index(segment).and_then(move |i| items.get_mut(i)),
            _ => None,
        })
}

/// First non-blank value among `candidates`, evaluated left to right.
///
/// Blank means null, absent, `""` or `[]`; an empty mapping is a value.
pub fn get_first<'a>(record: &'a Value, candidates: &[Path]) -> Option<&'a Value> {
    candidates
        .iter()
        .filter_map(|path| get(record, path))
        .find(|value| !is_blank(value))
}

/// First non-blank value among `candidates`, falling back to `default`.
pub fn get_first_or<'a>(record: &'a Value, candidates: &[Path], default: &'a Value) -> &'a Value {
    get_first(record, candidates).unwrap_or(default)
}

/// Sequence at `path`; anything missing or not a sequence becomes empty.
pub fn list<'a>(record: &'a Value, path: &Path) -> &'a [Value] {
    list_or(record, path, &[])
}

/// Sequence at `path`, or `default` when missing or not a sequence.
pub fn list_or<'a>(record: &'a Value, path: &Path, default: &'a [Value]) -> &'a [Value] {
    get(record, path)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(default)
}

/// Assign `value` at `path`, creating intermediate mappings. Existing
/// values at the leaf, and scalars in the way, are overwritten.
///
/// Sequences are never replaced: an index equal to the length appends a
/// new element, and any other segment that does not address an existing
/// element leaves the record unchanged.
pub fn set(record: &mut Value, path: &Path, value: Value) {
    set_in(record, &path.segments, value);
}

fn set_in(node: &mut Value, segments: &[String], value: Value) {
    let Some((head, rest)) = segments.split_first() else {
        *node = value;
        return;
    };

    if let Value::Array(items) = node {
        match array_index(head) {
            Some(i) if i < items.len() => set_in(&mut items[i], rest, value),
            Some(i) if i == items.len() => {
                items.push(Value::Null);
                set_in(&mut items[i], rest, value);
            }
            _ => tracing::debug!(segment = %head, len = items.len(), "set skipped: no such sequence element"),
        }
        return;
    }

    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    if let Value::Object(map) = node {
        let child = map.entry(head.clone()).or_insert(Value::Null);
        set_in(child, rest, value);
    }
}

/// Remove and return the value at `path`. Removing the root is a no-op.
pub fn remove(record: &mut Value, path: &Path) -> Option<Value> {
    let (leaf, parents) = path.segments.split_last()?;
    let parent = get_mut(record, &Path { segments: parents.to_vec() })?;
    match parent {
        Value::Object(map) => map.remove(leaf),
        Value::Array(items) => match array_index(leaf) {
            Some(i) if i < items.len() => Some(items.remove(i)),
            _ => None,
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "record": {
                "familyName": "Lee",
                "givenName": "",
                "card": { "identifier": "1234-567-890" },
                "doses": [ { "lot": "A1" }, { "lot": "B2" } ],
                "tags": [],
            },
            "did": "did:example:42",
        })
    }

    #[test]
    fn test_parse_and_display() {
        let path = Path::parse("record/card/identifier");
        assert_eq!(path.segments().len(), 3);
        assert_eq!(path.to_string(), "record/card/identifier");
        assert!(Path::parse("").is_root());
        assert!(Path::parse("/").is_root());
        assert_eq!(Path::parse("/a//b/").to_string(), "a/b");
    }

    #[test]
    fn test_join() {
        let path = Path::parse("record").join("card/identifier");
        assert_eq!(path, Path::parse("record/card/identifier"));
    }

    #[test]
    fn test_get_full_depth() {
        let r = sample();
        assert_eq!(get(&r, &"record/familyName".into()), Some(&json!("Lee")));
        assert_eq!(
            get(&r, &"record/card/identifier".into()),
            Some(&json!("1234-567-890"))
        );
    }

    #[test]
    fn test_get_missing_segment() {
        let r = sample();
        assert_eq!(get(&r, &"record/card/expires".into()), None);
        assert_eq!(get(&r, &"nope/card".into()), None);
    }

    #[test]
    fn test_get_through_scalar_is_missing() {
        let r = sample();
        assert_eq!(get(&r, &"did/method".into()), None);
        assert_eq!(get(&r, &"record/familyName/first".into()), None);
    }

    #[test]
    fn test_get_root_returns_record() {
        let r = sample();
        assert_eq!(get(&r, &Path::root()), Some(&r));
    }

    #[test]
    fn test_get_array_index() {
        let r = sample();
        assert_eq!(get(&r, &"record/doses/1/lot".into()), Some(&json!("B2")));
        assert_eq!(get(&r, &"record/doses/7/lot".into()), None);
        assert_eq!(get(&r, &"record/doses/x".into()), None);
    }

    #[test]
    fn test_numeric_segment_on_mapping_is_a_key() {
        let r = json!({"codes": {"0": "zero"}});
        assert_eq!(get(&r, &"codes/0".into()), Some(&json!("zero")));
    }

    #[test]
    fn test_get_or_default() {
        let r = sample();
        let fallback = json!("n/a");
        assert_eq!(get_or(&r, &"record/nope".into(), &fallback), &fallback);
    }

    #[test]
    fn test_get_first_skips_empty() {
        let r = sample();
        let candidates = Path::candidates(&[
            "record/missing",
            "record/givenName",
            "record/tags",
            "record/familyName",
            "did",
        ]);
        assert_eq!(get_first(&r, &candidates), Some(&json!("Lee")));
    }

    #[test]
    fn test_get_first_all_empty() {
        let r = sample();
        let candidates = Path::candidates(&["record/givenName", "record/tags"]);
        assert_eq!(get_first(&r, &candidates), None);
        let fallback = json!(0);
        assert_eq!(get_first_or(&r, &candidates, &fallback), &fallback);
    }

    #[test]
    fn test_list() {
        let r = sample();
        assert_eq!(list(&r, &"record/doses".into()).len(), 2);
        assert!(list(&r, &"record/familyName".into()).is_empty());
        assert!(list(&r, &"record/nothing".into()).is_empty());

        let fallback = vec![json!(1)];
        assert_eq!(list_or(&r, &"record/nothing".into(), &fallback), &fallback[..]);
    }

    #[test]
    fn test_set_creates_intermediates() {
        let mut r = json!({});
        set(&mut r, &"schema:address/schema:addressCountry".into(), json!("CA"));
        assert_eq!(r, json!({"schema:address": {"schema:addressCountry": "CA"}}));
    }

    #[test]
    fn test_set_overwrites() {
        let mut r = sample();
        set(&mut r, &"record/familyName".into(), json!("Kim"));
        assert_eq!(get(&r, &"record/familyName".into()), Some(&json!("Kim")));
    }

    #[test]
    fn test_set_replaces_scalar_in_the_way() {
        let mut r = json!({"a": 5});
        set(&mut r, &"a/b".into(), json!(true));
        assert_eq!(r, json!({"a": {"b": true}}));
    }

    #[test]
    fn test_set_into_array_element() {
        let mut r = sample();
        set(&mut r, &"record/doses/0/lot".into(), json!("Z9"));
        assert_eq!(get(&r, &"record/doses/0/lot".into()), Some(&json!("Z9")));
        assert_eq!(list(&r, &"record/doses".into()).len(), 2);
    }

    #[test]
    fn test_set_out_of_range_keeps_sequence() {
        let mut r = json!({"doses": [{"lot": "A1"}, {"lot": "B2"}]});
        let before = r.clone();
        set(&mut r, &"doses/5/lot".into(), json!("Z9"));
        set(&mut r, &"doses/first/lot".into(), json!("Z9"));
        assert_eq!(r, before);
        assert_eq!(get(&r, &"doses/0/lot".into()), Some(&json!("A1")));
    }

    #[test]
    fn test_set_at_length_appends() {
        let mut r = json!({"doses": [{"lot": "A1"}]});
        set(&mut r, &"doses/1/lot".into(), json!("B2"));
        assert_eq!(r, json!({"doses": [{"lot": "A1"}, {"lot": "B2"}]}));
    }

    #[test]
    fn test_get_first_keeps_empty_mapping() {
        let r = json!({"a": "", "b": {}, "c": "x"});
        let candidates = Path::candidates(&["a", "b", "c"]);
        assert_eq!(get_first(&r, &candidates), Some(&json!({})));
    }

    #[test]
    fn test_set_root_replaces_record() {
        let mut r = sample();
        set(&mut r, &Path::root(), json!({"x": 1}));
        assert_eq!(r, json!({"x": 1}));
    }

    #[test]
    fn test_remove() {
        let mut r = sample();
        assert_eq!(remove(&mut r, &"record/card/identifier".into()), Some(json!("1234-567-890")));
        assert_eq!(get(&r, &"record/card".into()), Some(&json!({})));
        assert_eq!(remove(&mut r, &"record/card/identifier".into()), None);
        assert_eq!(remove(&mut r, &Path::root()), None);
    }

    #[test]
    fn test_serde_as_string() {
        let path: Path = serde_json::from_value(json!("card/identifier")).unwrap();
        assert_eq!(path, Path::parse("card/identifier"));
        assert_eq!(serde_json::to_value(&path).unwrap(), json!("card/identifier"));
    }
}
