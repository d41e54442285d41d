use serde::{Deserialize, Serialize};
use serde_json::Value;

use passport_core::{is_empty, path, Path};

/// Character substituted for masked digits.
pub const MASK: char = '•';

/// Replace every ASCII digit with [`MASK`], except within the last
/// `keep_last` characters.
///
/// `mask_digits("1990-04-12", 2)` is `"••••-••-12"`.
pub fn mask_digits(value: &str, keep_last: usize) -> String {
    let len = value.chars().count();
    let cut = len.saturating_sub(keep_last);
    value
        .chars()
        .enumerate()
        .map(|(i, c)| if i < cut && c.is_ascii_digit() { MASK } else { c })
        .collect()
}

/// Mask a field of the working scope before any template sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redaction {
    pub path: Path,
    pub keep_last: usize,
}

impl Redaction {
    pub fn new(path: &str, keep_last: usize) -> Self {
        Self {
            path: Path::parse(path),
            keep_last,
        }
    }

    /// Apply to `scope`. Missing or empty values and non-scalar values are
    /// left alone.
    pub fn apply(&self, scope: &mut Value) {
        if self.path.is_root() {
            return;
        }
        let text = match path::get(scope, &self.path) {
            Some(value) if is_empty(value) => return,
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => return,
        };
        path::set(scope, &self.path, Value::String(mask_digits(&text, self.keep_last)));
    }
}
