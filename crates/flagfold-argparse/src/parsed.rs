use crate::value::{Defaults, Value};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::ops::Index;

/// The result of a parse: every default field (possibly overridden) plus the
/// positional tokens in input order.
///
/// Indexing by `usize` and iterating yield positional tokens only; indexing
/// by `&str` yields field values.
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    fields: Defaults,
    positionals: Vec<String>,
}

impl Parsed {
    pub(crate) fn new(fields: Defaults, positionals: Vec<String>) -> Self {
        Self { fields, positionals }
    }

    /// Get the value of a field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn flag(&self, field: &str) -> Option<bool> {
        self.get(field).and_then(Value::as_bool)
    }

    pub fn number(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(Value::as_number)
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(Value::as_text)
    }

    pub fn list(&self, field: &str) -> Option<&[String]> {
        self.get(field).and_then(Value::as_list)
    }

    /// All fields in declaration order.
    pub fn fields(&self) -> &Defaults {
        &self.fields
    }

    pub fn positionals(&self) -> &[String] {
        &self.positionals
    }

    /// Number of positional tokens.
    pub fn len(&self) -> usize {
        self.positionals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positionals.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.positionals.iter()
    }

    pub fn into_parts(self) -> (Defaults, Vec<String>) {
        (self.fields, self.positionals)
    }

    // A field literally named `length` or `0`, `1`, ... is shadowed by the
    // positional view when serialized.
    fn is_shadowed(&self, field: &str) -> bool {
        field == "length"
            || field
                .parse::<usize>()
                .is_ok_and(|i| i < self.positionals.len() && i.to_string() == field)
    }
}

impl Index<usize> for Parsed {
    type Output = str;

    fn index(&self, index: usize) -> &str {
        &self.positionals[index]
    }
}

impl Index<&str> for Parsed {
    type Output = Value;

    fn index(&self, field: &str) -> &Value {
        &self.fields[field]
    }
}

impl<'a> IntoIterator for &'a Parsed {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Serializes as one flat object: the fields, then `"0"`..`"n-1"` for the
/// positional tokens, then `"length"`.
impl Serialize for Parsed {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (field, value) in &self.fields {
            if !self.is_shadowed(field) {
                map.serialize_entry(field, value)?;
            }
        }
        for (i, token) in self.positionals.iter().enumerate() {
            map.serialize_entry(&i.to_string(), token)?;
        }
        map.serialize_entry("length", &self.positionals.len())?;
        map.end()
    }
}
