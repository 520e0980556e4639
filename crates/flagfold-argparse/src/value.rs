use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Field name to default value, in declaration order.
///
/// The variant of each default decides how every input addressed to that
/// field is coerced, and the map order is the field order of the output.
pub type Defaults = IndexMap<String, Value>;

/// A field value: the default a caller supplies, or the merged result.
///
/// Serialized untagged, so a JSON schema can write defaults as plain
/// `false`, `0`, `""` or `[]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

/// The variant of a [`Value`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Bool,
    Number,
    Text,
    List,
}

impl Kind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "boolean",
            Self::Number => "number",
            Self::Text => "string",
            Self::List => "list",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Self::Bool(_) => Kind::Bool,
            Self::Number(_) => Kind::Number,
            Self::Text(_) => Kind::Text,
            Self::List(_) => Kind::List,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            Self::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

impl From<Vec<&str>> for Value {
    fn from(items: Vec<&str>) -> Self {
        Self::List(items.into_iter().map(str::to_string).collect())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::List(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_deserialize_from_plain_json() {
        let defaults: Defaults = serde_json::from_str(
            r#"{"dryRun": false, "count": 3, "input": "n/a", "tag": ["a"]}"#,
        )
        .unwrap();

        let kinds: Vec<Kind> = defaults.values().map(Value::kind).collect();
        assert_eq!(kinds, vec![Kind::Bool, Kind::Number, Kind::Text, Kind::List]);
        assert_eq!(defaults["count"], Value::Number(3.0));
        assert_eq!(defaults["tag"].as_list(), Some(&["a".to_string()][..]));
    }

    #[test]
    fn empty_list_default_is_a_list() {
        let value: Value = serde_json::from_str("[]").unwrap();
        assert_eq!(value, Value::List(Vec::new()));
    }

    #[test]
    fn accessors_only_match_their_variant() {
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert_eq!(Value::from(true).as_number(), None);
        assert_eq!(Value::from("x").as_text(), Some("x"));
        assert_eq!(Value::from(2).as_number(), Some(2.0));
        assert_eq!(Value::from(vec!["a", "b"]).to_string(), "[a, b]");
    }
}
