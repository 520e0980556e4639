//! Spelling resolution: from raw tokens to canonical fields.
//!
//! A [`NameTable`] maps every accepted spelling of an option to the field it
//! addresses and whether that spelling negates it:
//!
//! - `dryRun` answers to `--dry-run`, and to `--no-dry-run` negated
//! - `noCache` answers to `--no-cache`, and to `--cache` negated
//! - a one-letter field `v` additionally answers to `-v`
//! - aliases add more spellings; a `!field` target flips the negation
//!
//! Spellings are registered first-come: all direct field spellings, then all
//! `no-` complements, then aliases. A later registration never replaces an
//! earlier one.

use crate::error::{ParseError, ParseResult};
use crate::value::{Defaults, Kind};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Prefix on an alias target meaning "this alias negates the field".
pub const NEGATION_MARKER: char = '!';

const NO_PREFIX: &str = "no-";

/// Convert a field or option name to kebab-case.
///
/// Words break at any non-alphanumeric character, at a lowercase (or digit)
/// to uppercase step, and before the last capital of a capital run that
/// continues in lowercase. Digits stay with the word before them.
///
/// ```
/// use flagfold_argparse::kebab_case;
///
/// assert_eq!(kebab_case("dryRun"), "dry-run");
/// assert_eq!(kebab_case("DRY_RUN"), "dry-run");
/// assert_eq!(kebab_case("parseXMLFile"), "parse-xml-file");
/// ```
pub fn kebab_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        // `current` is non-empty only when the previous char was alphanumeric.
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_numeric() || (prev.is_uppercase() && next_is_lower) {
                words.push(std::mem::take(&mut current));
            }
        }
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }

    words.join("-")
}

/// Whether `token` is made only of dashes (`-`, `--`, `---`, ...).
///
/// Such tokens are dropped from the input entirely.
pub fn is_dashes(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| c == '-')
}

/// The field an alias points at.
///
/// Written as `"field"` or `"!field"` in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct AliasTarget {
    pub field: String,
    pub negated: bool,
}

impl AliasTarget {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            negated: false,
        }
    }

    pub fn negated(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            negated: true,
        }
    }
}

impl FromStr for AliasTarget {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.strip_prefix(NEGATION_MARKER) {
            Some(field) => Self::negated(field),
            None => Self::new(s),
        })
    }
}

impl From<&str> for AliasTarget {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(target) => target,
            Err(never) => match never {},
        }
    }
}

impl From<String> for AliasTarget {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<AliasTarget> for String {
    fn from(target: AliasTarget) -> Self {
        target.to_string()
    }
}

impl fmt::Display for AliasTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negated {
            write!(f, "{NEGATION_MARKER}{}", self.field)
        } else {
            f.write_str(&self.field)
        }
    }
}

/// Alias spelling to target field, in declaration order.
///
/// Keys may be bare (`d`, `dry`) or carry their dashes (`-d`, `--dry`).
pub type Aliases = IndexMap<String, AliasTarget>;

/// What a spelling resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolved {
    pub field: String,
    pub negated: bool,
}

/// One named input, resolved against a [`NameTable`].
///
/// A bundled short-hand such as `-vf` produces one record per letter, each
/// carrying the whole token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<'a> {
    pub token: &'a str,
    pub field: String,
    pub negated: bool,
    pub value: Option<&'a str>,
}

impl<'a> Record<'a> {
    fn new(token: &'a str, resolved: &Resolved, value: Option<&'a str>) -> Self {
        Self {
            token,
            field: resolved.field.clone(),
            negated: resolved.negated,
            value,
        }
    }
}

/// Immutable spelling lookup built from defaults and aliases.
#[derive(Debug, Clone, Default)]
pub struct NameTable {
    entries: IndexMap<String, Resolved>,
    kinds: IndexMap<String, Kind>,
}

#[derive(Default)]
struct NameTableBuilder {
    entries: IndexMap<String, Resolved>,
}

impl NameTableBuilder {
    fn register(&mut self, spelling: String, field: &str, negated: bool) {
        self.entries.entry(spelling).or_insert_with(|| Resolved {
            field: field.to_string(),
            negated,
        });
    }

    fn register_pair(&mut self, name: &str, field: &str, negated: bool) {
        let kebab = kebab_case(name);
        if kebab.is_empty() {
            return;
        }
        let complement = match kebab.strip_prefix(NO_PREFIX) {
            Some(rest) if !rest.is_empty() => rest.to_string(),
            _ => format!("{NO_PREFIX}{kebab}"),
        };
        self.register(format!("--{kebab}"), field, negated);
        self.register(format!("--{complement}"), field, !negated);
    }

    fn finish(self, defaults: &Defaults) -> NameTable {
        NameTable {
            entries: self.entries,
            kinds: defaults
                .iter()
                .map(|(field, value)| (field.clone(), value.kind()))
                .collect(),
        }
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

fn unknown(token: &str) -> ParseError {
    ParseError::UnknownArgument {
        token: token.to_string(),
    }
}

impl NameTable {
    /// Build the table, failing if an alias targets a field missing from
    /// `defaults`.
    pub fn build(defaults: &Defaults, aliases: &Aliases) -> ParseResult<Self> {
        for (alias, target) in aliases {
            if !defaults.contains_key(&target.field) {
                return Err(ParseError::UnknownAliasTarget {
                    alias: alias.clone(),
                    target: target.to_string(),
                });
            }
        }

        let mut builder = NameTableBuilder::default();

        for field in defaults.keys() {
            if let Some(c) = single_char(field) {
                builder.register(format!("-{c}"), field, false);
            }
            let kebab = kebab_case(field);
            if !kebab.is_empty() {
                builder.register(format!("--{kebab}"), field, false);
            }
        }
        for field in defaults.keys() {
            builder.register_pair(field, field, false);
        }

        for (alias, target) in aliases {
            let name = alias.trim_start_matches('-');
            match single_char(name) {
                Some(c) => builder.register(format!("-{c}"), &target.field, target.negated),
                None => builder.register_pair(name, &target.field, target.negated),
            }
        }

        Ok(builder.finish(defaults))
    }

    /// Look up an exact spelling such as `--dry-run` or `-d`.
    pub fn lookup(&self, spelling: &str) -> Option<&Resolved> {
        self.entries.get(spelling)
    }

    /// The kind of default a field was registered with.
    pub fn kind_of(&self, field: &str) -> Option<Kind> {
        self.kinds.get(field).copied()
    }

    /// Every registered spelling in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Resolved)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolve a named token (one starting with `-`).
    ///
    /// - `--name` / `--name=value`: the name is kebab-cased before lookup
    /// - `-abc`: each letter is a boolean flag
    /// - `-a=value`: one letter with a value
    ///
    /// Dash-only tokens resolve to nothing. Anything else fails.
    pub fn resolve<'a>(&self, token: &'a str) -> ParseResult<Vec<Record<'a>>> {
        if is_dashes(token) {
            return Ok(Vec::new());
        }

        if let Some(body) = token.strip_prefix("--") {
            let (name, value) = match body.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (body, None),
            };
            let resolved = self
                .lookup(&format!("--{}", kebab_case(name)))
                .ok_or_else(|| unknown(token))?;
            return Ok(vec![Record::new(token, resolved, value)]);
        }

        let Some(body) = token.strip_prefix('-') else {
            return Err(unknown(token));
        };

        if let Some((letter, value)) = body.split_once('=') {
            let c = single_char(letter).ok_or_else(|| unknown(token))?;
            let resolved = self.lookup(&format!("-{c}")).ok_or_else(|| unknown(token))?;
            return Ok(vec![Record::new(token, resolved, Some(value))]);
        }

        body.chars()
            .map(|c| -> ParseResult<Record<'a>> {
                let resolved = self.lookup(&format!("-{c}")).ok_or_else(|| unknown(token))?;
                if self.kind_of(&resolved.field) != Some(Kind::Bool) {
                    return Err(ParseError::NonBooleanShortHand {
                        token: token.to_string(),
                        letter: c,
                    });
                }
                Ok(Record::new(token, resolved, None))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn defaults<const N: usize>(pairs: [(&str, Value); N]) -> Defaults {
        pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
    }

    fn aliases<const N: usize>(pairs: [(&str, &str); N]) -> Aliases {
        pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), AliasTarget::from(v)))
            .collect()
    }

    fn resolved(field: &str, negated: bool) -> Resolved {
        Resolved {
            field: field.to_string(),
            negated,
        }
    }

    #[test]
    fn kebab_case_splits_words() {
        assert_eq!(kebab_case("dryRun"), "dry-run");
        assert_eq!(kebab_case("dry-run"), "dry-run");
        assert_eq!(kebab_case("Dry_Run"), "dry-run");
        assert_eq!(kebab_case("DRY RUN"), "dry-run");
        assert_eq!(kebab_case("noDryRun"), "no-dry-run");
        assert_eq!(kebab_case("XMLHttpRequest"), "xml-http-request");
        assert_eq!(kebab_case("utf8Output"), "utf8-output");
        assert_eq!(kebab_case("v"), "v");
        assert_eq!(kebab_case("--"), "");
    }

    #[test]
    fn dashes_only() {
        assert!(is_dashes("-"));
        assert!(is_dashes("---"));
        assert!(!is_dashes(""));
        assert!(!is_dashes("--x"));
    }

    #[test]
    fn registers_direct_and_negated_spellings() {
        let table = NameTable::build(
            &defaults([("dryRun", false.into()), ("noCache", false.into())]),
            &Aliases::new(),
        )
        .unwrap();

        assert_eq!(table.lookup("--dry-run"), Some(&resolved("dryRun", false)));
        assert_eq!(table.lookup("--no-dry-run"), Some(&resolved("dryRun", true)));
        assert_eq!(table.lookup("--no-cache"), Some(&resolved("noCache", false)));
        assert_eq!(table.lookup("--cache"), Some(&resolved("noCache", true)));
        assert_eq!(table.lookup("-d"), None);
    }

    #[test]
    fn single_letter_fields_get_a_short_spelling() {
        let table =
            NameTable::build(&defaults([("v", false.into())]), &Aliases::new()).unwrap();

        assert_eq!(table.lookup("-v"), Some(&resolved("v", false)));
        assert_eq!(table.lookup("--v"), Some(&resolved("v", false)));
        assert_eq!(table.lookup("--no-v"), Some(&resolved("v", true)));
    }

    #[test]
    fn direct_spellings_win_over_complements() {
        let table = NameTable::build(
            &defaults([("noDryRun", false.into()), ("dryRun", false.into())]),
            &Aliases::new(),
        )
        .unwrap();

        assert_eq!(table.lookup("--dry-run"), Some(&resolved("dryRun", false)));
        assert_eq!(table.lookup("--no-dry-run"), Some(&resolved("noDryRun", false)));
    }

    #[test]
    fn aliases_never_override_field_spellings() {
        let table = NameTable::build(
            &defaults([("debug", false.into()), ("dryRun", false.into())]),
            &aliases([("debug", "dryRun"), ("d", "dryRun")]),
        )
        .unwrap();

        assert_eq!(table.lookup("--debug"), Some(&resolved("debug", false)));
        assert_eq!(table.lookup("-d"), Some(&resolved("dryRun", false)));
    }

    #[test]
    fn negated_alias_flips_its_pair() {
        let table = NameTable::build(
            &defaults([("dryRun", false.into())]),
            &aliases([("--wet", "!dryRun"), ("w", "!dryRun")]),
        )
        .unwrap();

        assert_eq!(table.lookup("--wet"), Some(&resolved("dryRun", true)));
        assert_eq!(table.lookup("--no-wet"), Some(&resolved("dryRun", false)));
        assert_eq!(table.lookup("-w"), Some(&resolved("dryRun", true)));
    }

    #[test]
    fn unknown_alias_target_fails_at_build() {
        let err = NameTable::build(&defaults([]), &aliases([("d", "!dryRun")])).unwrap_err();
        assert_eq!(
            err,
            ParseError::UnknownAliasTarget {
                alias: "d".to_string(),
                target: "!dryRun".to_string(),
            }
        );
    }

    #[test]
    fn resolves_long_tokens_with_values() {
        let table =
            NameTable::build(&defaults([("input", "".into())]), &Aliases::new()).unwrap();

        let records = table.resolve("--input=a=b").unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].field, "input");
        assert_eq!(records[0].value, Some("a=b"));
        assert_eq!(records[0].token, "--input=a=b");

        let records = table.resolve("--Input").unwrap();
        assert_eq!(records[0].value, None);

        let err = table.resolve("--output").unwrap_err();
        assert_eq!(err.tokens(), vec!["--output"]);
    }

    #[test]
    fn resolves_bundled_short_hands() {
        let table = NameTable::build(
            &defaults([("v", false.into()), ("f", false.into()), ("c", 0.into())]),
            &Aliases::new(),
        )
        .unwrap();

        let records = table.resolve("-vf").unwrap();
        let fields: Vec<&str> = records.iter().map(|r| r.field.as_str()).collect();
        assert_eq!(fields, vec!["v", "f"]);
        assert!(records.iter().all(|r| r.token == "-vf" && r.value.is_none()));

        let err = table.resolve("-vc").unwrap_err();
        assert_eq!(
            err,
            ParseError::NonBooleanShortHand {
                token: "-vc".to_string(),
                letter: 'c',
            }
        );

        let records = table.resolve("-c=5").unwrap();
        assert_eq!(records[0].field, "c");
        assert_eq!(records[0].value, Some("5"));
    }

    #[test]
    fn rejects_multi_letter_short_hand_with_value() {
        let table = NameTable::build(
            &defaults([("v", false.into()), ("f", false.into())]),
            &Aliases::new(),
        )
        .unwrap();

        assert!(matches!(
            table.resolve("-vf=true"),
            Err(ParseError::UnknownArgument { .. })
        ));
        assert!(matches!(
            table.resolve("-=x"),
            Err(ParseError::UnknownArgument { .. })
        ));
        assert!(matches!(
            table.resolve("-x"),
            Err(ParseError::UnknownArgument { .. })
        ));
    }

    #[test]
    fn alias_target_round_trips_through_text() {
        let target: AliasTarget = "!dryRun".parse().unwrap();
        assert_eq!(target, AliasTarget::negated("dryRun"));
        assert_eq!(String::from(target), "!dryRun");
        assert_eq!(AliasTarget::from("debug"), AliasTarget::new("debug"));
    }
}
