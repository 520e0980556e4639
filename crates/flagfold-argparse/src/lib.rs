//! Convention-driven argument parsing.
//!
//! Callers describe their options as a map of typed defaults; the variant of
//! each default decides how its inputs are read:
//!
//! - `Bool`: `--flag`, `--flag=off`, `--no-flag`, bundled `-vf`
//! - `Number`: `--count=3`; `--no-count` resets to the default
//! - `Text`: `--input=a.txt`; `--no-input` clears it
//! - `List`: `--tag=a --tag=b`; `--no-tag=a` removes one, `--no-tag` clears
//!
//! Anything not starting with `-` is positional. Tokens made only of dashes
//! are dropped.
//!
//! ```
//! use flagfold_argparse::{parse, Defaults, Value};
//!
//! let defaults: Defaults = [
//!     ("dryRun".to_string(), Value::Bool(false)),
//!     ("debug".to_string(), Value::Bool(false)),
//! ]
//! .into_iter()
//! .collect();
//!
//! let parsed = parse(["data.yml", "--dry-run", "data.json", "--debug"], &defaults).unwrap();
//! assert_eq!(parsed.flag("dryRun"), Some(true));
//! assert_eq!(parsed.flag("debug"), Some(true));
//! assert_eq!(parsed.len(), 2);
//! assert_eq!(&parsed[1], "data.json");
//! ```

pub mod boolean;
pub mod error;
pub mod merge;
pub mod names;
pub mod parsed;
pub mod value;

pub use boolean::{Literal, parse_boolean, parse_boolean_or_false};
pub use error::{ParseError, ParseResult};
pub use merge::parse_decimal;
pub use names::{AliasTarget, Aliases, NameTable, Record, Resolved, is_dashes, kebab_case};
pub use parsed::Parsed;
pub use value::{Defaults, Kind, Value};

use serde::{Deserialize, Serialize};

/// Aliases and exclusive groups for a parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Options {
    /// Extra spellings for fields; see [`AliasTarget`].
    #[serde(default, skip_serializing_if = "Aliases::is_empty")]
    pub aliases: Aliases,

    /// Groups of fields of which at most one may be given.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclusives: Vec<Vec<String>>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an alias. `target` may start with `!` to negate the field.
    pub fn alias(mut self, alias: impl Into<String>, target: impl Into<AliasTarget>) -> Self {
        self.aliases.insert(alias.into(), target.into());
        self
    }

    /// Add a group of mutually exclusive fields.
    pub fn exclusive<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclusives
            .push(fields.into_iter().map(Into::into).collect());
        self
    }
}

/// A validated configuration, ready to parse any number of inputs.
#[derive(Debug, Clone)]
pub struct Parser<'d> {
    defaults: &'d Defaults,
    exclusives: &'d [Vec<String>],
    names: NameTable,
}

impl<'d> Parser<'d> {
    /// Validate `options` against `defaults` and build the name table.
    ///
    /// Fails if an alias target is not a default. Exclusive groups may name
    /// fields that are not defaults; those simply never match.
    pub fn new(defaults: &'d Defaults, options: &'d Options) -> ParseResult<Self> {
        let names = NameTable::build(defaults, &options.aliases)?;
        Ok(Self {
            defaults,
            exclusives: &options.exclusives,
            names,
        })
    }

    pub fn names(&self) -> &NameTable {
        &self.names
    }

    /// Parse `inputs` into a fresh [`Parsed`].
    ///
    /// The defaults are cloned; nothing is shared between calls.
    pub fn parse<I, S>(&self, inputs: I) -> ParseResult<Parsed>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let inputs: Vec<S> = inputs.into_iter().collect();
        let mut records: Vec<Record<'_>> = Vec::new();
        let mut positionals: Vec<String> = Vec::new();

        for input in &inputs {
            let token = input.as_ref();
            if is_dashes(token) {
                continue;
            }
            if token.starts_with('-') {
                records.extend(self.names.resolve(token)?);
            } else {
                positionals.push(token.to_string());
            }
        }

        let mut fields = self.defaults.clone();
        merge::merge_all(self.defaults, &mut fields, &records)?;
        merge::check_exclusives(&records, self.exclusives)?;

        Ok(Parsed::new(fields, positionals))
    }
}

/// Parse `inputs` against `defaults` with no aliases or exclusive groups.
pub fn parse<I, S>(inputs: I, defaults: &Defaults) -> ParseResult<Parsed>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    parse_with_options(inputs, defaults, &Options::default())
}

/// Parse `inputs` against `defaults` using `options`.
///
/// The name table is built fresh for this call.
pub fn parse_with_options<I, S>(inputs: I, defaults: &Defaults, options: &Options) -> ParseResult<Parsed>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Parser::new(defaults, options)?.parse(inputs)
}
