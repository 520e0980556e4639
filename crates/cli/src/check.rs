use anyhow::{Context, Result};
use flagfold_argparse::{Parser, Value, kebab_case};
use serde::Serialize;

use crate::schema::LoadedSchema;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
    pub schema: String,
    pub name: String,
    pub fields: Vec<FieldReport>,
    pub spellings: Vec<SpellingReport>,
    pub exclusives: Vec<Vec<String>>,
    /// Aliases whose spelling was already taken by a field.
    pub shadowed_aliases: Vec<String>,
    /// Exclusive-group entries that name no default; they can never match.
    pub unknown_exclusive_fields: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct FieldReport {
    pub name: String,
    pub kind: &'static str,
    pub default: Value,
}

#[derive(Debug, Serialize)]
pub struct SpellingReport {
    pub spelling: String,
    pub field: String,
    pub negated: bool,
}

/// Validate a schema and describe every spelling it accepts.
pub fn check_schema(loaded: &LoadedSchema) -> Result<CheckReport> {
    let schema = &loaded.schema;
    let parser = Parser::new(&schema.defaults, &schema.options)
        .with_context(|| format!("invalid schema: {}", loaded.path.display()))?;
    let names = parser.names();

    let fields = schema
        .defaults
        .iter()
        .map(|(name, value)| FieldReport {
            name: name.clone(),
            kind: value.kind().as_str(),
            default: value.clone(),
        })
        .collect();

    let spellings = names
        .iter()
        .map(|(spelling, resolved)| SpellingReport {
            spelling: spelling.to_string(),
            field: resolved.field.clone(),
            negated: resolved.negated,
        })
        .collect();

    let shadowed_aliases = schema
        .options
        .aliases
        .iter()
        .filter(|(alias, target)| {
            let name = alias.trim_start_matches('-');
            let spelling = if name.chars().count() == 1 {
                format!("-{name}")
            } else {
                format!("--{}", kebab_case(name))
            };
            names
                .lookup(&spelling)
                .is_none_or(|r| r.field != target.field || r.negated != target.negated)
        })
        .map(|(alias, _)| alias.clone())
        .collect();

    let mut unknown_exclusive_fields: Vec<String> = Vec::new();
    for field in schema.options.exclusives.iter().flatten() {
        if !schema.defaults.contains_key(field) && !unknown_exclusive_fields.contains(field) {
            unknown_exclusive_fields.push(field.clone());
        }
    }

    Ok(CheckReport {
        schema: loaded.path.display().to_string(),
        name: loaded.display_name(),
        fields,
        spellings,
        exclusives: schema.options.exclusives.clone(),
        shadowed_aliases,
        unknown_exclusive_fields,
    })
}
