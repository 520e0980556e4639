//! Coercion of resolved records into the running output.
//!
//! The variant of a field's default picks the rule; the running value always
//! keeps that variant.

use crate::boolean::parse_boolean;
use crate::error::{ParseError, ParseResult};
use crate::names::Record;
use crate::value::{Defaults, Value};
use indexmap::{IndexMap, IndexSet};

/// Apply `records` in order to `output`, which starts as a copy of
/// `defaults`.
pub(crate) fn merge_all(
    defaults: &Defaults,
    output: &mut Defaults,
    records: &[Record<'_>],
) -> ParseResult<()> {
    for record in records {
        let (Some(default), Some(current)) =
            (defaults.get(&record.field), output.get_mut(&record.field))
        else {
            return Err(ParseError::UnknownArgument {
                token: record.token.to_string(),
            });
        };
        merge_one(default, current, record)?;
    }
    Ok(())
}

fn merge_one(default: &Value, current: &mut Value, record: &Record<'_>) -> ParseResult<()> {
    match (default, current) {
        (Value::Bool(_), Value::Bool(current)) => {
            *current = merge_bool(record);
        }
        (Value::Number(default), Value::Number(current)) => {
            *current = merge_number(*default, record)?;
        }
        (Value::Text(_), Value::Text(current)) => merge_text(current, record)?,
        (Value::List(_), Value::List(current)) => merge_list(current, record)?,
        (default, current) => unreachable!(
            "{} field holds a {} value",
            default.kind().as_str(),
            current.kind().as_str()
        ),
    }
    Ok(())
}

fn merge_bool(record: &Record<'_>) -> bool {
    let value = parse_boolean(record.value, true);
    if record.negated { !value } else { value }
}

fn merge_number(default: f64, record: &Record<'_>) -> ParseResult<f64> {
    if record.negated {
        return match record.value {
            Some(text) if !text.is_empty() => Err(ParseError::ValueNotPermitted {
                token: record.token.to_string(),
            }),
            _ => Ok(default),
        };
    }
    Ok(record.value.map_or(f64::NAN, parse_decimal))
}

fn merge_text(current: &mut String, record: &Record<'_>) -> ParseResult<()> {
    if record.negated {
        match record.value {
            Some(text) if text != current.as_str() => {}
            _ => current.clear(),
        }
        return Ok(());
    }
    let text = record.value.ok_or_else(|| ParseError::ValueRequired {
        token: record.token.to_string(),
    })?;
    *current = text.to_string();
    Ok(())
}

fn merge_list(current: &mut Vec<String>, record: &Record<'_>) -> ParseResult<()> {
    if record.negated {
        match record.value {
            Some(text) => current.retain(|item| item != text),
            None => current.clear(),
        }
        return Ok(());
    }
    let text = record.value.ok_or_else(|| ParseError::ValueRequired {
        token: record.token.to_string(),
    })?;
    current.retain(|item| item != text);
    current.push(text.to_string());
    Ok(())
}

/// Parse the longest decimal prefix of `text`, ignoring leading whitespace.
///
/// Accepts an optional sign, digits with an optional fraction, an optional
/// exponent, or `Infinity`. Yields NaN when no number starts the text.
pub fn parse_decimal(text: &str) -> f64 {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    if text[end..].starts_with("Infinity") {
        return text[..end + "Infinity".len()].parse().unwrap_or(f64::NAN);
    }

    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;
    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return f64::NAN;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    text[..end].parse().unwrap_or(f64::NAN)
}

/// Fail if any group has more than one of its fields among `records`.
///
/// The error names the token of each conflicting field's first occurrence,
/// in group order.
pub(crate) fn check_exclusives(records: &[Record<'_>], groups: &[Vec<String>]) -> ParseResult<()> {
    if groups.is_empty() {
        return Ok(());
    }

    let mut first_seen: IndexMap<&str, &str> = IndexMap::new();
    for record in records {
        first_seen.entry(record.field.as_str()).or_insert(record.token);
    }

    for group in groups {
        let fields: IndexSet<&str> = group.iter().map(String::as_str).collect();
        let tokens: Vec<String> = fields
            .iter()
            .filter_map(|field| first_seen.get(field).map(|t| t.to_string()))
            .collect();
        if tokens.len() > 1 {
            return Err(ParseError::MutuallyExclusive { tokens });
        }
    }
    Ok(())
}
