//! Loose boolean literals (`yes`, `off`, `0`, ...).

/// Input to [`parse_boolean`].
///
/// Covers the shapes a boolean can arrive in: a flag with no value, an
/// explicit null, an actual boolean, a number, or text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal<'a> {
    Missing,
    Null,
    Bool(bool),
    Number(f64),
    Text(&'a str),
}

impl From<bool> for Literal<'_> {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Literal<'_> {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl<'a> From<&'a str> for Literal<'a> {
    fn from(s: &'a str) -> Self {
        Self::Text(s)
    }
}

impl<'a> From<Option<&'a str>> for Literal<'a> {
    fn from(s: Option<&'a str>) -> Self {
        s.map_or(Self::Missing, Self::Text)
    }
}

const FALSY: [&str; 5] = ["false", "0", "n", "no", "off"];

fn is_falsy(text: &str) -> bool {
    let text = text.trim();
    FALSY.iter().any(|f| text.eq_ignore_ascii_case(f))
}

/// Interpret `value` as a boolean.
///
/// `Missing` yields `default`. Null, empty text and NaN are `false`.
/// Zero of either sign is `false`, as its textual form is `0`.
/// Text that reads `false`, `0`, `n`, `no` or `off`, ignoring case and
/// surrounding whitespace, is `false`; anything else is `true`.
pub fn parse_boolean<'a>(value: impl Into<Literal<'a>>, default: bool) -> bool {
    match value.into() {
        Literal::Missing => default,
        Literal::Null => false,
        Literal::Bool(b) => b,
        Literal::Number(n) => !(n.is_nan() || n == 0.0),
        Literal::Text("") => false,
        Literal::Text(s) => !is_falsy(s),
    }
}

/// [`parse_boolean`] with a default of `false` for a missing value.
pub fn parse_boolean_or_false<'a>(value: impl Into<Literal<'a>>) -> bool {
    parse_boolean(value, false)
}
