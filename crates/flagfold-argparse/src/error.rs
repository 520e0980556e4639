use thiserror::Error;

/// Everything that can abort a parse.
///
/// Input errors carry the raw token exactly as it appeared in the input.
/// The configuration error (`UnknownAliasTarget`) is raised while building
/// the name table, before any token is read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Expected only known options but got \"{token}\"")]
    UnknownArgument { token: String },

    #[error("Expected only Boolean short-hand options but got \"{letter}\" in \"{token}\"")]
    NonBooleanShortHand { token: String, letter: char },

    #[error("Expected \"{token}\" to have no values.")]
    ValueNotPermitted { token: String },

    #[error("Expected \"{token}\" to have a value.")]
    ValueRequired { token: String },

    #[error("Expected only one of {} but got all of them.", quote_all(.tokens))]
    MutuallyExclusive { tokens: Vec<String> },

    #[error("Expected alias \"{alias}\" to refer to a known option but got \"{target}\"")]
    UnknownAliasTarget { alias: String, target: String },
}

impl ParseError {
    /// Whether the error comes from the defaults/aliases setup
    /// rather than from the tokens being parsed.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::UnknownAliasTarget { .. })
    }

    /// The raw input tokens this error refers to.
    pub fn tokens(&self) -> Vec<&str> {
        match self {
            Self::UnknownArgument { token }
            | Self::NonBooleanShortHand { token, .. }
            | Self::ValueNotPermitted { token }
            | Self::ValueRequired { token } => vec![token.as_str()],
            Self::MutuallyExclusive { tokens } => tokens.iter().map(String::as_str).collect(),
            Self::UnknownAliasTarget { .. } => Vec::new(),
        }
    }
}

fn quote_all(tokens: &[String]) -> String {
    tokens
        .iter()
        .map(|t| format!("\"{t}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

pub type ParseResult<T> = Result<T, ParseError>;
