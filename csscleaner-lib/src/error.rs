use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

/// Syntax errors raised while building an `OwnedStylesheet` from raw text.
///
/// Lines are 1-based, columns are 1-based.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unclosed block at {line}:{column}")]
    UnclosedBlock { line: u32, column: u32 },

    #[error("Unexpected }} at {line}:{column}")]
    UnexpectedCloseBrace { line: u32, column: u32 },

    #[error("Unclosed string at {line}:{column}")]
    UnclosedString { line: u32, column: u32 },

    #[error("Unclosed comment at {line}:{column}")]
    UnclosedComment { line: u32, column: u32 },

    #[error("Unknown word {word:?} at {line}:{column}")]
    UnknownWord {
        word: String,
        line: u32,
        column: u32,
    },
}

impl ParseError {
    pub fn unknown_word(word: impl Into<String>, line: u32, column: u32) -> Self {
        Self::UnknownWord {
            word: word.into(),
            line,
            column,
        }
    }

    /// `(line, column)` of the offending token.
    pub fn location(&self) -> (u32, u32) {
        match self {
            Self::UnclosedBlock { line, column }
            | Self::UnexpectedCloseBrace { line, column }
            | Self::UnclosedString { line, column }
            | Self::UnclosedComment { line, column }
            | Self::UnknownWord { line, column, .. } => (*line, *column),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("{0}")]
    Syntax(#[from] ParseError),

    #[error("lightningcss rejected the stylesheet: {0}")]
    Lightning(String),
}

/// Failure of a whole cleaning invocation. No partial output accompanies it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CleanError {
    #[error("CSS parsing error: {0}")]
    Parse(#[from] ParseError),

    #[error("CSS formatting error: {0}")]
    Format(#[from] FormatError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Json(#[from] serde_json::Error),
}
