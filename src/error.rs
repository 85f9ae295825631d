use std::fmt;

/// A line/column location in the source text, used to annotate scanner errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn from_offset(source: &str, offset: usize) -> Self {
        let mut line = 1;
        let mut column = 1;
        for ch in source[..offset.min(source.len())].chars() {
            if ch == '\n' {
                line += 1;
                column = 1;
            } else {
                column += 1;
            }
        }
        Position { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("invalid transition from state {state} on input {input:?} at {at}")]
    InvalidTransition {
        state: String,
        input: char,
        at: Position,
    },

    #[error("unexpected '/' at {0}")]
    UnexpectedSlash(Position),

    #[error("unexpected numeric character at {0}")]
    UnexpectedNumeric(Position),

    #[error("quote must be followed by whitespace or a symbol at {0}")]
    QuoteFollowedByNonWhitespace(Position),

    #[error("unterminated string literal starting at {0}")]
    UnterminatedString(Position),

    #[error("unexpected end of input while expecting {0}")]
    UnexpectedEof(String),

    #[error("expected {expected}, found {found}")]
    UnexpectedToken { expected: String, found: String },

    #[error("{0}")]
    Semantic(String),

    #[error("Cyclic dependency detected")]
    Cyclic,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CompileError {
    pub fn semantic(message: impl Into<String>) -> Self {
        CompileError::Semantic(message.into())
    }
}
