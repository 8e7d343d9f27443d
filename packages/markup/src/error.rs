use thiserror::Error;

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("Malformed tag at {pos}: {message}")]
    MalformedTag { pos: usize, message: String },

    #[error("Unterminated attribute value at {pos}")]
    UnterminatedAttribute { pos: usize },

    #[error("Lexer error at {pos}")]
    LexerError { pos: usize },
}

impl ParseError {
    pub fn malformed_tag(pos: usize, message: impl Into<String>) -> Self {
        Self::MalformedTag {
            pos,
            message: message.into(),
        }
    }

    pub fn unterminated_attribute(pos: usize) -> Self {
        Self::UnterminatedAttribute { pos }
    }

    pub fn lexer_error(pos: usize) -> Self {
        Self::LexerError { pos }
    }
}
