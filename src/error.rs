//! Errors raised while reading tiles, hands and boards from text.
use thiserror::Error;

/// Errors from the text notation parsers in `utils`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown color '{found}' in tile '{token}'")]
    UnknownColor { token: String, found: char },

    #[error("unknown shape '{found}' in tile '{token}'")]
    UnknownShape { token: String, found: char },

    #[error("malformed tile '{0}', expected a color letter followed by a shape")]
    MalformedToken(String),

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("hand holds {found} tiles, at most {max} allowed")]
    HandTooLarge { found: usize, max: usize },
}
