//! Error types for the assembler

use thiserror::Error;

/// A fatal assembly error, tagged with the 1-based source line it occurred on.
///
/// Displays exactly as the assembler reports it: `ERROR in line <N>: <message>.`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("ERROR in line {line}: {kind}.")]
pub struct AsmError {
    pub line: usize,
    pub kind: ErrorKind,
}

impl AsmError {
    pub fn new(line: usize, kind: ErrorKind) -> Self {
        Self { line, kind }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    /// Unterminated quote or a control character inside quotes.
    #[error("Invalid element")]
    InvalidElement,

    #[error("Definition '{0}' already exists")]
    DuplicateLabel(String),

    #[error("Invalid expression")]
    InvalidExpression,

    #[error("Invalid HEX value")]
    InvalidHex,

    #[error("Empty expression")]
    EmptyExpression,

    #[error("Unknown reference '{0}'")]
    UnknownReference(String),

    #[error("Expression size unclear (0x{value:04X})")]
    SizeUnclear { value: u16 },

    #[error("Expecting a byte argument")]
    ExpectingByte,

    #[error("Expecting a zero-page argument")]
    ExpectingZeroPage,

    #[error("Expecting a word argument")]
    ExpectingWord,

    #[error("Unclear word argument")]
    UnclearWord,

    #[error("Invalid fast jump")]
    InvalidFastJump,

    #[error("Missing argument")]
    MissingArgument,

    #[error("Unknown pre-proc command '{0}'")]
    UnknownDirective(String),

    #[error("Expecting a 16-bit HEX address")]
    ExpectingOrgAddress,
}
