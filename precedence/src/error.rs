use thiserror::Error;

/// Why a parse was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("input must end with the boundary marker '#'")]
    MissingEndMarker,
    #[error("boundary marker '#' at character {0} before the end of input")]
    MisplacedEndMarker(usize),
    #[error("non-terminal '{0}' in input")]
    NonTerminalInInput(char),
    #[error("no precedence relation defined between '{top}' and '{lookahead}'")]
    UndefinedPrecedence { top: char, lookahead: char },
    #[error("no production reduces the stack '{stack}'")]
    NoApplicableReduction { stack: String },
    #[error("input exhausted before the parse was accepted")]
    InputExhausted,
    #[error("parse did not finish within {0} steps")]
    StepLimitExceeded(usize),
}
