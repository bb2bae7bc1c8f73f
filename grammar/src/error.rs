use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("failed to parse grammar: {0}")]
    Syntax(String),
    #[error("malformed production '{production}': {defect}")]
    MalformedProduction { production: String, defect: Defect },
    #[error("grammar has no productions")]
    Empty,
    #[error("start symbol '{0}' has no productions")]
    UnknownStart(char),
}

/// What is wrong with a production that cannot be part of an operator grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Defect {
    #[error("right-hand side is empty")]
    EmptyRhs,
    #[error("left-hand side '{0}' is not a non-terminal")]
    LhsNotNonTerminal(char),
    #[error("non-terminals '{0}' and '{1}' are adjacent")]
    AdjacentNonTerminals(char, char),
}

impl From<nom::Err<nom::error::Error<&str>>> for GrammarError {
    fn from(err: nom::Err<nom::error::Error<&str>>) -> GrammarError {
        match err {
            nom::Err::Error(e) | nom::Err::Failure(e) => {
                GrammarError::Syntax(format!("unexpected input at {:?}", e.input))
            }
            nom::Err::Incomplete(_) => GrammarError::Syntax("incomplete input".to_owned()),
        }
    }
}
