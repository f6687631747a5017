use thiserror::Error;

/// Everything that can go wrong while generating or checking a question.
///
/// `check_answer` turns these into feedback text, so none of them ever reaches a player as an
/// error value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QuizError {
    #[error("not a numeric value: {0:?}")]
    NotNumeric(String),
    #[error("{0}")]
    Parse(String),
    #[error("degenerate instance: {0}")]
    GenerationDegenerate(&'static str),
    #[error("configuration error: {0}")]
    Config(String),
    #[error("unknown problem kind: {0:?}")]
    UnknownKind(String),
    #[error("unknown difficulty: {0:?}")]
    UnknownDifficulty(String),
}
