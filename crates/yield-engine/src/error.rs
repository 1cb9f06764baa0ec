use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Calculation error: Division by zero encountered in '{0}'")]
    DivisionByZero(String),

    #[error("An unexpected error occurred during yield calculation: {0}")]
    InternalError(String),
}
