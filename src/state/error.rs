use thiserror::Error;

#[derive(Error, Debug)]
pub enum StateError {
    #[error("Invalid value error: {0}")]
    InvalidValue(String),
    #[error("State validation failed: {0}")]
    ValidationFailed(String),
    #[error("Non-finite state: {0}")]
    NonFinite(String),
}
