use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TaxiError {
    #[error("Invalid state encoding: {0}")]
    InvalidStateEncoding(String),

    #[error("Invalid action: {0}")]
    InvalidAction(usize),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

pub type Result<T> = std::result::Result<T, TaxiError>;
