use thiserror::Error;

#[derive(Error, Debug)]
pub enum LecternError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Lookup error: {0}")]
    Lookup(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Api Error: {0}")]
    Api(String),
}

pub type Result<T> = std::result::Result<T, LecternError>;
