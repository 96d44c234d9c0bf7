use thiserror::Error;

#[derive(Error, Debug)]
pub enum BindForgeError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Data Validation Error: {0}")]
    Validation(String),

    #[error("Unknown key '{0}'")]
    UnknownNode(String),

    #[error("Unknown ability '{0}'")]
    UnknownAbility(String),

    #[error("Distance query over an empty node selection")]
    EmptySelection,
}

pub type BfResult<T> = Result<T, BindForgeError>;
