use thiserror::Error;

#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Transaction '{transaction_id}' has no {field}")]
    MissingNumeric {
        transaction_id: String,
        field: &'static str,
    },

    #[error("Transaction '{transaction_id}' has non-numeric {field}: '{value}'")]
    InvalidNumeric {
        transaction_id: String,
        field: &'static str,
        value: String,
    },

    #[error("{0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type MonitorResult<T> = Result<T, MonitorError>;
