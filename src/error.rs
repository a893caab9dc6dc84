use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgrocastError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database connection lock poisoned")]
    LockPoisoned,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("No sensor data available for field '{field_id}'")]
    NoData { field_id: String },

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Invalid {field}: {message}")]
    InvalidInput { field: String, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },
}

impl AgrocastError {
    pub fn invalid_input(field: &str, message: impl Into<String>) -> Self {
        AgrocastError::InvalidInput {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AgrocastError>;
