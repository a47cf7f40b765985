use veggie_core::CoreError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid decimal '{value}' in {column}: {source}")]
    Decimal {
        column: &'static str,
        value: String,
        #[source]
        source: rust_decimal::Error,
    },

    #[error("Invalid value '{value}' in {column}")]
    Enum { column: &'static str, value: String },
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for CoreError {
    fn from(e: StoreError) -> Self {
        CoreError::StorageError(e.to_string())
    }
}
