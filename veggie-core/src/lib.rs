pub mod policy;
pub mod repository;

use rust_decimal::Decimal;
use uuid::Uuid;

pub use policy::CreditPolicy;
pub use repository::{
    CatalogRepository, CustomerRepository, InventoryRepository, OrderRepository, Store,
    StoreSession, VendorRepository,
};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("Insufficient stock for inventory item {item_id}: requested {requested}, available {available}")]
    InsufficientStock {
        item_id: Uuid,
        requested: Decimal,
        available: Decimal,
    },

    #[error("Invalid waste quantity for inventory item {item_id}: requested {requested}, available {available}")]
    InvalidQuantity {
        item_id: Uuid,
        requested: Decimal,
        available: Decimal,
    },

    #[error("Invalid recurrence pattern: {0}")]
    InvalidPattern(String),

    #[error("Credit limit exceeded for customer {customer_id}: limit {limit}, balance after order {balance}")]
    CreditLimitExceeded {
        customer_id: Uuid,
        limit: Decimal,
        balance: Decimal,
    },

    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Storage error: {0}")]
    StorageError(String),
}

impl CoreError {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        CoreError::NotFound {
            entity,
            key: key.to_string(),
        }
    }

    /// Decimal arithmetic left the representable range
    pub fn overflow(what: impl std::fmt::Display) -> Self {
        CoreError::ValidationError(format!("Amount out of range computing {}", what))
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
