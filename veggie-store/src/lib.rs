pub mod app_config;
pub mod catalog_repo;
pub mod customer_repo;
pub mod database;
pub mod error;
pub mod inventory_repo;
pub mod order_repo;
pub mod schema;
pub mod session;
pub mod vendor_repo;

pub use database::DbClient;
pub use error::{StoreError, StoreResult};
pub use session::{SqliteSession, SqliteStore};
