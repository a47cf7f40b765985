pub mod vegetable;
pub mod pricing;
pub mod inventory;

pub use vegetable::{catalog_price, seed_defaults, CatalogService};
pub use pricing::{PriceQuote, PriceSource, PricingResolver};
pub use inventory::{InventoryService, StockLedger};
