pub mod catalog;
pub mod customer;
pub mod inventory;
pub mod order;
pub mod vendor;

pub use catalog::{Vegetable, VegetableUnit};
pub use customer::{Customer, CustomerPricing, CustomerType};
pub use inventory::{InventoryItem, StockMovementKind, StockTransaction};
pub use order::{CustomerOrder, OrderItem, OrderStatus, PaymentStatus};
pub use vendor::{Invoice, InvoiceItem, InvoiceStatus, Vendor};
