use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;
use veggie_shared::models::{
    Customer, CustomerOrder, CustomerPricing, InventoryItem, Invoice, InvoiceItem, OrderItem,
    StockTransaction, Vegetable, VegetableUnit, Vendor,
};

use crate::CoreResult;

/// Opens store sessions. Every session is one atomic unit of work.
#[async_trait]
pub trait Store: Send + Sync {
    type Session: StoreSession;

    async fn begin(&self) -> CoreResult<Self::Session>;
}

/// An open transaction on the store. Writes become visible on `commit`;
/// dropping the session without committing discards them.
#[async_trait]
pub trait StoreSession:
    CatalogRepository
    + CustomerRepository
    + OrderRepository
    + InventoryRepository
    + VendorRepository
    + Send
{
    async fn commit(self) -> CoreResult<()>;
}

/// Repository trait for the vegetable catalog
#[async_trait]
pub trait CatalogRepository: Send {
    async fn vegetable(&mut self, id: Uuid) -> CoreResult<Option<Vegetable>>;

    async fn list_vegetables(&mut self) -> CoreResult<Vec<Vegetable>>;

    async fn save_vegetable(&mut self, vegetable: &Vegetable) -> CoreResult<()>;

    async fn delete_vegetable(&mut self, id: Uuid) -> CoreResult<()>;

    async fn list_units(&mut self) -> CoreResult<Vec<VegetableUnit>>;

    async fn save_unit(&mut self, unit: &VegetableUnit) -> CoreResult<()>;
}

/// Repository trait for customers and their special prices
#[async_trait]
pub trait CustomerRepository: Send {
    async fn customer(&mut self, id: Uuid) -> CoreResult<Option<Customer>>;

    async fn list_customers(&mut self) -> CoreResult<Vec<Customer>>;

    /// Insert or update by id
    async fn save_customer(&mut self, customer: &Customer) -> CoreResult<()>;

    /// All pricing rows for the pair, regardless of validity
    async fn pricing_rows(
        &mut self,
        customer_id: Uuid,
        vegetable_id: Uuid,
    ) -> CoreResult<Vec<CustomerPricing>>;

    async fn save_pricing(&mut self, pricing: &CustomerPricing) -> CoreResult<()>;
}

/// Repository trait for customer orders
#[async_trait]
pub trait OrderRepository: Send {
    async fn insert_order(&mut self, order: &CustomerOrder) -> CoreResult<()>;

    async fn update_order(&mut self, order: &CustomerOrder) -> CoreResult<()>;

    async fn order(&mut self, id: Uuid) -> CoreResult<Option<CustomerOrder>>;

    async fn insert_order_item(&mut self, item: &OrderItem) -> CoreResult<()>;

    async fn order_items(&mut self, order_id: Uuid) -> CoreResult<Vec<OrderItem>>;

    /// Newest first
    async fn orders_for_customer(&mut self, customer_id: Uuid) -> CoreResult<Vec<CustomerOrder>>;

    /// Recurring, not cancelled, with a next order date set
    async fn scheduled_orders(&mut self) -> CoreResult<Vec<CustomerOrder>>;

    async fn orders_between(
        &mut self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> CoreResult<Vec<CustomerOrder>>;
}

/// Repository trait for stock on hand and its audit trail
#[async_trait]
pub trait InventoryRepository: Send {
    async fn inventory_item(&mut self, id: Uuid) -> CoreResult<Option<InventoryItem>>;

    async fn inventory_at_location(
        &mut self,
        vegetable_id: Uuid,
        location_code: &str,
    ) -> CoreResult<Option<InventoryItem>>;

    async fn list_inventory(&mut self) -> CoreResult<Vec<InventoryItem>>;

    async fn insert_inventory_item(&mut self, item: &InventoryItem) -> CoreResult<()>;

    async fn update_inventory_item(&mut self, item: &InventoryItem) -> CoreResult<()>;

    async fn insert_stock_transaction(&mut self, transaction: &StockTransaction) -> CoreResult<()>;

    /// Newest first
    async fn stock_transactions(
        &mut self,
        inventory_item_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> CoreResult<Vec<StockTransaction>>;
}

/// Repository trait for vendors and their purchase invoices
#[async_trait]
pub trait VendorRepository: Send {
    async fn vendor(&mut self, id: Uuid) -> CoreResult<Option<Vendor>>;

    async fn list_vendors(&mut self) -> CoreResult<Vec<Vendor>>;

    async fn save_vendor(&mut self, vendor: &Vendor) -> CoreResult<()>;

    async fn delete_vendor(&mut self, id: Uuid) -> CoreResult<()>;

    async fn insert_invoice(&mut self, invoice: &Invoice) -> CoreResult<()>;

    async fn insert_invoice_item(&mut self, item: &InvoiceItem) -> CoreResult<()>;

    async fn invoices_for_vendor(&mut self, vendor_id: Uuid) -> CoreResult<Vec<Invoice>>;

    async fn invoice_items(&mut self, invoice_id: Uuid) -> CoreResult<Vec<InvoiceItem>>;

    async fn invoices_between(
        &mut self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> CoreResult<Vec<Invoice>>;
}
