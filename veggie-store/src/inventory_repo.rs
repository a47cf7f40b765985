use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;
use veggie_core::{CoreError, CoreResult, InventoryRepository};
use veggie_shared::models::{InventoryItem, StockTransaction};

use crate::error::{StoreError, StoreResult};
use crate::session::{decimal, enum_value, SqliteSession};

#[derive(sqlx::FromRow)]
struct InventoryRow {
    id: Uuid,
    vegetable_id: Uuid,
    vegetable_name: String,
    quantity: String,
    unit: String,
    minimum_stock: String,
    reorder_point: String,
    last_restocked: Option<DateTime<Utc>>,
    expiry_date: Option<DateTime<Utc>>,
    batch_number: Option<String>,
    location_code: String,
    status: String,
    wastage_quantity: String,
    wastage_reason: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<InventoryRow> for InventoryItem {
    type Error = StoreError;

    fn try_from(row: InventoryRow) -> StoreResult<Self> {
        Ok(InventoryItem {
            id: row.id,
            vegetable_id: row.vegetable_id,
            vegetable_name: row.vegetable_name,
            quantity: decimal("inventory_items.quantity", &row.quantity)?,
            unit: row.unit,
            minimum_stock: decimal("inventory_items.minimum_stock", &row.minimum_stock)?,
            reorder_point: decimal("inventory_items.reorder_point", &row.reorder_point)?,
            last_restocked: row.last_restocked,
            expiry_date: row.expiry_date,
            batch_number: row.batch_number,
            location_code: row.location_code,
            status: row.status,
            wastage_quantity: decimal("inventory_items.wastage_quantity", &row.wastage_quantity)?,
            wastage_reason: row.wastage_reason,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct TransactionRow {
    id: Uuid,
    inventory_item_id: Uuid,
    kind: String,
    quantity: String,
    unit: String,
    unit_price: String,
    reference_number: Option<String>,
    notes: Option<String>,
    transaction_date: DateTime<Utc>,
    source_location: Option<String>,
    destination_location: Option<String>,
    order_id: Option<Uuid>,
    vendor_id: Option<Uuid>,
    customer_id: Option<Uuid>,
}

impl TryFrom<TransactionRow> for StockTransaction {
    type Error = StoreError;

    fn try_from(row: TransactionRow) -> StoreResult<Self> {
        Ok(StockTransaction {
            id: row.id,
            inventory_item_id: row.inventory_item_id,
            kind: enum_value("stock_transactions.kind", &row.kind)?,
            quantity: decimal("stock_transactions.quantity", &row.quantity)?,
            unit: row.unit,
            unit_price: decimal("stock_transactions.unit_price", &row.unit_price)?,
            reference_number: row.reference_number,
            notes: row.notes,
            transaction_date: row.transaction_date,
            source_location: row.source_location,
            destination_location: row.destination_location,
            order_id: row.order_id,
            vendor_id: row.vendor_id,
            customer_id: row.customer_id,
        })
    }
}

const INVENTORY_COLUMNS: &str = "id, vegetable_id, vegetable_name, quantity, unit, minimum_stock, \
     reorder_point, last_restocked, expiry_date, batch_number, location_code, status, \
     wastage_quantity, wastage_reason, created_at, updated_at";

#[async_trait]
impl InventoryRepository for SqliteSession {
    async fn inventory_item(&mut self, id: Uuid) -> CoreResult<Option<InventoryItem>> {
        let row = sqlx::query_as::<_, InventoryRow>(&format!(
            "SELECT {} FROM inventory_items WHERE id = ?",
            INVENTORY_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(StoreError::from)?;

        Ok(row.map(InventoryItem::try_from).transpose()?)
    }

    async fn inventory_at_location(
        &mut self,
        vegetable_id: Uuid,
        location_code: &str,
    ) -> CoreResult<Option<InventoryItem>> {
        let row = sqlx::query_as::<_, InventoryRow>(&format!(
            "SELECT {} FROM inventory_items WHERE vegetable_id = ? AND location_code = ?",
            INVENTORY_COLUMNS
        ))
        .bind(vegetable_id)
        .bind(location_code)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(StoreError::from)?;

        Ok(row.map(InventoryItem::try_from).transpose()?)
    }

    async fn list_inventory(&mut self) -> CoreResult<Vec<InventoryItem>> {
        let rows = sqlx::query_as::<_, InventoryRow>(&format!(
            "SELECT {} FROM inventory_items ORDER BY vegetable_name, location_code",
            INVENTORY_COLUMNS
        ))
        .fetch_all(&mut *self.tx)
        .await
        .map_err(StoreError::from)?;

        let items = rows
            .into_iter()
            .map(InventoryItem::try_from)
            .collect::<StoreResult<Vec<_>>>()?;
        Ok(items)
    }

    async fn insert_inventory_item(&mut self, item: &InventoryItem) -> CoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO inventory_items (id, vegetable_id, vegetable_name, quantity, unit,
                                         minimum_stock, reorder_point, last_restocked, expiry_date,
                                         batch_number, location_code, status, wastage_quantity,
                                         wastage_reason, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(item.id)
        .bind(item.vegetable_id)
        .bind(&item.vegetable_name)
        .bind(item.quantity.to_string())
        .bind(&item.unit)
        .bind(item.minimum_stock.to_string())
        .bind(item.reorder_point.to_string())
        .bind(item.last_restocked)
        .bind(item.expiry_date)
        .bind(&item.batch_number)
        .bind(&item.location_code)
        .bind(&item.status)
        .bind(item.wastage_quantity.to_string())
        .bind(&item.wastage_reason)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&mut *self.tx)
        .await
        .map_err(StoreError::from)?;

        Ok(())
    }

    async fn update_inventory_item(&mut self, item: &InventoryItem) -> CoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE inventory_items SET
                vegetable_name = ?,
                quantity = ?,
                unit = ?,
                minimum_stock = ?,
                reorder_point = ?,
                last_restocked = ?,
                expiry_date = ?,
                batch_number = ?,
                location_code = ?,
                status = ?,
                wastage_quantity = ?,
                wastage_reason = ?,
                updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&item.vegetable_name)
        .bind(item.quantity.to_string())
        .bind(&item.unit)
        .bind(item.minimum_stock.to_string())
        .bind(item.reorder_point.to_string())
        .bind(item.last_restocked)
        .bind(item.expiry_date)
        .bind(&item.batch_number)
        .bind(&item.location_code)
        .bind(&item.status)
        .bind(item.wastage_quantity.to_string())
        .bind(&item.wastage_reason)
        .bind(item.updated_at)
        .bind(item.id)
        .execute(&mut *self.tx)
        .await
        .map_err(StoreError::from)?;

        if result.rows_affected() == 0 {
            return Err(CoreError::not_found("Inventory item", item.id));
        }
        Ok(())
    }

    async fn insert_stock_transaction(&mut self, transaction: &StockTransaction) -> CoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO stock_transactions (id, inventory_item_id, kind, quantity, unit, unit_price,
                                            reference_number, notes, transaction_date,
                                            source_location, destination_location, order_id,
                                            vendor_id, customer_id)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(transaction.id)
        .bind(transaction.inventory_item_id)
        .bind(transaction.kind.to_string())
        .bind(transaction.quantity.to_string())
        .bind(&transaction.unit)
        .bind(transaction.unit_price.to_string())
        .bind(&transaction.reference_number)
        .bind(&transaction.notes)
        .bind(transaction.transaction_date)
        .bind(&transaction.source_location)
        .bind(&transaction.destination_location)
        .bind(transaction.order_id)
        .bind(transaction.vendor_id)
        .bind(transaction.customer_id)
        .execute(&mut *self.tx)
        .await
        .map_err(StoreError::from)?;

        Ok(())
    }

    async fn stock_transactions(
        &mut self,
        inventory_item_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> CoreResult<Vec<StockTransaction>> {
        let rows = sqlx::query_as::<_, TransactionRow>(
            r#"
            SELECT id, inventory_item_id, kind, quantity, unit, unit_price, reference_number, notes,
                   transaction_date, source_location, destination_location, order_id, vendor_id,
                   customer_id
            FROM stock_transactions
            WHERE inventory_item_id = ?
            "#,
        )
        .bind(inventory_item_id)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(StoreError::from)?;

        let mut transactions = rows
            .into_iter()
            .map(StockTransaction::try_from)
            .filter(|tx| {
                tx.as_ref()
                    .map_or(true, |tx| tx.transaction_date >= start && tx.transaction_date <= end)
            })
            .collect::<StoreResult<Vec<_>>>()?;
        transactions.sort_by(|a, b| b.transaction_date.cmp(&a.transaction_date));
        Ok(transactions)
    }
}
