use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;
use veggie_core::{CoreResult, OrderRepository};
use veggie_shared::models::{CustomerOrder, OrderItem};

use crate::error::{StoreError, StoreResult};
use crate::session::{decimal, enum_value, SqliteSession};

// Internal structs for type-safe querying
#[derive(sqlx::FromRow)]
struct OrderRow {
    id: Uuid,
    customer_id: Uuid,
    order_number: String,
    order_date: DateTime<Utc>,
    delivery_date: Option<DateTime<Utc>>,
    status: String,
    total_amount: String,
    payment_status: String,
    payment_mode: Option<String>,
    delivery_address: Option<String>,
    notes: Option<String>,
    is_recurring: bool,
    recurrence_pattern: Option<String>,
    next_order_date: Option<DateTime<Utc>>,
}

impl TryFrom<OrderRow> for CustomerOrder {
    type Error = StoreError;

    fn try_from(row: OrderRow) -> StoreResult<Self> {
        Ok(CustomerOrder {
            id: row.id,
            customer_id: row.customer_id,
            order_number: row.order_number,
            order_date: row.order_date,
            delivery_date: row.delivery_date,
            status: enum_value("customer_orders.status", &row.status)?,
            total_amount: decimal("customer_orders.total_amount", &row.total_amount)?,
            payment_status: enum_value("customer_orders.payment_status", &row.payment_status)?,
            payment_mode: row.payment_mode,
            delivery_address: row.delivery_address,
            notes: row.notes,
            is_recurring: row.is_recurring,
            recurrence_pattern: row.recurrence_pattern,
            next_order_date: row.next_order_date,
        })
    }
}

#[derive(sqlx::FromRow)]
struct OrderItemRow {
    id: Uuid,
    order_id: Uuid,
    vegetable_id: Uuid,
    quantity: String,
    unit: String,
    unit_price: String,
    total: String,
    discount_percentage: String,
    discount_amount: String,
    final_total: String,
}

impl TryFrom<OrderItemRow> for OrderItem {
    type Error = StoreError;

    fn try_from(row: OrderItemRow) -> StoreResult<Self> {
        Ok(OrderItem {
            id: row.id,
            order_id: row.order_id,
            vegetable_id: row.vegetable_id,
            quantity: decimal("order_items.quantity", &row.quantity)?,
            unit: row.unit,
            unit_price: decimal("order_items.unit_price", &row.unit_price)?,
            total: decimal("order_items.total", &row.total)?,
            discount_percentage: decimal("order_items.discount_percentage", &row.discount_percentage)?,
            discount_amount: decimal("order_items.discount_amount", &row.discount_amount)?,
            final_total: decimal("order_items.final_total", &row.final_total)?,
        })
    }
}

const ORDER_COLUMNS: &str = "id, customer_id, order_number, order_date, delivery_date, status, \
     total_amount, payment_status, payment_mode, delivery_address, notes, is_recurring, \
     recurrence_pattern, next_order_date";

fn into_orders(rows: Vec<OrderRow>) -> StoreResult<Vec<CustomerOrder>> {
    rows.into_iter().map(CustomerOrder::try_from).collect()
}

impl SqliteSession {
    async fn select_orders(&mut self, filter: &str) -> StoreResult<Vec<CustomerOrder>> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {} FROM customer_orders {}",
            ORDER_COLUMNS, filter
        ))
        .fetch_all(&mut *self.tx)
        .await?;

        into_orders(rows)
    }
}

#[async_trait]
impl OrderRepository for SqliteSession {
    async fn insert_order(&mut self, order: &CustomerOrder) -> CoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO customer_orders (id, customer_id, order_number, order_date, delivery_date,
                                         status, total_amount, payment_status, payment_mode,
                                         delivery_address, notes, is_recurring, recurrence_pattern,
                                         next_order_date)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(order.id)
        .bind(order.customer_id)
        .bind(&order.order_number)
        .bind(order.order_date)
        .bind(order.delivery_date)
        .bind(order.status.to_string())
        .bind(order.total_amount.to_string())
        .bind(order.payment_status.to_string())
        .bind(&order.payment_mode)
        .bind(&order.delivery_address)
        .bind(&order.notes)
        .bind(order.is_recurring)
        .bind(&order.recurrence_pattern)
        .bind(order.next_order_date)
        .execute(&mut *self.tx)
        .await
        .map_err(StoreError::from)?;

        Ok(())
    }

    async fn update_order(&mut self, order: &CustomerOrder) -> CoreResult<()> {
        sqlx::query(
            r#"
            UPDATE customer_orders SET
                delivery_date = ?,
                status = ?,
                total_amount = ?,
                payment_status = ?,
                payment_mode = ?,
                delivery_address = ?,
                notes = ?,
                is_recurring = ?,
                recurrence_pattern = ?,
                next_order_date = ?
            WHERE id = ?
            "#,
        )
        .bind(order.delivery_date)
        .bind(order.status.to_string())
        .bind(order.total_amount.to_string())
        .bind(order.payment_status.to_string())
        .bind(&order.payment_mode)
        .bind(&order.delivery_address)
        .bind(&order.notes)
        .bind(order.is_recurring)
        .bind(&order.recurrence_pattern)
        .bind(order.next_order_date)
        .bind(order.id)
        .execute(&mut *self.tx)
        .await
        .map_err(StoreError::from)?;

        Ok(())
    }

    async fn order(&mut self, id: Uuid) -> CoreResult<Option<CustomerOrder>> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {} FROM customer_orders WHERE id = ?",
            ORDER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(StoreError::from)?;

        Ok(row.map(CustomerOrder::try_from).transpose()?)
    }

    async fn insert_order_item(&mut self, item: &OrderItem) -> CoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO order_items (id, order_id, vegetable_id, quantity, unit, unit_price, total,
                                     discount_percentage, discount_amount, final_total)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(item.id)
        .bind(item.order_id)
        .bind(item.vegetable_id)
        .bind(item.quantity.to_string())
        .bind(&item.unit)
        .bind(item.unit_price.to_string())
        .bind(item.total.to_string())
        .bind(item.discount_percentage.to_string())
        .bind(item.discount_amount.to_string())
        .bind(item.final_total.to_string())
        .execute(&mut *self.tx)
        .await
        .map_err(StoreError::from)?;

        Ok(())
    }

    async fn order_items(&mut self, order_id: Uuid) -> CoreResult<Vec<OrderItem>> {
        let rows = sqlx::query_as::<_, OrderItemRow>(
            r#"
            SELECT id, order_id, vegetable_id, quantity, unit, unit_price, total,
                   discount_percentage, discount_amount, final_total
            FROM order_items
            WHERE order_id = ?
            ORDER BY rowid
            "#,
        )
        .bind(order_id)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(StoreError::from)?;

        let items = rows
            .into_iter()
            .map(OrderItem::try_from)
            .collect::<StoreResult<Vec<_>>>()?;
        Ok(items)
    }

    async fn orders_for_customer(&mut self, customer_id: Uuid) -> CoreResult<Vec<CustomerOrder>> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {} FROM customer_orders WHERE customer_id = ?",
            ORDER_COLUMNS
        ))
        .bind(customer_id)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(StoreError::from)?;

        let mut orders = into_orders(rows)?;
        orders.sort_by(|a, b| b.order_date.cmp(&a.order_date));
        Ok(orders)
    }

    async fn scheduled_orders(&mut self) -> CoreResult<Vec<CustomerOrder>> {
        let orders = self
            .select_orders(
                "WHERE is_recurring = 1 AND status <> 'Cancelled' AND next_order_date IS NOT NULL",
            )
            .await?;
        Ok(orders)
    }

    async fn orders_between(
        &mut self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> CoreResult<Vec<CustomerOrder>> {
        // Timestamps are compared after decoding; their TEXT form does not sort reliably
        let mut orders: Vec<CustomerOrder> = self
            .select_orders("")
            .await?
            .into_iter()
            .filter(|order| order.order_date >= start && order.order_date <= end)
            .collect();
        orders.sort_by_key(|order| order.order_date);
        Ok(orders)
    }
}
