use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;
use veggie_core::{CoreError, CoreResult, VendorRepository};
use veggie_shared::models::{Invoice, InvoiceItem, Vendor};

use crate::error::{StoreError, StoreResult};
use crate::session::{decimal, enum_value, SqliteSession};

#[derive(sqlx::FromRow)]
struct VendorRow {
    id: Uuid,
    name: String,
    phone_number: Option<String>,
    address: Option<String>,
    email: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<VendorRow> for Vendor {
    fn from(row: VendorRow) -> Self {
        Vendor {
            id: row.id,
            name: row.name,
            phone_number: row.phone_number,
            address: row.address,
            email: row.email,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct InvoiceRow {
    id: Uuid,
    vendor_id: Uuid,
    date: DateTime<Utc>,
    total_amount: String,
    invoice_number: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<InvoiceRow> for Invoice {
    type Error = StoreError;

    fn try_from(row: InvoiceRow) -> StoreResult<Self> {
        Ok(Invoice {
            id: row.id,
            vendor_id: row.vendor_id,
            date: row.date,
            total_amount: decimal("invoices.total_amount", &row.total_amount)?,
            invoice_number: row.invoice_number,
            status: enum_value("invoices.status", &row.status)?,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct InvoiceItemRow {
    id: Uuid,
    invoice_id: Uuid,
    vegetable_id: Uuid,
    quantity: String,
    price: String,
    total: String,
}

impl TryFrom<InvoiceItemRow> for InvoiceItem {
    type Error = StoreError;

    fn try_from(row: InvoiceItemRow) -> StoreResult<Self> {
        Ok(InvoiceItem {
            id: row.id,
            invoice_id: row.invoice_id,
            vegetable_id: row.vegetable_id,
            quantity: decimal("invoice_items.quantity", &row.quantity)?,
            price: decimal("invoice_items.price", &row.price)?,
            total: decimal("invoice_items.total", &row.total)?,
        })
    }
}

const INVOICE_COLUMNS: &str = "id, vendor_id, date, total_amount, invoice_number, status, created_at";

fn into_invoices(rows: Vec<InvoiceRow>) -> StoreResult<Vec<Invoice>> {
    rows.into_iter().map(Invoice::try_from).collect()
}

#[async_trait]
impl VendorRepository for SqliteSession {
    async fn vendor(&mut self, id: Uuid) -> CoreResult<Option<Vendor>> {
        let row = sqlx::query_as::<_, VendorRow>(
            "SELECT id, name, phone_number, address, email, created_at, updated_at FROM vendors WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(StoreError::from)?;

        Ok(row.map(Vendor::from))
    }

    async fn list_vendors(&mut self) -> CoreResult<Vec<Vendor>> {
        let rows = sqlx::query_as::<_, VendorRow>(
            "SELECT id, name, phone_number, address, email, created_at, updated_at FROM vendors ORDER BY name",
        )
        .fetch_all(&mut *self.tx)
        .await
        .map_err(StoreError::from)?;

        Ok(rows.into_iter().map(Vendor::from).collect())
    }

    async fn save_vendor(&mut self, vendor: &Vendor) -> CoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO vendors (id, name, phone_number, address, email, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                phone_number = excluded.phone_number,
                address = excluded.address,
                email = excluded.email,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(vendor.id)
        .bind(&vendor.name)
        .bind(&vendor.phone_number)
        .bind(&vendor.address)
        .bind(&vendor.email)
        .bind(vendor.created_at)
        .bind(vendor.updated_at)
        .execute(&mut *self.tx)
        .await
        .map_err(StoreError::from)?;

        Ok(())
    }

    async fn delete_vendor(&mut self, id: Uuid) -> CoreResult<()> {
        let result = sqlx::query("DELETE FROM vendors WHERE id = ?")
            .bind(id)
            .execute(&mut *self.tx)
            .await
            .map_err(StoreError::from)?;

        if result.rows_affected() == 0 {
            return Err(CoreError::not_found("Vendor", id));
        }
        Ok(())
    }

    async fn insert_invoice(&mut self, invoice: &Invoice) -> CoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO invoices (id, vendor_id, date, total_amount, invoice_number, status, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(invoice.id)
        .bind(invoice.vendor_id)
        .bind(invoice.date)
        .bind(invoice.total_amount.to_string())
        .bind(&invoice.invoice_number)
        .bind(invoice.status.to_string())
        .bind(invoice.created_at)
        .execute(&mut *self.tx)
        .await
        .map_err(StoreError::from)?;

        Ok(())
    }

    async fn insert_invoice_item(&mut self, item: &InvoiceItem) -> CoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO invoice_items (id, invoice_id, vegetable_id, quantity, price, total)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(item.id)
        .bind(item.invoice_id)
        .bind(item.vegetable_id)
        .bind(item.quantity.to_string())
        .bind(item.price.to_string())
        .bind(item.total.to_string())
        .execute(&mut *self.tx)
        .await
        .map_err(StoreError::from)?;

        Ok(())
    }

    async fn invoices_for_vendor(&mut self, vendor_id: Uuid) -> CoreResult<Vec<Invoice>> {
        let rows = sqlx::query_as::<_, InvoiceRow>(&format!(
            "SELECT {} FROM invoices WHERE vendor_id = ?",
            INVOICE_COLUMNS
        ))
        .bind(vendor_id)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(StoreError::from)?;

        let mut invoices = into_invoices(rows)?;
        invoices.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(invoices)
    }

    async fn invoice_items(&mut self, invoice_id: Uuid) -> CoreResult<Vec<InvoiceItem>> {
        let rows = sqlx::query_as::<_, InvoiceItemRow>(
            r#"
            SELECT id, invoice_id, vegetable_id, quantity, price, total
            FROM invoice_items
            WHERE invoice_id = ?
            ORDER BY rowid
            "#,
        )
        .bind(invoice_id)
        .fetch_all(&mut *self.tx)
        .await
        .map_err(StoreError::from)?;

        let items = rows
            .into_iter()
            .map(InvoiceItem::try_from)
            .collect::<StoreResult<Vec<_>>>()?;
        Ok(items)
    }

    async fn invoices_between(
        &mut self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> CoreResult<Vec<Invoice>> {
        let rows = sqlx::query_as::<_, InvoiceRow>(&format!("SELECT {} FROM invoices", INVOICE_COLUMNS))
            .fetch_all(&mut *self.tx)
            .await
            .map_err(StoreError::from)?;

        let mut invoices: Vec<Invoice> = into_invoices(rows)?
            .into_iter()
            .filter(|invoice| invoice.date >= start && invoice.date <= end)
            .collect();
        invoices.sort_by_key(|invoice| invoice.date);
        Ok(invoices)
    }
}
