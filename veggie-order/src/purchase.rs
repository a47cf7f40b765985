use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use veggie_core::{CoreError, CoreResult, Store, StoreSession, VendorRepository};
use veggie_shared::models::{Invoice, InvoiceItem, Vendor};

use crate::finance::{invoice_total, price_invoice_line};

/// Vendors and the purchase invoices received from them
pub struct PurchaseService<S> {
    store: Arc<S>,
}

impl<S: Store> PurchaseService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn vendors(&self) -> CoreResult<Vec<Vendor>> {
        let mut session = self.store.begin().await?;
        session.list_vendors().await
    }

    pub async fn vendor(&self, id: Uuid) -> CoreResult<Option<Vendor>> {
        let mut session = self.store.begin().await?;
        session.vendor(id).await
    }

    pub async fn save_vendor(&self, vendor: &mut Vendor) -> CoreResult<()> {
        if vendor.name.trim().is_empty() {
            return Err(CoreError::ValidationError("Vendor name is required".to_string()));
        }

        let mut session = self.store.begin().await?;
        let now = Utc::now();
        match session.vendor(vendor.id).await? {
            Some(existing) => vendor.created_at = existing.created_at,
            None => vendor.created_at = now,
        }
        vendor.updated_at = now;

        session.save_vendor(vendor).await?;
        session.commit().await
    }

    pub async fn delete_vendor(&self, id: Uuid) -> CoreResult<()> {
        let mut session = self.store.begin().await?;
        session.delete_vendor(id).await?;
        session.commit().await
    }

    /// Persist an invoice together with its lines. Line and invoice totals are recomputed.
    pub async fn create_invoice(
        &self,
        mut invoice: Invoice,
        mut items: Vec<InvoiceItem>,
    ) -> CoreResult<(Invoice, Vec<InvoiceItem>)> {
        if items.is_empty() {
            return Err(CoreError::ValidationError("Invoice has no items".to_string()));
        }
        if let Some(item) = items
            .iter()
            .find(|item| item.quantity <= Decimal::ZERO || item.price.is_sign_negative())
        {
            return Err(CoreError::ValidationError(format!(
                "Invalid invoice line for vegetable {}: quantity {}, price {}",
                item.vegetable_id, item.quantity, item.price
            )));
        }

        let mut session = self.store.begin().await?;
        session
            .vendor(invoice.vendor_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Vendor", invoice.vendor_id))?;

        for item in items.iter_mut() {
            price_invoice_line(item)?;
        }
        invoice.total_amount = invoice_total(&items)?;
        invoice.created_at = Utc::now();

        session.insert_invoice(&invoice).await?;
        for item in items.iter_mut() {
            item.invoice_id = invoice.id;
            session.insert_invoice_item(item).await?;
        }
        session.commit().await?;

        info!(
            "Invoice {} from vendor {}: {} items, total {}",
            invoice.invoice_number,
            invoice.vendor_id,
            items.len(),
            invoice.total_amount
        );
        Ok((invoice, items))
    }

    pub async fn invoices(&self, vendor_id: Uuid) -> CoreResult<Vec<Invoice>> {
        let mut session = self.store.begin().await?;
        session.invoices_for_vendor(vendor_id).await
    }

    pub async fn invoice_items(&self, invoice_id: Uuid) -> CoreResult<Vec<InvoiceItem>> {
        let mut session = self.store.begin().await?;
        session.invoice_items(invoice_id).await
    }
}
