use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vendor {
    pub id: Uuid,
    pub name: String,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vendor {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            phone_number: None,
            address: None,
            email: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString)]
pub enum InvoiceStatus {
    #[default]
    Pending,
    Paid,
    Cancelled,
}

/// Purchase invoice received from a vendor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    pub vendor_id: Uuid,
    pub date: DateTime<Utc>,
    pub total_amount: Decimal,
    pub invoice_number: String,
    pub status: InvoiceStatus,
    pub created_at: DateTime<Utc>,
}

impl Invoice {
    pub fn new(vendor_id: Uuid, invoice_number: impl Into<String>, date: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            vendor_id,
            date,
            total_amount: Decimal::ZERO,
            invoice_number: invoice_number.into(),
            status: InvoiceStatus::Pending,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceItem {
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub vegetable_id: Uuid,
    pub quantity: Decimal,
    pub price: Decimal,
    pub total: Decimal,
}

impl InvoiceItem {
    pub fn new(vegetable_id: Uuid, quantity: Decimal, price: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            invoice_id: Uuid::nil(),
            vegetable_id,
            quantity,
            price,
            total: Decimal::ZERO,
        }
    }
}
