use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Order status in the lifecycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString)]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Delivered,
    Cancelled,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString)]
pub enum PaymentStatus {
    #[default]
    Pending,
    Partial,
    Paid,
}

/// Header of a customer order. Line items live in [`OrderItem`] rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerOrder {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub order_number: String,
    pub order_date: DateTime<Utc>,
    pub delivery_date: Option<DateTime<Utc>>,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    pub payment_status: PaymentStatus,
    pub payment_mode: Option<String>,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
    pub is_recurring: bool,
    pub recurrence_pattern: Option<String>,
    pub next_order_date: Option<DateTime<Utc>>,
}

impl CustomerOrder {
    /// An empty order for `customer_id`; number, date and total are filled in when it is placed
    pub fn new(customer_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer_id,
            order_number: String::new(),
            order_date: Utc::now(),
            delivery_date: None,
            status: OrderStatus::Pending,
            total_amount: Decimal::ZERO,
            payment_status: PaymentStatus::Pending,
            payment_mode: None,
            delivery_address: None,
            notes: None,
            is_recurring: false,
            recurrence_pattern: None,
            next_order_date: None,
        }
    }

    pub fn recurring(mut self, pattern: impl Into<String>) -> Self {
        self.is_recurring = true;
        self.recurrence_pattern = Some(pattern.into());
        self
    }

    /// Recurrence is scheduled only when the flag is set and a pattern is present
    pub fn recurrence(&self) -> Option<&str> {
        if !self.is_recurring {
            return None;
        }
        self.recurrence_pattern
            .as_deref()
            .filter(|pattern| !pattern.trim().is_empty())
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.is_recurring
            && self.status != OrderStatus::Cancelled
            && self.next_order_date.map_or(false, |next| next <= now)
    }

    /// Fresh header carrying over customer, address, recurrence and payment mode
    pub fn next_occurrence(&self) -> Self {
        Self {
            delivery_address: self.delivery_address.clone(),
            payment_mode: self.payment_mode.clone(),
            notes: self.notes.clone(),
            is_recurring: true,
            recurrence_pattern: self.recurrence_pattern.clone(),
            ..Self::new(self.customer_id)
        }
    }
}

/// An individual priced line within an order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub vegetable_id: Uuid,
    pub quantity: Decimal,
    pub unit: String,
    pub unit_price: Decimal,
    pub total: Decimal,
    pub discount_percentage: Decimal,
    pub discount_amount: Decimal,
    pub final_total: Decimal,
}

impl OrderItem {
    /// An unpriced line; prices are resolved when the order is placed
    pub fn new(vegetable_id: Uuid, quantity: Decimal, unit: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id: Uuid::nil(),
            vegetable_id,
            quantity,
            unit: unit.into(),
            unit_price: Decimal::ZERO,
            total: Decimal::ZERO,
            discount_percentage: Decimal::ZERO,
            discount_amount: Decimal::ZERO,
            final_total: Decimal::ZERO,
        }
    }

    pub fn next_occurrence(&self) -> Self {
        Self::new(self.vegetable_id, self.quantity, self.unit.clone())
    }
}
