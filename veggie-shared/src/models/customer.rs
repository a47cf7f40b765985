use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString)]
pub enum CustomerType {
    #[default]
    Regular,
    Wholesale,
    Retail,
}

/// A buyer of produce, with a running balance of unpaid orders
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: Uuid,
    pub name: String,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub customer_type: CustomerType,
    pub credit_limit: Decimal,
    pub current_credit: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    pub fn new(name: impl Into<String>, customer_type: CustomerType, credit_limit: Decimal) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            phone_number: None,
            email: None,
            address: None,
            customer_type,
            credit_limit,
            current_credit: Decimal::ZERO,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether charging `amount` on credit would take the balance past the limit
    pub fn would_exceed_limit(&self, amount: Decimal) -> bool {
        self.current_credit
            .checked_add(amount)
            .map_or(true, |balance| balance > self.credit_limit)
    }
}

/// Customer-specific price for a vegetable, valid inside `[valid_from, valid_to]`
/// once the ordered quantity reaches `minimum_quantity`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerPricing {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub vegetable_id: Uuid,
    pub special_price: Decimal,
    pub unit: String,
    pub valid_from: DateTime<Utc>,
    /// `None` means open-ended
    pub valid_to: Option<DateTime<Utc>>,
    pub minimum_quantity: Decimal,
    pub discount_percentage: Decimal,
}

impl CustomerPricing {
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        self.valid_from <= at && self.valid_to.map_or(true, |to| at <= to)
    }

    pub fn covers_quantity(&self, quantity: Decimal) -> bool {
        quantity >= self.minimum_quantity
    }
}
