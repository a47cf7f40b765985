use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of stock movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum StockMovementKind {
    In,
    Out,
    Waste,
    Transfer,
}

/// Quantity on hand of one vegetable at one location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: Uuid,
    pub vegetable_id: Uuid,
    pub vegetable_name: String,
    pub quantity: Decimal,
    pub unit: String,
    pub minimum_stock: Decimal,
    pub reorder_point: Decimal,
    pub last_restocked: Option<DateTime<Utc>>,
    pub expiry_date: Option<DateTime<Utc>>,
    pub batch_number: Option<String>,
    pub location_code: String,
    pub status: String,
    pub wastage_quantity: Decimal,
    pub wastage_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InventoryItem {
    pub fn new(
        vegetable_id: Uuid,
        vegetable_name: impl Into<String>,
        unit: impl Into<String>,
        location_code: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            vegetable_id,
            vegetable_name: vegetable_name.into(),
            quantity: Decimal::ZERO,
            unit: unit.into(),
            minimum_stock: Decimal::ZERO,
            reorder_point: Decimal::ZERO,
            last_restocked: None,
            expiry_date: None,
            batch_number: None,
            location_code: location_code.into(),
            status: "Active".to_string(),
            wastage_quantity: Decimal::ZERO,
            wastage_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// A row for the same vegetable at another location, seeded with `quantity`
    pub fn relocated(&self, location_code: impl Into<String>, quantity: Decimal) -> Self {
        Self {
            quantity,
            minimum_stock: self.minimum_stock,
            reorder_point: self.reorder_point,
            status: self.status.clone(),
            ..Self::new(
                self.vegetable_id,
                self.vegetable_name.clone(),
                self.unit.clone(),
                location_code,
            )
        }
    }

    pub fn is_low_stock(&self) -> bool {
        self.quantity <= self.reorder_point
    }

    pub fn expires_within(&self, now: DateTime<Utc>, days: i64) -> bool {
        self.expiry_date
            .map_or(false, |expiry| expiry <= now + Duration::days(days))
    }
}

/// Immutable audit record of one inventory movement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockTransaction {
    pub id: Uuid,
    pub inventory_item_id: Uuid,
    pub kind: StockMovementKind,
    pub quantity: Decimal,
    pub unit: String,
    pub unit_price: Decimal,
    pub reference_number: Option<String>,
    pub notes: Option<String>,
    pub transaction_date: DateTime<Utc>,
    pub source_location: Option<String>,
    pub destination_location: Option<String>,
    pub order_id: Option<Uuid>,
    pub vendor_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
}

impl StockTransaction {
    pub fn new(
        inventory_item_id: Uuid,
        kind: StockMovementKind,
        quantity: Decimal,
        unit: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            inventory_item_id,
            kind,
            quantity,
            unit: unit.into(),
            unit_price: Decimal::ZERO,
            reference_number: None,
            notes: None,
            transaction_date: Utc::now(),
            source_location: None,
            destination_location: None,
            order_id: None,
            vendor_id: None,
            customer_id: None,
        }
    }

    pub fn transfer(
        inventory_item_id: Uuid,
        quantity: Decimal,
        unit: impl Into<String>,
        destination: impl Into<String>,
    ) -> Self {
        Self {
            destination_location: Some(destination.into()),
            ..Self::new(inventory_item_id, StockMovementKind::Transfer, quantity, unit)
        }
    }

    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference_number = Some(reference.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_low_stock_and_expiry() {
        let now = Utc::now();
        let mut item = InventoryItem::new(Uuid::new_v4(), "Tomato", "kg", "MAIN");
        item.quantity = dec!(4);
        item.reorder_point = dec!(5);
        item.expiry_date = Some(now + Duration::days(2));

        assert!(item.is_low_stock());
        assert!(item.expires_within(now, 3));
        assert!(!item.expires_within(now, 1));
    }

    #[test]
    fn test_relocated_copies_thresholds() {
        let mut item = InventoryItem::new(Uuid::new_v4(), "Onion", "kg", "MAIN");
        item.quantity = dec!(50);
        item.reorder_point = dec!(10);
        item.wastage_quantity = dec!(2);

        let moved = item.relocated("SHOP", dec!(5));
        assert_ne!(moved.id, item.id);
        assert_eq!(moved.vegetable_id, item.vegetable_id);
        assert_eq!(moved.location_code, "SHOP");
        assert_eq!(moved.quantity, dec!(5));
        assert_eq!(moved.reorder_point, dec!(10));
        assert_eq!(moved.wastage_quantity, Decimal::ZERO);
    }

    #[test]
    fn test_movement_kind_codes() {
        assert_eq!(StockMovementKind::Transfer.to_string(), "TRANSFER");
        assert_eq!("WASTE".parse::<StockMovementKind>().ok(), Some(StockMovementKind::Waste));
    }
}
