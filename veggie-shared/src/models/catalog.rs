use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::locale::LocalizedNames;

/// A vegetable in the catalog with its default price per selling unit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vegetable {
    pub id: Uuid,
    pub names: LocalizedNames,
    /// Unit code (`kg`, `box`, ...) to catalog price
    pub unit_prices: BTreeMap<String, Decimal>,
    pub updated_at: DateTime<Utc>,
}

impl Vegetable {
    pub fn new(names: LocalizedNames) -> Self {
        Self {
            id: Uuid::new_v4(),
            names,
            unit_prices: BTreeMap::new(),
            updated_at: Utc::now(),
        }
    }

    pub fn with_price(mut self, unit: impl Into<String>, price: Decimal) -> Self {
        self.unit_prices.insert(unit.into(), price);
        self
    }

    pub fn price_for(&self, unit: &str) -> Option<Decimal> {
        self.unit_prices.get(unit).copied()
    }
}

/// A selling unit such as a kilogram or a small bunch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VegetableUnit {
    pub id: Uuid,
    pub code: String,
    pub names: LocalizedNames,
}

impl VegetableUnit {
    pub fn new(code: impl Into<String>, names: LocalizedNames) -> Self {
        Self {
            id: Uuid::new_v4(),
            code: code.into(),
            names,
        }
    }
}
