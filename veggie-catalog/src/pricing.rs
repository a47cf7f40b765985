use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use veggie_core::{CatalogRepository, CoreError, CoreResult, CustomerRepository};
use veggie_shared::models::{CustomerPricing, Vegetable};

use crate::vegetable::catalog_price;

/// Where a resolved price came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceSource {
    Special,
    Catalog,
}

/// Unit price and discount to apply to one order line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub unit_price: Decimal,
    pub discount_percentage: Decimal,
    pub source: PriceSource,
}

impl PriceQuote {
    pub fn special(pricing: &CustomerPricing) -> Self {
        Self {
            unit_price: pricing.special_price,
            discount_percentage: pricing.discount_percentage,
            source: PriceSource::Special,
        }
    }

    pub fn catalog(unit_price: Decimal) -> Self {
        Self {
            unit_price,
            discount_percentage: Decimal::ZERO,
            source: PriceSource::Catalog,
        }
    }
}

/// The pricing row in force at `at`. Overlapping rows should not exist;
/// if they do, the one that started most recently wins.
pub fn active_pricing(rows: &[CustomerPricing], at: DateTime<Utc>) -> Option<&CustomerPricing> {
    rows.iter()
        .filter(|row| row.is_active_at(at))
        .max_by_key(|row| row.valid_from)
}

/// Special price when a row is active and the quantity reaches its threshold,
/// otherwise the catalog price for `unit` with no discount.
///
/// The pricing row's `unit` is informational and is not matched against `unit`.
pub fn choose_price(
    pricing: Option<&CustomerPricing>,
    vegetable: Option<&Vegetable>,
    vegetable_id: Uuid,
    unit: &str,
    quantity: Decimal,
) -> CoreResult<PriceQuote> {
    if let Some(pricing) = pricing.filter(|p| p.covers_quantity(quantity)) {
        return Ok(PriceQuote::special(pricing));
    }

    let vegetable = vegetable.ok_or_else(|| CoreError::not_found("Vegetable", vegetable_id))?;
    Ok(PriceQuote::catalog(catalog_price(vegetable, unit)?))
}

/// Resolves the unit price a customer pays for a vegetable
#[derive(Debug, Clone, Copy, Default)]
pub struct PricingResolver;

impl PricingResolver {
    pub fn new() -> Self {
        Self
    }

    pub async fn resolve<S>(
        &self,
        session: &mut S,
        customer_id: Uuid,
        vegetable_id: Uuid,
        unit: &str,
        quantity: Decimal,
        at: DateTime<Utc>,
    ) -> CoreResult<PriceQuote>
    where
        S: CatalogRepository + CustomerRepository + ?Sized,
    {
        let rows = session.pricing_rows(customer_id, vegetable_id).await?;
        let pricing = active_pricing(&rows, at);

        // any line unit qualifies once the quantity threshold is met
        if let Some(pricing) = pricing.filter(|p| p.covers_quantity(quantity)) {
            return Ok(PriceQuote::special(pricing));
        }

        let vegetable = session.vegetable(vegetable_id).await?;
        choose_price(None, vegetable.as_ref(), vegetable_id, unit, quantity)
    }
}
