use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use uuid::Uuid;
use veggie_core::{CatalogRepository, CoreError, CoreResult, OrderRepository, Store, VendorRepository};
use veggie_shared::models::{CustomerOrder, Invoice, OrderItem};
use veggie_shared::{display_name, AppSettings};

#[derive(Debug, Clone, Serialize)]
pub struct SalesSummary {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub total_orders: usize,
    pub total_revenue: Decimal,
    pub total_cost: Decimal,
    pub profit: Decimal,
    /// Final line totals keyed by vegetable name
    pub vegetable_sales: BTreeMap<String, Decimal>,
    /// Invoice totals keyed by vendor name
    pub vendor_purchases: BTreeMap<String, Decimal>,
}

/// Fold orders, their lines and purchase invoices into a summary.
/// Ids missing from the name maps are reported by id.
pub fn summarize(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    orders: &[CustomerOrder],
    items: &[OrderItem],
    invoices: &[Invoice],
    vegetable_names: &HashMap<Uuid, String>,
    vendor_names: &HashMap<Uuid, String>,
) -> SalesSummary {
    let total_revenue: Decimal = orders.iter().map(|order| order.total_amount).sum();
    let total_cost: Decimal = invoices.iter().map(|invoice| invoice.total_amount).sum();

    let mut vegetable_sales = BTreeMap::new();
    for item in items {
        let name = vegetable_names
            .get(&item.vegetable_id)
            .cloned()
            .unwrap_or_else(|| item.vegetable_id.to_string());
        *vegetable_sales.entry(name).or_insert(Decimal::ZERO) += item.final_total;
    }

    let mut vendor_purchases = BTreeMap::new();
    for invoice in invoices {
        let name = vendor_names
            .get(&invoice.vendor_id)
            .cloned()
            .unwrap_or_else(|| invoice.vendor_id.to_string());
        *vendor_purchases.entry(name).or_insert(Decimal::ZERO) += invoice.total_amount;
    }

    SalesSummary {
        start,
        end,
        total_orders: orders.len(),
        total_revenue,
        total_cost,
        profit: total_revenue - total_cost,
        vegetable_sales,
        vendor_purchases,
    }
}

pub struct AnalyticsService<S> {
    store: Arc<S>,
    settings: AppSettings,
}

impl<S: Store> AnalyticsService<S> {
    pub fn new(store: Arc<S>, settings: AppSettings) -> Self {
        Self { store, settings }
    }

    /// Sales, purchases and profit for orders and invoices dated within `start..=end`
    pub async fn sales_summary(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> CoreResult<SalesSummary> {
        if end < start {
            return Err(CoreError::ValidationError(format!(
                "Summary range ends ({}) before it starts ({})",
                end, start
            )));
        }

        let mut session = self.store.begin().await?;

        let orders = session.orders_between(start, end).await?;
        let mut items = Vec::new();
        for order in &orders {
            items.extend(session.order_items(order.id).await?);
        }
        let invoices = session.invoices_between(start, end).await?;

        let vegetable_names: HashMap<Uuid, String> = session
            .list_vegetables()
            .await?
            .into_iter()
            .map(|veg| (veg.id, display_name(&veg.names, self.settings.locale).to_string()))
            .collect();
        let vendor_names: HashMap<Uuid, String> = session
            .list_vendors()
            .await?
            .into_iter()
            .map(|vendor| (vendor.id, vendor.name))
            .collect();

        Ok(summarize(start, end, &orders, &items, &invoices, &vegetable_names, &vendor_names))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use rust_decimal_macros::dec;

    fn order(total: Decimal) -> CustomerOrder {
        let mut order = CustomerOrder::new(Uuid::new_v4());
        order.total_amount = total;
        order
    }

    fn line(vegetable_id: Uuid, final_total: Decimal) -> OrderItem {
        let mut item = OrderItem::new(vegetable_id, dec!(1), "kg");
        item.final_total = final_total;
        item
    }

    #[test]
    fn test_summary_totals_and_groups() {
        let tomato = Uuid::new_v4();
        let onion = Uuid::new_v4();
        let unknown = Uuid::new_v4();
        let vendor = Uuid::new_v4();

        let orders = vec![order(dec!(500)), order(dec!(250.50))];
        let items = vec![
            line(tomato, dec!(300)),
            line(onion, dec!(200)),
            line(tomato, dec!(150.50)),
            line(unknown, dec!(100)),
        ];
        let mut invoice = Invoice::new(vendor, "INV-1", Utc::now());
        invoice.total_amount = dec!(400);

        let vegetables = HashMap::from([
            (tomato, "Tomato".to_string()),
            (onion, "Onion".to_string()),
        ]);
        let vendors = HashMap::from([(vendor, "Rythu Bazaar".to_string())]);

        let end = Utc::now();
        let start = end - Duration::days(7);
        let summary = summarize(start, end, &orders, &items, &[invoice], &vegetables, &vendors);

        assert_eq!(summary.total_orders, 2);
        assert_eq!(summary.total_revenue, dec!(750.50));
        assert_eq!(summary.total_cost, dec!(400));
        assert_eq!(summary.profit, dec!(350.50));
        assert_eq!(summary.vegetable_sales["Tomato"], dec!(450.50));
        assert_eq!(summary.vegetable_sales["Onion"], dec!(200));
        assert_eq!(summary.vegetable_sales[&unknown.to_string()], dec!(100));
        assert_eq!(summary.vendor_purchases["Rythu Bazaar"], dec!(400));
    }

    #[test]
    fn test_empty_range() {
        let now = Utc::now();
        let summary = summarize(now, now, &[], &[], &[], &HashMap::new(), &HashMap::new());

        assert_eq!(summary.total_orders, 0);
        assert_eq!(summary.profit, Decimal::ZERO);
        assert!(summary.vegetable_sales.is_empty());
    }
}
