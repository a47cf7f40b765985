use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;
use veggie_catalog::{PricingResolver, StockLedger};
use veggie_core::{
    CoreError, CoreResult, CreditPolicy, CustomerRepository, InventoryRepository, OrderRepository,
    Store, StoreSession,
};
use veggie_shared::models::{
    CustomerOrder, OrderItem, PaymentStatus, StockMovementKind, StockTransaction,
};

use crate::finance::{order_total, price_line};
use crate::recurrence::next_date;

/// Knobs for order placement
#[derive(Debug, Clone)]
pub struct OrderSettings {
    /// Location whose stock is drawn down by order lines
    pub fulfilment_location: String,
    pub credit_policy: CreditPolicy,
}

impl Default for OrderSettings {
    fn default() -> Self {
        Self {
            fulfilment_location: "MAIN".to_string(),
            credit_policy: CreditPolicy::default(),
        }
    }
}

/// An order as persisted, with its priced lines and stock movements
#[derive(Debug, Clone, Serialize)]
pub struct PlacedOrder {
    pub order: CustomerOrder,
    pub items: Vec<OrderItem>,
    pub stock_transactions: Vec<StockTransaction>,
}

/// Order number unique per placement, ordered by submission time
pub fn generate_order_number(at: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("ORD{}-{}", at.format("%Y%m%d%H%M%S"), suffix[..6].to_uppercase())
}

/// Prices, persists and fulfils customer orders
pub struct OrderBuilder<S> {
    store: Arc<S>,
    settings: OrderSettings,
    pricing: PricingResolver,
    ledger: StockLedger,
}

impl<S: Store> OrderBuilder<S> {
    pub fn new(store: Arc<S>, settings: OrderSettings) -> Self {
        Self {
            store,
            settings,
            pricing: PricingResolver::new(),
            ledger: StockLedger::new(),
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn settings(&self) -> &OrderSettings {
        &self.settings
    }

    /// Create an order and its lines as one atomic unit.
    /// Nothing is persisted unless every step succeeds.
    pub async fn create_order(
        &self,
        order: CustomerOrder,
        items: Vec<OrderItem>,
    ) -> CoreResult<PlacedOrder> {
        let mut session = self.store.begin().await?;
        let placed = self.place(&mut session, order, items).await?;
        session.commit().await?;

        info!(
            "Order {} placed for customer {}: {} lines, total {}",
            placed.order.order_number,
            placed.order.customer_id,
            placed.items.len(),
            placed.order.total_amount
        );
        Ok(placed)
    }

    /// Run the placement steps inside an already open session. The caller commits.
    pub async fn place(
        &self,
        session: &mut S::Session,
        mut order: CustomerOrder,
        mut items: Vec<OrderItem>,
    ) -> CoreResult<PlacedOrder> {
        validate_lines(&items)?;

        let mut customer = session
            .customer(order.customer_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Customer", order.customer_id))?;

        let now = Utc::now();
        order.order_number = generate_order_number(now);
        order.order_date = now;

        for item in items.iter_mut() {
            let quote = self
                .pricing
                .resolve(session, order.customer_id, item.vegetable_id, &item.unit, item.quantity, now)
                .await?;
            price_line(item, &quote)?;
            debug!(
                "Priced {} {} of {} at {} ({:?}, {}% off)",
                item.quantity, item.unit, item.vegetable_id, item.unit_price, quote.source, item.discount_percentage
            );
        }
        order.total_amount = order_total(&items)?;

        order.next_order_date = match order.recurrence() {
            Some(pattern) => Some(next_date(order.order_date, pattern)?),
            None => None,
        };

        session.insert_order(&order).await?;
        for item in items.iter_mut() {
            item.order_id = order.id;
            session.insert_order_item(item).await?;
        }

        let mut stock_transactions = Vec::with_capacity(items.len());
        for item in &items {
            let movement = self.outbound_movement(session, &order, item, now).await?;
            stock_transactions.push(self.ledger.apply(session, movement).await?);
        }

        if order.payment_status != PaymentStatus::Paid {
            self.settings.credit_policy.check(&customer, order.total_amount)?;
            customer.current_credit = customer
                .current_credit
                .checked_add(order.total_amount)
                .ok_or_else(|| CoreError::overflow(format!("credit balance of customer {}", customer.id)))?;
            customer.updated_at = now;
            session.save_customer(&customer).await?;
        }

        Ok(PlacedOrder {
            order,
            items,
            stock_transactions,
        })
    }

    async fn outbound_movement(
        &self,
        session: &mut S::Session,
        order: &CustomerOrder,
        item: &OrderItem,
        at: DateTime<Utc>,
    ) -> CoreResult<StockTransaction> {
        let location = &self.settings.fulfilment_location;
        let inventory = session
            .inventory_at_location(item.vegetable_id, location)
            .await?
            .ok_or_else(|| {
                CoreError::not_found("Inventory item", format!("{} at {}", item.vegetable_id, location))
            })?;

        let mut movement =
            StockTransaction::new(inventory.id, StockMovementKind::Out, item.quantity, item.unit.clone())
                .with_reference(order.order_number.clone());
        movement.unit_price = item.unit_price;
        movement.transaction_date = at;
        movement.order_id = Some(order.id);
        movement.customer_id = Some(order.customer_id);
        Ok(movement)
    }
}

fn validate_lines(items: &[OrderItem]) -> CoreResult<()> {
    if items.is_empty() {
        return Err(CoreError::ValidationError("Order has no line items".to_string()));
    }

    if let Some(item) = items.iter().find(|item| item.quantity <= Decimal::ZERO) {
        return Err(CoreError::ValidationError(format!(
            "Quantity for vegetable {} must be positive, got {}",
            item.vegetable_id, item.quantity
        )));
    }

    Ok(())
}
