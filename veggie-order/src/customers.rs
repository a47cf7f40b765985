use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;
use veggie_core::{CoreError, CoreResult, CustomerRepository, OrderRepository, Store, StoreSession};
use veggie_shared::models::{Customer, CustomerOrder, CustomerPricing, OrderItem};

pub struct CustomerService<S> {
    store: Arc<S>,
}

impl<S: Store> CustomerService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn customers(&self) -> CoreResult<Vec<Customer>> {
        let mut session = self.store.begin().await?;
        session.list_customers().await
    }

    pub async fn customer(&self, id: Uuid) -> CoreResult<Option<Customer>> {
        let mut session = self.store.begin().await?;
        session.customer(id).await
    }

    /// Insert or update. New customers get both timestamps, existing ones only `updated_at`.
    /// `current_credit` is owned by order placement: a new customer starts at zero and an
    /// existing one keeps the stored balance.
    pub async fn save(&self, customer: &mut Customer) -> CoreResult<()> {
        if customer.name.trim().is_empty() {
            return Err(CoreError::ValidationError("Customer name is required".to_string()));
        }
        if customer.credit_limit.is_sign_negative() {
            return Err(CoreError::ValidationError(format!(
                "Credit limit cannot be negative: {}",
                customer.credit_limit
            )));
        }

        let mut session = self.store.begin().await?;
        let now = Utc::now();
        match session.customer(customer.id).await? {
            Some(existing) => {
                customer.created_at = existing.created_at;
                customer.current_credit = existing.current_credit;
            }
            None => {
                customer.created_at = now;
                customer.current_credit = Decimal::ZERO;
            }
        }
        customer.updated_at = now;

        session.save_customer(customer).await?;
        session.commit().await
    }

    pub async fn save_pricing(&self, pricing: &CustomerPricing) -> CoreResult<()> {
        if pricing.special_price.is_sign_negative() {
            return Err(CoreError::ValidationError("Special price cannot be negative".to_string()));
        }
        if pricing.discount_percentage < Decimal::ZERO
            || pricing.discount_percentage > Decimal::ONE_HUNDRED
        {
            return Err(CoreError::ValidationError(format!(
                "Discount percentage {} is outside 0..=100",
                pricing.discount_percentage
            )));
        }
        if pricing.valid_to.map_or(false, |to| to < pricing.valid_from) {
            return Err(CoreError::ValidationError("Pricing ends before it starts".to_string()));
        }

        let mut session = self.store.begin().await?;
        session
            .customer(pricing.customer_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Customer", pricing.customer_id))?;
        session.save_pricing(pricing).await?;
        session.commit().await?;

        info!(
            "Saved special price {} per {} for customer {}",
            pricing.special_price, pricing.unit, pricing.customer_id
        );
        Ok(())
    }

    /// Order history, newest first
    pub async fn orders(&self, customer_id: Uuid) -> CoreResult<Vec<CustomerOrder>> {
        let mut session = self.store.begin().await?;
        session.orders_for_customer(customer_id).await
    }

    pub async fn order_items(&self, order_id: Uuid) -> CoreResult<Vec<OrderItem>> {
        let mut session = self.store.begin().await?;
        session.order_items(order_id).await
    }
}
