use rust_decimal::Decimal;
use serde::Deserialize;
use veggie_shared::models::Customer;

use crate::{CoreError, CoreResult};

/// What to do when an unpaid order pushes a customer past their credit limit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreditPolicy {
    /// Log a warning and accept the order
    #[default]
    Warn,
    /// Reject the order
    Block,
}

impl CreditPolicy {
    pub fn check(&self, customer: &Customer, amount: Decimal) -> CoreResult<()> {
        if !customer.would_exceed_limit(amount) {
            return Ok(());
        }

        let balance = customer
            .current_credit
            .checked_add(amount)
            .ok_or_else(|| CoreError::overflow(format!("credit balance of customer {}", customer.id)))?;
        match self {
            CreditPolicy::Warn => {
                tracing::warn!(
                    "Customer {} goes over credit limit {} with balance {}",
                    customer.id,
                    customer.credit_limit,
                    balance
                );
                Ok(())
            }
            CreditPolicy::Block => Err(CoreError::CreditLimitExceeded {
                customer_id: customer.id,
                limit: customer.credit_limit,
                balance,
            }),
        }
    }
}
