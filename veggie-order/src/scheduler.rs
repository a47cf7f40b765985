use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;
use veggie_core::{CoreError, CoreResult, OrderRepository, Store, StoreSession};
use veggie_shared::models::{CustomerOrder, OrderItem};

use crate::builder::{OrderBuilder, PlacedOrder};

/// Outcome of one pass over the scheduled orders
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub due: usize,
    pub created: usize,
    pub failed: usize,
}

/// Re-places recurring orders whose next order date has passed
pub struct RecurringOrderSweep<S> {
    builder: Arc<OrderBuilder<S>>,
}

impl<S: Store> RecurringOrderSweep<S> {
    pub fn new(builder: Arc<OrderBuilder<S>>) -> Self {
        Self { builder }
    }

    pub async fn due_orders(&self, now: DateTime<Utc>) -> CoreResult<Vec<CustomerOrder>> {
        let mut session = self.builder.store().begin().await?;
        let scheduled = session.scheduled_orders().await?;
        Ok(scheduled.into_iter().filter(|order| order.is_due(now)).collect())
    }

    pub async fn run_once(&self, now: DateTime<Utc>) -> CoreResult<SweepReport> {
        let due = self.due_orders(now).await?;
        let mut report = SweepReport {
            due: due.len(),
            ..SweepReport::default()
        };

        for order in due {
            match self.process(order.id, now).await {
                Ok(Some(placed)) => {
                    report.created += 1;
                    info!(
                        "Recurring order {} produced {} (next on {:?})",
                        order.order_number, placed.order.order_number, placed.order.next_order_date
                    );
                }
                Ok(None) => {
                    warn!("Recurring order {} was already processed", order.order_number);
                }
                Err(e) => {
                    report.failed += 1;
                    error!("Failed to re-place recurring order {}: {}", order.order_number, e);
                }
            }
        }

        if report.due > 0 {
            info!(
                "Recurring sweep: {} due, {} created, {} failed",
                report.due, report.created, report.failed
            );
        }
        Ok(report)
    }

    /// Clone one due order and clear the source schedule in the same session.
    /// Returns `None` when the source is no longer due.
    async fn process(&self, order_id: Uuid, now: DateTime<Utc>) -> CoreResult<Option<PlacedOrder>> {
        let mut session = self.builder.store().begin().await?;

        let mut source = session
            .order(order_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Order", order_id))?;
        if !source.is_due(now) {
            return Ok(None);
        }

        let items: Vec<OrderItem> = session
            .order_items(order_id)
            .await?
            .iter()
            .map(OrderItem::next_occurrence)
            .collect();

        let placed = self
            .builder
            .place(&mut session, source.next_occurrence(), items)
            .await?;

        source.next_order_date = None;
        session.update_order(&source).await?;
        session.commit().await?;

        Ok(Some(placed))
    }
}
