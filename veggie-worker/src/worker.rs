use chrono::Utc;
use std::sync::Arc;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, error, info};
use veggie_core::Store;
use veggie_order::RecurringOrderSweep;

/// Run the recurring-order sweep every `interval_seconds`, forever.
/// A failed pass is logged and retried on the next tick.
pub async fn start_recurring_order_worker<S: Store>(
    sweep: Arc<RecurringOrderSweep<S>>,
    interval_seconds: u64,
) {
    let mut ticker = interval(Duration::from_secs(interval_seconds.max(1)));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!("Recurring order worker started, sweeping every {}s", interval_seconds.max(1));

    loop {
        ticker.tick().await;
        match sweep.run_once(Utc::now()).await {
            Ok(report) => debug!(
                "Sweep finished: {} due, {} created, {} failed",
                report.due, report.created, report.failed
            ),
            Err(e) => error!("Recurring order sweep failed: {}", e),
        }
    }
}
