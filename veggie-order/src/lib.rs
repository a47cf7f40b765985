pub mod analytics;
pub mod builder;
pub mod customers;
pub mod finance;
pub mod purchase;
pub mod recurrence;
pub mod scheduler;

pub use analytics::{AnalyticsService, SalesSummary};
pub use builder::{OrderBuilder, OrderSettings, PlacedOrder};
pub use customers::CustomerService;
pub use purchase::PurchaseService;
pub use recurrence::{next_date, Frequency, RecurrencePattern};
pub use scheduler::{RecurringOrderSweep, SweepReport};
