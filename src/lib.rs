pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod lifecycle;
pub mod schedule;
pub mod store;
pub mod types;
pub mod views;

// re-export key types
pub use config::{LifecyclePolicy, PaymentTerms, ProjectionConfig};
pub use decimal::{Money, Rate};
pub use errors::{EngineError, Result};
pub use events::{Event, EventStore};
pub use lifecycle::{
    PartialPayment, PartialPaymentInput, Payment, PaymentLifecycleManager, PayoffPlan,
    PayoffPlanInput, PayoffProgress, PlannedPayment, PlannedPaymentInput, StatusSweeper,
};
pub use schedule::{
    AmortizationCalculator, RecurrenceGenerator, ScheduleBasis, ScheduleProjector,
};
pub use store::{InMemoryPaymentStore, PaymentStore};
pub use types::{
    AmortizationBreakdown, CustomRecurrence, LoanTerms, PaymentId, PaymentStatus,
    PlannedPaymentStatus, ProjectedPayment, RecurrenceRule,
};
pub use views::{PaymentView, PayoffPlanView};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
