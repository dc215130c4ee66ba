pub mod amortization;
pub mod projector;
pub mod recurrence;

pub use amortization::AmortizationCalculator;
pub use projector::{ScheduleBasis, ScheduleProjector};
pub use recurrence::RecurrenceGenerator;
