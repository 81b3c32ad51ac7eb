//! Financial year and period management.

pub mod calendar;
pub mod period;

pub use calendar::{ModuleSettings, PeriodCalendar};
pub use period::{FinancialYear, Period};
