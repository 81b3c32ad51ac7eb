//! Period resolution against the financial-year calendar.

use chrono::NaiveDate;
use ledgerbook_shared::types::PeriodId;
use serde::{Deserialize, Serialize};

use super::period::{FinancialYear, Period};
use crate::ledger::error::LedgerError;

/// The full catalog of financial years known to the system.
///
/// Years are held in date order and must not overlap. Resolution walks the
/// years to find the one containing a date, then the period within it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PeriodCalendar {
    /// Financial years in ascending date order.
    pub years: Vec<FinancialYear>,
}

impl PeriodCalendar {
    /// Creates a calendar from a list of financial years.
    #[must_use]
    pub fn new(years: Vec<FinancialYear>) -> Self {
        Self { years }
    }

    /// Resolves the period a transaction date falls into.
    ///
    /// A date outside every known financial year is a hard failure: an
    /// unresolvable period breaks reporting, so there is no silent default.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::PeriodNotFound` if no year or period contains
    /// the date.
    pub fn resolve(&self, date: NaiveDate) -> Result<&Period, LedgerError> {
        self.years
            .iter()
            .find(|year| year.contains_date(date))
            .and_then(|year| year.periods.iter().find(|p| p.contains_date(date)))
            .ok_or(LedgerError::PeriodNotFound(date))
    }

    /// Looks up a period by its identifier.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::UnknownPeriod` if no year contains the period.
    pub fn period_by_id(&self, id: PeriodId) -> Result<&Period, LedgerError> {
        self.years
            .iter()
            .flat_map(|year| year.periods.iter())
            .find(|p| p.id == id)
            .ok_or(LedgerError::UnknownPeriod(id))
    }
}

/// Per-module posting settings.
///
/// A module normally buckets transactions by calendar date; a fixed period
/// override pins every posting to one period instead.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ModuleSettings {
    /// Fixed period override, if set.
    pub fixed_period: Option<PeriodId>,
}

impl ModuleSettings {
    /// Resolves the period for a transaction date, honoring the override.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::UnknownPeriod` if the override references a
    /// period missing from the calendar, or `LedgerError::PeriodNotFound`
    /// if date resolution fails.
    pub fn resolve_period<'a>(
        &self,
        calendar: &'a PeriodCalendar,
        date: NaiveDate,
    ) -> Result<&'a Period, LedgerError> {
        match self.fixed_period {
            Some(id) => calendar.period_by_id(id),
            None => calendar.resolve(date),
        }
    }
}
