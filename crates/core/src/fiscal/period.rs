//! Financial year and period types.

use chrono::NaiveDate;
use ledgerbook_shared::types::{FinancialYearId, PeriodId};
use serde::{Deserialize, Serialize};

/// Financial year definition.
///
/// A financial year is an ordered run of periods. Years never overlap and
/// every posted transaction belongs to exactly one period of one year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancialYear {
    /// Unique identifier.
    pub id: FinancialYearId,
    /// Year label (e.g., "FY2026").
    pub label: String,
    /// Start date of the financial year.
    pub start_date: NaiveDate,
    /// End date of the financial year.
    pub end_date: NaiveDate,
    /// Ordered periods subdividing the year.
    pub periods: Vec<Period>,
}

impl FinancialYear {
    /// Returns true if the given date falls within this financial year.
    #[must_use]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}

/// A period within a financial year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Period {
    /// Unique identifier.
    pub id: PeriodId,
    /// Financial year this period belongs to.
    pub financial_year_id: FinancialYearId,
    /// Period number within the year (1-12 for monthly).
    pub number: i32,
    /// Start date of the period.
    pub start_date: NaiveDate,
    /// End date of the period.
    pub end_date: NaiveDate,
}

impl Period {
    /// Returns true if the given date falls within this period.
    #[must_use]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }
}
