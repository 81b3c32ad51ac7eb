//! Ledger error types for posting and matching operations.
//!
//! Every error here aborts the whole enclosing operation: the core never
//! partially applies postings or allocations. Only concurrency conflicts
//! are retryable, and retrying is the caller's responsibility.

use chrono::NaiveDate;
use ledgerbook_shared::types::{HeaderId, LineId, PeriodId, VatCodeId};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during posting and matching operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    // ========== Validation Errors ==========
    /// Non-brought-forward transaction must have at least one line.
    #[error("Transaction must have at least one line")]
    NoLines,

    /// Entered amounts must not be negative.
    #[error("Entered amount cannot be negative")]
    NegativeAmount,

    /// Line goods+vat sum must equal the header total.
    #[error("Line sum does not equal header total. Expected: {expected}, got: {actual}")]
    LineSumMismatch {
        /// The header total.
        expected: Decimal,
        /// The line goods+vat sum.
        actual: Decimal,
    },

    /// Line is missing a nominal account.
    #[error("Line {line} has no nominal account")]
    MissingNominalAccount {
        /// Zero-based line index.
        line: usize,
    },

    /// Line is missing a VAT code.
    #[error("Line {line} has no VAT code")]
    MissingVatCode {
        /// Zero-based line index.
        line: usize,
    },

    /// No VAT rate known for the code.
    #[error("No VAT rate found for code {0}")]
    UnknownVatCode(VatCodeId),

    // ========== Period Errors ==========
    /// Transaction date falls outside every known financial year.
    #[error("No period found for date {0}")]
    PeriodNotFound(NaiveDate),

    /// Period override references a period missing from the calendar.
    #[error("Unknown period: {0}")]
    UnknownPeriod(PeriodId),

    // ========== Matching Errors ==========
    /// Header is not a payment/refund and cannot allocate.
    #[error("Header {0} is not a payment type")]
    NotAPayment(HeaderId),

    /// Header is not an invoice/credit-note and cannot be matched against.
    #[error("Header {0} is not a matchable target")]
    NotMatchable(HeaderId),

    /// A payment cannot allocate against itself.
    #[error("Header {0} cannot be matched against itself")]
    SelfAllocation(HeaderId),

    /// Allocation target was not supplied.
    #[error("Matching target not found: {0}")]
    TargetNotFound(HeaderId),

    /// Allocation would drive a header's paid amount outside its total.
    #[error("Over-allocation against header {header}: due {due}, allocated {allocated}")]
    OverAllocation {
        /// The header whose window would be breached.
        header: HeaderId,
        /// The header's outstanding due amount.
        due: Decimal,
        /// The offending allocation value.
        allocated: Decimal,
    },

    // ========== Concurrency Errors ==========
    /// Header version mismatch: a concurrent edit won.
    #[error("Version mismatch for header {header}: expected {expected}, got {actual}")]
    VersionMismatch {
        /// The header ID.
        header: HeaderId,
        /// The version the caller read.
        expected: i64,
        /// The version found.
        actual: i64,
    },

    // ========== Internal Invariant Violations ==========
    /// Generated postings do not sum to the header total.
    #[error("Postings do not balance. Expected: {expected}, got: {actual}")]
    BalanceMismatch {
        /// The header total.
        expected: Decimal,
        /// The posting sum.
        actual: Decimal,
    },

    /// VAT row linkage found a line identifier disagreement.
    #[error("VAT row for line {vat_line} does not match line {line}")]
    VatLineMismatch {
        /// The transaction line identifier.
        line: LineId,
        /// The line identifier carried by the VAT row.
        vat_line: LineId,
    },

    /// VAT row count does not match line count.
    #[error("VAT row count {vat_rows} does not match line count {lines}")]
    VatLinkCount {
        /// Number of transaction lines.
        lines: usize,
        /// Number of VAT rows.
        vat_rows: usize,
    },
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoLines => "NO_LINES",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::LineSumMismatch { .. } => "LINE_SUM_MISMATCH",
            Self::MissingNominalAccount { .. } => "MISSING_NOMINAL_ACCOUNT",
            Self::MissingVatCode { .. } => "MISSING_VAT_CODE",
            Self::UnknownVatCode(_) => "UNKNOWN_VAT_CODE",
            Self::PeriodNotFound(_) => "PERIOD_NOT_FOUND",
            Self::UnknownPeriod(_) => "UNKNOWN_PERIOD",
            Self::NotAPayment(_) => "NOT_A_PAYMENT",
            Self::NotMatchable(_) => "NOT_MATCHABLE",
            Self::SelfAllocation(_) => "SELF_ALLOCATION",
            Self::TargetNotFound(_) => "TARGET_NOT_FOUND",
            Self::OverAllocation { .. } => "OVER_ALLOCATION",
            Self::VersionMismatch { .. } => "VERSION_MISMATCH",
            Self::BalanceMismatch { .. } => "BALANCE_MISMATCH",
            Self::VatLineMismatch { .. } => "VAT_LINE_MISMATCH",
            Self::VatLinkCount { .. } => "VAT_LINK_COUNT",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation and matching errors
            Self::NoLines
            | Self::NegativeAmount
            | Self::LineSumMismatch { .. }
            | Self::MissingNominalAccount { .. }
            | Self::MissingVatCode { .. }
            | Self::UnknownVatCode(_)
            | Self::PeriodNotFound(_)
            | Self::UnknownPeriod(_)
            | Self::NotAPayment(_)
            | Self::NotMatchable(_)
            | Self::SelfAllocation(_)
            | Self::OverAllocation { .. } => 400,

            // 404 Not Found
            Self::TargetNotFound(_) => 404,

            // 409 Conflict - concurrency errors
            Self::VersionMismatch { .. } => 409,

            // 500 Internal Server Error - invariant violations
            Self::BalanceMismatch { .. }
            | Self::VatLineMismatch { .. }
            | Self::VatLinkCount { .. } => 500,
        }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::VersionMismatch { .. })
    }
}
