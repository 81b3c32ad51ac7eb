//! Sign normalization between UI amounts and stored ledger values.
//!
//! Users enter positive magnitudes; the ledger stores values signed by the
//! transaction type's nature. Natural-debit types store as entered,
//! natural-credit types store negated. The flip is a total function over
//! the type enum, so a new type cannot be added without classifying it.

use rust_decimal::Decimal;

use super::types::{Nature, TransactionType};

/// Converts a user-facing amount to its stored ledger value.
///
/// Zero maps to zero regardless of type.
#[must_use]
pub fn normalize_for_storage(tran_type: TransactionType, amount: Decimal) -> Decimal {
    if amount.is_zero() {
        return Decimal::ZERO;
    }
    match tran_type.nature() {
        Nature::Debit => amount,
        Nature::Credit => -amount,
    }
}

/// Converts a stored ledger value back to its user-facing amount.
///
/// The flip is an involution, so display conversion is the same negation.
#[must_use]
pub fn denormalize_for_display(tran_type: TransactionType, amount: Decimal) -> Decimal {
    normalize_for_storage(tran_type, amount)
}
