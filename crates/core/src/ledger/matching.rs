//! Matching of payments and refunds against open items.
//!
//! An allocation moves part of a payment/refund's value onto the due
//! amount of an invoice or credit note. Both sides update symmetrically:
//! the target's paid rises by the allocated value and the payment's paid
//! rises by the net of all values in the request. Validation runs over the
//! whole request before anything is applied, so a rejected request leaves
//! every header untouched.

use std::collections::HashMap;

use ledgerbook_shared::types::{HeaderId, MatchId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::LedgerError;
use super::types::TransactionHeader;

/// Matching state of a header, derived from its paid/due amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchState {
    /// Nothing allocated yet.
    Unmatched,
    /// Partly allocated; due is nonzero.
    PartiallyMatched,
    /// Due has reached zero.
    FullyMatched,
}

impl TransactionHeader {
    /// Returns the header's matching state.
    ///
    /// The state is reversible: reducing or removing allocations moves it
    /// back toward `Unmatched`.
    #[must_use]
    pub fn match_state(&self) -> MatchState {
        if self.paid.is_zero() {
            MatchState::Unmatched
        } else if self.due.is_zero() {
            MatchState::FullyMatched
        } else {
            MatchState::PartiallyMatched
        }
    }
}

/// A requested change to the allocation against one target header.
///
/// The value is a signed delta in the target's storage sign: positive
/// against invoices, negative against credit notes. A negative delta
/// against an invoice reduces an earlier allocation.
#[derive(Debug, Clone, Copy)]
pub struct AllocationRequest {
    /// The header to allocate against.
    pub target: HeaderId,
    /// The signed allocation delta.
    pub value: Decimal,
}

/// A recorded match between a payment/refund and one target header.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Allocation {
    /// Unique identifier.
    pub id: MatchId,
    /// The allocating payment/refund header.
    pub payment: HeaderId,
    /// The target header.
    pub target: HeaderId,
    /// The signed allocated value.
    pub value: Decimal,
}

/// Returns true if a paid amount lies within the header's allocation
/// window `[0, total]` (signed).
///
/// Paid may never cross zero in the wrong direction nor exceed the total,
/// which is exactly the "due never goes negative" rule on both sides of a
/// match.
pub(crate) fn paid_within_limits(total: Decimal, paid: Decimal) -> bool {
    if total >= Decimal::ZERO {
        paid >= Decimal::ZERO && paid <= total
    } else {
        paid <= Decimal::ZERO && paid >= total
    }
}

/// Applies a set of allocation deltas from a payment/refund to its targets.
///
/// Every delta is validated against its target's allocation window and the
/// net of all deltas against the payment's own window before any header is
/// mutated; the operation is all-or-nothing. On success paid/due are
/// updated on both sides, versions are bumped, and one allocation record
/// per nonzero delta is returned for persistence.
///
/// # Errors
///
/// Returns `LedgerError::VersionMismatch` if the payment header has moved
/// past `expected_version`, `LedgerError::NotAPayment` /
/// `LedgerError::NotMatchable` / `LedgerError::SelfAllocation` /
/// `LedgerError::TargetNotFound` for role violations, and
/// `LedgerError::OverAllocation` if any window would be breached.
pub fn allocate(
    payment: &mut TransactionHeader,
    expected_version: i64,
    targets: &mut [TransactionHeader],
    requests: &[AllocationRequest],
) -> Result<Vec<Allocation>, LedgerError> {
    if payment.version != expected_version {
        return Err(LedgerError::VersionMismatch {
            header: payment.id,
            expected: expected_version,
            actual: payment.version,
        });
    }
    if !payment.tran_type.is_payment_type() {
        return Err(LedgerError::NotAPayment(payment.id));
    }

    let index: HashMap<HeaderId, usize> = targets
        .iter()
        .enumerate()
        .map(|(position, target)| (target.id, position))
        .collect();

    // Validate the whole request before applying anything.
    let mut pending: HashMap<HeaderId, Decimal> = HashMap::new();
    let mut net = Decimal::ZERO;

    for request in requests {
        if request.value.is_zero() {
            continue;
        }
        if request.target == payment.id {
            return Err(LedgerError::SelfAllocation(payment.id));
        }
        let Some(&position) = index.get(&request.target) else {
            return Err(LedgerError::TargetNotFound(request.target));
        };
        let target = &targets[position];
        if !target.tran_type.is_matchable_target() {
            return Err(LedgerError::NotMatchable(target.id));
        }

        let paid = pending.entry(target.id).or_insert(target.paid);
        let paid_after = *paid + request.value;
        if !paid_within_limits(target.total, paid_after) {
            return Err(LedgerError::OverAllocation {
                header: target.id,
                due: target.total - *paid,
                allocated: request.value,
            });
        }
        *paid = paid_after;
        net += request.value;
    }

    let payment_paid = payment.paid + net;
    if !paid_within_limits(payment.total, payment_paid) {
        return Err(LedgerError::OverAllocation {
            header: payment.id,
            due: payment.due,
            allocated: net,
        });
    }

    // Apply.
    for target in targets.iter_mut() {
        if let Some(&paid) = pending.get(&target.id) {
            if paid != target.paid {
                target.paid = paid;
                target.recompute_due();
                target.version += 1;
            }
        }
    }
    payment.paid = payment_paid;
    payment.recompute_due();
    payment.version += 1;

    let allocations: Vec<Allocation> = requests
        .iter()
        .filter(|request| !request.value.is_zero())
        .map(|request| Allocation {
            id: MatchId::new(),
            payment: payment.id,
            target: request.target,
            value: request.value,
        })
        .collect();

    debug!(
        payment = %payment.id,
        count = allocations.len(),
        net = %net,
        "allocations applied"
    );
    Ok(allocations)
}
