//! Property-based tests for the matching engine.
//!
//! - `due + paid == total` holds on both sides after any allocation
//! - Paid never leaves the `[0, total]` window
//! - Rejected requests leave every header untouched
//! - Allocations are reversible

use chrono::NaiveDate;
use ledgerbook_shared::types::{HeaderId, PeriodId};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::matching::{AllocationRequest, MatchState, allocate, paid_within_limits};
use super::sign::normalize_for_storage;
use super::types::{Module, TransactionHeader, TransactionType};

/// Strategy to generate positive decimal amounts (0.01 to 10,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn make_header(tran_type: TransactionType, entered_total: Decimal) -> TransactionHeader {
    let total = normalize_for_storage(tran_type, entered_total);
    TransactionHeader {
        id: HeaderId::new(),
        module: Module::PurchaseLedger,
        tran_type,
        reference: "REF".to_string(),
        date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
        due_date: None,
        period: PeriodId::new(),
        goods: Decimal::ZERO,
        vat: Decimal::ZERO,
        total,
        paid: Decimal::ZERO,
        due: total,
        version: 1,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A valid allocation keeps `due + paid == total` on both sides and
    /// paid inside each window.
    #[test]
    fn prop_allocation_preserves_invariant(
        invoice_total in positive_amount(),
        payment_total in positive_amount(),
        fraction in 1u32..=100,
    ) {
        let cap = invoice_total.min(payment_total);
        let value = cap * Decimal::from(fraction) / Decimal::from(100u32);
        prop_assume!(!value.is_zero());

        let mut payment = make_header(TransactionType::Payment, payment_total);
        let mut targets = vec![make_header(TransactionType::Invoice, invoice_total)];
        let requests = [AllocationRequest { target: targets[0].id, value }];

        allocate(&mut payment, 1, &mut targets, &requests).unwrap();

        prop_assert_eq!(targets[0].due + targets[0].paid, targets[0].total);
        prop_assert_eq!(payment.due + payment.paid, payment.total);
        prop_assert!(paid_within_limits(targets[0].total, targets[0].paid));
        prop_assert!(paid_within_limits(payment.total, payment.paid));
    }

    /// An allocation exceeding the target's due is rejected and leaves
    /// both headers untouched.
    #[test]
    fn prop_over_allocation_leaves_state_unchanged(
        invoice_total in positive_amount(),
        excess in positive_amount(),
    ) {
        let value = invoice_total + excess;
        let mut payment = make_header(TransactionType::Payment, value + Decimal::ONE);
        let mut targets = vec![make_header(TransactionType::Invoice, invoice_total)];
        let requests = [AllocationRequest { target: targets[0].id, value }];

        let result = allocate(&mut payment, 1, &mut targets, &requests);

        prop_assert!(result.is_err());
        prop_assert_eq!(targets[0].paid, Decimal::ZERO);
        prop_assert_eq!(targets[0].due, targets[0].total);
        prop_assert_eq!(payment.paid, Decimal::ZERO);
        prop_assert_eq!(payment.version, 1);
    }

    /// Allocating and then removing the same value returns both sides to
    /// unmatched with their original due amounts.
    #[test]
    fn prop_allocation_is_reversible(
        total in positive_amount(),
    ) {
        let mut payment = make_header(TransactionType::Payment, total);
        let mut targets = vec![make_header(TransactionType::Invoice, total)];
        let target_id = targets[0].id;

        allocate(
            &mut payment,
            1,
            &mut targets,
            &[AllocationRequest { target: target_id, value: total }],
        )
        .unwrap();
        prop_assert_eq!(targets[0].match_state(), MatchState::FullyMatched);

        allocate(
            &mut payment,
            2,
            &mut targets,
            &[AllocationRequest { target: target_id, value: -total }],
        )
        .unwrap();

        prop_assert_eq!(targets[0].match_state(), MatchState::Unmatched);
        prop_assert_eq!(targets[0].due, targets[0].total);
        prop_assert_eq!(payment.match_state(), MatchState::Unmatched);
        prop_assert_eq!(payment.due, payment.total);
    }

    /// Sequential partial allocations accumulate until fully matched and
    /// never breach the window.
    #[test]
    fn prop_sequential_allocations_accumulate(
        steps in prop::collection::vec(1u32..=50, 1..10),
    ) {
        let total = Decimal::from(100u32);
        let mut payment = make_header(TransactionType::Payment, Decimal::from(1_000u32));
        let mut targets = vec![make_header(TransactionType::Invoice, total)];
        let target_id = targets[0].id;

        let mut version = 1;
        let mut allocated = Decimal::ZERO;
        for step in steps {
            let value = Decimal::from(step);
            let result = allocate(
                &mut payment,
                version,
                &mut targets,
                &[AllocationRequest { target: target_id, value }],
            );
            if allocated + value <= total {
                prop_assert!(result.is_ok());
                allocated += value;
                version += 1;
            } else {
                // The window rejects the step; nothing moved.
                prop_assert!(result.is_err());
            }
            prop_assert_eq!(targets[0].paid, allocated);
            prop_assert_eq!(targets[0].due + targets[0].paid, targets[0].total);
        }
    }

    /// Refunds against credit notes mirror payments against invoices.
    #[test]
    fn prop_credit_side_mirrors_debit_side(
        total in positive_amount(),
        fraction in 1u32..=100,
    ) {
        let value = total * Decimal::from(fraction) / Decimal::from(100u32);
        prop_assume!(!value.is_zero());

        let mut refund = make_header(TransactionType::Refund, total);
        let mut targets = vec![make_header(TransactionType::CreditNote, total)];
        let requests = [AllocationRequest { target: targets[0].id, value: -value }];

        allocate(&mut refund, 1, &mut targets, &requests).unwrap();

        prop_assert_eq!(targets[0].due + targets[0].paid, targets[0].total);
        prop_assert_eq!(refund.due + refund.paid, refund.total);
        prop_assert!(targets[0].paid <= Decimal::ZERO);
        prop_assert!(paid_within_limits(targets[0].total, targets[0].paid));
    }
}
