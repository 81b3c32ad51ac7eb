//! Property-based tests for sign normalization and nominal posting.
//!
//! - Postings for any non-brought-forward header sum to the header total
//! - Sign normalization is total and self-inverse over the type enum
//! - Reversal and repost of identical lines nets to zero ledger effect

use chrono::NaiveDate;
use ledgerbook_shared::types::{HeaderId, LineId, NominalAccountId, PeriodId};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::posting::{post_nominal_journal, reverse_postings};
use super::sign::{denormalize_for_display, normalize_for_storage};
use super::types::{Module, Nature, TransactionHeader, TransactionLine, TransactionType};

/// Strategy to generate positive decimal amounts (0.01 to 10,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate non-negative decimal amounts (0.00 to 10,000.00).
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate a non-brought-forward transaction type.
fn posting_type() -> impl Strategy<Value = TransactionType> {
    prop_oneof![
        Just(TransactionType::Invoice),
        Just(TransactionType::CreditNote),
        Just(TransactionType::Payment),
        Just(TransactionType::Refund),
    ]
}

/// Strategy to generate any transaction type.
fn any_type() -> impl Strategy<Value = TransactionType> {
    prop_oneof![
        posting_type(),
        Just(TransactionType::BroughtForwardInvoice),
        Just(TransactionType::BroughtForwardCreditNote),
        Just(TransactionType::BroughtForwardPayment),
        Just(TransactionType::BroughtForwardRefund),
    ]
}

/// Strategy to generate line amount pairs (goods, vat).
fn line_amounts() -> impl Strategy<Value = Vec<(Decimal, Decimal)>> {
    prop::collection::vec((amount(), amount()), 1..8)
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

fn make_lines(
    header: &TransactionHeader,
    amounts: &[(Decimal, Decimal)],
) -> Vec<TransactionLine> {
    amounts
        .iter()
        .map(|(goods, vat)| TransactionLine {
            id: LineId::new(),
            header_id: header.id,
            description: "Line".to_string(),
            goods: normalize_for_storage(header.tran_type, *goods),
            vat: normalize_for_storage(header.tran_type, *vat),
            nominal_account: Some(NominalAccountId::new()),
            vat_code: None,
            goods_nominal_transaction: None,
            vat_nominal_transaction: None,
            vat_transaction: None,
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// For any non-brought-forward header, the generated postings sum to
    /// the signed header total.
    #[test]
    fn prop_postings_sum_to_header_total(
        tran_type in posting_type(),
        amounts in line_amounts(),
    ) {
        let entered_total: Decimal = amounts.iter().map(|(g, v)| *g + *v).sum();
        let header = make_header(tran_type, entered_total);
        let mut lines = make_lines(&header, &amounts);

        let postings =
            post_nominal_journal(&header, &mut lines, NominalAccountId::new()).unwrap();

        let sum: Decimal = postings.iter().map(|p| p.value).sum();
        prop_assert_eq!(sum, header.total);
    }

    /// Brought-forward headers never generate postings.
    #[test]
    fn prop_brought_forward_never_posts(
        amounts in line_amounts(),
    ) {
        let entered_total: Decimal = amounts.iter().map(|(g, v)| *g + *v).sum();
        let header = make_header(TransactionType::BroughtForwardInvoice, entered_total);
        let mut lines = make_lines(&header, &amounts);

        let postings =
            post_nominal_journal(&header, &mut lines, NominalAccountId::new()).unwrap();

        prop_assert!(postings.is_empty());
    }

    /// Natural-credit types store the negated magnitude; natural-debit
    /// types store as entered.
    #[test]
    fn prop_sign_follows_nature(
        tran_type in any_type(),
        amount in positive_amount(),
    ) {
        let stored = normalize_for_storage(tran_type, amount);
        match tran_type.nature() {
            Nature::Debit => prop_assert_eq!(stored, amount),
            Nature::Credit => prop_assert_eq!(stored, -amount),
        }
    }

    /// Display conversion inverts storage conversion.
    #[test]
    fn prop_sign_round_trips(
        tran_type in any_type(),
        amount in positive_amount(),
    ) {
        let stored = normalize_for_storage(tran_type, amount);
        prop_assert_eq!(denormalize_for_display(tran_type, stored), amount);
    }

    /// Reversing a posting set negates its sum; reposting identical lines
    /// leaves a net ledger effect of zero plus the fresh postings.
    #[test]
    fn prop_reverse_and_repost_nets_to_zero(
        tran_type in posting_type(),
        amounts in line_amounts(),
    ) {
        let entered_total: Decimal = amounts.iter().map(|(g, v)| *g + *v).sum();
        let header = make_header(tran_type, entered_total);
        let mut lines = make_lines(&header, &amounts);
        let vat_control = NominalAccountId::new();

        let postings = post_nominal_journal(&header, &mut lines, vat_control).unwrap();
        let reversed = reverse_postings(&postings);
        let reposted = post_nominal_journal(&header, &mut lines, vat_control).unwrap();

        let cancelled: Decimal = postings.iter().chain(&reversed).map(|p| p.value).sum();
        prop_assert_eq!(cancelled, Decimal::ZERO);

        let net: Decimal = postings
            .iter()
            .chain(&reversed)
            .chain(&reposted)
            .map(|p| p.value)
            .sum();
        prop_assert_eq!(net, header.total);
    }

    /// Reversal preserves account, period, and field on every row.
    #[test]
    fn prop_reversal_preserves_row_identity(
        tran_type in posting_type(),
        amounts in line_amounts(),
    ) {
        let entered_total: Decimal = amounts.iter().map(|(g, v)| *g + *v).sum();
        let header = make_header(tran_type, entered_total);
        let mut lines = make_lines(&header, &amounts);

        let postings =
            post_nominal_journal(&header, &mut lines, NominalAccountId::new()).unwrap();
        let reversed = reverse_postings(&postings);

        prop_assert_eq!(postings.len(), reversed.len());
        for (original, reversal) in postings.iter().zip(&reversed) {
            prop_assert_eq!(reversal.value, -original.value);
            prop_assert_eq!(reversal.nominal_account, original.nominal_account);
            prop_assert_eq!(reversal.period, original.period);
            prop_assert_eq!(reversal.line, original.line);
            prop_assert_eq!(reversal.field, original.field);
        }
    }
}
