//! Nominal posting generation.
//!
//! Turns a transaction header and its lines into balanced nominal ledger
//! rows: one goods posting per line to the line's nominal account, one VAT
//! posting per line to the VAT control account. Postings are immutable;
//! corrections are posted as equal-and-opposite rows and reposted.

use ledgerbook_shared::types::{NominalAccountId, NominalTransactionId};
use rust_decimal::Decimal;
use tracing::debug;

use super::error::LedgerError;
use super::types::{FieldTag, NominalTransaction, TransactionHeader, TransactionLine};

/// Generates the nominal postings for a header and its lines.
///
/// Brought-forward types represent opening balances already reflected in
/// the nominal ledger and generate no postings. For all other types, every
/// line with a non-zero goods amount posts to its nominal account and
/// every line with a non-zero vat amount posts to the VAT control account.
/// Linkage back-references are written onto the originating lines.
///
/// After generation the postings must sum to the header total; a
/// disagreement is an internal invariant violation that aborts the whole
/// operation.
///
/// # Errors
///
/// Returns `LedgerError::MissingNominalAccount` if a line with goods has no
/// account, or `LedgerError::BalanceMismatch` if the generated postings do
/// not sum to the header total.
pub fn post_nominal_journal(
    header: &TransactionHeader,
    lines: &mut [TransactionLine],
    vat_control_account: NominalAccountId,
) -> Result<Vec<NominalTransaction>, LedgerError> {
    if header.tran_type.is_brought_forward() {
        // Opening balances never touch the nominal ledger.
        debug!(header = %header.id, tran_type = header.tran_type.code(), "brought-forward, no nominal postings");
        return Ok(Vec::new());
    }

    let mut postings = Vec::with_capacity(lines.len() * 2);

    for (index, line) in lines.iter_mut().enumerate() {
        if !line.goods.is_zero() {
            let Some(account) = line.nominal_account else {
                return Err(LedgerError::MissingNominalAccount { line: index });
            };
            let posting = make_posting(header, line, account, line.goods, FieldTag::Goods);
            line.goods_nominal_transaction = Some(posting.id);
            postings.push(posting);
        }

        if !line.vat.is_zero() {
            let posting = make_posting(header, line, vat_control_account, line.vat, FieldTag::Vat);
            line.vat_nominal_transaction = Some(posting.id);
            postings.push(posting);
        }
    }

    let posted: Decimal = postings.iter().map(|p| p.value).sum();
    if posted != header.total {
        return Err(LedgerError::BalanceMismatch {
            expected: header.total,
            actual: posted,
        });
    }

    debug!(header = %header.id, count = postings.len(), total = %posted, "nominal postings generated");
    Ok(postings)
}

/// Generates equal-and-opposite rows cancelling the given postings.
///
/// Every field is preserved except the identifier and the negated value,
/// so the reversal lands in the same period against the same accounts.
#[must_use]
pub fn reverse_postings(postings: &[NominalTransaction]) -> Vec<NominalTransaction> {
    let reversed: Vec<NominalTransaction> = postings
        .iter()
        .map(|posting| NominalTransaction {
            id: NominalTransactionId::new(),
            value: -posting.value,
            reference: posting.reference.clone(),
            ..*posting
        })
        .collect();
    debug!(count = reversed.len(), "reversing postings generated");
    reversed
}

fn make_posting(
    header: &TransactionHeader,
    line: &TransactionLine,
    nominal_account: NominalAccountId,
    value: Decimal,
    field: FieldTag,
) -> NominalTransaction {
    NominalTransaction {
        id: NominalTransactionId::new(),
        module: header.module,
        header: header.id,
        line: line.id,
        nominal_account,
        value,
        reference: header.reference.clone(),
        period: header.period,
        date: header.date,
        tran_type: header.tran_type,
        field,
    }
}
