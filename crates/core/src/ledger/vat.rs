//! VAT ledger row generation and linkage.
//!
//! Every posted line is mirrored into the VAT ledger with its goods/vat
//! split, VAT code and rate. Rows are created with the line identifier as
//! an explicit foreign key; linkage back onto the lines still re-pairs by
//! identifier equality after sorting both sides, never by list position.

use std::collections::HashMap;

use ledgerbook_shared::types::{LineId, VatCodeId, VatTransactionId};
use rust_decimal::Decimal;
use tracing::debug;

use super::error::LedgerError;
use super::types::{TransactionHeader, TransactionLine, VatTransaction};

/// Generates one VAT ledger row per line.
///
/// Brought-forward types are opening balances and generate no VAT rows.
/// Zero-amount lines still get a row so VAT reporting sees zero-rated
/// splits.
///
/// # Errors
///
/// Returns `LedgerError::MissingVatCode` if a line carries no VAT code, or
/// `LedgerError::UnknownVatCode` if the rate lookup has no rate for it.
pub fn post_vat_journal<F>(
    header: &TransactionHeader,
    lines: &[TransactionLine],
    vat_rate: F,
) -> Result<Vec<VatTransaction>, LedgerError>
where
    F: Fn(VatCodeId) -> Option<Decimal>,
{
    if header.tran_type.is_brought_forward() {
        debug!(header = %header.id, tran_type = header.tran_type.code(), "brought-forward, no VAT rows");
        return Ok(Vec::new());
    }

    let mut rows = Vec::with_capacity(lines.len());

    for (index, line) in lines.iter().enumerate() {
        let Some(vat_code) = line.vat_code else {
            return Err(LedgerError::MissingVatCode { line: index });
        };
        let rate = vat_rate(vat_code).ok_or(LedgerError::UnknownVatCode(vat_code))?;

        rows.push(VatTransaction {
            id: VatTransactionId::new(),
            module: header.module,
            header: header.id,
            line: line.id,
            vat_code,
            vat_rate: rate,
            goods: line.goods,
            vat: line.vat,
            reference: header.reference.clone(),
            period: header.period,
            date: header.date,
            tran_type: header.tran_type,
        });
    }

    debug!(header = %header.id, count = rows.len(), "VAT rows generated");
    Ok(rows)
}

/// Generates equal-and-opposite VAT rows cancelling the given rows.
#[must_use]
pub fn reverse_vat_transactions(rows: &[VatTransaction]) -> Vec<VatTransaction> {
    rows.iter()
        .map(|row| VatTransaction {
            id: VatTransactionId::new(),
            goods: -row.goods,
            vat: -row.vat,
            reference: row.reference.clone(),
            ..*row
        })
        .collect()
}

/// Writes VAT-row back-references onto the originating lines.
///
/// Bulk creation does not guarantee order, so both sides are sorted by
/// line identifier and paired; any identifier disagreement is an internal
/// error. Positional pairing of unsorted lists would silently misassign.
///
/// # Errors
///
/// Returns `LedgerError::VatLinkCount` if the row count disagrees with the
/// line count, or `LedgerError::VatLineMismatch` if a sorted pair carries
/// different line identifiers.
pub fn link_vat_transactions(
    lines: &mut [TransactionLine],
    rows: &[VatTransaction],
) -> Result<(), LedgerError> {
    if lines.len() != rows.len() {
        return Err(LedgerError::VatLinkCount {
            lines: lines.len(),
            vat_rows: rows.len(),
        });
    }

    let mut line_ids: Vec<LineId> = lines.iter().map(|line| line.id).collect();
    line_ids.sort_unstable();

    let mut row_keys: Vec<(LineId, VatTransactionId)> =
        rows.iter().map(|row| (row.line, row.id)).collect();
    row_keys.sort_unstable_by_key(|(line, _)| *line);

    for (line_id, (vat_line, _)) in line_ids.iter().zip(&row_keys) {
        if line_id != vat_line {
            return Err(LedgerError::VatLineMismatch {
                line: *line_id,
                vat_line: *vat_line,
            });
        }
    }

    let by_line: HashMap<LineId, VatTransactionId> = row_keys.into_iter().collect();
    for line in lines.iter_mut() {
        line.vat_transaction = by_line.get(&line.id).copied();
    }

    Ok(())
}
