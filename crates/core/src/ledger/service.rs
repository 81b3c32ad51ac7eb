//! Posting service: transaction creation and edit.
//!
//! The service is stateless and pure. It validates input shape, applies
//! storage signs, resolves the period, and generates every ledger row the
//! caller must persist. Nothing is written here: the enclosing database
//! transaction owns atomicity, so either all returned rows are persisted
//! together with the header or none are.

use ledgerbook_shared::config::LedgerConfig;
use ledgerbook_shared::types::{HeaderId, LineId, NominalAccountId, PeriodId, VatCodeId};
use rust_decimal::Decimal;
use tracing::info;

use super::error::LedgerError;
use super::matching::paid_within_limits;
use super::sign::normalize_for_storage;
use super::types::{
    CreateTransactionInput, EditResult, EditTransactionInput, LineInput, NominalTransaction,
    TransactionHeader, TransactionLine, TransactionResult, TransactionType, VatTransaction,
};
use super::{posting, vat};
use crate::fiscal::{ModuleSettings, PeriodCalendar};

/// Everything the posting service needs wired in from outside: the period
/// catalog, module settings, and the VAT control account.
#[derive(Debug, Clone, Copy)]
pub struct PostingContext<'a> {
    /// The financial-year/period catalog.
    pub calendar: &'a PeriodCalendar,
    /// Per-module posting settings.
    pub settings: ModuleSettings,
    /// The nominal account VAT splits post to.
    pub vat_control_account: NominalAccountId,
}

impl<'a> PostingContext<'a> {
    /// Builds a context from the loaded ledger configuration.
    #[must_use]
    pub fn from_config(config: &LedgerConfig, calendar: &'a PeriodCalendar) -> Self {
        Self {
            calendar,
            settings: ModuleSettings {
                fixed_period: config.period_override.map(PeriodId::from_uuid),
            },
            vat_control_account: NominalAccountId::from_uuid(config.vat_control_account),
        }
    }
}

/// Stateless posting service.
pub struct PostingService;

impl PostingService {
    /// Creates a transaction: header, lines, nominal postings and VAT rows.
    ///
    /// Steps: shape validation, period resolution, sign normalization,
    /// posting generation with the balance assertion, VAT generation and
    /// identifier-equality linkage. The header starts with `paid = 0` and
    /// `due = total`.
    ///
    /// # Errors
    ///
    /// Returns a validation error before any row is generated, or a
    /// posting/linkage error from the generators; in every case no partial
    /// result is returned.
    pub fn create_transaction<F>(
        input: &CreateTransactionInput,
        ctx: &PostingContext<'_>,
        vat_rate: F,
    ) -> Result<TransactionResult, LedgerError>
    where
        F: Fn(VatCodeId) -> Option<Decimal>,
    {
        validate_shape(input.tran_type, input.total, &input.lines)?;

        let period = ctx.settings.resolve_period(ctx.calendar, input.date)?;

        let tran_type = input.tran_type;
        let goods: Decimal = input.lines.iter().map(|line| line.goods).sum();
        let vat_total: Decimal = input.lines.iter().map(|line| line.vat).sum();
        let total = normalize_for_storage(tran_type, input.total);

        let header = TransactionHeader {
            id: HeaderId::new(),
            module: input.module,
            tran_type,
            reference: input.reference.clone(),
            date: input.date,
            due_date: input.due_date,
            period: period.id,
            goods: normalize_for_storage(tran_type, goods),
            vat: normalize_for_storage(tran_type, vat_total),
            total,
            paid: Decimal::ZERO,
            due: total,
            version: 1,
        };

        let mut lines = build_lines(&header, &input.lines);

        let postings = posting::post_nominal_journal(&header, &mut lines, ctx.vat_control_account)?;
        let vat_transactions = vat::post_vat_journal(&header, &lines, vat_rate)?;
        if !vat_transactions.is_empty() {
            vat::link_vat_transactions(&mut lines, &vat_transactions)?;
        }

        info!(
            header = %header.id,
            tran_type = header.tran_type.code(),
            total = %header.total,
            postings = postings.len(),
            "transaction created"
        );

        Ok(TransactionResult {
            header,
            lines,
            postings,
            vat_transactions,
        })
    }

    /// Edits a transaction's lines by reversal and repost.
    ///
    /// Posted rows are immutable, so the edit generates equal-and-opposite
    /// rows cancelling the existing postings and VAT rows, then fresh rows
    /// for the replacement lines. The header keeps its paid amount; due is
    /// recomputed against the new total and the version is bumped.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError::VersionMismatch` if the header moved past the
    /// caller's version, `LedgerError::OverAllocation` if the new total
    /// falls below the already-matched amount, or any creation-path error.
    pub fn edit_transaction<F>(
        header: &TransactionHeader,
        existing_postings: &[NominalTransaction],
        existing_vat: &[VatTransaction],
        input: &EditTransactionInput,
        ctx: &PostingContext<'_>,
        vat_rate: F,
    ) -> Result<EditResult, LedgerError>
    where
        F: Fn(VatCodeId) -> Option<Decimal>,
    {
        if header.version != input.expected_version {
            return Err(LedgerError::VersionMismatch {
                header: header.id,
                expected: input.expected_version,
                actual: header.version,
            });
        }

        validate_shape(header.tran_type, input.total, &input.lines)?;

        let tran_type = header.tran_type;
        let total = normalize_for_storage(tran_type, input.total);
        if !paid_within_limits(total, header.paid) {
            // The new total must still cover what has already been matched.
            return Err(LedgerError::OverAllocation {
                header: header.id,
                due: total,
                allocated: header.paid,
            });
        }

        let goods: Decimal = input.lines.iter().map(|line| line.goods).sum();
        let vat_total: Decimal = input.lines.iter().map(|line| line.vat).sum();

        let mut updated = header.clone();
        updated.goods = normalize_for_storage(tran_type, goods);
        updated.vat = normalize_for_storage(tran_type, vat_total);
        updated.total = total;
        updated.recompute_due();
        updated.version += 1;

        let reversing_postings = posting::reverse_postings(existing_postings);
        let reversing_vat = vat::reverse_vat_transactions(existing_vat);

        let mut lines = build_lines(&updated, &input.lines);
        let postings = posting::post_nominal_journal(&updated, &mut lines, ctx.vat_control_account)?;
        let vat_transactions = vat::post_vat_journal(&updated, &lines, vat_rate)?;
        if !vat_transactions.is_empty() {
            vat::link_vat_transactions(&mut lines, &vat_transactions)?;
        }

        info!(
            header = %updated.id,
            version = updated.version,
            reversed = reversing_postings.len(),
            reposted = postings.len(),
            "transaction edited"
        );

        Ok(EditResult {
            header: updated,
            lines,
            reversing_postings,
            postings,
            reversing_vat,
            vat_transactions,
        })
    }
}

/// Validates the input shape before any posting begins.
///
/// Amounts are UI magnitudes at this point, so negatives are rejected
/// outright. Non-brought-forward types must carry at least one line whose
/// goods+vat sum equals the header total, with nominal account and VAT
/// code present on every line.
fn validate_shape(
    tran_type: TransactionType,
    total: Decimal,
    lines: &[LineInput],
) -> Result<(), LedgerError> {
    if total < Decimal::ZERO {
        return Err(LedgerError::NegativeAmount);
    }
    for line in lines {
        if line.goods < Decimal::ZERO || line.vat < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount);
        }
    }

    if tran_type.is_brought_forward() {
        return Ok(());
    }

    if lines.is_empty() {
        return Err(LedgerError::NoLines);
    }
    let line_sum: Decimal = lines.iter().map(|line| line.goods + line.vat).sum();
    if line_sum != total {
        return Err(LedgerError::LineSumMismatch {
            expected: total,
            actual: line_sum,
        });
    }
    for (index, line) in lines.iter().enumerate() {
        if line.nominal_account.is_none() {
            return Err(LedgerError::MissingNominalAccount { line: index });
        }
        if line.vat_code.is_none() {
            return Err(LedgerError::MissingVatCode { line: index });
        }
    }

    Ok(())
}

fn build_lines(header: &TransactionHeader, inputs: &[LineInput]) -> Vec<TransactionLine> {
    inputs
        .iter()
        .map(|input| TransactionLine {
            id: LineId::new(),
            header_id: header.id,
            description: input.description.clone(),
            goods: normalize_for_storage(header.tran_type, input.goods),
            vat: normalize_for_storage(header.tran_type, input.vat),
            nominal_account: input.nominal_account,
            vat_code: input.vat_code,
            goods_nominal_transaction: None,
            vat_nominal_transaction: None,
            vat_transaction: None,
        })
        .collect()
}
