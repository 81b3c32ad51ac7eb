//! Ledger domain types for transaction posting and matching.
//!
//! This module defines the transaction headers, lines, and posted ledger
//! rows used by the purchase ledger posting core.

use chrono::NaiveDate;
use ledgerbook_shared::types::{
    HeaderId, LineId, NominalAccountId, NominalTransactionId, PeriodId, VatCodeId,
    VatTransactionId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Ledger module a transaction is posted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Module {
    /// Purchase ledger.
    #[serde(rename = "PL")]
    PurchaseLedger,
    /// Cash book.
    #[serde(rename = "CB")]
    CashBook,
    /// Nominal ledger.
    #[serde(rename = "NL")]
    NominalLedger,
}

impl Module {
    /// Returns the two-letter module code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::PurchaseLedger => "PL",
            Self::CashBook => "CB",
            Self::NominalLedger => "NL",
        }
    }
}

/// Sign nature of a transaction type.
///
/// Natural-debit types are stored as entered; natural-credit types are
/// stored negated and negated back for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Nature {
    /// Stored with the sign the user entered.
    Debit,
    /// Stored with the entered magnitude negated.
    Credit,
}

/// Transaction type classification.
///
/// A fixed enumeration of type codes. Brought-forward variants represent
/// opening balances predating system adoption and are excluded from
/// nominal posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    /// Invoice.
    #[serde(rename = "pi")]
    Invoice,
    /// Credit note.
    #[serde(rename = "pc")]
    CreditNote,
    /// Payment.
    #[serde(rename = "pp")]
    Payment,
    /// Refund.
    #[serde(rename = "pr")]
    Refund,
    /// Brought-forward invoice.
    #[serde(rename = "pbi")]
    BroughtForwardInvoice,
    /// Brought-forward credit note.
    #[serde(rename = "pbc")]
    BroughtForwardCreditNote,
    /// Brought-forward payment.
    #[serde(rename = "pbp")]
    BroughtForwardPayment,
    /// Brought-forward refund.
    #[serde(rename = "pbr")]
    BroughtForwardRefund,
}

impl TransactionType {
    /// Returns the short type code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Invoice => "pi",
            Self::CreditNote => "pc",
            Self::Payment => "pp",
            Self::Refund => "pr",
            Self::BroughtForwardInvoice => "pbi",
            Self::BroughtForwardCreditNote => "pbc",
            Self::BroughtForwardPayment => "pbp",
            Self::BroughtForwardRefund => "pbr",
        }
    }

    /// Returns the sign nature of this type.
    #[must_use]
    pub const fn nature(&self) -> Nature {
        match self {
            Self::Invoice
            | Self::Payment
            | Self::BroughtForwardInvoice
            | Self::BroughtForwardPayment => Nature::Debit,
            Self::CreditNote
            | Self::Refund
            | Self::BroughtForwardCreditNote
            | Self::BroughtForwardRefund => Nature::Credit,
        }
    }

    /// Returns true for brought-forward (opening balance) types.
    #[must_use]
    pub const fn is_brought_forward(&self) -> bool {
        matches!(
            self,
            Self::BroughtForwardInvoice
                | Self::BroughtForwardCreditNote
                | Self::BroughtForwardPayment
                | Self::BroughtForwardRefund
        )
    }

    /// Returns true for payment/refund types, the sources of matching.
    #[must_use]
    pub const fn is_payment_type(&self) -> bool {
        matches!(
            self,
            Self::Payment
                | Self::Refund
                | Self::BroughtForwardPayment
                | Self::BroughtForwardRefund
        )
    }

    /// Returns true for invoice/credit-note types, the targets of matching.
    #[must_use]
    pub const fn is_matchable_target(&self) -> bool {
        matches!(
            self,
            Self::Invoice
                | Self::CreditNote
                | Self::BroughtForwardInvoice
                | Self::BroughtForwardCreditNote
        )
    }
}

/// Field a nominal posting was generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldTag {
    /// Goods value posted to the line's nominal account.
    #[serde(rename = "g")]
    Goods,
    /// VAT value posted to the VAT control account.
    #[serde(rename = "v")]
    Vat,
}

/// A transaction header.
///
/// All monetary fields hold stored (signed) ledger values. The invariant
/// `due == total - paid` holds after every mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionHeader {
    /// Unique identifier.
    pub id: HeaderId,
    /// Module this header was posted from.
    pub module: Module,
    /// Transaction type.
    pub tran_type: TransactionType,
    /// Reference (e.g., supplier invoice number).
    pub reference: String,
    /// Transaction date.
    pub date: NaiveDate,
    /// Due date, if any.
    pub due_date: Option<NaiveDate>,
    /// Period the transaction is bucketed into.
    pub period: PeriodId,
    /// Goods total.
    pub goods: Decimal,
    /// VAT total.
    pub vat: Decimal,
    /// Transaction total.
    pub total: Decimal,
    /// Amount matched so far.
    pub paid: Decimal,
    /// Amount outstanding.
    pub due: Decimal,
    /// Optimistic concurrency counter, bumped on every mutation.
    pub version: i64,
}

impl TransactionHeader {
    /// Re-establishes the `due == total - paid` invariant.
    pub fn recompute_due(&mut self) {
        self.due = self.total - self.paid;
    }
}

/// A transaction line.
///
/// Belongs to exactly one header. The nominal-transaction and
/// vat-transaction fields are linkage back-references, set once the
/// corresponding ledger rows have been generated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionLine {
    /// Unique identifier.
    pub id: LineId,
    /// Header this line belongs to.
    pub header_id: HeaderId,
    /// Line description.
    pub description: String,
    /// Goods amount (stored sign).
    pub goods: Decimal,
    /// VAT amount (stored sign).
    pub vat: Decimal,
    /// Nominal account the goods value posts to. Brought-forward lines
    /// carry no account.
    pub nominal_account: Option<NominalAccountId>,
    /// VAT code. Brought-forward lines carry no code.
    pub vat_code: Option<VatCodeId>,
    /// Back-reference to the goods nominal posting.
    pub goods_nominal_transaction: Option<NominalTransactionId>,
    /// Back-reference to the VAT nominal posting.
    pub vat_nominal_transaction: Option<NominalTransactionId>,
    /// Back-reference to the VAT ledger row.
    pub vat_transaction: Option<VatTransactionId>,
}

/// A posted nominal ledger row.
///
/// Immutable once created. Corrections are posted as equal-and-opposite
/// rows, never as updates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NominalTransaction {
    /// Unique identifier.
    pub id: NominalTransactionId,
    /// Module the row was posted from.
    pub module: Module,
    /// Originating header.
    pub header: HeaderId,
    /// Originating line.
    pub line: LineId,
    /// Nominal account posted to.
    pub nominal_account: NominalAccountId,
    /// Signed posted value.
    pub value: Decimal,
    /// Header reference.
    pub reference: String,
    /// Period the row is bucketed into.
    pub period: PeriodId,
    /// Transaction date.
    pub date: NaiveDate,
    /// Transaction type.
    pub tran_type: TransactionType,
    /// Field the row was generated from.
    pub field: FieldTag,
}

/// A posted VAT ledger row.
///
/// Mirrors the goods/vat split of exactly one transaction line for VAT
/// reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VatTransaction {
    /// Unique identifier.
    pub id: VatTransactionId,
    /// Module the row was posted from.
    pub module: Module,
    /// Originating header.
    pub header: HeaderId,
    /// Originating line.
    pub line: LineId,
    /// VAT code of the line.
    pub vat_code: VatCodeId,
    /// VAT rate at posting time.
    pub vat_rate: Decimal,
    /// Goods value (stored sign).
    pub goods: Decimal,
    /// VAT value (stored sign).
    pub vat: Decimal,
    /// Header reference.
    pub reference: String,
    /// Period the row is bucketed into.
    pub period: PeriodId,
    /// Transaction date.
    pub date: NaiveDate,
    /// Transaction type.
    pub tran_type: TransactionType,
}

/// Input for a single transaction line.
///
/// Amounts are UI magnitudes (non-negative); storage signs are applied by
/// the posting service.
#[derive(Debug, Clone)]
pub struct LineInput {
    /// Line description.
    pub description: String,
    /// Goods amount as entered.
    pub goods: Decimal,
    /// VAT amount as entered.
    pub vat: Decimal,
    /// Nominal account the goods value posts to.
    pub nominal_account: Option<NominalAccountId>,
    /// VAT code.
    pub vat_code: Option<VatCodeId>,
}

/// Input for creating a new transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    /// Module the transaction is posted from.
    pub module: Module,
    /// Transaction type.
    pub tran_type: TransactionType,
    /// Reference.
    pub reference: String,
    /// Transaction date.
    pub date: NaiveDate,
    /// Due date, if any.
    pub due_date: Option<NaiveDate>,
    /// Header total as entered. Must equal the line goods+vat sum for
    /// non-brought-forward types.
    pub total: Decimal,
    /// Transaction lines.
    pub lines: Vec<LineInput>,
}

/// Input for editing an existing transaction's lines.
#[derive(Debug, Clone)]
pub struct EditTransactionInput {
    /// The header version the caller read before editing.
    pub expected_version: i64,
    /// New header total as entered.
    pub total: Decimal,
    /// Replacement lines.
    pub lines: Vec<LineInput>,
}

/// Result of transaction creation: every row the caller must persist in
/// one atomic write.
#[derive(Debug)]
pub struct TransactionResult {
    /// The created header.
    pub header: TransactionHeader,
    /// The created lines, with linkage back-references set.
    pub lines: Vec<TransactionLine>,
    /// Generated nominal postings.
    pub postings: Vec<NominalTransaction>,
    /// Generated VAT ledger rows.
    pub vat_transactions: Vec<VatTransaction>,
}

/// Result of a transaction edit: reversing rows for the old state plus
/// fresh rows for the new, to persist in one atomic write.
#[derive(Debug)]
pub struct EditResult {
    /// The updated header.
    pub header: TransactionHeader,
    /// The replacement lines.
    pub lines: Vec<TransactionLine>,
    /// Equal-and-opposite postings cancelling the old rows.
    pub reversing_postings: Vec<NominalTransaction>,
    /// Fresh postings for the replacement lines.
    pub postings: Vec<NominalTransaction>,
    /// Equal-and-opposite VAT rows cancelling the old rows.
    pub reversing_vat: Vec<VatTransaction>,
    /// Fresh VAT rows for the replacement lines.
    pub vat_transactions: Vec<VatTransaction>,
}
