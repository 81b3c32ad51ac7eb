//! Double-entry posting and matching logic.
//!
//! This module implements the posting core:
//! - Sign normalization between UI and stored ledger values
//! - Nominal posting generation with the balance assertion
//! - VAT ledger mirroring and identifier-equality linkage
//! - Matching of payments/refunds against open items
//! - Domain types and error types
//! - The stateless posting service facade

pub mod error;
pub mod matching;
pub mod posting;
pub mod service;
pub mod sign;
pub mod types;
pub mod vat;

#[cfg(test)]
mod matching_props;
#[cfg(test)]
mod posting_props;

pub use error::LedgerError;
pub use matching::{Allocation, AllocationRequest, MatchState, allocate};
pub use posting::{post_nominal_journal, reverse_postings};
pub use service::{PostingContext, PostingService};
pub use sign::{denormalize_for_display, normalize_for_storage};
pub use types::{
    CreateTransactionInput, EditResult, EditTransactionInput, FieldTag, LineInput, Module,
    Nature, NominalTransaction, TransactionHeader, TransactionLine, TransactionResult,
    TransactionType, VatTransaction,
};
pub use vat::{link_vat_transactions, post_vat_journal, reverse_vat_transactions};
