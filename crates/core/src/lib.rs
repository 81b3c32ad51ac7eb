//! Core business logic for Ledgerbook.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, posting rules, and matching calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Sign normalization, nominal posting, VAT mirroring, matching
//! - `fiscal` - Financial year and period management

pub mod fiscal;
pub mod ledger;
