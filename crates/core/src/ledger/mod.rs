//! Credits ledger logic.
//!
//! This module implements the wallet core:
//! - Ledger entries (signed credit/debit records)
//! - Entry kind taxonomy
//! - Pure validation and mutation preparation
//! - Reconciliation between entry history and the stored balance
//! - Error types for ledger operations

pub mod entry;
pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use entry::{EntryKind, LedgerEntry};
pub use error::LedgerError;
pub use service::LedgerService;
pub use types::{NewLedgerEntry, PreparedMutation};
