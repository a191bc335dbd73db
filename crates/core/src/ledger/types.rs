//! Ledger domain types for mutation preparation.

use rust_decimal::Decimal;

use adnexus_shared::types::AccountId;

use super::entry::EntryKind;

/// A validated entry ready to be persisted.
///
/// The amount is already signed: positive for credits, negative for debits.
/// It is stored as-is and never recomputed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLedgerEntry {
    /// The account the entry belongs to.
    pub account_id: AccountId,
    /// Signed amount to record.
    pub amount: Decimal,
    /// What produced this entry.
    pub kind: EntryKind,
    /// Human-readable explanation.
    pub description: String,
}

/// The result of validating a balance mutation.
///
/// Both fields must be persisted in one atomic unit: the entry insert and
/// the balance write commit together or not at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedMutation {
    /// The entry to insert.
    pub entry: NewLedgerEntry,
    /// The account balance after applying the entry.
    pub balance_after: Decimal,
}
