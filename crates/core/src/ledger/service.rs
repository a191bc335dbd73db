//! Ledger service for balance mutation validation.
//!
//! This module provides the core business logic for validating
//! balance-affecting operations before they are persisted to the database.

use rust_decimal::Decimal;

use adnexus_shared::types::AccountId;

use super::entry::{EntryKind, LedgerEntry};
use super::error::LedgerError;
use super::types::{NewLedgerEntry, PreparedMutation};

/// Ledger service for mutation validation.
///
/// This service contains pure business logic with no database dependencies.
/// It validates an operation against a balance snapshot and produces the
/// entry plus the new balance; the repository applies both inside one
/// transaction while holding a lock on the account row, so the snapshot
/// cannot go stale between validation and commit.
pub struct LedgerService;

impl LedgerService {
    /// Validate a credit (deposit, refund, or positive admin adjustment).
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` if the amount is not positive, the description
    /// is empty, or the kind cannot add credits.
    pub fn prepare_credit(
        account_id: AccountId,
        balance: Decimal,
        amount: Decimal,
        description: &str,
        kind: EntryKind,
    ) -> Result<PreparedMutation, LedgerError> {
        Self::validate_positive(amount)?;
        Self::validate_description(description)?;

        if !kind.is_creditable() {
            return Err(LedgerError::KindNotCreditable(kind));
        }

        Ok(PreparedMutation {
            entry: NewLedgerEntry {
                account_id,
                amount,
                kind,
                description: description.to_string(),
            },
            balance_after: balance + amount,
        })
    }

    /// Validate a spend debit.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientFunds` if the balance cannot cover the amount;
    /// the operation must then be rejected, never clamped.
    pub fn prepare_debit(
        account_id: AccountId,
        balance: Decimal,
        amount: Decimal,
        description: &str,
    ) -> Result<PreparedMutation, LedgerError> {
        Self::validate_positive(amount)?;
        Self::validate_description(description)?;

        if balance < amount {
            return Err(LedgerError::InsufficientFunds {
                requested: amount,
                available: balance,
            });
        }

        Ok(PreparedMutation {
            entry: NewLedgerEntry {
                account_id,
                amount: -amount,
                kind: EntryKind::Spend,
                description: description.to_string(),
            },
            balance_after: balance - amount,
        })
    }

    /// Validate an admin adjustment with a signed amount.
    ///
    /// The sign determines the direction. A negative adjustment is held to
    /// the same non-negative balance invariant as a debit.
    ///
    /// # Errors
    ///
    /// Returns `ZeroAmount` for a zero adjustment, `EmptyDescription` for a
    /// missing description, or `InsufficientFunds` if a negative adjustment
    /// would overdraw the account.
    pub fn prepare_adjustment(
        account_id: AccountId,
        balance: Decimal,
        signed_amount: Decimal,
        description: &str,
    ) -> Result<PreparedMutation, LedgerError> {
        if signed_amount == Decimal::ZERO {
            return Err(LedgerError::ZeroAmount);
        }
        Self::validate_description(description)?;

        let balance_after = balance + signed_amount;
        if balance_after < Decimal::ZERO {
            return Err(LedgerError::InsufficientFunds {
                requested: -signed_amount,
                available: balance,
            });
        }

        Ok(PreparedMutation {
            entry: NewLedgerEntry {
                account_id,
                amount: signed_amount,
                kind: EntryKind::AdminAdjustment,
                description: description.to_string(),
            },
            balance_after,
        })
    }

    /// Sum of all entry amounts.
    #[must_use]
    pub fn ledger_total(entries: &[LedgerEntry]) -> Decimal {
        entries.iter().map(|e| e.amount).sum()
    }

    /// Verify that the stored balance matches the entry history.
    ///
    /// # Errors
    ///
    /// Returns `BalanceMismatch` when the sum of entry amounts disagrees
    /// with the stored balance.
    pub fn reconcile(entries: &[LedgerEntry], balance: Decimal) -> Result<(), LedgerError> {
        let ledger_total = Self::ledger_total(entries);
        if ledger_total != balance {
            return Err(LedgerError::BalanceMismatch {
                ledger_total,
                balance,
            });
        }
        Ok(())
    }

    fn validate_positive(amount: Decimal) -> Result<(), LedgerError> {
        if amount == Decimal::ZERO {
            return Err(LedgerError::ZeroAmount);
        }
        if amount < Decimal::ZERO {
            return Err(LedgerError::NegativeAmount);
        }
        Ok(())
    }

    fn validate_description(description: &str) -> Result<(), LedgerError> {
        if description.trim().is_empty() {
            return Err(LedgerError::EmptyDescription);
        }
        Ok(())
    }
}
