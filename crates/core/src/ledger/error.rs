//! Ledger error types for validation failures.

use rust_decimal::Decimal;
use thiserror::Error;

use super::entry::EntryKind;

/// Errors that can occur while validating a ledger operation.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Entry amount cannot be zero.
    #[error("Amount cannot be zero")]
    ZeroAmount,

    /// Credit and debit operations take a positive magnitude.
    #[error("Amount must be positive")]
    NegativeAmount,

    /// Every entry needs a description.
    #[error("Description cannot be empty")]
    EmptyDescription,

    /// The kind cannot be used for a credit entry.
    #[error("Entry kind {0} cannot add credits")]
    KindNotCreditable(EntryKind),

    /// The debit would take the balance below zero.
    #[error("Insufficient credits: requested {requested}, available {available}")]
    InsufficientFunds {
        /// The amount the caller tried to remove.
        requested: Decimal,
        /// The balance available at validation time.
        available: Decimal,
    },

    /// The stored balance disagrees with the entry history.
    #[error("Balance mismatch: ledger total {ledger_total} != stored balance {balance}")]
    BalanceMismatch {
        /// Sum of all entry amounts.
        ledger_total: Decimal,
        /// The balance recorded on the account.
        balance: Decimal,
    },
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::ZeroAmount => "ZERO_AMOUNT",
            Self::NegativeAmount => "NEGATIVE_AMOUNT",
            Self::EmptyDescription => "EMPTY_DESCRIPTION",
            Self::KindNotCreditable(_) => "KIND_NOT_CREDITABLE",
            Self::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            Self::BalanceMismatch { .. } => "BALANCE_MISMATCH",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::ZeroAmount
            | Self::NegativeAmount
            | Self::EmptyDescription
            | Self::KindNotCreditable(_) => 400,
            Self::InsufficientFunds { .. } => 422,
            // An inconsistency between history and balance is never the
            // caller's fault.
            Self::BalanceMismatch { .. } => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(LedgerError::ZeroAmount.error_code(), "ZERO_AMOUNT");
        assert_eq!(
            LedgerError::InsufficientFunds {
                requested: dec!(150.00),
                available: dec!(100.00),
            }
            .error_code(),
            "INSUFFICIENT_FUNDS"
        );
        assert_eq!(
            LedgerError::KindNotCreditable(EntryKind::Spend).error_code(),
            "KIND_NOT_CREDITABLE"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(LedgerError::ZeroAmount.http_status_code(), 400);
        assert_eq!(LedgerError::EmptyDescription.http_status_code(), 400);
        assert_eq!(
            LedgerError::InsufficientFunds {
                requested: dec!(1),
                available: dec!(0),
            }
            .http_status_code(),
            422
        );
        assert_eq!(
            LedgerError::BalanceMismatch {
                ledger_total: dec!(10),
                balance: dec!(20),
            }
            .http_status_code(),
            500
        );
    }

    #[test]
    fn test_insufficient_funds_display_includes_both_figures() {
        let err = LedgerError::InsufficientFunds {
            requested: dec!(150.00),
            available: dec!(100.00),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient credits: requested 150.00, available 100.00"
        );
    }
}
