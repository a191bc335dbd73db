//! Spend gate error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that block an ad-spend entity from being persisted.
#[derive(Debug, Error)]
pub enum AdmissionError {
    /// The funding account cannot cover one day of the entity's budget.
    #[error(
        "Insufficient credits. You need ${required} but only have ${available}. \
         Please add credits to your wallet."
    )]
    InsufficientCredits {
        /// Credits required for admission (one day's budget).
        required: Decimal,
        /// Credits available on the funding account.
        available: Decimal,
    },

    /// The daily budget is below the configured floor.
    #[error("Daily budget must be at least ${minimum}")]
    BudgetTooLow {
        /// The budget the entity carries.
        budget: Decimal,
        /// The configured floor.
        minimum: Decimal,
    },
}

impl AdmissionError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientCredits { .. } => "INSUFFICIENT_CREDITS",
            Self::BudgetTooLow { .. } => "BUDGET_TOO_LOW",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::InsufficientCredits { .. } | Self::BudgetTooLow { .. } => 422,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_insufficient_credits_message_carries_both_figures() {
        let err = AdmissionError::InsufficientCredits {
            required: dec!(25.00),
            available: dec!(10.00),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient credits. You need $25.00 but only have $10.00. \
             Please add credits to your wallet."
        );
    }

    #[test]
    fn test_budget_too_low_message() {
        let err = AdmissionError::BudgetTooLow {
            budget: dec!(5.00),
            minimum: dec!(25.00),
        };
        assert_eq!(err.to_string(), "Daily budget must be at least $25.00");
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AdmissionError::InsufficientCredits {
                required: dec!(1),
                available: dec!(0),
            }
            .error_code(),
            "INSUFFICIENT_CREDITS"
        );
        assert_eq!(
            AdmissionError::BudgetTooLow {
                budget: dec!(1),
                minimum: dec!(25),
            }
            .error_code(),
            "BUDGET_TOO_LOW"
        );
    }
}
