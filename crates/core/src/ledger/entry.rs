//! Ledger entry domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use adnexus_shared::types::{AccountId, LedgerEntryId};

/// Kind of ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Funds added through a confirmed payment.
    Deposit,
    /// Funds consumed by ad delivery.
    Spend,
    /// Funds returned for undelivered spend.
    Refund,
    /// Manual correction applied by an administrator.
    AdminAdjustment,
}

impl EntryKind {
    /// Returns true if this kind may appear on a credit (positive) entry.
    ///
    /// Spend entries are always debits; every other kind adds funds, except
    /// that admin adjustments carry their own sign.
    #[must_use]
    pub fn is_creditable(self) -> bool {
        !matches!(self, Self::Spend)
    }

    /// Returns the string form used in the database and API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Spend => "spend",
            Self::Refund => "refund",
            Self::AdminAdjustment => "admin_adjustment",
        }
    }
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntryKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deposit" => Ok(Self::Deposit),
            "spend" => Ok(Self::Spend),
            "refund" => Ok(Self::Refund),
            "admin_adjustment" => Ok(Self::AdminAdjustment),
            _ => Err(format!("Unknown entry kind: {s}")),
        }
    }
}

/// An immutable record of one balance-affecting event.
///
/// Entries are append-only: once created they are never updated or deleted,
/// and the sum of an account's entry amounts always equals its stored
/// balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Unique identifier for this entry.
    pub id: LedgerEntryId,
    /// The account this entry belongs to.
    pub account_id: AccountId,
    /// Signed amount: positive adds funds, negative removes them.
    pub amount: Decimal,
    /// What produced this entry.
    pub kind: EntryKind,
    /// Human-readable explanation, always present.
    pub description: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl LedgerEntry {
    /// Returns true if this entry added funds.
    #[must_use]
    pub fn is_credit(&self) -> bool {
        self.kind.is_creditable() && self.amount > Decimal::ZERO
    }

    /// Returns true if this entry removed funds.
    #[must_use]
    pub fn is_debit(&self) -> bool {
        self.kind == EntryKind::Spend
            || (self.kind == EntryKind::AdminAdjustment && self.amount < Decimal::ZERO)
    }

    /// Display amount with an explicit sign: credits render with a leading `+`.
    #[must_use]
    pub fn signed_amount(&self) -> String {
        if self.is_credit() {
            format!("+{}", self.amount)
        } else {
            self.amount.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    fn make_entry(kind: EntryKind, amount: Decimal) -> LedgerEntry {
        LedgerEntry {
            id: LedgerEntryId::new(),
            account_id: AccountId::new(),
            amount,
            kind,
            description: "test entry".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_kind_roundtrip() {
        for kind in [
            EntryKind::Deposit,
            EntryKind::Spend,
            EntryKind::Refund,
            EntryKind::AdminAdjustment,
        ] {
            assert_eq!(EntryKind::from_str(kind.as_str()).unwrap(), kind);
        }
        assert!(EntryKind::from_str("withdrawal").is_err());
    }

    #[test]
    fn test_deposit_is_credit() {
        let entry = make_entry(EntryKind::Deposit, dec!(100.00));
        assert!(entry.is_credit());
        assert!(!entry.is_debit());
    }

    #[test]
    fn test_spend_is_debit() {
        let entry = make_entry(EntryKind::Spend, dec!(-40.00));
        assert!(entry.is_debit());
        assert!(!entry.is_credit());
    }

    #[test]
    fn test_adjustment_direction_follows_sign() {
        let up = make_entry(EntryKind::AdminAdjustment, dec!(15.00));
        assert!(up.is_credit());
        assert!(!up.is_debit());

        let down = make_entry(EntryKind::AdminAdjustment, dec!(-15.00));
        assert!(down.is_debit());
        assert!(!down.is_credit());
    }

    #[test]
    fn test_signed_amount_display() {
        assert_eq!(
            make_entry(EntryKind::Deposit, dec!(100.00)).signed_amount(),
            "+100.00"
        );
        assert_eq!(
            make_entry(EntryKind::Spend, dec!(-40.00)).signed_amount(),
            "-40.00"
        );
        assert_eq!(
            make_entry(EntryKind::AdminAdjustment, dec!(-5.50)).signed_amount(),
            "-5.50"
        );
    }
}
