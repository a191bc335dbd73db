//! Spend gate domain types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Lifecycle status of an ad-spend entity.
///
/// Only the transition into `Active` is gated; derived read-only states
/// (expired, not yet active) are computed elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityStatus {
    /// Not serving and not gated.
    Inactive,
    /// Bid-eligible; admission must have passed to get here.
    Active,
    /// Pulled from serving, typically for low credits.
    Paused,
}

impl EntityStatus {
    /// Returns true if the entity is in the bid-eligible state.
    #[must_use]
    pub fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    /// Returns the string form used in the database and API.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inactive => "inactive",
            Self::Active => "active",
            Self::Paused => "paused",
        }
    }
}

impl std::fmt::Display for EntityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EntityStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inactive" => Ok(Self::Inactive),
            "active" => Ok(Self::Active),
            "paused" => Ok(Self::Paused),
            _ => Err(format!("Unknown entity status: {s}")),
        }
    }
}

/// The slice of an ad-spend entity the gate needs to see.
///
/// Campaigns, banners, and video creatives all reduce to this: the status
/// they are being saved into and the daily budget that funds one day of
/// delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpendProfile {
    /// The status the entity is being persisted into.
    pub status: EntityStatus,
    /// Daily budget, if one is set.
    pub daily_budget: Option<Decimal>,
}

impl SpendProfile {
    /// Minimum credits the funding account must hold for admission:
    /// one day's budget, or zero when no budget is set.
    #[must_use]
    pub fn minimum_required_credits(&self) -> Decimal {
        self.daily_budget.unwrap_or(Decimal::ZERO)
    }
}
