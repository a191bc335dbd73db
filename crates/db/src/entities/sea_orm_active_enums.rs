//! `SeaORM` active enums mapping Postgres enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use adnexus_core::admission::EntityStatus;
use adnexus_core::ledger::EntryKind as CoreEntryKind;

/// What produced a ledger entry.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "entry_kind")]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// Funds added through a confirmed payment.
    #[sea_orm(string_value = "deposit")]
    Deposit,
    /// Funds consumed by ad delivery.
    #[sea_orm(string_value = "spend")]
    Spend,
    /// Funds returned for undelivered spend.
    #[sea_orm(string_value = "refund")]
    Refund,
    /// Manual correction applied by an administrator.
    #[sea_orm(string_value = "admin_adjustment")]
    AdminAdjustment,
}

impl From<CoreEntryKind> for EntryKind {
    fn from(kind: CoreEntryKind) -> Self {
        match kind {
            CoreEntryKind::Deposit => Self::Deposit,
            CoreEntryKind::Spend => Self::Spend,
            CoreEntryKind::Refund => Self::Refund,
            CoreEntryKind::AdminAdjustment => Self::AdminAdjustment,
        }
    }
}

impl From<EntryKind> for CoreEntryKind {
    fn from(kind: EntryKind) -> Self {
        match kind {
            EntryKind::Deposit => Self::Deposit,
            EntryKind::Spend => Self::Spend,
            EntryKind::Refund => Self::Refund,
            EntryKind::AdminAdjustment => Self::AdminAdjustment,
        }
    }
}

/// Campaign lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "campaign_status")]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    /// Not serving and not gated.
    #[sea_orm(string_value = "inactive")]
    Inactive,
    /// Bid-eligible.
    #[sea_orm(string_value = "active")]
    Active,
    /// Pulled from serving.
    #[sea_orm(string_value = "paused")]
    Paused,
}

impl From<EntityStatus> for CampaignStatus {
    fn from(status: EntityStatus) -> Self {
        match status {
            EntityStatus::Inactive => Self::Inactive,
            EntityStatus::Active => Self::Active,
            EntityStatus::Paused => Self::Paused,
        }
    }
}

impl From<CampaignStatus> for EntityStatus {
    fn from(status: CampaignStatus) -> Self {
        match status {
            CampaignStatus::Inactive => Self::Inactive,
            CampaignStatus::Active => Self::Active,
            CampaignStatus::Paused => Self::Paused,
        }
    }
}
