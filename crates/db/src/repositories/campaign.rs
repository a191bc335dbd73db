//! Campaign repository with the spend gate applied at save time.
//!
//! Admission runs inside the same database transaction that persists the
//! campaign. The funding account's balance is read under the same row lock
//! the ledger repository takes, so a concurrent spend cannot land between
//! the gate check and the status commit.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use adnexus_core::admission::{AdmissionError, AdmissionService, EntityStatus, SpendProfile};
use adnexus_shared::types::{CampaignId, PageRequest};

use crate::entities::{accounts, campaigns};

/// Error types for campaign operations.
#[derive(Debug, thiserror::Error)]
pub enum CampaignError {
    /// Campaign not found.
    #[error("Campaign not found: {0}")]
    NotFound(CampaignId),

    /// Funding account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// The spend gate rejected the save; the stored status is unchanged.
    #[error(transparent)]
    Gate(#[from] AdmissionError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a campaign.
#[derive(Debug, Clone)]
pub struct CreateCampaignInput {
    /// Funding account.
    pub account_id: Uuid,
    /// Campaign name.
    pub name: String,
    /// Initial status. Creating straight into `Active` is gated.
    pub status: EntityStatus,
    /// Daily budget, if set.
    pub daily_budget: Option<Decimal>,
}

/// Campaign repository for gated CRUD operations.
#[derive(Debug, Clone)]
pub struct CampaignRepository {
    db: DatabaseConnection,
}

impl CampaignRepository {
    /// Creates a new campaign repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a campaign, running the spend gate against the requested
    /// initial state.
    ///
    /// # Errors
    ///
    /// Returns `Gate` when the budget floor or the credits check fails;
    /// nothing is persisted in that case.
    pub async fn create_campaign(
        &self,
        input: CreateCampaignInput,
        minimum_daily_budget: Decimal,
    ) -> Result<campaigns::Model, CampaignError> {
        let txn = self.db.begin().await?;

        let account = Self::lock_account(&txn, input.account_id).await?;

        let profile = SpendProfile {
            status: input.status,
            daily_budget: input.daily_budget,
        };
        AdmissionService::validate_activation(&profile, account.balance, minimum_daily_budget)?;

        let now = Utc::now().into();
        let campaign = campaigns::ActiveModel {
            id: Set(CampaignId::new().into_inner()),
            account_id: Set(input.account_id),
            name: Set(input.name),
            status: Set(input.status.into()),
            daily_budget: Set(input.daily_budget),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let inserted = campaign.insert(&txn).await?;

        txn.commit().await?;

        Ok(inserted)
    }

    /// Transitions a campaign into a new status.
    ///
    /// A transition into `Active` requires spend-gate admission; a rejected
    /// transition leaves the campaign in its prior persisted status.
    ///
    /// # Errors
    ///
    /// Returns `Gate` on admission failure, `NotFound` for an unknown
    /// campaign.
    pub async fn set_status(
        &self,
        campaign_id: CampaignId,
        new_status: EntityStatus,
        minimum_daily_budget: Decimal,
    ) -> Result<campaigns::Model, CampaignError> {
        let txn = self.db.begin().await?;

        let campaign = campaigns::Entity::find_by_id(campaign_id.into_inner())
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(CampaignError::NotFound(campaign_id))?;

        let account = Self::lock_account(&txn, campaign.account_id).await?;

        let profile = SpendProfile {
            status: new_status,
            daily_budget: campaign.daily_budget,
        };
        AdmissionService::validate_activation(&profile, account.balance, minimum_daily_budget)?;

        let mut active: campaigns::ActiveModel = campaign.into();
        active.status = Set(new_status.into());
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await?;

        txn.commit().await?;

        tracing::debug!(%campaign_id, status = %new_status, "Campaign status changed");

        Ok(updated)
    }

    /// Updates a campaign's name and daily budget.
    ///
    /// The gate re-validates against the campaign's current status: an
    /// already-active campaign may not drop below the budget floor or past
    /// its account's available credits.
    ///
    /// # Errors
    ///
    /// Returns `Gate` on admission failure, `NotFound` for an unknown
    /// campaign.
    pub async fn update_campaign(
        &self,
        campaign_id: CampaignId,
        name: Option<String>,
        daily_budget: Option<Decimal>,
        minimum_daily_budget: Decimal,
    ) -> Result<campaigns::Model, CampaignError> {
        let txn = self.db.begin().await?;

        let campaign = campaigns::Entity::find_by_id(campaign_id.into_inner())
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(CampaignError::NotFound(campaign_id))?;

        let account = Self::lock_account(&txn, campaign.account_id).await?;

        let new_budget = daily_budget.or(campaign.daily_budget);
        let profile = SpendProfile {
            status: campaign.status.clone().into(),
            daily_budget: new_budget,
        };
        AdmissionService::validate_activation(&profile, account.balance, minimum_daily_budget)?;

        let mut active: campaigns::ActiveModel = campaign.into();
        if let Some(name) = name {
            active.name = Set(name);
        }
        active.daily_budget = Set(new_budget);
        active.updated_at = Set(Utc::now().into());
        let updated = active.update(&txn).await?;

        txn.commit().await?;

        Ok(updated)
    }

    /// Deletes a campaign.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no campaign exists with the given ID.
    pub async fn delete_campaign(&self, campaign_id: CampaignId) -> Result<(), CampaignError> {
        let result = campaigns::Entity::delete_by_id(campaign_id.into_inner())
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(CampaignError::NotFound(campaign_id));
        }
        Ok(())
    }

    /// Finds a campaign by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no campaign exists with the given ID.
    pub async fn get_campaign(
        &self,
        campaign_id: CampaignId,
    ) -> Result<campaigns::Model, CampaignError> {
        campaigns::Entity::find_by_id(campaign_id.into_inner())
            .one(&self.db)
            .await?
            .ok_or(CampaignError::NotFound(campaign_id))
    }

    /// Lists one page of an account's campaigns, newest first, along with
    /// the total campaign count for the account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_account(
        &self,
        account_id: Uuid,
        page: &PageRequest,
    ) -> Result<(Vec<campaigns::Model>, u64), CampaignError> {
        let base = campaigns::Entity::find().filter(campaigns::Column::AccountId.eq(account_id));

        let total = base.clone().count(&self.db).await?;
        let campaigns = base
            .order_by_desc(campaigns::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((campaigns, total))
    }

    /// Reads the funding account FOR UPDATE within the given transaction.
    async fn lock_account(
        txn: &DatabaseTransaction,
        account_id: Uuid,
    ) -> Result<accounts::Model, CampaignError> {
        accounts::Entity::find_by_id(account_id)
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or(CampaignError::AccountNotFound(account_id))
    }
}
