//! Ledger repository for atomic balance mutations.
//!
//! Every mutation runs as one database transaction:
//! lock the account row FOR UPDATE, validate against the committed balance,
//! insert the entry, write the new balance, commit. Concurrent mutations on
//! the same account serialize on the row lock; mutations on different
//! accounts proceed independently.

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};
use uuid::Uuid;

use adnexus_core::ledger::{EntryKind, LedgerEntry, LedgerError, LedgerService, PreparedMutation};
use adnexus_shared::types::{AccountId, LedgerEntryId, PageRequest};

use crate::entities::{accounts, ledger_entries};

/// Error types for ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum CreditError {
    /// Account not found.
    #[error("Account not found: {0}")]
    AccountNotFound(Uuid),

    /// The operation failed validation; nothing was written.
    #[error(transparent)]
    Validation(#[from] LedgerError),

    /// The atomic commit failed; everything was rolled back.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Filter options for listing ledger entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct HistoryFilter {
    /// Only return entries of this kind.
    pub kind: Option<EntryKind>,
    /// Maximum number of entries to return.
    pub limit: Option<u64>,
}

/// Ledger repository owning all balance writes.
#[derive(Debug, Clone)]
pub struct LedgerRepository {
    db: DatabaseConnection,
}

impl LedgerRepository {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Adds credits to an account.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a non-positive amount, an empty
    /// description, or a non-creditable kind; `AccountNotFound` for an
    /// unknown account; `Database` if the commit fails (fully rolled back).
    pub async fn credit(
        &self,
        account_id: Uuid,
        amount: Decimal,
        description: &str,
        kind: EntryKind,
    ) -> Result<ledger_entries::Model, CreditError> {
        self.apply(account_id, |acct, balance| {
            LedgerService::prepare_credit(acct, balance, amount, description, kind)
        })
        .await
    }

    /// Removes credits from an account as ad spend.
    ///
    /// # Errors
    ///
    /// Returns `InsufficientFunds` (wrapped in `Validation`) when the
    /// balance cannot cover the amount; no entry is written in that case.
    pub async fn debit(
        &self,
        account_id: Uuid,
        amount: Decimal,
        description: &str,
    ) -> Result<ledger_entries::Model, CreditError> {
        self.apply(account_id, |acct, balance| {
            LedgerService::prepare_debit(acct, balance, amount, description)
        })
        .await
    }

    /// Applies a signed manual adjustment.
    ///
    /// # Errors
    ///
    /// Returns `ZeroAmount` for a zero adjustment and `InsufficientFunds`
    /// when a negative adjustment would overdraw the account.
    pub async fn admin_adjust(
        &self,
        account_id: Uuid,
        signed_amount: Decimal,
        description: &str,
    ) -> Result<ledger_entries::Model, CreditError> {
        self.apply(account_id, |acct, balance| {
            LedgerService::prepare_adjustment(acct, balance, signed_amount, description)
        })
        .await
    }

    /// Returns the committed balance for an account.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` for an unknown account.
    pub async fn balance(&self, account_id: Uuid) -> Result<Decimal, CreditError> {
        let account = accounts::Entity::find_by_id(account_id)
            .one(&self.db)
            .await?
            .ok_or(CreditError::AccountNotFound(account_id))?;
        Ok(account.balance)
    }

    /// Lists an account's entries in reverse-chronological order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn history(
        &self,
        account_id: Uuid,
        filter: HistoryFilter,
    ) -> Result<Vec<ledger_entries::Model>, CreditError> {
        let mut query = Self::history_query(account_id, filter.kind)
            .order_by_desc(ledger_entries::Column::CreatedAt);

        if let Some(limit) = filter.limit {
            query = query.limit(limit);
        }

        Ok(query.all(&self.db).await?)
    }

    /// Lists one page of an account's entries in reverse-chronological
    /// order, along with the total matching entry count.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn history_page(
        &self,
        account_id: Uuid,
        kind: Option<EntryKind>,
        page: &PageRequest,
    ) -> Result<(Vec<ledger_entries::Model>, u64), CreditError> {
        let total = Self::history_query(account_id, kind).count(&self.db).await?;

        let entries = Self::history_query(account_id, kind)
            .order_by_desc(ledger_entries::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((entries, total))
    }

    /// Base query for an account's entries with an optional kind filter.
    fn history_query(account_id: Uuid, kind: Option<EntryKind>) -> Select<ledger_entries::Entity> {
        let mut query = ledger_entries::Entity::find()
            .filter(ledger_entries::Column::AccountId.eq(account_id));

        if let Some(kind) = kind {
            query = query.filter(
                ledger_entries::Column::Kind
                    .eq(crate::entities::sea_orm_active_enums::EntryKind::from(kind)),
            );
        }

        query
    }

    /// Verifies the stored balance against the full entry history.
    ///
    /// Returns the reconciled balance on success.
    ///
    /// # Errors
    ///
    /// Returns `BalanceMismatch` (wrapped in `Validation`) when the history
    /// disagrees with the stored balance.
    pub async fn reconcile(&self, account_id: Uuid) -> Result<Decimal, CreditError> {
        let account = accounts::Entity::find_by_id(account_id)
            .one(&self.db)
            .await?
            .ok_or(CreditError::AccountNotFound(account_id))?;

        let entries: Vec<LedgerEntry> = ledger_entries::Entity::find()
            .filter(ledger_entries::Column::AccountId.eq(account_id))
            .order_by_asc(ledger_entries::Column::CreatedAt)
            .all(&self.db)
            .await?
            .into_iter()
            .map(to_domain)
            .collect();

        LedgerService::reconcile(&entries, account.balance).map_err(CreditError::Validation)?;
        Ok(account.balance)
    }

    /// Runs one mutation: lock, validate, insert entry, write balance,
    /// commit. The validation closure sees the balance read under the lock,
    /// so two concurrent debits cannot both observe a balance sufficient
    /// for only one of them.
    async fn apply<F>(
        &self,
        account_id: Uuid,
        prepare: F,
    ) -> Result<ledger_entries::Model, CreditError>
    where
        F: FnOnce(AccountId, Decimal) -> Result<PreparedMutation, LedgerError>,
    {
        let txn = self.db.begin().await?;

        let account = Self::lock_account(&txn, account_id).await?;
        let prepared = prepare(AccountId::from_uuid(account.id), account.balance)?;

        let now = Utc::now().into();
        let entry = ledger_entries::ActiveModel {
            id: Set(LedgerEntryId::new().into_inner()),
            account_id: Set(account_id),
            amount: Set(prepared.entry.amount),
            kind: Set(prepared.entry.kind.into()),
            description: Set(prepared.entry.description.clone()),
            created_at: Set(now),
        };
        let inserted = entry.insert(&txn).await?;

        let mut active: accounts::ActiveModel = account.into();
        active.balance = Set(prepared.balance_after);
        active.updated_at = Set(now);
        active.update(&txn).await?;

        txn.commit().await?;

        tracing::debug!(
            %account_id,
            amount = %inserted.amount,
            kind = ?inserted.kind,
            balance = %prepared.balance_after,
            "Applied ledger mutation"
        );

        Ok(inserted)
    }

    /// Reads the account row FOR UPDATE within the given transaction.
    async fn lock_account(
        txn: &DatabaseTransaction,
        account_id: Uuid,
    ) -> Result<accounts::Model, CreditError> {
        accounts::Entity::find_by_id(account_id)
            .lock_exclusive()
            .one(txn)
            .await?
            .ok_or(CreditError::AccountNotFound(account_id))
    }
}

/// Maps a stored entry row to the core domain type.
#[must_use]
pub fn to_domain(model: ledger_entries::Model) -> LedgerEntry {
    LedgerEntry {
        id: LedgerEntryId::from_uuid(model.id),
        account_id: AccountId::from_uuid(model.account_id),
        amount: model.amount,
        kind: model.kind.into(),
        description: model.description,
        created_at: model.created_at.into(),
    }
}
