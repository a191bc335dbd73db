//! Account repository for account database operations.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use adnexus_shared::types::{AccountId, PageRequest};

use crate::entities::accounts;

/// Error types for account operations.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// Account not found.
    #[error("Account not found: {0}")]
    NotFound(Uuid),

    /// An account with this email already exists.
    #[error("Account with email {0} already exists")]
    EmailTaken(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Account repository for CRUD operations.
///
/// Note that this repository never writes the balance column; balance
/// mutations go through the ledger repository only.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates an account with a zero balance.
    ///
    /// # Errors
    ///
    /// Returns `EmailTaken` if the email is already registered.
    pub async fn create_account(
        &self,
        name: &str,
        email: &str,
    ) -> Result<accounts::Model, AccountError> {
        let existing = accounts::Entity::find()
            .filter(accounts::Column::Email.eq(email))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(AccountError::EmailTaken(email.to_string()));
        }

        let now = Utc::now().into();
        let account = accounts::ActiveModel {
            id: Set(AccountId::new().into_inner()),
            name: Set(name.to_string()),
            email: Set(email.to_string()),
            balance: Set(rust_decimal::Decimal::ZERO),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(account.insert(&self.db).await?)
    }

    /// Finds an account by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no account exists with the given ID.
    pub async fn get_account(&self, account_id: Uuid) -> Result<accounts::Model, AccountError> {
        accounts::Entity::find_by_id(account_id)
            .one(&self.db)
            .await?
            .ok_or(AccountError::NotFound(account_id))
    }

    /// Lists one page of accounts, newest first, along with the total
    /// account count.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_accounts(
        &self,
        page: &PageRequest,
    ) -> Result<(Vec<accounts::Model>, u64), AccountError> {
        let total = accounts::Entity::find().count(&self.db).await?;

        let accounts = accounts::Entity::find()
            .order_by_desc(accounts::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok((accounts, total))
    }
}
