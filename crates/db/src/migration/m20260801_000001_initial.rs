//! Initial database migration.
//!
//! Creates the enums, tables, constraints, and indexes for the credits
//! ledger and the campaign spend gate. The CHECK constraints mirror the
//! core invariants: the balance never goes negative and no entry carries a
//! zero amount.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(ENUMS_SQL).await?;
        db.execute_unprepared(ACCOUNTS_SQL).await?;
        db.execute_unprepared(LEDGER_ENTRIES_SQL).await?;
        db.execute_unprepared(CAMPAIGNS_SQL).await?;
        db.execute_unprepared(INDEXES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Ledger entry kinds
CREATE TYPE entry_kind AS ENUM (
    'deposit',
    'spend',
    'refund',
    'admin_adjustment'
);

-- Campaign lifecycle status
CREATE TYPE campaign_status AS ENUM (
    'inactive',
    'active',
    'paused'
);
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    id UUID PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    balance NUMERIC(14, 2) NOT NULL DEFAULT 0 CHECK (balance >= 0),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const LEDGER_ENTRIES_SQL: &str = r"
CREATE TABLE ledger_entries (
    id UUID PRIMARY KEY,
    account_id UUID NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    amount NUMERIC(14, 2) NOT NULL CHECK (amount <> 0),
    kind entry_kind NOT NULL,
    description TEXT NOT NULL CHECK (description <> ''),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const CAMPAIGNS_SQL: &str = r"
CREATE TABLE campaigns (
    id UUID PRIMARY KEY,
    account_id UUID NOT NULL REFERENCES accounts(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    status campaign_status NOT NULL DEFAULT 'inactive',
    daily_budget NUMERIC(14, 2) CHECK (daily_budget IS NULL OR daily_budget > 0),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);
";

const INDEXES_SQL: &str = r"
-- History reads are account-scoped and reverse-chronological
CREATE INDEX idx_ledger_entries_account_created
    ON ledger_entries (account_id, created_at DESC);

CREATE INDEX idx_ledger_entries_account_kind
    ON ledger_entries (account_id, kind);

CREATE INDEX idx_campaigns_account
    ON campaigns (account_id);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS campaigns;
DROP TABLE IF EXISTS ledger_entries;
DROP TABLE IF EXISTS accounts;
DROP TYPE IF EXISTS campaign_status;
DROP TYPE IF EXISTS entry_kind;
";
