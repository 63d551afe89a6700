// ABOUTME: Account storage operations
// ABOUTME: Handles account creation, lookup, approval transitions, and listings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 MMS Project

use super::Database;
use crate::constants::error_messages;
use crate::errors::{AppError, AppResult};
use crate::models::Account;
use sqlx::Row;
use uuid::Uuid;

/// Map a unique-constraint violation on the accounts table to the
/// duplicate-identity rejection; anything else passes through
fn map_identity_conflict(error: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &error {
        if db_err.is_unique_violation() {
            let message = if db_err.message().contains("accounts.username") {
                error_messages::USERNAME_ALREADY_TAKEN
            } else {
                error_messages::EMAIL_ALREADY_REGISTERED
            };
            return AppError::duplicate_identity(message);
        }
    }
    error.into()
}

impl Database {
    /// Create the accounts table and indexes
    pub(super) async fn migrate_accounts(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS accounts (
                id TEXT PRIMARY KEY,
                email TEXT UNIQUE NOT NULL,
                username TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'member' CHECK (role IN ('admin', 'staff', 'member')),
                phone TEXT,
                full_name TEXT,
                rank_id INTEGER REFERENCES ranks(id) ON DELETE SET NULL,
                is_active BOOLEAN NOT NULL DEFAULT 1,
                is_approved BOOLEAN NOT NULL DEFAULT 0,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
                last_login DATETIME
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_accounts_username ON accounts(username)")
            .execute(&self.pool)
            .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_accounts_is_approved ON accounts(is_approved)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Insert a new account
    ///
    /// Uniqueness is enforced by the store in a single atomic insert; a
    /// conflicting email or username yields `DuplicateIdentity`, not a
    /// database error.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateIdentity` if the email or username is already
    /// registered, or a database error if the insert fails otherwise
    pub async fn create_account(&self, account: &Account) -> AppResult<Uuid> {
        sqlx::query(
            r"
            INSERT INTO accounts (
                id, email, username, password_hash, role,
                phone, full_name, rank_id, is_active, is_approved,
                created_at, last_login
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ",
        )
        .bind(account.id.to_string())
        .bind(&account.email)
        .bind(&account.username)
        .bind(&account.password_hash)
        .bind(account.role.as_str())
        .bind(&account.phone)
        .bind(&account.full_name)
        .bind(account.rank_id)
        .bind(account.is_active)
        .bind(account.is_approved)
        .bind(account.created_at)
        .bind(account.last_login)
        .execute(&self.pool)
        .await
        .map_err(map_identity_conflict)?;

        Ok(account.id)
    }

    /// Get an account by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_account(&self, account_id: Uuid) -> AppResult<Option<Account>> {
        self.get_account_impl("id", &account_id.to_string()).await
    }

    /// Get an account by username (exact match)
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_account_by_username(&self, username: &str) -> AppResult<Option<Account>> {
        self.get_account_impl("username", username).await
    }

    /// Get an account by email (exact match)
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_account_by_email(&self, email: &str) -> AppResult<Option<Account>> {
        self.get_account_impl("email", email).await
    }

    /// Internal implementation for getting an account by a unique field
    async fn get_account_impl(&self, field: &str, value: &str) -> AppResult<Option<Account>> {
        let query = format!(
            r"
            SELECT id, email, username, password_hash, role,
                   phone, full_name, rank_id, is_active, is_approved,
                   created_at, last_login
            FROM accounts WHERE {field} = $1
            "
        );

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|row| Self::row_to_account(&row)).transpose()
    }

    /// List every account, oldest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_accounts(&self) -> AppResult<Vec<Account>> {
        let rows = sqlx::query(
            r"
            SELECT id, email, username, password_hash, role,
                   phone, full_name, rank_id, is_active, is_approved,
                   created_at, last_login
            FROM accounts ORDER BY created_at
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_account).collect()
    }

    /// List accounts filtered by approval state, oldest first
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_accounts_by_approval(&self, approved: bool) -> AppResult<Vec<Account>> {
        let rows = sqlx::query(
            r"
            SELECT id, email, username, password_hash, role,
                   phone, full_name, rank_id, is_active, is_approved,
                   created_at, last_login
            FROM accounts WHERE is_approved = $1 ORDER BY created_at
            ",
        )
        .bind(approved)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_account).collect()
    }

    /// Persist the mutable profile fields of an account
    ///
    /// Only display name, phone, and rank reference are writable through
    /// this path; identity, role, and lifecycle flags are not.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn update_profile(&self, account: &Account) -> AppResult<()> {
        sqlx::query(
            r"
            UPDATE accounts SET full_name = $2, phone = $3, rank_id = $4 WHERE id = $1
            ",
        )
        .bind(account.id.to_string())
        .bind(&account.full_name)
        .bind(&account.phone)
        .bind(account.rank_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Flip an account's approval flag, false to true, exactly once
    ///
    /// Returns `false` when no row changed, i.e. the account was already
    /// approved (or does not exist; callers check existence first).
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn approve_account(&self, account_id: Uuid) -> AppResult<bool> {
        let result =
            sqlx::query("UPDATE accounts SET is_approved = 1 WHERE id = $1 AND is_approved = 0")
                .bind(account_id.to_string())
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Record a successful login
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn update_last_login(&self, account_id: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE accounts SET last_login = CURRENT_TIMESTAMP WHERE id = $1")
            .bind(account_id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Activate or deactivate an account
    ///
    /// Accounts are never hard-deleted; deactivation is the terminal state
    /// an operator can put an account into.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn set_account_active(&self, account_id: Uuid, active: bool) -> AppResult<()> {
        sqlx::query("UPDATE accounts SET is_active = $2 WHERE id = $1")
            .bind(account_id.to_string())
            .bind(active)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Convert a database row to an [`Account`]
    fn row_to_account(row: &sqlx::sqlite::SqliteRow) -> AppResult<Account> {
        let id: String = row.get("id");
        let role: String = row.get("role");

        Ok(Account {
            id: Uuid::parse_str(&id)
                .map_err(|e| AppError::database(format!("Invalid account ID in store: {e}")))?,
            email: row.get("email"),
            username: row.get("username"),
            password_hash: row.get("password_hash"),
            role: role.parse()?,
            phone: row.get("phone"),
            full_name: row.get("full_name"),
            rank_id: row.get("rank_id"),
            is_active: row.get("is_active"),
            is_approved: row.get("is_approved"),
            created_at: row.get("created_at"),
            last_login: row.get("last_login"),
        })
    }
}
