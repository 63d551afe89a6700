// ABOUTME: Rank registry storage operations
// ABOUTME: Handles rank creation, listing, lookup, and deletion
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 MMS Project

use super::Database;
use crate::errors::{AppError, AppResult};
use crate::models::Rank;
use sqlx::Row;

impl Database {
    /// Create the ranks table
    pub(super) async fn migrate_ranks(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS ranks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT UNIQUE NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Insert a new rank
    ///
    /// # Errors
    ///
    /// Returns `DuplicateRank` if the name is already registered, or a
    /// database error if the insert fails otherwise
    pub async fn create_rank(&self, name: &str) -> AppResult<Rank> {
        let result = sqlx::query("INSERT INTO ranks (name) VALUES ($1)")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|error| {
                if let sqlx::Error::Database(db_err) = &error {
                    if db_err.is_unique_violation() {
                        return AppError::duplicate_rank(format!(
                            "Rank '{name}' already exists"
                        ));
                    }
                }
                error.into()
            })?;

        Ok(Rank {
            id: result.last_insert_rowid(),
            name: name.to_owned(),
        })
    }

    /// List every rank, by identifier
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn list_ranks(&self) -> AppResult<Vec<Rank>> {
        let rows = sqlx::query("SELECT id, name FROM ranks ORDER BY id")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(|row| Rank {
                id: row.get("id"),
                name: row.get("name"),
            })
            .collect())
    }

    /// Get a rank by ID
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn get_rank(&self, rank_id: i64) -> AppResult<Option<Rank>> {
        let row = sqlx::query("SELECT id, name FROM ranks WHERE id = $1")
            .bind(rank_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| Rank {
            id: row.get("id"),
            name: row.get("name"),
        }))
    }

    /// Delete a rank
    ///
    /// Accounts referencing the rank keep existing; their reference is
    /// nulled by the foreign-key action.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails
    pub async fn delete_rank(&self, rank_id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM ranks WHERE id = $1")
            .bind(rank_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
