// ABOUTME: Database management for account and rank storage
// ABOUTME: Owns the SQLite pool and schema bootstrap for the membership tables
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 MMS Project

//! # Database Management
//!
//! Persistence for the membership backend. The store owns uniqueness
//! enforcement: duplicate identities and rank names are rejected by UNIQUE
//! constraints and surfaced as typed errors, which closes the
//! check-then-insert race between concurrent registrations.

mod accounts;
mod ranks;

use crate::errors::AppResult;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;

/// Database manager for account and rank storage
#[derive(Clone)]
pub struct Database {
    pool: Pool<Sqlite>,
}

impl Database {
    /// Create a new database connection and bootstrap the schema
    ///
    /// # Errors
    ///
    /// Returns an error if the connection cannot be established or the
    /// schema bootstrap fails
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            // Rank deletion nulls account references via ON DELETE SET NULL
            .foreign_keys(true);

        // An in-memory database exists per connection; cap the pool at one
        // so every query sees the same schema
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.migrate().await?;

        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Run schema bootstrap
    ///
    /// # Errors
    ///
    /// Returns an error if table or index creation fails
    pub async fn migrate(&self) -> AppResult<()> {
        // Ranks first: accounts carry a foreign key into them
        self.migrate_ranks().await?;
        self.migrate_accounts().await?;
        Ok(())
    }
}
