// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides common database, auth, and account creation helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 MMS Project
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]

//! Shared test utilities for `mms_server`

use anyhow::Result;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use mms_server::{
    auth::{generate_jwt_secret, AuthManager},
    database::Database,
    models::{Account, Role},
    routes::{self, ApiContext},
};
use serde_json::Value;
use std::sync::{Arc, Once};
use tower::ServiceExt;

static INIT_LOGGER: Once = Once::new();

/// Bcrypt cost for test fixtures; the default cost is too slow for test suites
pub const TEST_BCRYPT_COST: u32 = 4;

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard test database setup
pub async fn create_test_database() -> Result<Arc<Database>> {
    init_test_logging();
    let database = Arc::new(Database::new("sqlite::memory:").await?);
    Ok(database)
}

/// Create a test authentication manager with a fresh random secret
pub fn create_test_auth_manager() -> Arc<AuthManager> {
    let secret = generate_jwt_secret().expect("Failed to generate JWT secret").to_vec();
    Arc::new(AuthManager::new(secret, 60, 168))
}

/// Build a full application router over fresh in-memory state
///
/// Returns the router together with the context backing it so tests can
/// reach into the database directly.
pub async fn create_test_app() -> Result<(Router, ApiContext)> {
    let database = create_test_database().await?;
    let auth = create_test_auth_manager();
    let context = ApiContext::new(database, auth);
    let router = routes::router(context.clone());
    Ok((router, context))
}

/// Create an account directly in the store
pub async fn seed_account(
    database: &Database,
    email: &str,
    username: &str,
    password: &str,
    role: Role,
) -> Result<Account> {
    let password_hash = bcrypt::hash(password, TEST_BCRYPT_COST)?;
    let mut account = Account::new(email.into(), username.into(), password_hash);
    account.role = role;
    database.create_account(&account).await?;
    Ok(account)
}

/// Create a standard unapproved member account
pub async fn seed_member(database: &Database, username: &str) -> Result<Account> {
    seed_account(
        database,
        &format!("{username}@example.com"),
        username,
        "secret123",
        Role::Member,
    )
    .await
}

/// Issue a bearer access token for an account
pub fn access_token_for(auth: &AuthManager, account: &Account) -> String {
    auth.generate_token(account, mms_server::auth::TokenKind::Access)
        .expect("Failed to issue access token")
}

/// Drive a request through the router and decode the JSON body
pub async fn send_request(
    router: &Router,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("Failed to build request");

    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("Request failed");

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read response body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Response body is not JSON")
    };

    (status, json)
}
