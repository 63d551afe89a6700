// ABOUTME: Integration tests for the account store and approval lifecycle
// ABOUTME: Validates uniqueness enforcement, approval transitions, and rank references
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 MMS Project

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{create_test_database, seed_account, seed_member};
use mms_server::errors::ErrorCode;
use mms_server::models::{Account, Role};

#[tokio::test]
async fn test_created_account_round_trips() {
    let database = create_test_database().await.unwrap();
    let account = seed_member(&database, "alice").await.unwrap();

    let loaded = database.get_account(account.id).await.unwrap().unwrap();
    assert_eq!(loaded.email, "alice@example.com");
    assert_eq!(loaded.username, "alice");
    assert_eq!(loaded.role, Role::Member);
    assert!(loaded.is_active);
    assert!(!loaded.is_approved);
    assert!(loaded.last_login.is_none());

    let by_username = database
        .get_account_by_username("alice")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_username.id, account.id);

    let by_email = database
        .get_account_by_email("alice@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_email.id, account.id);
}

#[tokio::test]
async fn test_username_lookup_is_exact_match() {
    let database = create_test_database().await.unwrap();
    seed_member(&database, "alice").await.unwrap();

    // No case normalization is performed on lookups
    assert!(database
        .get_account_by_username("Alice")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let database = create_test_database().await.unwrap();
    seed_account(&database, "a@x.com", "alice", "secret123", Role::Member)
        .await
        .unwrap();

    let duplicate = Account::new("a@x.com".into(), "bob".into(), "hash".into());
    let err = database.create_account(&duplicate).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::DuplicateIdentity);
    assert_eq!(err.message, "Email already registered");

    // Exactly one account stored
    assert_eq!(database.list_accounts().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_duplicate_username_rejected() {
    let database = create_test_database().await.unwrap();
    seed_account(&database, "a@x.com", "alice", "secret123", Role::Member)
        .await
        .unwrap();

    let duplicate = Account::new("b@x.com".into(), "alice".into(), "hash".into());
    let err = database.create_account(&duplicate).await.unwrap_err();
    assert_eq!(err.code, ErrorCode::DuplicateIdentity);
    assert_eq!(err.message, "Username already taken");
}

#[tokio::test]
async fn test_approval_flips_exactly_once() {
    let database = create_test_database().await.unwrap();
    let account = seed_member(&database, "alice").await.unwrap();

    assert!(database.approve_account(account.id).await.unwrap());
    let loaded = database.get_account(account.id).await.unwrap().unwrap();
    assert!(loaded.is_approved);

    // The second transition finds no row to change
    assert!(!database.approve_account(account.id).await.unwrap());
    let loaded = database.get_account(account.id).await.unwrap().unwrap();
    assert!(loaded.is_approved);
}

#[tokio::test]
async fn test_listing_filters_by_approval() {
    let database = create_test_database().await.unwrap();
    let alice = seed_member(&database, "alice").await.unwrap();
    seed_member(&database, "bob").await.unwrap();
    seed_member(&database, "carol").await.unwrap();

    database.approve_account(alice.id).await.unwrap();

    let all = database.list_accounts().await.unwrap();
    assert_eq!(all.len(), 3);

    let approved = database.list_accounts_by_approval(true).await.unwrap();
    assert_eq!(approved.len(), 1);
    assert_eq!(approved[0].username, "alice");

    let unapproved = database.list_accounts_by_approval(false).await.unwrap();
    assert_eq!(unapproved.len(), 2);
}

#[tokio::test]
async fn test_profile_update_touches_only_mutable_fields() {
    let database = create_test_database().await.unwrap();
    let rank = database.create_rank("Captain").await.unwrap();
    let mut account = seed_member(&database, "alice").await.unwrap();

    account.full_name = Some("Alice Example".into());
    account.phone = Some("555-0100".into());
    account.rank_id = Some(rank.id);
    database.update_profile(&account).await.unwrap();

    let loaded = database.get_account(account.id).await.unwrap().unwrap();
    assert_eq!(loaded.full_name.as_deref(), Some("Alice Example"));
    assert_eq!(loaded.phone.as_deref(), Some("555-0100"));
    assert_eq!(loaded.rank_id, Some(rank.id));
    // Identity and lifecycle fields are untouched
    assert_eq!(loaded.email, "alice@example.com");
    assert_eq!(loaded.role, Role::Member);
    assert!(!loaded.is_approved);
}

#[tokio::test]
async fn test_rank_uniqueness_and_listing() {
    let database = create_test_database().await.unwrap();
    database.create_rank("Captain").await.unwrap();
    database.create_rank("Lieutenant").await.unwrap();

    let err = database.create_rank("Captain").await.unwrap_err();
    assert_eq!(err.code, ErrorCode::DuplicateRank);

    let ranks = database.list_ranks().await.unwrap();
    assert_eq!(ranks.len(), 2);
    assert_eq!(ranks[0].name, "Captain");
}

#[tokio::test]
async fn test_rank_deletion_nulls_account_reference() {
    let database = create_test_database().await.unwrap();
    let rank = database.create_rank("Captain").await.unwrap();

    let mut account = seed_member(&database, "alice").await.unwrap();
    account.rank_id = Some(rank.id);
    database.update_profile(&account).await.unwrap();

    assert!(database.delete_rank(rank.id).await.unwrap());

    // The account survives with its reference nulled
    let loaded = database.get_account(account.id).await.unwrap().unwrap();
    assert!(loaded.rank_id.is_none());
    assert!(database.get_rank(rank.id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_deactivated_account_persists() {
    let database = create_test_database().await.unwrap();
    let account = seed_member(&database, "alice").await.unwrap();

    database.set_account_active(account.id, false).await.unwrap();

    let loaded = database.get_account(account.id).await.unwrap().unwrap();
    assert!(!loaded.is_active);
    // Deactivation never deletes
    assert_eq!(database.list_accounts().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_last_login_recorded() {
    let database = create_test_database().await.unwrap();
    let account = seed_member(&database, "alice").await.unwrap();

    database.update_last_login(account.id).await.unwrap();

    let loaded = database.get_account(account.id).await.unwrap().unwrap();
    assert!(loaded.last_login.is_some());
}
