// ABOUTME: Core domain models for accounts, roles, and ranks
// ABOUTME: Defines the account lifecycle fields and the closed role enumeration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 MMS Project

//! # Domain Models
//!
//! Core data structures for the membership backend: the [`Account`] entity
//! with its lifecycle flags, the closed [`Role`] enumeration, and the
//! auxiliary [`Rank`] label.

use crate::errors::AppError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use uuid::Uuid;

/// Account role controlling the authorization tier
///
/// Roles are a closed enumeration so an invalid role is unrepresentable;
/// database values outside the set fail at row decoding.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full administrative access, implicitly covers all staff operations
    Admin,
    /// Staff access: member listings and approval actions
    Staff,
    /// Regular member (self-registration default)
    #[default]
    Member,
}

impl Role {
    /// Check if this role grants admin-level access
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Check if this role grants staff-level access (admins included)
    #[must_use]
    pub const fn is_staff(self) -> bool {
        matches!(self, Self::Admin | Self::Staff)
    }

    /// Convert to string for database storage
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Staff => "staff",
            Self::Member => "member",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "staff" => Ok(Self::Staff),
            "member" => Ok(Self::Member),
            _ => Err(AppError::validation(format!("Invalid role: {s}"))),
        }
    }
}

/// A registered account with credentials, role, and approval state
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    /// Unique account identifier
    pub id: Uuid,
    /// Email address (globally unique, exact-match)
    pub email: String,
    /// Username used for login (globally unique, exact-match)
    pub username: String,
    /// Bcrypt hash of the password; the cleartext is never stored
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Authorization tier
    pub role: Role,
    /// Optional phone number
    pub phone: Option<String>,
    /// Optional display name
    pub full_name: Option<String>,
    /// Optional reference to a [`Rank`]; nulled when the rank is deleted
    pub rank_id: Option<i64>,
    /// Whether the account is usable at all; checked at login and per request
    pub is_active: bool,
    /// Whether the account has been cleared for member-gated features
    pub is_approved: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last successful login, if any
    pub last_login: Option<DateTime<Utc>>,
}

impl Account {
    /// Create a new self-registered account
    ///
    /// Self-registration always produces an unapproved, active member.
    /// Admin-created staff/admin accounts set `role` afterwards.
    #[must_use]
    pub fn new(email: String, username: String, password_hash: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            email,
            username,
            password_hash,
            role: Role::Member,
            phone: None,
            full_name: None,
            rank_id: None,
            is_active: true,
            is_approved: false,
            created_at: Utc::now(),
            last_login: None,
        }
    }
}

/// A named classification label attachable to accounts
///
/// Ranks carry no behavior; they are referenced, never owned, by accounts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rank {
    /// Rank identifier
    pub id: i64,
    /// Unique rank name
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Admin, Role::Staff, Role::Member] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_predicates() {
        assert!(Role::Admin.is_admin());
        assert!(Role::Admin.is_staff());
        assert!(Role::Staff.is_staff());
        assert!(!Role::Staff.is_admin());
        assert!(!Role::Member.is_staff());
    }

    #[test]
    fn test_new_account_defaults() {
        let account = Account::new(
            "a@x.com".into(),
            "alice".into(),
            "hashed_password_123".into(),
        );
        assert_eq!(account.role, Role::Member);
        assert!(account.is_active);
        assert!(!account.is_approved);
        assert!(account.rank_id.is_none());
        assert!(account.last_login.is_none());
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let account = Account::new(
            "a@x.com".into(),
            "alice".into(),
            "hashed_password_123".into(),
        );
        let json = serde_json::to_value(&account).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "alice");
    }
}
