// ABOUTME: JWT token issuance and validation for account sessions
// ABOUTME: Mints signed access/refresh token pairs and validates bearer tokens
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 MMS Project

//! # Token Issuance and Validation
//!
//! Stateless session tokens for the membership backend. A successful login
//! yields a short-lived access token and a long-lived refresh token, both
//! HS256-signed with a process-wide secret injected at construction. There is
//! no server-side session store; a token is invalidated only by expiry.

use crate::models::Account;
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Which half of a token pair a claim set belongs to
///
/// Presenting a refresh token where an access token is required (or vice
/// versa) is rejected during validation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Short-lived token presented as the bearer credential on requests
    Access,
    /// Long-lived token exchanged for fresh access tokens
    Refresh,
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Access => write!(f, "access"),
            Self::Refresh => write!(f, "refresh"),
        }
    }
}

/// JWT claims carried by both token kinds
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Account ID
    pub sub: String,
    /// Account username, for log correlation
    pub username: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
    /// Access or refresh
    pub kind: TokenKind,
}

impl Claims {
    /// Parse the subject claim back into an account ID
    ///
    /// # Errors
    ///
    /// Returns an error if the subject is not a valid UUID
    pub fn account_id(&self) -> Result<Uuid> {
        Uuid::parse_str(&self.sub)
            .with_context(|| format!("Invalid account ID in token subject: {}", self.sub))
    }
}

/// An access/refresh token pair issued at login or registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived access token
    pub access: String,
    /// Long-lived refresh token
    pub refresh: String,
}

/// Token validation error with detailed information
#[derive(Debug, Clone)]
pub enum JwtValidationError {
    /// Token has expired
    TokenExpired {
        /// When the token expired
        expired_at: DateTime<Utc>,
        /// Current time for reference
        current_time: DateTime<Utc>,
    },
    /// Token signature or claims are invalid
    TokenInvalid {
        /// Reason for invalidity
        reason: String,
    },
    /// Token is not a proper JWT at all
    TokenMalformed {
        /// Details about malformation
        details: String,
    },
}

impl std::fmt::Display for JwtValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TokenExpired {
                expired_at,
                current_time,
            } => {
                let expired_for = current_time.signed_duration_since(*expired_at);
                write!(
                    f,
                    "Token expired {} minutes ago at {}",
                    expired_for.num_minutes().max(0),
                    expired_at.format("%Y-%m-%d %H:%M:%S UTC")
                )
            }
            Self::TokenInvalid { reason } => write!(f, "Token is invalid: {reason}"),
            Self::TokenMalformed { details } => write!(f, "Token is malformed: {details}"),
        }
    }
}

impl std::error::Error for JwtValidationError {}

/// Token issuer and validator for account sessions
pub struct AuthManager {
    secret: Vec<u8>,
    access_expiry_mins: i64,
    refresh_expiry_hours: i64,
    /// Monotonic counter to keep concurrently issued tokens distinct
    token_counter: AtomicU64,
}

impl Clone for AuthManager {
    fn clone(&self) -> Self {
        Self {
            secret: self.secret.clone(),
            access_expiry_mins: self.access_expiry_mins,
            refresh_expiry_hours: self.refresh_expiry_hours,
            // Cloned instances restart the counter; uniqueness is per instance
            token_counter: AtomicU64::new(0),
        }
    }
}

impl AuthManager {
    /// Create a new token issuer with an injected signing secret
    #[must_use]
    pub const fn new(secret: Vec<u8>, access_expiry_mins: i64, refresh_expiry_hours: i64) -> Self {
        Self {
            secret,
            access_expiry_mins,
            refresh_expiry_hours,
            token_counter: AtomicU64::new(0),
        }
    }

    /// Issue a fresh access/refresh token pair for an account
    ///
    /// # Errors
    ///
    /// Returns an error if JWT encoding fails
    pub fn issue_token_pair(&self, account: &Account) -> Result<TokenPair> {
        Ok(TokenPair {
            access: self.generate_token(account, TokenKind::Access)?,
            refresh: self.generate_token(account, TokenKind::Refresh)?,
        })
    }

    /// Generate a single signed token of the given kind for an account
    ///
    /// # Errors
    ///
    /// Returns an error if JWT encoding fails
    pub fn generate_token(&self, account: &Account, kind: TokenKind) -> Result<String> {
        self.sign(&account.id.to_string(), &account.username, kind)
    }

    /// Mint a new access token for the account identified by refresh claims
    ///
    /// The caller is expected to have validated the claims with
    /// [`Self::validate_token`] first.
    ///
    /// # Errors
    ///
    /// Returns an error if JWT encoding fails
    pub fn generate_access_for(&self, claims: &Claims) -> Result<String> {
        self.sign(&claims.sub, &claims.username, TokenKind::Access)
    }

    fn sign(&self, sub: &str, username: &str, kind: TokenKind) -> Result<String> {
        let now = Utc::now();
        let expiry = match kind {
            TokenKind::Access => now + Duration::minutes(self.access_expiry_mins),
            TokenKind::Refresh => now + Duration::hours(self.refresh_expiry_hours),
        };

        // The counter disambiguates tokens minted within the same second
        let counter = self.token_counter.fetch_add(1, Ordering::Relaxed);
        let unique_iat =
            now.timestamp() * 1000 + i64::from(u32::try_from(counter % 1000).unwrap_or(0));

        let claims = Claims {
            sub: sub.to_owned(),
            username: username.to_owned(),
            iat: unique_iat,
            exp: expiry.timestamp(),
            kind,
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.secret),
        )?;

        Ok(token)
    }

    /// Validate a token's signature, kind, and expiry
    ///
    /// # Errors
    ///
    /// Returns a [`JwtValidationError`] if:
    /// - The signature does not verify against the process secret
    /// - The token is malformed or its claims cannot be deserialized
    /// - The token kind does not match `expected`
    /// - The token has expired
    pub fn validate_token(
        &self,
        token: &str,
        expected: TokenKind,
    ) -> Result<Claims, JwtValidationError> {
        let claims = self.decode_token_claims(token)?;

        if claims.kind != expected {
            tracing::warn!(
                "Token kind mismatch for account {}: got {}, expected {}",
                claims.sub,
                claims.kind,
                expected
            );
            return Err(JwtValidationError::TokenInvalid {
                reason: format!("Expected {expected} token, got {} token", claims.kind),
            });
        }

        Self::validate_claims_expiry(&claims)?;
        Ok(claims)
    }

    /// Decode and signature-check claims without expiration validation
    fn decode_token_claims(&self, token: &str) -> Result<Claims, JwtValidationError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        decode::<Claims>(token, &DecodingKey::from_secret(&self.secret), &validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| Self::convert_jwt_error(&e))
    }

    /// Check claim expiry against the current time
    fn validate_claims_expiry(claims: &Claims) -> Result<(), JwtValidationError> {
        let current_time = Utc::now();
        if current_time.timestamp() > claims.exp {
            let expired_at = DateTime::from_timestamp(claims.exp, 0).unwrap_or_else(Utc::now);
            tracing::warn!(
                "{} token expired for account {} at {}",
                claims.kind,
                claims.sub,
                expired_at.to_rfc3339()
            );
            return Err(JwtValidationError::TokenExpired {
                expired_at,
                current_time,
            });
        }
        Ok(())
    }

    /// Convert JWT library errors to detailed validation errors
    fn convert_jwt_error(e: &jsonwebtoken::errors::Error) -> JwtValidationError {
        use jsonwebtoken::errors::ErrorKind;
        tracing::warn!("Token validation failed: {:?}", e);

        match e.kind() {
            ErrorKind::InvalidSignature => JwtValidationError::TokenInvalid {
                reason: "Token signature verification failed".into(),
            },
            ErrorKind::InvalidToken => JwtValidationError::TokenMalformed {
                details: "Token format is invalid".into(),
            },
            ErrorKind::Base64(base64_err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid base64: {base64_err}"),
            },
            ErrorKind::Json(json_err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid JSON: {json_err}"),
            },
            ErrorKind::Utf8(utf8_err) => JwtValidationError::TokenMalformed {
                details: format!("Token contains invalid UTF-8: {utf8_err}"),
            },
            _ => JwtValidationError::TokenInvalid {
                reason: format!("Token validation failed: {e}"),
            },
        }
    }
}

/// Generate a random signing secret
///
/// # Errors
///
/// Returns an error if the system RNG fails; the server cannot operate
/// securely without a working RNG
pub fn generate_jwt_secret() -> Result<[u8; 64]> {
    use ring::rand::{SecureRandom, SystemRandom};

    let rng = SystemRandom::new();
    let mut secret = [0u8; 64];

    rng.fill(&mut secret).map_err(|e| {
        tracing::error!("Failed to generate cryptographically secure JWT secret: {e}");
        anyhow::anyhow!("System RNG failure - cannot generate secure JWT secret")
    })?;

    Ok(secret)
}
