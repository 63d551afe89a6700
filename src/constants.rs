// ABOUTME: Shared constants for limits, defaults, and client-facing messages
// ABOUTME: Single source for tunable values referenced across modules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 MMS Project

//! Application-wide constants

/// Tunable limits and defaults
pub mod limits {
    /// Minimum accepted password length at registration
    pub const MIN_PASSWORD_LENGTH: usize = 8;

    /// Maximum accepted rank name length
    pub const MAX_RANK_NAME_LENGTH: usize = 50;

    /// Default lifetime of an access token, in minutes
    pub const DEFAULT_ACCESS_TOKEN_EXPIRY_MINS: i64 = 60;

    /// Default lifetime of a refresh token, in hours
    pub const DEFAULT_REFRESH_TOKEN_EXPIRY_HOURS: i64 = 168;

    /// Default HTTP listen port
    pub const DEFAULT_HTTP_PORT: u16 = 8081;
}

/// Client-facing message fragments shared by several handlers
pub mod error_messages {
    /// Registration rejected because the email is taken
    pub const EMAIL_ALREADY_REGISTERED: &str = "Email already registered";

    /// Registration rejected because the username is taken
    pub const USERNAME_ALREADY_TAKEN: &str = "Username already taken";

    /// Email field failed format validation
    pub const INVALID_EMAIL_FORMAT: &str = "Invalid email address format";

    /// Password shorter than the accepted minimum
    pub const PASSWORD_TOO_WEAK: &str = "Password must be at least 8 characters";

    /// Bearer token failed validation or expired
    pub const SESSION_EXPIRED: &str = "Session is expired or invalid";
}

/// Service identity strings
pub mod service_names {
    /// Name used in structured log output
    pub const MMS_SERVER: &str = "mms-server";
}
