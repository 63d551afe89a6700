// ABOUTME: Request middleware for the HTTP API
// ABOUTME: Re-exports the bearer-token authentication layer and role guards
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 MMS Project

//! HTTP middleware

/// Bearer-token authentication and role guards
pub mod auth;

pub use auth::{require_admin, require_auth, require_staff_or_admin, CurrentAccount};
