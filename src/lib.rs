// ABOUTME: Main library entry point for the MMS membership backend
// ABOUTME: Provides account lifecycle, authentication, and approval workflows over REST
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 MMS Project

#![deny(unsafe_code)]

//! # MMS Server
//!
//! A membership management backend: registration, authentication, role and
//! rank assignment, and membership-approval workflows, exposed over HTTP
//! with JSON payloads and JWT session tokens.
//!
//! ## Features
//!
//! - **Self-service registration**: new accounts start as unapproved members
//! - **Stateless sessions**: signed access/refresh token pairs, no session store
//! - **Role-based authorization**: admin / staff / member as a closed enumeration
//! - **Approval workflow**: staff clear new members for gated features
//! - **Rank registry**: auxiliary labels attachable to accounts
//!
//! ## Architecture
//!
//! - **Models**: account, role, and rank domain types
//! - **Auth**: token issuance and validation
//! - **Database**: SQLite-backed account store and rank registry
//! - **Middleware**: bearer-token resolution and role guards
//! - **Routes**: thin HTTP adapters over the above
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use mms_server::config::environment::ServerConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::from_env()?;
//!     println!("MMS server configured for port {}", config.http_port);
//!     Ok(())
//! }
//! ```

/// JWT token issuance and validation
pub mod auth;

/// Environment-driven configuration
pub mod config;

/// Shared constants for limits, defaults, and messages
pub mod constants;

/// SQLite-backed account store and rank registry
pub mod database;

/// Unified error handling and the response envelope
pub mod errors;

/// Structured logging setup
pub mod logging;

/// Bearer-token authentication middleware and role guards
pub mod middleware;

/// Core domain models
pub mod models;

/// HTTP route handlers and router assembly
pub mod routes;
