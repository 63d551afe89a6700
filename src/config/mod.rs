// ABOUTME: Configuration management modules
// ABOUTME: Re-exports environment-driven server configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 MMS Project

//! Configuration management

/// Environment-based server configuration
pub mod environment;
