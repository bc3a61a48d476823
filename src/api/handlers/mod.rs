//! API request handlers.
//!
//! This module contains all HTTP request handlers organized by functionality.

/// Signup, signin and the token-gated account routes.
pub mod auth;
/// Health check handler.
pub mod health;
/// Generic collection CRUD handlers shared by v1 and v2.
pub mod resources;
