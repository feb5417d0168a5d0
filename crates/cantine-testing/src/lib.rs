//! Test utilities for the cantine service.
//!
//! Provides `SessionAuth`, a helper that mints real signed access-token
//! cookies so router-level tests can exercise protected endpoints.
//! Import in `#[cfg(test)]` blocks and dev-dependencies only.

pub mod auth;
