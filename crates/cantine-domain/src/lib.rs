//! Shared domain types for the cantine service.
//!
//! Closed enums for roles, sites, departments, menu weekdays and order
//! statuses, plus the pagination types every list endpoint shares.

pub mod menu;
pub mod order;
pub mod pagination;
pub mod user;
