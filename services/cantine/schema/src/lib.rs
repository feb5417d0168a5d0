//! sea-orm entities for the cantine database, one module per table.
//!
//! Business tables carry the shared tombstone/audit column set
//! (`is_deleted`, `deleted_at`, `deleted_by`, `created_by`, `updated_by`,
//! `is_updated`); queries must filter `is_deleted` explicitly.

pub mod dish_categories;
pub mod dishes;
pub mod menu_dishes;
pub mod menus;
pub mod orders;
pub mod reviews;
pub mod users;
