use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use cantine_domain::menu::Weekday;
use cantine_domain::order::OrderStatus;
use cantine_domain::user::{Department, Role, Site};

/// Employee account.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub site: Site,
    pub department: Department,
    pub dark_theme: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Dish category.
#[derive(Debug, Clone)]
pub struct DishCategory {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub color: String,
}

/// Orderable dish from the catalog.
#[derive(Debug, Clone)]
pub struct Dish {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub category_id: Option<i32>,
    pub allergens: String,
    pub price_cents: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Input for creating or editing a dish.
#[derive(Debug, Clone)]
pub struct NewDish {
    pub name: String,
    pub description: String,
    pub category_id: Option<i32>,
    pub allergens: String,
    pub price_cents: i32,
}

/// Menu offered at one site on one work day.
#[derive(Debug, Clone)]
pub struct Menu {
    pub id: i32,
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub site: Site,
    pub title: String,
    pub description: String,
    pub is_published: bool,
    pub cutoff_at: DateTime<Utc>,
    pub max_orders: i32,
}

impl Menu {
    /// Ordering is open while the menu is published and the cutoff has not
    /// passed.
    pub fn ordering_open(&self, now: DateTime<Utc>) -> bool {
        self.is_published && now <= self.cutoff_at
    }
}

/// Join row putting a dish on a menu, with quantity counters.
#[derive(Debug, Clone)]
pub struct MenuDish {
    pub id: i32,
    pub menu_id: i32,
    pub dish_id: i32,
    pub price_cents: i32,
    pub max_quantity: i32,
    pub planned_quantity: i32,
    pub ordered_quantity: i32,
}

/// Requested dish entry when (re)composing a menu.
#[derive(Debug, Clone)]
pub struct MenuDishSpec {
    pub dish_id: i32,
    pub price_cents: i32,
    pub max_quantity: i32,
    pub planned_quantity: i32,
}

/// Editable menu header fields.
#[derive(Debug, Clone)]
pub struct MenuInfoUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub cutoff_at: Option<DateTime<Utc>>,
    pub max_orders: Option<i32>,
}

/// One user's order for one dish from one menu.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: i32,
    pub user_id: Uuid,
    pub menu_id: i32,
    pub dish_id: i32,
    pub status: OrderStatus,
    pub special_notes: String,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for placing an order.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: Uuid,
    pub menu_id: i32,
    pub dish_id: i32,
    pub special_notes: String,
}

/// A review tied to a fulfilled order.
#[derive(Debug, Clone)]
pub struct Review {
    pub id: i32,
    pub user_id: Uuid,
    pub dish_id: i32,
    pub order_id: i32,
    pub rating: u8,
    pub comment: String,
    pub is_anonymous: bool,
    pub is_approved: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a review.
#[derive(Debug, Clone)]
pub struct NewReview {
    pub user_id: Uuid,
    pub dish_id: i32,
    pub order_id: i32,
    pub rating: u8,
    pub comment: String,
    pub is_anonymous: bool,
}

// ── List filters ─────────────────────────────────────────────────────────────

/// Admin user-directory filter.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub query: Option<String>,
    pub role: Option<Role>,
    pub site: Option<Site>,
    pub department: Option<Department>,
}

/// Dish-catalog filter.
#[derive(Debug, Clone, Default)]
pub struct DishFilter {
    pub category_id: Option<i32>,
    pub query: Option<String>,
    pub include_inactive: bool,
}

/// Admin order-board filter.
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub site: Option<Site>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Review-moderation filter; `approved: None` lists everything.
#[derive(Debug, Clone, Default)]
pub struct ReviewModerationFilter {
    pub approved: Option<bool>,
    pub dish_id: Option<i32>,
}

// ── Aggregates ───────────────────────────────────────────────────────────────

/// Per-status order counts for the admin board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderStats {
    pub total: u64,
    pub pending: u64,
    pub confirmed: u64,
    pub ready: u64,
    pub delivered: u64,
}

/// Order count for one calendar day.
#[derive(Debug, Clone)]
pub struct DayOrderCount {
    pub date: NaiveDate,
    pub total: u64,
    pub confirmed: u64,
    pub delivered: u64,
}

/// Order count for one dish.
#[derive(Debug, Clone)]
pub struct DishOrderCount {
    pub dish_id: i32,
    pub dish_name: String,
    pub total: u64,
}

/// Public rating summary of one dish (approved reviews only).
#[derive(Debug, Clone, Default)]
pub struct DishRatingSummary {
    pub average: Option<f64>,
    pub count: u64,
}

/// A dish ranked by its approved-review average.
#[derive(Debug, Clone)]
pub struct RatedDish {
    pub dish_id: i32,
    pub dish_name: String,
    pub average: f64,
    pub count: u64,
}

// ── Validation helpers ───────────────────────────────────────────────────────

/// Ratings are 1–5 stars.
pub fn validate_rating(rating: u8) -> bool {
    (1..=5).contains(&rating)
}

/// Registration is restricted to the company email domain: the address's
/// domain must equal the allowed domain or be a subdomain of it.
pub fn validate_company_email(email: &str, allowed_domain: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() {
        return false;
    }
    domain == allowed_domain || domain.ends_with(&format!(".{allowed_domain}"))
}
