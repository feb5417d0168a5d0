#![allow(async_fn_in_trait)]

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use cantine_domain::menu::Weekday;
use cantine_domain::order::OrderStatus;
use cantine_domain::pagination::PageRequest;
use cantine_domain::user::{Department, Role, Site};

use crate::domain::types::{
    DayOrderCount, Dish, DishCategory, DishFilter, DishOrderCount, DishRatingSummary, Menu,
    MenuDish, MenuDishSpec, MenuInfoUpdate, NewDish, NewOrder, NewReview, Order, OrderFilter,
    OrderStats, RatedDish, Review, ReviewModerationFilter, User, UserFilter,
};
use crate::error::CantineError;

/// Repository for employee accounts. All reads exclude soft-deleted rows.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, CantineError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CantineError>;
    async fn create(&self, user: &User) -> Result<(), CantineError>;
    async fn list(&self, filter: &UserFilter, page: PageRequest)
    -> Result<Vec<User>, CantineError>;

    /// Self-service profile update; `None` fields are left untouched.
    async fn update_profile(
        &self,
        id: Uuid,
        first_name: Option<&str>,
        last_name: Option<&str>,
        department: Option<Department>,
        site: Option<Site>,
    ) -> Result<(), CantineError>;

    /// Admin role/site/department change.
    async fn update_access(
        &self,
        id: Uuid,
        role: Option<Role>,
        site: Option<Site>,
        department: Option<Department>,
        actor: Uuid,
    ) -> Result<(), CantineError>;

    async fn set_dark_theme(&self, id: Uuid, dark: bool) -> Result<(), CantineError>;

    /// Tombstone the account. Returns `false` if already deleted or missing.
    async fn soft_delete(&self, id: Uuid, actor: Uuid) -> Result<bool, CantineError>;
}

/// Repository for dish categories.
pub trait DishCategoryRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<DishCategory>, CantineError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<DishCategory>, CantineError>;
    async fn create(
        &self,
        name: &str,
        description: &str,
        color: &str,
        actor: Uuid,
    ) -> Result<DishCategory, CantineError>;
    async fn update(
        &self,
        id: i32,
        name: &str,
        description: &str,
        color: &str,
        actor: Uuid,
    ) -> Result<(), CantineError>;
    async fn soft_delete(&self, id: i32, actor: Uuid) -> Result<bool, CantineError>;
}

/// Repository for the dish catalog.
pub trait DishRepository: Send + Sync {
    async fn list(&self, filter: &DishFilter, page: PageRequest)
    -> Result<Vec<Dish>, CantineError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Dish>, CantineError>;
    async fn create(&self, dish: &NewDish, actor: Uuid) -> Result<Dish, CantineError>;
    async fn update(&self, id: i32, dish: &NewDish, actor: Uuid) -> Result<(), CantineError>;
    async fn set_active(&self, id: i32, active: bool, actor: Uuid) -> Result<(), CantineError>;
    async fn soft_delete(&self, id: i32, actor: Uuid) -> Result<bool, CantineError>;
}

/// Repository for menus and their dish lists.
pub trait MenuRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Menu>, CantineError>;

    async fn list_by_dates(
        &self,
        dates: &[NaiveDate],
        published_only: bool,
    ) -> Result<Vec<Menu>, CantineError>;

    async fn list_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        site: Site,
    ) -> Result<Vec<Menu>, CantineError>;

    /// Idempotent weekly-bootstrap primitive: return the existing menu for
    /// (date, site) or insert a skeleton with the given defaults. A
    /// concurrent duplicate insert resolves to the surviving row.
    async fn get_or_create(
        &self,
        date: NaiveDate,
        weekday: Weekday,
        site: Site,
        cutoff_at: DateTime<Utc>,
        actor: Uuid,
    ) -> Result<Menu, CantineError>;

    async fn set_published(
        &self,
        id: i32,
        published: bool,
        actor: Uuid,
    ) -> Result<(), CantineError>;

    async fn update_info(
        &self,
        id: i32,
        info: &MenuInfoUpdate,
        actor: Uuid,
    ) -> Result<(), CantineError>;

    /// Menu-dish rows joined with their dish, for display and consolidation.
    async fn list_dishes(&self, menu_id: i32) -> Result<Vec<(MenuDish, Dish)>, CantineError>;

    async fn find_menu_dish(
        &self,
        menu_id: i32,
        dish_id: i32,
    ) -> Result<Option<MenuDish>, CantineError>;

    /// Replace the dish list of a menu. Rows for dishes that remain keep
    /// their ordered-quantity counter; removed rows are deleted, new ones
    /// start at zero. One transaction.
    async fn replace_dishes(
        &self,
        menu_id: i32,
        entries: &[MenuDishSpec],
        actor: Uuid,
    ) -> Result<(), CantineError>;

    /// Future menus not yet published.
    async fn count_pending_publication(&self, today: NaiveDate) -> Result<u64, CantineError>;

    /// Published menus whose cutoff falls within the next 24 hours.
    async fn count_nearing_cutoff(&self, now: DateTime<Utc>) -> Result<u64, CantineError>;
}

/// Repository for orders and the menu-dish ordered-quantity counters.
///
/// The `*_with_counter(s)` methods are single transactions: the order write
/// and the counter mutation commit together or not at all, with the
/// menu-dish row locked (`SELECT … FOR UPDATE`) so concurrent placements
/// against the same dish serialize.
pub trait OrderRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Order>, CantineError>;

    /// The caller's non-deleted order on a menu, if any.
    async fn find_active_for_menu(
        &self,
        user_id: Uuid,
        menu_id: i32,
    ) -> Result<Option<Order>, CantineError>;

    async fn list_by_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Order>, CantineError>;

    async fn list_filtered(
        &self,
        filter: &OrderFilter,
        page: PageRequest,
    ) -> Result<Vec<Order>, CantineError>;

    /// Orders for one (date, site) in the given statuses, joined with their
    /// dish for the caterer's consolidation view.
    async fn list_for_day(
        &self,
        date: NaiveDate,
        site: Site,
        statuses: &[OrderStatus],
    ) -> Result<Vec<(Order, Dish)>, CantineError>;

    /// Insert a pending order and increment the menu-dish counter.
    async fn place_with_counter(&self, new: &NewOrder) -> Result<Order, CantineError>;

    /// Move an order to another dish of the same menu: decrement the old
    /// counter, increment the new one, update the order row.
    async fn swap_dish_with_counters(
        &self,
        order_id: i32,
        menu_id: i32,
        old_dish_id: i32,
        new_dish_id: i32,
        notes: &str,
        actor: Uuid,
    ) -> Result<(), CantineError>;

    async fn update_notes(&self, order_id: i32, notes: &str, actor: Uuid)
    -> Result<(), CantineError>;

    /// Cancel an order and decrement its counter. Idempotent: returns
    /// `false` without touching the counter when the order is already
    /// cancelled or deleted (re-checked under row lock).
    async fn cancel_with_counter(&self, order_id: i32, actor: Uuid) -> Result<bool, CantineError>;

    /// Plain status write for forward fulfilment moves; transition legality
    /// is the caller's responsibility.
    async fn update_status(
        &self,
        order_id: i32,
        status: OrderStatus,
        actor: Uuid,
    ) -> Result<(), CantineError>;

    /// Review-eligibility probe: a non-deleted order of the dish in a
    /// received status exists for the user.
    async fn has_received_order(&self, user_id: Uuid, dish_id: i32)
    -> Result<bool, CantineError>;

    async fn count_by_status(&self, filter: &OrderFilter) -> Result<OrderStats, CantineError>;

    async fn counts_by_day(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DayOrderCount>, CantineError>;

    async fn counts_by_dish(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        limit: u64,
    ) -> Result<Vec<DishOrderCount>, CantineError>;

    /// Recent received orders without a review, for rating prompts.
    async fn list_unreviewed_received(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<(Order, Dish)>, CantineError>;
}

/// Repository for reviews and their public aggregates.
pub trait ReviewRepository: Send + Sync {
    async fn find_by_id(&self, id: i32) -> Result<Option<Review>, CantineError>;

    /// The non-deleted review for (user, order), if any.
    async fn find_by_user_order(
        &self,
        user_id: Uuid,
        order_id: i32,
    ) -> Result<Option<Review>, CantineError>;

    async fn list_by_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Review>, CantineError>;

    async fn list_for_moderation(
        &self,
        filter: &ReviewModerationFilter,
        page: PageRequest,
    ) -> Result<Vec<Review>, CantineError>;

    /// Approved, non-deleted reviews of one dish, newest first.
    async fn list_public_for_dish(
        &self,
        dish_id: i32,
        page: PageRequest,
    ) -> Result<Vec<Review>, CantineError>;

    async fn create(&self, new: &NewReview) -> Result<Review, CantineError>;

    /// Overwrite rating/comment/anonymous and reset approval — the upsert
    /// path for re-submitted reviews.
    async fn update_content(
        &self,
        id: i32,
        rating: u8,
        comment: &str,
        anonymous: bool,
        actor: Uuid,
    ) -> Result<(), CantineError>;

    async fn set_approved(&self, id: i32, actor: Uuid) -> Result<(), CantineError>;

    async fn soft_delete(&self, id: i32, actor: Uuid) -> Result<bool, CantineError>;

    /// Average and count over approved, non-deleted reviews of a dish.
    async fn dish_rating(&self, dish_id: i32) -> Result<DishRatingSummary, CantineError>;

    async fn top_rated_dishes(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<RatedDish>, CantineError>;

    /// Approved-review counts per star value (index 0 = one star).
    async fn rating_distribution(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<[u64; 5], CantineError>;
}
