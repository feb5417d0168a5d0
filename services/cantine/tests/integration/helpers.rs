//! Shared in-memory repositories for usecase tests.
//!
//! The mocks keep their rows behind `Arc<Mutex<_>>` so a cloned handle can
//! inspect state after a usecase ran, and so the order mock can mutate the
//! menu mock's counters the way the real transactions do.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use uuid::Uuid;

use cantine::domain::repository::{
    DishRepository, MenuRepository, OrderRepository, ReviewRepository,
};
use cantine::domain::types::{
    DayOrderCount, Dish, DishFilter, DishOrderCount, DishRatingSummary, Menu, MenuDish,
    MenuDishSpec, MenuInfoUpdate, NewDish, NewOrder, NewReview, Order, OrderFilter, OrderStats,
    RatedDish, Review, ReviewModerationFilter,
};
use cantine::error::CantineError;
use cantine_domain::menu::Weekday;
use cantine_domain::order::OrderStatus;
use cantine_domain::pagination::PageRequest;
use cantine_domain::user::Site;

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn test_date() -> NaiveDate {
    // A Wednesday.
    NaiveDate::from_ymd_opt(2026, 4, 8).unwrap()
}

pub fn test_menu(id: i32, cutoff_at: DateTime<Utc>, published: bool) -> Menu {
    Menu {
        id,
        date: test_date(),
        weekday: Weekday::Wednesday,
        site: Site::Danga,
        title: String::new(),
        description: String::new(),
        is_published: published,
        cutoff_at,
        max_orders: 100,
    }
}

pub fn open_menu(id: i32) -> Menu {
    test_menu(id, Utc::now() + Duration::hours(4), true)
}

pub fn test_dish(id: i32, name: &str) -> Dish {
    Dish {
        id,
        name: name.to_owned(),
        description: String::new(),
        category_id: None,
        allergens: String::new(),
        price_cents: 950,
        is_active: true,
        created_at: Utc::now(),
    }
}

pub fn test_menu_dish(id: i32, menu_id: i32, dish_id: i32) -> MenuDish {
    MenuDish {
        id,
        menu_id,
        dish_id,
        price_cents: 950,
        max_quantity: 50,
        planned_quantity: 20,
        ordered_quantity: 0,
    }
}

// ── MockDishRepo ─────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockDishRepo {
    pub dishes: Arc<Mutex<Vec<Dish>>>,
}

impl MockDishRepo {
    pub fn new(dishes: Vec<Dish>) -> Self {
        Self {
            dishes: Arc::new(Mutex::new(dishes)),
        }
    }
}

impl DishRepository for MockDishRepo {
    async fn list(
        &self,
        filter: &DishFilter,
        _page: PageRequest,
    ) -> Result<Vec<Dish>, CantineError> {
        Ok(self
            .dishes
            .lock()
            .unwrap()
            .iter()
            .filter(|d| filter.include_inactive || d.is_active)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Dish>, CantineError> {
        Ok(self
            .dishes
            .lock()
            .unwrap()
            .iter()
            .find(|d| d.id == id)
            .cloned())
    }

    async fn create(&self, new: &NewDish, _actor: Uuid) -> Result<Dish, CantineError> {
        let mut dishes = self.dishes.lock().unwrap();
        let id = dishes.iter().map(|d| d.id).max().unwrap_or(0) + 1;
        let dish = Dish {
            id,
            name: new.name.clone(),
            description: new.description.clone(),
            category_id: new.category_id,
            allergens: new.allergens.clone(),
            price_cents: new.price_cents,
            is_active: true,
            created_at: Utc::now(),
        };
        dishes.push(dish.clone());
        Ok(dish)
    }

    async fn update(&self, _id: i32, _new: &NewDish, _actor: Uuid) -> Result<(), CantineError> {
        Ok(())
    }

    async fn set_active(&self, id: i32, active: bool, _actor: Uuid) -> Result<(), CantineError> {
        if let Some(dish) = self.dishes.lock().unwrap().iter_mut().find(|d| d.id == id) {
            dish.is_active = active;
        }
        Ok(())
    }

    async fn soft_delete(&self, id: i32, _actor: Uuid) -> Result<bool, CantineError> {
        let mut dishes = self.dishes.lock().unwrap();
        let before = dishes.len();
        dishes.retain(|d| d.id != id);
        Ok(dishes.len() < before)
    }
}

// ── MockMenuRepo ─────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockMenuRepo {
    pub menus: Arc<Mutex<Vec<Menu>>>,
    pub menu_dishes: Arc<Mutex<Vec<MenuDish>>>,
    pub dishes: Arc<Mutex<Vec<Dish>>>,
}

impl MockMenuRepo {
    pub fn new(menus: Vec<Menu>, menu_dishes: Vec<MenuDish>, dishes: &MockDishRepo) -> Self {
        Self {
            menus: Arc::new(Mutex::new(menus)),
            menu_dishes: Arc::new(Mutex::new(menu_dishes)),
            dishes: Arc::clone(&dishes.dishes),
        }
    }

    pub fn counter(&self, menu_id: i32, dish_id: i32) -> i32 {
        self.menu_dishes
            .lock()
            .unwrap()
            .iter()
            .find(|md| md.menu_id == menu_id && md.dish_id == dish_id)
            .map(|md| md.ordered_quantity)
            .expect("menu dish row missing")
    }
}

impl MenuRepository for MockMenuRepo {
    async fn find_by_id(&self, id: i32) -> Result<Option<Menu>, CantineError> {
        Ok(self
            .menus
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.id == id)
            .cloned())
    }

    async fn list_by_dates(
        &self,
        dates: &[NaiveDate],
        published_only: bool,
    ) -> Result<Vec<Menu>, CantineError> {
        Ok(self
            .menus
            .lock()
            .unwrap()
            .iter()
            .filter(|m| dates.contains(&m.date) && (!published_only || m.is_published))
            .cloned()
            .collect())
    }

    async fn list_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        site: Site,
    ) -> Result<Vec<Menu>, CantineError> {
        Ok(self
            .menus
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.date >= from && m.date <= to && m.site == site)
            .cloned()
            .collect())
    }

    async fn get_or_create(
        &self,
        date: NaiveDate,
        weekday: Weekday,
        site: Site,
        cutoff_at: DateTime<Utc>,
        _actor: Uuid,
    ) -> Result<Menu, CantineError> {
        let mut menus = self.menus.lock().unwrap();
        if let Some(menu) = menus.iter().find(|m| m.date == date && m.site == site) {
            return Ok(menu.clone());
        }
        let id = menus.iter().map(|m| m.id).max().unwrap_or(0) + 1;
        let menu = Menu {
            id,
            date,
            weekday,
            site,
            title: String::new(),
            description: String::new(),
            is_published: false,
            cutoff_at,
            max_orders: 100,
        };
        menus.push(menu.clone());
        Ok(menu)
    }

    async fn set_published(
        &self,
        id: i32,
        published: bool,
        _actor: Uuid,
    ) -> Result<(), CantineError> {
        if let Some(menu) = self.menus.lock().unwrap().iter_mut().find(|m| m.id == id) {
            menu.is_published = published;
        }
        Ok(())
    }

    async fn update_info(
        &self,
        id: i32,
        info: &MenuInfoUpdate,
        _actor: Uuid,
    ) -> Result<(), CantineError> {
        if let Some(menu) = self.menus.lock().unwrap().iter_mut().find(|m| m.id == id) {
            if let Some(ref title) = info.title {
                menu.title = title.clone();
            }
            if let Some(ref description) = info.description {
                menu.description = description.clone();
            }
            if let Some(cutoff_at) = info.cutoff_at {
                menu.cutoff_at = cutoff_at;
            }
            if let Some(max_orders) = info.max_orders {
                menu.max_orders = max_orders;
            }
        }
        Ok(())
    }

    async fn list_dishes(&self, menu_id: i32) -> Result<Vec<(MenuDish, Dish)>, CantineError> {
        let dishes = self.dishes.lock().unwrap();
        Ok(self
            .menu_dishes
            .lock()
            .unwrap()
            .iter()
            .filter(|md| md.menu_id == menu_id)
            .filter_map(|md| {
                dishes
                    .iter()
                    .find(|d| d.id == md.dish_id)
                    .map(|d| (md.clone(), d.clone()))
            })
            .collect())
    }

    async fn find_menu_dish(
        &self,
        menu_id: i32,
        dish_id: i32,
    ) -> Result<Option<MenuDish>, CantineError> {
        Ok(self
            .menu_dishes
            .lock()
            .unwrap()
            .iter()
            .find(|md| md.menu_id == menu_id && md.dish_id == dish_id)
            .cloned())
    }

    async fn replace_dishes(
        &self,
        menu_id: i32,
        entries: &[MenuDishSpec],
        _actor: Uuid,
    ) -> Result<(), CantineError> {
        let mut rows = self.menu_dishes.lock().unwrap();
        let keep: Vec<i32> = entries.iter().map(|e| e.dish_id).collect();
        rows.retain(|md| md.menu_id != menu_id || keep.contains(&md.dish_id));
        let mut next_id = rows.iter().map(|md| md.id).max().unwrap_or(0) + 1;
        for entry in entries {
            if let Some(row) = rows
                .iter_mut()
                .find(|md| md.menu_id == menu_id && md.dish_id == entry.dish_id)
            {
                row.price_cents = entry.price_cents;
                row.max_quantity = entry.max_quantity;
                row.planned_quantity = entry.planned_quantity;
            } else {
                rows.push(MenuDish {
                    id: next_id,
                    menu_id,
                    dish_id: entry.dish_id,
                    price_cents: entry.price_cents,
                    max_quantity: entry.max_quantity,
                    planned_quantity: entry.planned_quantity,
                    ordered_quantity: 0,
                });
                next_id += 1;
            }
        }
        Ok(())
    }

    async fn count_pending_publication(&self, today: NaiveDate) -> Result<u64, CantineError> {
        Ok(self
            .menus
            .lock()
            .unwrap()
            .iter()
            .filter(|m| !m.is_published && m.date >= today)
            .count() as u64)
    }

    async fn count_nearing_cutoff(&self, now: DateTime<Utc>) -> Result<u64, CantineError> {
        Ok(self
            .menus
            .lock()
            .unwrap()
            .iter()
            .filter(|m| {
                m.is_published && m.cutoff_at >= now && m.cutoff_at <= now + Duration::hours(24)
            })
            .count() as u64)
    }
}

// ── MockOrderRepo ────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockOrderRepo {
    pub orders: Arc<Mutex<Vec<Order>>>,
    pub menus: Arc<Mutex<Vec<Menu>>>,
    pub menu_dishes: Arc<Mutex<Vec<MenuDish>>>,
    pub dishes: Arc<Mutex<Vec<Dish>>>,
}

impl MockOrderRepo {
    pub fn new(menus: &MockMenuRepo) -> Self {
        Self {
            orders: Arc::new(Mutex::new(Vec::new())),
            menus: Arc::clone(&menus.menus),
            menu_dishes: Arc::clone(&menus.menu_dishes),
            dishes: Arc::clone(&menus.dishes),
        }
    }

    fn bump(&self, menu_id: i32, dish_id: i32, delta: i32) {
        if let Some(row) = self
            .menu_dishes
            .lock()
            .unwrap()
            .iter_mut()
            .find(|md| md.menu_id == menu_id && md.dish_id == dish_id)
        {
            row.ordered_quantity += delta;
        }
    }
}

impl OrderRepository for MockOrderRepo {
    async fn find_by_id(&self, id: i32) -> Result<Option<Order>, CantineError> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.id == id)
            .cloned())
    }

    async fn find_active_for_menu(
        &self,
        user_id: Uuid,
        menu_id: i32,
    ) -> Result<Option<Order>, CantineError> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.user_id == user_id && o.menu_id == menu_id && !o.is_deleted)
            .cloned())
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        _page: PageRequest,
    ) -> Result<Vec<Order>, CantineError> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .filter(|o| o.user_id == user_id && !o.is_deleted)
            .cloned()
            .collect())
    }

    async fn list_filtered(
        &self,
        filter: &OrderFilter,
        _page: PageRequest,
    ) -> Result<Vec<Order>, CantineError> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .filter(|o| !o.is_deleted)
            .filter(|o| filter.status.is_none_or(|s| o.status == s))
            .cloned()
            .collect())
    }

    async fn list_for_day(
        &self,
        date: NaiveDate,
        site: Site,
        statuses: &[OrderStatus],
    ) -> Result<Vec<(Order, Dish)>, CantineError> {
        let menus = self.menus.lock().unwrap();
        let dishes = self.dishes.lock().unwrap();
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .filter(|o| !o.is_deleted && statuses.contains(&o.status))
            .filter(|o| {
                menus
                    .iter()
                    .any(|m| m.id == o.menu_id && m.date == date && m.site == site)
            })
            .filter_map(|o| {
                dishes
                    .iter()
                    .find(|d| d.id == o.dish_id)
                    .map(|d| (o.clone(), d.clone()))
            })
            .collect())
    }

    async fn place_with_counter(&self, new: &NewOrder) -> Result<Order, CantineError> {
        {
            let rows = self.menu_dishes.lock().unwrap();
            if !rows
                .iter()
                .any(|md| md.menu_id == new.menu_id && md.dish_id == new.dish_id)
            {
                return Err(CantineError::DishNotFound);
            }
        }
        let order = {
            let mut orders = self.orders.lock().unwrap();
            let id = orders.iter().map(|o| o.id).max().unwrap_or(0) + 1;
            let now = Utc::now();
            let order = Order {
                id,
                user_id: new.user_id,
                menu_id: new.menu_id,
                dish_id: new.dish_id,
                status: OrderStatus::Pending,
                special_notes: new.special_notes.clone(),
                is_deleted: false,
                created_at: now,
                updated_at: now,
            };
            orders.push(order.clone());
            order
        };
        self.bump(new.menu_id, new.dish_id, 1);
        Ok(order)
    }

    async fn swap_dish_with_counters(
        &self,
        order_id: i32,
        menu_id: i32,
        old_dish_id: i32,
        new_dish_id: i32,
        notes: &str,
        _actor: Uuid,
    ) -> Result<(), CantineError> {
        self.bump(menu_id, old_dish_id, -1);
        self.bump(menu_id, new_dish_id, 1);
        if let Some(order) = self
            .orders
            .lock()
            .unwrap()
            .iter_mut()
            .find(|o| o.id == order_id)
        {
            order.dish_id = new_dish_id;
            order.special_notes = notes.to_owned();
            order.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn update_notes(
        &self,
        order_id: i32,
        notes: &str,
        _actor: Uuid,
    ) -> Result<(), CantineError> {
        if let Some(order) = self
            .orders
            .lock()
            .unwrap()
            .iter_mut()
            .find(|o| o.id == order_id)
        {
            order.special_notes = notes.to_owned();
        }
        Ok(())
    }

    async fn cancel_with_counter(&self, order_id: i32, _actor: Uuid) -> Result<bool, CantineError> {
        let (menu_id, dish_id) = {
            let mut orders = self.orders.lock().unwrap();
            let order = orders
                .iter_mut()
                .find(|o| o.id == order_id)
                .ok_or(CantineError::OrderNotFound)?;
            if order.is_deleted || order.status == OrderStatus::Cancelled {
                return Ok(false);
            }
            order.status = OrderStatus::Cancelled;
            order.is_deleted = true;
            (order.menu_id, order.dish_id)
        };
        self.bump(menu_id, dish_id, -1);
        Ok(true)
    }

    async fn update_status(
        &self,
        order_id: i32,
        status: OrderStatus,
        _actor: Uuid,
    ) -> Result<(), CantineError> {
        if let Some(order) = self
            .orders
            .lock()
            .unwrap()
            .iter_mut()
            .find(|o| o.id == order_id)
        {
            order.status = status;
        }
        Ok(())
    }

    async fn has_received_order(
        &self,
        user_id: Uuid,
        dish_id: i32,
    ) -> Result<bool, CantineError> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .any(|o| {
                o.user_id == user_id && o.dish_id == dish_id && !o.is_deleted
                    && o.status.is_received()
            }))
    }

    async fn count_by_status(&self, _filter: &OrderFilter) -> Result<OrderStats, CantineError> {
        let orders = self.orders.lock().unwrap();
        let count = |status: OrderStatus| {
            orders
                .iter()
                .filter(|o| !o.is_deleted && o.status == status)
                .count() as u64
        };
        Ok(OrderStats {
            total: orders.iter().filter(|o| !o.is_deleted).count() as u64,
            pending: count(OrderStatus::Pending),
            confirmed: count(OrderStatus::Confirmed),
            ready: count(OrderStatus::Ready),
            delivered: count(OrderStatus::Delivered),
        })
    }

    async fn counts_by_day(
        &self,
        _from: NaiveDate,
        _to: NaiveDate,
    ) -> Result<Vec<DayOrderCount>, CantineError> {
        Ok(vec![])
    }

    async fn counts_by_dish(
        &self,
        _from: NaiveDate,
        _to: NaiveDate,
        _limit: u64,
    ) -> Result<Vec<DishOrderCount>, CantineError> {
        Ok(vec![])
    }

    async fn list_unreviewed_received(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<(Order, Dish)>, CantineError> {
        let dishes = self.dishes.lock().unwrap();
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .filter(|o| {
                o.user_id == user_id && !o.is_deleted && o.status.is_received()
                    && o.created_at >= since
            })
            .take(limit as usize)
            .filter_map(|o| {
                dishes
                    .iter()
                    .find(|d| d.id == o.dish_id)
                    .map(|d| (o.clone(), d.clone()))
            })
            .collect())
    }
}

// ── MockReviewRepo ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockReviewRepo {
    pub reviews: Arc<Mutex<Vec<Review>>>,
}

impl MockReviewRepo {
    pub fn new() -> Self {
        Self {
            reviews: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl ReviewRepository for MockReviewRepo {
    async fn find_by_id(&self, id: i32) -> Result<Option<Review>, CantineError> {
        Ok(self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == id)
            .cloned())
    }

    async fn find_by_user_order(
        &self,
        user_id: Uuid,
        order_id: i32,
    ) -> Result<Option<Review>, CantineError> {
        Ok(self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.user_id == user_id && r.order_id == order_id)
            .cloned())
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        _page: PageRequest,
    ) -> Result<Vec<Review>, CantineError> {
        Ok(self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_for_moderation(
        &self,
        filter: &ReviewModerationFilter,
        _page: PageRequest,
    ) -> Result<Vec<Review>, CantineError> {
        Ok(self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .filter(|r| filter.approved.is_none_or(|a| r.is_approved == a))
            .filter(|r| filter.dish_id.is_none_or(|d| r.dish_id == d))
            .cloned()
            .collect())
    }

    async fn list_public_for_dish(
        &self,
        dish_id: i32,
        _page: PageRequest,
    ) -> Result<Vec<Review>, CantineError> {
        Ok(self
            .reviews
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.dish_id == dish_id && r.is_approved)
            .cloned()
            .collect())
    }

    async fn create(&self, new: &NewReview) -> Result<Review, CantineError> {
        let mut reviews = self.reviews.lock().unwrap();
        let id = reviews.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let now = Utc::now();
        let review = Review {
            id,
            user_id: new.user_id,
            dish_id: new.dish_id,
            order_id: new.order_id,
            rating: new.rating,
            comment: new.comment.clone(),
            is_anonymous: new.is_anonymous,
            is_approved: false,
            created_at: now,
            updated_at: now,
        };
        reviews.push(review.clone());
        Ok(review)
    }

    async fn update_content(
        &self,
        id: i32,
        rating: u8,
        comment: &str,
        anonymous: bool,
        _actor: Uuid,
    ) -> Result<(), CantineError> {
        if let Some(review) = self.reviews.lock().unwrap().iter_mut().find(|r| r.id == id) {
            review.rating = rating;
            review.comment = comment.to_owned();
            review.is_anonymous = anonymous;
            review.is_approved = false;
            review.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn set_approved(&self, id: i32, _actor: Uuid) -> Result<(), CantineError> {
        if let Some(review) = self.reviews.lock().unwrap().iter_mut().find(|r| r.id == id) {
            review.is_approved = true;
        }
        Ok(())
    }

    async fn soft_delete(&self, id: i32, _actor: Uuid) -> Result<bool, CantineError> {
        let mut reviews = self.reviews.lock().unwrap();
        let before = reviews.len();
        reviews.retain(|r| r.id != id);
        Ok(reviews.len() < before)
    }

    async fn dish_rating(&self, dish_id: i32) -> Result<DishRatingSummary, CantineError> {
        let reviews = self.reviews.lock().unwrap();
        let ratings: Vec<u8> = reviews
            .iter()
            .filter(|r| r.dish_id == dish_id && r.is_approved)
            .map(|r| r.rating)
            .collect();
        if ratings.is_empty() {
            return Ok(DishRatingSummary::default());
        }
        let sum: u64 = ratings.iter().map(|&r| r as u64).sum();
        Ok(DishRatingSummary {
            average: Some(sum as f64 / ratings.len() as f64),
            count: ratings.len() as u64,
        })
    }

    async fn top_rated_dishes(
        &self,
        _from: DateTime<Utc>,
        _to: DateTime<Utc>,
        _limit: u64,
    ) -> Result<Vec<RatedDish>, CantineError> {
        Ok(vec![])
    }

    async fn rating_distribution(
        &self,
        _from: DateTime<Utc>,
        _to: DateTime<Utc>,
    ) -> Result<[u64; 5], CantineError> {
        let mut distribution = [0u64; 5];
        for review in self.reviews.lock().unwrap().iter() {
            if review.is_approved && (1..=5).contains(&review.rating) {
                distribution[(review.rating - 1) as usize] += 1;
            }
        }
        Ok(distribution)
    }
}

/// A fully wired mock world: one open menu (id 1) on `test_date()` at Danga
/// with two dishes — "Salade César" (1) and "Poulet Rôti" (2).
pub struct World {
    pub dishes: MockDishRepo,
    pub menus: MockMenuRepo,
    pub orders: MockOrderRepo,
    pub reviews: MockReviewRepo,
}

pub fn world() -> World {
    let dishes = MockDishRepo::new(vec![
        test_dish(1, "Salade César"),
        test_dish(2, "Poulet Rôti"),
    ]);
    let menus = MockMenuRepo::new(
        vec![open_menu(1)],
        vec![test_menu_dish(1, 1, 1), test_menu_dish(2, 1, 2)],
        &dishes,
    );
    let orders = MockOrderRepo::new(&menus);
    World {
        dishes,
        menus,
        orders,
        reviews: MockReviewRepo::new(),
    }
}
