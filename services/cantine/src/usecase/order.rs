use chrono::{NaiveDate, Utc};
use std::collections::BTreeMap;
use uuid::Uuid;

use cantine_domain::order::OrderStatus;
use cantine_domain::pagination::PageRequest;
use cantine_domain::user::Site;

use crate::domain::repository::{DishRepository, MenuRepository, OrderRepository};
use crate::domain::types::{Dish, NewOrder, Order, OrderFilter, OrderStats};
use crate::error::CantineError;

// ── PlaceOrder ───────────────────────────────────────────────────────────────

pub struct PlaceOrderInput {
    pub menu_id: i32,
    pub dish_id: i32,
    pub special_notes: String,
}

pub struct PlaceOrderUseCase<O: OrderRepository, M: MenuRepository, D: DishRepository> {
    pub orders: O,
    pub menus: M,
    pub dishes: D,
}

impl<O: OrderRepository, M: MenuRepository, D: DishRepository> PlaceOrderUseCase<O, M, D> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: PlaceOrderInput,
    ) -> Result<Order, CantineError> {
        let menu = self
            .menus
            .find_by_id(input.menu_id)
            .await?
            .filter(|m| m.is_published)
            .ok_or(CantineError::MenuNotFound)?;

        if Utc::now() > menu.cutoff_at {
            return Err(CantineError::CutoffExpired);
        }

        if self
            .orders
            .find_active_for_menu(user_id, menu.id)
            .await?
            .is_some()
        {
            return Err(CantineError::DuplicateOrder);
        }

        self.dishes
            .find_by_id(input.dish_id)
            .await?
            .filter(|d| d.is_active)
            .ok_or(CantineError::DishNotFound)?;
        self.menus
            .find_menu_dish(menu.id, input.dish_id)
            .await?
            .ok_or(CantineError::DishNotFound)?;

        self.orders
            .place_with_counter(&NewOrder {
                user_id,
                menu_id: menu.id,
                dish_id: input.dish_id,
                special_notes: input.special_notes,
            })
            .await
    }
}

// ── ChangeOrderDish ──────────────────────────────────────────────────────────

pub struct ChangeOrderDishInput {
    pub new_dish_id: i32,
    pub special_notes: String,
}

pub struct ChangeOrderDishUseCase<O: OrderRepository, M: MenuRepository, D: DishRepository> {
    pub orders: O,
    pub menus: M,
    pub dishes: D,
}

impl<O: OrderRepository, M: MenuRepository, D: DishRepository> ChangeOrderDishUseCase<O, M, D> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        order_id: i32,
        input: ChangeOrderDishInput,
    ) -> Result<(), CantineError> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .filter(|o| o.user_id == user_id && !o.is_deleted)
            .ok_or(CantineError::OrderNotFound)?;

        let menu = self
            .menus
            .find_by_id(order.menu_id)
            .await?
            .ok_or(CantineError::MenuNotFound)?;
        if Utc::now() > menu.cutoff_at {
            return Err(CantineError::CutoffExpired);
        }

        if !order.status.is_modifiable() {
            return Err(CantineError::InvalidStatus);
        }

        self.dishes
            .find_by_id(input.new_dish_id)
            .await?
            .filter(|d| d.is_active)
            .ok_or(CantineError::DishNotFound)?;
        self.menus
            .find_menu_dish(order.menu_id, input.new_dish_id)
            .await?
            .ok_or(CantineError::DishNotFound)?;

        if input.new_dish_id == order.dish_id {
            // Same dish: only the notes change, counters stay put.
            return self
                .orders
                .update_notes(order.id, &input.special_notes, user_id)
                .await;
        }

        self.orders
            .swap_dish_with_counters(
                order.id,
                order.menu_id,
                order.dish_id,
                input.new_dish_id,
                &input.special_notes,
                user_id,
            )
            .await
    }
}

// ── CancelOrder ──────────────────────────────────────────────────────────────

pub struct CancelOrderUseCase<O: OrderRepository, M: MenuRepository> {
    pub orders: O,
    pub menus: M,
}

impl<O: OrderRepository, M: MenuRepository> CancelOrderUseCase<O, M> {
    pub async fn execute(&self, user_id: Uuid, order_id: i32) -> Result<(), CantineError> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .filter(|o| o.user_id == user_id)
            .ok_or(CantineError::OrderNotFound)?;

        // Cancelling twice is a no-op; the counter was already decremented.
        if order.is_deleted || order.status == OrderStatus::Cancelled {
            return Ok(());
        }

        let menu = self
            .menus
            .find_by_id(order.menu_id)
            .await?
            .ok_or(CantineError::MenuNotFound)?;
        if Utc::now() > menu.cutoff_at {
            return Err(CantineError::CutoffExpired);
        }

        self.orders.cancel_with_counter(order.id, user_id).await?;
        Ok(())
    }
}

// ── AdvanceOrderStatus (staff) ───────────────────────────────────────────────

pub struct AdvanceOrderStatusUseCase<O: OrderRepository> {
    pub orders: O,
}

impl<O: OrderRepository> AdvanceOrderStatusUseCase<O> {
    pub async fn execute(
        &self,
        actor: Uuid,
        order_id: i32,
        new_status: OrderStatus,
    ) -> Result<(), CantineError> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .filter(|o| !o.is_deleted)
            .ok_or(CantineError::OrderNotFound)?;

        if !order.status.can_transition_to(new_status) {
            return Err(CantineError::InvalidTransition);
        }

        if new_status == OrderStatus::Cancelled {
            // Keep the counter invariant: entering cancelled releases the
            // menu-dish slot, exactly once.
            self.orders.cancel_with_counter(order.id, actor).await?;
            return Ok(());
        }

        self.orders.update_status(order.id, new_status, actor).await
    }
}

// ── Queries ──────────────────────────────────────────────────────────────────

pub struct MyOrdersUseCase<O: OrderRepository> {
    pub orders: O,
}

impl<O: OrderRepository> MyOrdersUseCase<O> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Order>, CantineError> {
        self.orders.list_by_user(user_id, page).await
    }
}

pub struct OrderBoardUseCase<O: OrderRepository> {
    pub orders: O,
}

pub struct OrderBoard {
    pub orders: Vec<Order>,
    pub stats: OrderStats,
}

impl<O: OrderRepository> OrderBoardUseCase<O> {
    pub async fn execute(
        &self,
        filter: OrderFilter,
        page: PageRequest,
    ) -> Result<OrderBoard, CantineError> {
        let orders = self.orders.list_filtered(&filter, page).await?;
        let stats = self.orders.count_by_status(&filter).await?;
        Ok(OrderBoard { orders, stats })
    }
}

// ── Daily consolidation (caterer) ────────────────────────────────────────────

/// Per-dish rollup of the day's confirmed/ready orders.
pub struct DishConsolidation {
    pub dish: Dish,
    pub quantity: u64,
    pub confirmed: u64,
    pub ready: u64,
    pub special_notes: Vec<String>,
}

pub struct ConsolidateDayUseCase<O: OrderRepository> {
    pub orders: O,
}

impl<O: OrderRepository> ConsolidateDayUseCase<O> {
    pub async fn execute(
        &self,
        date: NaiveDate,
        site: Site,
    ) -> Result<Vec<DishConsolidation>, CantineError> {
        let rows = self
            .orders
            .list_for_day(date, site, &[OrderStatus::Confirmed, OrderStatus::Ready])
            .await?;

        let mut by_dish: BTreeMap<i32, DishConsolidation> = BTreeMap::new();
        for (order, dish) in rows {
            let entry = by_dish
                .entry(dish.id)
                .or_insert_with(|| DishConsolidation {
                    dish,
                    quantity: 0,
                    confirmed: 0,
                    ready: 0,
                    special_notes: Vec::new(),
                });
            entry.quantity += 1;
            match order.status {
                OrderStatus::Ready => entry.ready += 1,
                _ => entry.confirmed += 1,
            }
            if !order.special_notes.is_empty() {
                entry.special_notes.push(order.special_notes);
            }
        }

        let mut consolidation: Vec<_> = by_dish.into_values().collect();
        consolidation.sort_by(|a, b| a.dish.name.cmp(&b.dish.name));
        Ok(consolidation)
    }
}
