use chrono::NaiveDate;
use uuid::Uuid;

use cantine_domain::menu::{Weekday, default_cutoff, work_week};
use cantine_domain::user::Site;

use crate::domain::repository::{DishRepository, MenuRepository};
use crate::domain::types::{Dish, Menu, MenuDish, MenuDishSpec, MenuInfoUpdate};
use crate::error::CantineError;

/// A menu together with its dish rows.
pub struct MenuWithDishes {
    pub menu: Menu,
    pub dishes: Vec<(MenuDish, Dish)>,
}

// ── EnsureWeek (bootstrap) ───────────────────────────────────────────────────

pub struct EnsureWeekUseCase<M: MenuRepository> {
    pub menus: M,
}

impl<M: MenuRepository> EnsureWeekUseCase<M> {
    /// Get-or-create the menu skeleton for every (work day, site) of the
    /// week containing `today`. Idempotent: existing menus are returned
    /// untouched.
    pub async fn execute(&self, actor: Uuid, today: NaiveDate) -> Result<Vec<Menu>, CantineError> {
        let dates = work_week(today);
        for date in dates {
            let weekday = Weekday::from_date(date).expect("work_week yields week days only");
            for site in Site::ALL {
                self.menus
                    .get_or_create(date, weekday, site, default_cutoff(date), actor)
                    .await?;
            }
        }
        self.menus.list_by_dates(&dates, false).await
    }
}

// ── Week menus (employee view) ───────────────────────────────────────────────

pub struct WeekMenusUseCase<M: MenuRepository> {
    pub menus: M,
}

impl<M: MenuRepository> WeekMenusUseCase<M> {
    /// The current week's published menus with their dish lists.
    pub async fn execute(&self, today: NaiveDate) -> Result<Vec<MenuWithDishes>, CantineError> {
        let dates = work_week(today);
        let menus = self.menus.list_by_dates(&dates, true).await?;
        let mut result = Vec::with_capacity(menus.len());
        for menu in menus {
            let dishes = self.menus.list_dishes(menu.id).await?;
            result.push(MenuWithDishes { menu, dishes });
        }
        Ok(result)
    }
}

// ── Menu detail ──────────────────────────────────────────────────────────────

pub struct MenuDetailUseCase<M: MenuRepository> {
    pub menus: M,
}

impl<M: MenuRepository> MenuDetailUseCase<M> {
    pub async fn execute(&self, menu_id: i32) -> Result<MenuWithDishes, CantineError> {
        let menu = self
            .menus
            .find_by_id(menu_id)
            .await?
            .ok_or(CantineError::MenuNotFound)?;
        let dishes = self.menus.list_dishes(menu.id).await?;
        Ok(MenuWithDishes { menu, dishes })
    }
}

// ── Publish / unpublish ──────────────────────────────────────────────────────

pub struct PublishMenuUseCase<M: MenuRepository> {
    pub menus: M,
}

impl<M: MenuRepository> PublishMenuUseCase<M> {
    pub async fn execute(
        &self,
        actor: Uuid,
        menu_id: i32,
        published: bool,
    ) -> Result<(), CantineError> {
        self.menus
            .find_by_id(menu_id)
            .await?
            .ok_or(CantineError::MenuNotFound)?;
        self.menus.set_published(menu_id, published, actor).await
    }
}

// ── Edit menu header ─────────────────────────────────────────────────────────

pub struct UpdateMenuUseCase<M: MenuRepository> {
    pub menus: M,
}

impl<M: MenuRepository> UpdateMenuUseCase<M> {
    pub async fn execute(
        &self,
        actor: Uuid,
        menu_id: i32,
        info: MenuInfoUpdate,
    ) -> Result<(), CantineError> {
        if info.title.is_none()
            && info.description.is_none()
            && info.cutoff_at.is_none()
            && info.max_orders.is_none()
        {
            return Err(CantineError::MissingData);
        }
        self.menus
            .find_by_id(menu_id)
            .await?
            .ok_or(CantineError::MenuNotFound)?;
        self.menus.update_info(menu_id, &info, actor).await
    }
}

// ── Replace a menu's dish list ───────────────────────────────────────────────

pub struct SetMenuDishesUseCase<M: MenuRepository, D: DishRepository> {
    pub menus: M,
    pub dishes: D,
}

impl<M: MenuRepository, D: DishRepository> SetMenuDishesUseCase<M, D> {
    pub async fn execute(
        &self,
        actor: Uuid,
        menu_id: i32,
        entries: Vec<MenuDishSpec>,
    ) -> Result<(), CantineError> {
        self.menus
            .find_by_id(menu_id)
            .await?
            .ok_or(CantineError::MenuNotFound)?;
        for entry in &entries {
            self.dishes
                .find_by_id(entry.dish_id)
                .await?
                .filter(|d| d.is_active)
                .ok_or(CantineError::DishNotFound)?;
        }
        self.menus.replace_dishes(menu_id, &entries, actor).await
    }
}

// ── Weekly consolidation (caterer) ───────────────────────────────────────────

/// One menu's planned-vs-ordered totals.
pub struct MenuConsolidation {
    pub menu: Menu,
    pub dishes: Vec<(MenuDish, Dish)>,
    pub total_ordered: i64,
}

pub struct ConsolidateRangeUseCase<M: MenuRepository> {
    pub menus: M,
}

impl<M: MenuRepository> ConsolidateRangeUseCase<M> {
    pub async fn execute(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        site: Site,
    ) -> Result<Vec<MenuConsolidation>, CantineError> {
        let menus = self.menus.list_range(from, to, site).await?;
        let mut result = Vec::with_capacity(menus.len());
        for menu in menus {
            let dishes = self.menus.list_dishes(menu.id).await?;
            let total_ordered = dishes
                .iter()
                .map(|(md, _)| md.ordered_quantity as i64)
                .sum();
            result.push(MenuConsolidation {
                menu,
                dishes,
                total_ordered,
            });
        }
        Ok(result)
    }
}
