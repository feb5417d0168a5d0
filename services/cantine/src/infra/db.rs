use anyhow::Context as _;
use chrono::{DateTime, Days, NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection,
    EntityTrait,
    FromQueryResult, IntoActiveModel as _, JoinType, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Statement, TransactionError, TransactionTrait,
    sea_query::{Expr, Query},
};
use uuid::Uuid;

use cantine_domain::menu::Weekday;
use cantine_domain::order::OrderStatus;
use cantine_domain::pagination::PageRequest;
use cantine_domain::user::{Department, Role, Site};
use cantine_schema::{dish_categories, dishes, menu_dishes, menus, orders, reviews, users};

use crate::domain::repository::{
    DishCategoryRepository, DishRepository, MenuRepository, OrderRepository, ReviewRepository,
    UserRepository,
};
use crate::domain::types::{
    DayOrderCount, Dish, DishCategory, DishFilter, DishOrderCount, DishRatingSummary, Menu,
    MenuDish, MenuDishSpec, MenuInfoUpdate, NewDish, NewOrder, NewReview, Order, OrderFilter,
    OrderStats, RatedDish, Review, ReviewModerationFilter, User, UserFilter,
};
use crate::error::CantineError;

/// Unwrap a transaction result, flattening connection failures into the
/// internal-error variant.
fn txn_err(err: TransactionError<CantineError>, ctx: &'static str) -> CantineError {
    match err {
        TransactionError::Connection(db) => {
            CantineError::Internal(anyhow::Error::new(db).context(ctx))
        }
        TransactionError::Transaction(inner) => inner,
    }
}

/// Decode a stored enum wire value, failing loudly on corrupt rows.
fn decode<T>(value: i16, decode: fn(u8) -> Option<T>, column: &'static str) -> Result<T, CantineError> {
    u8::try_from(value)
        .ok()
        .and_then(decode)
        .ok_or_else(|| CantineError::Internal(anyhow::anyhow!("invalid {column} value {value}")))
}

fn day_bounds(from: Option<NaiveDate>, to: Option<NaiveDate>) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    let start = from.map(|d| d.and_hms_opt(0, 0, 0).expect("valid time").and_utc());
    let end = to.map(|d| {
        (d + Days::new(1))
            .and_hms_opt(0, 0, 0)
            .expect("valid time")
            .and_utc()
    });
    (start, end)
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, CantineError> {
        let model = users::Entity::find_by_id(id)
            .filter(users::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await
            .context("find user by id")?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, CantineError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .filter(users::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await
            .context("find user by email")?;
        model.map(user_from_model).transpose()
    }

    async fn create(&self, user: &User) -> Result<(), CantineError> {
        users::ActiveModel {
            id: Set(user.id),
            first_name: Set(user.first_name.clone()),
            last_name: Set(user.last_name.clone()),
            email: Set(user.email.clone()),
            password_hash: Set(user.password_hash.clone()),
            role: Set(user.role.as_u8() as i16),
            site: Set(user.site.as_u8() as i16),
            department: Set(user.department.as_u8() as i16),
            dark_theme: Set(user.dark_theme),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
            is_updated: Set(false),
            is_deleted: Set(false),
            deleted_at: Set(None),
            created_by: Set(None),
            updated_by: Set(None),
            deleted_by: Set(None),
        }
        .insert(&self.db)
        .await
        .context("create user")?;
        Ok(())
    }

    async fn list(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> Result<Vec<User>, CantineError> {
        let page = page.clamped();
        let mut query = users::Entity::find().filter(users::Column::IsDeleted.eq(false));
        if let Some(ref q) = filter.query {
            query = query.filter(
                Condition::any()
                    .add(users::Column::FirstName.contains(q.as_str()))
                    .add(users::Column::LastName.contains(q.as_str()))
                    .add(users::Column::Email.contains(q.as_str())),
            );
        }
        if let Some(role) = filter.role {
            query = query.filter(users::Column::Role.eq(role.as_u8() as i16));
        }
        if let Some(site) = filter.site {
            query = query.filter(users::Column::Site.eq(site.as_u8() as i16));
        }
        if let Some(department) = filter.department {
            query = query.filter(users::Column::Department.eq(department.as_u8() as i16));
        }
        let models = query
            .order_by_asc(users::Column::LastName)
            .order_by_asc(users::Column::FirstName)
            .offset(page.offset())
            .limit(page.per_page as u64)
            .all(&self.db)
            .await
            .context("list users")?;
        models.into_iter().map(user_from_model).collect()
    }

    async fn update_profile(
        &self,
        id: Uuid,
        first_name: Option<&str>,
        last_name: Option<&str>,
        department: Option<Department>,
        site: Option<Site>,
    ) -> Result<(), CantineError> {
        let mut am = users::ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(first_name) = first_name {
            am.first_name = Set(first_name.to_owned());
        }
        if let Some(last_name) = last_name {
            am.last_name = Set(last_name.to_owned());
        }
        if let Some(department) = department {
            am.department = Set(department.as_u8() as i16);
        }
        if let Some(site) = site {
            am.site = Set(site.as_u8() as i16);
        }
        am.updated_at = Set(Utc::now());
        am.is_updated = Set(true);
        am.updated_by = Set(Some(id));
        am.update(&self.db).await.context("update user profile")?;
        Ok(())
    }

    async fn update_access(
        &self,
        id: Uuid,
        role: Option<Role>,
        site: Option<Site>,
        department: Option<Department>,
        actor: Uuid,
    ) -> Result<(), CantineError> {
        let mut am = users::ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(role) = role {
            am.role = Set(role.as_u8() as i16);
        }
        if let Some(site) = site {
            am.site = Set(site.as_u8() as i16);
        }
        if let Some(department) = department {
            am.department = Set(department.as_u8() as i16);
        }
        am.updated_at = Set(Utc::now());
        am.is_updated = Set(true);
        am.updated_by = Set(Some(actor));
        am.update(&self.db).await.context("update user access")?;
        Ok(())
    }

    async fn set_dark_theme(&self, id: Uuid, dark: bool) -> Result<(), CantineError> {
        users::ActiveModel {
            id: Set(id),
            dark_theme: Set(dark),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("set dark theme")?;
        Ok(())
    }

    async fn soft_delete(&self, id: Uuid, actor: Uuid) -> Result<bool, CantineError> {
        let result = users::Entity::update_many()
            .filter(users::Column::Id.eq(id))
            .filter(users::Column::IsDeleted.eq(false))
            .col_expr(users::Column::IsDeleted, Expr::value(true))
            .col_expr(users::Column::DeletedAt, Expr::value(Utc::now()))
            .col_expr(users::Column::DeletedBy, Expr::value(actor))
            .exec(&self.db)
            .await
            .context("soft delete user")?;
        Ok(result.rows_affected > 0)
    }
}

fn user_from_model(model: users::Model) -> Result<User, CantineError> {
    Ok(User {
        id: model.id,
        first_name: model.first_name,
        last_name: model.last_name,
        email: model.email,
        password_hash: model.password_hash,
        role: decode(model.role, Role::from_u8, "users.role")?,
        site: decode(model.site, Site::from_u8, "users.site")?,
        department: decode(model.department, Department::from_u8, "users.department")?,
        dark_theme: model.dark_theme,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Dish category repository ─────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbDishCategoryRepository {
    pub db: DatabaseConnection,
}

impl DishCategoryRepository for DbDishCategoryRepository {
    async fn list(&self) -> Result<Vec<DishCategory>, CantineError> {
        let models = dish_categories::Entity::find()
            .filter(dish_categories::Column::IsDeleted.eq(false))
            .order_by_asc(dish_categories::Column::Name)
            .all(&self.db)
            .await
            .context("list dish categories")?;
        Ok(models.into_iter().map(category_from_model).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<DishCategory>, CantineError> {
        let model = dish_categories::Entity::find_by_id(id)
            .filter(dish_categories::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await
            .context("find dish category")?;
        Ok(model.map(category_from_model))
    }

    async fn create(
        &self,
        name: &str,
        description: &str,
        color: &str,
        actor: Uuid,
    ) -> Result<DishCategory, CantineError> {
        let now = Utc::now();
        let model = dish_categories::ActiveModel {
            name: Set(name.to_owned()),
            description: Set(description.to_owned()),
            color: Set(color.to_owned()),
            created_at: Set(now),
            updated_at: Set(now),
            is_updated: Set(false),
            is_deleted: Set(false),
            deleted_at: Set(None),
            created_by: Set(Some(actor)),
            updated_by: Set(None),
            deleted_by: Set(None),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .context("create dish category")?;
        Ok(category_from_model(model))
    }

    async fn update(
        &self,
        id: i32,
        name: &str,
        description: &str,
        color: &str,
        actor: Uuid,
    ) -> Result<(), CantineError> {
        dish_categories::ActiveModel {
            id: Set(id),
            name: Set(name.to_owned()),
            description: Set(description.to_owned()),
            color: Set(color.to_owned()),
            updated_at: Set(Utc::now()),
            is_updated: Set(true),
            updated_by: Set(Some(actor)),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update dish category")?;
        Ok(())
    }

    async fn soft_delete(&self, id: i32, actor: Uuid) -> Result<bool, CantineError> {
        let result = dish_categories::Entity::update_many()
            .filter(dish_categories::Column::Id.eq(id))
            .filter(dish_categories::Column::IsDeleted.eq(false))
            .col_expr(dish_categories::Column::IsDeleted, Expr::value(true))
            .col_expr(dish_categories::Column::DeletedAt, Expr::value(Utc::now()))
            .col_expr(dish_categories::Column::DeletedBy, Expr::value(actor))
            .exec(&self.db)
            .await
            .context("soft delete dish category")?;
        Ok(result.rows_affected > 0)
    }
}

fn category_from_model(model: dish_categories::Model) -> DishCategory {
    DishCategory {
        id: model.id,
        name: model.name,
        description: model.description,
        color: model.color,
    }
}

// ── Dish repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbDishRepository {
    pub db: DatabaseConnection,
}

impl DishRepository for DbDishRepository {
    async fn list(
        &self,
        filter: &DishFilter,
        page: PageRequest,
    ) -> Result<Vec<Dish>, CantineError> {
        let page = page.clamped();
        let mut query = dishes::Entity::find().filter(dishes::Column::IsDeleted.eq(false));
        if !filter.include_inactive {
            query = query.filter(dishes::Column::IsActive.eq(true));
        }
        if let Some(category_id) = filter.category_id {
            query = query.filter(dishes::Column::CategoryId.eq(category_id));
        }
        if let Some(ref q) = filter.query {
            query = query.filter(
                Condition::any()
                    .add(dishes::Column::Name.contains(q.as_str()))
                    .add(dishes::Column::Description.contains(q.as_str())),
            );
        }
        let models = query
            .order_by_asc(dishes::Column::CategoryId)
            .order_by_asc(dishes::Column::Name)
            .offset(page.offset())
            .limit(page.per_page as u64)
            .all(&self.db)
            .await
            .context("list dishes")?;
        Ok(models.into_iter().map(dish_from_model).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Dish>, CantineError> {
        let model = dishes::Entity::find_by_id(id)
            .filter(dishes::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await
            .context("find dish")?;
        Ok(model.map(dish_from_model))
    }

    async fn create(&self, dish: &NewDish, actor: Uuid) -> Result<Dish, CantineError> {
        let now = Utc::now();
        let model = dishes::ActiveModel {
            name: Set(dish.name.clone()),
            description: Set(dish.description.clone()),
            category_id: Set(dish.category_id),
            allergens: Set(dish.allergens.clone()),
            price_cents: Set(dish.price_cents),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            is_updated: Set(false),
            is_deleted: Set(false),
            deleted_at: Set(None),
            created_by: Set(Some(actor)),
            updated_by: Set(None),
            deleted_by: Set(None),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .context("create dish")?;
        Ok(dish_from_model(model))
    }

    async fn update(&self, id: i32, dish: &NewDish, actor: Uuid) -> Result<(), CantineError> {
        dishes::ActiveModel {
            id: Set(id),
            name: Set(dish.name.clone()),
            description: Set(dish.description.clone()),
            category_id: Set(dish.category_id),
            allergens: Set(dish.allergens.clone()),
            price_cents: Set(dish.price_cents),
            updated_at: Set(Utc::now()),
            is_updated: Set(true),
            updated_by: Set(Some(actor)),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update dish")?;
        Ok(())
    }

    async fn set_active(&self, id: i32, active: bool, actor: Uuid) -> Result<(), CantineError> {
        dishes::ActiveModel {
            id: Set(id),
            is_active: Set(active),
            updated_at: Set(Utc::now()),
            is_updated: Set(true),
            updated_by: Set(Some(actor)),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("set dish active flag")?;
        Ok(())
    }

    async fn soft_delete(&self, id: i32, actor: Uuid) -> Result<bool, CantineError> {
        let result = dishes::Entity::update_many()
            .filter(dishes::Column::Id.eq(id))
            .filter(dishes::Column::IsDeleted.eq(false))
            .col_expr(dishes::Column::IsDeleted, Expr::value(true))
            .col_expr(dishes::Column::DeletedAt, Expr::value(Utc::now()))
            .col_expr(dishes::Column::DeletedBy, Expr::value(actor))
            .exec(&self.db)
            .await
            .context("soft delete dish")?;
        Ok(result.rows_affected > 0)
    }
}

fn dish_from_model(model: dishes::Model) -> Dish {
    Dish {
        id: model.id,
        name: model.name,
        description: model.description,
        category_id: model.category_id,
        allergens: model.allergens,
        price_cents: model.price_cents,
        is_active: model.is_active,
        created_at: model.created_at,
    }
}

// ── Menu repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbMenuRepository {
    pub db: DatabaseConnection,
}

impl MenuRepository for DbMenuRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Menu>, CantineError> {
        let model = menus::Entity::find_by_id(id)
            .filter(menus::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await
            .context("find menu")?;
        model.map(menu_from_model).transpose()
    }

    async fn list_by_dates(
        &self,
        dates: &[NaiveDate],
        published_only: bool,
    ) -> Result<Vec<Menu>, CantineError> {
        let mut query = menus::Entity::find()
            .filter(menus::Column::Date.is_in(dates.iter().copied()))
            .filter(menus::Column::IsDeleted.eq(false));
        if published_only {
            query = query.filter(menus::Column::IsPublished.eq(true));
        }
        let models = query
            .order_by_asc(menus::Column::Date)
            .order_by_asc(menus::Column::Site)
            .all(&self.db)
            .await
            .context("list menus by dates")?;
        models.into_iter().map(menu_from_model).collect()
    }

    async fn list_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        site: Site,
    ) -> Result<Vec<Menu>, CantineError> {
        let models = menus::Entity::find()
            .filter(menus::Column::Date.gte(from))
            .filter(menus::Column::Date.lte(to))
            .filter(menus::Column::Site.eq(site.as_u8() as i16))
            .filter(menus::Column::IsDeleted.eq(false))
            .order_by_asc(menus::Column::Date)
            .all(&self.db)
            .await
            .context("list menus in range")?;
        models.into_iter().map(menu_from_model).collect()
    }

    async fn get_or_create(
        &self,
        date: NaiveDate,
        weekday: Weekday,
        site: Site,
        cutoff_at: DateTime<Utc>,
        actor: Uuid,
    ) -> Result<Menu, CantineError> {
        let existing = menus::Entity::find()
            .filter(menus::Column::Date.eq(date))
            .filter(menus::Column::Site.eq(site.as_u8() as i16))
            .filter(menus::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await
            .context("find menu for get-or-create")?;
        if let Some(model) = existing {
            return menu_from_model(model);
        }

        let now = Utc::now();
        let inserted = menus::ActiveModel {
            date: Set(date),
            weekday: Set(weekday.as_u8() as i16),
            site: Set(site.as_u8() as i16),
            title: Set(String::new()),
            description: Set(String::new()),
            is_published: Set(false),
            cutoff_at: Set(cutoff_at),
            max_orders: Set(100),
            created_at: Set(now),
            updated_at: Set(now),
            is_updated: Set(false),
            is_deleted: Set(false),
            deleted_at: Set(None),
            created_by: Set(Some(actor)),
            updated_by: Set(None),
            deleted_by: Set(None),
            ..Default::default()
        }
        .insert(&self.db)
        .await;

        match inserted {
            Ok(model) => menu_from_model(model),
            // Lost the race against a concurrent bootstrap: the partial
            // unique index rejected the insert, so the row exists now.
            Err(_) => {
                let model = menus::Entity::find()
                    .filter(menus::Column::Date.eq(date))
                    .filter(menus::Column::Site.eq(site.as_u8() as i16))
                    .filter(menus::Column::IsDeleted.eq(false))
                    .one(&self.db)
                    .await
                    .context("re-find menu after conflicting insert")?
                    .context("menu insert failed without a surviving row")?;
                menu_from_model(model)
            }
        }
    }

    async fn set_published(
        &self,
        id: i32,
        published: bool,
        actor: Uuid,
    ) -> Result<(), CantineError> {
        menus::ActiveModel {
            id: Set(id),
            is_published: Set(published),
            updated_at: Set(Utc::now()),
            is_updated: Set(true),
            updated_by: Set(Some(actor)),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("set menu published flag")?;
        Ok(())
    }

    async fn update_info(
        &self,
        id: i32,
        info: &MenuInfoUpdate,
        actor: Uuid,
    ) -> Result<(), CantineError> {
        let mut am = menus::ActiveModel {
            id: Set(id),
            ..Default::default()
        };
        if let Some(ref title) = info.title {
            am.title = Set(title.clone());
        }
        if let Some(ref description) = info.description {
            am.description = Set(description.clone());
        }
        if let Some(cutoff_at) = info.cutoff_at {
            am.cutoff_at = Set(cutoff_at);
        }
        if let Some(max_orders) = info.max_orders {
            am.max_orders = Set(max_orders);
        }
        am.updated_at = Set(Utc::now());
        am.is_updated = Set(true);
        am.updated_by = Set(Some(actor));
        am.update(&self.db).await.context("update menu info")?;
        Ok(())
    }

    async fn list_dishes(&self, menu_id: i32) -> Result<Vec<(MenuDish, Dish)>, CantineError> {
        let rows = menu_dishes::Entity::find()
            .filter(menu_dishes::Column::MenuId.eq(menu_id))
            .find_also_related(dishes::Entity)
            .all(&self.db)
            .await
            .context("list menu dishes")?;
        Ok(rows
            .into_iter()
            .filter_map(|(md, dish)| {
                let dish = dish.filter(|d| !d.is_deleted)?;
                Some((menu_dish_from_model(md), dish_from_model(dish)))
            })
            .collect())
    }

    async fn find_menu_dish(
        &self,
        menu_id: i32,
        dish_id: i32,
    ) -> Result<Option<MenuDish>, CantineError> {
        let model = menu_dishes::Entity::find()
            .filter(menu_dishes::Column::MenuId.eq(menu_id))
            .filter(menu_dishes::Column::DishId.eq(dish_id))
            .one(&self.db)
            .await
            .context("find menu dish")?;
        Ok(model.map(menu_dish_from_model))
    }

    async fn replace_dishes(
        &self,
        menu_id: i32,
        entries: &[MenuDishSpec],
        actor: Uuid,
    ) -> Result<(), CantineError> {
        let entries = entries.to_vec();
        self.db
            .transaction::<_, (), CantineError>(move |txn| {
                Box::pin(async move {
                    let existing = menu_dishes::Entity::find()
                        .filter(menu_dishes::Column::MenuId.eq(menu_id))
                        .all(txn)
                        .await
                        .context("load menu dishes for replace")?;

                    let keep: Vec<i32> = entries.iter().map(|e| e.dish_id).collect();
                    for row in &existing {
                        if !keep.contains(&row.dish_id) {
                            menu_dishes::Entity::delete_by_id(row.id)
                                .exec(txn)
                                .await
                                .context("delete removed menu dish")?;
                        }
                    }

                    for entry in &entries {
                        match existing.iter().find(|row| row.dish_id == entry.dish_id) {
                            // Dish stays on the menu: refresh the plan, keep
                            // the ordered counter.
                            Some(row) => {
                                let mut am = row.clone().into_active_model();
                                am.price_cents = Set(entry.price_cents);
                                am.max_quantity = Set(entry.max_quantity);
                                am.planned_quantity = Set(entry.planned_quantity);
                                am.update(txn).await.context("update kept menu dish")?;
                            }
                            None => {
                                menu_dishes::ActiveModel {
                                    menu_id: Set(menu_id),
                                    dish_id: Set(entry.dish_id),
                                    price_cents: Set(entry.price_cents),
                                    max_quantity: Set(entry.max_quantity),
                                    planned_quantity: Set(entry.planned_quantity),
                                    ordered_quantity: Set(0),
                                    ..Default::default()
                                }
                                .insert(txn)
                                .await
                                .context("insert menu dish")?;
                            }
                        }
                    }

                    menus::ActiveModel {
                        id: Set(menu_id),
                        updated_at: Set(Utc::now()),
                        is_updated: Set(true),
                        updated_by: Set(Some(actor)),
                        ..Default::default()
                    }
                    .update(txn)
                    .await
                    .context("stamp menu after dish replace")?;
                    Ok(())
                })
            })
            .await
            .map_err(|e| txn_err(e, "replace menu dishes"))
    }

    async fn count_pending_publication(&self, today: NaiveDate) -> Result<u64, CantineError> {
        let count = menus::Entity::find()
            .filter(menus::Column::IsPublished.eq(false))
            .filter(menus::Column::Date.gte(today))
            .filter(menus::Column::IsDeleted.eq(false))
            .count(&self.db)
            .await
            .context("count menus pending publication")?;
        Ok(count)
    }

    async fn count_nearing_cutoff(&self, now: DateTime<Utc>) -> Result<u64, CantineError> {
        let count = menus::Entity::find()
            .filter(menus::Column::IsPublished.eq(true))
            .filter(menus::Column::CutoffAt.gte(now))
            .filter(menus::Column::CutoffAt.lte(now + chrono::Duration::hours(24)))
            .filter(menus::Column::IsDeleted.eq(false))
            .count(&self.db)
            .await
            .context("count menus nearing cutoff")?;
        Ok(count)
    }
}

fn menu_from_model(model: menus::Model) -> Result<Menu, CantineError> {
    Ok(Menu {
        id: model.id,
        date: model.date,
        weekday: decode(model.weekday, Weekday::from_u8, "menus.weekday")?,
        site: decode(model.site, Site::from_u8, "menus.site")?,
        title: model.title,
        description: model.description,
        is_published: model.is_published,
        cutoff_at: model.cutoff_at,
        max_orders: model.max_orders,
    })
}

fn menu_dish_from_model(model: menu_dishes::Model) -> MenuDish {
    MenuDish {
        id: model.id,
        menu_id: model.menu_id,
        dish_id: model.dish_id,
        price_cents: model.price_cents,
        max_quantity: model.max_quantity,
        planned_quantity: model.planned_quantity,
        ordered_quantity: model.ordered_quantity,
    }
}

// ── Order repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOrderRepository {
    pub db: DatabaseConnection,
}

/// Lock the (menu, dish) counter row and add `delta` to it. Missing rows
/// are ignored (the dish was taken off the menu after ordering).
async fn bump_counter<C: sea_orm::ConnectionTrait>(
    txn: &C,
    menu_id: i32,
    dish_id: i32,
    delta: i32,
) -> Result<(), CantineError> {
    let row = menu_dishes::Entity::find()
        .filter(menu_dishes::Column::MenuId.eq(menu_id))
        .filter(menu_dishes::Column::DishId.eq(dish_id))
        .lock_exclusive()
        .one(txn)
        .await
        .context("lock menu dish counter")?;
    if let Some(row) = row {
        let next = row.ordered_quantity + delta;
        let mut am = row.into_active_model();
        am.ordered_quantity = Set(next);
        am.update(txn).await.context("update menu dish counter")?;
    }
    Ok(())
}

impl OrderRepository for DbOrderRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Order>, CantineError> {
        let model = orders::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find order")?;
        model.map(order_from_model).transpose()
    }

    async fn find_active_for_menu(
        &self,
        user_id: Uuid,
        menu_id: i32,
    ) -> Result<Option<Order>, CantineError> {
        let model = orders::Entity::find()
            .filter(orders::Column::UserId.eq(user_id))
            .filter(orders::Column::MenuId.eq(menu_id))
            .filter(orders::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await
            .context("find active order for menu")?;
        model.map(order_from_model).transpose()
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Order>, CantineError> {
        let page = page.clamped();
        let models = orders::Entity::find()
            .filter(orders::Column::UserId.eq(user_id))
            .filter(orders::Column::IsDeleted.eq(false))
            .order_by_desc(orders::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.per_page as u64)
            .all(&self.db)
            .await
            .context("list orders by user")?;
        models.into_iter().map(order_from_model).collect()
    }

    async fn list_filtered(
        &self,
        filter: &OrderFilter,
        page: PageRequest,
    ) -> Result<Vec<Order>, CantineError> {
        let page = page.clamped();
        let models = apply_order_filter(orders::Entity::find(), filter)
            .order_by_desc(orders::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.per_page as u64)
            .all(&self.db)
            .await
            .context("list filtered orders")?;
        models.into_iter().map(order_from_model).collect()
    }

    async fn list_for_day(
        &self,
        date: NaiveDate,
        site: Site,
        statuses: &[OrderStatus],
    ) -> Result<Vec<(Order, Dish)>, CantineError> {
        let status_values: Vec<i16> = statuses.iter().map(|s| s.as_u8() as i16).collect();
        let rows = orders::Entity::find()
            .find_also_related(dishes::Entity)
            .join(JoinType::InnerJoin, orders::Relation::Menu.def())
            .filter(menus::Column::Date.eq(date))
            .filter(menus::Column::Site.eq(site.as_u8() as i16))
            .filter(orders::Column::Status.is_in(status_values))
            .filter(orders::Column::IsDeleted.eq(false))
            .all(&self.db)
            .await
            .context("list orders for day")?;
        rows.into_iter()
            .filter_map(|(order, dish)| dish.map(|d| (order, d)))
            .map(|(order, dish)| Ok((order_from_model(order)?, dish_from_model(dish))))
            .collect()
    }

    async fn place_with_counter(&self, new: &NewOrder) -> Result<Order, CantineError> {
        let new = new.clone();
        let model = self
            .db
            .transaction::<_, orders::Model, CantineError>(move |txn| {
                Box::pin(async move {
                    let counter_row = menu_dishes::Entity::find()
                        .filter(menu_dishes::Column::MenuId.eq(new.menu_id))
                        .filter(menu_dishes::Column::DishId.eq(new.dish_id))
                        .lock_exclusive()
                        .one(txn)
                        .await
                        .context("lock menu dish for order placement")?
                        .ok_or(CantineError::DishNotFound)?;

                    let now = Utc::now();
                    let order = orders::ActiveModel {
                        user_id: Set(new.user_id),
                        menu_id: Set(new.menu_id),
                        dish_id: Set(new.dish_id),
                        status: Set(OrderStatus::Pending.as_u8() as i16),
                        special_notes: Set(new.special_notes.clone()),
                        created_at: Set(now),
                        updated_at: Set(now),
                        is_updated: Set(false),
                        is_deleted: Set(false),
                        deleted_at: Set(None),
                        created_by: Set(Some(new.user_id)),
                        updated_by: Set(None),
                        deleted_by: Set(None),
                        ..Default::default()
                    }
                    .insert(txn)
                    .await
                    .context("insert order")?;

                    let next = counter_row.ordered_quantity + 1;
                    let mut am = counter_row.into_active_model();
                    am.ordered_quantity = Set(next);
                    am.update(txn).await.context("increment ordered quantity")?;

                    Ok(order)
                })
            })
            .await
            .map_err(|e| txn_err(e, "place order"))?;
        order_from_model(model)
    }

    async fn swap_dish_with_counters(
        &self,
        order_id: i32,
        menu_id: i32,
        old_dish_id: i32,
        new_dish_id: i32,
        notes: &str,
        actor: Uuid,
    ) -> Result<(), CantineError> {
        let notes = notes.to_owned();
        self.db
            .transaction::<_, (), CantineError>(move |txn| {
                Box::pin(async move {
                    // Lock the two counter rows in dish-id order so two
                    // concurrent swaps cannot deadlock.
                    let (first, second) = if old_dish_id < new_dish_id {
                        ((old_dish_id, -1), (new_dish_id, 1))
                    } else {
                        ((new_dish_id, 1), (old_dish_id, -1))
                    };
                    bump_counter(txn, menu_id, first.0, first.1).await?;
                    bump_counter(txn, menu_id, second.0, second.1).await?;

                    orders::ActiveModel {
                        id: Set(order_id),
                        dish_id: Set(new_dish_id),
                        special_notes: Set(notes.clone()),
                        updated_at: Set(Utc::now()),
                        is_updated: Set(true),
                        updated_by: Set(Some(actor)),
                        ..Default::default()
                    }
                    .update(txn)
                    .await
                    .context("update order dish")?;
                    Ok(())
                })
            })
            .await
            .map_err(|e| txn_err(e, "swap order dish"))
    }

    async fn update_notes(
        &self,
        order_id: i32,
        notes: &str,
        actor: Uuid,
    ) -> Result<(), CantineError> {
        orders::ActiveModel {
            id: Set(order_id),
            special_notes: Set(notes.to_owned()),
            updated_at: Set(Utc::now()),
            is_updated: Set(true),
            updated_by: Set(Some(actor)),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update order notes")?;
        Ok(())
    }

    async fn cancel_with_counter(&self, order_id: i32, actor: Uuid) -> Result<bool, CantineError> {
        self.db
            .transaction::<_, bool, CantineError>(move |txn| {
                Box::pin(async move {
                    let order = orders::Entity::find_by_id(order_id)
                        .lock_exclusive()
                        .one(txn)
                        .await
                        .context("lock order for cancellation")?
                        .ok_or(CantineError::OrderNotFound)?;

                    // Re-checked under lock: a concurrent cancel already
                    // released the counter.
                    if order.is_deleted
                        || order.status == OrderStatus::Cancelled.as_u8() as i16
                    {
                        return Ok(false);
                    }

                    let menu_id = order.menu_id;
                    let dish_id = order.dish_id;
                    let mut am = order.into_active_model();
                    am.status = Set(OrderStatus::Cancelled.as_u8() as i16);
                    am.is_deleted = Set(true);
                    am.deleted_at = Set(Some(Utc::now()));
                    am.deleted_by = Set(Some(actor));
                    am.updated_at = Set(Utc::now());
                    am.update(txn).await.context("mark order cancelled")?;

                    bump_counter(txn, menu_id, dish_id, -1).await?;
                    Ok(true)
                })
            })
            .await
            .map_err(|e| txn_err(e, "cancel order"))
    }

    async fn update_status(
        &self,
        order_id: i32,
        status: OrderStatus,
        actor: Uuid,
    ) -> Result<(), CantineError> {
        orders::ActiveModel {
            id: Set(order_id),
            status: Set(status.as_u8() as i16),
            updated_at: Set(Utc::now()),
            is_updated: Set(true),
            updated_by: Set(Some(actor)),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update order status")?;
        Ok(())
    }

    async fn has_received_order(
        &self,
        user_id: Uuid,
        dish_id: i32,
    ) -> Result<bool, CantineError> {
        let received: Vec<i16> = [
            OrderStatus::Confirmed,
            OrderStatus::Ready,
            OrderStatus::Delivered,
        ]
        .iter()
        .map(|s| s.as_u8() as i16)
        .collect();
        let count = orders::Entity::find()
            .filter(orders::Column::UserId.eq(user_id))
            .filter(orders::Column::DishId.eq(dish_id))
            .filter(orders::Column::Status.is_in(received))
            .filter(orders::Column::IsDeleted.eq(false))
            .count(&self.db)
            .await
            .context("count received orders")?;
        Ok(count > 0)
    }

    async fn count_by_status(&self, filter: &OrderFilter) -> Result<OrderStats, CantineError> {
        let mut stats = OrderStats {
            total: apply_order_filter(orders::Entity::find(), filter)
                .count(&self.db)
                .await
                .context("count filtered orders")?,
            ..Default::default()
        };
        // Per-status counts AND with the caller's filter, like the admin
        // board's aggregate does.
        for status in [
            OrderStatus::Pending,
            OrderStatus::Confirmed,
            OrderStatus::Ready,
            OrderStatus::Delivered,
        ] {
            let count = apply_order_filter(orders::Entity::find(), filter)
                .filter(orders::Column::Status.eq(status.as_u8() as i16))
                .count(&self.db)
                .await
                .context("count orders by status")?;
            match status {
                OrderStatus::Pending => stats.pending = count,
                OrderStatus::Confirmed => stats.confirmed = count,
                OrderStatus::Ready => stats.ready = count,
                OrderStatus::Delivered => stats.delivered = count,
                OrderStatus::Cancelled => {}
            }
        }
        Ok(stats)
    }

    async fn counts_by_day(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<DayOrderCount>, CantineError> {
        #[derive(Debug, FromQueryResult)]
        struct DayRow {
            date: NaiveDate,
            total: i64,
            confirmed: i64,
            delivered: i64,
        }

        let sql = r#"
            SELECT CAST(created_at AS DATE) AS date,
                   COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE status = $3) AS confirmed,
                   COUNT(*) FILTER (WHERE status = $4) AS delivered
            FROM orders
            WHERE NOT is_deleted
              AND CAST(created_at AS DATE) BETWEEN $1 AND $2
            GROUP BY 1
            ORDER BY 1
        "#;
        let rows = DayRow::find_by_statement(Statement::from_sql_and_values(
            self.db.get_database_backend(),
            sql,
            [
                from.into(),
                to.into(),
                (OrderStatus::Confirmed.as_u8() as i16).into(),
                (OrderStatus::Delivered.as_u8() as i16).into(),
            ],
        ))
        .all(&self.db)
        .await
        .context("count orders by day")?;

        Ok(rows
            .into_iter()
            .map(|row| DayOrderCount {
                date: row.date,
                total: row.total as u64,
                confirmed: row.confirmed as u64,
                delivered: row.delivered as u64,
            })
            .collect())
    }

    async fn counts_by_dish(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        limit: u64,
    ) -> Result<Vec<DishOrderCount>, CantineError> {
        #[derive(Debug, FromQueryResult)]
        struct DishRow {
            dish_id: i32,
            dish_name: String,
            total: i64,
        }

        let sql = r#"
            SELECT d.id AS dish_id, d.name AS dish_name, COUNT(*) AS total
            FROM orders o
            JOIN dishes d ON d.id = o.dish_id
            WHERE NOT o.is_deleted
              AND CAST(o.created_at AS DATE) BETWEEN $1 AND $2
            GROUP BY d.id, d.name
            ORDER BY total DESC
            LIMIT $3
        "#;
        let rows = DishRow::find_by_statement(Statement::from_sql_and_values(
            self.db.get_database_backend(),
            sql,
            [from.into(), to.into(), (limit as i64).into()],
        ))
        .all(&self.db)
        .await
        .context("count orders by dish")?;

        Ok(rows
            .into_iter()
            .map(|row| DishOrderCount {
                dish_id: row.dish_id,
                dish_name: row.dish_name,
                total: row.total as u64,
            })
            .collect())
    }

    async fn list_unreviewed_received(
        &self,
        user_id: Uuid,
        since: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<(Order, Dish)>, CantineError> {
        let received: Vec<i16> = [
            OrderStatus::Confirmed,
            OrderStatus::Ready,
            OrderStatus::Delivered,
        ]
        .iter()
        .map(|s| s.as_u8() as i16)
        .collect();

        let reviewed = Query::select()
            .column(reviews::Column::OrderId)
            .from(reviews::Entity)
            .and_where(Expr::col(reviews::Column::UserId).eq(user_id))
            .and_where(Expr::col(reviews::Column::IsDeleted).eq(false))
            .to_owned();

        let rows = orders::Entity::find()
            .find_also_related(dishes::Entity)
            .filter(orders::Column::UserId.eq(user_id))
            .filter(orders::Column::Status.is_in(received))
            .filter(orders::Column::CreatedAt.gte(since))
            .filter(orders::Column::IsDeleted.eq(false))
            .filter(orders::Column::Id.not_in_subquery(reviewed))
            .order_by_desc(orders::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .context("list unreviewed received orders")?;

        rows.into_iter()
            .filter_map(|(order, dish)| dish.map(|d| (order, d)))
            .map(|(order, dish)| Ok((order_from_model(order)?, dish_from_model(dish))))
            .collect()
    }
}

fn apply_order_filter(
    query: sea_orm::Select<orders::Entity>,
    filter: &OrderFilter,
) -> sea_orm::Select<orders::Entity> {
    let mut query = query.filter(orders::Column::IsDeleted.eq(false));
    if let Some(status) = filter.status {
        query = query.filter(orders::Column::Status.eq(status.as_u8() as i16));
    }
    if let Some(site) = filter.site {
        query = query
            .join(JoinType::InnerJoin, orders::Relation::Menu.def())
            .filter(menus::Column::Site.eq(site.as_u8() as i16));
    }
    let (start, end) = day_bounds(filter.from, filter.to);
    if let Some(start) = start {
        query = query.filter(orders::Column::CreatedAt.gte(start));
    }
    if let Some(end) = end {
        query = query.filter(orders::Column::CreatedAt.lt(end));
    }
    query
}

fn order_from_model(model: orders::Model) -> Result<Order, CantineError> {
    Ok(Order {
        id: model.id,
        user_id: model.user_id,
        menu_id: model.menu_id,
        dish_id: model.dish_id,
        status: decode(model.status, OrderStatus::from_u8, "orders.status")?,
        special_notes: model.special_notes,
        is_deleted: model.is_deleted,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Review repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbReviewRepository {
    pub db: DatabaseConnection,
}

impl ReviewRepository for DbReviewRepository {
    async fn find_by_id(&self, id: i32) -> Result<Option<Review>, CantineError> {
        let model = reviews::Entity::find_by_id(id)
            .filter(reviews::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await
            .context("find review")?;
        Ok(model.map(review_from_model))
    }

    async fn find_by_user_order(
        &self,
        user_id: Uuid,
        order_id: i32,
    ) -> Result<Option<Review>, CantineError> {
        let model = reviews::Entity::find()
            .filter(reviews::Column::UserId.eq(user_id))
            .filter(reviews::Column::OrderId.eq(order_id))
            .filter(reviews::Column::IsDeleted.eq(false))
            .one(&self.db)
            .await
            .context("find review by user and order")?;
        Ok(model.map(review_from_model))
    }

    async fn list_by_user(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Review>, CantineError> {
        let page = page.clamped();
        let models = reviews::Entity::find()
            .filter(reviews::Column::UserId.eq(user_id))
            .filter(reviews::Column::IsDeleted.eq(false))
            .order_by_desc(reviews::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.per_page as u64)
            .all(&self.db)
            .await
            .context("list reviews by user")?;
        Ok(models.into_iter().map(review_from_model).collect())
    }

    async fn list_for_moderation(
        &self,
        filter: &ReviewModerationFilter,
        page: PageRequest,
    ) -> Result<Vec<Review>, CantineError> {
        let page = page.clamped();
        let mut query = reviews::Entity::find().filter(reviews::Column::IsDeleted.eq(false));
        if let Some(approved) = filter.approved {
            query = query.filter(reviews::Column::IsApproved.eq(approved));
        }
        if let Some(dish_id) = filter.dish_id {
            query = query.filter(reviews::Column::DishId.eq(dish_id));
        }
        let models = query
            .order_by_desc(reviews::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.per_page as u64)
            .all(&self.db)
            .await
            .context("list reviews for moderation")?;
        Ok(models.into_iter().map(review_from_model).collect())
    }

    async fn list_public_for_dish(
        &self,
        dish_id: i32,
        page: PageRequest,
    ) -> Result<Vec<Review>, CantineError> {
        let page = page.clamped();
        let models = reviews::Entity::find()
            .filter(reviews::Column::DishId.eq(dish_id))
            .filter(reviews::Column::IsApproved.eq(true))
            .filter(reviews::Column::IsDeleted.eq(false))
            .order_by_desc(reviews::Column::CreatedAt)
            .offset(page.offset())
            .limit(page.per_page as u64)
            .all(&self.db)
            .await
            .context("list public reviews for dish")?;
        Ok(models.into_iter().map(review_from_model).collect())
    }

    async fn create(&self, new: &NewReview) -> Result<Review, CantineError> {
        let now = Utc::now();
        let model = reviews::ActiveModel {
            user_id: Set(new.user_id),
            dish_id: Set(new.dish_id),
            order_id: Set(new.order_id),
            rating: Set(new.rating as i16),
            comment: Set(new.comment.clone()),
            is_anonymous: Set(new.is_anonymous),
            is_approved: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
            is_updated: Set(false),
            is_deleted: Set(false),
            deleted_at: Set(None),
            created_by: Set(Some(new.user_id)),
            updated_by: Set(None),
            deleted_by: Set(None),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .context("create review")?;
        Ok(review_from_model(model))
    }

    async fn update_content(
        &self,
        id: i32,
        rating: u8,
        comment: &str,
        anonymous: bool,
        actor: Uuid,
    ) -> Result<(), CantineError> {
        reviews::ActiveModel {
            id: Set(id),
            rating: Set(rating as i16),
            comment: Set(comment.to_owned()),
            is_anonymous: Set(anonymous),
            // Edited content goes back through moderation.
            is_approved: Set(false),
            updated_at: Set(Utc::now()),
            is_updated: Set(true),
            updated_by: Set(Some(actor)),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("update review content")?;
        Ok(())
    }

    async fn set_approved(&self, id: i32, actor: Uuid) -> Result<(), CantineError> {
        reviews::ActiveModel {
            id: Set(id),
            is_approved: Set(true),
            updated_at: Set(Utc::now()),
            is_updated: Set(true),
            updated_by: Set(Some(actor)),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("approve review")?;
        Ok(())
    }

    async fn soft_delete(&self, id: i32, actor: Uuid) -> Result<bool, CantineError> {
        let result = reviews::Entity::update_many()
            .filter(reviews::Column::Id.eq(id))
            .filter(reviews::Column::IsDeleted.eq(false))
            .col_expr(reviews::Column::IsDeleted, Expr::value(true))
            .col_expr(reviews::Column::DeletedAt, Expr::value(Utc::now()))
            .col_expr(reviews::Column::DeletedBy, Expr::value(actor))
            .exec(&self.db)
            .await
            .context("soft delete review")?;
        Ok(result.rows_affected > 0)
    }

    async fn dish_rating(&self, dish_id: i32) -> Result<DishRatingSummary, CantineError> {
        #[derive(Debug, FromQueryResult)]
        struct RatingRow {
            average: Option<f64>,
            count: i64,
        }

        let sql = r#"
            SELECT CAST(AVG(rating) AS DOUBLE PRECISION) AS average,
                   COUNT(*) AS count
            FROM reviews
            WHERE dish_id = $1 AND is_approved AND NOT is_deleted
        "#;
        let row = RatingRow::find_by_statement(Statement::from_sql_and_values(
            self.db.get_database_backend(),
            sql,
            [dish_id.into()],
        ))
        .one(&self.db)
        .await
        .context("aggregate dish rating")?;

        Ok(row
            .map(|r| DishRatingSummary {
                average: r.average,
                count: r.count as u64,
            })
            .unwrap_or_default())
    }

    async fn top_rated_dishes(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<RatedDish>, CantineError> {
        #[derive(Debug, FromQueryResult)]
        struct TopRow {
            dish_id: i32,
            dish_name: String,
            average: f64,
            count: i64,
        }

        let sql = r#"
            SELECT d.id AS dish_id, d.name AS dish_name,
                   CAST(AVG(r.rating) AS DOUBLE PRECISION) AS average,
                   COUNT(*) AS count
            FROM reviews r
            JOIN dishes d ON d.id = r.dish_id
            WHERE r.is_approved AND NOT r.is_deleted
              AND r.created_at BETWEEN $1 AND $2
            GROUP BY d.id, d.name
            ORDER BY average DESC, count DESC
            LIMIT $3
        "#;
        let rows = TopRow::find_by_statement(Statement::from_sql_and_values(
            self.db.get_database_backend(),
            sql,
            [from.into(), to.into(), (limit as i64).into()],
        ))
        .all(&self.db)
        .await
        .context("rank top rated dishes")?;

        Ok(rows
            .into_iter()
            .map(|row| RatedDish {
                dish_id: row.dish_id,
                dish_name: row.dish_name,
                average: row.average,
                count: row.count as u64,
            })
            .collect())
    }

    async fn rating_distribution(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<[u64; 5], CantineError> {
        #[derive(Debug, FromQueryResult)]
        struct BucketRow {
            rating: i16,
            count: i64,
        }

        let sql = r#"
            SELECT rating, COUNT(*) AS count
            FROM reviews
            WHERE is_approved AND NOT is_deleted
              AND created_at BETWEEN $1 AND $2
            GROUP BY rating
        "#;
        let rows = BucketRow::find_by_statement(Statement::from_sql_and_values(
            self.db.get_database_backend(),
            sql,
            [from.into(), to.into()],
        ))
        .all(&self.db)
        .await
        .context("aggregate rating distribution")?;

        let mut distribution = [0u64; 5];
        for row in rows {
            if (1..=5).contains(&row.rating) {
                distribution[(row.rating - 1) as usize] = row.count as u64;
            }
        }
        Ok(distribution)
    }
}

fn review_from_model(model: reviews::Model) -> Review {
    Review {
        id: model.id,
        user_id: model.user_id,
        dish_id: model.dish_id,
        order_id: model.order_id,
        rating: model.rating as u8,
        comment: model.comment,
        is_anonymous: model.is_anonymous,
        is_approved: model.is_approved,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}
