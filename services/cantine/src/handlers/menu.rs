use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use cantine_auth_types::identity::Identity;
use cantine_domain::menu::Weekday;
use cantine_domain::user::{Role, Site};

use crate::domain::types::{Menu, MenuDishSpec, MenuInfoUpdate};
use crate::error::CantineError;
use crate::handlers::dish::DishResponse;
use crate::handlers::require_role;
use crate::state::AppState;
use crate::usecase::menu::{
    ConsolidateRangeUseCase, EnsureWeekUseCase, MenuDetailUseCase, MenuWithDishes,
    PublishMenuUseCase, SetMenuDishesUseCase, UpdateMenuUseCase, WeekMenusUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct MenuResponse {
    pub id: i32,
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub site: Site,
    pub title: String,
    pub description: String,
    pub is_published: bool,
    #[serde(serialize_with = "cantine_core::serde::to_rfc3339_ms")]
    pub cutoff_at: chrono::DateTime<chrono::Utc>,
    pub max_orders: i32,
    pub ordering_open: bool,
}

impl From<Menu> for MenuResponse {
    fn from(menu: Menu) -> Self {
        let ordering_open = menu.ordering_open(Utc::now());
        MenuResponse {
            id: menu.id,
            date: menu.date,
            weekday: menu.weekday,
            site: menu.site,
            title: menu.title,
            description: menu.description,
            is_published: menu.is_published,
            cutoff_at: menu.cutoff_at,
            max_orders: menu.max_orders,
            ordering_open,
        }
    }
}

#[derive(Serialize)]
pub struct MenuDishResponse {
    pub dish: DishResponse,
    pub price_cents: i32,
    pub max_quantity: i32,
    pub planned_quantity: i32,
    pub ordered_quantity: i32,
}

#[derive(Serialize)]
pub struct MenuWithDishesResponse {
    #[serde(flatten)]
    pub menu: MenuResponse,
    pub dishes: Vec<MenuDishResponse>,
}

impl From<MenuWithDishes> for MenuWithDishesResponse {
    fn from(value: MenuWithDishes) -> Self {
        let dishes = value
            .dishes
            .into_iter()
            .map(|(menu_dish, dish)| MenuDishResponse {
                dish: dish.into(),
                price_cents: menu_dish.price_cents,
                max_quantity: menu_dish.max_quantity,
                planned_quantity: menu_dish.planned_quantity,
                ordered_quantity: menu_dish.ordered_quantity,
            })
            .collect();
        MenuWithDishesResponse {
            menu: value.menu.into(),
            dishes,
        }
    }
}

// ── GET /menus/week (employee) ───────────────────────────────────────────────

pub async fn week_menus(
    _identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<Vec<MenuWithDishesResponse>>, CantineError> {
    let usecase = WeekMenusUseCase {
        menus: state.menu_repo(),
    };
    let menus = usecase.execute(Utc::now().date_naive()).await?;
    Ok(Json(
        menus.into_iter().map(MenuWithDishesResponse::from).collect(),
    ))
}

// ── POST /menus/week (staff bootstrap) ───────────────────────────────────────

pub async fn ensure_week(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<Vec<MenuResponse>>, CantineError> {
    require_role(&identity, &[Role::Admin, Role::Caterer])?;
    let usecase = EnsureWeekUseCase {
        menus: state.menu_repo(),
    };
    let menus = usecase
        .execute(identity.user_id, Utc::now().date_naive())
        .await?;
    Ok(Json(menus.into_iter().map(MenuResponse::from).collect()))
}

// ── GET /menus/{id} ──────────────────────────────────────────────────────────

pub async fn menu_detail(
    identity: Identity,
    State(state): State<AppState>,
    Path(menu_id): Path<i32>,
) -> Result<Json<MenuWithDishesResponse>, CantineError> {
    let usecase = MenuDetailUseCase {
        menus: state.menu_repo(),
    };
    let detail = usecase.execute(menu_id).await?;
    // Unpublished menus are staff-only.
    if !detail.menu.is_published {
        require_role(&identity, &[Role::Admin, Role::Caterer])
            .map_err(|_| CantineError::MenuNotFound)?;
    }
    Ok(Json(detail.into()))
}

// ── POST /menus/{id}/publish ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct PublishRequest {
    pub published: bool,
}

pub async fn publish_menu(
    identity: Identity,
    State(state): State<AppState>,
    Path(menu_id): Path<i32>,
    Json(body): Json<PublishRequest>,
) -> Result<StatusCode, CantineError> {
    require_role(&identity, &[Role::Admin, Role::Caterer])?;
    let usecase = PublishMenuUseCase {
        menus: state.menu_repo(),
    };
    usecase
        .execute(identity.user_id, menu_id, body.published)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── PATCH /menus/{id} ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateMenuRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub cutoff_at: Option<chrono::DateTime<chrono::Utc>>,
    pub max_orders: Option<i32>,
}

pub async fn update_menu(
    identity: Identity,
    State(state): State<AppState>,
    Path(menu_id): Path<i32>,
    Json(body): Json<UpdateMenuRequest>,
) -> Result<StatusCode, CantineError> {
    require_role(&identity, &[Role::Admin, Role::Caterer])?;
    let usecase = UpdateMenuUseCase {
        menus: state.menu_repo(),
    };
    usecase
        .execute(
            identity.user_id,
            menu_id,
            MenuInfoUpdate {
                title: body.title,
                description: body.description,
                cutoff_at: body.cutoff_at,
                max_orders: body.max_orders,
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── PUT /menus/{id}/dishes ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct MenuDishEntry {
    pub dish_id: i32,
    #[serde(default)]
    pub price_cents: i32,
    #[serde(default)]
    pub max_quantity: i32,
    #[serde(default)]
    pub planned_quantity: i32,
}

pub async fn set_menu_dishes(
    identity: Identity,
    State(state): State<AppState>,
    Path(menu_id): Path<i32>,
    Json(body): Json<Vec<MenuDishEntry>>,
) -> Result<StatusCode, CantineError> {
    require_role(&identity, &[Role::Admin, Role::Caterer])?;
    let entries = body
        .into_iter()
        .map(|entry| MenuDishSpec {
            dish_id: entry.dish_id,
            price_cents: entry.price_cents,
            max_quantity: entry.max_quantity,
            planned_quantity: entry.planned_quantity,
        })
        .collect();
    let usecase = SetMenuDishesUseCase {
        menus: state.menu_repo(),
        dishes: state.dish_repo(),
    };
    usecase.execute(identity.user_id, menu_id, entries).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /menus/consolidation (caterer) ───────────────────────────────────────

#[derive(Deserialize)]
pub struct ConsolidationQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub site: Site,
}

#[derive(Serialize)]
pub struct MenuConsolidationResponse {
    #[serde(flatten)]
    pub menu: MenuResponse,
    pub dishes: Vec<MenuDishResponse>,
    pub total_ordered: i64,
}

pub async fn consolidation(
    identity: Identity,
    State(state): State<AppState>,
    Query(query): Query<ConsolidationQuery>,
) -> Result<Json<Vec<MenuConsolidationResponse>>, CantineError> {
    require_role(&identity, &[Role::Admin, Role::Caterer])?;
    let usecase = ConsolidateRangeUseCase {
        menus: state.menu_repo(),
    };
    let rows = usecase.execute(query.from, query.to, query.site).await?;
    let body = rows
        .into_iter()
        .map(|row| {
            let dishes = row
                .dishes
                .into_iter()
                .map(|(menu_dish, dish)| MenuDishResponse {
                    dish: dish.into(),
                    price_cents: menu_dish.price_cents,
                    max_quantity: menu_dish.max_quantity,
                    planned_quantity: menu_dish.planned_quantity,
                    ordered_quantity: menu_dish.ordered_quantity,
                })
                .collect();
            MenuConsolidationResponse {
                menu: row.menu.into(),
                dishes,
                total_ordered: row.total_ordered,
            }
        })
        .collect();
    Ok(Json(body))
}
