use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use cantine_auth_types::identity::Identity;
use cantine_domain::order::OrderStatus;
use cantine_domain::pagination::PageRequest;
use cantine_domain::user::{Role, Site};

use crate::domain::types::{Order, OrderFilter, OrderStats};
use crate::error::CantineError;
use crate::handlers::require_role;
use crate::state::AppState;
use crate::usecase::order::{
    AdvanceOrderStatusUseCase, CancelOrderUseCase, ChangeOrderDishInput, ChangeOrderDishUseCase,
    ConsolidateDayUseCase, MyOrdersUseCase, OrderBoardUseCase, PlaceOrderInput, PlaceOrderUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: i32,
    pub menu_id: i32,
    pub dish_id: i32,
    pub status: OrderStatus,
    pub special_notes: String,
    #[serde(serialize_with = "cantine_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        OrderResponse {
            id: order.id,
            menu_id: order.menu_id,
            dish_id: order.dish_id,
            status: order.status,
            special_notes: order.special_notes,
            created_at: order.created_at,
        }
    }
}

// ── POST /orders ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct PlaceOrderRequest {
    pub menu_id: i32,
    pub dish_id: i32,
    #[serde(default)]
    pub special_notes: String,
}

pub async fn place_order(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>), CantineError> {
    let usecase = PlaceOrderUseCase {
        orders: state.order_repo(),
        menus: state.menu_repo(),
        dishes: state.dish_repo(),
    };
    let order = usecase
        .execute(
            identity.user_id,
            PlaceOrderInput {
                menu_id: body.menu_id,
                dish_id: body.dish_id,
                special_notes: body.special_notes,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(order.into())))
}

// ── GET /orders/@me ──────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct MyOrdersQuery {
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

pub async fn my_orders(
    identity: Identity,
    State(state): State<AppState>,
    Query(query): Query<MyOrdersQuery>,
) -> Result<Json<Vec<OrderResponse>>, CantineError> {
    let usecase = MyOrdersUseCase {
        orders: state.order_repo(),
    };
    let page = PageRequest {
        per_page: query.per_page.unwrap_or(25),
        page: query.page.unwrap_or(1),
    };
    let orders = usecase.execute(identity.user_id, page).await?;
    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}

// ── PATCH /orders/{id} (change dish / notes) ─────────────────────────────────

#[derive(Deserialize)]
pub struct ChangeOrderRequest {
    pub dish_id: i32,
    #[serde(default)]
    pub special_notes: String,
}

pub async fn change_order(
    identity: Identity,
    State(state): State<AppState>,
    Path(order_id): Path<i32>,
    Json(body): Json<ChangeOrderRequest>,
) -> Result<StatusCode, CantineError> {
    let usecase = ChangeOrderDishUseCase {
        orders: state.order_repo(),
        menus: state.menu_repo(),
        dishes: state.dish_repo(),
    };
    usecase
        .execute(
            identity.user_id,
            order_id,
            ChangeOrderDishInput {
                new_dish_id: body.dish_id,
                special_notes: body.special_notes,
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── DELETE /orders/{id} (cancel) ─────────────────────────────────────────────

pub async fn cancel_order(
    identity: Identity,
    State(state): State<AppState>,
    Path(order_id): Path<i32>,
) -> Result<StatusCode, CantineError> {
    let usecase = CancelOrderUseCase {
        orders: state.order_repo(),
        menus: state.menu_repo(),
    };
    usecase.execute(identity.user_id, order_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /orders (admin board) ────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct OrderBoardQuery {
    pub status: Option<OrderStatus>,
    pub site: Option<Site>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

#[derive(Serialize)]
pub struct OrderStatsResponse {
    pub total: u64,
    pub pending: u64,
    pub confirmed: u64,
    pub ready: u64,
    pub delivered: u64,
}

impl From<OrderStats> for OrderStatsResponse {
    fn from(stats: OrderStats) -> Self {
        OrderStatsResponse {
            total: stats.total,
            pending: stats.pending,
            confirmed: stats.confirmed,
            ready: stats.ready,
            delivered: stats.delivered,
        }
    }
}

#[derive(Serialize)]
pub struct OrderBoardResponse {
    pub orders: Vec<OrderResponse>,
    pub stats: OrderStatsResponse,
}

pub async fn order_board(
    identity: Identity,
    State(state): State<AppState>,
    axum::extract::RawQuery(raw_query): axum::extract::RawQuery,
) -> Result<Json<OrderBoardResponse>, CantineError> {
    require_role(&identity, &[Role::Admin])?;

    let query: OrderBoardQuery = raw_query
        .as_deref()
        .map(serde_qs::from_str)
        .transpose()
        .map_err(|_| CantineError::MissingData)?
        .unwrap_or_default();

    let usecase = OrderBoardUseCase {
        orders: state.order_repo(),
    };
    let board = usecase
        .execute(
            OrderFilter {
                status: query.status,
                site: query.site,
                from: query.from,
                to: query.to,
            },
            PageRequest {
                per_page: query.per_page.unwrap_or(25),
                page: query.page.unwrap_or(1),
            },
        )
        .await?;
    Ok(Json(OrderBoardResponse {
        orders: board.orders.into_iter().map(OrderResponse::from).collect(),
        stats: board.stats.into(),
    }))
}

// ── POST /orders/{id}/status (staff) ─────────────────────────────────────────

#[derive(Deserialize)]
pub struct AdvanceStatusRequest {
    pub status: OrderStatus,
}

pub async fn advance_status(
    identity: Identity,
    State(state): State<AppState>,
    Path(order_id): Path<i32>,
    Json(body): Json<AdvanceStatusRequest>,
) -> Result<StatusCode, CantineError> {
    require_role(&identity, &[Role::Admin, Role::Caterer])?;
    let usecase = AdvanceOrderStatusUseCase {
        orders: state.order_repo(),
    };
    usecase
        .execute(identity.user_id, order_id, body.status)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /orders/day (caterer consolidation) ──────────────────────────────────

#[derive(Deserialize)]
pub struct DayQuery {
    pub date: Option<NaiveDate>,
    pub site: Site,
}

#[derive(Serialize)]
pub struct DishConsolidationResponse {
    pub dish_id: i32,
    pub dish_name: String,
    pub quantity: u64,
    pub confirmed: u64,
    pub ready: u64,
    pub special_notes: Vec<String>,
}

pub async fn day_consolidation(
    identity: Identity,
    State(state): State<AppState>,
    Query(query): Query<DayQuery>,
) -> Result<Json<Vec<DishConsolidationResponse>>, CantineError> {
    require_role(&identity, &[Role::Admin, Role::Caterer])?;
    let usecase = ConsolidateDayUseCase {
        orders: state.order_repo(),
    };
    let date = query.date.unwrap_or_else(|| Utc::now().date_naive());
    let rows = usecase.execute(date, query.site).await?;
    Ok(Json(
        rows.into_iter()
            .map(|row| DishConsolidationResponse {
                dish_id: row.dish.id,
                dish_name: row.dish.name,
                quantity: row.quantity,
                confirmed: row.confirmed,
                ready: row.ready,
                special_notes: row.special_notes,
            })
            .collect(),
    ))
}
