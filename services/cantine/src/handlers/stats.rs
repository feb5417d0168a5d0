use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use cantine_auth_types::identity::Identity;
use cantine_domain::user::Role;

use crate::error::CantineError;
use crate::handlers::require_role;
use crate::state::AppState;
use crate::usecase::stats::{
    MenuQuickStatsUseCase, OrderStatisticsUseCase, ReviewStatisticsUseCase,
};

#[derive(Deserialize, Default)]
pub struct RangeQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl RangeQuery {
    /// Default window: the last 30 days.
    fn bounds(&self) -> (NaiveDate, NaiveDate) {
        let to = self.to.unwrap_or_else(|| Utc::now().date_naive());
        let from = self
            .from
            .unwrap_or_else(|| (Utc::now() - Duration::days(30)).date_naive());
        (from, to)
    }
}

// ── GET /stats/menus ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct MenuQuickStatsResponse {
    pub menus_pending_publication: u64,
    pub menus_nearing_cutoff: u64,
}

pub async fn menu_quick_stats(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<MenuQuickStatsResponse>, CantineError> {
    require_role(&identity, &[Role::Admin, Role::Caterer, Role::Secretary])?;
    let usecase = MenuQuickStatsUseCase {
        menus: state.menu_repo(),
    };
    let stats = usecase.execute(Utc::now()).await?;
    Ok(Json(MenuQuickStatsResponse {
        menus_pending_publication: stats.menus_pending_publication,
        menus_nearing_cutoff: stats.menus_nearing_cutoff,
    }))
}

// ── GET /stats/orders ────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct DayCountResponse {
    pub date: NaiveDate,
    pub total: u64,
    pub confirmed: u64,
    pub delivered: u64,
}

#[derive(Serialize)]
pub struct DishCountResponse {
    pub dish_id: i32,
    pub dish_name: String,
    pub total: u64,
}

#[derive(Serialize)]
pub struct OrderStatisticsResponse {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub per_day: Vec<DayCountResponse>,
    pub top_dishes: Vec<DishCountResponse>,
}

pub async fn order_statistics(
    identity: Identity,
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<OrderStatisticsResponse>, CantineError> {
    require_role(&identity, &[Role::Admin])?;
    let (from, to) = query.bounds();
    let usecase = OrderStatisticsUseCase {
        orders: state.order_repo(),
    };
    let stats = usecase.execute(from, to).await?;
    Ok(Json(OrderStatisticsResponse {
        from,
        to,
        per_day: stats
            .per_day
            .into_iter()
            .map(|day| DayCountResponse {
                date: day.date,
                total: day.total,
                confirmed: day.confirmed,
                delivered: day.delivered,
            })
            .collect(),
        top_dishes: stats
            .top_dishes
            .into_iter()
            .map(|dish| DishCountResponse {
                dish_id: dish.dish_id,
                dish_name: dish.dish_name,
                total: dish.total,
            })
            .collect(),
    }))
}

// ── GET /stats/reviews ───────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct RatedDishResponse {
    pub dish_id: i32,
    pub dish_name: String,
    pub average: f64,
    pub count: u64,
}

#[derive(Serialize)]
pub struct ReviewStatisticsResponse {
    pub total: u64,
    pub average: Option<f64>,
    pub distribution: [u64; 5],
    pub top_dishes: Vec<RatedDishResponse>,
}

pub async fn review_statistics(
    identity: Identity,
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<ReviewStatisticsResponse>, CantineError> {
    require_role(&identity, &[Role::Admin])?;
    let (from, to) = query.bounds();
    let from = from.and_hms_opt(0, 0, 0).expect("valid time").and_utc();
    let to = (to + chrono::Days::new(1))
        .and_hms_opt(0, 0, 0)
        .expect("valid time")
        .and_utc();
    let usecase = ReviewStatisticsUseCase {
        reviews: state.review_repo(),
    };
    let stats = usecase.execute(from, to).await?;
    Ok(Json(ReviewStatisticsResponse {
        total: stats.total,
        average: stats.average,
        distribution: stats.distribution,
        top_dishes: stats
            .top_dishes
            .into_iter()
            .map(|dish| RatedDishResponse {
                dish_id: dish.dish_id,
                dish_name: dish.dish_name,
                average: dish.average,
                count: dish.count,
            })
            .collect(),
    }))
}
