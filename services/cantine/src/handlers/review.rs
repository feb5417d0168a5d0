use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use cantine_auth_types::identity::Identity;
use cantine_domain::pagination::PageRequest;
use cantine_domain::user::Role;

use crate::domain::types::{Review, ReviewModerationFilter};
use crate::error::CantineError;
use crate::handlers::require_role;
use crate::state::AppState;
use crate::usecase::review::{
    ApproveReviewUseCase, CanReviewUseCase, DeleteOwnReviewUseCase, ModerationListUseCase,
    MyReviewsUseCase, PendingReviewPromptsUseCase, PublicDishReviewsUseCase, RejectReviewUseCase,
    SubmitReviewInput, SubmitReviewUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ReviewResponse {
    pub id: i32,
    pub dish_id: i32,
    pub order_id: i32,
    pub rating: u8,
    pub comment: String,
    pub is_anonymous: bool,
    pub is_approved: bool,
    #[serde(serialize_with = "cantine_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        ReviewResponse {
            id: review.id,
            dish_id: review.dish_id,
            order_id: review.order_id,
            rating: review.rating,
            comment: review.comment,
            is_anonymous: review.is_anonymous,
            is_approved: review.is_approved,
            created_at: review.created_at,
        }
    }
}

// ── POST /reviews ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SubmitReviewRequest {
    pub order_id: i32,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub is_anonymous: bool,
}

#[derive(Serialize)]
pub struct SubmitReviewResponse {
    pub review_id: i32,
    pub updated: bool,
}

pub async fn submit_review(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<SubmitReviewRequest>,
) -> Result<(StatusCode, Json<SubmitReviewResponse>), CantineError> {
    let usecase = SubmitReviewUseCase {
        reviews: state.review_repo(),
        orders: state.order_repo(),
    };
    let out = usecase
        .execute(
            identity.user_id,
            SubmitReviewInput {
                order_id: body.order_id,
                rating: body.rating,
                comment: body.comment,
                is_anonymous: body.is_anonymous,
            },
        )
        .await?;
    let status = if out.updated {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((
        status,
        Json(SubmitReviewResponse {
            review_id: out.review_id,
            updated: out.updated,
        }),
    ))
}

// ── GET /reviews/@me ─────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct ReviewPageQuery {
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

pub async fn my_reviews(
    identity: Identity,
    State(state): State<AppState>,
    Query(query): Query<ReviewPageQuery>,
) -> Result<Json<Vec<ReviewResponse>>, CantineError> {
    let usecase = MyReviewsUseCase {
        reviews: state.review_repo(),
    };
    let page = PageRequest {
        per_page: query.per_page.unwrap_or(25),
        page: query.page.unwrap_or(1),
    };
    let reviews = usecase.execute(identity.user_id, page).await?;
    Ok(Json(reviews.into_iter().map(ReviewResponse::from).collect()))
}

// ── DELETE /reviews/{id} (own) ───────────────────────────────────────────────

pub async fn delete_review(
    identity: Identity,
    State(state): State<AppState>,
    Path(review_id): Path<i32>,
) -> Result<StatusCode, CantineError> {
    let usecase = DeleteOwnReviewUseCase {
        reviews: state.review_repo(),
    };
    usecase.execute(identity.user_id, review_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /reviews/moderation ──────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct ModerationQuery {
    /// "pending" (default), "approved" or "all".
    pub status: Option<String>,
    pub dish_id: Option<i32>,
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

pub async fn moderation_list(
    identity: Identity,
    State(state): State<AppState>,
    Query(query): Query<ModerationQuery>,
) -> Result<Json<Vec<ReviewResponse>>, CantineError> {
    require_role(&identity, &[Role::Admin, Role::Secretary])?;

    let approved = match query.status.as_deref() {
        None | Some("pending") => Some(false),
        Some("approved") => Some(true),
        Some("all") => None,
        Some(_) => return Err(CantineError::MissingData),
    };

    let usecase = ModerationListUseCase {
        reviews: state.review_repo(),
    };
    let reviews = usecase
        .execute(
            ReviewModerationFilter {
                approved,
                dish_id: query.dish_id,
            },
            PageRequest {
                per_page: query.per_page.unwrap_or(25),
                page: query.page.unwrap_or(1),
            },
        )
        .await?;
    Ok(Json(reviews.into_iter().map(ReviewResponse::from).collect()))
}

// ── POST /reviews/{id}/approve ───────────────────────────────────────────────

pub async fn approve_review(
    identity: Identity,
    State(state): State<AppState>,
    Path(review_id): Path<i32>,
) -> Result<StatusCode, CantineError> {
    require_role(&identity, &[Role::Admin, Role::Secretary])?;
    let usecase = ApproveReviewUseCase {
        reviews: state.review_repo(),
    };
    usecase.execute(identity.user_id, review_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /reviews/{id}/reject ────────────────────────────────────────────────

pub async fn reject_review(
    identity: Identity,
    State(state): State<AppState>,
    Path(review_id): Path<i32>,
) -> Result<StatusCode, CantineError> {
    require_role(&identity, &[Role::Admin, Role::Secretary])?;
    let usecase = RejectReviewUseCase {
        reviews: state.review_repo(),
    };
    usecase.execute(identity.user_id, review_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /dishes/{id}/reviews (public aggregate) ──────────────────────────────

#[derive(Serialize)]
pub struct DishReviewsResponse {
    pub dish_id: i32,
    pub dish_name: String,
    pub average: Option<f64>,
    pub count: u64,
    /// Whether the caller received this dish and may rate it.
    pub can_review: bool,
    pub reviews: Vec<ReviewResponse>,
}

pub async fn dish_reviews(
    identity: Identity,
    State(state): State<AppState>,
    Path(dish_id): Path<i32>,
    Query(query): Query<ReviewPageQuery>,
) -> Result<Json<DishReviewsResponse>, CantineError> {
    let usecase = PublicDishReviewsUseCase {
        reviews: state.review_repo(),
        dishes: state.dish_repo(),
    };
    let page = PageRequest {
        per_page: query.per_page.unwrap_or(10),
        page: query.page.unwrap_or(1),
    };
    let out = usecase.execute(dish_id, page).await?;

    let eligibility = CanReviewUseCase {
        orders: state.order_repo(),
    };
    let can_review = eligibility.execute(identity.user_id, dish_id).await?;

    Ok(Json(DishReviewsResponse {
        dish_id: out.dish.id,
        dish_name: out.dish.name,
        average: out.rating.average,
        count: out.rating.count,
        can_review,
        reviews: out.reviews.into_iter().map(ReviewResponse::from).collect(),
    }))
}

// ── GET /reviews/prompts ─────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ReviewPromptResponse {
    pub order_id: i32,
    pub dish_id: i32,
    pub dish_name: String,
    #[serde(serialize_with = "cantine_core::serde::to_rfc3339_ms")]
    pub ordered_at: chrono::DateTime<chrono::Utc>,
}

pub async fn review_prompts(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<Vec<ReviewPromptResponse>>, CantineError> {
    let usecase = PendingReviewPromptsUseCase {
        orders: state.order_repo(),
    };
    let rows = usecase.execute(identity.user_id).await?;
    Ok(Json(
        rows.into_iter()
            .map(|(order, dish)| ReviewPromptResponse {
                order_id: order.id,
                dish_id: dish.id,
                dish_name: dish.name,
                ordered_at: order.created_at,
            })
            .collect(),
    ))
}
