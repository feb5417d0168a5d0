use chrono::{Duration, Utc};
use uuid::Uuid;

use cantine_domain::pagination::PageRequest;

use crate::domain::repository::{DishRepository, OrderRepository, ReviewRepository};
use crate::domain::types::{
    Dish, DishRatingSummary, NewReview, Order, Review, ReviewModerationFilter, validate_rating,
};
use crate::error::CantineError;

/// Received orders older than this no longer trigger a rating prompt.
const REVIEW_PROMPT_WINDOW_DAYS: i64 = 7;
/// At most this many prompts are surfaced at once.
const REVIEW_PROMPT_LIMIT: u64 = 5;

// ── CanReview ────────────────────────────────────────────────────────────────

pub struct CanReviewUseCase<O: OrderRepository> {
    pub orders: O,
}

impl<O: OrderRepository> CanReviewUseCase<O> {
    /// True iff the user has a non-deleted confirmed/ready/delivered order
    /// of the dish.
    pub async fn execute(&self, user_id: Uuid, dish_id: i32) -> Result<bool, CantineError> {
        self.orders.has_received_order(user_id, dish_id).await
    }
}

// ── SubmitReview ─────────────────────────────────────────────────────────────

pub struct SubmitReviewInput {
    pub order_id: i32,
    pub rating: u8,
    pub comment: String,
    pub is_anonymous: bool,
}

pub struct SubmitReviewOutput {
    pub review_id: i32,
    /// An existing review was updated in place rather than created.
    pub updated: bool,
}

pub struct SubmitReviewUseCase<R: ReviewRepository, O: OrderRepository> {
    pub reviews: R,
    pub orders: O,
}

impl<R: ReviewRepository, O: OrderRepository> SubmitReviewUseCase<R, O> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: SubmitReviewInput,
    ) -> Result<SubmitReviewOutput, CantineError> {
        if !validate_rating(input.rating) {
            return Err(CantineError::InvalidRating);
        }

        let order = self
            .orders
            .find_by_id(input.order_id)
            .await?
            .filter(|o| o.user_id == user_id && !o.is_deleted)
            .ok_or(CantineError::OrderNotFound)?;

        if !self
            .orders
            .has_received_order(user_id, order.dish_id)
            .await?
        {
            return Err(CantineError::NotEligible);
        }

        // Re-submitting for the same order updates the existing review and
        // sends it back through moderation.
        if let Some(existing) = self
            .reviews
            .find_by_user_order(user_id, order.id)
            .await?
        {
            self.reviews
                .update_content(
                    existing.id,
                    input.rating,
                    &input.comment,
                    input.is_anonymous,
                    user_id,
                )
                .await?;
            return Ok(SubmitReviewOutput {
                review_id: existing.id,
                updated: true,
            });
        }

        let review = self
            .reviews
            .create(&NewReview {
                user_id,
                dish_id: order.dish_id,
                order_id: order.id,
                rating: input.rating,
                comment: input.comment,
                is_anonymous: input.is_anonymous,
            })
            .await?;
        Ok(SubmitReviewOutput {
            review_id: review.id,
            updated: false,
        })
    }
}

// ── My reviews / delete own ──────────────────────────────────────────────────

pub struct MyReviewsUseCase<R: ReviewRepository> {
    pub reviews: R,
}

impl<R: ReviewRepository> MyReviewsUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        page: PageRequest,
    ) -> Result<Vec<Review>, CantineError> {
        self.reviews.list_by_user(user_id, page).await
    }
}

pub struct DeleteOwnReviewUseCase<R: ReviewRepository> {
    pub reviews: R,
}

impl<R: ReviewRepository> DeleteOwnReviewUseCase<R> {
    pub async fn execute(&self, user_id: Uuid, review_id: i32) -> Result<(), CantineError> {
        let review = self
            .reviews
            .find_by_id(review_id)
            .await?
            .filter(|r| r.user_id == user_id)
            .ok_or(CantineError::ReviewNotFound)?;
        let deleted = self.reviews.soft_delete(review.id, user_id).await?;
        if !deleted {
            return Err(CantineError::ReviewNotFound);
        }
        Ok(())
    }
}

// ── Moderation (admin / secretary) ───────────────────────────────────────────

pub struct ModerationListUseCase<R: ReviewRepository> {
    pub reviews: R,
}

impl<R: ReviewRepository> ModerationListUseCase<R> {
    pub async fn execute(
        &self,
        filter: ReviewModerationFilter,
        page: PageRequest,
    ) -> Result<Vec<Review>, CantineError> {
        self.reviews.list_for_moderation(&filter, page).await
    }
}

pub struct ApproveReviewUseCase<R: ReviewRepository> {
    pub reviews: R,
}

impl<R: ReviewRepository> ApproveReviewUseCase<R> {
    pub async fn execute(&self, actor: Uuid, review_id: i32) -> Result<(), CantineError> {
        self.reviews
            .find_by_id(review_id)
            .await?
            .ok_or(CantineError::ReviewNotFound)?;
        self.reviews.set_approved(review_id, actor).await
    }
}

pub struct RejectReviewUseCase<R: ReviewRepository> {
    pub reviews: R,
}

impl<R: ReviewRepository> RejectReviewUseCase<R> {
    pub async fn execute(&self, actor: Uuid, review_id: i32) -> Result<(), CantineError> {
        let deleted = self.reviews.soft_delete(review_id, actor).await?;
        if !deleted {
            return Err(CantineError::ReviewNotFound);
        }
        Ok(())
    }
}

// ── Public dish reviews ──────────────────────────────────────────────────────

pub struct DishReviews {
    pub dish: Dish,
    pub reviews: Vec<Review>,
    pub rating: DishRatingSummary,
}

pub struct PublicDishReviewsUseCase<R: ReviewRepository, D: DishRepository> {
    pub reviews: R,
    pub dishes: D,
}

impl<R: ReviewRepository, D: DishRepository> PublicDishReviewsUseCase<R, D> {
    pub async fn execute(&self, dish_id: i32, page: PageRequest) -> Result<DishReviews, CantineError> {
        let dish = self
            .dishes
            .find_by_id(dish_id)
            .await?
            .filter(|d| d.is_active)
            .ok_or(CantineError::DishNotFound)?;
        let reviews = self.reviews.list_public_for_dish(dish_id, page).await?;
        let rating = self.reviews.dish_rating(dish_id).await?;
        Ok(DishReviews {
            dish,
            reviews,
            rating,
        })
    }
}

// ── Rating prompts ───────────────────────────────────────────────────────────

pub struct PendingReviewPromptsUseCase<O: OrderRepository> {
    pub orders: O,
}

impl<O: OrderRepository> PendingReviewPromptsUseCase<O> {
    /// Recent received orders the user has not reviewed yet.
    pub async fn execute(&self, user_id: Uuid) -> Result<Vec<(Order, Dish)>, CantineError> {
        let since = Utc::now() - Duration::days(REVIEW_PROMPT_WINDOW_DAYS);
        self.orders
            .list_unreviewed_received(user_id, since, REVIEW_PROMPT_LIMIT)
            .await
    }
}
