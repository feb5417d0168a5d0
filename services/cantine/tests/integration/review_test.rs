use uuid::Uuid;

use cantine::error::CantineError;
use cantine::usecase::order::{
    AdvanceOrderStatusUseCase, ChangeOrderDishInput, PlaceOrderInput, PlaceOrderUseCase,
};
use cantine::usecase::review::{
    ApproveReviewUseCase, CanReviewUseCase, PublicDishReviewsUseCase, RejectReviewUseCase,
    SubmitReviewInput, SubmitReviewUseCase,
};
use cantine_domain::order::OrderStatus;
use cantine_domain::pagination::PageRequest;

use crate::helpers::{World, world};

const SALADE: i32 = 1;
const POULET: i32 = 2;

async fn place_received_order(w: &World, user: Uuid, dish_id: i32) -> i32 {
    let place = PlaceOrderUseCase {
        orders: w.orders.clone(),
        menus: w.menus.clone(),
        dishes: w.dishes.clone(),
    };
    let order = place
        .execute(
            user,
            PlaceOrderInput {
                menu_id: 1,
                dish_id,
                special_notes: String::new(),
            },
        )
        .await
        .unwrap();
    let advance = AdvanceOrderStatusUseCase {
        orders: w.orders.clone(),
    };
    advance
        .execute(Uuid::now_v7(), order.id, OrderStatus::Confirmed)
        .await
        .unwrap();
    order.id
}

fn submit_input(order_id: i32, rating: u8) -> SubmitReviewInput {
    SubmitReviewInput {
        order_id,
        rating,
        comment: String::new(),
        is_anonymous: false,
    }
}

#[tokio::test]
async fn should_deny_review_without_received_order() {
    let w = world();
    let user = Uuid::now_v7();
    let uc = CanReviewUseCase {
        orders: w.orders.clone(),
    };
    assert!(!uc.execute(user, SALADE).await.unwrap());
}

#[tokio::test]
async fn should_allow_review_after_order_received() {
    let w = world();
    let user = Uuid::now_v7();
    place_received_order(&w, user, SALADE).await;

    let uc = CanReviewUseCase {
        orders: w.orders.clone(),
    };
    assert!(uc.execute(user, SALADE).await.unwrap());
    assert!(!uc.execute(user, POULET).await.unwrap());
}

#[tokio::test]
async fn should_not_count_pending_order_as_received() {
    let w = world();
    let user = Uuid::now_v7();
    let place = PlaceOrderUseCase {
        orders: w.orders.clone(),
        menus: w.menus.clone(),
        dishes: w.dishes.clone(),
    };
    let order = place
        .execute(
            user,
            PlaceOrderInput {
                menu_id: 1,
                dish_id: SALADE,
                special_notes: String::new(),
            },
        )
        .await
        .unwrap();

    let submit = SubmitReviewUseCase {
        reviews: w.reviews.clone(),
        orders: w.orders.clone(),
    };
    let result = submit.execute(user, submit_input(order.id, 4)).await;
    assert!(matches!(result, Err(CantineError::NotEligible)));
}

#[tokio::test]
async fn should_create_unapproved_review() {
    let w = world();
    let user = Uuid::now_v7();
    let order_id = place_received_order(&w, user, SALADE).await;

    let submit = SubmitReviewUseCase {
        reviews: w.reviews.clone(),
        orders: w.orders.clone(),
    };
    let out = submit.execute(user, submit_input(order_id, 4)).await.unwrap();

    assert!(!out.updated);
    let stored = w.reviews.reviews.lock().unwrap()[0].clone();
    assert_eq!(stored.id, out.review_id);
    assert_eq!(stored.rating, 4);
    assert_eq!(stored.dish_id, SALADE);
    assert!(!stored.is_approved);
}

#[tokio::test]
async fn should_reject_out_of_range_rating() {
    let w = world();
    let user = Uuid::now_v7();
    let order_id = place_received_order(&w, user, SALADE).await;

    let submit = SubmitReviewUseCase {
        reviews: w.reviews.clone(),
        orders: w.orders.clone(),
    };
    for rating in [0, 6] {
        let result = submit.execute(user, submit_input(order_id, rating)).await;
        assert!(matches!(result, Err(CantineError::InvalidRating)));
    }
    assert!(w.reviews.reviews.lock().unwrap().is_empty());
}

#[tokio::test]
async fn should_update_existing_review_on_resubmission() {
    let w = world();
    let user = Uuid::now_v7();
    let order_id = place_received_order(&w, user, SALADE).await;

    let submit = SubmitReviewUseCase {
        reviews: w.reviews.clone(),
        orders: w.orders.clone(),
    };
    let first = submit.execute(user, submit_input(order_id, 2)).await.unwrap();

    // Approve, then resubmit: the row is updated in place and goes back
    // through moderation.
    let approve = ApproveReviewUseCase {
        reviews: w.reviews.clone(),
    };
    approve.execute(Uuid::now_v7(), first.review_id).await.unwrap();

    let second = submit
        .execute(
            user,
            SubmitReviewInput {
                order_id,
                rating: 5,
                comment: "bien meilleur que prévu".into(),
                is_anonymous: true,
            },
        )
        .await
        .unwrap();

    assert!(second.updated);
    assert_eq!(second.review_id, first.review_id);
    let reviews = w.reviews.reviews.lock().unwrap();
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0].rating, 5);
    assert_eq!(reviews[0].comment, "bien meilleur que prévu");
    assert!(reviews[0].is_anonymous);
    assert!(!reviews[0].is_approved);
}

#[tokio::test]
async fn should_exclude_unapproved_reviews_from_public_aggregate() {
    let w = world();
    let user = Uuid::now_v7();
    let order_id = place_received_order(&w, user, SALADE).await;

    let submit = SubmitReviewUseCase {
        reviews: w.reviews.clone(),
        orders: w.orders.clone(),
    };
    submit.execute(user, submit_input(order_id, 5)).await.unwrap();

    let public = PublicDishReviewsUseCase {
        reviews: w.reviews.clone(),
        dishes: w.dishes.clone(),
    };
    let out = public.execute(SALADE, PageRequest::default()).await.unwrap();
    assert_eq!(out.rating.count, 0);
    assert_eq!(out.rating.average, None);
    assert!(out.reviews.is_empty());
}

#[tokio::test]
async fn should_drop_rejected_review_from_aggregates() {
    let w = world();
    let user = Uuid::now_v7();
    let order_id = place_received_order(&w, user, SALADE).await;

    let submit = SubmitReviewUseCase {
        reviews: w.reviews.clone(),
        orders: w.orders.clone(),
    };
    let out = submit.execute(user, submit_input(order_id, 1)).await.unwrap();

    let reject = RejectReviewUseCase {
        reviews: w.reviews.clone(),
    };
    reject.execute(Uuid::now_v7(), out.review_id).await.unwrap();

    let public = PublicDishReviewsUseCase {
        reviews: w.reviews.clone(),
        dishes: w.dishes.clone(),
    };
    let aggregate = public.execute(SALADE, PageRequest::default()).await.unwrap();
    assert_eq!(aggregate.rating.count, 0);

    let result = reject.execute(Uuid::now_v7(), out.review_id).await;
    assert!(matches!(result, Err(CantineError::ReviewNotFound)));
}

#[tokio::test]
async fn should_run_order_to_public_rating_scenario() {
    // Order Salade César, switch to Poulet Rôti, fulfil, rate 5 stars,
    // approve, and find the rating in the dish's public average.
    let w = world();
    let user = Uuid::now_v7();
    let staff = Uuid::now_v7();

    let place = PlaceOrderUseCase {
        orders: w.orders.clone(),
        menus: w.menus.clone(),
        dishes: w.dishes.clone(),
    };
    let order = place
        .execute(
            user,
            PlaceOrderInput {
                menu_id: 1,
                dish_id: SALADE,
                special_notes: String::new(),
            },
        )
        .await
        .unwrap();
    assert_eq!(w.menus.counter(1, SALADE), 1);

    let change = cantine::usecase::order::ChangeOrderDishUseCase {
        orders: w.orders.clone(),
        menus: w.menus.clone(),
        dishes: w.dishes.clone(),
    };
    change
        .execute(
            user,
            order.id,
            ChangeOrderDishInput {
                new_dish_id: POULET,
                special_notes: String::new(),
            },
        )
        .await
        .unwrap();
    assert_eq!(w.menus.counter(1, SALADE), 0);
    assert_eq!(w.menus.counter(1, POULET), 1);

    let advance = AdvanceOrderStatusUseCase {
        orders: w.orders.clone(),
    };
    advance
        .execute(staff, order.id, OrderStatus::Confirmed)
        .await
        .unwrap();
    advance
        .execute(staff, order.id, OrderStatus::Delivered)
        .await
        .unwrap();

    let submit = SubmitReviewUseCase {
        reviews: w.reviews.clone(),
        orders: w.orders.clone(),
    };
    let review = submit.execute(user, submit_input(order.id, 5)).await.unwrap();

    let approve = ApproveReviewUseCase {
        reviews: w.reviews.clone(),
    };
    approve.execute(staff, review.review_id).await.unwrap();

    let public = PublicDishReviewsUseCase {
        reviews: w.reviews.clone(),
        dishes: w.dishes.clone(),
    };
    let poulet = public.execute(POULET, PageRequest::default()).await.unwrap();
    assert_eq!(poulet.rating.count, 1);
    assert_eq!(poulet.rating.average, Some(5.0));
    assert_eq!(poulet.reviews.len(), 1);
}
