use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};
use tower_http::trace::TraceLayer;

use cantine_core::health::{healthz, readyz};
use cantine_core::middleware::request_id_layer;

use crate::handlers::{
    dish::{
        create_category, create_dish, delete_category, delete_dish, get_dish, list_categories,
        list_dishes, toggle_dish_active, update_category, update_dish,
    },
    menu::{
        consolidation, ensure_week, menu_detail, publish_menu, set_menu_dishes, update_menu,
        week_menus,
    },
    order::{
        advance_status, cancel_order, change_order, day_consolidation, my_orders, order_board,
        place_order,
    },
    review::{
        approve_review, delete_review, dish_reviews, moderation_list, my_reviews, reject_review,
        review_prompts, submit_review,
    },
    stats::{menu_quick_stats, order_statistics, review_statistics},
    token::{login, logout, refresh_token},
    user::{delete_user, get_me, list_users, register, toggle_theme, update_me, update_user_access},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Session
        .route("/auth/token", post(login))
        .route("/auth/token", patch(refresh_token))
        .route("/auth/token", delete(logout))
        // Users
        .route("/users", post(register))
        .route("/users", get(list_users))
        .route("/users/@me", get(get_me))
        .route("/users/@me", patch(update_me))
        .route("/users/@me/theme", post(toggle_theme))
        .route("/users/{id}", patch(update_user_access))
        .route("/users/{id}", delete(delete_user))
        // Dish catalog
        .route("/categories", get(list_categories))
        .route("/categories", post(create_category))
        .route("/categories/{id}", patch(update_category))
        .route("/categories/{id}", delete(delete_category))
        .route("/dishes", get(list_dishes))
        .route("/dishes", post(create_dish))
        .route("/dishes/{id}", get(get_dish))
        .route("/dishes/{id}", patch(update_dish))
        .route("/dishes/{id}", delete(delete_dish))
        .route("/dishes/{id}/toggle", post(toggle_dish_active))
        .route("/dishes/{id}/reviews", get(dish_reviews))
        // Menus
        .route("/menus/week", get(week_menus))
        .route("/menus/week", post(ensure_week))
        .route("/menus/consolidation", get(consolidation))
        .route("/menus/{id}", get(menu_detail))
        .route("/menus/{id}", patch(update_menu))
        .route("/menus/{id}/publish", post(publish_menu))
        .route("/menus/{id}/dishes", put(set_menu_dishes))
        // Orders
        .route("/orders", post(place_order))
        .route("/orders", get(order_board))
        .route("/orders/@me", get(my_orders))
        .route("/orders/day", get(day_consolidation))
        .route("/orders/{id}", patch(change_order))
        .route("/orders/{id}", delete(cancel_order))
        .route("/orders/{id}/status", post(advance_status))
        // Reviews
        .route("/reviews", post(submit_review))
        .route("/reviews/@me", get(my_reviews))
        .route("/reviews/prompts", get(review_prompts))
        .route("/reviews/moderation", get(moderation_list))
        .route("/reviews/{id}", delete(delete_review))
        .route("/reviews/{id}/approve", post(approve_review))
        .route("/reviews/{id}/reject", post(reject_review))
        // Stats
        .route("/stats/menus", get(menu_quick_stats))
        .route("/stats/orders", get(order_statistics))
        .route("/stats/reviews", get(review_statistics))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
