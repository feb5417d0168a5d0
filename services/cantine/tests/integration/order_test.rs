use chrono::{Duration, Utc};
use uuid::Uuid;

use cantine::error::CantineError;
use cantine::usecase::order::{
    AdvanceOrderStatusUseCase, CancelOrderUseCase, ChangeOrderDishInput, ChangeOrderDishUseCase,
    ConsolidateDayUseCase, PlaceOrderInput, PlaceOrderUseCase,
};
use cantine_domain::order::OrderStatus;
use cantine_domain::user::Site;

use crate::helpers::{test_date, test_menu, world};

const SALADE: i32 = 1;
const POULET: i32 = 2;

fn place_input(dish_id: i32) -> PlaceOrderInput {
    PlaceOrderInput {
        menu_id: 1,
        dish_id,
        special_notes: String::new(),
    }
}

#[tokio::test]
async fn should_place_order_and_increment_counter() {
    let w = world();
    let uc = PlaceOrderUseCase {
        orders: w.orders.clone(),
        menus: w.menus.clone(),
        dishes: w.dishes.clone(),
    };

    let order = uc.execute(Uuid::now_v7(), place_input(SALADE)).await.unwrap();

    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(w.menus.counter(1, SALADE), 1);
    assert_eq!(w.menus.counter(1, POULET), 0);
}

#[tokio::test]
async fn should_reject_second_order_on_same_menu() {
    let w = world();
    let uc = PlaceOrderUseCase {
        orders: w.orders.clone(),
        menus: w.menus.clone(),
        dishes: w.dishes.clone(),
    };
    let user = Uuid::now_v7();

    uc.execute(user, place_input(SALADE)).await.unwrap();
    let result = uc.execute(user, place_input(POULET)).await;

    assert!(matches!(result, Err(CantineError::DuplicateOrder)));
    // The failed attempt must not have touched any counter.
    assert_eq!(w.menus.counter(1, SALADE), 1);
    assert_eq!(w.menus.counter(1, POULET), 0);
}

#[tokio::test]
async fn should_reject_order_past_cutoff_without_counter_change() {
    let w = world();
    w.menus.menus.lock().unwrap()[0] = test_menu(1, Utc::now() - Duration::hours(1), true);
    let uc = PlaceOrderUseCase {
        orders: w.orders.clone(),
        menus: w.menus.clone(),
        dishes: w.dishes.clone(),
    };

    let result = uc.execute(Uuid::now_v7(), place_input(SALADE)).await;

    assert!(matches!(result, Err(CantineError::CutoffExpired)));
    assert_eq!(w.menus.counter(1, SALADE), 0);
}

#[tokio::test]
async fn should_hide_unpublished_menu_from_ordering() {
    let w = world();
    w.menus.menus.lock().unwrap()[0].is_published = false;
    let uc = PlaceOrderUseCase {
        orders: w.orders.clone(),
        menus: w.menus.clone(),
        dishes: w.dishes.clone(),
    };

    let result = uc.execute(Uuid::now_v7(), place_input(SALADE)).await;
    assert!(matches!(result, Err(CantineError::MenuNotFound)));
}

#[tokio::test]
async fn should_reject_dish_not_on_menu() {
    let w = world();
    let uc = PlaceOrderUseCase {
        orders: w.orders.clone(),
        menus: w.menus.clone(),
        dishes: w.dishes.clone(),
    };

    let result = uc.execute(Uuid::now_v7(), place_input(999)).await;
    assert!(matches!(result, Err(CantineError::DishNotFound)));
}

#[tokio::test]
async fn should_swap_counters_when_changing_dish() {
    let w = world();
    let user = Uuid::now_v7();
    let place = PlaceOrderUseCase {
        orders: w.orders.clone(),
        menus: w.menus.clone(),
        dishes: w.dishes.clone(),
    };
    let order = place.execute(user, place_input(SALADE)).await.unwrap();
    assert_eq!(w.menus.counter(1, SALADE), 1);

    let change = ChangeOrderDishUseCase {
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
                special_notes: "sans sauce".into(),
            },
        )
        .await
        .unwrap();

    assert_eq!(w.menus.counter(1, SALADE), 0);
    assert_eq!(w.menus.counter(1, POULET), 1);
    let stored = w.orders.orders.lock().unwrap()[0].clone();
    assert_eq!(stored.dish_id, POULET);
    assert_eq!(stored.special_notes, "sans sauce");
}

#[tokio::test]
async fn should_leave_counters_alone_when_dish_unchanged() {
    let w = world();
    let user = Uuid::now_v7();
    let place = PlaceOrderUseCase {
        orders: w.orders.clone(),
        menus: w.menus.clone(),
        dishes: w.dishes.clone(),
    };
    let order = place.execute(user, place_input(SALADE)).await.unwrap();

    let change = ChangeOrderDishUseCase {
        orders: w.orders.clone(),
        menus: w.menus.clone(),
        dishes: w.dishes.clone(),
    };
    change
        .execute(
            user,
            order.id,
            ChangeOrderDishInput {
                new_dish_id: SALADE,
                special_notes: "vinaigrette à part".into(),
            },
        )
        .await
        .unwrap();

    assert_eq!(w.menus.counter(1, SALADE), 1);
    let stored = w.orders.orders.lock().unwrap()[0].clone();
    assert_eq!(stored.special_notes, "vinaigrette à part");
}

#[tokio::test]
async fn should_reject_dish_change_once_order_is_ready() {
    let w = world();
    let user = Uuid::now_v7();
    let place = PlaceOrderUseCase {
        orders: w.orders.clone(),
        menus: w.menus.clone(),
        dishes: w.dishes.clone(),
    };
    let order = place.execute(user, place_input(SALADE)).await.unwrap();
    w.orders.orders.lock().unwrap()[0].status = OrderStatus::Ready;

    let change = ChangeOrderDishUseCase {
        orders: w.orders.clone(),
        menus: w.menus.clone(),
        dishes: w.dishes.clone(),
    };
    let result = change
        .execute(
            user,
            order.id,
            ChangeOrderDishInput {
                new_dish_id: POULET,
                special_notes: String::new(),
            },
        )
        .await;

    assert!(matches!(result, Err(CantineError::InvalidStatus)));
    assert_eq!(w.menus.counter(1, SALADE), 1);
    assert_eq!(w.menus.counter(1, POULET), 0);
}

#[tokio::test]
async fn should_cancel_once_and_ignore_second_cancel() {
    let w = world();
    let user = Uuid::now_v7();
    let place = PlaceOrderUseCase {
        orders: w.orders.clone(),
        menus: w.menus.clone(),
        dishes: w.dishes.clone(),
    };
    let order = place.execute(user, place_input(SALADE)).await.unwrap();
    assert_eq!(w.menus.counter(1, SALADE), 1);

    let cancel = CancelOrderUseCase {
        orders: w.orders.clone(),
        menus: w.menus.clone(),
    };
    cancel.execute(user, order.id).await.unwrap();
    assert_eq!(w.menus.counter(1, SALADE), 0);

    // Second cancel is a no-op, not a double decrement.
    cancel.execute(user, order.id).await.unwrap();
    assert_eq!(w.menus.counter(1, SALADE), 0);
}

#[tokio::test]
async fn should_reject_cancel_past_cutoff() {
    let w = world();
    let user = Uuid::now_v7();
    let place = PlaceOrderUseCase {
        orders: w.orders.clone(),
        menus: w.menus.clone(),
        dishes: w.dishes.clone(),
    };
    let order = place.execute(user, place_input(SALADE)).await.unwrap();

    w.menus.menus.lock().unwrap()[0].cutoff_at = Utc::now() - Duration::hours(1);

    let cancel = CancelOrderUseCase {
        orders: w.orders.clone(),
        menus: w.menus.clone(),
    };
    let result = cancel.execute(user, order.id).await;

    assert!(matches!(result, Err(CantineError::CutoffExpired)));
    assert_eq!(w.menus.counter(1, SALADE), 1);
}

#[tokio::test]
async fn should_not_let_user_cancel_someone_elses_order() {
    let w = world();
    let place = PlaceOrderUseCase {
        orders: w.orders.clone(),
        menus: w.menus.clone(),
        dishes: w.dishes.clone(),
    };
    let order = place
        .execute(Uuid::now_v7(), place_input(SALADE))
        .await
        .unwrap();

    let cancel = CancelOrderUseCase {
        orders: w.orders.clone(),
        menus: w.menus.clone(),
    };
    let result = cancel.execute(Uuid::now_v7(), order.id).await;
    assert!(matches!(result, Err(CantineError::OrderNotFound)));
}

#[tokio::test]
async fn should_advance_status_forward_with_skips() {
    let w = world();
    let place = PlaceOrderUseCase {
        orders: w.orders.clone(),
        menus: w.menus.clone(),
        dishes: w.dishes.clone(),
    };
    let order = place
        .execute(Uuid::now_v7(), place_input(SALADE))
        .await
        .unwrap();

    let staff = Uuid::now_v7();
    let advance = AdvanceOrderStatusUseCase {
        orders: w.orders.clone(),
    };
    advance
        .execute(staff, order.id, OrderStatus::Confirmed)
        .await
        .unwrap();
    // ready is skipped.
    advance
        .execute(staff, order.id, OrderStatus::Delivered)
        .await
        .unwrap();

    let stored = w.orders.orders.lock().unwrap()[0].clone();
    assert_eq!(stored.status, OrderStatus::Delivered);
}

#[tokio::test]
async fn should_reject_backward_status_transition() {
    let w = world();
    let place = PlaceOrderUseCase {
        orders: w.orders.clone(),
        menus: w.menus.clone(),
        dishes: w.dishes.clone(),
    };
    let order = place
        .execute(Uuid::now_v7(), place_input(SALADE))
        .await
        .unwrap();

    let staff = Uuid::now_v7();
    let advance = AdvanceOrderStatusUseCase {
        orders: w.orders.clone(),
    };
    advance
        .execute(staff, order.id, OrderStatus::Delivered)
        .await
        .unwrap();

    let result = advance.execute(staff, order.id, OrderStatus::Ready).await;
    assert!(matches!(result, Err(CantineError::InvalidTransition)));
}

#[tokio::test]
async fn should_decrement_counter_when_staff_cancels() {
    let w = world();
    let place = PlaceOrderUseCase {
        orders: w.orders.clone(),
        menus: w.menus.clone(),
        dishes: w.dishes.clone(),
    };
    let order = place
        .execute(Uuid::now_v7(), place_input(SALADE))
        .await
        .unwrap();
    assert_eq!(w.menus.counter(1, SALADE), 1);

    let advance = AdvanceOrderStatusUseCase {
        orders: w.orders.clone(),
    };
    advance
        .execute(Uuid::now_v7(), order.id, OrderStatus::Cancelled)
        .await
        .unwrap();

    assert_eq!(w.menus.counter(1, SALADE), 0);
    let stored = w.orders.orders.lock().unwrap()[0].clone();
    assert_eq!(stored.status, OrderStatus::Cancelled);
}

#[tokio::test]
async fn should_keep_counter_equal_to_live_orders() {
    // The counter must equal the number of live orders after any history.
    let w = world();
    let place = PlaceOrderUseCase {
        orders: w.orders.clone(),
        menus: w.menus.clone(),
        dishes: w.dishes.clone(),
    };
    let cancel = CancelOrderUseCase {
        orders: w.orders.clone(),
        menus: w.menus.clone(),
    };

    let users: Vec<Uuid> = (0..4).map(|_| Uuid::now_v7()).collect();
    let mut order_ids = Vec::new();
    for user in &users {
        let order = place.execute(*user, place_input(SALADE)).await.unwrap();
        order_ids.push(order.id);
    }
    cancel.execute(users[1], order_ids[1]).await.unwrap();
    cancel.execute(users[3], order_ids[3]).await.unwrap();
    // Duplicate cancel must not skew the count.
    cancel.execute(users[1], order_ids[1]).await.unwrap();

    let live = w
        .orders
        .orders
        .lock()
        .unwrap()
        .iter()
        .filter(|o| !o.is_deleted && o.status != OrderStatus::Cancelled && o.dish_id == SALADE)
        .count() as i32;
    assert_eq!(live, 2);
    assert_eq!(w.menus.counter(1, SALADE), live);
}

#[tokio::test]
async fn should_consolidate_day_orders_per_dish() {
    let w = world();
    let place = PlaceOrderUseCase {
        orders: w.orders.clone(),
        menus: w.menus.clone(),
        dishes: w.dishes.clone(),
    };
    let advance = AdvanceOrderStatusUseCase {
        orders: w.orders.clone(),
    };
    let staff = Uuid::now_v7();

    // Three confirmed salads (one with a note), one ready poulet, one left
    // pending (excluded from the kitchen view).
    for notes in ["", "sans croûtons", ""] {
        let user = Uuid::now_v7();
        let order = place
            .execute(
                user,
                PlaceOrderInput {
                    menu_id: 1,
                    dish_id: SALADE,
                    special_notes: notes.to_owned(),
                },
            )
            .await
            .unwrap();
        advance
            .execute(staff, order.id, OrderStatus::Confirmed)
            .await
            .unwrap();
    }
    let poulet_order = place
        .execute(Uuid::now_v7(), place_input(POULET))
        .await
        .unwrap();
    advance
        .execute(staff, poulet_order.id, OrderStatus::Ready)
        .await
        .unwrap();

    let uc = ConsolidateDayUseCase {
        orders: w.orders.clone(),
    };
    let rows = uc.execute(test_date(), Site::Danga).await.unwrap();

    assert_eq!(rows.len(), 2);
    // Sorted by dish name: Poulet Rôti before Salade César.
    assert_eq!(rows[0].dish.name, "Poulet Rôti");
    assert_eq!(rows[0].quantity, 1);
    assert_eq!(rows[0].ready, 1);
    assert_eq!(rows[1].dish.name, "Salade César");
    assert_eq!(rows[1].quantity, 3);
    assert_eq!(rows[1].confirmed, 3);
    assert_eq!(rows[1].special_notes, vec!["sans croûtons".to_owned()]);
}
