use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use cantine::domain::types::MenuDishSpec;
use cantine::error::CantineError;
use cantine::usecase::menu::{
    EnsureWeekUseCase, PublishMenuUseCase, SetMenuDishesUseCase, WeekMenusUseCase,
};
use cantine::usecase::order::{PlaceOrderInput, PlaceOrderUseCase};
use cantine::usecase::stats::MenuQuickStatsUseCase;
use cantine_domain::user::Site;

use crate::helpers::{MockDishRepo, MockMenuRepo, open_menu, test_dish, test_menu_dish, world};

fn empty_world() -> (MockDishRepo, MockMenuRepo) {
    let dishes = MockDishRepo::new(vec![test_dish(1, "Salade César")]);
    let menus = MockMenuRepo::new(vec![], vec![], &dishes);
    (dishes, menus)
}

#[tokio::test]
async fn should_bootstrap_ten_menus_for_the_week() {
    let (_dishes, menus) = empty_world();
    let uc = EnsureWeekUseCase {
        menus: menus.clone(),
    };

    // 2026-04-08 is a Wednesday; the week is 2026-04-06 through 2026-04-10.
    let today = NaiveDate::from_ymd_opt(2026, 4, 8).unwrap();
    let created = uc.execute(Uuid::now_v7(), today).await.unwrap();

    assert_eq!(created.len(), 10);
    let monday = NaiveDate::from_ymd_opt(2026, 4, 6).unwrap();
    let friday = NaiveDate::from_ymd_opt(2026, 4, 10).unwrap();
    for site in Site::ALL {
        for date in [monday, friday] {
            let menu = created
                .iter()
                .find(|m| m.date == date && m.site == site)
                .expect("menu created for every (date, site)");
            assert!(!menu.is_published);
            assert_eq!(menu.cutoff_at.date_naive(), date);
            assert_eq!(
                menu.cutoff_at.time(),
                NaiveTime::from_hms_opt(12, 0, 0).unwrap()
            );
        }
    }
}

#[tokio::test]
async fn should_be_idempotent_across_bootstrap_calls() {
    let (_dishes, menus) = empty_world();
    let uc = EnsureWeekUseCase {
        menus: menus.clone(),
    };
    let today = NaiveDate::from_ymd_opt(2026, 4, 8).unwrap();

    let first = uc.execute(Uuid::now_v7(), today).await.unwrap();
    let second = uc.execute(Uuid::now_v7(), today).await.unwrap();

    assert_eq!(first.len(), 10);
    assert_eq!(second.len(), 10);
    assert_eq!(menus.menus.lock().unwrap().len(), 10);
    let mut first_ids: Vec<i32> = first.iter().map(|m| m.id).collect();
    let mut second_ids: Vec<i32> = second.iter().map(|m| m.id).collect();
    first_ids.sort_unstable();
    second_ids.sort_unstable();
    assert_eq!(first_ids, second_ids);
}

#[tokio::test]
async fn should_show_only_published_menus_to_employees() {
    let (_dishes, menus) = empty_world();
    let ensure = EnsureWeekUseCase {
        menus: menus.clone(),
    };
    let today = NaiveDate::from_ymd_opt(2026, 4, 8).unwrap();
    let created = ensure.execute(Uuid::now_v7(), today).await.unwrap();

    let publish = PublishMenuUseCase {
        menus: menus.clone(),
    };
    publish
        .execute(Uuid::now_v7(), created[0].id, true)
        .await
        .unwrap();

    let week = WeekMenusUseCase {
        menus: menus.clone(),
    };
    let visible = week.execute(today).await.unwrap();
    assert_eq!(visible.len(), 1);
    assert_eq!(visible[0].menu.id, created[0].id);
}

#[tokio::test]
async fn should_fail_publishing_missing_menu() {
    let (_dishes, menus) = empty_world();
    let publish = PublishMenuUseCase {
        menus: menus.clone(),
    };
    let result = publish.execute(Uuid::now_v7(), 999, true).await;
    assert!(matches!(result, Err(CantineError::MenuNotFound)));
}

#[tokio::test]
async fn should_preserve_ordered_counter_when_replacing_dishes() {
    let w = world();
    // One live order on the salad so its counter is non-zero.
    let place = PlaceOrderUseCase {
        orders: w.orders.clone(),
        menus: w.menus.clone(),
        dishes: w.dishes.clone(),
    };
    place
        .execute(
            Uuid::now_v7(),
            PlaceOrderInput {
                menu_id: 1,
                dish_id: 1,
                special_notes: String::new(),
            },
        )
        .await
        .unwrap();
    assert_eq!(w.menus.counter(1, 1), 1);

    // Keep the salad with a new price, drop the poulet, add a new dish.
    w.dishes
        .dishes
        .lock()
        .unwrap()
        .push(test_dish(3, "Gratin Dauphinois"));
    let uc = SetMenuDishesUseCase {
        menus: w.menus.clone(),
        dishes: w.dishes.clone(),
    };
    uc.execute(
        Uuid::now_v7(),
        1,
        vec![
            MenuDishSpec {
                dish_id: 1,
                price_cents: 1050,
                max_quantity: 40,
                planned_quantity: 30,
            },
            MenuDishSpec {
                dish_id: 3,
                price_cents: 700,
                max_quantity: 20,
                planned_quantity: 10,
            },
        ],
    )
    .await
    .unwrap();

    let rows = w.menus.menu_dishes.lock().unwrap().clone();
    assert_eq!(rows.len(), 2);
    let salad = rows.iter().find(|md| md.dish_id == 1).unwrap();
    assert_eq!(salad.ordered_quantity, 1);
    assert_eq!(salad.price_cents, 1050);
    let gratin = rows.iter().find(|md| md.dish_id == 3).unwrap();
    assert_eq!(gratin.ordered_quantity, 0);
    assert!(!rows.iter().any(|md| md.dish_id == 2));
}

#[tokio::test]
async fn should_reject_inactive_dish_in_menu_composition() {
    let w = world();
    w.dishes.dishes.lock().unwrap()[1].is_active = false;
    let uc = SetMenuDishesUseCase {
        menus: w.menus.clone(),
        dishes: w.dishes.clone(),
    };
    let result = uc
        .execute(
            Uuid::now_v7(),
            1,
            vec![MenuDishSpec {
                dish_id: 2,
                price_cents: 900,
                max_quantity: 10,
                planned_quantity: 10,
            }],
        )
        .await;
    assert!(matches!(result, Err(CantineError::DishNotFound)));
}

#[tokio::test]
async fn should_count_pending_and_near_cutoff_menus() {
    let dishes = MockDishRepo::new(vec![]);
    let now = Utc::now();
    let mut published_soon = open_menu(1);
    published_soon.cutoff_at = now + Duration::hours(3);
    let mut published_far = open_menu(2);
    published_far.cutoff_at = now + Duration::hours(48);
    let mut unpublished = open_menu(3);
    unpublished.is_published = false;
    unpublished.date = now.date_naive() + Duration::days(1);

    let menus = MockMenuRepo::new(
        vec![published_soon, published_far, unpublished],
        vec![test_menu_dish(1, 1, 1)],
        &dishes,
    );
    let uc = MenuQuickStatsUseCase {
        menus: menus.clone(),
    };
    let stats = uc.execute(now).await.unwrap();

    assert_eq!(stats.menus_pending_publication, 1);
    assert_eq!(stats.menus_nearing_cutoff, 1);
}
