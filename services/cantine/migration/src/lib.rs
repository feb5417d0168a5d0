use sea_orm_migration::prelude::*;

mod m20260401_000001_create_users;
mod m20260401_000002_create_dish_categories;
mod m20260401_000003_create_dishes;
mod m20260401_000004_create_menus;
mod m20260401_000005_create_menu_dishes;
mod m20260401_000006_create_orders;
mod m20260401_000007_create_reviews;
mod m20260401_000008_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260401_000001_create_users::Migration),
            Box::new(m20260401_000002_create_dish_categories::Migration),
            Box::new(m20260401_000003_create_dishes::Migration),
            Box::new(m20260401_000004_create_menus::Migration),
            Box::new(m20260401_000005_create_menu_dishes::Migration),
            Box::new(m20260401_000006_create_orders::Migration),
            Box::new(m20260401_000007_create_reviews::Migration),
            Box::new(m20260401_000008_add_indexes::Migration),
        ]
    }
}
