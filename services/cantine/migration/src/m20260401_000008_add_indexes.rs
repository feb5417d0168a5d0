use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Partial unique indexes: uniqueness holds among non-deleted rows
        // only, so a soft-deleted row never blocks re-creation. sea-query's
        // index builder has no WHERE clause, hence raw SQL.
        let conn = manager.get_connection();
        conn.execute_unprepared(
            "CREATE UNIQUE INDEX idx_users_email_active \
             ON users (email) WHERE NOT is_deleted",
        )
        .await?;
        conn.execute_unprepared(
            "CREATE UNIQUE INDEX idx_orders_user_id_menu_id_active \
             ON orders (user_id, menu_id) WHERE NOT is_deleted",
        )
        .await?;
        conn.execute_unprepared(
            "CREATE UNIQUE INDEX idx_menus_date_site_weekday_active \
             ON menus (date, site, weekday) WHERE NOT is_deleted",
        )
        .await?;
        conn.execute_unprepared(
            "CREATE UNIQUE INDEX idx_reviews_user_id_order_id_active \
             ON reviews (user_id, order_id) WHERE NOT is_deleted",
        )
        .await?;

        manager
            .create_index(
                Index::create()
                    .table(Orders::Table)
                    .col(Orders::MenuId)
                    .col(Orders::DishId)
                    .name("idx_orders_menu_id_dish_id")
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .table(Reviews::Table)
                    .col(Reviews::DishId)
                    .name("idx_reviews_dish_id")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_reviews_dish_id").to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_orders_menu_id_dish_id").to_owned())
            .await?;
        let conn = manager.get_connection();
        conn.execute_unprepared("DROP INDEX idx_reviews_user_id_order_id_active")
            .await?;
        conn.execute_unprepared("DROP INDEX idx_menus_date_site_weekday_active")
            .await?;
        conn.execute_unprepared("DROP INDEX idx_orders_user_id_menu_id_active")
            .await?;
        conn.execute_unprepared("DROP INDEX idx_users_email_active")
            .await?;
        Ok(())
    }
}

#[derive(Iden)]
enum Orders {
    Table,
    MenuId,
    DishId,
}

#[derive(Iden)]
enum Reviews {
    Table,
    DishId,
}
