use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MenuDishes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MenuDishes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(MenuDishes::MenuId).integer().not_null())
                    .col(ColumnDef::new(MenuDishes::DishId).integer().not_null())
                    .col(
                        ColumnDef::new(MenuDishes::PriceCents)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MenuDishes::MaxQuantity)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MenuDishes::PlannedQuantity)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(MenuDishes::OrderedQuantity)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(MenuDishes::Table, MenuDishes::MenuId)
                            .to(Menus::Table, Menus::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(MenuDishes::Table, MenuDishes::DishId)
                            .to(Dishes::Table, Dishes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One row per dish per menu; the ordered-quantity counter depends on it.
        manager
            .create_index(
                Index::create()
                    .table(MenuDishes::Table)
                    .col(MenuDishes::MenuId)
                    .col(MenuDishes::DishId)
                    .name("idx_menu_dishes_menu_id_dish_id")
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MenuDishes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum MenuDishes {
    Table,
    Id,
    MenuId,
    DishId,
    PriceCents,
    MaxQuantity,
    PlannedQuantity,
    OrderedQuantity,
}

#[derive(Iden)]
enum Menus {
    Table,
    Id,
}

#[derive(Iden)]
enum Dishes {
    Table,
    Id,
}
