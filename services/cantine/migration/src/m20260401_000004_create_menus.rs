use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Menus::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Menus::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Menus::Date).date().not_null())
                    .col(ColumnDef::new(Menus::Weekday).small_integer().not_null())
                    .col(ColumnDef::new(Menus::Site).small_integer().not_null())
                    .col(ColumnDef::new(Menus::Title).string().not_null().default(""))
                    .col(
                        ColumnDef::new(Menus::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Menus::IsPublished)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Menus::CutoffAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Menus::MaxOrders)
                            .integer()
                            .not_null()
                            .default(100),
                    )
                    .col(
                        ColumnDef::new(Menus::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Menus::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Menus::IsUpdated)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Menus::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Menus::DeletedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Menus::CreatedBy).uuid())
                    .col(ColumnDef::new(Menus::UpdatedBy).uuid())
                    .col(ColumnDef::new(Menus::DeletedBy).uuid())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Menus::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Menus {
    Table,
    Id,
    Date,
    Weekday,
    Site,
    Title,
    Description,
    IsPublished,
    CutoffAt,
    MaxOrders,
    CreatedAt,
    UpdatedAt,
    IsUpdated,
    IsDeleted,
    DeletedAt,
    CreatedBy,
    UpdatedBy,
    DeletedBy,
}
