use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DishCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DishCategories::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DishCategories::Name).string().not_null())
                    .col(
                        ColumnDef::new(DishCategories::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(DishCategories::Color)
                            .string()
                            .not_null()
                            .default("#3B82F6"),
                    )
                    .col(
                        ColumnDef::new(DishCategories::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(DishCategories::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(DishCategories::IsUpdated)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(DishCategories::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(DishCategories::DeletedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(DishCategories::CreatedBy).uuid())
                    .col(ColumnDef::new(DishCategories::UpdatedBy).uuid())
                    .col(ColumnDef::new(DishCategories::DeletedBy).uuid())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DishCategories::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum DishCategories {
    Table,
    Id,
    Name,
    Description,
    Color,
    CreatedAt,
    UpdatedAt,
    IsUpdated,
    IsDeleted,
    DeletedAt,
    CreatedBy,
    UpdatedBy,
    DeletedBy,
}
