use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Dishes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Dishes::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Dishes::Name).string().not_null())
                    .col(
                        ColumnDef::new(Dishes::Description)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Dishes::CategoryId).integer())
                    .col(
                        ColumnDef::new(Dishes::Allergens)
                            .text()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Dishes::PriceCents)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Dishes::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Dishes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Dishes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Dishes::IsUpdated)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Dishes::IsDeleted)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Dishes::DeletedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Dishes::CreatedBy).uuid())
                    .col(ColumnDef::new(Dishes::UpdatedBy).uuid())
                    .col(ColumnDef::new(Dishes::DeletedBy).uuid())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Dishes::Table, Dishes::CategoryId)
                            .to(DishCategories::Table, DishCategories::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Dishes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Dishes {
    Table,
    Id,
    Name,
    Description,
    CategoryId,
    Allergens,
    PriceCents,
    IsActive,
    CreatedAt,
    UpdatedAt,
    IsUpdated,
    IsDeleted,
    DeletedAt,
    CreatedBy,
    UpdatedBy,
    DeletedBy,
}

#[derive(Iden)]
enum DishCategories {
    Table,
    Id,
}
