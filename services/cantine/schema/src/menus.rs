use sea_orm::entity::prelude::*;

/// Menu offered at one site on one work day. Unique per
/// (date, site, weekday); `cutoff_at` closes ordering.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "menus")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub date: chrono::NaiveDate,
    pub weekday: i16,
    pub site: i16,
    pub title: String,
    pub description: String,
    pub is_published: bool,
    pub cutoff_at: chrono::DateTime<chrono::Utc>,
    pub max_orders: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub is_updated: bool,
    pub is_deleted: bool,
    pub deleted_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_by: Option<Uuid>,
    pub updated_by: Option<Uuid>,
    pub deleted_by: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::menu_dishes::Entity")]
    MenuDishes,
    #[sea_orm(has_many = "super::orders::Entity")]
    Orders,
}

impl Related<super::menu_dishes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MenuDishes.def()
    }
}

impl Related<super::orders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Orders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
