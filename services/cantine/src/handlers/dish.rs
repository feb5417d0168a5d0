use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use cantine_auth_types::identity::Identity;
use cantine_domain::pagination::PageRequest;
use cantine_domain::user::Role;

use crate::domain::types::{Dish, DishCategory, DishFilter, NewDish};
use crate::error::CantineError;
use crate::handlers::require_role;
use crate::state::AppState;
use crate::usecase::dish::{
    CategoryInput, CreateCategoryUseCase, CreateDishUseCase, DeleteCategoryUseCase,
    DeleteDishUseCase, GetDishUseCase, ListCategoriesUseCase, ListDishesUseCase,
    ToggleDishActiveUseCase, UpdateCategoryUseCase, UpdateDishUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct CategoryResponse {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub color: String,
}

impl From<DishCategory> for CategoryResponse {
    fn from(category: DishCategory) -> Self {
        CategoryResponse {
            id: category.id,
            name: category.name,
            description: category.description,
            color: category.color,
        }
    }
}

#[derive(Serialize)]
pub struct DishResponse {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub category_id: Option<i32>,
    pub allergens: String,
    pub price_cents: i32,
    pub is_active: bool,
}

impl From<Dish> for DishResponse {
    fn from(dish: Dish) -> Self {
        DishResponse {
            id: dish.id,
            name: dish.name,
            description: dish.description,
            category_id: dish.category_id,
            allergens: dish.allergens,
            price_cents: dish.price_cents,
            is_active: dish.is_active,
        }
    }
}

// ── Categories ───────────────────────────────────────────────────────────────

pub async fn list_categories(
    _identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryResponse>>, CantineError> {
    let usecase = ListCategoriesUseCase {
        categories: state.category_repo(),
    };
    let categories = usecase.execute().await?;
    Ok(Json(
        categories.into_iter().map(CategoryResponse::from).collect(),
    ))
}

#[derive(Deserialize)]
pub struct CategoryRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_category_color")]
    pub color: String,
}

fn default_category_color() -> String {
    "#3B82F6".to_owned()
}

pub async fn create_category(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<CategoryRequest>,
) -> Result<(StatusCode, Json<CategoryResponse>), CantineError> {
    require_role(&identity, &[Role::Admin])?;
    let usecase = CreateCategoryUseCase {
        categories: state.category_repo(),
    };
    let category = usecase
        .execute(
            identity.user_id,
            CategoryInput {
                name: body.name,
                description: body.description,
                color: body.color,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(category.into())))
}

pub async fn update_category(
    identity: Identity,
    State(state): State<AppState>,
    Path(category_id): Path<i32>,
    Json(body): Json<CategoryRequest>,
) -> Result<StatusCode, CantineError> {
    require_role(&identity, &[Role::Admin])?;
    let usecase = UpdateCategoryUseCase {
        categories: state.category_repo(),
    };
    usecase
        .execute(
            identity.user_id,
            category_id,
            CategoryInput {
                name: body.name,
                description: body.description,
                color: body.color,
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_category(
    identity: Identity,
    State(state): State<AppState>,
    Path(category_id): Path<i32>,
) -> Result<StatusCode, CantineError> {
    require_role(&identity, &[Role::Admin])?;
    let usecase = DeleteCategoryUseCase {
        categories: state.category_repo(),
    };
    usecase.execute(identity.user_id, category_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── Dishes ───────────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct DishListQuery {
    pub category: Option<i32>,
    pub q: Option<String>,
    #[serde(default)]
    pub include_inactive: bool,
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

pub async fn list_dishes(
    identity: Identity,
    State(state): State<AppState>,
    axum::extract::RawQuery(raw_query): axum::extract::RawQuery,
) -> Result<Json<Vec<DishResponse>>, CantineError> {
    let query: DishListQuery = raw_query
        .as_deref()
        .map(serde_qs::from_str)
        .transpose()
        .map_err(|_| CantineError::MissingData)?
        .unwrap_or_default();

    // Inactive dishes are a management view.
    if query.include_inactive {
        require_role(&identity, &[Role::Admin, Role::Caterer])?;
    }

    let page = PageRequest {
        per_page: query.per_page.unwrap_or(25),
        page: query.page.unwrap_or(1),
    };
    let filter = DishFilter {
        category_id: query.category,
        query: query.q,
        include_inactive: query.include_inactive,
    };

    let usecase = ListDishesUseCase {
        dishes: state.dish_repo(),
    };
    let dishes = usecase.execute(filter, page).await?;
    Ok(Json(dishes.into_iter().map(DishResponse::from).collect()))
}

pub async fn get_dish(
    _identity: Identity,
    State(state): State<AppState>,
    Path(dish_id): Path<i32>,
) -> Result<Json<DishResponse>, CantineError> {
    let usecase = GetDishUseCase {
        dishes: state.dish_repo(),
    };
    let dish = usecase.execute(dish_id).await?;
    Ok(Json(dish.into()))
}

#[derive(Deserialize)]
pub struct DishRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category_id: Option<i32>,
    #[serde(default)]
    pub allergens: String,
    #[serde(default)]
    pub price_cents: i32,
}

impl From<DishRequest> for NewDish {
    fn from(body: DishRequest) -> Self {
        NewDish {
            name: body.name,
            description: body.description,
            category_id: body.category_id,
            allergens: body.allergens,
            price_cents: body.price_cents,
        }
    }
}

pub async fn create_dish(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<DishRequest>,
) -> Result<(StatusCode, Json<DishResponse>), CantineError> {
    require_role(&identity, &[Role::Admin])?;
    let usecase = CreateDishUseCase {
        dishes: state.dish_repo(),
        categories: state.category_repo(),
    };
    let dish = usecase.execute(identity.user_id, body.into()).await?;
    Ok((StatusCode::CREATED, Json(dish.into())))
}

pub async fn update_dish(
    identity: Identity,
    State(state): State<AppState>,
    Path(dish_id): Path<i32>,
    Json(body): Json<DishRequest>,
) -> Result<StatusCode, CantineError> {
    require_role(&identity, &[Role::Admin])?;
    let usecase = UpdateDishUseCase {
        dishes: state.dish_repo(),
        categories: state.category_repo(),
    };
    usecase
        .execute(identity.user_id, dish_id, body.into())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Serialize)]
pub struct DishActiveResponse {
    pub is_active: bool,
}

pub async fn toggle_dish_active(
    identity: Identity,
    State(state): State<AppState>,
    Path(dish_id): Path<i32>,
) -> Result<Json<DishActiveResponse>, CantineError> {
    require_role(&identity, &[Role::Admin])?;
    let usecase = ToggleDishActiveUseCase {
        dishes: state.dish_repo(),
    };
    let is_active = usecase.execute(identity.user_id, dish_id).await?;
    Ok(Json(DishActiveResponse { is_active }))
}

pub async fn delete_dish(
    identity: Identity,
    State(state): State<AppState>,
    Path(dish_id): Path<i32>,
) -> Result<StatusCode, CantineError> {
    require_role(&identity, &[Role::Admin])?;
    let usecase = DeleteDishUseCase {
        dishes: state.dish_repo(),
    };
    usecase.execute(identity.user_id, dish_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
