use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cantine_auth_types::identity::Identity;
use cantine_domain::pagination::PageRequest;
use cantine_domain::user::{Department, Role, Site};

use crate::domain::types::{User, UserFilter};
use crate::error::CantineError;
use crate::handlers::require_role;
use crate::state::AppState;
use crate::usecase::user::{
    DeleteUserUseCase, GetUserUseCase, ListUsersUseCase, RegisterUserInput, RegisterUserUseCase,
    ToggleThemeUseCase, UpdateProfileInput, UpdateProfileUseCase, UpdateUserAccessInput,
    UpdateUserAccessUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub site: Site,
    pub department: Department,
    pub dark_theme: bool,
    #[serde(serialize_with = "cantine_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            role: user.role,
            site: user.site,
            department: user.department,
            dark_theme: user.dark_theme,
            created_at: user.created_at,
        }
    }
}

// ── POST /users (register) ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub site: Site,
    pub department: Department,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), CantineError> {
    let usecase = RegisterUserUseCase {
        users: state.user_repo(),
        email_domain: state.email_domain.clone(),
    };
    let user = usecase
        .execute(RegisterUserInput {
            first_name: body.first_name,
            last_name: body.last_name,
            email: body.email,
            password: body.password,
            site: body.site,
            department: body.department,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

// ── GET /users/@me ───────────────────────────────────────────────────────────

pub async fn get_me(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, CantineError> {
    let usecase = GetUserUseCase {
        users: state.user_repo(),
    };
    let user = usecase.execute(identity.user_id).await?;
    Ok(Json(user.into()))
}

// ── PATCH /users/@me ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateMeRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub department: Option<Department>,
    pub site: Option<Site>,
}

pub async fn update_me(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<UpdateMeRequest>,
) -> Result<StatusCode, CantineError> {
    let usecase = UpdateProfileUseCase {
        users: state.user_repo(),
    };
    usecase
        .execute(
            identity.user_id,
            UpdateProfileInput {
                first_name: body.first_name,
                last_name: body.last_name,
                department: body.department,
                site: body.site,
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /users/@me/theme ────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ThemeResponse {
    pub dark_theme: bool,
}

pub async fn toggle_theme(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<ThemeResponse>, CantineError> {
    let usecase = ToggleThemeUseCase {
        users: state.user_repo(),
    };
    let dark_theme = usecase.execute(identity.user_id).await?;
    Ok(Json(ThemeResponse { dark_theme }))
}

// ── GET /users (admin directory) ─────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct UserListQuery {
    pub q: Option<String>,
    pub role: Option<Role>,
    pub site: Option<Site>,
    pub department: Option<Department>,
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

pub async fn list_users(
    identity: Identity,
    State(state): State<AppState>,
    axum::extract::RawQuery(raw_query): axum::extract::RawQuery,
) -> Result<Json<Vec<UserResponse>>, CantineError> {
    require_role(&identity, &[Role::Admin])?;

    let query: UserListQuery = raw_query
        .as_deref()
        .map(serde_qs::from_str)
        .transpose()
        .map_err(|_| CantineError::MissingData)?
        .unwrap_or_default();

    let page = PageRequest {
        per_page: query.per_page.unwrap_or(25),
        page: query.page.unwrap_or(1),
    };
    let filter = UserFilter {
        query: query.q,
        role: query.role,
        site: query.site,
        department: query.department,
    };

    let usecase = ListUsersUseCase {
        users: state.user_repo(),
    };
    let users = usecase.execute(filter, page).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

// ── PATCH /users/{id} (admin) ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateUserAccessRequest {
    pub role: Option<Role>,
    pub site: Option<Site>,
    pub department: Option<Department>,
}

pub async fn update_user_access(
    identity: Identity,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(body): Json<UpdateUserAccessRequest>,
) -> Result<StatusCode, CantineError> {
    require_role(&identity, &[Role::Admin])?;

    let usecase = UpdateUserAccessUseCase {
        users: state.user_repo(),
    };
    usecase
        .execute(
            identity.user_id,
            user_id,
            UpdateUserAccessInput {
                role: body.role,
                site: body.site,
                department: body.department,
            },
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── DELETE /users/{id} (admin) ───────────────────────────────────────────────

pub async fn delete_user(
    identity: Identity,
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<StatusCode, CantineError> {
    require_role(&identity, &[Role::Admin])?;

    let usecase = DeleteUserUseCase {
        users: state.user_repo(),
    };
    usecase.execute(identity.user_id, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
