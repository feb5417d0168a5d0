use chrono::Utc;
use uuid::Uuid;

use cantine_domain::pagination::PageRequest;
use cantine_domain::user::{Department, Role, Site};

use crate::domain::repository::UserRepository;
use crate::domain::types::{User, UserFilter, validate_company_email};
use crate::error::CantineError;
use crate::usecase::token::hash_password;

/// Minimum accepted password length at registration.
const MIN_PASSWORD_LEN: usize = 8;

// ── Register ─────────────────────────────────────────────────────────────────

pub struct RegisterUserInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub site: Site,
    pub department: Department,
}

pub struct RegisterUserUseCase<U: UserRepository> {
    pub users: U,
    pub email_domain: String,
}

impl<U: UserRepository> RegisterUserUseCase<U> {
    pub async fn execute(&self, input: RegisterUserInput) -> Result<User, CantineError> {
        if input.first_name.trim().is_empty() || input.last_name.trim().is_empty() {
            return Err(CantineError::MissingData);
        }
        if !validate_company_email(&input.email, &self.email_domain) {
            return Err(CantineError::EmailDomainNotAllowed);
        }
        if input.password.len() < MIN_PASSWORD_LEN {
            return Err(CantineError::WeakPassword);
        }
        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(CantineError::EmailTaken);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            password_hash: hash_password(&input.password)?,
            role: Role::Employee,
            site: input.site,
            department: input.department,
            dark_theme: false,
            created_at: now,
            updated_at: now,
        };
        self.users.create(&user).await?;
        Ok(user)
    }
}

// ── Profile ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> GetUserUseCase<U> {
    pub async fn execute(&self, user_id: Uuid) -> Result<User, CantineError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(CantineError::UserNotFound)
    }
}

pub struct UpdateProfileInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub department: Option<Department>,
    pub site: Option<Site>,
}

pub struct UpdateProfileUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> UpdateProfileUseCase<U> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: UpdateProfileInput,
    ) -> Result<(), CantineError> {
        if input.first_name.is_none()
            && input.last_name.is_none()
            && input.department.is_none()
            && input.site.is_none()
        {
            return Err(CantineError::MissingData);
        }
        self.users
            .update_profile(
                user_id,
                input.first_name.as_deref(),
                input.last_name.as_deref(),
                input.department,
                input.site,
            )
            .await
    }
}

pub struct ToggleThemeUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> ToggleThemeUseCase<U> {
    /// Flip the dark-theme flag; returns the new value.
    pub async fn execute(&self, user_id: Uuid) -> Result<bool, CantineError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(CantineError::UserNotFound)?;
        let next = !user.dark_theme;
        self.users.set_dark_theme(user_id, next).await?;
        Ok(next)
    }
}

// ── Admin directory ──────────────────────────────────────────────────────────

pub struct ListUsersUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> ListUsersUseCase<U> {
    pub async fn execute(
        &self,
        filter: UserFilter,
        page: PageRequest,
    ) -> Result<Vec<User>, CantineError> {
        self.users.list(&filter, page).await
    }
}

pub struct UpdateUserAccessInput {
    pub role: Option<Role>,
    pub site: Option<Site>,
    pub department: Option<Department>,
}

pub struct UpdateUserAccessUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> UpdateUserAccessUseCase<U> {
    pub async fn execute(
        &self,
        actor: Uuid,
        user_id: Uuid,
        input: UpdateUserAccessInput,
    ) -> Result<(), CantineError> {
        if input.role.is_none() && input.site.is_none() && input.department.is_none() {
            return Err(CantineError::MissingData);
        }
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(CantineError::UserNotFound)?;
        self.users
            .update_access(user_id, input.role, input.site, input.department, actor)
            .await
    }
}

pub struct DeleteUserUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> DeleteUserUseCase<U> {
    pub async fn execute(&self, actor: Uuid, user_id: Uuid) -> Result<(), CantineError> {
        let deleted = self.users.soft_delete(user_id, actor).await?;
        if !deleted {
            return Err(CantineError::UserNotFound);
        }
        Ok(())
    }
}
