use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Cantine service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum CantineError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("invalid refresh token")]
    InvalidRefreshToken,
    #[error("forbidden")]
    Forbidden,
    #[error("user not found")]
    UserNotFound,
    #[error("category not found")]
    CategoryNotFound,
    #[error("dish not found")]
    DishNotFound,
    #[error("menu not found")]
    MenuNotFound,
    #[error("order not found")]
    OrderNotFound,
    #[error("review not found")]
    ReviewNotFound,
    #[error("email already registered")]
    EmailTaken,
    #[error("email domain not allowed")]
    EmailDomainNotAllowed,
    #[error("password too weak")]
    WeakPassword,
    #[error("ordering period for this menu is over")]
    CutoffExpired,
    #[error("an order already exists for this menu")]
    DuplicateOrder,
    #[error("order status does not allow this change")]
    InvalidStatus,
    #[error("status transition not allowed")]
    InvalidTransition,
    #[error("dish was never received by this user")]
    NotEligible,
    #[error("rating must be between 1 and 5")]
    InvalidRating,
    #[error("missing data")]
    MissingData,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl CantineError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidRefreshToken => "INVALID_REFRESH_TOKEN",
            Self::Forbidden => "FORBIDDEN",
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::CategoryNotFound => "CATEGORY_NOT_FOUND",
            Self::DishNotFound => "DISH_NOT_FOUND",
            Self::MenuNotFound => "MENU_NOT_FOUND",
            Self::OrderNotFound => "ORDER_NOT_FOUND",
            Self::ReviewNotFound => "REVIEW_NOT_FOUND",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::EmailDomainNotAllowed => "EMAIL_DOMAIN_NOT_ALLOWED",
            Self::WeakPassword => "WEAK_PASSWORD",
            Self::CutoffExpired => "CUTOFF_EXPIRED",
            Self::DuplicateOrder => "DUPLICATE_ORDER",
            Self::InvalidStatus => "INVALID_STATUS",
            Self::InvalidTransition => "INVALID_TRANSITION",
            Self::NotEligible => "NOT_ELIGIBLE",
            Self::InvalidRating => "INVALID_RATING",
            Self::MissingData => "MISSING_DATA",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for CantineError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidCredentials | Self::InvalidRefreshToken => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::UserNotFound
            | Self::CategoryNotFound
            | Self::DishNotFound
            | Self::MenuNotFound
            | Self::OrderNotFound
            | Self::ReviewNotFound => StatusCode::NOT_FOUND,
            Self::EmailTaken
            | Self::CutoffExpired
            | Self::DuplicateOrder
            | Self::InvalidStatus
            | Self::InvalidTransition
            | Self::NotEligible => StatusCode::CONFLICT,
            Self::EmailDomainNotAllowed
            | Self::WeakPassword
            | Self::InvalidRating
            | Self::MissingData => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Log 500s only — TraceLayer already records method/uri/status for all
        // requests; 4xx are expected client errors.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
