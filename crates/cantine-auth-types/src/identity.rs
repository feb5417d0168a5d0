//! Request identity extracted from the access-token cookie.

use axum::extract::{FromRef, FromRequestParts};
use axum_extra::extract::CookieJar;
use http::StatusCode;
use http::request::Parts;
use uuid::Uuid;

use crate::cookie::CANTINE_ACCESS_TOKEN;
use crate::token::validate_access_token;

/// JWT signing secret, obtained from app state via [`FromRef`].
#[derive(Clone)]
pub struct JwtSecret(pub String);

/// Authenticated caller, validated from the access-token cookie.
///
/// Returns 401 if the cookie is absent or its JWT fails validation.
/// Role enforcement (403) is done by handlers after extraction; `role` is
/// the `u8` wire value of [`cantine_domain::user::Role`].
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: Uuid,
    pub role: u8,
}

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
    JwtSecret: FromRef<S>,
{
    type Rejection = StatusCode;

    // axum-core 0.5 declares this as `fn -> impl Future + Send`; an `async fn`
    // here captures the `parts` lifetime and fails E0195. Read the header
    // synchronously, return a 'static async move block.
    fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let secret = JwtSecret::from_ref(state);
        let token = CookieJar::from_headers(&parts.headers)
            .get(CANTINE_ACCESS_TOKEN)
            .map(|c| c.value().to_owned());

        async move {
            let token = token.ok_or(StatusCode::UNAUTHORIZED)?;
            let info = validate_access_token(&token, &secret.0)
                .map_err(|_| StatusCode::UNAUTHORIZED)?;
            Ok(Self {
                user_id: info.user_id,
                role: info.role,
            })
        }
    }
}
