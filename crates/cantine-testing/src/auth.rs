//! Session helpers for integration tests.
//!
//! Protected endpoints read the `cantine_access_token` cookie and validate
//! its JWT. `SessionAuth` mints a token signed with the test secret and
//! returns it as a `Cookie` header, so tests need no login round-trip.

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;
use uuid::Uuid;

use cantine_auth_types::cookie::CANTINE_ACCESS_TOKEN;

/// JWT secret used by tests. Wire the same value into the app state under test.
pub const TEST_JWT_SECRET: &str = "cantine-test-jwt-secret-do-not-deploy";

#[derive(Serialize)]
struct TestClaims {
    sub: String,
    role: u8,
    exp: u64,
}

/// Configurable identity injected into test requests as a session cookie.
pub struct SessionAuth {
    pub user_id: Uuid,
    pub role: u8,
}

impl SessionAuth {
    pub fn new(user_id: Uuid, role: u8) -> Self {
        Self { user_id, role }
    }

    /// Mint an access token signed with [`TEST_JWT_SECRET`], valid for an hour.
    pub fn token(&self) -> String {
        let exp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs()
            + 3600;
        let claims = TestClaims {
            sub: self.user_id.to_string(),
            role: self.role,
            exp,
        };
        jsonwebtoken::encode(
            &jsonwebtoken::Header::default(),
            &claims,
            &jsonwebtoken::EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
        )
        .unwrap()
    }

    /// Return headers carrying the session cookie.
    pub fn headers(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(
            HeaderName::from_static("cookie"),
            HeaderValue::from_str(&format!("{CANTINE_ACCESS_TOKEN}={}", self.token())).unwrap(),
        );
        map
    }
}
