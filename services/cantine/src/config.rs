/// Cantine service configuration loaded from environment variables.
#[derive(Debug)]
pub struct CantineConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// TCP port for the HTTP server (default 3100). Env var: `CANTINE_PORT`.
    pub port: u16,
    /// HS256 secret for access/refresh tokens. Env var: `JWT_SECRET`.
    pub jwt_secret: String,
    /// Domain attribute for session cookies. Env var: `COOKIE_DOMAIN`.
    pub cookie_domain: String,
    /// Company email domain required at registration (default
    /// "sah-analytics.com"). Env var: `EMAIL_DOMAIN`.
    pub email_domain: String,
}

impl CantineConfig {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").expect("DATABASE_URL"),
            port: std::env::var("CANTINE_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3100),
            jwt_secret: std::env::var("JWT_SECRET").expect("JWT_SECRET"),
            cookie_domain: std::env::var("COOKIE_DOMAIN").expect("COOKIE_DOMAIN"),
            email_domain: std::env::var("EMAIL_DOMAIN")
                .unwrap_or_else(|_| "sah-analytics.com".to_owned()),
        }
    }
}
