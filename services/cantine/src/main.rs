use sea_orm::Database;
use tracing::info;

use cantine::config::CantineConfig;
use cantine::router::build_router;
use cantine::state::AppState;
use cantine_core::tracing::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = CantineConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let state = AppState {
        db,
        jwt_secret: config.jwt_secret,
        cookie_domain: config.cookie_domain,
        email_domain: config.email_domain,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("cantine service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
