mod app;
mod auth;
mod catalog;
mod chat;
mod config;
mod error;
mod nutrition;
mod state;
mod workouts;

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "fittrack=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let state = AppState::init().await?;

    sqlx::migrate!("./migrations").run(&state.db).await?;

    // Idempotent: promotes or creates the admin account only when the env
    // vars are present, and never downgrades an existing role.
    auth::seed::ensure_admin(&state.db).await?;

    let app = app::build_app(state);
    app::serve(app).await
}
