use tracing::{info, warn};

mod accounts;
mod app;
mod config;
mod error;
mod ids;
mod state;

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "accounts_api=debug,axum=info,tower_http=info".to_string());
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

    let app_state = AppState::init().await?;

    // Run migrations if present
    if let Err(e) = sqlx::migrate!("./migrations").run(&app_state.db).await {
        warn!(error = %e, "migrations folder not found or migration failed; continuing");
    }

    match accounts::repo::connection_info(&app_state.db).await {
        Ok((dbname, user, version)) => {
            let version = version.split(',').next().unwrap_or_default();
            info!(%dbname, %user, %version, "database connection established");
        }
        Err(e) => warn!(error = %e, "database connection check failed"),
    }

    let app = app::build_app(app_state);
    app::serve(app).await
}
