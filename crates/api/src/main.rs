//! Review Pulse API Server

use processor::MetricsStore;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

mod error;
mod routes;
mod state;

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("review_pulse=debug".parse()?)
                .add_directive("api=debug".parse()?),
        )
        .init();

    info!("📊 Starting Review Pulse API");

    let config = common::Config::from_env();

    // AI metrics are optional; without a database every lookup is empty
    let store = match &config.database_url {
        Some(url) => {
            let pool = db::create_pool(url).await?;
            db::run_migrations(&pool).await?;
            MetricsStore::Postgres(pool)
        }
        None => {
            info!("🗄️ DATABASE_URL not set, AI metrics disabled");
            MetricsStore::Disabled
        }
    };

    info!(
        "Using {} (review concurrency {})",
        config.github_api_url, config.review_concurrency
    );

    let addr = format!("{}:{}", config.host, config.port);
    let state = Arc::new(AppState::new(config, store));

    let app = routes::router(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    info!("🚀 Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
