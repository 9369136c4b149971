use sqlx::postgres::PgPoolOptions;
use std::error::Error;
use tourney::{router, sport::seed_default_sports, AppConfig, AppState};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tourney=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    info!(bind_addr = %config.bind_addr, "Starting tournament server");

    let app_state = match &config.database_url {
        Some(database_url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .connect(database_url)
                .await?;
            info!(max_connections = config.db_max_connections, "Connected to PostgreSQL");

            if config.run_migrations {
                sqlx::migrate!("./migrations").run(&pool).await?;
                info!("Database migrations applied");
            }

            AppState::postgres(pool)
        }
        None => {
            warn!("DATABASE_URL not set, using in-memory repositories");
            AppState::in_memory()
        }
    };

    if config.seed_sports {
        seed_default_sports(app_state.sport_repository.as_ref()).await?;
    }

    let mut app = router(app_state);
    if config.cors_allow_any_origin {
        app = app.layer(CorsLayer::permissive());
    }

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Server running on http://{}", config.bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
