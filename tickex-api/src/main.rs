use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tickex_api::{app, state::AppState, token::TokenService};
use tickex_core::accounts::AccountService;
use tickex_core::tickets::TicketService;
use tickex_store::ticket_repo::PostgresTicketRepository;
use tickex_store::user_repo::PostgresUserRepository;
use tickex_store::DbClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tickex_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = tickex_store::app_config::Config::load().context("Failed to load config")?;
    tracing::info!("Starting Tickex API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url)
        .await
        .context("Failed to connect to database")?;
    db.migrate().await.context("Failed to run migrations")?;

    let state = AppState {
        accounts: Arc::new(AccountService::new(Arc::new(PostgresUserRepository::new(
            db.pool.clone(),
        )))),
        tickets: Arc::new(TicketService::new(Arc::new(PostgresTicketRepository::new(
            db.pool.clone(),
        )))),
        auth: TokenService::new(
            config.auth.jwt_secret.clone(),
            config.auth.jwt_expiration_seconds,
            config
                .auth
                .jwt_algorithm
                .parse()
                .context("Unsupported JWT algorithm in config")?,
        ),
    };

    let app = app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind listener")?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
