//! Pick'em Display Server
//!
//! Consumes league-domain events off the message bus into the display
//! store and serves the headline read/refresh API.

mod api;
mod config;
mod server;
mod shutdown;
mod state;
mod transport;

use clap::Parser;
use config::file::{BindingConfig, BoundEntity};
use config::{ConfigLoader, get_database_url};
use pickem_core::events::headline_refresh_channel;
use pickem_core::feeds::HttpFeedFetcher;
use pickem_core::ingest::Dispatcher;
use pickem_core::ingest::handlers::{
    DefaultPickHandler, LeagueHandler, MessageHandler, PickHandler, RankingHandler,
    UserTeamHandler, WeekHandler,
};
use pickem_core::processors::HeadlineImporter;
use pickem_core::repository::{
    PgDefaultPickRepository, PgHeadlineRepository, PgLeagueRepository, PgPickRepository,
    PgUserTeamRepository, PgWeekRepository,
};
use server::{build_router, run_server};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use state::AppState;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Pick'em Display - read-side ingestion and headline service
#[derive(Parser, Debug)]
#[command(name = "pickem-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "./pickem-config.toml")]
    config: PathBuf,

    /// Override the listen address (e.g., 0.0.0.0:7069)
    #[arg(short, long)]
    listen: Option<SocketAddr>,

    /// Run database migrations on startup
    #[arg(long, default_value = "false")]
    migrate: bool,
}

/// How long in-flight message handling may take to drain on shutdown.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let args = Args::parse();

    tracing::info!("Starting pickem-server v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config_loader = ConfigLoader::new(&args.config, args.listen);
    let config = config_loader.load().map_err(|e| {
        tracing::error!("Failed to load configuration: {}", e);
        e
    })?;

    let listen_addr = config.server.listen;
    tracing::info!("Configuration loaded from {:?}", args.config);

    // Get database URL from environment
    let database_url = get_database_url().map_err(|e| {
        tracing::error!("DATABASE_URL environment variable not set");
        e
    })?;

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .map_err(|e| {
            tracing::error!("Failed to connect to database: {}", e);
            e
        })?;
    tracing::info!("Database connection established");

    // Run migrations if requested
    if args.migrate {
        tracing::info!("Running database migrations...");
        sqlx::migrate!("../migrations")
            .run(&db_pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to run migrations: {}", e);
                e
            })?;
        tracing::info!("Migrations completed successfully");
    }

    // Shutdown flag watched by every background task
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

    // Headline importer: scheduled refreshes plus on-demand events
    let (refresh_tx, refresh_rx) = headline_refresh_channel();
    let importer = HeadlineImporter::new(
        PgLeagueRepository::new(db_pool.clone()),
        PgHeadlineRepository::new(db_pool.clone()),
        HttpFeedFetcher::new(),
        Duration::from_secs(config.feeds.refresh_interval_secs),
    );
    let importer_handle = tokio::spawn(importer.run(shutdown_rx.clone(), refresh_rx));

    // Message bus consumers feeding the dispatcher
    let dispatcher = Arc::new(build_dispatcher(&db_pool, &config.transport.bindings));
    let transport_handle = {
        let transport_config = config.transport.clone();
        let dispatcher = Arc::clone(&dispatcher);
        let shutdown_rx = shutdown_rx.clone();
        tokio::spawn(async move {
            if let Err(e) = transport::amqp::run(transport_config, dispatcher, shutdown_rx).await {
                tracing::error!("Message bus consumer failed: {}", e);
            }
        })
    };

    // Create application state
    let state = AppState::new(db_pool.clone(), refresh_tx, config.feeds.headline_limit);

    // Build the router
    let router = build_router(state);

    // Run the server
    tracing::info!("Starting HTTP server on {}", listen_addr);
    let result = run_server(router, listen_addr).await;

    // Stop background work, drain in-flight handling
    tracing::info!("Stopping background tasks...");
    let _ = shutdown_tx.send(true);
    let drain = async {
        if let Err(e) = importer_handle.await {
            tracing::error!("Importer task failed to join: {}", e);
        }
        if let Err(e) = transport_handle.await {
            tracing::error!("Transport task failed to join: {}", e);
        }
    };
    if tokio::time::timeout(SHUTDOWN_TIMEOUT, drain).await.is_err() {
        tracing::warn!(
            "Background tasks did not drain within {:?}, abandoning them",
            SHUTDOWN_TIMEOUT
        );
    }

    // Close database connections gracefully
    tracing::info!("Closing database connections...");
    db_pool.close().await;
    tracing::info!("Server shutdown complete");

    result.map_err(Into::into)
}

/// Bind every configured exchange to its entity handler.
fn build_dispatcher(pool: &PgPool, bindings: &[BindingConfig]) -> Dispatcher {
    let mut dispatcher = Dispatcher::new();
    for binding in bindings {
        let handler: Arc<dyn MessageHandler> = match binding.entity {
            BoundEntity::League => {
                Arc::new(LeagueHandler::new(PgLeagueRepository::new(pool.clone())))
            }
            BoundEntity::UserTeam => {
                Arc::new(UserTeamHandler::new(PgUserTeamRepository::new(pool.clone())))
            }
            BoundEntity::Week => Arc::new(WeekHandler::new(PgWeekRepository::new(pool.clone()))),
            BoundEntity::Pick => Arc::new(PickHandler::new(PgPickRepository::new(pool.clone()))),
            BoundEntity::DefaultPick => Arc::new(DefaultPickHandler::new(
                PgDefaultPickRepository::new(pool.clone()),
            )),
            BoundEntity::Ranking => Arc::new(RankingHandler),
        };
        dispatcher = dispatcher.register(binding.exchange.clone(), handler);
    }
    dispatcher
}

/// Initialize the tracing subscriber with environment-based filtering.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn,lapin=warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
