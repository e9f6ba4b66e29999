use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

use rider_ledger_rs::{
    config::Config,
    db::init_pool,
    health::health,
    notify::{FcmSender, NoopSender, NotificationSender},
    routes::auth::login,
    routes::riders::{create_rider, find_rider, update_profile},
    routes::sheets::{
        approve_sheet, daily_status_report, get_daily_sheet, pending_sheets, rider_history,
        submit_daily_sheet,
    },
    routes::wallet::{deduct, get_wallet, negative_wallets, recharge, refund_rider, withdraw},
    routes::AppState,
};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file (if present)
    dotenvy::dotenv().ok();

    // Initialize tracing/logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    tracing::info!("Starting rider ledger service...");

    // Load configuration from environment
    let config = Config::from_env()
        .expect("Failed to load configuration from environment");

    tracing::info!(
        "Configuration loaded: host={}, port={}, treasury_user_id={}",
        config.host,
        config.port,
        config.treasury_user_id
    );

    // Database connection
    tracing::info!("Connecting to database...");
    let pool = init_pool(&config.database_url)
        .await
        .expect("Failed to connect to database");

    // Run migrations
    tracing::info!("Running migrations...");
    sqlx::migrate!("./db/migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    // Push sender: FCM when a server key is configured, no-op otherwise
    let notifier: Arc<dyn NotificationSender> = match config.fcm_server_key.clone() {
        Some(key) => {
            tracing::info!("Push delivery via FCM");
            Arc::new(FcmSender::new(config.fcm_endpoint.clone(), key))
        }
        None => {
            tracing::info!("No FCM key configured; push delivery disabled");
            Arc::new(NoopSender)
        }
    };

    let state = Arc::new(AppState {
        pool,
        treasury_user_id: config.treasury_user_id,
        notifier,
    });

    // Build the application router
    let app = Router::new()
        .route("/api/health", get(health))
        .route("/api/login", post(login))
        .route("/api/create_rider", post(create_rider))
        .route("/api/riders/profile", post(update_profile))
        .route("/api/find-rider", post(find_rider))
        .route("/api/wallet/{user_id}", get(get_wallet))
        .route("/api/negative-wallets", get(negative_wallets))
        .route("/api/recharge", post(recharge))
        .route("/api/deduct", post(deduct))
        .route("/api/withdraw", post(withdraw))
        .route("/api/refund-rider", post(refund_rider))
        .route("/api/submit-daily-sheet", post(submit_daily_sheet))
        .route("/api/get-daily-sheet", get(get_daily_sheet))
        .route("/api/rider-history/{rider_id}", get(rider_history))
        .route("/api/pending-sheets", get(pending_sheets))
        .route("/api/approve-sheet", post(approve_sheet))
        .route("/api/daily-status-report", get(daily_status_report))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any),
        );

    // Bind to the configured address
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Rider ledger service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind address");

    // Start the server
    axum::serve(listener, app)
        .await
        .expect("Server failed to start");
}
