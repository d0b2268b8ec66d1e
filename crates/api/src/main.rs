use std::net::SocketAddr;
use std::sync::Arc;

use hrms_api::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use hrms_api::config::{LogFormat, ServerConfig};
use hrms_api::router::build_app_router;
use hrms_api::state::AppState;
use hrms_core::roles::ROLE_ADMIN;
use hrms_db::models::user::CreateUser;
use hrms_db::repositories::UserRepo;
use hrms_db::DbPool;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = ServerConfig::from_env().expect("Invalid server configuration");

    // --- Tracing ---
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "hrms_api=debug,tower_http=debug".into());
    match config.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
    }

    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");
    if config.jwt.secret.is_none() {
        tracing::warn!("JWT_SECRET is not set; authenticated endpoints will answer 500");
    }

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = hrms_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    hrms_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    hrms_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    bootstrap_admin(&pool).await;

    // --- Uploads ---
    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .expect("Failed to create upload directory");
    tracing::info!(upload_dir = %config.upload_dir.display(), "Upload directory ready");

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Graceful shutdown complete");
}

/// Create the first admin account from `ADMIN_USERNAME` / `ADMIN_PASSWORD`
/// (plus optional `ADMIN_EMAIL`) when both are set and the user does not
/// exist yet.
async fn bootstrap_admin(pool: &DbPool) {
    let (Ok(username), Ok(password)) = (
        std::env::var("ADMIN_USERNAME"),
        std::env::var("ADMIN_PASSWORD"),
    ) else {
        return;
    };

    match UserRepo::find_by_username(pool, &username).await {
        Ok(Some(_)) => {
            tracing::debug!(%username, "Bootstrap admin already exists");
            return;
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!(error = %e, "Failed to look up bootstrap admin");
            return;
        }
    }

    if let Err(msg) = validate_password_strength(&password, MIN_PASSWORD_LENGTH) {
        tracing::error!(%msg, "ADMIN_PASSWORD rejected; bootstrap admin not created");
        return;
    }
    let password_hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!(error = %e, "Failed to hash ADMIN_PASSWORD");
            return;
        }
    };

    let email = std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| format!("{username}@localhost"));
    let input = CreateUser {
        username,
        email,
        password_hash,
        role: ROLE_ADMIN.to_string(),
    };
    match UserRepo::create(pool, &input).await {
        Ok(user) => tracing::info!(user_id = user.id, username = %user.username, "Bootstrap admin created"),
        Err(e) => tracing::error!(error = %e, "Failed to create bootstrap admin"),
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
