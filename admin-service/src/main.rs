use std::sync::Arc;
use std::time::Duration;

use admin_service::{
    build_router,
    config::AdminConfig,
    services::{Argon2Hasher, HashProvider, InviteMailer, InviteService, SmtpMailer, UserService},
    store::{CredentialStore, InviteStore},
    AppState,
};
use service_core::observability::init_tracing;
use tokio::signal;

#[tokio::main]
async fn main() -> Result<(), service_core::error::AppError> {
    // Load configuration - fail fast if invalid
    let config = AdminConfig::from_env()?;

    init_tracing(&config.log_level, config.log_format);

    tracing::info!(
        service = %config.service_name,
        version = %config.service_version,
        environment = ?config.environment,
        "Starting gateway admin service"
    );

    let credentials = Arc::new(CredentialStore::new(&config.users_file));
    let invite_store = Arc::new(InviteStore::new(&config.invites_file));

    // the gateway must find a parseable users document from the first boot
    let users = credentials.load().await?;
    tracing::info!(
        path = %config.users_file.display(),
        users = users.len(),
        "Credential store ready"
    );

    let hasher: Arc<dyn HashProvider> = Arc::new(Argon2Hasher::new(Duration::from_secs(
        config.hash_timeout_seconds,
    )));
    let mailer: Arc<dyn InviteMailer> = Arc::new(SmtpMailer::new(&config.smtp)?);

    let user_service = UserService::new(credentials.clone(), hasher.clone());
    let invite_service = InviteService::new(
        invite_store,
        credentials,
        hasher,
        mailer,
        config.public_url.clone(),
        config.invite_ttl_minutes,
    );

    let state = AppState {
        config: config.clone(),
        users: user_service,
        invites: invite_service,
    };
    let app = build_router(state);

    let addr: std::net::SocketAddr = format!("{}:{}", config.common.host, config.common.port)
        .parse()
        .map_err(|e| {
            service_core::error::AppError::Config(anyhow::anyhow!("invalid listen address: {}", e))
        })?;

    tracing::info!(address = %addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Service shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
