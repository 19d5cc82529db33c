//! Server binary: reads settings, connects to PostgreSQL, ensures collections, serves HTTP.

use tienda_api::{app, connect_pool, AppState, PgDocumentStore, Settings};
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("tienda_api=info,tower_http=info")),
        )
        .init();

    let settings = Settings::from_env()?;

    // No traffic is accepted until the database answers.
    let pool = match connect_pool(&settings).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!(error = %e, "could not connect to database");
            std::process::exit(1);
        }
    };
    tracing::info!(schema = %settings.schema, "connected to database");

    let store = PgDocumentStore::new(pool, settings.schema.clone());
    store.ensure_collections().await?;

    let router = app(AppState::new(store), settings.body_limit);
    let listener = TcpListener::bind(settings.bind_addr()).await?;
    tracing::info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutting down");
}
