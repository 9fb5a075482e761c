use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use lectio_relay::{router, AppState, RelayConfig, TelegramNotifier};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = RelayConfig::parse();
    let target = config.target();
    if target.is_none() {
        // Requests will answer 500 until the environment is fixed
        warn!("TELEGRAM_BOT_TOKEN or TELEGRAM_CHAT_ID not set");
    }

    let notifier = TelegramNotifier::new(&config.telegram_api, config.timeout())?;
    let app = router(AppState {
        target,
        notifier: Arc::new(notifier),
    });

    let listener = TcpListener::bind(config.addr()).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("relay exited");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = signal::ctrl_c().await;
    };
    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        if let Ok(mut stream) = signal(SignalKind::terminate()) {
            stream.recv().await;
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
