// --- Generador de horarios - servidor HTTP ---

use classshift::{AppConfig, run_server};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("classshift=info,actix_web=info")),
        )
        .init();

    let config = match AppConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(event = "config_error", error = %e);
            return Err(std::io::Error::other(e.to_string()));
        }
    };

    tracing::info!(event = "starting", bind = %config.bind_addr);
    run_server(config).await
}
