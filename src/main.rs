/// Chirpy - a small social posting backend
///
/// Users register, log in with short-lived access tokens and revocable
/// refresh tokens, post chirps, and can be upgraded to Chirpy Red through
/// the Polka billing webhook.

mod api;
mod auth;
mod config;
mod context;
mod db;
mod error;
mod metrics;
mod server;
mod session;
mod validation;

use config::ServerConfig;
use context::AppContext;
use error::ChirpResult;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> ChirpResult<()> {
    // Load configuration (and .env) before the log filter is built
    let config = ServerConfig::from_env()?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(config.logging.env_filter())
        .with(tracing_subscriber::fmt::layer())
        .init();

    print_banner();
    tracing::debug!(level = %config.logging.level, "configuration loaded");

    // Create application context
    let ctx = AppContext::new(config).await?;

    server::serve(ctx).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
       __    _
  ____/ /_  (_)________  __  __
 / ___/ __ \/ / ___/ __ \/ / / /
/ /__/ / / / / /  / /_/ / /_/ /
\___/_/ /_/_/_/  / .___/\__, /
                /_/    /____/

        Chirpy v{}
        "#,
        env!("CARGO_PKG_VERSION")
    );
}
