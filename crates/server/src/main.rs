//! Coffee Journey Server - HTTP REST API for tracking coffees
//!
//! Reads `.env`, then `server.{toml,yaml,json}`, then `COFFEE_JOURNEY__*`
//! environment variables, and serves until interrupted.

use server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is not an error
    dotenvy::dotenv().ok();

    let config = ServerConfig::load()?;

    server::start_server(config).await?;

    Ok(())
}
