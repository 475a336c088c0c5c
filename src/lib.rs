pub mod cli;
pub mod error;
pub mod llm;
pub mod models;
pub mod relay;
pub mod server;
pub mod tokens;

use cli::Args;
use log::info;
use relay::ChatRelay;
use server::Server;
use std::error::Error;
use std::sync::Arc;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Moderation URL: {}", args.moderation_url);
    info!("Chat URL: {}", args.chat_url);
    info!("Chat Model: {}", args.chat_model);
    match args.upstream_timeout_secs {
        Some(secs) => info!("Upstream Timeout: {}s", secs),
        None => info!("Upstream Timeout: unbounded"),
    }
    info!("TLS Enabled: {}", args.enable_tls);
    info!("-------------------------");

    let relay = Arc::new(ChatRelay::from_config(args.openai_config())?);
    let addr = args.server_addr.clone();
    info!("Starting server on: {}", addr);
    let server = Server::new(addr, relay, args.clone());
    server.run().await?;

    Ok(())
}
