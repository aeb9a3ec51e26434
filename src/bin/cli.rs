use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use contacts::config::Config;
use contacts::interface::cli::Cli;
use contacts::messaging::EmailClient;
use contacts::service::ContactService;
use contacts::{db, store};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "contacts-cli", about = "Contact management interactive console")]
struct Args {
    /// Path to the JSON configuration file.
    #[arg(long, default_value = "config.json")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = Config::load(&args.config).context("failed to load configuration")?;

    let handle = db::connect(&config)
        .await
        .context("failed to connect to database")?;

    let repository = store::new_repository(&config, handle.clone())
        .await
        .context("failed to create the store")?;

    let email_client = Arc::new(EmailClient::new(config.email.token.clone()));
    email_client.connect();

    // Same service layer as the HTTP server.
    let service = ContactService::new(repository, email_client);

    info!(store_type = %config.store.store_type, "starting console");
    let result = Cli::new(service).run().await;

    handle.close().await;
    result
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("contacts=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
