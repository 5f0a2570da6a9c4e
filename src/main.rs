use std::sync::Arc;

use astrodate_client::cli::{App, Cli, CliError};
use astrodate_client::config::ClientConfig;
use astrodate_client::session::SessionStore;
use astrodate_client::session::storage::FileStorage;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), CliError> {
    init_tracing();
    let cli = Cli::parse();
    let config = cli.apply(ClientConfig::from_env()?)?;

    let storage = FileStorage::open(&config.state_file)?;
    let session = SessionStore::new(Arc::new(storage));
    let mut app = App::new(config, session)?;
    let output = app.run(cli.command).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
