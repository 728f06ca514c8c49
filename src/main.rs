//! SpinX API Server Binary

use clap::Parser;
use spinx::{
    api::ApiServer,
    config::{generate_sample_config, ConfigLoader},
    games::DefaultSpinEngineFactory,
    init_tracing, PlayerService, RocksBalanceStore, RuntimeGameSettings,
};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "spinx")]
#[command(about = "SpinX slot wager API server", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(long)]
    config: Option<String>,

    /// Write a sample configuration file to this path and exit
    #[arg(long)]
    generate_config: Option<String>,

    /// API server host (overrides config)
    #[arg(long)]
    host: Option<String>,

    /// API server port (overrides config)
    #[arg(long)]
    port: Option<u16>,

    /// Player database directory (overrides config)
    #[arg(long)]
    db_path: Option<String>,

    /// Allowed CORS origins (comma-separated, use * for all)
    #[arg(long)]
    cors_origins: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    if let Some(path) = args.generate_config {
        generate_sample_config(&path)?;
        println!("Sample configuration written to {}", path);
        return Ok(());
    }

    let loader = match args.config {
        Some(ref path) => ConfigLoader::new().with_path(path),
        None => ConfigLoader::new(),
    };
    let mut config = loader.load()?;

    if let Some(host) = args.host {
        config.api.host = host;
    }
    if let Some(port) = args.port {
        config.api.port = port;
    }
    if let Some(db_path) = args.db_path {
        config.storage.data_directory = db_path;
    }
    if let Some(origins) = args.cors_origins {
        config.api.allowed_origins = origins.split(',').map(|s| s.trim().to_string()).collect();
    }
    config.validate()?;

    init_tracing(&format!(
        "spinx={level},tower_http={level}",
        level = config.monitoring.log_level
    ));

    let store = Arc::new(RocksBalanceStore::open_with_config(&config.storage)?);
    let settings = Arc::new(RuntimeGameSettings::new(config.game));
    let service = PlayerService::new(store, Arc::new(DefaultSpinEngineFactory), settings);

    ApiServer::new(config.api, service).run().await
}
