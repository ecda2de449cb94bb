use anyhow::Context;
use clap::Parser;
use geonear::{CatalogBuilder, Config};
use geonear_server::run_server;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 5000)]
    port: u16,

    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// JSON file with the record array (overrides the config file)
    #[arg(short, long)]
    data_file: Option<PathBuf>,

    /// Geohash precision used for indexing (overrides the config file)
    #[arg(long)]
    precision: Option<usize>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fail initialization if loading takes longer than this
    #[arg(long)]
    load_timeout_secs: Option<u64>,
}

fn load_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config file {}", path.display()))?;
            Config::from_toml(&text)
                .with_context(|| format!("parsing config file {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(path) = &args.data_file {
        config.data_path = path.clone();
    }
    if let Some(precision) = args.precision {
        config.geohash_precision = precision;
    }
    if let Some(secs) = args.load_timeout_secs {
        config.load_timeout_secs = Some(secs);
    }

    config.validate().map_err(anyhow::Error::msg)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "geonear_server=info,geonear=info,info".into()),
        )
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    info!(
        "Loading locations from {} (precision {}, timeout {:?})",
        config.data_path.display(),
        config.geohash_precision,
        config.load_timeout()
    );
    let catalog = CatalogBuilder::new().config(config).build()?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for ctrl_c signal: {}", e);
            std::future::pending::<()>().await;
        }
    };

    run_server(listener, catalog, shutdown).await?;

    Ok(())
}
