mod status_cmd;

use std::net::{IpAddr, SocketAddr};
use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use upload_endpoint_config::EndpointConfig;
use upload_endpoint_gateway::{start_server, GatewayState};
use upload_endpoint_logging::{init_logger, Diagnostics};

#[derive(Parser)]
#[command(name = "upload-endpoint")]
#[command(about = "Form action endpoint for testing file upload components")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the upload endpoint server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Check whether the endpoint is answering
    Status,
    /// Print the effective configuration as JSON
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logger settings come from the same env; `serve` validates after init.
    let config = upload_endpoint_config::from_env()?;

    init_logger(
        &config.logging.level,
        config.logging.json,
        config.logging.log_dir.as_deref().map(Path::new),
    );

    match cli.command {
        Commands::Serve { port } => {
            let mut config = upload_endpoint_config::load()?;
            if let Some(port) = port {
                config.server.port = port;
            }
            run_server(config).await?;
        }
        Commands::Status => {
            status_cmd::run(&config.server.endpoint_base).await?;
        }
        Commands::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}

async fn run_server(config: EndpointConfig) -> Result<()> {
    let ip: IpAddr = config
        .server
        .bind_address
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.server.bind_address))?;
    let addr = SocketAddr::new(ip, config.server.port);

    info!(
        addr = %addr,
        endpoint_base = %config.server.endpoint_base,
        max_content_length = config.uploads.max_content_length,
        request_ids = config.request_id.enabled,
        diagnostics = config.diagnostics.enabled,
        "Starting upload endpoint"
    );

    let diagnostics = if config.diagnostics.enabled {
        Diagnostics::spawn(config.diagnostics.capacity)
    } else {
        Diagnostics::disabled()
    };

    let state = GatewayState::new(config, diagnostics)?;
    start_server(addr, state).await
}
