use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use std::io::Write;

use cfenv::api::{AppState, create_router};
use cfenv::utils::StdEnvProvider;
use cfenv::{CloudFoundryClient, ServiceConfiguration, write_report};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve environment reports over HTTP; the request path names the app
    Serve {
        /// Address to bind
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on (defaults to $PORT, then 8080)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Print the environment report for one app and exit
    Lookup {
        /// Exact, case-sensitive app name
        name: String,
    },
}

#[cfg(feature = "cli")]
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = cli.verbose.log_level_filter();
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Off) // Turn off all logs by default
        .filter(Some("cfenv"), log_level)
        .init();

    let configuration = ServiceConfiguration::from_env(&StdEnvProvider)
        .context("Invalid service configuration")?;
    log::debug!("Loaded configuration: {configuration:?}");

    let client = CloudFoundryClient::connect(&configuration.client)
        .await
        .with_context(|| {
            format!(
                "Failed to connect to Cloud Controller at {}",
                configuration.client.api_address
            )
        })?;

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(app_name) = &configuration.app_name {
                log::info!("Running as app {app_name:?}");
            }

            let app = create_router(AppState::new(client));

            let addr = format!("{}:{}", host, port.unwrap_or(configuration.port));
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("Failed to listen on {addr}"))?;
            log::info!("Serving environment reports on http://{addr}");

            axum::serve(listener, app).await?;
        }
        Commands::Lookup { name } => {
            let mut out = Vec::new();
            write_report(&client, &name, &mut out).await;
            std::io::stdout().write_all(&out)?;
        }
    }

    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    println!("CLI feature not enabled. Build with --features cli to use the CLI.");
}
