use anyhow::{Context, Result};
use ceph_mcp::mcp::{self, tools};
use ceph_mcp::{CephClient, LogFormat, Settings, SettingsArgs};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "ceph-mcp")]
#[command(about = "Ceph MCP - Model Context Protocol server for Ceph storage clusters", long_about = None)]
#[command(version)]
struct Cli {
    /// Log output format (logs always go to stderr); defaults to the settings file, then json
    #[arg(long, global = true, value_enum, env = "LOG_FORMAT")]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Start the MCP server
    #[command(alias = "server")]
    Serve(ServeArgs),

    /// Log in to the manager and print the cluster health summary
    Check(SettingsArgs),
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum Transport {
    /// Newline-delimited JSON-RPC over stdin/stdout
    #[default]
    Stdio,
    /// Streamable HTTP on SERVER_HOST:SERVER_PORT
    Http,
}

#[derive(Debug, Args)]
struct ServeArgs {
    #[arg(long, value_enum, env = "MCP_TRANSPORT", default_value = "stdio")]
    transport: Transport,

    #[command(flatten)]
    settings: SettingsArgs,
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
}

fn connect(settings: &Settings) -> Result<Arc<CephClient>> {
    let client = CephClient::new(settings).context("failed to create the manager API client")?;
    Ok(Arc::new(client))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => {
            let settings = args.settings.resolve()?;
            init_tracing(cli.log_format.unwrap_or(settings.log_format));
            let client = connect(&settings)?;
            match args.transport {
                Transport::Stdio => mcp::run_stdio_server(client, &settings).await,
                Transport::Http => mcp::run_http_server(client, &settings).await,
            }
        }
        Commands::Check(args) => {
            let settings = args.resolve()?;
            init_tracing(cli.log_format.unwrap_or(settings.log_format));
            let client = connect(&settings)?;
            client
                .authenticate()
                .await
                .with_context(|| format!("failed to log in to {}", settings.manager_url))?;
            tracing::info!(manager = %settings.manager_url, "authenticated with the manager API");

            let response = tools::health::get_health_summary(&client).await;
            println!("{}", response.render());
            if response.success {
                Ok(())
            } else {
                anyhow::bail!("health summary request failed")
            }
        }
    }
}
