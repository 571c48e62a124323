use std::fs;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use orgscope::config::ServerConfig;
use orgscope::crawl::{Crawler, StatusTracker};
use orgscope::github::GithubClient;
use orgscope::server::{AppState, create_router};
use orgscope::store::{SqliteStore, Store};

#[derive(Parser)]
#[command(name = "orgscope")]
#[command(about = "A GitHub organization crawler with a polling report API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Serve {
        /// Path to a TOML configuration file
        #[arg(long)]
        config: Option<String>,

        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(long, short)]
        port: Option<u16>,

        /// Data directory for the database
        #[arg(long)]
        data_dir: Option<String>,

        /// Base URL of the GitHub API
        #[arg(long)]
        api_url: Option<String>,

        /// API token; falls back to the GITHUB_TOKEN environment variable
        #[arg(long)]
        token: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("orgscope=info".parse()?))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            config,
            host,
            port,
            data_dir,
            api_url,
            token,
        } => {
            let mut config = match config {
                Some(path) => ServerConfig::load(path)?,
                None => ServerConfig::default(),
            };
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(data_dir) = data_dir {
                config.data_dir = data_dir.into();
            }
            if let Some(api_url) = api_url {
                config.github.api_url = api_url;
            }
            if let Some(token) = token {
                config.github.token = Some(token);
            }
            if config.github.token.is_none() {
                config.github.token = std::env::var("GITHUB_TOKEN").ok();
            }
            if config.github.token.is_none() {
                tracing::warn!("No API token configured; unauthenticated rate limits apply");
            }

            fs::create_dir_all(&config.data_dir)?;

            let store: Arc<dyn Store> = Arc::new(SqliteStore::new(config.db_path())?);
            store.initialize()?;

            let github = GithubClient::new(
                config.github.api_url.clone(),
                config.github.token.as_deref(),
            )?;
            let status = Arc::new(StatusTracker::new());
            let crawler = Arc::new(Crawler::new(github, store.clone(), status.clone()));

            let state = Arc::new(AppState {
                store,
                status,
                crawler,
            });

            let app = create_router(state);
            let addr = config.socket_addr()?;

            info!("Starting server on {}", addr);

            let listener = tokio::net::TcpListener::bind(addr).await?;
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
