//! support-search - semantic search API for customer-support tickets
//!
//! Commands:
//! - `serve` - Run the HTTP API
//! - `load` - Load a ticket file into the vector store and exit

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use support_search::api::{self, AppState};
use support_search::application::ports::{TextEmbedder, TicketStore};
use support_search::application::services::{LoadConfig, LoadService};
use support_search::config::ServiceConfig;
use support_search::domain::value_objects::EmbeddingModel;
use support_search::infrastructure::embeddings::{
    FastEmbedService, QdrantConfig, QdrantTicketStore,
};

/// Semantic search over customer-support tickets
#[derive(Parser)]
#[command(name = "support-search")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    store: StoreArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct StoreArgs {
    /// Qdrant gRPC URL
    #[arg(
        long,
        global = true,
        default_value = "http://localhost:6334",
        env = "SUPPORT_SEARCH_QDRANT_URL"
    )]
    qdrant_url: String,

    /// Qdrant API key
    #[arg(long, global = true, env = "SUPPORT_SEARCH_QDRANT_API_KEY")]
    qdrant_api_key: Option<String>,

    /// Collection holding the tickets
    #[arg(
        long,
        global = true,
        default_value = "CustomerSupport",
        env = "SUPPORT_SEARCH_COLLECTION"
    )]
    collection: String,

    /// Sentence-embedding model
    #[arg(
        long,
        global = true,
        default_value = "all-MiniLM-L6-v2",
        env = "SUPPORT_SEARCH_MODEL"
    )]
    model: String,

    /// Seconds to wait when connecting to Qdrant
    #[arg(
        long,
        global = true,
        default_value = "5",
        env = "SUPPORT_SEARCH_CONNECT_TIMEOUT"
    )]
    connect_timeout: u64,

    /// Seconds to wait for a Qdrant request
    #[arg(
        long,
        global = true,
        default_value = "30",
        env = "SUPPORT_SEARCH_REQUEST_TIMEOUT"
    )]
    request_timeout: u64,

    /// Tickets per insert batch
    #[arg(
        long,
        global = true,
        default_value = "100",
        env = "SUPPORT_SEARCH_BATCH_SIZE"
    )]
    batch_size: usize,

    /// Stop loading once more than this many tickets failed
    #[arg(
        long,
        global = true,
        default_value = "100",
        env = "SUPPORT_SEARCH_MAX_FAILURES"
    )]
    max_failures: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:8000", env = "SUPPORT_SEARCH_BIND")]
        bind: SocketAddr,

        /// Ticket file served by GET /load-data
        #[arg(
            long,
            default_value = "customer_support_data.json",
            env = "SUPPORT_SEARCH_DATA_FILE"
        )]
        data_file: PathBuf,

        /// Load the data file before accepting requests
        #[arg(long, env = "SUPPORT_SEARCH_LOAD_ON_STARTUP")]
        load_on_startup: bool,
    },

    /// Load a ticket file into the vector store, replacing the collection
    Load {
        /// Ticket file (JSON array)
        #[arg(default_value = "customer_support_data.json")]
        file: PathBuf,
    },
}

impl Cli {
    fn service_config(&self) -> Result<ServiceConfig> {
        let model: EmbeddingModel = self.store.model.parse()?;

        let mut config = ServiceConfig {
            qdrant: QdrantConfig {
                url: self.store.qdrant_url.clone(),
                api_key: self.store.qdrant_api_key.clone(),
                collection_name: self.store.collection.clone(),
                connect_timeout: Duration::from_secs(self.store.connect_timeout),
                request_timeout: Duration::from_secs(self.store.request_timeout),
            },
            model,
            load: LoadConfig {
                batch_size: self.store.batch_size,
                max_failures: self.store.max_failures,
            },
            ..Default::default()
        };

        match &self.command {
            Commands::Serve {
                bind,
                data_file,
                load_on_startup,
            } => {
                config.bind_addr = *bind;
                config.data_file = data_file.clone();
                config.load_on_startup = *load_on_startup;
            }
            Commands::Load { file } => config.data_file = file.clone(),
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    let config = cli.service_config()?;

    // Model load is expensive: done once and shared by every request
    let embedder: Arc<dyn TextEmbedder> = Arc::new(
        FastEmbedService::new(config.model)
            .await
            .context("Failed to load embedding model")?,
    );
    let store: Arc<dyn TicketStore> = Arc::new(
        QdrantTicketStore::new(&config.qdrant).context("Failed to create Qdrant client")?,
    );

    match cli.command {
        Commands::Serve { .. } => serve(config, embedder, store).await,
        Commands::Load { .. } => load(config, embedder, store).await,
    }
}

async fn serve(
    config: ServiceConfig,
    embedder: Arc<dyn TextEmbedder>,
    store: Arc<dyn TicketStore>,
) -> Result<()> {
    if store.is_ready().await {
        info!("Vector store at {} is ready", config.qdrant.url);
    } else {
        warn!(
            "Vector store at {} is not reachable; search requests will get 503 until it is",
            config.qdrant.url
        );
    }

    let state = AppState::new(embedder, store, config.load.clone(), config.data_file.clone());

    if config.load_on_startup {
        match state.loader.load_file(&config.data_file).await {
            Ok(report) => info!(
                "Startup load finished: {} of {} tickets inserted",
                report.inserted, report.total_tickets
            ),
            Err(e) => error!("Startup load failed: {}", e),
        }
    }

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("Listening on http://{}", config.bind_addr);

    axum::serve(listener, api::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    // The last handles to the store client go away with the router
    info!("Vector store connection closed");
    Ok(())
}

async fn load(
    config: ServiceConfig,
    embedder: Arc<dyn TextEmbedder>,
    store: Arc<dyn TicketStore>,
) -> Result<()> {
    if !store.is_ready().await {
        bail!("Vector store at {} is not ready", config.qdrant.url);
    }

    let loader = LoadService::with_config(embedder, store, config.load);
    let report = loader.load_file(&config.data_file).await?;

    println!(
        "Loaded {} of {} tickets ({:.1}%) in {} ms",
        report.inserted,
        report.total_tickets,
        report.success_rate(),
        report.duration_ms
    );
    if report.has_errors() {
        println!("Number of failed imports: {}", report.failure_count());
        for failure in report.failed.iter().take(1) {
            println!("First failed object: {}", failure);
        }
    }
    if report.aborted {
        bail!("Batch import stopped due to excessive errors.");
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutting down");
}
