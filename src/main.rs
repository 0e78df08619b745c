use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use flowstate::server::Server;
use flowstate::service::WorkflowService;
use flowstate::store::{JsonFileStore, MemoryStore, WorkflowStore};

/// Finite-state workflow engine server.
#[derive(Debug, Parser)]
#[command(name = "flowstate", version, about)]
struct Args {
    /// Port to listen on.
    #[arg(long, default_value_t = 3000)]
    port: u16,

    /// Directory holding workflows.json and instances.json.
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Keep all state in memory instead of on disk.
    #[arg(long)]
    in_memory: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("flowstate=info")),
        )
        .init();

    let store: Arc<dyn WorkflowStore> = if args.in_memory {
        tracing::info!("using in-memory store");
        Arc::new(MemoryStore::new())
    } else {
        tracing::info!(data_dir = %args.data_dir.display(), "using file-backed store");
        Arc::new(JsonFileStore::open(&args.data_dir)?)
    };

    let service = Arc::new(WorkflowService::new(store));
    Server::new(service, args.port).serve().await?;
    Ok(())
}
