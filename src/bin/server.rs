//! Order-chat WebSocket server for the marketplace backend.
//!
//! Runs with in-memory collaborators; orders can be seeded from a JSON file
//! so buyers and sellers have something to chat about.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin gigchat-server
//! cargo run --bin gigchat-server -- --host 0.0.0.0 --port 3000 --seed orders.json
//! ```

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use clap::Parser;

use gigchat::{
    common::{logger::setup_logger, time::SystemClock},
    domain::Order,
    infrastructure::{
        broker::InMemoryRoomBroker,
        store::{InMemoryMessageStore, InMemoryOrderStore},
    },
    ui::{AppState, run_server},
};

#[derive(Parser, Debug)]
#[command(name = "gigchat-server")]
#[command(about = "Real-time order chat server for the marketplace", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "8080")]
    port: u16,

    /// JSON file with orders to seed the in-memory order store
    #[arg(long)]
    seed: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // 1. Stores (in-memory collaborators)
    let orders = Arc::new(InMemoryOrderStore::new());
    if let Some(path) = &args.seed {
        match seed_orders(&orders, path).await {
            Ok(count) => tracing::info!("seeded {} orders from {}", count, path.display()),
            Err(e) => {
                tracing::error!("failed to seed orders from {}: {e}", path.display());
                std::process::exit(1);
            }
        }
    }
    let messages = Arc::new(InMemoryMessageStore::new(Arc::new(SystemClock)));

    // 2. Broker (single-process fan-out)
    let broker = Arc::new(InMemoryRoomBroker::new());

    // 3. Use cases + state
    let state = Arc::new(AppState::new(orders, messages, broker));

    // 4. Run the server
    if let Err(e) = run_server(args.host, args.port, state).await {
        tracing::error!("server error: {e}");
        std::process::exit(1);
    }
}

async fn seed_orders(
    store: &InMemoryOrderStore,
    path: &Path,
) -> Result<usize, Box<dyn std::error::Error>> {
    let raw = tokio::fs::read(path).await?;
    let orders: Vec<Order> = serde_json::from_slice(&raw)?;
    let count = orders.len();
    for order in orders {
        store.insert(order).await;
    }
    Ok(count)
}
