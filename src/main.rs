//! depot entry point.

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use depot::{Config, Server, Storage};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = Config::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cfg.default_log_filter()));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .init();

    let storage = Storage::new(&cfg.storage_dir);
    storage
        .ensure_root()
        .await
        .with_context(|| format!("creating storage dir {}", cfg.storage_dir.display()))?;
    info!(storage = %cfg.storage_dir.display(), max_body = cfg.max_body_bytes, "storage ready");

    let app = depot::app(Arc::new(storage)).max_body(cfg.max_body_bytes);

    let addr = cfg.socket_addr();
    Server::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?
        .serve(app)
        .await?;

    Ok(())
}
