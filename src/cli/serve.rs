use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Notify;

use crate::api::{build_router, AppState};
use crate::db::Database;

/// Run the HTTP server until Ctrl+C.
pub fn run_serve(db: Database, host: &str, port: u16, static_dir: Option<PathBuf>) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;

    runtime.block_on(serve(db, host, port, static_dir))
}

async fn serve(db: Database, host: &str, port: u16, static_dir: Option<PathBuf>) -> Result<()> {
    if let Some(ref dir) = static_dir {
        if !dir.join("index.html").is_file() {
            log::warn!("no index.html in {}, UI routes will 404", dir.display());
        }
    }

    let router = build_router(AppState::new(db), static_dir);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    log::info!("listening on http://{}", listener.local_addr()?);
    println!("Press Ctrl+C to stop");

    let shutdown = Arc::new(Notify::new());
    ctrlc_handler(shutdown.clone());

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { shutdown.notified().await })
        .await?;

    log::info!("server stopped");
    Ok(())
}

fn ctrlc_handler(shutdown: Arc<Notify>) {
    let result = ctrlc::set_handler(move || {
        println!("\nReceived Ctrl+C, shutting down...");
        shutdown.notify_one();
    });
    if let Err(e) = result {
        log::warn!("could not install Ctrl+C handler: {}", e);
    }
}
