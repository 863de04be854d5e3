use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use docugen::config::{Config, NamespaceBackend};
use docugen::notify::TracingNotifier;
use docugen::routes::build_router;
use docugen::state::AppState;
use docugen::store::{FileNamespace, MemoryNamespace, Namespace};

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("docugen={0},docugen_api={0}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting DocuGen API v{}", env!("CARGO_PKG_VERSION"));

    // Open the document namespace
    let namespace: Arc<dyn Namespace> = match &config.namespace {
        NamespaceBackend::Memory => {
            info!("Using in-memory namespace; documents will not survive a restart");
            Arc::new(MemoryNamespace::new())
        }
        NamespaceBackend::File(path) => {
            let namespace = FileNamespace::open(path)
                .with_context(|| format!("could not open namespace file {}", path.display()))?;
            info!("Namespace file: {}", path.display());
            Arc::new(namespace)
        }
    };

    info!(
        "Exports: {} at {}x, {:?} overflow; logout policy {:?}",
        config.export_dir.display(),
        config.export_scale,
        config.overflow,
        config.logout_policy
    );

    // Build app state
    let state = AppState::new(config.clone(), namespace, Arc::new(TracingNotifier))
        .context("invalid export configuration")?;

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
