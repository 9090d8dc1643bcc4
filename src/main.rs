use anyhow::Result;
use axum::Router;
use cached_object_store::{
    AppConfig, CacheClient, MemoryCache, MemoryObjectStore, ObjectStore, RedisCache,
    S3ObjectStore, StorageService, routes,
};
use std::{io::ErrorKind, sync::Arc};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

/// SDK internals log every retry and credential lookup at info.
const DEFAULT_LOG_FILTER: &str = "info,aws_config=warn,aws_smithy_runtime=warn";

#[tokio::main]
async fn main() -> Result<()> {
    // --- Logging setup ---
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    // --- Parse config ---
    let cfg = AppConfig::from_env_and_args()?;

    tracing::info!("Starting cached-object-store with config: {:?}", cfg);

    // --- Initialize backends ---
    let (store, cache): (Arc<dyn ObjectStore>, Arc<dyn CacheClient>) = if cfg.in_memory {
        tracing::warn!("Running with in-memory store and cache; nothing is persisted");
        (
            Arc::new(MemoryObjectStore::new(cfg.storage.bucket.clone())),
            Arc::new(MemoryCache::new()),
        )
    } else {
        let store = S3ObjectStore::connect(&cfg.storage).await?;
        tracing::info!(
            "Using bucket {} at {}",
            store.bucket(),
            cfg.storage.endpoint_url.as_deref().unwrap_or("default AWS endpoint")
        );
        let cache = RedisCache::connect(&cfg.storage.cache_host).await?;
        (Arc::new(store), Arc::new(cache))
    };

    // --- Initialize core service ---
    let storage = StorageService::from_config(store, cache, &cfg.storage);

    // --- Build router ---
    let app: Router = routes::routes::routes().with_state(storage);

    // --- Start server ---
    let addr = cfg.addr();
    let listener = match TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err)
            if err.kind() == ErrorKind::PermissionDenied
                && matches!(cfg.host.as_str(), "0.0.0.0" | "::") =>
        {
            let fallback_addr = format!("127.0.0.1:{}", cfg.port);
            tracing::warn!(
                "Permission denied binding to {} ({}). Falling back to {}",
                addr,
                err,
                fallback_addr
            );
            TcpListener::bind(&fallback_addr).await?
        }
        Err(err) => return Err(err.into()),
    };

    tracing::info!("Server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
