mod config;
mod cv;
mod encryption;
mod errors;
mod harvester;
mod matching;
mod models;
mod normalize;
mod routes;
mod state;
mod store;
mod students;

use anyhow::{bail, Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{AppEnv, Config};
use crate::cv::CvExtractor;
use crate::encryption::EncryptionService;
use crate::harvester::persistence::JobPersister;
use crate::harvester::{Harvester, SessionManager};
use crate::matching::MatchScorer;
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::connect_store;
use crate::students::StudentRepository;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting engine v{}", env!("CARGO_PKG_VERSION"));

    // Encryption key: mandatory in production
    if config.app_env == AppEnv::Production && config.encryption_key.is_none() {
        bail!("ENCRYPTION_KEY must be set when APP_ENV=production");
    }
    let crypto = Arc::new(
        EncryptionService::from_config(config.encryption_key.as_deref())
            .context("ENCRYPTION_KEY is invalid")?,
    );

    // Key/value store (Redis or in-memory)
    let store = connect_store(config.redis_url.as_deref()).await?;

    // Harvester: one session manager for the whole process
    let session = Arc::new(SessionManager::new(&config.harvester).context("building HTTP session")?);
    let persister = JobPersister::new(
        store.clone(),
        crypto.clone(),
        &config.harvester.source,
        &config.harvester.contact_placeholder,
    );
    let harvester = Arc::new(Harvester::new(session, persister, &config.harvester));
    if let Err(e) = harvester.restore_seen().await {
        warn!("Could not restore duplicate cache: {e}");
    }
    info!(
        "Harvester ready (source: {}, delay: {:?}..{:?})",
        config.harvester.source, config.harvester.min_delay, config.harvester.max_delay
    );

    // Matching scorer
    let scorer = MatchScorer::new(config.vectorizer.build(), config.match_weights);
    info!(
        "Match scorer initialized (vectorizer: {}, weights: {:?})",
        scorer.vectorizer_name(),
        scorer.default_weights()
    );

    // Build app state
    let state = AppState {
        store: store.clone(),
        crypto: crypto.clone(),
        extractor: CvExtractor::new(config.extraction),
        scorer,
        harvester,
        students: StudentRepository::new(store, crypto, config.extraction),
        config: config.clone(),
    };

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
