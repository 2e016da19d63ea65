use anyhow::{anyhow, Context};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use voicequeue::controllers::{
    health::HealthState, inbox::InboxController, jobs::JobsController,
    preferences::PreferencesController,
};
use voicequeue::domain::job::JobQueue;
use voicequeue::domain::submission::{SubmissionLimits, SubmissionService};
use voicequeue::domain::tts::EngineRegistry;
use voicequeue::domain::worker::{prepare_temp_dir, ConversionWorker, WorkerConfig};
use voicequeue::infrastructure::audio::{AudioFinalizer, FfmpegFinalizer, PassthroughFinalizer};
use voicequeue::infrastructure::config::{Config, FinalizerKind, LogFormat};
use voicequeue::infrastructure::db::{check_connection, create_pool, run_migrations, DbPool};
use voicequeue::infrastructure::engines::{
    EspeakEngine, EspeakVoiceDriver, FestivalEngine, OfflineVoiceEngine, OnlineEngine, SpeechEngine,
};
use voicequeue::infrastructure::http::{create_router, start_http_server};
use voicequeue::infrastructure::repositories::{
    InMemoryProfileRepository, PgProfileRepository, ProfileRepository,
};
use voicequeue::infrastructure::transport::OutboxTransport;

const ONLINE_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().map_err(|e| anyhow!("invalid configuration: {}", e))?;

    // Initialize logging
    init_logging(&config);

    tracing::info!("Starting voicequeue on {}:{}", config.host, config.port);

    // Leftovers from a previous run are never delivered
    prepare_temp_dir(&config.temp_dir)
        .await
        .with_context(|| format!("preparing temp dir {}", config.temp_dir.display()))?;
    tokio::fs::create_dir_all(&config.outbox_dir)
        .await
        .with_context(|| format!("creating outbox dir {}", config.outbox_dir.display()))?;

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Profile store
    let defaults = config.default_preferences.clone();
    let (profiles, pool): (Arc<dyn ProfileRepository>, Option<Arc<DbPool>>) =
        match &config.database_url {
            Some(database_url) => {
                let pool = create_pool(database_url).await.context("connecting to database")?;
                check_connection(&pool).await.context("verifying database connection")?;
                run_migrations(&pool).await.context("running migrations")?;
                tracing::info!("Database connection verified, preferences stored in PostgreSQL");

                let pool = Arc::new(pool);
                let profiles: Arc<dyn ProfileRepository> =
                    Arc::new(PgProfileRepository::new(pool.clone(), defaults));
                (profiles, Some(pool))
            }
            None => {
                tracing::warn!("DATABASE_URL not set, preferences are kept in memory");
                let profiles: Arc<dyn ProfileRepository> =
                    Arc::new(InMemoryProfileRepository::new(defaults));
                (profiles, None)
            }
        };

    // 2. Engines, in no particular order; the registry owns the fallback order
    tracing::info!("Instantiating speech engines...");
    let online_engine = OnlineEngine::new(config.online_tts_url.clone(), ONLINE_REQUEST_TIMEOUT)
        .context("building HTTP client for the online engine")?;
    let voice_driver = Arc::new(EspeakVoiceDriver::new(
        config.espeak_binary.clone(),
        config.speech_rate,
    ));
    let engines: Vec<Arc<dyn SpeechEngine>> = vec![
        Arc::new(online_engine),
        Arc::new(OfflineVoiceEngine::new(voice_driver)),
        Arc::new(EspeakEngine::new(config.espeak_binary.clone(), config.speech_rate)),
        Arc::new(FestivalEngine::new(config.festival_binary.clone())),
    ];
    let registry = Arc::new(EngineRegistry::new(engines));

    let finalizer: Arc<dyn AudioFinalizer> = match config.audio_finalizer {
        FinalizerKind::Passthrough => Arc::new(PassthroughFinalizer),
        FinalizerKind::Ffmpeg => Arc::new(FfmpegFinalizer::new(config.ffmpeg_binary.clone())),
    };

    // 3. Queue, transport and worker
    let queue = Arc::new(JobQueue::new(config.queue_capacity));
    let outbox = Arc::new(OutboxTransport::new(config.outbox_dir.clone()));

    let worker = ConversionWorker::new(
        queue.clone(),
        registry,
        profiles.clone(),
        outbox.clone(),
        finalizer,
        WorkerConfig {
            poll_interval: config.poll_interval,
            fault_backoff: config.fault_backoff,
            max_chunk_chars: config.max_chunk_chars,
            temp_dir: config.temp_dir.clone(),
        },
    )
    .start();

    // 4. Services and controllers
    tracing::info!("Instantiating controllers...");
    let submission_service = Arc::new(SubmissionService::new(
        queue.clone(),
        SubmissionLimits {
            max_submission_chars: config.max_submission_chars,
            chars_per_minute: config.chars_per_minute,
        },
    ));
    let app = create_router(
        Arc::new(HealthState {
            queue: queue.clone(),
            pool,
        }),
        Arc::new(JobsController::new(submission_service)),
        Arc::new(PreferencesController::new(profiles)),
        Arc::new(InboxController::new(outbox)),
    );

    // Start HTTP server; Ctrl-C closes the queue and drains the server
    let shutdown_queue = queue.clone();
    start_http_server(Arc::new(config), app, async move {
        shutdown_signal().await;
        shutdown_queue.close();
    })
    .await
    .map_err(|e| anyhow!("http server failed: {}", e))?;

    tracing::info!(pending = queue.pending_len(), "Stopping worker");
    worker.stop().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

fn init_logging(config: &Config) {
    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "voicequeue=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "voicequeue=debug,tower_http=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
