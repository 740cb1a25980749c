//! smoke-break binary: wires configuration, storage and the Telegram
//! transport, then runs until Ctrl-C.

use std::error::Error;
use std::sync::Arc;

use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

use smoke_break::adapters::http::{app_router, WebhookAppState};
use smoke_break::adapters::memory::{InMemoryParticipantStore, InMemorySessionStore};
use smoke_break::adapters::postgres::{
    self, PostgresParticipantRepository, PostgresResponseRepository, PostgresSessionRepository,
};
use smoke_break::adapters::telegram::{RouterServices, TelegramClient, TelegramPoller, UpdateRouter};
use smoke_break::adapters::SystemClock;
use smoke_break::application::{
    NotificationService, ParticipantDirectory, RemoteStatusManager, SessionCoordinator,
    SessionReaper, SessionReaperConfig,
};
use smoke_break::config::{AppConfig, UpdateMode};
use smoke_break::ports::{Clock, Messenger, ParticipantRepository, ResponseRepository, SessionRepository};

type BoxError = Box<dyn Error + Send + Sync>;

struct Stores {
    participants: Arc<dyn ParticipantRepository>,
    sessions: Arc<dyn SessionRepository>,
    responses: Arc<dyn ResponseRepository>,
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    init_tracing(&config);
    config.validate()?;

    let timezone = config.schedule.timezone()?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let stores = open_stores(&config).await?;

    let client = Arc::new(TelegramClient::from_config(&config.telegram));
    let messenger: Arc<dyn Messenger> = client.clone();

    let directory = Arc::new(ParticipantDirectory::new(
        stores.participants.clone(),
        config.directory.hidden_policy(),
        clock.clone(),
    ));
    let remote_status = Arc::new(RemoteStatusManager::new(
        stores.participants.clone(),
        clock.clone(),
        timezone,
    ));
    let coordinator = Arc::new(SessionCoordinator::new(
        stores.sessions,
        stores.responses,
        stores.participants.clone(),
        remote_status.clone(),
        clock.clone(),
    ));
    let notifier = Arc::new(NotificationService::new(
        messenger.clone(),
        stores.participants,
    ));

    let reaper = Arc::new(SessionReaper::new(
        coordinator.clone(),
        notifier.clone(),
        SessionReaperConfig::default()
            .with_interval(config.schedule.reaper_interval())
            .with_stale_after(config.schedule.stale_after())
            .with_recovery_after(config.schedule.recovery_after()),
    ));
    reaper.recover().await;

    let router = Arc::new(UpdateRouter::new(
        RouterServices {
            directory,
            coordinator,
            remote_status,
            notifier,
            messenger,
            clock,
        },
        config.schedule.clone(),
        timezone,
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let reaper_task = {
        let reaper = reaper.clone();
        let shutdown = shutdown_rx.clone();
        tokio::spawn(async move { reaper.run(shutdown).await })
    };

    let source_task = match config.telegram.mode {
        UpdateMode::Polling => {
            let poller = TelegramPoller::new(client, router, config.telegram.poll_timeout());
            let shutdown = shutdown_rx.clone();
            tokio::spawn(async move {
                poller.run(shutdown).await;
                Ok::<(), std::io::Error>(())
            })
        }
        UpdateMode::Webhook => {
            let addr = config.server.socket_addr()?;
            let app = app_router(WebhookAppState::new(
                router,
                config.telegram.webhook_secret.clone(),
            ));
            let listener = tokio::net::TcpListener::bind(addr).await?;
            tracing::info!(%addr, "Webhook server listening");
            let mut shutdown = shutdown_rx.clone();
            tokio::spawn(async move {
                axum::serve(listener, app)
                    .with_graceful_shutdown(async move {
                        while !*shutdown.borrow() {
                            if shutdown.changed().await.is_err() {
                                break;
                            }
                        }
                    })
                    .await
            })
        }
    };

    tokio::signal::ctrl_c().await?;
    tracing::info!("Shutdown requested");
    shutdown_tx.send(true)?;

    reaper_task.await?;
    source_task.await??;
    tracing::info!("Stopped");
    Ok(())
}

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = if config.is_production() {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    };
    if let Err(e) = result {
        eprintln!("tracing already initialised: {}", e);
    }
}

async fn open_stores(config: &AppConfig) -> Result<Stores, BoxError> {
    match &config.database {
        Some(database) => {
            tracing::info!(url = %database.redacted_url(), "Using PostgreSQL storage");
            let pool = postgres::connect(database).await?;
            Ok(Stores {
                participants: Arc::new(PostgresParticipantRepository::new(pool.clone())),
                sessions: Arc::new(PostgresSessionRepository::new(pool.clone())),
                responses: Arc::new(PostgresResponseRepository::new(pool)),
            })
        }
        None => {
            tracing::warn!("No database configured, state is kept in memory");
            let sessions = Arc::new(InMemorySessionStore::new());
            Ok(Stores {
                participants: Arc::new(InMemoryParticipantStore::new()),
                sessions: sessions.clone(),
                responses: sessions,
            })
        }
    }
}
