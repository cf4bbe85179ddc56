#![forbid(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::todo)]
#![warn(clippy::panic)]
#![warn(clippy::dbg_macro)]
#![warn(clippy::print_stdout)]
#![warn(clippy::print_stderr)]
#![warn(clippy::clone_on_ref_ptr)]
#![warn(unreachable_pub)]
#![warn(missing_debug_implementations)]
#![warn(unused_qualifications)]
#![deny(unused_must_use)]

use crate::api::ServiceContainer;
use crate::config::Config;
use crate::services::bid_service::BidService;
use crate::services::catalog_service::CatalogService;
use crate::services::conversation_service::ConversationService;
use crate::services::health_service::HealthService;
use crate::services::message_service::MessageService;
use crate::services::payment_service::PaymentService;
use crate::services::realtime::ChannelNotifier;
use crate::services::review_service::ReviewService;
use crate::services::task_service::TaskService;
use crate::services::user_service::UserService;
use crate::storage::DbPool;
use crate::storage::bid_repo::BidRepository;
use crate::storage::cache::RedisCache;
use crate::storage::catalog_repo::CatalogRepository;
use crate::storage::conversation_repo::ConversationRepository;
use crate::storage::message_repo::MessageRepository;
use crate::storage::payment_repo::PaymentRepository;
use crate::storage::review_repo::ReviewRepository;
use crate::storage::task_repo::TaskRepository;
use crate::storage::user_repo::UserRepository;
use std::sync::Arc;
use tokio::sync::watch;

pub mod api;
pub mod config;
pub mod domain;
pub mod error;
pub mod services;
pub mod storage;
pub mod telemetry;

/// Everything the routers need, wired from a pool and config.
#[derive(Debug)]
pub struct App {
    pub services: ServiceContainer,
    pub health_service: HealthService,
    pub notifier: Arc<ChannelNotifier>,
}

/// Wires repositories and services. Pure construction, no side effects.
///
/// # Errors
/// Returns an error if the cache client cannot be created from the
/// configured URL.
pub fn build_app(config: &Config, pool: DbPool) -> anyhow::Result<App> {
    let notifier = ChannelNotifier::new(&config.websocket);

    let tasks = TaskRepository::new(pool.clone());
    let conversations = ConversationRepository::new(pool.clone());
    let messages = MessageRepository::new(pool.clone());

    let cache = RedisCache::new(&config.cache, "taskbazaar:")?;

    let notifier_seam: Arc<dyn crate::services::realtime::Notifier> = Arc::clone(&notifier) as _;

    let conversation_service = ConversationService::new(
        tasks.clone(),
        conversations.clone(),
        messages.clone(),
        Arc::clone(&notifier_seam),
    );
    let message_service =
        MessageService::new(pool.clone(), conversations, messages, notifier_seam, config.messaging.clone());
    let task_service = TaskService::new(tasks.clone());
    let bid_service = BidService::new(BidRepository::new(pool.clone()), tasks.clone());
    let payment_service = PaymentService::new(PaymentRepository::new(pool.clone()), tasks.clone());
    let review_service = ReviewService::new(ReviewRepository::new(pool.clone()), tasks);
    let user_service = UserService::new(UserRepository::new(pool.clone()));
    let catalog_service = CatalogService::new(CatalogRepository::new(pool.clone()));

    let health_service = HealthService::new(pool, cache.clone());

    Ok(App {
        services: ServiceContainer {
            conversation_service,
            message_service,
            task_service,
            bid_service,
            payment_service,
            review_service,
            user_service,
            catalog_service,
            cache,
            notifier: Arc::clone(&notifier),
        },
        health_service,
        notifier,
    })
}

/// Flips the shutdown flag on SIGINT or SIGTERM.
pub fn spawn_signal_handler(shutdown_tx: watch::Sender<bool>) {
    tokio::spawn(async move {
        let ctrl_c = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            }
        };

        #[cfg(unix)]
        let terminate = async {
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(mut signal) => {
                    signal.recv().await;
                }
                Err(e) => tracing::error!(error = %e, "Failed to install SIGTERM handler"),
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            () = ctrl_c => {}
            () = terminate => {}
        }

        tracing::info!("Shutdown signal received");
        let _ = shutdown_tx.send(true);
    });
}
