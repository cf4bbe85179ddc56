use crate::api::rate_limit::IpKeyExtractor;
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
use crate::storage::cache::RedisCache;
use axum::body::Body;
use axum::http::Request;
use axum::{
    Router,
    routing::{get, patch, post},
};
use std::sync::Arc;
use tower_governor::GovernorLayer;
use tower_governor::governor::GovernorConfigBuilder;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

pub mod benchmark;
pub mod bids;
pub mod catalog;
pub mod conversations;
pub mod dto;
pub mod gateway;
pub mod health;
pub mod messages;
pub mod middleware;
pub mod payments;
pub mod rate_limit;
pub mod reviews;
pub mod tasks;
pub mod users;

#[derive(Clone, Debug)]
pub struct AppState {
    pub config: Config,
    pub conversation_service: ConversationService,
    pub message_service: MessageService,
    pub task_service: TaskService,
    pub bid_service: BidService,
    pub payment_service: PaymentService,
    pub review_service: ReviewService,
    pub user_service: UserService,
    pub catalog_service: CatalogService,
    pub cache: RedisCache,
    pub notifier: Arc<ChannelNotifier>,
    pub shutdown_rx: tokio::sync::watch::Receiver<bool>,
}

#[derive(Clone, Debug)]
pub struct MgmtState {
    pub health_service: HealthService,
}

#[derive(Debug)]
pub struct ServiceContainer {
    pub conversation_service: ConversationService,
    pub message_service: MessageService,
    pub task_service: TaskService,
    pub bid_service: BidService,
    pub payment_service: PaymentService,
    pub review_service: ReviewService,
    pub user_service: UserService,
    pub catalog_service: CatalogService,
    pub cache: RedisCache,
    pub notifier: Arc<ChannelNotifier>,
}

/// Configures and returns the primary application router.
///
/// # Panics
/// Panics if the rate limiter configuration cannot be constructed.
pub fn app_router(
    config: Config,
    services: ServiceContainer,
    shutdown_rx: tokio::sync::watch::Receiver<bool>,
) -> Router {
    let interval_ns = 1_000_000_000 / config.rate_limit.per_second.max(1);
    let governor_conf = Arc::new(
        GovernorConfigBuilder::default()
            .per_nanosecond(u64::from(interval_ns))
            .burst_size(config.rate_limit.burst)
            .key_extractor(IpKeyExtractor::new(config.server.trusted_proxies.clone()))
            .finish()
            .expect("Failed to build rate limiter config"),
    );

    let state = AppState {
        config,
        conversation_service: services.conversation_service,
        message_service: services.message_service,
        task_service: services.task_service,
        bid_service: services.bid_service,
        payment_service: services.payment_service,
        review_service: services.review_service,
        user_service: services.user_service,
        catalog_service: services.catalog_service,
        cache: services.cache,
        notifier: services.notifier,
        shutdown_rx,
    };

    let api_routes = Router::new()
        .route("/conversations", get(conversations::list).post(conversations::create))
        .route("/conversations/pin", post(conversations::pin))
        .route("/conversations/by-task/{taskId}/{recipientId}", get(conversations::by_task))
        .route("/conversations/{id}", get(conversations::get))
        .route("/messages", get(messages::list).post(messages::create))
        .route("/messages/read", post(messages::mark_read))
        .route("/messages/{id}", patch(messages::update).delete(messages::delete))
        .route("/tasks", get(tasks::list).post(tasks::create))
        .route("/tasks/{id}", get(tasks::get).patch(tasks::update).delete(tasks::delete))
        .route("/bids", get(bids::list).post(bids::create))
        .route("/bids/{id}", patch(bids::update))
        .route("/payments", get(payments::list).post(payments::create))
        .route("/payments/{id}", patch(payments::update))
        .route("/reviews", get(reviews::list).post(reviews::create))
        .route("/users", get(users::list))
        .route("/users/{id}", get(users::get).patch(users::update))
        .route("/users/{id}/skills", get(users::list_skills).post(users::add_skill))
        .route("/users/{id}/skills/{skillId}", axum::routing::delete(users::remove_skill))
        .route("/categories", get(catalog::list_categories).post(catalog::create_category))
        .route("/skills", get(catalog::list_skills).post(catalog::create_skill))
        .route("/benchmark/tasks", get(benchmark::tasks))
        .route("/gateway", get(gateway::websocket_handler))
        .layer(GovernorLayer::new(governor_conf));

    Router::new()
        .nest("/api", api_routes)
        .layer(PropagateRequestIdLayer::new(axum::http::HeaderName::from_static("x-request-id")))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(move |request: &Request<Body>| {
                    let request_id = request
                        .extensions()
                        .get::<tower_http::request_id::RequestId>()
                        .map(|id| id.header_value().to_str().unwrap_or_default())
                        .unwrap_or_default()
                        .to_string();

                    tracing::info_span!(
                        "request",
                        "request_id" = %request_id,
                        "http.request.method" = %request.method(),
                        "url.path" = %request.uri().path(),
                        "http.response.status_code" = tracing::field::Empty,
                        "user_id" = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: std::time::Duration, _span: &tracing::Span| {
                        let status = response.status();
                        tracing::Span::current().record("http.response.status_code", status.as_u16());

                        tracing::info!(
                            latency_ms = %latency.as_millis(),
                            status = %status.as_u16(),
                            "request completed"
                        );
                    },
                )
                .on_failure(|error, _latency, _span: &tracing::Span| {
                    tracing::error!(error = %error, "request failed");
                }),
        )
        .layer(SetRequestIdLayer::new(
            axum::http::HeaderName::from_static("x-request-id"),
            middleware::MakeRequestUuidOrHeader,
        ))
        .with_state(state)
}

pub fn mgmt_router(state: MgmtState) -> Router {
    Router::new().route("/livez", get(health::livez)).route("/readyz", get(health::readyz)).with_state(state)
}
