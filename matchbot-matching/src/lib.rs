use std::sync::Arc;

use axum::routing::{get, post, put};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod events;
pub mod matching;
pub mod models;
pub mod routes;
pub mod schema;
pub mod store;

use config::AppConfig;
use matching::decision::DecisionEngine;
use matchbot_shared::clients::rabbitmq::RabbitMQClient;

pub use matchbot_shared::clients::db::DbPool;

pub struct AppState {
    pub db: DbPool,
    pub config: AppConfig,
    pub rabbitmq: Option<RabbitMQClient>,
    pub engine: DecisionEngine,
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(db: DbPool, config: AppConfig) -> Self {
        Self {
            db,
            config,
            rabbitmq: None,
            engine: DecisionEngine::default(),
            metrics_handle: None,
        }
    }

    pub fn with_rabbitmq(mut self, rabbitmq: RabbitMQClient) -> Self {
        self.rabbitmq = Some(rabbitmq);
        self
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::health::metrics))
        .route(
            "/profiles/:user_id",
            put(routes::profile::register_profile).get(routes::profile::get_profile),
        )
        .route(
            "/profiles/:user_id/candidates",
            get(routes::candidates::list_candidates),
        )
        .route(
            "/profiles/:user_id/candidates/top",
            get(routes::candidates::top_candidate),
        )
        .route(
            "/profiles/:user_id/decisions",
            post(routes::decisions::submit_decision),
        )
        .route("/profiles/:user_id/matches", get(routes::matches::list_matches))
        .layer(axum::middleware::from_fn(
            matchbot_shared::middleware::metrics_middleware,
        ))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
