// src/lib.rs
use anyhow::Result;
use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use handlers::*;

// Public exports (visible outside this module)
pub mod domain;

// Internal-only exports (sibling access within this module)
mod app_state;
mod auth;
mod config;
mod handlers;
mod infrastructure;

pub use app_state::AppState;
pub use config::*;

// Publicly expose the infrastructure creation functions
pub use infrastructure::{
    connect_with_retry, // ---
    create_memory_repository,
    create_memory_session_store,
    create_noop_metrics,
    create_postgres_repository,
    create_prom_metrics,
    create_redis_session_store,
};

/// Build the HTTP router from environment configuration.
pub async fn create_router() -> Result<Router> {
    // ---
    let config = AppConfig::from_env()?;
    create_router_with_config(config).await
}

/// Build the HTTP router from an explicit configuration.
///
/// Connects the storage backends, ensures the bootstrap admin exists and
/// wires every route.
pub async fn create_router_with_config(config: AppConfig) -> Result<Router> {
    // ---
    let metrics = match config.metrics {
        MetricsKind::Prometheus => create_prom_metrics()?,
        MetricsKind::Noop => create_noop_metrics()?,
    };

    let (repository, sessions) = match &config.storage {
        StorageConfig::Memory => {
            tracing::warn!("using in-memory storage; all data is lost on restart");
            (create_memory_repository(), create_memory_session_store())
        }
        StorageConfig::Postgres { database, redis } => {
            let pool = connect_with_retry(database).await?;
            (
                create_postgres_repository(pool),
                create_redis_session_store(&redis.url)?,
            )
        }
    };

    if let Some(admin) = &config.admin {
        let created =
            domain::accounts::bootstrap_admin(repository.as_ref(), &admin.student_id, &admin.password)
                .await?;
        if created {
            tracing::info!(student_id = %admin.student_id, "bootstrap admin created");
        }
    }

    let app_state = AppState::new(metrics, repository, sessions, config.session.ttl);
    Ok(build_router(app_state, &config.server))
}

/// Route table, request metrics, CORS and request tracing.
pub fn build_router(app_state: AppState, server: &ServerConfig) -> Router {
    // ---
    let users = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/profile", get(get_profile).put(update_profile))
        .route("/check-login/{student_id}", get(check_login))
        .route("/students", get(list_students));

    let timetable = Router::new()
        .route("/", get(get_timetable).post(save_timetable))
        .route("/{id}", get(get_timetable_by_id));

    let assignment = Router::new()
        .route("/", post(assign_timetable))
        .route("/{student}", get(get_assignment));

    let attendance = Router::new()
        .route("/submit", post(submit_attendance))
        .route("/student/{student_id}", get(attendance_history))
        .route("/analytics/{student_id}", get(attendance_analytics));

    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .nest("/api/user", users)
        .nest("/api/timetable", timetable)
        .route("/api/timetables", get(list_timetables))
        .nest("/api/assignment", assignment)
        .route("/api/assignments", get(list_assignments))
        .nest("/api/attendance", attendance)
        .nest("/api/ongoing-tasks", task_routes::<OngoingBoard>())
        .nest("/api/tasks", task_routes::<CornerBoard>())
        .route_layer(middleware::from_fn_with_state(app_state.clone(), track_requests))
        .layer(cors_layer(&server.cors_origins))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(app_state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    // ---
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}
