use crate::app_state::AppState;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
}

#[derive(Deserialize)]
pub struct HealthQuery {
    mode: Option<String>,
}

/// Responds with the health status of the server.
///
/// - By default only confirms that the web server is running.
/// - With `mode=full` it also round-trips to the record store and the
///   session store, answering 500 `{ "status": "error" }` if either fails.
pub async fn health_check(
    State(state): State<AppState>,
    Query(params): Query<HealthQuery>,
) -> (StatusCode, Json<HealthResponse>) {
    // ---
    if params.mode.as_deref() != Some("full") {
        return (StatusCode::OK, Json(HealthResponse { status: "ok" }));
    }

    let store = state.repository().ping().await;
    let sessions = state.sessions().ping().await;

    match (store, sessions) {
        (Ok(()), Ok(())) => (StatusCode::OK, Json(HealthResponse { status: "ok" })),
        (store, sessions) => {
            if let Err(err) = store {
                tracing::error!("store health check failed: {err:#}");
            }
            if let Err(err) = sessions {
                tracing::error!("session store health check failed: {err:#}");
            }
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthResponse { status: "error" }),
            )
        }
    }
}
