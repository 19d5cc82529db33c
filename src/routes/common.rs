//! Probe routes: liveness, store readiness, build and resource listing.

use crate::resource::ResourceKind;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
struct StoreStatus {
    backend: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    namespace: Option<String>,
    reachable: bool,
}

#[derive(Serialize)]
struct ReadyBody {
    status: &'static str,
    store: StoreStatus,
}

#[derive(Serialize)]
struct AboutBody {
    service: &'static str,
    version: &'static str,
    resources: Vec<&'static str>,
}

async fn live() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// 200 while the store answers a ping, 503 otherwise. Both report which store is in use.
async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    let reachable = match state.store.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, backend = state.store.backend(), "store unreachable");
            false
        }
    };
    let (code, status) = if reachable {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };
    let body = ReadyBody {
        status,
        store: StoreStatus {
            backend: state.store.backend(),
            namespace: state.store.namespace().map(str::to_string),
            reachable,
        },
    };
    (code, Json(body))
}

async fn about() -> Json<AboutBody> {
    Json(AboutBody {
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        resources: ResourceKind::ALL.iter().map(|k| k.path_segment()).collect(),
    })
}

/// GET /health, GET /ready (pings the store), GET /version.
pub fn common_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(live))
        .route("/ready", get(ready))
        .route("/version", get(about))
        .with_state(state)
}
