//! HTTP API module - REST endpoints

mod listing;

use std::any::Any;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, warn};

use crate::compose::FatalPayload;
use crate::listing::NormalizeOptions;
use crate::llm::LlmClient;
use crate::Config;

pub use listing::LISTING_COPY_PATH;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub llm: Arc<LlmClient>,
    pub normalize: Arc<NormalizeOptions>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let llm = LlmClient::new(&config)?;
        let normalize = NormalizeOptions::from_config(&config);

        Ok(Self {
            config: Arc::new(config),
            llm: Arc::new(llm),
            normalize: Arc::new(normalize),
        })
    }
}

/// Build the API router
pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origin);

    Router::new()
        .route("/health", get(health_check))
        .route("/", get(root))
        .merge(listing::router())
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// CORS for the configured origin list (`*` allows any origin)
fn cors_layer(origins: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let origins = origins.trim();
    if origins.is_empty() || origins == "*" {
        return layer.allow_origin(AnyOrigin);
    }

    let parsed: Vec<HeaderValue> = origins
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if parsed.is_empty() {
        warn!("no valid CORS origins configured, allowing any origin");
        return layer.allow_origin(AnyOrigin);
    }
    layer.allow_origin(AllowOrigin::list(parsed))
}

/// The unrecoverable-failure response
pub(crate) fn fatal_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(FatalPayload::default()),
    )
        .into_response()
}

fn handle_panic(_err: Box<dyn Any + Send + 'static>) -> Response {
    error!("request handler panicked");
    fatal_response()
}

/// Root endpoint
async fn root() -> impl IntoResponse {
    Json(RootResponse {
        name: "listingd",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
struct RootResponse {
    name: &'static str,
    version: &'static str,
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "healthy",
        llm: if state.llm.is_configured() {
            "configured"
        } else {
            "missing_key"
        },
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    llm: &'static str,
}
