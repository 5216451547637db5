//! Listing copy endpoint
//!
//! POST /api/listing-copy - generate a title and descriptions for a listing
//! GET  /api/listing-copy - static service description

use axum::{
    body::{to_bytes, Body, Bytes},
    extract::{DefaultBodyLimit, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tracing::{error, info, info_span, warn, Instrument};
use uuid::Uuid;

use super::{fatal_response, AppState};
use crate::compose::{compose, ResponsePayload};
use crate::listing::{normalize, parse_body};

/// Route of the generation endpoint
pub const LISTING_COPY_PATH: &str = "/api/listing-copy";

/// Build the listing copy router
pub fn router() -> Router<AppState> {
    Router::new()
        .route(LISTING_COPY_PATH, get(describe).post(generate))
        .layer(DefaultBodyLimit::disable())
}

/// Service description
#[derive(Debug, Serialize)]
struct ServiceDescription {
    name: &'static str,
    path: &'static str,
    usage: &'static str,
}

async fn describe() -> impl IntoResponse {
    Json(ServiceDescription {
        name: "listing-copy",
        path: LISTING_COPY_PATH,
        usage: "POST JSON { title, address, price, bedrooms|rooms, bathrooms, area, notes, \
                images: [url], style: both|business|emotional, mode: title|descriptions|all, \
                length: short|medium|long, useImages: bool, lang: en|ru } to receive \
                { ok, source, llm_status, llm_error?, title, texts: { business, emotional } }",
    })
}

/// Generate listing copy
///
/// The body is read as raw bytes so that a malformed, missing or oversized
/// JSON body degrades to defaults instead of being rejected by an extractor.
async fn generate(State(state): State<AppState>, body: Body) -> Response {
    let request_id = Uuid::new_v4();
    let span = info_span!("listing_copy", %request_id);

    async move {
        let body = read_body(body, state.config.max_body_bytes).await;
        let fields = parse_body(&body);
        let input = normalize(&fields, &state.normalize);
        let outcome = state.llm.generate(&input).await;
        let payload = compose(&input, &outcome);

        info!(
            source = payload.source.as_str(),
            llm_status = %payload.llm_status,
            mode = ?input.mode,
            style = ?input.style,
            "listing copy ready"
        );
        payload_response(&payload)
    }
    .instrument(span)
    .await
}

/// Buffer the request body, yielding nothing when it is unreadable or too large
async fn read_body(body: Body, limit: usize) -> Bytes {
    match to_bytes(body, limit).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(error = %e, limit, "unreadable request body, using defaults");
            Bytes::new()
        }
    }
}

fn payload_response(payload: &ResponsePayload) -> Response {
    match serde_json::to_vec(payload) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "failed to serialize listing copy");
            fatal_response()
        }
    }
}
