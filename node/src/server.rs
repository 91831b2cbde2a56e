// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{Path, Request as AxumRequest, State};
use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use axum::middleware::{from_fn_with_state, Next};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use futures::stream::Stream;
use paystream_kernel::projection::{ProjectedState, RateBreakdown};
use paystream_kernel::types::StreamId;
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;
use tower_http::cors::CorsLayer;

use crate::api::{ObserveResponse, QuarterSummary, StreamsResponse};
use crate::errors::EngineError;
use crate::session::Session;

pub type SharedSession = Arc<Session>;

async fn auth_guard(
    State(token): State<Arc<String>>,
    req: AxumRequest,
    next: Next,
) -> Result<Response, StatusCode> {
    let provided = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|val| val.to_str().ok())
        .and_then(|val| val.strip_prefix("Bearer "));

    match provided {
        Some(provided) if provided == token.as_str() => Ok(next.run(req).await),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

pub fn build_router(state: SharedSession, auth_token: Option<String>) -> Router {
    let mut app = Router::new()
        .route("/v1/streams", get(list_streams))
        .route(
            "/v1/streams/:id",
            get(get_stream).put(observe_stream).delete(unobserve_stream),
        )
        .route("/v1/streams/:id/rates", get(get_rates))
        .route("/v1/roster", get(get_roster))
        .route("/v1/quarter", get(get_quarter))
        .route("/v1/ticks", get(tick_events))
        // Observability
        .route("/metrics", get(metrics_handler))
        .with_state(state);

    if let Some(token) = auth_token {
        tracing::info!("Auth Enabled: Bearer token required");
        app = app.layer(from_fn_with_state(Arc::new(token), auth_guard));
    } else {
        tracing::warn!("Auth Disabled: No token configured");
    }

    app.layer(CorsLayer::permissive())
}

async fn list_streams(State(session): State<SharedSession>) -> Json<StreamsResponse> {
    let frame = session.scheduler().current_frame();
    Json(StreamsResponse {
        at: frame.at,
        streams: frame.streams,
    })
}

/// Unknown streams answer with the uninitialized placeholder, not 404.
async fn get_stream(State(session): State<SharedSession>, Path(id): Path<String>) -> Json<ProjectedState> {
    Json(session.projector().project(&StreamId::from(id), session.now()))
}

async fn get_rates(
    State(session): State<SharedSession>,
    Path(id): Path<String>,
) -> Result<Json<RateBreakdown>, EngineError> {
    let stream_id = StreamId::from(id);
    session
        .projector()
        .rates(&stream_id)
        .map(Json)
        .ok_or_else(|| EngineError::NotFound(format!("No snapshot for stream {stream_id}")))
}

async fn observe_stream(
    State(session): State<SharedSession>,
    Path(id): Path<String>,
) -> Result<Json<ObserveResponse>, EngineError> {
    let stream_id = StreamId::from(id);
    let changed = session.observe(stream_id.clone())?;
    Ok(Json(ObserveResponse {
        stream_id,
        observed: true,
        changed,
    }))
}

async fn unobserve_stream(
    State(session): State<SharedSession>,
    Path(id): Path<String>,
) -> Result<Json<ObserveResponse>, EngineError> {
    let stream_id = StreamId::from(id);
    let changed = session.unobserve(&stream_id).await?;
    Ok(Json(ObserveResponse {
        stream_id,
        observed: false,
        changed,
    }))
}

async fn get_roster(State(session): State<SharedSession>) -> Json<Vec<ProjectedState>> {
    Json(session.projector().project_active_roster(session.now()))
}

async fn get_quarter(State(session): State<SharedSession>) -> Json<QuarterSummary> {
    Json(session.quarter_summary())
}

/// Tick frames as server-sent events. A lagging client skips frames rather than stalling the tick.
async fn tick_events(
    State(session): State<SharedSession>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let frames = BroadcastStream::new(session.scheduler().subscribe())
        .filter_map(|frame| frame.ok())
        .filter_map(|frame| Event::default().event("tick").json_data(frame).ok())
        .map(Ok);

    Sse::new(frames).keep_alive(KeepAlive::default())
}

async fn metrics_handler() -> String {
    crate::telemetry::get_metrics()
}
