use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use slotswap_core::events::{self, EventPatch};
use slotswap_types::api::{Claims, CreateEventRequest, UpdateEventRequest};
use slotswap_types::models::Event;

use crate::auth::AppState;
use crate::error::{ApiResult, join_error};

pub async fn create_event(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateEventRequest>,
) -> ApiResult<impl IntoResponse> {
    let event = tokio::task::spawn_blocking(move || {
        events::create_event(&state.db, claims.sub, &req.title, req.start_time, req.end_time)
    })
    .await
    .map_err(join_error)??;

    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn list_own_events(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Json<Vec<Event>>> {
    let events = tokio::task::spawn_blocking(move || events::list_own_events(&state.db, claims.sub))
        .await
        .map_err(join_error)??;

    Ok(Json(events))
}

pub async fn list_all_events(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
) -> ApiResult<Json<Vec<Event>>> {
    let events = tokio::task::spawn_blocking(move || events::list_all_events(&state.db))
        .await
        .map_err(join_error)??;

    Ok(Json(events))
}

pub async fn update_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<UpdateEventRequest>,
) -> ApiResult<Json<Event>> {
    let patch = EventPatch {
        title: req.title,
        start_time: req.start_time,
        end_time: req.end_time,
    };

    let event = tokio::task::spawn_blocking(move || {
        events::update_event(&state.db, event_id, claims.sub, patch)
    })
    .await
    .map_err(join_error)??;

    Ok(Json(event))
}

pub async fn delete_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Json<Event>> {
    let event = tokio::task::spawn_blocking(move || {
        events::delete_event(&state.db, event_id, claims.sub)
    })
    .await
    .map_err(join_error)??;

    Ok(Json(event))
}

pub async fn enable_swap(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Json<Event>> {
    let event = tokio::task::spawn_blocking(move || {
        events::enable_swap(&state.db, event_id, claims.sub)
    })
    .await
    .map_err(join_error)??;

    Ok(Json(event))
}

pub async fn disable_swap(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Json<Event>> {
    let event = tokio::task::spawn_blocking(move || {
        events::disable_swap(&state.db, event_id, claims.sub)
    })
    .await
    .map_err(join_error)??;

    Ok(Json(event))
}
