use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use slotswap_core::swaps;
use slotswap_types::api::{
    Claims, RequestSwapRequest, RespondSwapRequest, SwapDetails, SwappableSlot,
};
use slotswap_types::models::Swap;

use crate::auth::AppState;
use crate::error::{ApiResult, join_error};

pub async fn request_swap(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<RequestSwapRequest>,
) -> ApiResult<impl IntoResponse> {
    let swap = tokio::task::spawn_blocking(move || {
        swaps::request_swap(&state.db, claims.sub, req.event_id, req.target_event_id)
    })
    .await
    .map_err(join_error)??;

    Ok((StatusCode::CREATED, Json(swap)))
}

pub async fn respond_swap(
    State(state): State<AppState>,
    Path(swap_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<RespondSwapRequest>,
) -> ApiResult<Json<Swap>> {
    let swap = tokio::task::spawn_blocking(move || {
        swaps::respond_swap(&state.db, claims.sub, swap_id, req.accept)
    })
    .await
    .map_err(join_error)??;

    Ok(Json(swap))
}

pub async fn list_swappable(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Json<Vec<SwappableSlot>>> {
    let slots = tokio::task::spawn_blocking(move || swaps::list_swappable(&state.db, claims.sub))
        .await
        .map_err(join_error)??;

    Ok(Json(slots))
}

pub async fn list_incoming(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Json<Vec<SwapDetails>>> {
    let swaps = tokio::task::spawn_blocking(move || swaps::list_incoming(&state.db, claims.sub))
        .await
        .map_err(join_error)??;

    Ok(Json(swaps))
}

pub async fn list_outgoing(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> ApiResult<Json<Vec<SwapDetails>>> {
    let swaps = tokio::task::spawn_blocking(move || swaps::list_outgoing(&state.db, claims.sub))
        .await
        .map_err(join_error)??;

    Ok(Json(swaps))
}
