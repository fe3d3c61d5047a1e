use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use tokio::sync::oneshot;

use super::{error_response, AppState};
use crate::models::gifts::{GiftReservation, NewGift};
use crate::services::gifts::GiftRequest;

pub async fn create_gift(
    State(state): State<AppState>,
    Json(req): Json<NewGift>,
) -> impl IntoResponse {
    let (gift_tx, gift_rx) = oneshot::channel();

    let send_result = state
        .gift_channel
        .send(GiftRequest::CreateGift {
            gift: req,
            response: gift_tx,
        })
        .await;

    if let Err(e) = send_result {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("Failed to process request: {}", e) })),
        );
    }

    match gift_rx.await {
        Ok(Ok(gift)) => (StatusCode::CREATED, Json(json!(gift))),
        Ok(Err(service_error)) => error_response(service_error),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("Failed to receive response: {}", e) })),
        ),
    }
}

pub async fn list_gifts(State(state): State<AppState>) -> impl IntoResponse {
    let (gift_tx, gift_rx) = oneshot::channel();

    let send_result = state
        .gift_channel
        .send(GiftRequest::ListGifts { response: gift_tx })
        .await;

    if let Err(e) = send_result {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("Failed to process request: {}", e) })),
        );
    }

    match gift_rx.await {
        Ok(Ok(gifts)) => (StatusCode::OK, Json(json!(gifts))),
        Ok(Err(service_error)) => error_response(service_error),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("Failed to receive response: {}", e) })),
        ),
    }
}

pub async fn get_gift(
    State(state): State<AppState>,
    Path(gift_id): Path<String>,
) -> impl IntoResponse {
    let (gift_tx, gift_rx) = oneshot::channel();

    let send_result = state
        .gift_channel
        .send(GiftRequest::GetGift {
            id: gift_id.clone(),
            response: gift_tx,
        })
        .await;

    if let Err(e) = send_result {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("Failed to process request: {}", e) })),
        );
    }

    match gift_rx.await {
        Ok(Ok(Some(gift))) => (StatusCode::OK, Json(json!(gift))),
        Ok(Ok(None)) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("Gift not found: {}", gift_id) })),
        ),
        Ok(Err(service_error)) => error_response(service_error),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("Failed to receive response: {}", e) })),
        ),
    }
}

pub async fn reserve_gift(
    State(state): State<AppState>,
    Path(gift_id): Path<String>,
    Json(req): Json<GiftReservation>,
) -> impl IntoResponse {
    let (gift_tx, gift_rx) = oneshot::channel();

    let send_result = state
        .gift_channel
        .send(GiftRequest::ReserveGift {
            id: gift_id,
            guest_name: req.guest_name,
            response: gift_tx,
        })
        .await;

    if let Err(e) = send_result {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("Failed to process request: {}", e) })),
        );
    }

    match gift_rx.await {
        Ok(Ok(reserved)) => (StatusCode::CREATED, Json(json!(reserved))),
        Ok(Err(service_error)) => error_response(service_error),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("Failed to receive response: {}", e) })),
        ),
    }
}
