use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use tokio::sync::oneshot;

use super::{error_response, AppState};
use crate::models::charges::{ChargeStatusUpdate, NewCharge};
use crate::services::charges::ChargeServiceRequest;

pub async fn create_charge(
    State(state): State<AppState>,
    Json(req): Json<NewCharge>,
) -> impl IntoResponse {
    let (charge_tx, charge_rx) = oneshot::channel();

    let send_result = state
        .charge_channel
        .send(ChargeServiceRequest::CreateCharge {
            gift_id: None,
            amount_in_cents: req.amount_in_cents,
            description: req.description,
            response: charge_tx,
        })
        .await;

    if let Err(e) = send_result {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("Failed to process request: {}", e) })),
        );
    }

    match charge_rx.await {
        Ok(Ok(ticket)) => (StatusCode::CREATED, Json(json!(ticket))),
        Ok(Err(service_error)) => error_response(service_error),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("Failed to receive response: {}", e) })),
        ),
    }
}

pub async fn get_charge(
    State(state): State<AppState>,
    Path(charge_id): Path<String>,
) -> impl IntoResponse {
    let (charge_tx, charge_rx) = oneshot::channel();

    let send_result = state
        .charge_channel
        .send(ChargeServiceRequest::GetCharge {
            id: charge_id.clone(),
            response: charge_tx,
        })
        .await;

    if let Err(e) = send_result {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("Failed to process request: {}", e) })),
        );
    }

    match charge_rx.await {
        Ok(Ok(Some(charge))) => (StatusCode::OK, Json(json!(charge))),
        Ok(Ok(None)) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("Charge not found: {}", charge_id) })),
        ),
        Ok(Err(service_error)) => error_response(service_error),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("Failed to receive response: {}", e) })),
        ),
    }
}

pub async fn update_charge_status(
    State(state): State<AppState>,
    Path(charge_id): Path<String>,
    Json(req): Json<ChargeStatusUpdate>,
) -> impl IntoResponse {
    let (charge_tx, charge_rx) = oneshot::channel();

    let send_result = state
        .charge_channel
        .send(ChargeServiceRequest::UpdateChargeStatus {
            id: charge_id,
            status: req.status,
            response: charge_tx,
        })
        .await;

    if let Err(e) = send_result {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("Failed to process request: {}", e) })),
        );
    }

    match charge_rx.await {
        Ok(Ok(charge)) => (StatusCode::OK, Json(json!(charge))),
        Ok(Err(service_error)) => error_response(service_error),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": format!("Failed to receive response: {}", e) })),
        ),
    }
}
