use axum::{
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tokio::sync::mpsc;
use tower_http::trace::TraceLayer;

use super::charges::ChargeServiceRequest;
use super::gifts::GiftRequest;
use super::ServiceError;

mod charges;
mod gifts;

#[derive(Clone)]
struct AppState {
    charge_channel: mpsc::Sender<ChargeServiceRequest>,
    gift_channel: mpsc::Sender<GiftRequest>,
}

fn error_response(error: ServiceError) -> (StatusCode, Json<serde_json::Value>) {
    let status = match error {
        ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
        ServiceError::Conflict(_) => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    (
        status,
        Json(serde_json::json!({ "error": error.to_string() })),
    )
}

pub async fn start_http_server(
    listen_address: &str,
    charge_channel: mpsc::Sender<ChargeServiceRequest>,
    gift_channel: mpsc::Sender<GiftRequest>,
) -> Result<(), anyhow::Error> {
    let app_state = AppState {
        charge_channel,
        gift_channel,
    };

    let app = Router::new()
        .route("/api/gifts", post(gifts::create_gift).get(gifts::list_gifts))
        .route("/api/gifts/{id}", get(gifts::get_gift))
        .route("/api/gifts/{id}/reserve", post(gifts::reserve_gift))
        .route("/api/charges", post(charges::create_charge))
        .route("/api/charges/{id}", get(charges::get_charge))
        .route("/api/charges/{id}/status", put(charges::update_charge_status))
        .route("/health", get(|| async { "OK" }))
        .with_state(app_state)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(listen_address).await?;
    log::info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_status_codes() {
        let (status, _) = error_response(ServiceError::NotFound("gift".to_string()));
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = error_response(ServiceError::Conflict("taken".to_string()));
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, _) = error_response(ServiceError::Database("down".to_string()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        let (status, _) = error_response(ServiceError::Encoding("too long".to_string()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn error_body_carries_the_message() {
        let (_, Json(body)) = error_response(ServiceError::Conflict("Gift already reserved: g1".to_string()));
        assert_eq!(body["error"], "Conflict: Gift already reserved: g1");
    }
}
