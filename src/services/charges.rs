use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use sqlx::PgPool;
use tokio::sync::oneshot;

use super::{RequestHandler, Service, ServiceError};
use crate::models::charges::{Charge, ChargeTicket};
use crate::pix;
use crate::repositories::charges::ChargeRepository;
use crate::settings::Merchant;

pub enum ChargeServiceRequest {
    CreateCharge {
        gift_id: Option<String>,
        amount_in_cents: Option<i64>,
        description: Option<String>,
        response: oneshot::Sender<Result<ChargeTicket, ServiceError>>,
    },
    GetCharge {
        id: String,
        response: oneshot::Sender<Result<Option<Charge>, ServiceError>>,
    },
    UpdateChargeStatus {
        id: String,
        status: String,
        response: oneshot::Sender<Result<Charge, ServiceError>>,
    },
}

#[derive(Clone)]
pub struct ChargeRequestHandler {
    repository: ChargeRepository,
    merchant: Merchant,
}

impl ChargeRequestHandler {
    pub fn new(merchant: Merchant, pool: PgPool) -> Self {
        let repository = ChargeRepository::new(pool);

        ChargeRequestHandler {
            repository,
            merchant,
        }
    }

    async fn create_charge(
        &self,
        gift_id: Option<String>,
        amount_in_cents: Option<i64>,
        description: Option<String>,
    ) -> Result<ChargeTicket, ServiceError> {
        let txid = pix::mint_txid();
        let amount_in_cents = amount_in_cents.unwrap_or(0);

        let brcode = pix::BrCode {
            pix_key: self.merchant.pix_key.clone(),
            merchant_name: self.merchant.name.clone(),
            merchant_city: self.merchant.city.clone(),
            amount_in_cents,
            transaction_id: Some(txid.clone()),
            description,
        }
        .encode();

        let qr_png =
            pix::qr::render_png(&brcode).map_err(|e| ServiceError::Encoding(e.to_string()))?;

        let charge = self
            .repository
            .insert_charge(gift_id.as_deref(), &txid, amount_in_cents, &brcode)
            .await
            .map_err(|e| ServiceError::Repository("Charge".to_string(), e.to_string()))?;

        Ok(ChargeTicket {
            charge,
            qr_png_base64: BASE64.encode(qr_png),
        })
    }

    async fn get_charge(&self, id: &str) -> Result<Option<Charge>, ServiceError> {
        self.repository
            .get_charge(id)
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))
    }

    async fn update_charge_status(&self, id: &str, status: &str) -> Result<Charge, ServiceError> {
        let charge = self
            .repository
            .update_charge_status(id, status)
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))?;

        match charge {
            Some(charge) => Ok(charge),
            None => Err(ServiceError::NotFound(format!("Charge not found: {}", id))),
        }
    }
}

#[async_trait]
impl RequestHandler<ChargeServiceRequest> for ChargeRequestHandler {
    async fn handle_request(&self, request: ChargeServiceRequest) {
        match request {
            ChargeServiceRequest::CreateCharge {
                gift_id,
                amount_in_cents,
                description,
                response,
            } => {
                let ticket = self
                    .create_charge(gift_id, amount_in_cents, description)
                    .await;
                let _ = response.send(ticket);
            }
            ChargeServiceRequest::GetCharge { id, response } => {
                let charge = self.get_charge(&id).await;
                let _ = response.send(charge);
            }
            ChargeServiceRequest::UpdateChargeStatus {
                id,
                status,
                response,
            } => {
                let charge = self.update_charge_status(&id, &status).await;
                let _ = response.send(charge);
            }
        }
    }
}

pub struct ChargeService;

impl ChargeService {
    pub fn new() -> Self {
        ChargeService {}
    }
}

#[async_trait]
impl Service<ChargeServiceRequest, ChargeRequestHandler> for ChargeService {}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    fn unreachable_handler() -> ChargeRequestHandler {
        // Lazy pool pointed at a closed port: queries fail at call time
        // without a database in the loop.
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost:1/presenteio")
            .unwrap();
        let merchant = Merchant {
            pix_key: "11999999999".to_string(),
            name: "JOHN DOE".to_string(),
            city: "SAO PAULO".to_string(),
        };

        ChargeRequestHandler::new(merchant, pool)
    }

    #[tokio::test]
    async fn database_failure_is_not_reported_as_missing_charge() {
        let handler = unreachable_handler();

        let result = handler.update_charge_status("some-id", "paid").await;
        assert!(matches!(result, Err(ServiceError::Database(_))));
    }
}
