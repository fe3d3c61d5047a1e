use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::{mpsc, oneshot};

use super::charges::ChargeServiceRequest;
use super::{RequestHandler, Service, ServiceError};
use crate::models::charges::ChargeTicket;
use crate::models::gifts::{Gift, GiftReserved, NewGift};
use crate::repositories::gifts::GiftRepository;

pub enum GiftRequest {
    CreateGift {
        gift: NewGift,
        response: oneshot::Sender<Result<Gift, ServiceError>>,
    },
    ListGifts {
        response: oneshot::Sender<Result<Vec<Gift>, ServiceError>>,
    },
    GetGift {
        id: String,
        response: oneshot::Sender<Result<Option<Gift>, ServiceError>>,
    },
    ReserveGift {
        id: String,
        guest_name: String,
        response: oneshot::Sender<Result<GiftReserved, ServiceError>>,
    },
}

#[derive(Clone)]
pub struct GiftRequestHandler {
    repository: GiftRepository,
    charge_channel: mpsc::Sender<ChargeServiceRequest>,
}

impl GiftRequestHandler {
    pub fn new(pool: PgPool, charge_channel: mpsc::Sender<ChargeServiceRequest>) -> Self {
        let repository = GiftRepository::new(pool);

        GiftRequestHandler {
            repository,
            charge_channel,
        }
    }

    async fn create_gift(&self, gift: NewGift) -> Result<Gift, ServiceError> {
        self.repository
            .insert_gift(&gift)
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))
    }

    async fn list_gifts(&self) -> Result<Vec<Gift>, ServiceError> {
        self.repository
            .list_gifts()
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))
    }

    async fn get_gift(&self, id: &str) -> Result<Option<Gift>, ServiceError> {
        self.repository
            .get_gift(id)
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))
    }

    /// Takes the gift for a guest and opens a charge for its price. The gift
    /// title rides in the BR Code description so the payer sees what they are
    /// paying for.
    async fn reserve_gift(&self, id: &str, guest_name: &str) -> Result<GiftReserved, ServiceError> {
        let gift = self
            .repository
            .reserve_gift(id, guest_name)
            .await
            .map_err(|e| ServiceError::Database(e.to_string()))?;

        let gift = match gift {
            Some(gift) => gift,
            None => {
                let existing = self.get_gift(id).await?;

                return match existing {
                    Some(_) => Err(ServiceError::Conflict(format!(
                        "Gift already reserved: {}",
                        id
                    ))),
                    None => Err(ServiceError::NotFound(format!("Gift not found: {}", id))),
                };
            }
        };

        match self.open_charge_for(&gift).await {
            Ok(charge) => Ok(GiftReserved { gift, charge }),
            Err(charge_error) => {
                // Put the gift back so the next guest can still take it.
                if let Err(release_error) = self.repository.release_gift(&gift.id).await {
                    log::error!(
                        "Could not release gift {} after charge failure: {}",
                        gift.id,
                        release_error
                    );
                }

                Err(charge_error)
            }
        }
    }

    async fn open_charge_for(&self, gift: &Gift) -> Result<ChargeTicket, ServiceError> {
        let (charge_tx, charge_rx) = oneshot::channel();
        self.charge_channel
            .send(ChargeServiceRequest::CreateCharge {
                gift_id: Some(gift.id.clone()),
                amount_in_cents: Some(gift.price_in_cents),
                description: Some(gift.title.clone()),
                response: charge_tx,
            })
            .await
            .map_err(|e| ServiceError::Communication("Gift => Charge".to_string(), e.to_string()))?;

        charge_rx
            .await
            .map_err(|e| ServiceError::Communication("Charge => Gift".to_string(), e.to_string()))?
    }
}

#[async_trait]
impl RequestHandler<GiftRequest> for GiftRequestHandler {
    async fn handle_request(&self, request: GiftRequest) {
        match request {
            GiftRequest::CreateGift { gift, response } => {
                let gift = self.create_gift(gift).await;
                let _ = response.send(gift);
            }
            GiftRequest::ListGifts { response } => {
                let gifts = self.list_gifts().await;
                let _ = response.send(gifts);
            }
            GiftRequest::GetGift { id, response } => {
                let gift = self.get_gift(&id).await;
                let _ = response.send(gift);
            }
            GiftRequest::ReserveGift {
                id,
                guest_name,
                response,
            } => {
                let reserved = self.reserve_gift(&id, &guest_name).await;
                let _ = response.send(reserved);
            }
        }
    }
}

pub struct GiftService;

impl GiftService {
    pub fn new() -> Self {
        GiftService {}
    }
}

#[async_trait]
impl Service<GiftRequest, GiftRequestHandler> for GiftService {}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::postgres::PgPoolOptions;

    fn test_gift() -> Gift {
        let epoch = chrono::DateTime::from_timestamp(0, 0).unwrap().naive_utc();

        Gift {
            id: "gift-1".to_string(),
            title: "Toaster".to_string(),
            description: None,
            price_in_cents: 5000,
            reserved: true,
            reserved_by: Some("Alice".to_string()),
            created_at: epoch,
            updated_at: epoch,
        }
    }

    #[tokio::test]
    async fn charge_failure_surfaces_instead_of_hanging_the_reservation() {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost:1/presenteio")
            .unwrap();
        // Receiver dropped right away: every charge request fails, the same
        // branch a QR or insert failure lands on.
        let (charge_tx, _) = mpsc::channel(1);
        let handler = GiftRequestHandler::new(pool, charge_tx);

        let result = handler.open_charge_for(&test_gift()).await;
        assert!(matches!(result, Err(ServiceError::Communication(_, _))));
    }
}
