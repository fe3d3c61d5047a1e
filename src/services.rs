use async_trait::async_trait;
use sqlx::PgPool;
use tokio::sync::mpsc;

use crate::settings::Settings;

mod charges;
mod gifts;
mod http;

#[derive(Debug, thiserror::Error)]
enum ServiceError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Repository error: {0} - {1}")]
    Repository(String, String),
    #[error("Communication error: {0} - {1}")]
    Communication(String, String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Could not generate payment code: {0}")]
    Encoding(String),
}

#[async_trait]
pub trait RequestHandler<T>: Send + Sync + 'static
where
    T: Send + 'static,
{
    async fn handle_request(&self, request: T);
}

#[async_trait]
pub trait Service<T, H>: Send + Sync + 'static
where
    T: Send + 'static,
    H: RequestHandler<T> + Clone + Send,
{
    async fn run(&mut self, handler: H, receiver: &mut mpsc::Receiver<T>) {
        while let Some(request) = receiver.recv().await {
            let handler = handler.clone();

            tokio::spawn(async move {
                handler.handle_request(request).await;
            });
        }
    }
}

pub async fn start_services(pool: PgPool, settings: Settings) -> Result<(), anyhow::Error> {
    let (charge_tx, mut charge_rx) = mpsc::channel(512);
    let (gift_tx, mut gift_rx) = mpsc::channel(512);

    let mut charge_service = charges::ChargeService::new();
    let mut gift_service = gifts::GiftService::new();

    log::info!("Starting charge service.");
    let charge_pool = pool.clone();
    let merchant = settings.merchant.clone();
    tokio::spawn(async move {
        charge_service
            .run(
                charges::ChargeRequestHandler::new(merchant, charge_pool),
                &mut charge_rx,
            )
            .await;
    });

    log::info!("Starting gift service.");
    let gift_pool = pool.clone();
    let gift_charge_tx = charge_tx.clone();
    tokio::spawn(async move {
        gift_service
            .run(
                gifts::GiftRequestHandler::new(gift_pool, gift_charge_tx),
                &mut gift_rx,
            )
            .await;
    });

    log::info!("Starting HTTP server.");
    http::start_http_server(&settings.server.listen_address, charge_tx, gift_tx).await?;

    Ok(())
}
