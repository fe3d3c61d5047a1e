use crate::models::charges::Charge;

use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct ChargeRepository {
    conn: PgPool,
}

impl ChargeRepository {
    pub fn new(conn: PgPool) -> Self {
        Self { conn }
    }

    pub async fn insert_charge(
        &self,
        gift_id: Option<&str>,
        txid: &str,
        amount_in_cents: i64,
        brcode: &str,
    ) -> Result<Charge, anyhow::Error> {
        let charge_id = Uuid::new_v4().hyphenated().to_string();

        let charge = sqlx::query_as::<_, Charge>(
            r#"
            INSERT INTO charges (id, gift_id, txid, amount_in_cents, brcode, status)
            VALUES ($1, $2, $3, $4, $5, 'pending')
            RETURNING *
            "#,
        )
        .bind(&charge_id)
        .bind(gift_id)
        .bind(txid)
        .bind(amount_in_cents)
        .bind(brcode)
        .fetch_one(&self.conn)
        .await?;

        Ok(charge)
    }

    pub async fn get_charge(&self, charge_id: &str) -> Result<Option<Charge>, anyhow::Error> {
        let charge = sqlx::query_as::<_, Charge>("SELECT * FROM charges WHERE id = $1")
            .bind(charge_id)
            .fetch_optional(&self.conn)
            .await?;

        Ok(charge)
    }

    /// `None` means no charge with that id; transport and database failures
    /// stay in the error channel.
    pub async fn update_charge_status(
        &self,
        charge_id: &str,
        status: &str,
    ) -> Result<Option<Charge>, anyhow::Error> {
        let charge = sqlx::query_as::<_, Charge>(
            r#"
            UPDATE charges
            SET status = $1, updated_at = CURRENT_TIMESTAMP
            WHERE id = $2
            RETURNING *
            "#,
        )
        .bind(status)
        .bind(charge_id)
        .fetch_optional(&self.conn)
        .await?;

        Ok(charge)
    }
}
