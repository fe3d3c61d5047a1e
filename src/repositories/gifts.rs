use crate::models::gifts::{Gift, NewGift};

use sqlx::PgPool;
use uuid::Uuid;

#[derive(Clone)]
pub struct GiftRepository {
    conn: PgPool,
}

impl GiftRepository {
    pub fn new(conn: PgPool) -> Self {
        Self { conn }
    }

    pub async fn insert_gift(&self, new_gift: &NewGift) -> Result<Gift, anyhow::Error> {
        let gift_id = Uuid::new_v4().hyphenated().to_string();

        let gift = sqlx::query_as::<_, Gift>(
            r#"
            INSERT INTO gifts (id, title, description, price_in_cents)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&gift_id)
        .bind(&new_gift.title)
        .bind(&new_gift.description)
        .bind(new_gift.price_in_cents)
        .fetch_one(&self.conn)
        .await?;

        Ok(gift)
    }

    pub async fn list_gifts(&self) -> Result<Vec<Gift>, anyhow::Error> {
        let gifts = sqlx::query_as::<_, Gift>("SELECT * FROM gifts ORDER BY created_at")
            .fetch_all(&self.conn)
            .await?;

        Ok(gifts)
    }

    pub async fn get_gift(&self, gift_id: &str) -> Result<Option<Gift>, anyhow::Error> {
        let gift = sqlx::query_as::<_, Gift>("SELECT * FROM gifts WHERE id = $1")
            .bind(gift_id)
            .fetch_optional(&self.conn)
            .await?;

        Ok(gift)
    }

    /// Marks a gift reserved if it is still free. Returns `None` both when the
    /// gift does not exist and when it is already taken; the caller tells the
    /// two apart with `get_gift`.
    pub async fn reserve_gift(
        &self,
        gift_id: &str,
        guest_name: &str,
    ) -> Result<Option<Gift>, anyhow::Error> {
        let gift = sqlx::query_as::<_, Gift>(
            r#"
            UPDATE gifts
            SET reserved = true, reserved_by = $1, updated_at = CURRENT_TIMESTAMP
            WHERE id = $2 AND reserved = false
            RETURNING *
            "#,
        )
        .bind(guest_name)
        .bind(gift_id)
        .fetch_optional(&self.conn)
        .await?;

        Ok(gift)
    }

    /// Puts a gift back on the list. Used to undo a reservation whose charge
    /// could not be created.
    pub async fn release_gift(&self, gift_id: &str) -> Result<(), anyhow::Error> {
        sqlx::query(
            r#"
            UPDATE gifts
            SET reserved = false, reserved_by = NULL, updated_at = CURRENT_TIMESTAMP
            WHERE id = $1
            "#,
        )
        .bind(gift_id)
        .execute(&self.conn)
        .await?;

        Ok(())
    }
}
