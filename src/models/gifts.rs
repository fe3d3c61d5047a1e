use serde::{Deserialize, Serialize};

use crate::models::charges::ChargeTicket;

#[derive(Clone, Debug, Deserialize, Serialize, sqlx::FromRow)]
pub struct Gift {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub price_in_cents: i64,
    pub reserved: bool,
    pub reserved_by: Option<String>,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewGift {
    pub title: String,
    pub description: Option<String>,
    pub price_in_cents: i64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct GiftReservation {
    pub guest_name: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct GiftReserved {
    pub gift: Gift,
    pub charge: ChargeTicket,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::charges::tests::test_charge;
    use serde_json::json;

    #[test]
    fn new_gift_description_is_optional() {
        let req: NewGift =
            serde_json::from_value(json!({ "title": "Toaster", "price_in_cents": 5000 }))
                .unwrap();
        assert_eq!(req.title, "Toaster");
        assert_eq!(req.description, None);
        assert_eq!(req.price_in_cents, 5000);
    }

    #[test]
    fn reservation_requires_guest_name() {
        let req: GiftReservation =
            serde_json::from_value(json!({ "guest_name": "Alice" })).unwrap();
        assert_eq!(req.guest_name, "Alice");

        assert!(serde_json::from_value::<GiftReservation>(json!({})).is_err());
    }

    #[test]
    fn reserved_gift_serializes_gift_and_charge() {
        let epoch = chrono::DateTime::from_timestamp(0, 0).unwrap().naive_utc();
        let reserved = GiftReserved {
            gift: Gift {
                id: "gift-1".to_string(),
                title: "Toaster".to_string(),
                description: None,
                price_in_cents: 5000,
                reserved: true,
                reserved_by: Some("Alice".to_string()),
                created_at: epoch,
                updated_at: epoch,
            },
            charge: ChargeTicket {
                charge: test_charge(),
                qr_png_base64: "iVBORw0KGgo=".to_string(),
            },
        };

        let value = serde_json::to_value(&reserved).unwrap();
        assert_eq!(value["gift"]["reserved"], true);
        assert_eq!(value["gift"]["reserved_by"], "Alice");
        assert_eq!(value["charge"]["charge"]["gift_id"], "gift-1");
        assert_eq!(value["charge"]["qr_png_base64"], "iVBORw0KGgo=");
    }
}
