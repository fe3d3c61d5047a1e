use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Serialize, sqlx::FromRow)]
pub struct Charge {
    pub id: String,
    pub gift_id: Option<String>,
    pub txid: String,
    pub amount_in_cents: i64,
    pub brcode: String,
    pub status: String,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewCharge {
    /// Omitted or zero produces an open-amount code.
    pub amount_in_cents: Option<i64>,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ChargeStatusUpdate {
    pub status: String,
}

/// What the payer gets back: the persisted charge plus the rendered QR image.
/// The PNG is not stored, only the copy-paste payload is.
#[derive(Clone, Debug, Serialize)]
pub struct ChargeTicket {
    pub charge: Charge,
    pub qr_png_base64: String,
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;

    pub(crate) fn test_charge() -> Charge {
        let epoch = chrono::DateTime::from_timestamp(0, 0).unwrap().naive_utc();

        Charge {
            id: "charge-1".to_string(),
            gift_id: Some("gift-1".to_string()),
            txid: "abc123".to_string(),
            amount_in_cents: 5000,
            brcode: "000201".to_string(),
            status: "pending".to_string(),
            created_at: epoch,
            updated_at: epoch,
        }
    }

    #[test]
    fn new_charge_without_amount_is_open_amount() {
        let req: NewCharge = serde_json::from_value(json!({})).unwrap();
        assert_eq!(req.amount_in_cents, None);
        assert_eq!(req.description, None);

        let req: NewCharge =
            serde_json::from_value(json!({ "amount_in_cents": 1000, "description": "Gift" }))
                .unwrap();
        assert_eq!(req.amount_in_cents, Some(1000));
        assert_eq!(req.description.as_deref(), Some("Gift"));
    }

    #[test]
    fn charge_status_update_requires_status() {
        let req: ChargeStatusUpdate =
            serde_json::from_value(json!({ "status": "paid" })).unwrap();
        assert_eq!(req.status, "paid");

        assert!(serde_json::from_value::<ChargeStatusUpdate>(json!({})).is_err());
    }

    #[test]
    fn charge_ticket_serializes_payload_and_image() {
        let ticket = ChargeTicket {
            charge: test_charge(),
            qr_png_base64: "iVBORw0KGgo=".to_string(),
        };

        let value = serde_json::to_value(&ticket).unwrap();
        assert_eq!(value["charge"]["txid"], "abc123");
        assert_eq!(value["charge"]["brcode"], "000201");
        assert_eq!(value["charge"]["amount_in_cents"], 5000);
        assert_eq!(value["charge"]["status"], "pending");
        assert_eq!(value["qr_png_base64"], "iVBORw0KGgo=");
    }
}
