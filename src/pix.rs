//! Static PIX BR Code generation (EMV Merchant Presented Mode).
//!
//! The payload is a flat tag-length-value string: two-digit tag, two-digit
//! decimal byte length, value. Templates (merchant account info, additional
//! data) are TLV blocks nested inside an outer field. The CRC16 is computed
//! over the whole payload including the trailing `6304` tag/length pair.

use uuid::Uuid;

pub mod qr;

const PIX_GUI: &str = "BR.GOV.BCB.PIX";
const DEFAULT_TXID: &str = "***";

const MAX_NAME_LEN: usize = 25;
const MAX_CITY_LEN: usize = 15;
const MAX_DESCRIPTION_LEN: usize = 25;
const MAX_TXID_LEN: usize = 25;

/// Input for a static BR Code. Over-length merchant fields are silently
/// truncated at their byte limits, matching what payment apps were tested
/// against; the encoder never rejects input.
#[derive(Clone, Debug, Default)]
pub struct BrCode {
    /// Passed through verbatim, no format validation. TLV lengths are two
    /// decimal digits, so the merchant account template (GUI + key +
    /// description) must stay under 100 bytes; real PIX keys (phone, email,
    /// CPF/CNPJ, 36-char random key) all fit.
    pub pix_key: String,
    pub merchant_name: String,
    pub merchant_city: String,
    /// Amount in cents of BRL. Zero or negative emits an open-amount code
    /// (tag 54 omitted entirely).
    pub amount_in_cents: i64,
    /// Transaction id, at most 25 bytes. `None` or empty falls back to the
    /// `***` placeholder required by tag 62.
    pub transaction_id: Option<String>,
    /// Optional reference shown to the payer, embedded in the merchant
    /// account template (tag 26, sub-tag 02).
    pub description: Option<String>,
}

impl BrCode {
    /// Renders the copy-paste payload. Deterministic for identical input.
    pub fn encode(&self) -> String {
        let mut payload = String::new();
        payload.push_str(&field("00", "01"));

        let mut account = field("00", PIX_GUI);
        account.push_str(&field("01", &self.pix_key));
        if let Some(description) = self.description.as_deref() {
            if !description.is_empty() {
                account.push_str(&field("02", truncate(description, MAX_DESCRIPTION_LEN)));
            }
        }
        payload.push_str(&field("26", &account));

        payload.push_str(&field("52", "0000"));
        payload.push_str(&field("53", "986"));
        if self.amount_in_cents > 0 {
            payload.push_str(&field("54", &format_amount(self.amount_in_cents)));
        }
        payload.push_str(&field("58", "BR"));
        payload.push_str(&field("59", truncate(&self.merchant_name, MAX_NAME_LEN)));
        payload.push_str(&field("60", truncate(&self.merchant_city, MAX_CITY_LEN)));

        let txid = self
            .transaction_id
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TXID);
        payload.push_str(&field("62", &field("05", truncate(txid, MAX_TXID_LEN))));

        // The CRC tag and its length are part of the checksummed bytes.
        payload.push_str("6304");
        let crc = crc16_ccitt(payload.as_bytes());
        payload.push_str(&format!("{:04X}", crc));

        payload
    }
}

/// Mints a transaction id that fits tag 62/05: a v4 uuid without hyphens,
/// cut to the 25-byte limit. Uniqueness across concurrent charges is the
/// caller's concern, not the encoder's.
pub fn mint_txid() -> String {
    let uuid = Uuid::new_v4().simple().to_string();
    uuid[..MAX_TXID_LEN].to_string()
}

fn field(id: &str, value: &str) -> String {
    format!("{}{:02}{}", id, value.len(), value)
}

fn format_amount(amount_in_cents: i64) -> String {
    format!("{}.{:02}", amount_in_cents / 100, amount_in_cents % 100)
}

fn truncate(value: &str, max_len: usize) -> &str {
    if value.len() <= max_len {
        return value;
    }
    let mut end = max_len;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}

/// CRC-16/CCITT-FALSE: poly 0x1021, init 0xFFFF, no reflection.
fn crc16_ccitt(data: &[u8]) -> u16 {
    let mut crc: u16 = 0xFFFF;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            if crc & 0x8000 != 0 {
                crc = (crc << 1) ^ 0x1021;
            } else {
                crc <<= 1;
            }
        }
    }
    crc
}
