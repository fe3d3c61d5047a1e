use std::io::Cursor;

use image::{ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};

const QR_WIDTH: u32 = 512;

/// Rasterizes a BR Code payload to a PNG at error-correction level M.
/// Fails if the payload exceeds the QR version space.
pub fn render_png(payload: &str) -> Result<Vec<u8>, anyhow::Error> {
    let code = QrCode::with_error_correction_level(payload, EcLevel::M)?;
    let img = code
        .render::<Luma<u8>>()
        .min_dimensions(QR_WIDTH, QR_WIDTH)
        .build();

    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pix::BrCode;

    #[test]
    fn renders_png_bytes() {
        let payload = BrCode {
            pix_key: "11999999999".to_string(),
            merchant_name: "JOHN DOE".to_string(),
            merchant_city: "SAO PAULO".to_string(),
            amount_in_cents: 1000,
            transaction_id: Some("TXID001".to_string()),
            description: None,
        }
        .encode();

        let png = render_png(&payload).unwrap();
        assert_eq!(&png[..4], b"\x89PNG");
    }

    #[test]
    fn oversized_payload_is_rejected() {
        let payload = "0".repeat(8000);
        assert!(render_png(&payload).is_err());
    }
}
