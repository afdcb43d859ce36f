//! QR credential encoding.
//!
//! A credential is a QR image whose payload is the registrant id (the scan
//! flow resolves the id against the API). Rasters are PNG-encoded in memory
//! and handed to the object store; the app-token flow gets inline SVG and
//! never touches storage. Encoding is deterministic for identical payload
//! and style.

use image::{DynamicImage, ImageFormat, Rgb};
use qrcode::render::svg;
use qrcode::QrCode;
use sha2::{Digest, Sha256};
use std::io::Cursor;

use crate::domain::errors::DomainError;

/// Colors for rendered credentials, as hex strings.
#[derive(Debug, Clone, PartialEq)]
pub struct CredentialStyle {
    pub dark: String,
    pub light: String,
}

impl Default for CredentialStyle {
    fn default() -> Self {
        Self {
            dark: "#31aac1".to_string(),
            light: "#ffffff".to_string(),
        }
    }
}

/// Object key for a credential raster: content hash of the payload plus the
/// image extension. Stable per payload, so re-encoding overwrites rather
/// than accumulating objects.
pub fn credential_key(payload: &str) -> String {
    format!("{}.png", hex::encode(Sha256::digest(payload.as_bytes())))
}

/// Composite payload for the app-token flow. Both segments are URL-encoded
/// so the scanner can split on the separator colons.
pub fn app_token_payload(endpoint: &str, token: &str) -> String {
    format!(
        "reg:{}:{}",
        urlencoding::encode(endpoint),
        urlencoding::encode(token)
    )
}

/// Render a QR credential as PNG bytes.
pub fn encode_png(payload: &str, style: &CredentialStyle) -> Result<Vec<u8>, DomainError> {
    if payload.is_empty() {
        return Err(DomainError::Encoding(
            "credential payload must not be empty".to_string(),
        ));
    }

    let dark = parse_hex_color(&style.dark)?;
    let light = parse_hex_color(&style.light)?;

    let code = QrCode::new(payload.as_bytes())
        .map_err(|e| DomainError::Encoding(format!("QR encoding failed: {e}")))?;

    let raster = code
        .render::<Rgb<u8>>()
        .quiet_zone(true)
        .module_dimensions(8, 8)
        .dark_color(Rgb(dark))
        .light_color(Rgb(light))
        .build();

    let mut bytes = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(raster)
        .write_to(&mut bytes, ImageFormat::Png)
        .map_err(|e| DomainError::Encoding(format!("PNG encoding failed: {e}")))?;

    Ok(bytes.into_inner())
}

/// Render a QR credential as inline SVG markup.
pub fn encode_svg(payload: &str, style: &CredentialStyle) -> Result<String, DomainError> {
    if payload.is_empty() {
        return Err(DomainError::Encoding(
            "credential payload must not be empty".to_string(),
        ));
    }

    // Validated for the same hex shape as the raster path even though SVG
    // would accept any CSS color, so a bad style fails identically in both.
    parse_hex_color(&style.dark)?;
    parse_hex_color(&style.light)?;

    let code = QrCode::new(payload.as_bytes())
        .map_err(|e| DomainError::Encoding(format!("QR encoding failed: {e}")))?;

    let markup = code
        .render::<svg::Color>()
        .quiet_zone(true)
        .min_dimensions(200, 200)
        .dark_color(svg::Color(&style.dark))
        .light_color(svg::Color(&style.light))
        .build();

    Ok(markup)
}

/// Parse "#rgb" or "#rrggbb" (leading '#' optional) into RGB components.
fn parse_hex_color(value: &str) -> Result<[u8; 3], DomainError> {
    let digits = value.strip_prefix('#').unwrap_or(value);
    let expanded = match digits.len() {
        3 => digits
            .chars()
            .flat_map(|c| [c, c])
            .collect::<String>(),
        6 => digits.to_string(),
        _ => {
            return Err(DomainError::Encoding(format!(
                "invalid credential color: {value}"
            )))
        }
    };

    let mut rgb = [0u8; 3];
    for (i, chunk) in expanded.as_bytes().chunks(2).enumerate() {
        let pair = std::str::from_utf8(chunk)
            .map_err(|_| DomainError::Encoding(format!("invalid credential color: {value}")))?;
        rgb[i] = u8::from_str_radix(pair, 16)
            .map_err(|_| DomainError::Encoding(format!("invalid credential color: {value}")))?;
    }
    Ok(rgb)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_png_is_deterministic() {
        let style = CredentialStyle::default();
        let first = encode_png("registrant::abc", &style).expect("encode");
        let second = encode_png("registrant::abc", &style).expect("encode");
        assert_eq!(first, second);
        assert!(!first.is_empty());

        let other = encode_png("registrant::def", &style).expect("encode");
        assert_ne!(first, other);
    }

    #[test]
    fn test_encode_png_output_is_png() {
        let bytes = encode_png("registrant::abc", &CredentialStyle::default()).expect("encode");
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
    }

    #[test]
    fn test_empty_payload_is_refused() {
        let style = CredentialStyle::default();
        assert!(matches!(
            encode_png("", &style),
            Err(DomainError::Encoding(_))
        ));
        assert!(matches!(
            encode_svg("", &style),
            Err(DomainError::Encoding(_))
        ));
    }

    #[test]
    fn test_invalid_color_is_refused() {
        let style = CredentialStyle {
            dark: "#zzz".to_string(),
            light: "#ffffff".to_string(),
        };
        assert!(matches!(
            encode_png("registrant::abc", &style),
            Err(DomainError::Encoding(_))
        ));
    }

    #[test]
    fn test_svg_markup_carries_style_colors() {
        let style = CredentialStyle::default();
        let markup = encode_svg("registrant::abc", &style).expect("encode");
        assert!(markup.contains("<svg"));
        assert!(markup.contains("#31aac1"));
        assert!(markup.contains("#ffffff"));
    }

    #[test]
    fn test_short_hex_colors_expand() {
        assert_eq!(parse_hex_color("#fff").expect("parse"), [255, 255, 255]);
        assert_eq!(parse_hex_color("#31aac1").expect("parse"), [0x31, 0xaa, 0xc1]);
        assert_eq!(parse_hex_color("31aac1").expect("parse"), [0x31, 0xaa, 0xc1]);
        assert!(parse_hex_color("#31aa").is_err());
    }

    #[test]
    fn test_credential_key_is_stable_and_png_suffixed() {
        let key = credential_key("registrant::abc");
        assert_eq!(key, credential_key("registrant::abc"));
        assert!(key.ends_with(".png"));
        assert_eq!(key.len(), 64 + 4);
        assert_ne!(key, credential_key("registrant::def"));
    }

    #[test]
    fn test_app_token_payload_encodes_segments() {
        let payload = app_token_payload("https://api.example.com/check in", "tok&en");
        assert_eq!(
            payload,
            "reg:https%3A%2F%2Fapi.example.com%2Fcheck%20in:tok%26en"
        );
    }
}
