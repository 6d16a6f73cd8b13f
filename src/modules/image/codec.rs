use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use crate::core::error::{AppError, Result};

/// Decoded payloads shorter than this cannot plausibly be an image.
/// This is a cheap sanity floor, not image-format validation.
const MIN_IMAGE_BYTES: usize = 100;

/// Decode a client-supplied base64 image payload into raw bytes.
///
/// Tolerates the messy payloads real clients send:
/// - a data-URI prefix (everything up to and including the first `"base64,"`
///   marker is stripped)
/// - wrapped or pretty-printed payloads (all whitespace is stripped)
/// - omitted trailing `=` padding (re-padded to a multiple of 4)
///
/// Returns `InvalidImageEncoding` for empty or malformed input and
/// `ImageTooSmall` when the decoded output is below [`MIN_IMAGE_BYTES`].
pub fn decode_base64_image(encoded: &str) -> Result<Vec<u8>> {
    let trimmed = encoded.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidImageEncoding);
    }

    // Strip a data-URI style prefix, e.g. "data:image/jpeg;base64,<payload>"
    let payload = match trimmed.find("base64,") {
        Some(idx) => &trimmed[idx + "base64,".len()..],
        None => trimmed,
    };

    let mut cleaned: String = payload.chars().filter(|c| !c.is_whitespace()).collect();

    // Re-pad payloads from clients that drop trailing '='
    let missing_padding = cleaned.len() % 4;
    if missing_padding != 0 {
        cleaned.push_str(&"=".repeat(4 - missing_padding));
    }

    let bytes = BASE64
        .decode(cleaned.as_bytes())
        .map_err(|_| AppError::InvalidImageEncoding)?;

    if bytes.len() < MIN_IMAGE_BYTES {
        return Err(AppError::ImageTooSmall);
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A 120-byte payload, comfortably above the plausibility floor.
    fn sample_bytes() -> Vec<u8> {
        (0u8..120).collect()
    }

    fn sample_encoded() -> String {
        BASE64.encode(sample_bytes())
    }

    #[test]
    fn decodes_plain_payload() {
        let decoded = decode_base64_image(&sample_encoded()).unwrap();
        assert_eq!(decoded, sample_bytes());
    }

    #[test]
    fn strips_data_uri_prefix() {
        let encoded = format!("data:image/jpeg;base64,{}", sample_encoded());
        assert_eq!(decode_base64_image(&encoded).unwrap(), sample_bytes());
    }

    #[test]
    fn strips_whitespace_and_newlines() {
        let encoded = sample_encoded();
        let (head, tail) = encoded.split_at(20);
        let wrapped = format!("{}\r\n  {}\n", head, tail);
        assert_eq!(decode_base64_image(&wrapped).unwrap(), sample_bytes());
    }

    #[test]
    fn tolerates_missing_padding() {
        // 121 bytes encodes with two '=' of padding
        let bytes: Vec<u8> = (0u8..121).collect();
        let encoded = BASE64.encode(&bytes);
        assert!(encoded.ends_with('='));
        let unpadded = encoded.trim_end_matches('=');

        assert_eq!(decode_base64_image(unpadded).unwrap(), bytes);
        assert_eq!(decode_base64_image(&encoded).unwrap(), bytes);
    }

    #[test]
    fn rejects_empty_input() {
        assert!(matches!(
            decode_base64_image(""),
            Err(AppError::InvalidImageEncoding)
        ));
        assert!(matches!(
            decode_base64_image("   \n"),
            Err(AppError::InvalidImageEncoding)
        ));
    }

    #[test]
    fn rejects_non_alphabet_characters() {
        assert!(matches!(
            decode_base64_image("not-valid-base64-!!!"),
            Err(AppError::InvalidImageEncoding)
        ));
    }

    #[test]
    fn rejects_implausibly_small_payload() {
        let tiny = BASE64.encode([0u8; 10]);
        assert!(matches!(
            decode_base64_image(&tiny),
            Err(AppError::ImageTooSmall)
        ));
    }

    #[test]
    fn boundary_at_minimum_size() {
        let at_floor = BASE64.encode(vec![7u8; 100]);
        assert_eq!(decode_base64_image(&at_floor).unwrap().len(), 100);

        let below_floor = BASE64.encode(vec![7u8; 99]);
        assert!(matches!(
            decode_base64_image(&below_floor),
            Err(AppError::ImageTooSmall)
        ));
    }
}
