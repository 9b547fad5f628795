//! Body decoding with charset correction
//!
//! Servers that omit a charset get ISO-8859-1 by the HTTP/1.1 default, and
//! many Japanese clinic sites are served that way while actually being UTF-8
//! or Shift_JIS. A declared ISO-8859-1 is therefore treated as "unknown" and
//! the charset is detected from the body instead.

use chardetng::EncodingDetector;
use encoding_rs::Encoding;

/// The declared charset that is not trusted
const UNRELIABLE_CHARSET: &str = "iso-8859-1";

/// Decodes a response body to text
///
/// # Charset Selection
///
/// | Declared charset | Used encoding |
/// |------------------|---------------|
/// | `iso-8859-1` (any case) | detected from content |
/// | absent | detected from content |
/// | known label | the declared one |
/// | unknown label | detected from content |
///
/// Malformed byte sequences decode to U+FFFD; this never fails.
pub fn decode_body(body: &[u8], declared: Option<&str>) -> String {
    let encoding = match declared.map(str::trim) {
        Some(label) if label.eq_ignore_ascii_case(UNRELIABLE_CHARSET) => {
            let detected = detect_encoding(body);
            tracing::debug!(
                "Declared charset {} is unreliable, detected {}",
                label,
                detected.name()
            );
            detected
        }
        Some(label) => Encoding::for_label(label.as_bytes()).unwrap_or_else(|| {
            tracing::debug!("Unknown charset label {:?}, detecting from content", label);
            detect_encoding(body)
        }),
        None => detect_encoding(body),
    };

    let (text, _, had_errors) = encoding.decode(body);
    if had_errors {
        tracing::debug!("Body contained malformed {} sequences", encoding.name());
    }
    text.into_owned()
}

/// Guesses the body's encoding from its bytes
fn detect_encoding(body: &[u8]) -> &'static Encoding {
    let mut detector = EncodingDetector::new();
    detector.feed(body, true);
    detector.guess(None, true)
}
