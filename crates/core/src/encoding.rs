//! Base64 content encoding for the hosting platform's contents API.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::error::CoreError;

/// Encode UTF-8 text as standard base64.
pub fn encode_content(text: &str) -> String {
    STANDARD.encode(text.as_bytes())
}

/// Decode base64 produced by [`encode_content`] or returned by the platform.
///
/// For reading file contents back from the contents API; scaffolding only
/// writes, so nothing in the write path calls this.
///
/// Embedded whitespace is ignored; GitHub wraps encoded content at 60
/// columns.
pub fn decode_content(encoded: &str) -> Result<String, CoreError> {
    let compact: String = encoded.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| CoreError::Validation(format!("Content is not valid base64: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| CoreError::Validation(format!("Decoded content is not UTF-8: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn known_ascii_value() {
        assert_eq!(encode_content("hello"), "aGVsbG8=");
        assert_eq!(decode_content("aGVsbG8=").unwrap(), "hello");
    }

    #[test]
    fn empty_string() {
        assert_eq!(encode_content(""), "");
        assert_eq!(decode_content("").unwrap(), "");
    }

    #[test]
    fn decodes_wrapped_content() {
        let encoded = encode_content(&"line of text ".repeat(20));
        let wrapped: String = encoded
            .as_bytes()
            .chunks(60)
            .map(|c| std::str::from_utf8(c).unwrap())
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(decode_content(&wrapped).unwrap(), "line of text ".repeat(20));
    }

    #[test]
    fn reads_back_contents_api_payload() {
        // Shape of a GET /repos/{owner}/{repo}/contents/{path} response body.
        let body = serde_json::json!({
            "type": "file",
            "encoding": "base64",
            "content": "IyBhdGxhcy1zdmMKCkF0bGFz\nIHNlcnZpY2UK\n",
        });
        let content = body["content"].as_str().unwrap();
        assert_eq!(decode_content(content).unwrap(), "# atlas-svc\n\nAtlas service\n");
    }

    #[test]
    fn rejects_invalid_base64() {
        assert!(decode_content("***").is_err());
    }

    #[test]
    fn rejects_non_utf8_payload() {
        let encoded = STANDARD.encode([0xff, 0xfe, 0xfd]);
        assert!(decode_content(&encoded).is_err());
    }

    proptest! {
        #[test]
        fn round_trip_arbitrary_text(text in any::<String>()) {
            prop_assert_eq!(decode_content(&encode_content(&text)).unwrap(), text);
        }

        #[test]
        fn round_trip_multibyte(text in "[αβγ日本語🚀a-z ]{0,64}") {
            prop_assert_eq!(decode_content(&encode_content(&text)).unwrap(), text);
        }
    }
}
