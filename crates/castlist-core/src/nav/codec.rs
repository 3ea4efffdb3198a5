///
/// Navigation token text codec.
///
/// This module owns the transport-facing text shape of a navigation token:
/// a fixed prefix followed by URL-safe unpadded base64. It knows nothing
/// about the payload carried inside.
///

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};

///
/// TokenDecodeError
///

#[derive(Clone, Debug, Eq, thiserror::Error, PartialEq)]
pub enum TokenDecodeError {
    #[error("navigation token is empty")]
    Empty,

    #[error("navigation token exceeds max length: {len} chars (max {max})")]
    TooLong { len: usize, max: usize },

    #[error("navigation token does not start with '{prefix}'")]
    MissingPrefix { prefix: String },

    #[error("navigation token body is not valid base64: {0}")]
    InvalidEncoding(String),
}

/// Render raw payload bytes as `<prefix><base64>`.
#[must_use]
pub fn encode_token(prefix: &str, bytes: &[u8]) -> String {
    let mut out = String::with_capacity(prefix.len() + bytes.len().div_ceil(3) * 4);
    out.push_str(prefix);
    URL_SAFE_NO_PAD.encode_string(bytes, &mut out);

    out
}

/// Recover raw payload bytes from a token.
///
/// The token may include surrounding whitespace, which is trimmed. Length is
/// checked before any decoding work so oversized input is rejected cheaply.
pub fn decode_token(
    prefix: &str,
    max_len: usize,
    token: &str,
) -> Result<Vec<u8>, TokenDecodeError> {
    let token = token.trim();

    if token.is_empty() {
        return Err(TokenDecodeError::Empty);
    }

    if token.len() > max_len {
        return Err(TokenDecodeError::TooLong {
            len: token.len(),
            max: max_len,
        });
    }

    let body = token
        .strip_prefix(prefix)
        .ok_or_else(|| TokenDecodeError::MissingPrefix {
            prefix: prefix.to_string(),
        })?;

    if body.is_empty() {
        return Err(TokenDecodeError::Empty);
    }

    URL_SAFE_NO_PAD
        .decode(body)
        .map_err(|err| TokenDecodeError::InvalidEncoding(err.to_string()))
}

///
/// TESTS
///
