//! Standard base64 for the text forms of tokens and data envelopes.

use base64ct::{Base64, Encoding};

/// Base64 encode bytes with the standard padded alphabet.
pub fn base64_encode(data: &[u8]) -> String {
    Base64::encode_string(data)
}

/// Base64 decode a string to bytes.
pub fn base64_decode(s: &str) -> Result<Vec<u8>, base64ct::Error> {
    Base64::decode_vec(s)
}
