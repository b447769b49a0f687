//! Result types for token and data operations.
//!
//! Expected, data-driven failures travel through the `status` field of
//! these responses; no error escapes the codec for them. The constructors
//! enforce that identity fields are only populated for `Success` and
//! `ExpiredToken` outcomes.

use uid2_crypto::CryptoError;

use crate::bytes::ReadError;

/// Outcome taxonomy shared by token and data operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecryptionStatus {
    Success,
    NotInitialized,
    InvalidPayload,
    InvalidPayloadType,
    VersionNotSupported,
    NotAuthorizedForKey,
    InvalidIdentityScope,
    ExpiredToken,
    KeysNotSynced,
    KeyInactive,
    EncryptionFailure,
    TokenDecryptFailure,
}

impl From<ReadError> for DecryptionStatus {
    fn from(_: ReadError) -> Self {
        DecryptionStatus::InvalidPayload
    }
}

impl From<CryptoError> for DecryptionStatus {
    fn from(_: CryptoError) -> Self {
        DecryptionStatus::InvalidPayload
    }
}

/// Result of decrypting an advertising token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecryptionResponse {
    pub status: DecryptionStatus,
    /// The decoded identity; present iff `status` is `Success`.
    pub uid: Option<String>,
    pub established: Option<i64>,
    pub site_id: Option<i32>,
    pub site_key_site_id: Option<i32>,
}

impl DecryptionResponse {
    pub fn success(uid: String, established: i64, site_id: i32, site_key_site_id: i32) -> Self {
        Self {
            status: DecryptionStatus::Success,
            uid: Some(uid),
            established: Some(established),
            site_id: Some(site_id),
            site_key_site_id: Some(site_key_site_id),
        }
    }

    /// An expired token still reports where and when the identity was
    /// established, but never the identity itself.
    pub fn expired(established: i64, site_id: i32, site_key_site_id: i32) -> Self {
        Self {
            status: DecryptionStatus::ExpiredToken,
            uid: None,
            established: Some(established),
            site_id: Some(site_id),
            site_key_site_id: Some(site_key_site_id),
        }
    }

    pub fn failure(status: DecryptionStatus) -> Self {
        Self {
            status,
            uid: None,
            established: None,
            site_id: None,
            site_key_site_id: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == DecryptionStatus::Success
    }
}

/// Result of encrypting or decrypting a data payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataResponse {
    pub status: DecryptionStatus,
    /// Decrypted bytes, or the base64 text of a freshly encrypted envelope.
    pub payload: Option<Vec<u8>>,
    /// When the payload was encrypted; present on decryption responses.
    pub encrypted_at: Option<i64>,
}

impl DataResponse {
    pub fn decrypted(payload: Vec<u8>, encrypted_at: i64) -> Self {
        Self {
            status: DecryptionStatus::Success,
            payload: Some(payload),
            encrypted_at: Some(encrypted_at),
        }
    }

    pub fn encrypted(text: String) -> Self {
        Self {
            status: DecryptionStatus::Success,
            payload: Some(text.into_bytes()),
            encrypted_at: None,
        }
    }

    pub fn failure(status: DecryptionStatus) -> Self {
        Self {
            status,
            payload: None,
            encrypted_at: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == DecryptionStatus::Success
    }

    /// Encryption output as base64 text.
    pub fn text(&self) -> Option<&str> {
        self.payload
            .as_deref()
            .and_then(|payload| std::str::from_utf8(payload).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uid_is_present_iff_success() {
        let ok = DecryptionResponse::success("u".into(), 1, 2, 3);
        assert!(ok.is_success());
        assert!(ok.uid.is_some());

        let expired = DecryptionResponse::expired(1, 2, 3);
        assert_eq!(expired.status, DecryptionStatus::ExpiredToken);
        assert!(expired.uid.is_none());
        assert_eq!(expired.site_id, Some(2));

        let failed = DecryptionResponse::failure(DecryptionStatus::InvalidPayload);
        assert!(failed.uid.is_none());
        assert!(failed.established.is_none());
        assert!(failed.site_id.is_none());
    }

    #[test]
    fn byte_and_cipher_failures_lift_to_invalid_payload() {
        assert_eq!(
            DecryptionStatus::from(ReadError),
            DecryptionStatus::InvalidPayload
        );
        assert_eq!(
            DecryptionStatus::from(CryptoError::DecryptionFailed),
            DecryptionStatus::InvalidPayload
        );
    }

    #[test]
    fn encrypted_response_exposes_text() {
        let response = DataResponse::encrypted("QUJD".into());
        assert_eq!(response.text(), Some("QUJD"));
        assert!(response.encrypted_at.is_none());
        assert!(DataResponse::failure(DecryptionStatus::EncryptionFailure)
            .text()
            .is_none());
    }
}
