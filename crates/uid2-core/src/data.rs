//! Site-scoped data payload encryption and decryption.
//!
//! Encryption always emits the V3 envelope (GCM, scope-prefixed first
//! byte) as base64 text; decryption accepts both generations, dispatching
//! on the payload-type bits of the first byte.

use uid2_crypto::{
    aes_cbc, aes_gcm, base64_decode, base64_encode, CryptoError, CBC_IV_LENGTH, GCM_IV_LENGTH,
};

use crate::bytes::{BigEndianReader, BigEndianWriter};
use crate::error::RequestError;
use crate::format::{
    data_prefix, IdentityScope, PayloadType, DATA_VERSION_V2, ENVELOPE_VERSION_V3,
    PAYLOAD_TYPE_MASK,
};
use crate::key::{Key, KeyStore};
use crate::response::{DataResponse, DecryptionStatus};
use crate::token::decrypt_token;

/// Request to encrypt an arbitrary payload under a site key.
///
/// Exactly one of an explicit key, a site id, or an advertising token must
/// identify the target site; supplying both a site id and a token is an
/// invocation error, not a response status.
#[derive(Debug, Clone, Copy)]
pub struct EncryptionDataRequest<'a> {
    data: &'a [u8],
    now_ms: i64,
    key: Option<&'a Key>,
    site_id: Option<i32>,
    advertising_token: Option<&'a str>,
    initialization_vector: Option<&'a [u8]>,
}

impl<'a> EncryptionDataRequest<'a> {
    pub fn new(data: &'a [u8], now_ms: i64) -> Self {
        Self {
            data,
            now_ms,
            key: None,
            site_id: None,
            advertising_token: None,
            initialization_vector: None,
        }
    }

    /// Encrypt with this exact key instead of resolving one from the store.
    pub fn with_key(mut self, key: &'a Key) -> Self {
        self.key = Some(key);
        self
    }

    pub fn with_site_id(mut self, site_id: i32) -> Self {
        self.site_id = Some(site_id);
        self
    }

    /// Resolve the target site by decrypting this token (base64 text form).
    pub fn with_advertising_token(mut self, token: &'a str) -> Self {
        self.advertising_token = Some(token);
        self
    }

    /// Caller-supplied 12-byte IV. The caller owns uniqueness; fresh random
    /// IVs are generated when this is absent.
    pub fn with_initialization_vector(mut self, iv: &'a [u8]) -> Self {
        self.initialization_vector = Some(iv);
        self
    }
}

/// Encrypt a data payload, returning the V3 envelope as base64 text in the
/// response payload.
///
/// `Err` is reserved for invocation mistakes; every data-driven failure is
/// a response status, and any failure inside the cipher maps to
/// `EncryptionFailure`.
pub fn encrypt_data<S: KeyStore>(
    request: EncryptionDataRequest<'_>,
    keys: Option<&S>,
    scope: IdentityScope,
) -> Result<DataResponse, RequestError> {
    let now_ms = request.now_ms;
    let key: &Key;
    let site_id: i32;

    if let Some(explicit) = request.key {
        if !explicit.is_active(now_ms) {
            return Ok(DataResponse::failure(DecryptionStatus::KeyInactive));
        }
        key = explicit;
        site_id = explicit.site_id;
    } else {
        let Some(keys) = keys else {
            return Ok(DataResponse::failure(DecryptionStatus::NotInitialized));
        };
        if !keys.is_valid(now_ms) {
            return Ok(DataResponse::failure(DecryptionStatus::KeysNotSynced));
        }
        let site_key_site_id = match (request.site_id, request.advertising_token) {
            (Some(_), Some(_)) => return Err(RequestError::AmbiguousSiteTarget),
            (None, None) => return Err(RequestError::MissingSiteTarget),
            (Some(requested), None) => {
                site_id = requested;
                requested
            }
            (None, Some(token)) => {
                let Ok(raw) = base64_decode(token) else {
                    return Ok(DataResponse::failure(DecryptionStatus::TokenDecryptFailure));
                };
                let decrypted = decrypt_token(&raw, keys, now_ms, scope);
                if !decrypted.is_success() {
                    return Ok(DataResponse::failure(DecryptionStatus::TokenDecryptFailure));
                }
                let (Some(token_site_id), Some(site_key_site_id)) =
                    (decrypted.site_id, decrypted.site_key_site_id)
                else {
                    return Ok(DataResponse::failure(DecryptionStatus::TokenDecryptFailure));
                };
                site_id = token_site_id;
                site_key_site_id
            }
        };
        let Some(site_key) = keys.try_get_active_site_key(site_key_site_id, now_ms) else {
            return Ok(DataResponse::failure(DecryptionStatus::NotAuthorizedForKey));
        };
        key = site_key;
    }

    match encrypt_data_envelope(request, key, site_id, scope) {
        Ok(text) => Ok(DataResponse::encrypted(text)),
        Err(_) => Ok(DataResponse::failure(DecryptionStatus::EncryptionFailure)),
    }
}

fn encrypt_data_envelope(
    request: EncryptionDataRequest<'_>,
    key: &Key,
    site_id: i32,
    scope: IdentityScope,
) -> Result<String, CryptoError> {
    let iv: [u8; GCM_IV_LENGTH] = match request.initialization_vector {
        Some(iv) => iv.try_into().map_err(|_| CryptoError::EncryptionFailed)?,
        None => aes_gcm::generate_iv()?,
    };

    let mut payload = BigEndianWriter::with_capacity(12 + request.data.len());
    payload.write_i64(request.now_ms);
    payload.write_i32(site_id);
    payload.write_bytes(request.data);
    let ciphertext = aes_gcm::encrypt(&payload.into_inner(), &iv, &key.secret)?;

    let mut envelope = BigEndianWriter::with_capacity(6 + GCM_IV_LENGTH + ciphertext.len());
    envelope.write_u8(data_prefix(scope));
    envelope.write_u8(ENVELOPE_VERSION_V3);
    envelope.write_i32(key.id as i32);
    envelope.write_bytes(&iv);
    envelope.write_bytes(&ciphertext);
    Ok(base64_encode(&envelope.into_inner()))
}

/// Decrypt a raw data envelope of either generation.
pub fn decrypt_data<S: KeyStore>(
    payload: &[u8],
    keys: &S,
    scope: IdentityScope,
) -> DataResponse {
    match decrypt_data_bytes(payload, keys, scope) {
        Ok(response) => response,
        Err(status) => DataResponse::failure(status),
    }
}

fn decrypt_data_bytes<S: KeyStore>(
    payload: &[u8],
    keys: &S,
    scope: IdentityScope,
) -> Result<DataResponse, DecryptionStatus> {
    if payload.len() < 2 {
        return Err(DecryptionStatus::InvalidPayload);
    }
    if payload[0] & PAYLOAD_TYPE_MASK == PayloadType::DataV3 as u8 {
        decrypt_data_v3(payload, keys, scope)
    } else {
        decrypt_data_v2(payload, keys)
    }
}

/// V2 data: [type=128][version=1][encrypted_at:8][site_id:4][key_id:4][IV:16][CBC ct].
fn decrypt_data_v2<S: KeyStore>(
    payload: &[u8],
    keys: &S,
) -> Result<DataResponse, DecryptionStatus> {
    let mut reader = BigEndianReader::new(payload);
    if reader.read_u8()? != PayloadType::Data as u8 {
        return Err(DecryptionStatus::InvalidPayloadType);
    }
    if reader.read_u8()? != DATA_VERSION_V2 {
        return Err(DecryptionStatus::VersionNotSupported);
    }
    let encrypted_at_ms = reader.read_i64()?;
    let _site_id = reader.read_i32()?;
    let key_id = reader.read_i32()?;
    let key = keys
        .try_get_key(i64::from(key_id))
        .ok_or(DecryptionStatus::NotAuthorizedForKey)?;
    let iv: [u8; CBC_IV_LENGTH] = reader
        .read_bytes(CBC_IV_LENGTH)?
        .try_into()
        .expect("slice is exactly 16 bytes");
    let data = aes_cbc::decrypt(reader.remaining(), &iv, &key.secret)?;
    Ok(DataResponse::decrypted(data, encrypted_at_ms))
}

/// V3 data: [scope prefix][version=112][key_id:4][IV:12][ct][tag:16]; the
/// decrypted interior is [encrypted_at:8][site_id:4][data].
fn decrypt_data_v3<S: KeyStore>(
    payload: &[u8],
    keys: &S,
    scope: IdentityScope,
) -> Result<DataResponse, DecryptionStatus> {
    let mut reader = BigEndianReader::new(payload);
    let prefix = reader.read_u8()?;
    if IdentityScope::from_prefix(prefix) != scope {
        return Err(DecryptionStatus::InvalidIdentityScope);
    }
    if reader.read_u8()? != ENVELOPE_VERSION_V3 {
        return Err(DecryptionStatus::VersionNotSupported);
    }
    let key_id = reader.read_i32()?;
    let key = keys
        .try_get_key(i64::from(key_id))
        .ok_or(DecryptionStatus::NotAuthorizedForKey)?;
    let plaintext = aes_gcm::decrypt_combined(reader.remaining(), &key.secret)?;

    let mut inner = BigEndianReader::new(&plaintext);
    let encrypted_at_ms = inner.read_i64()?;
    let _site_id = inner.read_i32()?;
    let data = inner.remaining().to_vec();
    Ok(DataResponse::decrypted(data, encrypted_at_ms))
}
