//! Advertising-token decryption.
//!
//! Both envelope generations decrypt twice: the master key unwraps an
//! outer payload whose interior names a site key, and the site key unwraps
//! the identity itself. The inner ciphertext sits at a fixed offset inside
//! the outer plaintext, so the outer buffer is parsed in place and must
//! outlive the inner decryption.
//!
//! Dispatch: byte 0 == 2 selects V2; otherwise byte 1 == 112 selects V3.
//! V2 carries its version in byte 0, while V3 spends byte 0 on the
//! scope-encoded prefix, so the order of the two probes matters.

use uid2_crypto::{aes_cbc, aes_gcm, base64_encode, CBC_IV_LENGTH};
use zeroize::Zeroizing;

use crate::bytes::BigEndianReader;
use crate::format::{IdentityScope, ENVELOPE_VERSION_V3, TOKEN_VERSION_V2};
use crate::key::KeyStore;
use crate::response::{DecryptionResponse, DecryptionStatus};

/// Decrypt a raw advertising token into its identity.
///
/// `token` is the raw envelope; callers holding the text wire form
/// base64-decode it first. All data-driven failures are reported through
/// the response status, in the documented check order.
pub fn decrypt_token<S: KeyStore>(
    token: &[u8],
    keys: &S,
    now_ms: i64,
    scope: IdentityScope,
) -> DecryptionResponse {
    match decrypt_token_bytes(token, keys, now_ms, scope) {
        Ok(response) => response,
        Err(status) => DecryptionResponse::failure(status),
    }
}

fn decrypt_token_bytes<S: KeyStore>(
    token: &[u8],
    keys: &S,
    now_ms: i64,
    scope: IdentityScope,
) -> Result<DecryptionResponse, DecryptionStatus> {
    if token.len() < 2 {
        return Err(DecryptionStatus::InvalidPayload);
    }
    if token[0] == TOKEN_VERSION_V2 {
        decrypt_token_v2(token, keys, now_ms)
    } else if token[1] == ENVELOPE_VERSION_V3 {
        decrypt_token_v3(token, keys, now_ms, scope)
    } else {
        Err(DecryptionStatus::VersionNotSupported)
    }
}

/// V2: AES-CBC at both layers, IVs stored as separate envelope fields.
fn decrypt_token_v2<S: KeyStore>(
    token: &[u8],
    keys: &S,
    now_ms: i64,
) -> Result<DecryptionResponse, DecryptionStatus> {
    let mut reader = BigEndianReader::new(token);
    reader.read_u8()?; // version, already probed by dispatch
    let master_key_id = reader.read_i32()?;
    let master_key = keys
        .try_get_key(i64::from(master_key_id))
        .ok_or(DecryptionStatus::NotAuthorizedForKey)?;
    let master_iv: [u8; CBC_IV_LENGTH] = reader
        .read_bytes(CBC_IV_LENGTH)?
        .try_into()
        .expect("slice is exactly 16 bytes");
    let master_plaintext = Zeroizing::new(aes_cbc::decrypt(
        reader.remaining(),
        &master_iv,
        &master_key.secret,
    )?);

    let mut master = BigEndianReader::new(&master_plaintext);
    let expires_ms = master.read_i64()?;
    let site_key_id = master.read_i32()?;
    let identity_iv: [u8; CBC_IV_LENGTH] = master
        .read_bytes(CBC_IV_LENGTH)?
        .try_into()
        .expect("slice is exactly 16 bytes");
    let site_key = keys
        .try_get_key(i64::from(site_key_id))
        .ok_or(DecryptionStatus::NotAuthorizedForKey)?;
    let identity_plaintext = Zeroizing::new(aes_cbc::decrypt(
        master.remaining(),
        &identity_iv,
        &site_key.secret,
    )?);

    let mut identity = BigEndianReader::new(&identity_plaintext);
    let site_id = identity.read_i32()?;
    let id_length =
        usize::try_from(identity.read_i32()?).map_err(|_| DecryptionStatus::InvalidPayload)?;
    // A declared length past the end of the payload is a malformed token,
    // not an under-read
    let uid_bytes = identity.read_bytes(id_length)?;
    let uid = String::from_utf8(uid_bytes.to_vec())
        .map_err(|_| DecryptionStatus::InvalidPayload)?;
    let _privacy_bits = identity.read_i32()?;
    let established_ms = identity.read_i64()?;

    if expires_ms < now_ms {
        return Ok(DecryptionResponse::expired(
            established_ms,
            site_id,
            site_key.site_id,
        ));
    }
    Ok(DecryptionResponse::success(
        uid,
        established_ms,
        site_id,
        site_key.site_id,
    ))
}

/// V3: AES-GCM at both layers, IV and tag carried inside each blob. The
/// scope embedded in the prefix byte is validated before any key lookup
/// or decryption.
fn decrypt_token_v3<S: KeyStore>(
    token: &[u8],
    keys: &S,
    now_ms: i64,
    scope: IdentityScope,
) -> Result<DecryptionResponse, DecryptionStatus> {
    let mut reader = BigEndianReader::new(token);
    let prefix = reader.read_u8()?;
    if IdentityScope::from_prefix(prefix) != scope {
        return Err(DecryptionStatus::InvalidIdentityScope);
    }
    if reader.read_u8()? != ENVELOPE_VERSION_V3 {
        return Err(DecryptionStatus::VersionNotSupported);
    }
    let master_key_id = reader.read_i32()?;
    let master_key = keys
        .try_get_key(i64::from(master_key_id))
        .ok_or(DecryptionStatus::NotAuthorizedForKey)?;
    let master_plaintext = Zeroizing::new(aes_gcm::decrypt_combined(
        reader.remaining(),
        &master_key.secret,
    )?);

    let mut master = BigEndianReader::new(&master_plaintext);
    let expires_ms = master.read_i64()?;
    let _created_ms = master.read_i64()?;
    // Operator identity is recorded by the issuer but not validated here
    let _operator_site_id = master.read_i32()?;
    let _operator_type = master.read_u8()?;
    let _operator_version = master.read_i32()?;
    let _operator_key_id = master.read_i32()?;
    let site_key_id = master.read_i32()?;
    let site_key = keys
        .try_get_key(i64::from(site_key_id))
        .ok_or(DecryptionStatus::NotAuthorizedForKey)?;
    let site_plaintext = Zeroizing::new(aes_gcm::decrypt_combined(
        master.remaining(),
        &site_key.secret,
    )?);

    let mut site = BigEndianReader::new(&site_plaintext);
    let site_id = site.read_i32()?;
    let _publisher_id = site.read_i64()?;
    let _publisher_key_id = site.read_i32()?;
    let _privacy_bits = site.read_i32()?;
    let established_ms = site.read_i64()?;
    let _refreshed_ms = site.read_i64()?;
    // V3 transports the raw id bytes; the readable form is their base64
    let uid = base64_encode(site.remaining());

    if expires_ms < now_ms {
        return Ok(DecryptionResponse::expired(
            established_ms,
            site_id,
            site_key.site_id,
        ));
    }
    Ok(DecryptionResponse::success(
        uid,
        established_ms,
        site_id,
        site_key.site_id,
    ))
}
