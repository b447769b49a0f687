//! Shared fixtures: keys and envelope builders composed from the public
//! crypto primitives, standing in for the operator-side issuer.

#![allow(dead_code)]

use uid2_core::bytes::BigEndianWriter;
use uid2_core::format::{token_prefix, ENVELOPE_VERSION_V3, TOKEN_VERSION_V2};
use uid2_core::{IdentityScope, Key, KeyContainer, PayloadType};
use uid2_crypto::{aes_cbc, aes_gcm};

pub const NOW: i64 = 1_700_000_000_000;
pub const ESTABLISHED: i64 = 1_609_459_200_000;

pub const MASTER_KEY_ID: i64 = 164;
pub const SITE_KEY_ID: i64 = 165;
pub const SITE_ID: i32 = 205;

pub fn master_key() -> Key {
    Key::new(
        MASTER_KEY_ID,
        -1,
        NOW - 100_000,
        NOW - 50_000,
        NOW + 86_400_000,
        vec![0x21u8; 32],
    )
}

pub fn site_key() -> Key {
    Key::new(
        SITE_KEY_ID,
        SITE_ID,
        NOW - 100_000,
        NOW - 50_000,
        NOW + 86_400_000,
        vec![0x42u8; 32],
    )
}

pub fn key_container() -> KeyContainer {
    KeyContainer::new(vec![master_key(), site_key()])
}

/// Build a well-formed V2 token envelope.
pub fn encrypt_token_v2(
    uid: &str,
    master_key: &Key,
    site_key: &Key,
    site_id: i32,
    established_ms: i64,
    expires_ms: i64,
) -> Vec<u8> {
    encrypt_token_v2_with_declared_length(
        uid,
        uid.len() as i32,
        master_key,
        site_key,
        site_id,
        established_ms,
        expires_ms,
    )
}

/// V2 builder with the uid length field under test control, for malformed
/// declared-length cases.
pub fn encrypt_token_v2_with_declared_length(
    uid: &str,
    declared_length: i32,
    master_key: &Key,
    site_key: &Key,
    site_id: i32,
    established_ms: i64,
    expires_ms: i64,
) -> Vec<u8> {
    let mut identity = BigEndianWriter::new();
    identity.write_i32(site_id);
    identity.write_i32(declared_length);
    identity.write_bytes(uid.as_bytes());
    identity.write_i32(0); // privacy bits
    identity.write_i64(established_ms);
    let identity_iv = [0x11u8; 16];
    let identity_ct =
        aes_cbc::encrypt(&identity.into_inner(), &identity_iv, &site_key.secret).unwrap();

    let mut master = BigEndianWriter::new();
    master.write_i64(expires_ms);
    master.write_i32(site_key.id as i32);
    master.write_bytes(&identity_iv);
    master.write_bytes(&identity_ct);
    let master_iv = [0x22u8; 16];
    let master_ct =
        aes_cbc::encrypt(&master.into_inner(), &master_iv, &master_key.secret).unwrap();

    let mut token = BigEndianWriter::new();
    token.write_u8(TOKEN_VERSION_V2);
    token.write_i32(master_key.id as i32);
    token.write_bytes(&master_iv);
    token.write_bytes(&master_ct);
    token.into_inner()
}

/// Build a well-formed V3 token envelope carrying `raw_uid` as the
/// identity bytes.
pub fn encrypt_token_v3(
    raw_uid: &[u8],
    master_key: &Key,
    site_key: &Key,
    site_id: i32,
    established_ms: i64,
    expires_ms: i64,
    scope: IdentityScope,
) -> Vec<u8> {
    let mut site = BigEndianWriter::new();
    site.write_i32(site_id);
    site.write_i64(0); // publisher id
    site.write_i32(0); // publisher key id
    site.write_i32(0); // privacy bits
    site.write_i64(established_ms);
    site.write_i64(established_ms); // refreshed
    site.write_bytes(raw_uid);
    let site_iv = aes_gcm::generate_iv().unwrap();
    let site_ct = aes_gcm::encrypt(&site.into_inner(), &site_iv, &site_key.secret).unwrap();

    let mut master = BigEndianWriter::new();
    master.write_i64(expires_ms);
    master.write_i64(established_ms); // created
    master.write_i32(0); // operator site id
    master.write_u8(0); // operator type
    master.write_i32(0); // operator version
    master.write_i32(0); // operator key id
    master.write_i32(site_key.id as i32);
    master.write_bytes(&site_iv);
    master.write_bytes(&site_ct);
    let master_iv = aes_gcm::generate_iv().unwrap();
    let master_ct = aes_gcm::encrypt(&master.into_inner(), &master_iv, &master_key.secret).unwrap();

    let mut token = BigEndianWriter::new();
    token.write_u8(token_prefix(scope));
    token.write_u8(ENVELOPE_VERSION_V3);
    token.write_i32(master_key.id as i32);
    token.write_bytes(&master_iv);
    token.write_bytes(&master_ct);
    token.into_inner()
}

/// Build a V2 data envelope.
pub fn encrypt_data_v2(data: &[u8], key: &Key, site_id: i32, encrypted_at_ms: i64) -> Vec<u8> {
    let iv = [0x33u8; 16];
    let ciphertext = aes_cbc::encrypt(data, &iv, &key.secret).unwrap();

    let mut envelope = BigEndianWriter::new();
    envelope.write_u8(PayloadType::Data as u8);
    envelope.write_u8(1);
    envelope.write_i64(encrypted_at_ms);
    envelope.write_i32(site_id);
    envelope.write_i32(key.id as i32);
    envelope.write_bytes(&iv);
    envelope.write_bytes(&ciphertext);
    envelope.into_inner()
}
