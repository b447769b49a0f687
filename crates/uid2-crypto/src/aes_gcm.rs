//! AES-GCM for the V3 envelope family.
//!
//! Wire convention: [IV:12][ciphertext][tag:16]. `encrypt` returns
//! ciphertext with the tag appended and leaves IV placement to the
//! envelope assembler; `decrypt_combined` consumes the whole blob.

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes128Gcm, Aes256Gcm, Nonce};

use crate::error::CryptoError;
use crate::types::{AES_128_KEY_LENGTH, AES_256_KEY_LENGTH, GCM_IV_LENGTH, GCM_TAG_LENGTH};

/// Generate a random 12-byte IV for AES-GCM.
pub fn generate_iv() -> Result<[u8; GCM_IV_LENGTH], CryptoError> {
    let mut iv = [0u8; GCM_IV_LENGTH];
    getrandom::getrandom(&mut iv).map_err(|e| CryptoError::RngFailed(e.to_string()))?;
    Ok(iv)
}

/// Encrypt with AES-GCM. Output length is `plaintext.len() + 16`; the IV
/// is not included.
pub fn encrypt(plaintext: &[u8], iv: &[u8; GCM_IV_LENGTH], key: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let nonce = Nonce::from_slice(iv);
    match key.len() {
        AES_128_KEY_LENGTH => Aes128Gcm::new_from_slice(key)
            .map_err(|_| CryptoError::InvalidKeyLength(key.len()))?
            .encrypt(nonce, plaintext)
            .map_err(|_| CryptoError::EncryptionFailed),
        AES_256_KEY_LENGTH => Aes256Gcm::new_from_slice(key)
            .map_err(|_| CryptoError::InvalidKeyLength(key.len()))?
            .encrypt(nonce, plaintext)
            .map_err(|_| CryptoError::EncryptionFailed),
        n => Err(CryptoError::InvalidKeyLength(n)),
    }
}

/// Decrypt a combined blob `[IV:12][ciphertext][tag:16]`.
///
/// Authentication failure (any flipped bit in IV, ciphertext, or tag)
/// reports `DecryptionFailed`.
pub fn decrypt_combined(blob: &[u8], key: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if blob.len() < GCM_IV_LENGTH + GCM_TAG_LENGTH {
        return Err(CryptoError::DataTooShort);
    }
    let (iv, ciphertext) = blob.split_at(GCM_IV_LENGTH);
    let nonce = Nonce::from_slice(iv);
    match key.len() {
        AES_128_KEY_LENGTH => Aes128Gcm::new_from_slice(key)
            .map_err(|_| CryptoError::InvalidKeyLength(key.len()))?
            .decrypt(nonce, ciphertext)
            .map_err(|_| CryptoError::DecryptionFailed),
        AES_256_KEY_LENGTH => Aes256Gcm::new_from_slice(key)
            .map_err(|_| CryptoError::InvalidKeyLength(key.len()))?
            .decrypt(nonce, ciphertext)
            .map_err(|_| CryptoError::DecryptionFailed),
        n => Err(CryptoError::InvalidKeyLength(n)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn random_key() -> [u8; 32] {
        let mut key = [0u8; 32];
        getrandom::getrandom(&mut key).unwrap();
        key
    }

    fn combine(iv: &[u8; GCM_IV_LENGTH], ct: &[u8]) -> Vec<u8> {
        let mut blob = Vec::with_capacity(iv.len() + ct.len());
        blob.extend_from_slice(iv);
        blob.extend_from_slice(ct);
        blob
    }

    #[test]
    fn encrypt_decrypt_round_trip() {
        let key = random_key();
        let iv = generate_iv().unwrap();
        let ct = encrypt(b"identity payload", &iv, &key).unwrap();
        let pt = decrypt_combined(&combine(&iv, &ct), &key).unwrap();
        assert_eq!(pt, b"identity payload");
    }

    #[test]
    fn round_trip_128_bit_key() {
        let key = [0x42u8; 16];
        let iv = generate_iv().unwrap();
        let ct = encrypt(b"short key", &iv, &key).unwrap();
        let pt = decrypt_combined(&combine(&iv, &ct), &key).unwrap();
        assert_eq!(pt, b"short key");
    }

    #[test]
    fn output_is_plaintext_plus_tag() {
        let key = random_key();
        let iv = generate_iv().unwrap();
        let ct = encrypt(&[1, 2, 3, 4, 5], &iv, &key).unwrap();
        assert_eq!(ct.len(), 5 + GCM_TAG_LENGTH);
    }

    #[test]
    fn rejects_tampered_ciphertext() {
        let key = random_key();
        let iv = generate_iv().unwrap();
        let ct = encrypt(b"secret", &iv, &key).unwrap();
        let mut blob = combine(&iv, &ct);
        let last = blob.len() - 1;
        blob[last] ^= 0xff;
        assert_eq!(decrypt_combined(&blob, &key), Err(CryptoError::DecryptionFailed));
    }

    #[test]
    fn rejects_tampered_iv() {
        let key = random_key();
        let iv = generate_iv().unwrap();
        let ct = encrypt(b"secret", &iv, &key).unwrap();
        let mut blob = combine(&iv, &ct);
        blob[0] ^= 0x01;
        assert_eq!(decrypt_combined(&blob, &key), Err(CryptoError::DecryptionFailed));
    }

    #[test]
    fn rejects_truncated_blob() {
        let key = random_key();
        assert_eq!(
            decrypt_combined(&[0u8; GCM_IV_LENGTH + GCM_TAG_LENGTH - 1], &key),
            Err(CryptoError::DataTooShort)
        );
    }

    #[test]
    fn rejects_invalid_key_length() {
        let iv = [0u8; GCM_IV_LENGTH];
        assert_eq!(
            encrypt(b"data", &iv, &[0u8; 24]),
            Err(CryptoError::InvalidKeyLength(24))
        );
    }

    #[test]
    fn wrong_key_fails() {
        let key1 = random_key();
        let key2 = random_key();
        let iv = generate_iv().unwrap();
        let ct = encrypt(b"secret", &iv, &key1).unwrap();
        assert!(decrypt_combined(&combine(&iv, &ct), &key2).is_err());
    }

    #[test]
    fn generated_ivs_differ() {
        assert_ne!(generate_iv().unwrap(), generate_iv().unwrap());
    }

    #[test]
    fn empty_plaintext() {
        let key = random_key();
        let iv = generate_iv().unwrap();
        let ct = encrypt(b"", &iv, &key).unwrap();
        assert_eq!(ct.len(), GCM_TAG_LENGTH);
        let pt = decrypt_combined(&combine(&iv, &ct), &key).unwrap();
        assert!(pt.is_empty());
    }
}
