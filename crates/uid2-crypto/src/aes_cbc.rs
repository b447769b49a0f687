//! AES-CBC with PKCS#7 padding for the V2 envelope family.
//!
//! The 16-byte IV is a separately stored envelope field, never part of the
//! ciphertext run, so both directions take it as an explicit argument.

use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};

use crate::error::CryptoError;
use crate::types::{AES_128_KEY_LENGTH, AES_256_KEY_LENGTH, CBC_IV_LENGTH};

type Aes128CbcEnc = cbc::Encryptor<aes::Aes128>;
type Aes128CbcDec = cbc::Decryptor<aes::Aes128>;
type Aes256CbcEnc = cbc::Encryptor<aes::Aes256>;
type Aes256CbcDec = cbc::Decryptor<aes::Aes256>;

/// Generate a random 16-byte IV for AES-CBC.
pub fn generate_iv() -> Result<[u8; CBC_IV_LENGTH], CryptoError> {
    let mut iv = [0u8; CBC_IV_LENGTH];
    getrandom::getrandom(&mut iv).map_err(|e| CryptoError::RngFailed(e.to_string()))?;
    Ok(iv)
}

/// Encrypt with AES-CBC/PKCS#7. The caller prepends the IV when it
/// assembles the envelope.
pub fn encrypt(plaintext: &[u8], iv: &[u8; CBC_IV_LENGTH], key: &[u8]) -> Result<Vec<u8>, CryptoError> {
    match key.len() {
        AES_128_KEY_LENGTH => {
            let cipher = Aes128CbcEnc::new_from_slices(key, iv)
                .map_err(|_| CryptoError::InvalidKeyLength(key.len()))?;
            Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
        }
        AES_256_KEY_LENGTH => {
            let cipher = Aes256CbcEnc::new_from_slices(key, iv)
                .map_err(|_| CryptoError::InvalidKeyLength(key.len()))?;
            Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plaintext))
        }
        n => Err(CryptoError::InvalidKeyLength(n)),
    }
}

/// Decrypt with AES-CBC/PKCS#7. A ciphertext that is not a whole number
/// of blocks, or whose padding does not verify, reports `InvalidPadding`.
pub fn decrypt(ciphertext: &[u8], iv: &[u8; CBC_IV_LENGTH], key: &[u8]) -> Result<Vec<u8>, CryptoError> {
    match key.len() {
        AES_128_KEY_LENGTH => Aes128CbcDec::new_from_slices(key, iv)
            .map_err(|_| CryptoError::InvalidKeyLength(key.len()))?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| CryptoError::InvalidPadding),
        AES_256_KEY_LENGTH => Aes256CbcDec::new_from_slices(key, iv)
            .map_err(|_| CryptoError::InvalidKeyLength(key.len()))?
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| CryptoError::InvalidPadding),
        n => Err(CryptoError::InvalidKeyLength(n)),
    }
}
