//! Cipher primitives for the UID2 envelope formats.
//!
//! Two cipher generations coexist on the wire: V2 envelopes use AES-CBC
//! with PKCS#7 padding and a separately stored 16-byte IV, V3 envelopes
//! use AES-GCM with the 12-byte IV carried as the leading prefix of the
//! blob and the 16-byte tag as its trailing suffix. The wrappers here keep
//! those conventions distinct so the codec layer cannot mix them up.

pub mod aes_cbc;
pub mod aes_gcm;
pub mod base64;
pub mod error;
pub mod types;

pub use base64::{base64_decode, base64_encode};
pub use error::CryptoError;
pub use types::{
    AES_128_KEY_LENGTH, AES_256_KEY_LENGTH, AES_BLOCK_SIZE, CBC_IV_LENGTH, GCM_IV_LENGTH,
    GCM_TAG_LENGTH,
};
