//! Client-side core of the UID2 identity framework.
//!
//! Decrypts opaque advertising tokens into a readable user identifier and
//! encrypts/decrypts site-scoped data payloads, over a key store that an
//! external refresh layer keeps populated. Two envelope generations are
//! supported: V2 (AES-CBC, separately stored IVs) and V3 (AES-GCM with
//! AEAD tags and a scope-discriminating prefix byte).
//!
//! The codec is stateless apart from its configured [`IdentityScope`];
//! every operation takes the key store and the current time as explicit
//! inputs and performs no I/O.

pub mod bytes;
pub mod codec;
pub mod data;
pub mod error;
pub mod format;
pub mod key;
pub mod response;
pub mod token;

pub use bytes::{BigEndianReader, BigEndianWriter, ReadError};
pub use codec::TokenCodec;
pub use data::{decrypt_data, encrypt_data, EncryptionDataRequest};
pub use error::RequestError;
pub use format::{IdentityScope, PayloadType};
pub use key::{Key, KeyContainer, KeyStore};
pub use response::{DataResponse, DecryptionResponse, DecryptionStatus};
pub use token::decrypt_token;
