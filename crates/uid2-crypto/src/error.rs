use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("Invalid key length: expected 16 or 32 bytes, got {0}")]
    InvalidKeyLength(usize),

    #[error("Encrypted data too short")]
    DataTooShort,

    #[error("Invalid ciphertext length or PKCS#7 padding")]
    InvalidPadding,

    #[error("Encryption failed")]
    EncryptionFailed,

    #[error("Decryption failed")]
    DecryptionFailed,

    #[error("Random number generation failed: {0}")]
    RngFailed(String),
}

pub type Result<T> = std::result::Result<T, CryptoError>;
