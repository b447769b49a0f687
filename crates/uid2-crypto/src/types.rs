/// AES block size in bytes (CBC ciphertext length is a multiple of this).
pub const AES_BLOCK_SIZE: usize = 16;

/// IV length for AES-CBC (V2 envelopes).
pub const CBC_IV_LENGTH: usize = 16;

/// IV length for AES-GCM (V3 envelopes).
pub const GCM_IV_LENGTH: usize = 12;

/// Authentication tag length for AES-GCM.
pub const GCM_TAG_LENGTH: usize = 16;

/// Key length for the AES-128 instantiations.
pub const AES_128_KEY_LENGTH: usize = 16;

/// Key length for the AES-256 instantiations.
pub const AES_256_KEY_LENGTH: usize = 32;
