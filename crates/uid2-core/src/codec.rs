//! Scope-configured codec surface.

use crate::data::{decrypt_data, encrypt_data, EncryptionDataRequest};
use crate::error::RequestError;
use crate::format::IdentityScope;
use crate::key::KeyStore;
use crate::response::{DataResponse, DecryptionResponse};
use crate::token::decrypt_token;

/// The codec, parameterized by deployment scope.
///
/// Construct once with the scope of your deployment (UID2 or EUID) and
/// share freely: the codec holds no other state, so concurrent use is safe
/// as long as the key store supports concurrent reads.
#[derive(Debug, Clone, Copy)]
pub struct TokenCodec {
    scope: IdentityScope,
}

impl TokenCodec {
    pub fn new(scope: IdentityScope) -> Self {
        Self { scope }
    }

    pub fn scope(&self) -> IdentityScope {
        self.scope
    }

    /// Decrypt a raw advertising token. See [`decrypt_token`].
    pub fn decrypt_token<S: KeyStore>(
        &self,
        token: &[u8],
        keys: &S,
        now_ms: i64,
    ) -> DecryptionResponse {
        decrypt_token(token, keys, now_ms, self.scope)
    }

    /// Encrypt a data payload under a site key. See [`encrypt_data`].
    pub fn encrypt_data<S: KeyStore>(
        &self,
        request: EncryptionDataRequest<'_>,
        keys: Option<&S>,
    ) -> Result<DataResponse, RequestError> {
        encrypt_data(request, keys, self.scope)
    }

    /// Decrypt a raw data envelope. See [`decrypt_data`].
    pub fn decrypt_data<S: KeyStore>(&self, payload: &[u8], keys: &S) -> DataResponse {
        decrypt_data(payload, keys, self.scope)
    }
}
