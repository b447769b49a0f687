use thiserror::Error;

/// Invocation-time (programmer) errors. These never appear as a response
/// status; data-driven failures travel through
/// [`DecryptionStatus`](crate::response::DecryptionStatus) instead.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum RequestError {
    #[error("site_id and advertising_token cannot both be specified")]
    AmbiguousSiteTarget,

    #[error("one of key, site_id, or advertising_token must be specified")]
    MissingSiteTarget,
}
