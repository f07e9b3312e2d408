use std::error::Error as StdError;

/// Errors raised while reading or committing a cookie session.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SessionError {
    /// The signing secret cannot be used.
    #[error("invalid signing key: {0}")]
    InvalidKey(&'static str),
    /// The committed cookie would be dropped by browsers.
    #[error("cookie length {len} exceeds the browser maximum of {max} bytes")]
    CookieTooLarge {
        /// Length of the serialized `Set-Cookie` value.
        len: usize,
        /// The allowed maximum.
        max: usize,
    },
    /// Session data could not be serialized.
    #[error("serialize session failed: {0}")]
    Serialize(#[from] serde_json::Error),
    /// A custom [`Signer`](crate::Signer) failed.
    #[error("signer failed: {0}")]
    Signer(#[source] Box<dyn StdError + Send + Sync>),
}

impl SessionError {
    /// Wraps an arbitrary signer failure.
    pub fn signer(error: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
        Self::Signer(error.into())
    }
}
