use salvo_core::http::header::InvalidHeaderValue;
use toasted_session::SessionError;

/// Errors raised by [`ToastFactory`](crate::ToastFactory).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum FlashError {
    /// The session substrate failed, for example the signer.
    #[error(transparent)]
    Session(#[from] SessionError),
    /// The committed cookie is not a valid header value.
    #[error("invalid set-cookie header: {0}")]
    HeaderValue(#[from] InvalidHeaderValue),
    /// The redirect could not be built.
    #[error("redirect failed: {0}")]
    Redirect(#[from] salvo_core::Error),
}
