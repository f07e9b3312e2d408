use std::fmt::{self, Formatter};
use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::SessionError;

const BASE64_DIGEST_LEN: usize = 43;

/// Signs outgoing cookie values and verifies incoming ones.
#[async_trait]
pub trait Signer: fmt::Debug + Send + Sync + 'static {
    /// Signs `value`.
    async fn sign(&self, value: &str) -> Result<String, SessionError>;
    /// Verifies a signed value and returns the original. `Ok(None)` means the
    /// signature does not verify; the caller then treats the cookie as absent.
    async fn unsign(&self, value: &str) -> Result<Option<String>, SessionError>;
}

#[async_trait]
impl<S> Signer for Arc<S>
where
    S: Signer + ?Sized,
{
    async fn sign(&self, value: &str) -> Result<String, SessionError> {
        (**self).sign(value).await
    }
    async fn unsign(&self, value: &str) -> Result<Option<String>, SessionError> {
        (**self).unsign(value).await
    }
}

/// A signer that does not sign.
///
/// Cookie values are only encoded, so clients can read and forge them. Use
/// [`HmacSigner`] or another real signer when the flashed data must be trusted.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassThrough;

#[async_trait]
impl Signer for PassThrough {
    async fn sign(&self, value: &str) -> Result<String, SessionError> {
        Ok(value.to_owned())
    }
    async fn unsign(&self, value: &str) -> Result<Option<String>, SessionError> {
        Ok(Some(value.to_owned()))
    }
}

/// Signs values with HMAC-SHA256. The base64url digest is prepended to the value.
#[derive(Clone)]
pub struct HmacSigner {
    hmac: Hmac<Sha256>,
    fallback_hmacs: Vec<Hmac<Sha256>>,
}
impl fmt::Debug for HmacSigner {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("HmacSigner")
            .field("key", &"..")
            .field("fallback_keys", &self.fallback_hmacs.len())
            .finish()
    }
}

impl HmacSigner {
    /// Create a signer from `secret`. New values are always signed with it.
    pub fn new(secret: impl AsRef<[u8]>) -> Result<Self, SessionError> {
        Ok(Self {
            hmac: Self::hmac(secret.as_ref())?,
            fallback_hmacs: vec![],
        })
    }

    /// Add a secret that is still accepted when verifying, for key rotation.
    pub fn add_fallback(mut self, secret: impl AsRef<[u8]>) -> Result<Self, SessionError> {
        self.fallback_hmacs.push(Self::hmac(secret.as_ref())?);
        Ok(self)
    }

    fn hmac(secret: &[u8]) -> Result<Hmac<Sha256>, SessionError> {
        if secret.is_empty() {
            return Err(SessionError::InvalidKey("secret must not be empty"));
        }
        Hmac::<Sha256>::new_from_slice(secret).map_err(|_| SessionError::InvalidKey("invalid key length"))
    }

    fn verify(&self, cookie_value: &str) -> Option<String> {
        if cookie_value.len() < BASE64_DIGEST_LEN || !cookie_value.is_char_boundary(BASE64_DIGEST_LEN) {
            return None;
        }

        // Split [MAC | original-value] into its two parts.
        let (digest_str, value) = cookie_value.split_at(BASE64_DIGEST_LEN);
        let digest = URL_SAFE_NO_PAD.decode(digest_str).ok()?;

        std::iter::once(&self.hmac)
            .chain(self.fallback_hmacs.iter())
            .any(|hmac| {
                let mut hmac = hmac.clone();
                hmac.update(value.as_bytes());
                hmac.verify_slice(&digest).is_ok()
            })
            .then(|| value.to_owned())
    }
}

#[async_trait]
impl Signer for HmacSigner {
    async fn sign(&self, value: &str) -> Result<String, SessionError> {
        let mut mac = self.hmac.clone();
        mac.update(value.as_bytes());

        let mut signed = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());
        signed.push_str(value);
        Ok(signed)
    }
    async fn unsign(&self, value: &str) -> Result<Option<String>, SessionError> {
        let verified = self.verify(value);
        if verified.is_none() {
            tracing::debug!("cookie signature did not verify");
        }
        Ok(verified)
    }
}
