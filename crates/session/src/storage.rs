use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use cookie::Cookie;
use cookie::time::Duration;
use serde_json::Value;

use crate::{CookieOptions, MAX_COOKIE_SIZE, PassThrough, Session, SessionError, Signer};

/// Stores the whole [`Session`] in a cookie.
#[derive(Clone, Debug)]
pub struct CookieSessionStorage<S = PassThrough> {
    options: CookieOptions,
    signer: S,
}

impl CookieSessionStorage<PassThrough> {
    /// Create a storage that does not sign its cookie.
    pub fn unsigned(options: CookieOptions) -> Self {
        Self::new(options, PassThrough)
    }
}

impl<S> CookieSessionStorage<S>
where
    S: Signer,
{
    /// Create a new `CookieSessionStorage`.
    pub fn new(options: CookieOptions, signer: S) -> Self {
        Self { options, signer }
    }

    /// The cookie options this storage commits with.
    #[inline]
    pub fn options(&self) -> &CookieOptions {
        &self.options
    }

    /// The signer in use.
    #[inline]
    pub fn signer(&self) -> &S {
        &self.signer
    }

    /// Restores the session carried by a raw `Cookie` request header.
    ///
    /// Anything short of a valid, verified session cookie yields an empty session.
    pub async fn get_session(&self, cookie_header: Option<&str>) -> Result<Session, SessionError> {
        let Some(value) = cookie_header.and_then(|header| self.find_cookie(header)) else {
            return Ok(Session::new());
        };
        let Some(unsigned) = self.signer.unsign(&value).await? else {
            return Ok(Session::new());
        };
        Ok(decode(&unsigned).map(Session::from_data).unwrap_or_default())
    }

    /// Serializes `session` into a `Set-Cookie` header value.
    pub async fn commit_session(&self, session: &Session) -> Result<String, SessionError> {
        let encoded = URL_SAFE_NO_PAD.encode(serde_json::to_string(session)?);
        let value = self.signer.sign(&encoded).await?;
        let set_cookie = self.build_cookie(value, self.options.max_age).to_string();
        if set_cookie.len() > MAX_COOKIE_SIZE {
            return Err(SessionError::CookieTooLarge {
                len: set_cookie.len(),
                max: MAX_COOKIE_SIZE,
            });
        }
        Ok(set_cookie)
    }

    /// A `Set-Cookie` header value that removes the session cookie.
    pub async fn destroy_session(&self) -> Result<String, SessionError> {
        let value = self.signer.sign("").await?;
        Ok(self.build_cookie(value, Some(Duration::ZERO)).to_string())
    }

    fn find_cookie(&self, header: &str) -> Option<String> {
        let name = self.options.cookie_name();
        Cookie::split_parse(header)
            .filter_map(Result::ok)
            .find(|cookie| cookie.name() == name)
            .map(|cookie| cookie.value().to_owned())
    }

    fn build_cookie(&self, value: String, max_age: Option<Duration>) -> Cookie<'static> {
        let options = &self.options;
        let mut builder = Cookie::build((options.cookie_name().to_owned(), value))
            .path(options.resolved_path().to_owned())
            .same_site(options.resolved_same_site());
        if let Some(max_age) = max_age {
            builder = builder.max_age(max_age);
        }
        if let Some(domain) = options.domain.clone() {
            builder = builder.domain(domain);
        }
        if let Some(http_only) = options.http_only {
            builder = builder.http_only(http_only);
        }
        if let Some(secure) = options.secure {
            builder = builder.secure(secure);
        }
        builder.build()
    }
}

fn decode(value: &str) -> Option<BTreeMap<String, Value>> {
    let bytes = match URL_SAFE_NO_PAD.decode(value) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!(error = ?e, "session cookie is not valid base64");
            return None;
        }
    };
    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(map)) => Some(map.into_iter().collect()),
        Ok(other) => {
            tracing::debug!(payload = ?other, "session cookie payload is not an object");
            None
        }
        Err(e) => {
            tracing::debug!(error = ?e, "deserialize session cookie failed");
            None
        }
    }
}
