use salvo_core::http::StatusCode;
use salvo_core::http::header::{COOKIE, HeaderMap, HeaderValue, SET_COOKIE};
use salvo_core::writing::Redirect;
use salvo_core::{Request, Response};
use serde_json::Value;
use toasted_session::{CookieOptions, CookieSessionStorage, Duration, PassThrough, Signer};

use crate::{FlashError, Toast, ToastType};

/// Default cookie name of the toast session.
pub const DEFAULT_COOKIE_NAME: &str = "remix-toasted";
/// Default max age of the toast cookie, in seconds. The toast is meant for the very
/// next request only.
pub const DEFAULT_MAX_AGE_SECS: i64 = 10;

const MESSAGE_KEY: &str = "message";
const TYPE_KEY: &str = "type";

/// Cookie options every [`ToastFactory`] starts from.
#[must_use]
pub fn default_cookie_options() -> CookieOptions {
    CookieOptions::new()
        .name(DEFAULT_COOKIE_NAME)
        .max_age(Duration::seconds(DEFAULT_MAX_AGE_SECS))
}

/// Flashes toasts into, and consumes them from, a short lived cookie session.
///
/// Every operation rebuilds the session from its own input, so one factory can be
/// shared by all requests.
#[derive(Clone, Debug)]
pub struct ToastFactory<S = PassThrough> {
    storage: CookieSessionStorage<S>,
}

impl Default for ToastFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ToastFactory {
    /// Create a factory with the default cookie options and no signing.
    pub fn new() -> Self {
        Self::with_options(CookieOptions::new())
    }

    /// Create a factory whose cookie options are `options` merged over the defaults.
    pub fn with_options(options: CookieOptions) -> Self {
        Self::with_signer(options, PassThrough)
    }
}

impl<S> ToastFactory<S>
where
    S: Signer,
{
    /// Create a factory that signs its cookie with `signer`.
    pub fn with_signer(options: CookieOptions, signer: S) -> Self {
        let options = default_cookie_options().merge(options);
        tracing::debug!(?options, "toast session configured");
        Self {
            storage: CookieSessionStorage::new(options, signer),
        }
    }

    /// Resolved cookie options.
    #[inline]
    pub fn cookie_options(&self) -> &CookieOptions {
        self.storage.options()
    }

    /// Name of the toast cookie.
    #[inline]
    pub fn cookie_name(&self) -> &str {
        self.storage.options().cookie_name()
    }

    /// Stores `toast` in a fresh session and writes the session cookie into `headers`.
    ///
    /// A toast cookie already present in `headers` is replaced; other `Set-Cookie`
    /// headers are kept.
    pub async fn flash(&self, toast: &Toast, headers: &mut HeaderMap) -> Result<(), FlashError> {
        let mut session = self.storage.get_session(None).await?;
        session.flash(MESSAGE_KEY, toast.message.clone());
        if let Some(kind) = &toast.kind {
            session.flash(TYPE_KEY, kind.as_str());
        }
        let set_cookie = self.storage.commit_session(&session).await?;
        self.put_cookie(headers, &set_cookie)?;
        Ok(())
    }

    /// Reads and clears the toast carried by a raw `Cookie` request header.
    ///
    /// The emptied session is committed into `headers` whether or not a toast was
    /// found, so the toast is not delivered again. A missing or malformed cookie,
    /// or a stored message that is not a non-empty string, yields `None`.
    pub async fn consume(
        &self,
        cookie_header: Option<&str>,
        headers: &mut HeaderMap,
    ) -> Result<Option<Toast>, FlashError> {
        let mut session = self.storage.get_session(cookie_header).await?;
        let message = session.get(MESSAGE_KEY);
        let kind = session.get(TYPE_KEY);
        let set_cookie = self.storage.commit_session(&session).await?;
        self.put_cookie(headers, &set_cookie)?;

        let toast = match message {
            Some(Value::String(message)) if !message.is_empty() => Some(Toast {
                message,
                kind: match kind {
                    Some(Value::String(kind)) => Some(ToastType::from(kind)),
                    _ => None,
                },
            }),
            Some(other) => {
                tracing::debug!(message = ?other, "ignore toast without a text message");
                None
            }
            None => None,
        };
        Ok(toast)
    }

    /// [`consume`](Self::consume) with the `Cookie` headers of `req`.
    pub async fn consume_request(&self, req: &Request, headers: &mut HeaderMap) -> Result<Option<Toast>, FlashError> {
        let cookie_header = request_cookies(req.headers());
        self.consume(cookie_header.as_deref(), headers).await
    }

    /// Flashes `toast` into the response and redirects to `path` with `302 Found`.
    pub async fn redirect_with_flash(&self, res: &mut Response, path: &str, toast: &Toast) -> Result<(), FlashError> {
        let redirect = Redirect::with_status_code(StatusCode::FOUND, path)?;
        self.flash(toast, res.headers_mut()).await?;
        res.render(redirect);
        Ok(())
    }

    /// Returns `true` if `headers` already carry a toast cookie.
    pub fn has_cookie(&self, headers: &HeaderMap) -> bool {
        headers
            .get_all(SET_COOKIE)
            .iter()
            .any(|value| self.is_own_cookie(value))
    }

    fn is_own_cookie(&self, value: &HeaderValue) -> bool {
        value
            .to_str()
            .ok()
            .and_then(|value| value.split_once('='))
            .is_some_and(|(name, _)| name.trim() == self.cookie_name())
    }

    fn put_cookie(&self, headers: &mut HeaderMap, set_cookie: &str) -> Result<(), FlashError> {
        let value = HeaderValue::from_str(set_cookie)?;
        if self.has_cookie(headers) {
            tracing::debug!(name = self.cookie_name(), "replace pending toast cookie");
            let others: Vec<HeaderValue> = headers
                .get_all(SET_COOKIE)
                .iter()
                .filter(|value| !self.is_own_cookie(value))
                .cloned()
                .collect();
            headers.remove(SET_COOKIE);
            for other in others {
                headers.append(SET_COOKIE, other);
            }
        }
        headers.append(SET_COOKIE, value);
        Ok(())
    }
}

/// Joins all `Cookie` headers, HTTP/2 clients may split them.
fn request_cookies(headers: &HeaderMap) -> Option<String> {
    let values: Vec<&str> = headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .collect();
    if values.is_empty() { None } else { Some(values.join("; ")) }
}

#[cfg(test)]
mod tests {
    use salvo_core::http::header::LOCATION;
    use salvo_core::test::TestClient;
    use toasted_session::{HmacSigner, SessionError};
    use tracing_test::traced_test;

    use super::*;

    /// Turns the `Set-Cookie` header written by the factory into a request `Cookie` header.
    fn cookie_from(headers: &HeaderMap) -> String {
        let set_cookie = headers.get(SET_COOKIE).unwrap().to_str().unwrap();
        set_cookie.split(';').next().unwrap().to_owned()
    }

    #[tokio::test]
    async fn test_flash_then_consume() {
        let factory = ToastFactory::new();
        let mut headers = HeaderMap::new();
        factory.flash(&Toast::success("m"), &mut headers).await.unwrap();

        let mut out = HeaderMap::new();
        let toast = factory.consume(Some(&cookie_from(&headers)), &mut out).await.unwrap();
        assert_eq!(toast, Some(Toast::success("m")));
        assert!(out.contains_key(SET_COOKIE));
    }

    #[tokio::test]
    async fn test_consume_is_one_shot() {
        let factory = ToastFactory::new();
        let mut headers = HeaderMap::new();
        factory.flash(&Toast::new("once"), &mut headers).await.unwrap();

        let mut first = HeaderMap::new();
        let toast = factory.consume(Some(&cookie_from(&headers)), &mut first).await.unwrap();
        assert_eq!(toast, Some(Toast::new("once")));

        let mut second = HeaderMap::new();
        let toast = factory.consume(Some(&cookie_from(&first)), &mut second).await.unwrap();
        assert_eq!(toast, None);
    }

    #[tokio::test]
    async fn test_consume_without_cookie() {
        let factory = ToastFactory::new();
        let mut headers = HeaderMap::new();
        assert_eq!(factory.consume(None, &mut headers).await.unwrap(), None);
        assert_eq!(factory.consume(Some("remix-toasted=garbage!"), &mut headers).await.unwrap(), None);
        // The empty session is still recommitted.
        assert!(factory.has_cookie(&headers));
        assert_eq!(headers.get_all(SET_COOKIE).iter().count(), 1);
    }

    #[tokio::test]
    async fn test_consume_ignores_non_string_message() {
        let factory = ToastFactory::new();
        let storage = CookieSessionStorage::unsigned(factory.cookie_options().clone());
        let mut session = toasted_session::Session::new();
        session.flash(MESSAGE_KEY, 42).flash(TYPE_KEY, "success");
        let set_cookie = storage.commit_session(&session).await.unwrap();
        let cookie = set_cookie.split(';').next().unwrap();

        let mut headers = HeaderMap::new();
        assert_eq!(factory.consume(Some(cookie), &mut headers).await.unwrap(), None);

        let mut session = toasted_session::Session::new();
        session.flash(MESSAGE_KEY, "kept").flash(TYPE_KEY, true);
        let set_cookie = storage.commit_session(&session).await.unwrap();
        let cookie = set_cookie.split(';').next().unwrap();
        assert_eq!(factory.consume(Some(cookie), &mut headers).await.unwrap(), Some(Toast::new("kept")));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_flash_overwrites_pending_toast() {
        let factory = ToastFactory::new();
        let mut headers = HeaderMap::new();
        headers.append(SET_COOKIE, HeaderValue::from_static("theme=dark; Path=/"));
        factory.flash(&Toast::info("first"), &mut headers).await.unwrap();
        factory.flash(&Toast::info("second"), &mut headers).await.unwrap();

        let values: Vec<_> = headers.get_all(SET_COOKIE).iter().collect();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0], "theme=dark; Path=/");
        assert!(logs_contain("replace pending toast cookie"));

        let cookie = values[1].to_str().unwrap().split(';').next().unwrap().to_owned();
        let toast = factory.consume(Some(&cookie), &mut HeaderMap::new()).await.unwrap();
        assert_eq!(toast, Some(Toast::info("second")));
    }

    #[test]
    fn test_options_merge_over_defaults() {
        let factory = ToastFactory::with_options(
            CookieOptions::new()
                .http_only(true)
                .path("/test")
                .same_site(toasted_session::SameSite::Strict),
        );
        assert_eq!(
            factory.cookie_options(),
            &CookieOptions::new()
                .name(DEFAULT_COOKIE_NAME)
                .max_age(Duration::seconds(10))
                .http_only(true)
                .path("/test")
                .same_site(toasted_session::SameSite::Strict)
        );

        let factory = ToastFactory::with_options(
            CookieOptions::new()
                .http_only(true)
                .max_age(Duration::seconds(1000))
                .name("test"),
        );
        assert_eq!(
            factory.cookie_options(),
            &CookieOptions::new()
                .name("test")
                .max_age(Duration::seconds(1000))
                .http_only(true)
        );
        assert_eq!(factory.cookie_name(), "test");
    }

    #[tokio::test]
    async fn test_consume_request_reads_cookie_header() {
        let factory = ToastFactory::new();
        let mut headers = HeaderMap::new();
        factory.flash(&Toast::warning("careful"), &mut headers).await.unwrap();

        let req = TestClient::get("http://127.0.0.1:5800/")
            .add_header(COOKIE, "a=1", true)
            .add_header(COOKIE, cookie_from(&headers), false)
            .build();
        let toast = factory.consume_request(&req, &mut HeaderMap::new()).await.unwrap();
        assert_eq!(toast, Some(Toast::warning("careful")));
    }

    #[tokio::test]
    async fn test_redirect_with_flash() {
        let factory = ToastFactory::new();
        let mut res = Response::new();
        factory
            .redirect_with_flash(&mut res, "/todos", &Toast::error("nope"))
            .await
            .unwrap();
        assert_eq!(res.status_code, Some(StatusCode::FOUND));
        assert_eq!(res.headers().get(LOCATION).unwrap(), "/todos");

        let toast = factory.consume(Some(&cookie_from(res.headers())), &mut HeaderMap::new()).await.unwrap();
        assert_eq!(toast, Some(Toast::error("nope")));
    }

    #[tokio::test]
    async fn test_redirect_rejects_invalid_path() {
        let factory = ToastFactory::new();
        let mut res = Response::new();
        let result = factory.redirect_with_flash(&mut res, "not a uri", &Toast::new("x")).await;
        assert!(matches!(result, Err(FlashError::Redirect(_))));
        assert!(!factory.has_cookie(res.headers()));
    }

    #[tokio::test]
    async fn test_signed_factory_rejects_unsigned_cookie() {
        let signed = ToastFactory::with_signer(CookieOptions::new(), HmacSigner::new("secret").unwrap());
        let unsigned = ToastFactory::new();
        let mut headers = HeaderMap::new();
        unsigned.flash(&Toast::success("forged"), &mut headers).await.unwrap();
        let toast = signed.consume(Some(&cookie_from(&headers)), &mut HeaderMap::new()).await.unwrap();
        assert_eq!(toast, None);

        let mut headers = HeaderMap::new();
        signed.flash(&Toast::success("genuine"), &mut headers).await.unwrap();
        let toast = signed.consume(Some(&cookie_from(&headers)), &mut HeaderMap::new()).await.unwrap();
        assert_eq!(toast, Some(Toast::success("genuine")));
    }

    #[tokio::test]
    async fn test_oversized_toast_is_an_error() {
        let factory = ToastFactory::new();
        let result = factory
            .flash(&Toast::new("x".repeat(8 * 1024)), &mut HeaderMap::new())
            .await;
        assert!(matches!(result, Err(FlashError::Session(SessionError::CookieTooLarge { .. }))));
    }
}
