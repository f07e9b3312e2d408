use cookie::SameSite;
use cookie::time::Duration;

use crate::DEFAULT_COOKIE_NAME;

/// Attributes of the session cookie.
///
/// Every attribute is optional so that two sets can be layered with
/// [`CookieOptions::merge`]. Unset attributes fall back at commit time:
/// the name to [`DEFAULT_COOKIE_NAME`], the path to `/`, `SameSite` to `Lax`.
/// Without a `max_age` the cookie lives for the browser session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[non_exhaustive]
pub struct CookieOptions {
    /// The cookie name.
    pub name: Option<String>,
    /// The cookie max age.
    pub max_age: Option<Duration>,
    /// The cookie path.
    pub path: Option<String>,
    /// The cookie domain.
    pub domain: Option<String>,
    /// The cookie http only flag.
    pub http_only: Option<bool>,
    /// The cookie secure flag.
    pub secure: Option<bool>,
    /// The cookie same site policy.
    pub same_site: Option<SameSite>,
}

impl CookieOptions {
    /// Create an empty set of options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets cookie name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets cookie max_age.
    pub fn max_age(mut self, max_age: Duration) -> Self {
        self.max_age = Some(max_age);
        self
    }

    /// Sets cookie path.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets cookie domain.
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    /// Sets cookie http only.
    pub fn http_only(mut self, http_only: bool) -> Self {
        self.http_only = Some(http_only);
        self
    }

    /// Sets cookie secure.
    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = Some(secure);
        self
    }

    /// Sets cookie same site.
    pub fn same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = Some(same_site);
        self
    }

    /// Layers `overrides` on top of `self`. Every attribute set in `overrides` wins,
    /// the others keep the value from `self`.
    pub fn merge(self, overrides: Self) -> Self {
        Self {
            name: overrides.name.or(self.name),
            max_age: overrides.max_age.or(self.max_age),
            path: overrides.path.or(self.path),
            domain: overrides.domain.or(self.domain),
            http_only: overrides.http_only.or(self.http_only),
            secure: overrides.secure.or(self.secure),
            same_site: overrides.same_site.or(self.same_site),
        }
    }

    /// The cookie name the session is stored under.
    #[must_use]
    pub fn cookie_name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_COOKIE_NAME)
    }

    pub(crate) fn resolved_path(&self) -> &str {
        self.path.as_deref().unwrap_or("/")
    }

    pub(crate) fn resolved_same_site(&self) -> SameSite {
        self.same_site.unwrap_or(SameSite::Lax)
    }
}
