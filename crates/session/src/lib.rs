/*!
# Toasted Session Support

A small cookie session substrate. Unlike a server-side session store, the
complete session lives in the cookie value itself:

1. The session data is serialized as JSON and encoded with base64url.
2. The encoded value is handed to a [`Signer`]. [`PassThrough`] leaves it untouched,
   [`HmacSigner`] prefixes an HMAC-SHA256 digest.
3. The result is written as a `Set-Cookie` header value built from [`CookieOptions`].

On the way back in, a missing cookie, a signature that does not verify, or a value
that does not decode all produce an empty [`Session`]. Only failures of the signer
itself are reported as errors.

## Flash values

[`Session::flash`] stores a value that is removed by the first [`Session::get`] that
reads it. Committing the session after reading is what makes the removal stick:
the next request carries a cookie without the value.
*/
#![doc(html_favicon_url = "https://salvo.rs/favicon-32x32.png")]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod options;
mod session;
mod signer;
mod storage;

pub use cookie::SameSite;
pub use cookie::time::Duration;

pub use error::SessionError;
pub use options::CookieOptions;
pub use session::Session;
pub use signer::{HmacSigner, PassThrough, Signer};
pub use storage::CookieSessionStorage;

/// Cookie name used when [`CookieOptions::name`] was never set.
pub const DEFAULT_COOKIE_NAME: &str = "__session";

/// Largest `Set-Cookie` value browsers are expected to keep.
pub const MAX_COOKIE_SIZE: usize = 4096;
