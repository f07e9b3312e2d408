/*!
# Toasted Flash

Carries one toast message across a redirect.

The message is written into a short lived cookie session as a flash value. The next
request reads it, which clears it, and the emptied session is committed straight
away, so the toast shows up on exactly one page load.

Use the [`ToastFactory`] functions directly from handlers, or hoop a
[`ToastHandler`] in front of a router and go through [`ToastDepotExt`].

Concurrent requests that carry the same stale cookie can each observe the toast
once; whichever response is stored last decides the cookie. Delivery is best
effort by nature of a client held cookie.
*/
#![doc(html_favicon_url = "https://salvo.rs/favicon-32x32.png")]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
mod factory;
mod toast;

use std::fmt::{self, Formatter};

use salvo_core::http::header::{HeaderMap, SET_COOKIE};
use salvo_core::http::StatusError;
use salvo_core::{Depot, FlowCtrl, Handler, Request, Response, async_trait};
use toasted_session::{PassThrough, Signer};

pub use error::FlashError;
pub use factory::{DEFAULT_COOKIE_NAME, DEFAULT_MAX_AGE_SECS, ToastFactory, default_cookie_options};
pub use toast::{Toast, ToastType};
pub use toasted_session as session;

/// Key for the incoming toast in depot.
pub const INCOMING_TOAST_KEY: &str = "::toasted::flash::incoming_toast";

/// Key for the outgoing toast in depot.
pub const OUTGOING_TOAST_KEY: &str = "::toasted::flash::outgoing_toast";

/// Toast access on `Depot`, filled and drained by [`ToastHandler`].
pub trait ToastDepotExt {
    /// The toast consumed for this request.
    fn incoming_toast(&self) -> Option<&Toast>;
    /// Queue a toast for the next request. Replaces a toast queued earlier.
    fn set_outgoing_toast(&mut self, toast: Toast) -> &mut Self;
    /// Take the queued toast.
    fn take_outgoing_toast(&mut self) -> Option<Toast>;
}

impl ToastDepotExt for Depot {
    #[inline]
    fn incoming_toast(&self) -> Option<&Toast> {
        self.get(INCOMING_TOAST_KEY).ok()
    }
    #[inline]
    fn set_outgoing_toast(&mut self, toast: Toast) -> &mut Self {
        self.insert(OUTGOING_TOAST_KEY, toast)
    }
    #[inline]
    fn take_outgoing_toast(&mut self) -> Option<Toast> {
        self.remove(OUTGOING_TOAST_KEY).ok()
    }
}

impl<S: Signer> ToastFactory<S> {
    /// Into `ToastHandler`.
    pub fn into_handler(self) -> ToastHandler<S> {
        ToastHandler::new(self)
    }
}

/// Middleware that consumes the incoming toast before the route runs and flashes the
/// outgoing one after it.
///
/// A session failure, such as a signer error, replaces the response with
/// `500 Internal Server Error`; a failed consume skips the route.
pub struct ToastHandler<S = PassThrough> {
    factory: ToastFactory<S>,
}
impl<S: Signer> fmt::Debug for ToastHandler<S> {
    #[inline]
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToastHandler").field("factory", &self.factory).finish()
    }
}

impl<S: Signer> ToastHandler<S> {
    /// Create new `ToastHandler`
    pub fn new(factory: ToastFactory<S>) -> Self {
        Self { factory }
    }

    /// The factory this handler works with.
    pub fn factory(&self) -> &ToastFactory<S> {
        &self.factory
    }
}

#[async_trait]
impl<S> Handler for ToastHandler<S>
where
    S: Signer,
{
    async fn handle(&self, req: &mut Request, depot: &mut Depot, res: &mut Response, ctrl: &mut FlowCtrl) {
        let mut recommitted = HeaderMap::new();
        match self.factory.consume_request(req, &mut recommitted).await {
            Ok(Some(toast)) => {
                depot.insert(INCOMING_TOAST_KEY, toast);
            }
            Ok(None) => {}
            Err(e) => {
                tracing::error!(error = ?e, "consume toast failed");
                res.render(StatusError::internal_server_error().cause(e));
                ctrl.skip_rest();
                return;
            }
        }

        ctrl.call_next(req, depot, res).await;
        if ctrl.is_ceased() {
            return;
        }

        if let Some(toast) = depot.take_outgoing_toast() {
            if let Err(e) = self.factory.flash(&toast, res.headers_mut()).await {
                tracing::error!(error = ?e, "flash toast failed");
                res.render(StatusError::internal_server_error().cause(e));
            }
        } else if !self.factory.has_cookie(res.headers()) {
            for value in recommitted.get_all(SET_COOKIE) {
                res.headers_mut().append(SET_COOKIE, value.clone());
            }
        }
    }
}
