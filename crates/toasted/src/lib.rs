//! Flash-once toast notifications for salvo.
//!
//! A handler flashes a [`Toast`](flash::Toast) into a short lived cookie and redirects;
//! the next page load consumes it, which clears it, and renders it with
//! [`ToastView`](view::ToastView) or [`render_toast`](view::render_toast).

#![doc(html_favicon_url = "https://salvo.rs/favicon-32x32.png")]
#![cfg_attr(docsrs, feature(doc_cfg))]

#[doc(no_inline)]
pub use toasted_session as session;

#[cfg(feature = "flash")]
#[cfg_attr(docsrs, doc(cfg(feature = "flash")))]
#[doc(no_inline)]
pub use toasted_flash as flash;

#[cfg(feature = "view")]
#[cfg_attr(docsrs, doc(cfg(feature = "view")))]
#[doc(no_inline)]
pub use toasted_view as view;

/// A list of things that automatically imports into application use toasted.
pub mod prelude {
    pub use toasted_session::{CookieOptions, HmacSigner, PassThrough, SameSite, Signer};

    #[cfg(feature = "flash")]
    pub use toasted_flash::{Toast, ToastDepotExt, ToastFactory, ToastHandler, ToastType};

    #[cfg(feature = "view")]
    pub use toasted_view::{ClassName, DismissElement, ToastOptions, ToastView, render_toast};
}
