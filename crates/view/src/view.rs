use tokio::time::{Instant, sleep_until};
use toasted_flash::Toast;

use crate::markup::render_markup;
use crate::{ToastOptions, ViewError};

/// A toast on screen.
///
/// Hidden while there is no toast; visible once one is received; hidden again after
/// [`dismiss`](Self::dismiss) or when the fade timer runs out. Receiving another
/// toast replaces the current one, clears the dismissal and restarts the timer.
#[derive(Debug)]
pub struct ToastView {
    options: ToastOptions,
    toast: Option<Toast>,
    dismissed: bool,
    shown_at: Option<Instant>,
}

impl ToastView {
    /// Create a view with nothing to show.
    pub fn new(options: ToastOptions) -> Self {
        Self {
            options,
            toast: None,
            dismissed: false,
            shown_at: None,
        }
    }

    /// The display options.
    #[inline]
    pub fn options(&self) -> &ToastOptions {
        &self.options
    }

    /// The current toast, visible or not.
    #[inline]
    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    /// Hands the view the toast loaded for this page, if any. A toast with an empty
    /// message counts as none.
    pub fn receive(&mut self, toast: Option<Toast>) {
        match toast.filter(|toast| !toast.message.is_empty()) {
            Some(toast) => {
                tracing::trace!(message = %toast.message, "show toast");
                self.toast = Some(toast);
                self.dismissed = false;
                self.shown_at = Some(Instant::now());
            }
            None => {
                self.toast = None;
                self.shown_at = None;
            }
        }
    }

    /// Hides the toast right away, regardless of the fade timer.
    pub fn dismiss(&mut self) {
        self.dismissed = true;
    }

    /// When the fade timer fires, `None` if no timer is running.
    #[must_use]
    pub fn fade_deadline(&self) -> Option<Instant> {
        if self.dismissed {
            return None;
        }
        let delay = self.options.fade_out_delay()?;
        self.shown_at.map(|shown_at| shown_at + delay)
    }

    /// Returns `true` while the toast should be on screen.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.toast.is_some() && !self.dismissed && self.fade_deadline().is_none_or(|deadline| Instant::now() < deadline)
    }

    /// Resolves when the fade timer fires. Never resolves while no timer is running,
    /// dropping the future cancels the wait.
    pub async fn faded(&self) {
        match self.fade_deadline() {
            Some(deadline) => sleep_until(deadline).await,
            None => std::future::pending().await,
        }
    }

    /// Markup for the current state, empty while hidden. The client side fade delay
    /// is the time left on the timer.
    pub fn render(&self) -> Result<String, ViewError> {
        let Some(toast) = self.toast.as_ref().filter(|_| self.is_visible()) else {
            return Ok(String::new());
        };
        let remaining = self
            .fade_deadline()
            .map(|deadline| deadline.saturating_duration_since(Instant::now()));
        render_markup(&self.options, toast, remaining)
    }
}
