use std::fmt::{self, Formatter};
use std::sync::Arc;
use std::time::Duration;

use toasted_flash::ToastType;

/// Default delay before a toast fades out.
pub const DEFAULT_FADE_OUT_AFTER: Duration = Duration::from_millis(5000);

/// Derives the class of a toast from its type.
///
/// A literal class is the constant case: `ClassName::from("bg-red-900")` ignores the type.
#[derive(Clone)]
pub struct ClassName(Arc<dyn Fn(Option<&ToastType>) -> String + Send + Sync>);

impl ClassName {
    /// Create a class name from a mapping function.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(Option<&ToastType>) -> String + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Class for a toast of type `kind`.
    #[must_use]
    pub fn resolve(&self, kind: Option<&ToastType>) -> String {
        (self.0)(kind)
    }
}
impl From<String> for ClassName {
    fn from(class: String) -> Self {
        Self::from_fn(move |_| class.clone())
    }
}
impl From<&str> for ClassName {
    fn from(class: &str) -> Self {
        class.to_owned().into()
    }
}
impl fmt::Debug for ClassName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClassName").field(&"..").finish()
    }
}

/// Content of the dismiss control.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DismissElement {
    /// Plain text, escaped when rendered.
    Text(String),
    /// Markup inserted as is.
    Html(String),
}
impl Default for DismissElement {
    fn default() -> Self {
        Self::Text("X".into())
    }
}
impl From<&str> for DismissElement {
    fn from(text: &str) -> Self {
        Self::Text(text.into())
    }
}

/// What a custom body renderer receives.
#[derive(Clone, Copy, Debug)]
pub struct ToastParts<'a> {
    /// The toast message, not escaped.
    pub message: &'a str,
    /// The toast message, HTML escaped. Use this one when building markup.
    pub escaped_message: &'a str,
    /// The toast type.
    pub kind: Option<&'a ToastType>,
    /// Rendered dismiss control, present when the toast is dismissible.
    pub dismiss: Option<&'a str>,
}

type Children = Arc<dyn Fn(&ToastParts<'_>) -> String + Send + Sync>;

/// Display options of a toast.
#[derive(Clone)]
pub struct ToastOptions {
    pub(crate) dismissible: bool,
    pub(crate) fade_out: bool,
    pub(crate) fade_out_after: Duration,
    pub(crate) class_name: Option<ClassName>,
    pub(crate) dismiss_element: DismissElement,
    pub(crate) dismiss_aria_label: String,
    pub(crate) dismiss_action: Option<String>,
    pub(crate) children: Option<Children>,
}
impl Default for ToastOptions {
    fn default() -> Self {
        Self::new()
    }
}
impl fmt::Debug for ToastOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToastOptions")
            .field("dismissible", &self.dismissible)
            .field("fade_out", &self.fade_out)
            .field("fade_out_after", &self.fade_out_after)
            .field("class_name", &self.class_name)
            .field("dismiss_element", &self.dismiss_element)
            .field("dismiss_aria_label", &self.dismiss_aria_label)
            .field("dismiss_action", &self.dismiss_action)
            .field("children", &self.children.as_ref().map(|_| ".."))
            .finish()
    }
}

impl ToastOptions {
    /// Not dismissible, fades out after [`DEFAULT_FADE_OUT_AFTER`].
    pub fn new() -> Self {
        Self {
            dismissible: false,
            fade_out: true,
            fade_out_after: DEFAULT_FADE_OUT_AFTER,
            class_name: None,
            dismiss_element: DismissElement::default(),
            dismiss_aria_label: "Dismiss".into(),
            dismiss_action: None,
            children: None,
        }
    }

    /// Show a dismiss control.
    #[must_use]
    pub fn dismissible(mut self, dismissible: bool) -> Self {
        self.dismissible = dismissible;
        self
    }

    /// Hide the toast automatically.
    #[must_use]
    pub fn fade_out(mut self, fade_out: bool) -> Self {
        self.fade_out = fade_out;
        self
    }

    /// Delay before the toast hides itself.
    #[must_use]
    pub fn fade_out_after(mut self, delay: Duration) -> Self {
        self.fade_out_after = delay;
        self
    }

    /// Extra class of the toast element.
    #[must_use]
    pub fn class_name(mut self, class_name: impl Into<ClassName>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    /// Content of the dismiss control.
    #[must_use]
    pub fn dismiss_element(mut self, element: impl Into<DismissElement>) -> Self {
        self.dismiss_element = element.into();
        self
    }

    /// Accessible label of the dismiss control.
    #[must_use]
    pub fn dismiss_aria_label(mut self, label: impl Into<String>) -> Self {
        self.dismiss_aria_label = label.into();
        self
    }

    /// Path the dismiss form submits to without scripts, the current path if unset.
    /// A `GET` form submit replaces the query string, so the reloaded page never keeps
    /// the query it was rendered with.
    #[must_use]
    pub fn dismiss_action(mut self, action: impl Into<String>) -> Self {
        self.dismiss_action = Some(action.into());
        self
    }

    /// Replace the default body. The renderer's output is inserted without escaping,
    /// so build markup from [`ToastParts::escaped_message`].
    #[must_use]
    pub fn children<F>(mut self, render: F) -> Self
    where
        F: Fn(&ToastParts<'_>) -> String + Send + Sync + 'static,
    {
        self.children = Some(Arc::new(render));
        self
    }

    /// Whether the toast is dismissible.
    #[must_use]
    pub fn is_dismissible(&self) -> bool {
        self.dismissible
    }

    /// The fade out delay, `None` when fading is off.
    #[must_use]
    pub fn fade_out_delay(&self) -> Option<Duration> {
        self.fade_out.then_some(self.fade_out_after)
    }
}
