use std::time::Duration;

use askama::Template;
use toasted_flash::Toast;

use crate::{DismissElement, ToastOptions, ToastParts, ViewError};

#[derive(Template)]
#[template(path = "toast.html")]
struct ToastTemplate<'a> {
    class_name: &'a str,
    fade_out_after: Option<u128>,
    message: &'a str,
    dismiss: Option<&'a str>,
    custom: Option<&'a str>,
}

#[derive(Template)]
#[template(path = "dismiss.html")]
struct DismissTemplate<'a> {
    aria_label: &'a str,
    action: Option<&'a str>,
    content: &'a str,
    raw: bool,
}

#[derive(Template)]
#[template(source = "{{ text }}", ext = "html")]
struct EscapeTemplate<'a> {
    text: &'a str,
}

fn render_dismiss(options: &ToastOptions) -> Result<String, ViewError> {
    let (content, raw) = match &options.dismiss_element {
        DismissElement::Text(text) => (text.as_str(), false),
        DismissElement::Html(html) => (html.as_str(), true),
    };
    Ok(DismissTemplate {
        aria_label: &options.dismiss_aria_label,
        action: options.dismiss_action.as_deref(),
        content,
        raw,
    }
    .render()?)
}

pub(crate) fn render_markup(
    options: &ToastOptions,
    toast: &Toast,
    fade_out_after: Option<Duration>,
) -> Result<String, ViewError> {
    let class_name = options
        .class_name
        .as_ref()
        .map(|class| class.resolve(toast.kind.as_ref()))
        .unwrap_or_default();
    let dismiss = if options.dismissible {
        Some(render_dismiss(options)?)
    } else {
        None
    };
    let custom = if let Some(render) = &options.children {
        let escaped_message = EscapeTemplate { text: &toast.message }.render()?;
        Some(render(&ToastParts {
            message: &toast.message,
            escaped_message: &escaped_message,
            kind: toast.kind.as_ref(),
            dismiss: dismiss.as_deref(),
        }))
    } else {
        None
    };
    Ok(ToastTemplate {
        class_name: class_name.trim(),
        fade_out_after: fade_out_after.map(|delay| delay.as_millis()),
        message: &toast.message,
        dismiss: dismiss.as_deref(),
        custom: custom.as_deref(),
    }
    .render()?)
}

/// Renders `toast` as freshly received, or nothing when there is no toast to show.
///
/// Handy for server rendered pages that consume the toast and render it in the same
/// request; use [`ToastView`](crate::ToastView) when the toast outlives the render.
pub fn render_toast(options: &ToastOptions, toast: Option<&Toast>) -> Result<String, ViewError> {
    match toast {
        Some(toast) if !toast.message.is_empty() => render_markup(options, toast, options.fade_out_delay()),
        _ => Ok(String::new()),
    }
}
