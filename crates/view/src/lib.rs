/*!
# Toasted View

Server rendered markup for the toast consumed by [`toasted_flash`].

```rust,ignore
let options = ToastOptions::new()
    .dismissible(true)
    .fade_out_after(Duration::from_secs(6))
    .class_name(ClassName::from_fn(|kind| match kind {
        Some(ToastType::Success) => "bg-green-500 text-white".into(),
        _ => "not-success".into(),
    }));
let html = render_toast(&options, toast.as_ref())?;
```

The markup carries a small inline script that hides the toast when its fade delay
elapses or when the dismiss control is used. Without scripts the dismiss control is
a plain `GET` form that reloads the page, and since the toast was already consumed
the reloaded page shows none.
*/
#![doc(html_favicon_url = "https://salvo.rs/favicon-32x32.png")]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod markup;
mod options;
mod view;

pub use markup::render_toast;
pub use options::{ClassName, DEFAULT_FADE_OUT_AFTER, DismissElement, ToastOptions, ToastParts};
pub use view::ToastView;

/// Errors raised while rendering a toast.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ViewError {
    /// The template failed to render.
    #[error("render toast failed: {0}")]
    Template(#[from] askama::Error),
}

#[cfg(test)]
mod tests {
    use toasted_flash::Toast;

    use super::*;

    #[test]
    fn test_render_toast_without_toast() {
        assert_eq!(render_toast(&ToastOptions::new(), None).unwrap(), "");
        assert_eq!(render_toast(&ToastOptions::new(), Some(&Toast::new(""))).unwrap(), "");
    }

    #[test]
    fn test_render_toast_uses_full_delay() {
        let options = ToastOptions::new().fade_out_after(std::time::Duration::from_millis(6000));
        let html = render_toast(&options, Some(&Toast::success("saved"))).unwrap();
        assert!(html.contains(r#"data-fade-out-after="6000""#));
        assert!(html.contains(r#"<span class="toasted-message">saved</span>"#));
    }
}
