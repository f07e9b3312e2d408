use std::sync::Arc;
use std::time::Duration;

use toasted::prelude::*;
use toasted::session::SessionError;

pub(crate) type Toasts = ToastFactory<Arc<dyn Signer>>;

const DEFAULT_LISTEN: &str = "127.0.0.1:5800";

/// Settings read from the environment.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Config {
    /// `TOASTED_LISTEN`
    pub(crate) listen: String,
    /// `TOASTED_SECRET`, signs the toast cookie when set.
    pub(crate) secret: Option<String>,
}

impl Config {
    pub(crate) fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            listen: lookup("TOASTED_LISTEN")
                .filter(|listen| !listen.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LISTEN.to_owned()),
            secret: lookup("TOASTED_SECRET").filter(|secret| !secret.is_empty()),
        }
    }

    pub(crate) fn toasts(&self) -> Result<Toasts, SessionError> {
        let signer: Arc<dyn Signer> = match &self.secret {
            Some(secret) => Arc::new(HmacSigner::new(secret)?),
            None => {
                tracing::warn!("TOASTED_SECRET is not set, toast cookies are not signed");
                Arc::new(PassThrough)
            }
        };
        Ok(ToastFactory::with_signer(CookieOptions::new().http_only(true), signer))
    }
}

pub(crate) fn toast_options() -> ToastOptions {
    ToastOptions::new()
        .fade_out(true)
        .fade_out_after(Duration::from_secs(6))
        .dismissible(true)
        .dismiss_element("❌")
        .dismiss_aria_label("Dismiss notification")
        .class_name(ClassName::from_fn(|kind| match kind {
            Some(ToastType::Success) => "bg-green-500 text-white".to_owned(),
            _ => "not-success".to_owned(),
        }))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config.listen, DEFAULT_LISTEN);
        assert_eq!(config.secret, None);
        assert!(config.toasts().is_ok());
    }

    #[test]
    fn test_from_vars() {
        let config = Config::from_lookup(lookup(&[
            ("TOASTED_LISTEN", "0.0.0.0:8080"),
            ("TOASTED_SECRET", "secret"),
        ]));
        assert_eq!(config.listen, "0.0.0.0:8080");
        assert_eq!(config.secret.as_deref(), Some("secret"));

        let toasts = config.toasts().unwrap();
        assert_eq!(toasts.cookie_name(), "remix-toasted");
        assert_eq!(toasts.cookie_options().http_only, Some(true));
    }
}
