use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

/// Presentational category of a toast. Any other string is kept as [`ToastType::Other`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ToastType {
    #[allow(missing_docs)]
    Success,
    #[allow(missing_docs)]
    Error,
    #[allow(missing_docs)]
    Warning,
    #[allow(missing_docs)]
    Info,
    /// An application defined type.
    Other(String),
}

impl ToastType {
    /// The tag as stored in the cookie.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Success => "success",
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
            Self::Other(other) => other,
        }
    }
}

impl From<String> for ToastType {
    fn from(value: String) -> Self {
        match &*value {
            "success" => Self::Success,
            "error" => Self::Error,
            "warning" => Self::Warning,
            "info" => Self::Info,
            _ => Self::Other(value),
        }
    }
}
impl From<&str> for ToastType {
    fn from(value: &str) -> Self {
        value.to_owned().into()
    }
}
impl From<ToastType> for String {
    fn from(value: ToastType) -> Self {
        match value {
            ToastType::Other(other) => other,
            known => known.as_str().to_owned(),
        }
    }
}
impl Display for ToastType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A message flashed for the next request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toast {
    /// The text shown to the user.
    pub message: String,
    /// Optional category, used for styling only.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ToastType>,
}

impl Toast {
    /// Create a toast without a type.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind: None,
        }
    }

    /// Sets the toast type.
    #[must_use]
    pub fn kind(mut self, kind: impl Into<ToastType>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Create a `success` toast.
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message).kind(ToastType::Success)
    }
    /// Create an `error` toast.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message).kind(ToastType::Error)
    }
    /// Create a `warning` toast.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message).kind(ToastType::Warning)
    }
    /// Create an `info` toast.
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message).kind(ToastType::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_tags_are_open() {
        assert_eq!(ToastType::from("success"), ToastType::Success);
        assert_eq!(ToastType::from("promo"), ToastType::Other("promo".into()));
        assert_eq!(String::from(ToastType::Warning), "warning");
        assert_eq!(ToastType::Other("promo".into()).to_string(), "promo");
    }

    #[test]
    fn test_toast_json_shape() {
        let json = serde_json::to_value(Toast::success("saved")).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "saved", "type": "success" }));
        let json = serde_json::to_value(Toast::new("plain")).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "plain" }));
    }
}
