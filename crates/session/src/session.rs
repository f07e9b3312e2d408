use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Session data carried by the cookie.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Session {
    data: BTreeMap<String, Value>,
}

#[inline]
fn flash_key(key: &str) -> String {
    format!("__flash_{key}__")
}

impl Session {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_data(data: BTreeMap<String, Value>) -> Self {
        Self { data }
    }

    /// Raw session data, flash values included under their marked keys.
    #[must_use]
    pub fn data(&self) -> &BTreeMap<String, Value> {
        &self.data
    }

    /// Returns `true` if the session holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` if a regular or flash value exists for `key`.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        self.data.contains_key(key) || self.data.contains_key(&flash_key(key))
    }

    /// Reads the value stored for `key`.
    ///
    /// A regular value is returned as is. A flash value is removed from the session
    /// by this read, so it must be committed afterwards for the removal to reach the
    /// client.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        if let Some(value) = self.data.get(key) {
            return Some(value.clone());
        }
        self.data.remove(&flash_key(key))
    }

    /// Stores a regular value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Stores a value that is handed out to one reader only. Replaces an unread
    /// flash value for the same key.
    pub fn flash(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        self.data.insert(flash_key(key), value.into());
        self
    }

    /// Removes the regular and the flash value for `key`.
    pub fn unset(&mut self, key: &str) -> &mut Self {
        self.data.remove(key);
        self.data.remove(&flash_key(key));
        self
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_flash_is_read_once() {
        let mut session = Session::new();
        session.flash("message", "hello");
        assert!(session.has("message"));
        assert_eq!(session.get("message"), Some(json!("hello")));
        assert_eq!(session.get("message"), None);
        assert!(session.is_empty());
    }

    #[test]
    fn test_regular_value_survives_reads() {
        let mut session = Session::new();
        session.set("user", "salvo");
        assert_eq!(session.get("user"), Some(json!("salvo")));
        assert_eq!(session.get("user"), Some(json!("salvo")));
        session.unset("user");
        assert!(!session.has("user"));
    }

    #[test]
    fn test_flash_overwrites_unread_value() {
        let mut session = Session::new();
        session.flash("message", "first").flash("message", "second");
        assert_eq!(session.data().len(), 1);
        assert_eq!(session.get("message"), Some(json!("second")));
    }
}
