//! Secret store abstraction.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Result, SecretError};

/// A secret read from a store. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretValue(String);

impl SecretValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The secret text.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretValue([REDACTED])")
    }
}

impl fmt::Display for SecretValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Source of named secrets.
pub trait SecretStore {
    fn get_secret(&self, name: &str) -> Result<SecretValue>;
}

impl<S: SecretStore + ?Sized> SecretStore for &S {
    fn get_secret(&self, name: &str) -> Result<SecretValue> {
        (**self).get_secret(name)
    }
}

impl<S: SecretStore + ?Sized> SecretStore for Box<S> {
    fn get_secret(&self, name: &str) -> Result<SecretValue> {
        (**self).get_secret(name)
    }
}

/// Fixed set of secrets held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySecretStore {
    secrets: BTreeMap<String, SecretValue>,
}

impl InMemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_secret(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.secrets.insert(name.into(), SecretValue::new(value));
        self
    }
}

impl SecretStore for InMemorySecretStore {
    fn get_secret(&self, name: &str) -> Result<SecretValue> {
        self.secrets
            .get(name)
            .cloned()
            .ok_or_else(|| SecretError::SecretNotFound {
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_value_is_never_formatted() {
        let value = SecretValue::new("AccountKey=abc123");
        assert_eq!(format!("{value}"), "[REDACTED]");
        assert!(!format!("{value:?}").contains("abc123"));
        assert_eq!(value.expose(), "AccountKey=abc123");
    }

    #[test]
    fn in_memory_lookup() {
        let store = InMemorySecretStore::new().with_secret("a", "1");
        assert_eq!(store.get_secret("a").unwrap().expose(), "1");
        assert!(matches!(
            store.get_secret("b"),
            Err(SecretError::SecretNotFound { .. })
        ));
    }
}
