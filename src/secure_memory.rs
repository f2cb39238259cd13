//! Secret Handling Utilities
//!
//! Passphrases used to encrypt private keys are held in [`Passphrase`], which
//! scrubs its buffer on drop and never prints its contents through `Debug` or
//! `Display`. Serialized key material is carried as [`SecureBytes`].

use serde::{Deserialize, Deserializer};
use std::fmt;
use zeroize::Zeroizing;

/// Serialized private key material, zeroed when dropped
pub type SecureBytes = Zeroizing<Vec<u8>>;

/// A passphrase used as the key-derivation input for PEM encryption.
///
/// The contents are zeroed when the value is dropped and are redacted from
/// formatting output, so a `KeySpec` can be logged with `{:?}` safely.
///
/// # Example
///
/// ```
/// use ssl_pkey::secure_memory::Passphrase;
///
/// let passphrase = Passphrase::new("2x$5{");
/// assert_eq!(format!("{:?}", passphrase), "Passphrase([REDACTED])");
/// assert_eq!(passphrase.expose(), "2x$5{");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Passphrase {
    inner: Zeroizing<String>,
}

impl Passphrase {
    /// Wrap a passphrase
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            inner: Zeroizing::new(secret.into()),
        }
    }

    /// Borrow the secret. Callers must not log or persist the returned value.
    pub fn expose(&self) -> &str {
        &self.inner
    }

    /// Borrow the secret as bytes for the key-derivation call
    pub fn as_bytes(&self) -> &[u8] {
        self.inner.as_bytes()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns `None` for an empty passphrase, which means "no encryption"
    pub fn non_empty(self) -> Option<Self> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

impl fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Passphrase([REDACTED])")
    }
}

impl fmt::Display for Passphrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for Passphrase {
    fn from(secret: String) -> Self {
        Self::new(secret)
    }
}

impl From<&str> for Passphrase {
    fn from(secret: &str) -> Self {
        Self::new(secret)
    }
}

impl<'de> Deserialize<'de> for Passphrase {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Passphrase::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_passphrase_is_redacted() {
        let passphrase = Passphrase::new("hunter2");
        assert!(!format!("{:?}", passphrase).contains("hunter2"));
        assert!(!format!("{}", passphrase).contains("hunter2"));
    }

    #[test]
    fn test_empty_passphrase_means_none() {
        assert!(Passphrase::new("").non_empty().is_none());
        assert!(Passphrase::new("x").non_empty().is_some());
    }

    #[test]
    fn test_passphrase_from_json() {
        let passphrase: Passphrase = serde_json::from_str("\"2x$5{\"").unwrap();
        assert_eq!(passphrase.as_bytes(), b"2x$5{");
    }
}
