//! Credential values that never show up in logs or debug output.

use std::fmt;

use serde::ser::Error;
use zeroize::Zeroize;

/// Fixed token printed in place of any secret value.
pub const MASK: &str = "********";

#[derive(Clone, PartialEq, Eq)]
pub struct Secret {
    inner: String,
}

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            inner: value.into(),
        }
    }

    /// The actual value, for putting on the wire.
    #[inline]
    pub fn expose(&self) -> &str {
        &self.inner
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Secret({MASK})")
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(MASK)
    }
}

impl Drop for Secret {
    fn drop(&mut self) {
        self.inner.zeroize();
    }
}

impl serde::Serialize for Secret {
    fn serialize<S>(&self, _serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        Err(S::Error::custom(
            "Secret cannot be serialized - use expose() explicitly",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formatting_never_shows_the_value() {
        let secret = Secret::new("s3cr3t-value");

        assert_eq!(format!("{secret}"), MASK);
        assert!(!format!("{secret:?}").contains("s3cr3t-value"));
        assert_eq!(secret.expose(), "s3cr3t-value");
    }

    #[test]
    fn serialization_is_refused() {
        let secret = Secret::new("s3cr3t-value");

        assert!(serde_json::to_string(&secret).is_err());
    }
}
