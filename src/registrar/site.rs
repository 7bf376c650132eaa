//! Site identifiers.

use std::fmt;
use std::sync::Arc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifiers starting with this prefix are reserved for internal use.
pub const RESERVED_PREFIX: &str = "beacon_";

/// Errors raised when a site identifier is registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SiteError {
    #[error("site identifier must not be empty")]
    Empty,

    #[error("site identifier '{site}' contains invalid character {ch:?}")]
    InvalidChar { site: String, ch: char },

    #[error("site identifier '{site}' uses the reserved prefix 'beacon_'")]
    Reserved { site: String },
}

/// Tenant identifier scoping a set of registered pages.
///
/// Cheap to clone; ordered by name so it can lead the store key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Site(Arc<str>);

impl Site {
    /// Validate and build a site identifier.
    ///
    /// Accepts atom-like names: ASCII letters, digits and `_`, not starting
    /// with [`RESERVED_PREFIX`].
    pub fn new(name: impl Into<String>) -> Result<Self, SiteError> {
        let name = name.into();
        if name.is_empty() {
            return Err(SiteError::Empty);
        }
        if let Some(ch) = name.chars().find(|c| !(c.is_ascii_alphanumeric() || *c == '_')) {
            return Err(SiteError::InvalidChar { site: name, ch });
        }
        if name.starts_with(RESERVED_PREFIX) {
            return Err(SiteError::Reserved { site: name });
        }
        Ok(Self(Arc::from(name)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Site {
    type Error = SiteError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Site::new(value)
    }
}

impl TryFrom<&str> for Site {
    type Error = SiteError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Site::new(value)
    }
}

impl From<Site> for String {
    fn from(site: Site) -> Self {
        site.0.to_string()
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_site() {
        let site = Site::new("my_site2").unwrap();
        assert_eq!(site.as_str(), "my_site2");
        assert_eq!(site.to_string(), "my_site2");
    }

    #[test]
    fn test_rejects_reserved_prefix() {
        assert_eq!(
            Site::new("beacon_admin"),
            Err(SiteError::Reserved { site: "beacon_admin".into() })
        );
        // Only the exact prefix is reserved
        assert!(Site::new("beacon").is_ok());
    }

    #[test]
    fn test_rejects_non_atom_names() {
        assert_eq!(Site::new(""), Err(SiteError::Empty));
        assert!(matches!(
            Site::new("my site"),
            Err(SiteError::InvalidChar { ch: ' ', .. })
        ));
        assert!(matches!(Site::new("a/b"), Err(SiteError::InvalidChar { ch: '/', .. })));
    }

    #[test]
    fn test_deserialize_validates() {
        let site: Site = serde_json::from_str("\"blog\"").unwrap();
        assert_eq!(site.as_str(), "blog");

        let err = serde_json::from_str::<Site>("\"beacon_internal\"").unwrap_err();
        assert!(err.to_string().contains("reserved prefix"));
    }

    #[test]
    fn test_ordering_by_name() {
        let a = Site::new("alpha").unwrap();
        let b = Site::new("beta").unwrap();
        assert!(a < b);
    }
}
