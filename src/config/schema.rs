//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::registrar::Site;
use crate::routing::matcher::DEFAULT_BATCH_SIZE;
use crate::routing::segment::{PatternError, RoutePattern};
use crate::routing::store::PageMetadata;

/// Root configuration for the router.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Lookup tuning.
    pub lookup: LookupConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Site mount points.
    pub sites: Vec<SiteConfig>,

    /// Published pages.
    pub routes: Vec<RouteConfig>,
}

/// Lookup configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Entries inspected per scan batch during dynamic matching.
    pub batch_size: usize,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Mount point of one site.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SiteConfig {
    /// Site identifier, validated on load.
    pub site: Site,

    /// Path prefix the host mounts the site's pages under.
    #[serde(default = "default_prefix")]
    pub prefix: String,

    /// Base URL for asset links (e.g., "https://example.com").
    pub base_url: String,
}

fn default_prefix() -> String {
    "/".to_string()
}

/// A published page.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouteConfig {
    pub site: Site,

    /// Path pattern, e.g. "/posts/:id" or "/docs/*path".
    pub path: String,

    #[serde(flatten)]
    pub page: PageMetadata,
}

impl RouteConfig {
    /// Validated, canonical form of `path`.
    pub fn pattern(&self) -> Result<RoutePattern, PatternError> {
        RoutePattern::parse(&self.path)
    }
}
