//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Publish pipeline:
//!     (site, pattern, metadata)
//!     → segment.rs (canonical form + validation)
//!     → store.rs (atomic upsert / delete)
//!
//! Incoming request (site, decoded path segments):
//!     → matcher.rs (exact lookup, then bounded batch scan)
//!     → params.rs (bind :variables and *catch-alls)
//!     → Return: Resolved (entry + params) or None
//! ```
//!
//! # Design Decisions
//! - One store instance, owned by the host and shared via `Arc`
//! - Exact matches always win over dynamic patterns
//! - First dynamic match in store order wins
//! - Not-found is a normal outcome, represented as `None`

pub mod matcher;
pub mod params;
pub mod segment;
pub mod store;

pub use matcher::{matches, PathMatcher, Step, DEFAULT_BATCH_SIZE};
pub use params::{extract_params, ParamValue, Params};
pub use segment::{segments_of, PatternError, RoutePattern, Segment};
pub use store::{BatchOutcome, PageMetadata, RouteEntry, RouteSource, RouteStore, ScanBatch, ScanCursor};

use serde::Serialize;
use crate::registrar::Site;

/// A matched route together with its parameter bindings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolved {
    #[serde(flatten)]
    pub entry: RouteEntry,
    pub params: Params,
}

impl Resolved {
    /// Resolve `segments` through `matcher` and bind the matched pattern's parameters.
    pub fn find<R, S>(matcher: &PathMatcher, source: &R, site: &Site, segments: &[S]) -> Option<Self>
    where
        R: RouteSource + ?Sized,
        S: AsRef<str>,
    {
        let entry = matcher.lookup(source, site, segments)?;
        let params = extract_params(&entry.pattern, segments);
        Some(Self { entry, params })
    }
}

impl RouteStore {
    /// Find the entry for `segments` with the default batch size.
    pub fn lookup<S: AsRef<str>>(&self, site: &Site, segments: &[S]) -> Option<RouteEntry> {
        PathMatcher::default().lookup(self, site, segments)
    }

    /// Lookup from raw request strings.
    ///
    /// A site identifier that could never have been registered resolves to
    /// `None` instead of an error, so malformed requests cannot fail dispatch.
    pub fn lookup_path(&self, site: &str, path: &str) -> Option<RouteEntry> {
        let site = match Site::new(site) {
            Ok(site) => site,
            Err(err) => {
                tracing::debug!(site, error = %err, "Lookup with malformed site");
                return None;
            }
        };
        self.lookup(&site, &segments_of(path))
    }

    /// Find the entry for `segments` and extract its parameters.
    pub fn resolve<S: AsRef<str>>(&self, site: &Site, segments: &[S]) -> Option<Resolved> {
        Resolved::find(&PathMatcher::default(), self, site, segments)
    }
}
