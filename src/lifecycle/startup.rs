//! Startup orchestration.
//!
//! # Responsibilities
//! - Initialize the process-wide route store exactly once
//! - Register configured sites and publish configured routes
//! - Hand the host a handle for request-time resolution
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The store is an owned `Arc`; the global slot only exists for hosts
//!   that want a single process-wide instance
//! - Routes are published only after every site registered successfully

use std::sync::{Arc, OnceLock};
use thiserror::Error;

use crate::config::RouterConfig;
use crate::lifecycle::reload::RouteReloader;
use crate::registrar::{RegistrarError, Site, SiteRegistry};
use crate::routing::segment::segments_of;
use crate::routing::{PathMatcher, Resolved, RouteStore};

static STORE: OnceLock<Arc<RouteStore>> = OnceLock::new();

/// Errors that stop the router from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("route store already initialized")]
    AlreadyInitialized,

    #[error(transparent)]
    Registrar(#[from] RegistrarError),
}

/// Allocate the process-wide route store. Fails if called twice.
pub fn init() -> Result<Arc<RouteStore>, StartupError> {
    let store = Arc::new(RouteStore::new());
    STORE
        .set(store.clone())
        .map_err(|_| StartupError::AlreadyInitialized)?;
    tracing::info!("Route store initialized");
    Ok(store)
}

/// The store created by [`init`], if any.
pub fn global_store() -> Option<Arc<RouteStore>> {
    STORE.get().cloned()
}

/// Everything a host needs to serve lookups.
#[derive(Debug, Clone)]
pub struct Runtime {
    pub store: Arc<RouteStore>,
    pub sites: Arc<SiteRegistry>,
    pub matcher: PathMatcher,
    pub reloader: Arc<RouteReloader>,
}

impl Runtime {
    /// Resolve decoded request segments for `site`.
    pub fn resolve<S: AsRef<str>>(&self, site: &Site, segments: &[S]) -> Option<Resolved> {
        Resolved::find(&self.matcher, self.store.as_ref(), site, segments)
    }

    /// Resolve raw request strings; malformed input yields `None`.
    pub fn resolve_path(&self, site: &str, path: &str) -> Option<Resolved> {
        let site = Site::new(site).ok()?;
        self.resolve(&site, &segments_of(path))
    }
}

/// Register sites and publish routes from `config` into `store`.
pub fn bootstrap(store: Arc<RouteStore>, config: &RouterConfig) -> Result<Runtime, StartupError> {
    let sites = Arc::new(SiteRegistry::new());
    let reloader = Arc::new(RouteReloader::new(store.clone(), sites.clone()));
    let summary = reloader.apply(config)?;

    tracing::info!(
        sites = sites.len(),
        routes = summary.upserted,
        batch_size = config.lookup.batch_size,
        "Router bootstrapped"
    );

    Ok(Runtime {
        store,
        sites,
        matcher: PathMatcher::new(config.lookup.batch_size),
        reloader,
    })
}
