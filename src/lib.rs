//! Multi-tenant page route registration and path resolution.
//!
//! ```text
//! host publish pipeline ──▶ RouteStore ◀── PathMatcher ◀── request dispatch
//!                                              │
//!                                              ▼
//!                                       ParamExtractor
//! ```

pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod registrar;
pub mod routing;

pub use config::RouterConfig;
pub use lifecycle::{bootstrap, init, Runtime};
pub use registrar::{Site, SiteRegistry};
pub use routing::{
    extract_params, matches, PageMetadata, ParamValue, Params, PathMatcher, Resolved, RouteEntry,
    RoutePattern, RouteStore,
};
