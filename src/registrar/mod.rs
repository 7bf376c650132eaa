//! Registration boundary.
//!
//! # Data Flow
//! ```text
//! Host startup:
//!     [[sites]] config
//!     → site.rs (identifier validation, reserved prefix)
//!     → sites.rs (mount point: prefix + base URL)
//!
//! Link rendering:
//!     (site, file name)
//!     → paths.rs (asset_path)
//!     → sites.rs (asset_url = base URL + asset_path)
//! ```
//!
//! # Design Decisions
//! - Invalid identifiers fail at registration, never at lookup
//! - Mount prefixes come from explicit configuration supplied at startup
//! - Path helpers are pure and shared by every caller building store keys

pub mod paths;
pub mod site;
pub mod sites;

pub use paths::{asset_path, build_path_with_prefix, sanitize_path};
pub use site::{Site, SiteError, RESERVED_PREFIX};
pub use sites::{MountPoint, RegistrarError, SiteRegistry};
