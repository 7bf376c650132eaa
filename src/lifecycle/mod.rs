//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     init() → Load config → Register sites → Publish routes → Runtime
//!
//! Reload (reload.rs):
//!     New config → Register sites → Upsert routes → Delete dropped routes
//! ```
//!
//! # Design Decisions
//! - Ordered startup: store first, then sites, then routes
//! - A reload never removes routes it did not publish
//! - Lookups never wait on startup or reload work

pub mod reload;
pub mod startup;

pub use reload::{ReloadSummary, RouteReloader};
pub use startup::{bootstrap, global_store, init, Runtime, StartupError};
