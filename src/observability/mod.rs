//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, gauges, histograms via the metrics facade)
//!
//! Consumers:
//!     → Log output (stdout, filtered by RUST_LOG or config)
//!     → Whatever metrics recorder the host installs
//! ```
//!
//! # Design Decisions
//! - Structured fields (site, pattern) on every routing event
//! - Metrics are cheap and no-ops until a recorder is installed
//! - Per-lookup events are debug level; lifecycle events are info

pub mod logging;
pub mod metrics;
