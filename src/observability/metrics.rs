//! Metrics collection.
//!
//! # Metrics
//! - `site_router_lookups_total` (counter): lookups by outcome (exact, dynamic, not_found)
//! - `site_router_scan_batches` (histogram): batches fetched by one dynamic lookup
//! - `site_router_routes` (gauge): entries currently in the store
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; the host picks the exporter

/// Count one lookup by outcome.
pub fn record_lookup(outcome: &'static str) {
    metrics::counter!("site_router_lookups_total", "outcome" => outcome).increment(1);
}

/// Record how many scan batches a dynamic lookup fetched.
pub fn record_scan_batches(batches: usize) {
    metrics::histogram!("site_router_scan_batches").record(batches as f64);
}

/// Record the current number of stored routes.
pub fn record_route_count(count: usize) {
    metrics::gauge!("site_router_routes").set(count as f64);
}
