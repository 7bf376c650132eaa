//! Route matching logic.
//!
//! # Responsibilities
//! - Resolve (site, request segments) to a stored route
//! - Exact key lookup first, bounded batch scan second
//! - Compare dynamic patterns segment by segment
//!
//! # Design Decisions
//! - The segment walk is a small state machine: each position yields
//!   [`Step::Continue`], [`Step::Accept`] or [`Step::Reject`]
//! - A catch-all accepts at its own position without inspecting the tail
//! - Scanning stops on the first match; no further batch is requested
//! - Not-found is `None`, never an error

use crate::observability::metrics;
use crate::registrar::Site;
use crate::routing::segment::{split_segments, Segment};
use crate::routing::store::{RouteEntry, RouteSource, ScanCursor};

/// Entries inspected per scan call unless configured otherwise.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Outcome of comparing one position of the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// This position matched; move to the next one.
    Continue,
    /// The whole request is matched.
    Accept,
    /// The pattern cannot match this request.
    Reject,
}

/// Evaluate position `position` of the walk.
pub fn step_at<S: AsRef<str>>(pattern: &[&str], request: &[S], position: usize) -> Step {
    if position == request.len() {
        return if position == pattern.len() {
            Step::Accept
        } else {
            Step::Reject
        };
    }

    let Some(raw) = pattern.get(position) else {
        return Step::Reject;
    };

    match Segment::classify(raw) {
        Segment::CatchAll(_) => Step::Accept,
        Segment::Variable(_) => Step::Continue,
        Segment::Static(literal) if literal == request[position].as_ref() => Step::Continue,
        Segment::Static(_) => Step::Reject,
    }
}

/// Walk a split pattern against the request until it accepts or rejects.
pub fn walk<S: AsRef<str>>(pattern: &[&str], request: &[S]) -> Step {
    let has_catch_all = pattern.iter().any(|s| Segment::classify(s).is_catch_all());
    // A catch-all still occupies a request position, so a longer pattern can never fit.
    if has_catch_all && pattern.len() > request.len() {
        return Step::Reject;
    }

    let mut position = 0;
    loop {
        match step_at(pattern, request, position) {
            Step::Continue => position += 1,
            done => return done,
        }
    }
}

/// Whether `pattern` matches the request segments.
pub fn matches<S: AsRef<str>>(pattern: &str, request: &[S]) -> bool {
    let pattern: Vec<&str> = split_segments(pattern).collect();
    walk(&pattern, request) == Step::Accept
}

/// Resolves request segments against a [`RouteSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathMatcher {
    batch_size: usize,
}

impl PathMatcher {
    /// Create a matcher scanning `batch_size` entries per call (at least one).
    pub fn new(batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.max(1),
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Find the route for `segments` under `site`.
    ///
    /// An exact key hit wins over any dynamic pattern. Otherwise the site's
    /// entries are scanned in store order and the first match is returned.
    pub fn lookup<R, S>(&self, source: &R, site: &Site, segments: &[S]) -> Option<RouteEntry>
    where
        R: RouteSource + ?Sized,
        S: AsRef<str>,
    {
        let parts: Vec<&str> = segments.iter().map(AsRef::as_ref).collect();
        let canonical = parts.join("/");

        if let Some(entry) = source.get(site, &canonical) {
            tracing::debug!(site = %site, path = %canonical, "Exact route match");
            metrics::record_lookup("exact");
            return Some(entry);
        }

        let mut cursor = ScanCursor::start();
        let mut batches = 0usize;
        loop {
            let batch = source.scan(site, &cursor, self.batch_size);
            batches += 1;

            if let Some(entry) = batch
                .entries
                .into_iter()
                .find(|entry| matches(&entry.pattern, segments))
            {
                tracing::debug!(
                    site = %site,
                    path = %canonical,
                    pattern = %entry.pattern,
                    batches,
                    "Dynamic route match"
                );
                metrics::record_lookup("dynamic");
                metrics::record_scan_batches(batches);
                return Some(entry);
            }

            match batch.next {
                Some(next) => cursor = next,
                None => break,
            }
        }

        tracing::debug!(site = %site, path = %canonical, batches, "No route matched");
        metrics::record_lookup("not_found");
        metrics::record_scan_batches(batches);
        None
    }
}

impl Default for PathMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catch_all_matches_tail() {
        assert!(matches("/posts/*slug", &["posts", "a", "b", "c"]));
        assert!(matches("/posts/*slug", &["posts", "a"]));
        // Catch-all needs at least one segment
        assert!(!matches("/posts/*slug", &["posts"]));
    }

    #[test]
    fn test_variable_matches_exactly_one_segment() {
        assert!(matches("/posts/:id", &["posts", "42"]));
        assert!(!matches("/posts/:id", &["posts"]));
        assert!(!matches("/posts/:id", &["posts", "42", "extra"]));
    }

    #[test]
    fn test_static_segments_must_be_equal() {
        assert!(matches("/posts/:id/edit", &["posts", "1", "edit"]));
        assert!(!matches("/posts/:id/edit", &["posts", "1", "show"]));
        assert!(!matches("/pages/:id", &["posts", "1"]));
    }

    #[test]
    fn test_length_guard_with_catch_all() {
        assert!(!matches("/a/*b/c", &["a"]));
        assert!(!matches("/*rest", &[] as &[&str]));
    }

    #[test]
    fn test_root_pattern() {
        assert!(matches("", &[] as &[&str]));
        assert!(matches("/", &[] as &[&str]));
        assert!(!matches("/", &["a"]));
        assert!(!matches("/:id", &[] as &[&str]));
    }

    #[test]
    fn test_step_outcomes() {
        let pattern = ["posts", ":id"];
        assert_eq!(step_at(&pattern, &["posts", "1"], 0), Step::Continue);
        assert_eq!(step_at(&pattern, &["posts", "1"], 1), Step::Continue);
        assert_eq!(step_at(&pattern, &["posts", "1"], 2), Step::Accept);
        // Request exhausted while pattern remains
        assert_eq!(step_at(&pattern, &["posts"], 1), Step::Reject);
        // Pattern exhausted while request remains
        assert_eq!(step_at(&pattern, &["posts", "1", "x"], 2), Step::Reject);
        assert_eq!(step_at(&["*all"], &["x", "y"], 0), Step::Accept);
    }

    #[test]
    fn test_walk_ignores_tail_after_catch_all() {
        assert_eq!(walk(&["docs", "*path"], &["docs", "a", "b"]), Step::Accept);
    }

    #[test]
    fn test_batch_size_floor() {
        assert_eq!(PathMatcher::new(0).batch_size(), 1);
        assert_eq!(PathMatcher::default().batch_size(), DEFAULT_BATCH_SIZE);
    }
}
