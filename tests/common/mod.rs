//! Shared utilities for integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use site_router::registrar::Site;
use site_router::routing::{
    PageMetadata, RouteEntry, RoutePattern, RouteSource, RouteStore, ScanBatch, ScanCursor,
};

pub fn site(name: &str) -> Site {
    Site::new(name).unwrap()
}

pub fn pattern(raw: &str) -> RoutePattern {
    RoutePattern::parse(raw).unwrap()
}

pub fn page(id: &str) -> PageMetadata {
    PageMetadata {
        page_id: id.to_string(),
        layout_id: "main".to_string(),
        format: "heex".to_string(),
        page_module: format!("Pages.{}", id),
        component_module: "Components".to_string(),
    }
}

/// Wraps a store and counts what the matcher asks of it.
pub struct CountingSource<'a> {
    inner: &'a RouteStore,
    scans: AtomicUsize,
    inspected: AtomicUsize,
}

#[allow(dead_code)]
impl<'a> CountingSource<'a> {
    pub fn new(inner: &'a RouteStore) -> Self {
        Self {
            inner,
            scans: AtomicUsize::new(0),
            inspected: AtomicUsize::new(0),
        }
    }

    /// Number of scan calls made.
    pub fn scans(&self) -> usize {
        self.scans.load(Ordering::SeqCst)
    }

    /// Number of entries handed out by scans.
    pub fn inspected(&self) -> usize {
        self.inspected.load(Ordering::SeqCst)
    }
}

impl RouteSource for CountingSource<'_> {
    fn get(&self, site: &Site, pattern: &str) -> Option<RouteEntry> {
        self.inner.get(site, pattern)
    }

    fn scan(&self, site: &Site, cursor: &ScanCursor, batch_size: usize) -> ScanBatch {
        self.scans.fetch_add(1, Ordering::SeqCst);
        let batch = self.inner.scan(site, cursor, batch_size);
        self.inspected.fetch_add(batch.entries.len(), Ordering::SeqCst);
        batch
    }
}
