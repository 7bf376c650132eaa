//! Concurrent route store.
//!
//! # Responsibilities
//! - Hold every (site, pattern) → page metadata association
//! - Upsert and delete single entries atomically
//! - Serve exact lookups, per-site dumps and bounded batch scans
//!
//! # Design Decisions
//! - Entries live in an ordered map behind `ArcSwap`; readers load a snapshot and
//!   never block writers
//! - Writers publish a new map with `rcu`, so each insert/delete is atomic per key
//! - `apply_batch` folds many changes into one snapshot swap and skips no-op writes
//! - A scan may or may not observe a write that lands between two batches
//! - Ordering is the natural (site, pattern) key order and says nothing about traffic

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};

use crate::observability::metrics;
use crate::registrar::Site;
use crate::routing::segment::RoutePattern;

/// Opaque page record handed back to the dispatcher on a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMetadata {
    pub page_id: String,
    pub layout_id: String,
    /// Content format, e.g. "heex" or "markdown".
    pub format: String,
    /// Reference to the page handler.
    pub page_module: String,
    /// Reference to the component registry.
    pub component_module: String,
}

/// Store key: site first, then canonical pattern.
pub type RouteKey = (Site, String);

/// A single (site, pattern) → metadata association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteEntry {
    pub site: Site,
    /// Canonical pattern, without leading `/`.
    pub pattern: String,
    pub metadata: Arc<PageMetadata>,
}

impl RouteEntry {
    fn from_pair((site, pattern): &RouteKey, metadata: &Arc<PageMetadata>) -> Self {
        Self {
            site: site.clone(),
            pattern: pattern.clone(),
            metadata: Arc::clone(metadata),
        }
    }

    /// Pattern rendered as an absolute path, e.g. `/posts/:id`.
    pub fn path(&self) -> String {
        format!("/{}", self.pattern)
    }
}

/// Continuation token for [`RouteSource::scan`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanCursor {
    after: Option<String>,
}

impl ScanCursor {
    /// Cursor positioned before the first entry of a site.
    pub fn start() -> Self {
        Self::default()
    }
}

/// One bounded batch of a site's entries.
#[derive(Debug, Clone)]
pub struct ScanBatch {
    pub entries: Vec<RouteEntry>,
    /// `None` once the site has no entries past this batch.
    pub next: Option<ScanCursor>,
}

/// Read access the matcher needs from a store.
pub trait RouteSource: Send + Sync {
    /// Exact key lookup.
    fn get(&self, site: &Site, pattern: &str) -> Option<RouteEntry>;

    /// Next batch of at most `batch_size` entries for `site` after `cursor`.
    fn scan(&self, site: &Site, cursor: &ScanCursor, batch_size: usize) -> ScanBatch;
}

/// Counts of what one [`RouteStore::apply_batch`] changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub upserted: usize,
    /// Upserts whose metadata was already stored under the same key.
    pub unchanged: usize,
    pub removed: usize,
}

impl BatchOutcome {
    pub fn is_noop(&self) -> bool {
        self.upserted == 0 && self.removed == 0
    }
}

/// Process-lifetime store of registered routes.
#[derive(Debug, Default)]
pub struct RouteStore {
    routes: ArcSwap<BTreeMap<RouteKey, Arc<PageMetadata>>>,
    /// Bumped once per published snapshot.
    generation: AtomicU64,
}

impl RouteStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Upsert a route. A later insert with the same key replaces the earlier one.
    pub fn insert(&self, site: Site, pattern: RoutePattern, metadata: PageMetadata) {
        let key: RouteKey = (site, pattern.into_string());
        let metadata = Arc::new(metadata);

        self.routes.rcu(|current| {
            let mut next = BTreeMap::clone(current);
            next.insert(key.clone(), Arc::clone(&metadata));
            next
        });
        self.generation.fetch_add(1, Ordering::Relaxed);

        tracing::debug!(site = %key.0, pattern = %key.1, "Route inserted");
        metrics::record_route_count(self.len());
    }

    /// Remove a route. Returns whether an entry was present.
    pub fn delete(&self, site: &Site, pattern: &RoutePattern) -> bool {
        let key: RouteKey = (site.clone(), pattern.as_str().to_string());
        let mut removed = false;

        self.routes.rcu(|current| {
            if !current.contains_key(&key) {
                removed = false;
                return Arc::clone(current);
            }
            let mut next = BTreeMap::clone(current);
            removed = next.remove(&key).is_some();
            Arc::new(next)
        });

        if removed {
            self.generation.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(site = %site, pattern = %pattern, "Route deleted");
            metrics::record_route_count(self.len());
        }
        removed
    }

    /// Upsert and delete many routes behind a single snapshot swap.
    ///
    /// Upserts whose metadata equals the stored value are left alone, and nothing
    /// is published when no entry changes. Deletes run after upserts.
    pub fn apply_batch(
        &self,
        upserts: Vec<(Site, RoutePattern, PageMetadata)>,
        deletes: &[(Site, RoutePattern)],
    ) -> BatchOutcome {
        let upserts: Vec<(RouteKey, Arc<PageMetadata>)> = upserts
            .into_iter()
            .map(|(site, pattern, metadata)| ((site, pattern.into_string()), Arc::new(metadata)))
            .collect();
        let deletes: Vec<RouteKey> = deletes
            .iter()
            .map(|(site, pattern)| (site.clone(), pattern.as_str().to_string()))
            .collect();
        let mut outcome = BatchOutcome::default();

        self.routes.rcu(|current| {
            outcome = BatchOutcome::default();
            let mut next: Option<BTreeMap<RouteKey, Arc<PageMetadata>>> = None;

            for (key, metadata) in &upserts {
                let stored = match &next {
                    Some(map) => map.get(key),
                    None => current.get(key),
                };
                if stored.is_some_and(|stored| **stored == **metadata) {
                    outcome.unchanged += 1;
                    continue;
                }
                next.get_or_insert_with(|| BTreeMap::clone(current))
                    .insert(key.clone(), Arc::clone(metadata));
                outcome.upserted += 1;
            }

            for key in &deletes {
                let present = match &next {
                    Some(map) => map.contains_key(key),
                    None => current.contains_key(key),
                };
                if present {
                    next.get_or_insert_with(|| BTreeMap::clone(current)).remove(key);
                    outcome.removed += 1;
                }
            }

            match next {
                Some(next) => Arc::new(next),
                None => Arc::clone(current),
            }
        });

        if !outcome.is_noop() {
            self.generation.fetch_add(1, Ordering::Relaxed);
            metrics::record_route_count(self.len());
        }
        tracing::debug!(
            upserted = outcome.upserted,
            unchanged = outcome.unchanged,
            removed = outcome.removed,
            "Route batch applied"
        );
        outcome
    }

    /// Number of snapshots published since the store was created.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Relaxed)
    }

    /// Every entry, in store order.
    pub fn dump_all(&self) -> Vec<RouteEntry> {
        self.routes
            .load()
            .iter()
            .map(|(key, metadata)| RouteEntry::from_pair(key, metadata))
            .collect()
    }

    /// Every entry registered for `site`, in store order.
    pub fn dump_for_site(&self, site: &Site) -> Vec<RouteEntry> {
        let routes = self.routes.load();
        site_range(&routes, site, Bound::Included((site.clone(), String::new())))
            .map(|(key, metadata)| RouteEntry::from_pair(key, metadata))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.routes.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.load().is_empty()
    }
}

impl RouteSource for RouteStore {
    fn get(&self, site: &Site, pattern: &str) -> Option<RouteEntry> {
        let key: RouteKey = (site.clone(), pattern.to_string());
        self.routes
            .load()
            .get_key_value(&key)
            .map(|(key, metadata)| RouteEntry::from_pair(key, metadata))
    }

    fn scan(&self, site: &Site, cursor: &ScanCursor, batch_size: usize) -> ScanBatch {
        let routes = self.routes.load();
        let start = match &cursor.after {
            Some(last) => Bound::Excluded((site.clone(), last.clone())),
            None => Bound::Included((site.clone(), String::new())),
        };

        let mut iter = site_range(&routes, site, start);
        let entries: Vec<RouteEntry> = iter
            .by_ref()
            .take(batch_size.max(1))
            .map(|(key, metadata)| RouteEntry::from_pair(key, metadata))
            .collect();

        let next = match (iter.next(), entries.last()) {
            (Some(_), Some(last)) => Some(ScanCursor {
                after: Some(last.pattern.clone()),
            }),
            _ => None,
        };

        ScanBatch { entries, next }
    }
}

fn site_range<'a>(
    routes: &'a BTreeMap<RouteKey, Arc<PageMetadata>>,
    site: &'a Site,
    start: Bound<RouteKey>,
) -> impl Iterator<Item = (&'a RouteKey, &'a Arc<PageMetadata>)> + 'a {
    routes
        .range((start, Bound::Unbounded))
        .take_while(move |((entry_site, _), _)| entry_site == site)
}
