//! Publish/unpublish reconciliation.
//!
//! # Responsibilities
//! - Apply a configuration's sites and routes to the live registry and store
//! - Unpublish routes that disappeared since the previous apply
//!
//! # Design Decisions
//! - Only routes this reloader published are ever deleted
//! - Every mount point is validated before any is registered; a bad site aborts the
//!   apply with the registry and store untouched
//! - Route changes land in the store as one batch, so a reload publishes a single snapshot
//! - Applies are serialized; lookups keep running against the store throughout

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, PoisonError};

use crate::config::RouterConfig;
use crate::registrar::{MountPoint, RegistrarError, Site, SiteRegistry};
use crate::routing::{RoutePattern, RouteStore};

/// Counts of changes made by one apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReloadSummary {
    /// Routes written because they were new or their metadata changed.
    pub upserted: usize,
    /// Routes already published with identical metadata.
    pub unchanged: usize,
    pub removed: usize,
    /// Routes whose pattern failed to parse.
    pub skipped: usize,
}

#[derive(Debug, Default)]
struct Published {
    routes: BTreeSet<(Site, RoutePattern)>,
    sites: BTreeSet<Site>,
}

/// Keeps the store in line with successive configurations.
#[derive(Debug)]
pub struct RouteReloader {
    store: Arc<RouteStore>,
    sites: Arc<SiteRegistry>,
    published: Mutex<Published>,
}

impl RouteReloader {
    pub fn new(store: Arc<RouteStore>, sites: Arc<SiteRegistry>) -> Self {
        Self {
            store,
            sites,
            published: Mutex::new(Published::default()),
        }
    }

    /// Publish `config`, removing what the previous apply published and this one drops.
    pub fn apply(&self, config: &RouterConfig) -> Result<ReloadSummary, RegistrarError> {
        let mut published = self.published.lock().unwrap_or_else(PoisonError::into_inner);
        let mut summary = ReloadSummary::default();

        let mounts = config
            .sites
            .iter()
            .map(MountPoint::from_config)
            .collect::<Result<Vec<_>, _>>()?;
        for mount in mounts {
            self.sites.insert(mount);
        }

        let mut routes = BTreeSet::new();
        let mut upserts = Vec::with_capacity(config.routes.len());
        for route in &config.routes {
            let pattern = match route.pattern() {
                Ok(pattern) => pattern,
                Err(e) => {
                    tracing::warn!(site = %route.site, path = %route.path, error = %e, "Skipping invalid route");
                    summary.skipped += 1;
                    continue;
                }
            };
            routes.insert((route.site.clone(), pattern.clone()));
            upserts.push((route.site.clone(), pattern, route.page.clone()));
        }

        let deletes: Vec<(Site, RoutePattern)> =
            published.routes.difference(&routes).cloned().collect();
        let outcome = self.store.apply_batch(upserts, &deletes);
        summary.upserted = outcome.upserted;
        summary.unchanged = outcome.unchanged;
        summary.removed = outcome.removed;

        let sites: BTreeSet<Site> = config.sites.iter().map(|s| s.site.clone()).collect();
        for site in published.sites.difference(&sites) {
            self.sites.remove(site);
            tracing::info!(site = %site, "Site unregistered");
        }

        published.routes = routes;
        published.sites = sites;

        tracing::info!(
            upserted = summary.upserted,
            unchanged = summary.unchanged,
            removed = summary.removed,
            skipped = summary.skipped,
            total = self.store.len(),
            "Routes applied"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::parse_config;
    use crate::routing::RouteSource;

    const V1: &str = r#"
        [[sites]]
        site = "blog"
        base_url = "https://example.com"

        [[routes]]
        site = "blog"
        path = "/"
        page_id = "home"
        layout_id = "main"
        format = "heex"
        page_module = "Home"
        component_module = "Components"

        [[routes]]
        site = "blog"
        path = "/posts/:id"
        page_id = "post"
        layout_id = "main"
        format = "heex"
        page_module = "Post"
        component_module = "Components"
    "#;

    const V2: &str = r#"
        [[sites]]
        site = "blog"
        base_url = "https://example.com"

        [[routes]]
        site = "blog"
        path = "/"
        page_id = "home-v2"
        layout_id = "main"
        format = "heex"
        page_module = "Home"
        component_module = "Components"
    "#;

    fn reloader() -> (Arc<RouteStore>, Arc<SiteRegistry>, RouteReloader) {
        let store = Arc::new(RouteStore::new());
        let sites = Arc::new(SiteRegistry::new());
        let reloader = RouteReloader::new(store.clone(), sites.clone());
        (store, sites, reloader)
    }

    #[test]
    fn test_apply_publishes_routes() {
        let (store, sites, reloader) = reloader();
        let summary = reloader.apply(&parse_config(V1).unwrap()).unwrap();

        assert_eq!(summary, ReloadSummary { upserted: 2, unchanged: 0, removed: 0, skipped: 0 });
        assert_eq!(store.len(), 2);
        assert_eq!(sites.len(), 1);
    }

    #[test]
    fn test_apply_removes_dropped_routes() {
        let (store, _sites, reloader) = reloader();
        reloader.apply(&parse_config(V1).unwrap()).unwrap();
        let summary = reloader.apply(&parse_config(V2).unwrap()).unwrap();

        assert_eq!(summary.removed, 1);
        let blog = Site::new("blog").unwrap();
        assert!(store.get(&blog, "posts/:id").is_none());
        assert_eq!(store.get(&blog, "").unwrap().metadata.page_id, "home-v2");
    }

    #[test]
    fn test_apply_keeps_foreign_routes() {
        let (store, _sites, reloader) = reloader();
        let blog = Site::new("blog").unwrap();
        let manual = parse_config(V1).unwrap().routes[1].page.clone();
        store.insert(blog.clone(), RoutePattern::parse("/manual").unwrap(), manual);

        reloader.apply(&parse_config(V1).unwrap()).unwrap();
        reloader.apply(&RouterConfig::default()).unwrap();

        assert_eq!(store.len(), 1);
        assert!(store.get(&blog, "manual").is_some());
    }

    #[test]
    fn test_apply_unregisters_dropped_sites() {
        let (_store, sites, reloader) = reloader();
        reloader.apply(&parse_config(V1).unwrap()).unwrap();
        reloader.apply(&RouterConfig::default()).unwrap();
        assert!(sites.is_empty());
    }

    #[test]
    fn test_apply_large_config_swaps_once() {
        let (store, _sites, reloader) = reloader();
        let mut config = parse_config(V1).unwrap();
        let template = config.routes[1].clone();
        for i in 0..2000 {
            let mut route = template.clone();
            route.path = format!("/generated/{}", i);
            route.page.page_id = format!("generated-{}", i);
            config.routes.push(route);
        }

        let before = store.generation();
        let summary = reloader.apply(&config).unwrap();
        assert_eq!(summary.upserted, 2002);
        assert_eq!(store.generation(), before + 1);

        // Re-applying the same configuration publishes nothing
        let summary = reloader.apply(&config).unwrap();
        assert_eq!(summary, ReloadSummary { upserted: 0, unchanged: 2002, removed: 0, skipped: 0 });
        assert_eq!(store.generation(), before + 1);
    }

    #[test]
    fn test_apply_bad_site_leaves_state_untouched() {
        let (store, sites, reloader) = reloader();
        reloader.apply(&parse_config(V1).unwrap()).unwrap();
        let generation = store.generation();

        let mut config = parse_config(V2).unwrap();
        let mut shop = config.sites[0].clone();
        shop.site = Site::new("shop").unwrap();
        shop.base_url = "https://shop.example.com".to_string();
        let mut broken = config.sites[0].clone();
        broken.site = Site::new("docs").unwrap();
        broken.base_url = "not a url".to_string();
        config.sites.push(shop);
        config.sites.push(broken);

        let err = reloader.apply(&config).unwrap_err();
        assert!(matches!(err, RegistrarError::InvalidBaseUrl { .. }));
        assert_eq!(sites.sites(), vec![Site::new("blog").unwrap()]);
        assert_eq!(store.generation(), generation);

        // The failed apply did not forget what V1 published
        let summary = reloader.apply(&parse_config(V2).unwrap()).unwrap();
        assert_eq!(summary.removed, 1);
        let blog = Site::new("blog").unwrap();
        assert!(store.get(&blog, "posts/:id").is_none());
    }
}
