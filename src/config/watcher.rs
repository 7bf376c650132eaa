//! Configuration file watcher for hot reload.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use notify::{Watcher, RecursiveMode, Event, RecommendedWatcher, Config};
use crate::config::loader::load_config;
use crate::lifecycle::reload::RouteReloader;

/// A watcher that republishes routes whenever the configuration file changes.
pub struct ConfigWatcher {
    path: PathBuf,
    reloader: Arc<RouteReloader>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher feeding `reloader`.
    pub fn new(path: &Path, reloader: Arc<RouteReloader>) -> Self {
        Self {
            path: path.to_path_buf(),
            reloader,
        }
    }

    /// Reload the file once and apply it. Failures keep the current routes.
    pub fn reload(&self) {
        reload_into(&self.path, &self.reloader);
    }

    /// Start watching the file in a background thread.
    ///
    /// Watching stops when the returned watcher is dropped.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let reloader = self.reloader.clone();
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(move |res: notify::Result<Event>| {
            match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        tracing::info!("Config file change detected, reloading...");
                        reload_into(&path, &reloader);
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            }
        }, Config::default().with_poll_interval(Duration::from_secs(2)))?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Config watcher started");
        Ok(watcher)
    }
}

fn reload_into(path: &Path, reloader: &RouteReloader) {
    match load_config(path) {
        Ok(config) => {
            if let Err(e) = reloader.apply(&config) {
                tracing::error!("Failed to apply config: {}. Keeping current routes.", e);
            }
        }
        Err(e) => {
            tracing::error!("Failed to reload config: {}. Keeping current routes.", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registrar::{Site, SiteRegistry};
    use crate::routing::{RouteSource, RouteStore};

    #[test]
    fn test_reload_applies_and_survives_bad_file() {
        let path = std::env::temp_dir().join("site_router_watcher_test.toml");
        std::fs::write(
            &path,
            r#"
            [[sites]]
            site = "blog"
            base_url = "https://example.com"

            [[routes]]
            site = "blog"
            path = "/about"
            page_id = "about"
            layout_id = "main"
            format = "heex"
            page_module = "About"
            component_module = "Components"
            "#,
        )
        .unwrap();

        let store = Arc::new(RouteStore::new());
        let reloader = Arc::new(RouteReloader::new(store.clone(), Arc::new(SiteRegistry::new())));
        let watcher = ConfigWatcher::new(&path, reloader);

        watcher.reload();
        let blog = Site::new("blog").unwrap();
        assert!(store.get(&blog, "about").is_some());

        // Broken config leaves the published routes alone
        std::fs::write(&path, "[lookup]\nbatch_size = 0").unwrap();
        watcher.reload();
        assert!(store.get(&blog, "about").is_some());

        std::fs::remove_file(&path).unwrap_or_default();
    }
}
