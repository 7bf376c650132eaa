//! Per-site mount configuration.

use dashmap::DashMap;
use thiserror::Error;
use url::Url;

use crate::config::SiteConfig;
use crate::registrar::paths::{asset_path, build_path_with_prefix, sanitize_path};
use crate::registrar::Site;

/// Errors raised by site registration and URL building.
#[derive(Debug, Error)]
pub enum RegistrarError {
    /// No configuration registered for the site.
    #[error("no configuration registered for site '{0}'")]
    UnknownSite(Site),

    #[error("invalid base URL '{url}' for site '{site}': {source}")]
    InvalidBaseUrl {
        site: Site,
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("base URL '{url}' for site '{site}' cannot carry a path")]
    CannotBeABase { site: Site, url: String },
}

/// Where a site's pages and assets are exposed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountPoint {
    pub site: Site,
    /// Path prefix for the site's pages.
    pub prefix: String,
    pub base_url: Url,
}

impl MountPoint {
    /// Validate a site configuration into a mount point.
    pub fn from_config(config: &SiteConfig) -> Result<Self, RegistrarError> {
        let base_url = parse_base_url(&config.site, &config.base_url)?;
        Ok(Self {
            site: config.site.clone(),
            prefix: normalize_prefix(&config.prefix),
            base_url,
        })
    }

    /// Absolute page path under this site's prefix.
    pub fn page_path(&self, path: &str) -> String {
        build_path_with_prefix(&self.prefix, path)
    }

    /// Full URL of one of this site's assets.
    ///
    /// The asset path extends the base URL's path; its query is kept and its fragment dropped.
    pub fn asset_url(&self, file_name: &str) -> String {
        let mut url = self.base_url.clone();
        let path = format!(
            "{}{}",
            self.base_url.path().trim_end_matches('/'),
            asset_path(&self.site, file_name)
        );
        url.set_path(&path);
        url.set_fragment(None);
        url.into()
    }
}

/// Mount prefixes always start with `/` and never end with one, except the root.
fn normalize_prefix(prefix: &str) -> String {
    let prefix = sanitize_path(&format!("/{}", prefix)).into_owned();
    match prefix.trim_end_matches('/') {
        "" => "/".to_string(),
        trimmed => trimmed.to_string(),
    }
}

/// Parse a base URL, requiring one that paths can be appended to.
pub fn parse_base_url(site: &Site, raw: &str) -> Result<Url, RegistrarError> {
    let url = Url::parse(raw).map_err(|source| RegistrarError::InvalidBaseUrl {
        site: site.clone(),
        url: raw.to_string(),
        source,
    })?;
    if url.cannot_be_a_base() {
        return Err(RegistrarError::CannotBeABase {
            site: site.clone(),
            url: raw.to_string(),
        });
    }
    Ok(url)
}

/// Concurrent registry of site mount points, populated by the host at startup.
#[derive(Debug, Default)]
pub struct SiteRegistry {
    sites: DashMap<Site, MountPoint>,
}

impl SiteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and register or replace a site's mount point.
    pub fn register(&self, config: &SiteConfig) -> Result<(), RegistrarError> {
        self.insert(MountPoint::from_config(config)?);
        Ok(())
    }

    /// Register or replace an already validated mount point.
    pub fn insert(&self, mount: MountPoint) {
        let (site, prefix) = (mount.site.clone(), mount.prefix.clone());
        if self.sites.insert(site.clone(), mount).is_some() {
            tracing::warn!(site = %site, "Site configuration replaced");
        } else {
            tracing::info!(site = %site, prefix = %prefix, "Site registered");
        }
    }

    pub fn remove(&self, site: &Site) -> Option<MountPoint> {
        self.sites.remove(site).map(|(_, mount)| mount)
    }

    pub fn get(&self, site: &Site) -> Option<MountPoint> {
        self.sites.get(site).map(|r| r.value().clone())
    }

    /// Registered sites, sorted.
    pub fn sites(&self) -> Vec<Site> {
        let mut sites: Vec<Site> = self.sites.iter().map(|r| r.key().clone()).collect();
        sites.sort();
        sites
    }

    pub fn len(&self) -> usize {
        self.sites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sites.is_empty()
    }

    /// Page path for `site` under its mount prefix.
    pub fn mount_path(&self, site: &Site, path: &str) -> Result<String, RegistrarError> {
        self.sites
            .get(site)
            .map(|r| r.value().page_path(path))
            .ok_or_else(|| RegistrarError::UnknownSite(site.clone()))
    }

    /// Full URL of a site asset.
    pub fn asset_url(&self, site: &Site, file_name: &str) -> Result<String, RegistrarError> {
        self.sites
            .get(site)
            .map(|r| r.value().asset_url(file_name))
            .ok_or_else(|| RegistrarError::UnknownSite(site.clone()))
    }
}
