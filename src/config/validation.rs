//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic, including site identifiers)
//! - Check referential integrity (routes reference configured sites)
//! - Validate route patterns and value ranges
//! - Detect conflicting routes and duplicate sites
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use thiserror::Error;

use crate::config::schema::RouterConfig;
use crate::registrar::sites::parse_base_url;
use crate::registrar::Site;
use crate::routing::segment::PatternError;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("lookup.batch_size must be greater than zero")]
    ZeroBatchSize,

    #[error("site '{0}' is configured more than once")]
    DuplicateSite(Site),

    #[error("site '{site}': {reason}")]
    InvalidBaseUrl { site: Site, reason: String },

    #[error("route '{path}' references unconfigured site '{site}'")]
    UnknownSite { site: Site, path: String },

    #[error("site '{site}': {source}")]
    InvalidPattern {
        site: Site,
        #[source]
        source: PatternError,
    },

    #[error("route '/{pattern}' is defined more than once for site '{site}'")]
    DuplicateRoute { site: Site, pattern: String },
}

/// Validate a parsed configuration.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.lookup.batch_size == 0 {
        errors.push(ValidationError::ZeroBatchSize);
    }

    let mut sites = HashSet::new();
    for site in &config.sites {
        if !sites.insert(&site.site) {
            errors.push(ValidationError::DuplicateSite(site.site.clone()));
        }
        if let Err(e) = parse_base_url(&site.site, &site.base_url) {
            errors.push(ValidationError::InvalidBaseUrl {
                site: site.site.clone(),
                reason: e.to_string(),
            });
        }
    }

    let mut routes = HashSet::new();
    for route in &config.routes {
        if !sites.contains(&route.site) {
            errors.push(ValidationError::UnknownSite {
                site: route.site.clone(),
                path: route.path.clone(),
            });
        }
        match route.pattern() {
            Ok(pattern) => {
                if !routes.insert((route.site.clone(), pattern.as_str().to_string())) {
                    errors.push(ValidationError::DuplicateRoute {
                        site: route.site.clone(),
                        pattern: pattern.into_string(),
                    });
                }
            }
            Err(source) => errors.push(ValidationError::InvalidPattern {
                site: route.site.clone(),
                source,
            }),
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{RouteConfig, SiteConfig};
    use crate::routing::store::PageMetadata;

    fn site_config(site: &str) -> SiteConfig {
        SiteConfig {
            site: Site::new(site).unwrap(),
            prefix: "/".to_string(),
            base_url: "https://example.com".to_string(),
        }
    }

    fn route(site: &str, path: &str) -> RouteConfig {
        RouteConfig {
            site: Site::new(site).unwrap(),
            path: path.to_string(),
            page: PageMetadata {
                page_id: path.to_string(),
                layout_id: "main".to_string(),
                format: "heex".to_string(),
                page_module: "Page".to_string(),
                component_module: "Components".to_string(),
            },
        }
    }

    #[test]
    fn test_valid_config() {
        let mut config = RouterConfig::default();
        config.sites.push(site_config("blog"));
        config.routes.push(route("blog", "/"));
        config.routes.push(route("blog", "/posts/:id"));
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = RouterConfig::default();
        config.lookup.batch_size = 0;
        config.sites.push(site_config("blog"));
        config.sites.push(site_config("blog"));
        config.routes.push(route("shop", "/cart"));
        config.routes.push(route("blog", "/a/*rest/b"));
        config.routes.push(route("blog", "/posts/:id"));
        config.routes.push(route("blog", "posts/:id/"));

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert_eq!(errors[0], ValidationError::ZeroBatchSize);
        assert!(matches!(errors[1], ValidationError::DuplicateSite(_)));
        assert!(matches!(errors[2], ValidationError::UnknownSite { .. }));
        assert!(matches!(errors[3], ValidationError::InvalidPattern { .. }));
        assert_eq!(
            errors[4].to_string(),
            "route '/posts/:id' is defined more than once for site 'blog'"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let mut config = RouterConfig::default();
        let mut site = site_config("blog");
        site.base_url = "example.com".to_string();
        config.sites.push(site);

        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors[0], ValidationError::InvalidBaseUrl { .. }));
    }
}
