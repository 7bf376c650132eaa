//! Path composition helpers.
//!
//! All functions are pure string composition.

use std::borrow::Cow;

use crate::registrar::Site;

/// Root segment under which per-site assets are served.
pub const ASSET_ROOT: &str = "/beacon_assets";

/// Collapse every run of `/` into a single `/`.
///
/// Borrows the input when it has no doubled separators.
pub fn sanitize_path(path: &str) -> Cow<'_, str> {
    if !path.contains("//") {
        return Cow::Borrowed(path);
    }

    let mut sanitized = String::with_capacity(path.len());
    let mut previous_slash = false;
    for ch in path.chars() {
        let is_slash = ch == '/';
        if !(is_slash && previous_slash) {
            sanitized.push(ch);
        }
        previous_slash = is_slash;
    }
    Cow::Owned(sanitized)
}

/// Join a mount prefix and a page path.
///
/// The root path `/` maps to the prefix itself.
pub fn build_path_with_prefix(prefix: &str, path: &str) -> String {
    if path == "/" {
        return prefix.to_string();
    }
    sanitize_path(&format!("{}/{}", prefix, path)).into_owned()
}

/// Absolute path of a site asset, e.g. `/beacon_assets/blog/logo.png`.
pub fn asset_path(site: &Site, file_name: &str) -> String {
    sanitize_path(&format!("{}/{}/{}", ASSET_ROOT, site, file_name)).into_owned()
}
