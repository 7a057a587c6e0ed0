//! Helpers for the opaque, URL-shaped locators the protocol passes around.
//!
//! Internal locators tag themselves with a custom scheme (`tab://`,
//! `search://`) so a service can route them without colliding with the real
//! site URLs; pagination embeds its addressing in query parameters. Only the
//! owning extractor decodes a locator — these helpers are the vocabulary it
//! does that with.

use url::Url;

use crate::error::Result;

/// The scheme tag of a locator (`"tab"` for `tab://...`).
pub fn scheme_of(locator: &str) -> Option<&str> {
    locator.split_once("://").map(|(scheme, _)| scheme)
}

/// Replace the scheme tag, keeping the rest of the locator.
///
/// Empty input passes through unchanged.
pub fn set_scheme(locator: &str, scheme: &str) -> String {
    if locator.is_empty() {
        return String::new();
    }
    let rest = locator.split_once("://").map_or(locator, |(_, rest)| rest);
    format!("{scheme}://{rest}")
}

/// Reset a tagged locator back to a fetchable https URL.
pub fn reset_scheme(locator: &str) -> String {
    set_scheme(locator, "https")
}

/// Value of a query parameter, if present.
pub fn query_value(locator: &str, key: &str) -> Option<String> {
    let url = Url::parse(locator).ok()?;
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

/// Replace (or append) a query parameter, preserving the others in order.
pub fn replace_query_value(locator: &str, key: &str, value: &str) -> Result<String> {
    let url = Url::parse(locator)?;
    let mut replaced = url.clone();
    let mut found = false;
    {
        let mut pairs = replaced.query_pairs_mut();
        pairs.clear();
        for (k, v) in url.query_pairs() {
            if k == key {
                pairs.append_pair(&k, value);
                found = true;
            } else {
                pairs.append_pair(&k, &v);
            }
        }
        if !found {
            pairs.append_pair(key, value);
        }
    }
    Ok(replaced.into())
}

/// Increment a numeric query parameter (page-number pagination).
///
/// A missing or non-numeric parameter counts as page 1, so the result
/// addresses page 2.
pub fn increment_query_param(locator: &str, key: &str) -> Result<String> {
    let current = query_value(locator, key)
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(1);
    replace_query_value(locator, key, &(current + 1).to_string())
}
