//! Router - Flat, exact-match route table
//!
//! Route keys are single hash segments. A path is normalized by dropping one
//! leading `#` and mapping the empty string to the root key. Lookup is exact;
//! a miss substitutes the fallback key's page.
//!
//! The fallback route is a precondition, not a checked invariant: a table
//! without one resolves misses to `None`.

use std::collections::HashMap;
use std::fmt;

use crate::page::{Page, PageFactory, PageProps, PageType};

/// Key of the page shown for an empty hash.
pub const ROOT_KEY: &str = "/";

/// Key of the page shown for unregistered routes.
pub const FALLBACK_KEY: &str = "404";

/// Normalize a raw hash fragment or bare path into a route key.
pub fn normalize_path(path: &str) -> &str {
    let path = path.strip_prefix('#').unwrap_or(path);
    if path.is_empty() { ROOT_KEY } else { path }
}

// =============================================================================
// RESOLVED ROUTE
// =============================================================================

/// Outcome of resolving a path.
#[derive(Clone, Debug)]
pub struct ResolvedRoute {
    /// Normalized key that was requested.
    pub key: String,
    /// Page implementation to mount.
    pub page: PageFactory,
    /// False when the fallback page was substituted.
    pub matched: bool,
}

// =============================================================================
// ROUTE TABLE
// =============================================================================

/// Mapping from route key to page implementation.
#[derive(Clone, Default)]
pub struct RouteTable {
    routes: HashMap<String, PageFactory>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a `PageType` under `key`.
    pub fn route<P: PageType>(self, key: impl Into<String>) -> Self {
        self.with(key, PageFactory::of::<P>())
    }

    /// Register a constructor closure under `key`.
    pub fn route_fn<F>(self, key: impl Into<String>, construct: F) -> Self
    where
        F: Fn(PageProps) -> Box<dyn Page> + 'static,
    {
        self.with(key, PageFactory::from_fn("closure", construct))
    }

    /// Builder-style insert of an existing factory.
    pub fn with(mut self, key: impl Into<String>, page: PageFactory) -> Self {
        self.insert(key, page);
        self
    }

    /// Insert a route. A later registration for the same key replaces the
    /// earlier one, so a key never maps ambiguously.
    pub fn insert(&mut self, key: impl Into<String>, page: PageFactory) -> Option<PageFactory> {
        self.routes.insert(key.into(), page)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.routes.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&PageFactory> {
        self.routes.get(key)
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.routes.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn has_fallback(&self) -> bool {
        self.contains(FALLBACK_KEY)
    }

    /// Resolve a path to the page to mount.
    pub fn resolve(&self, path: &str) -> Option<ResolvedRoute> {
        let key = normalize_path(path);
        if let Some(page) = self.routes.get(key) {
            return Some(ResolvedRoute {
                key: key.to_string(),
                page: page.clone(),
                matched: true,
            });
        }

        self.routes.get(FALLBACK_KEY).map(|page| ResolvedRoute {
            key: key.to_string(),
            page: page.clone(),
            matched: false,
        })
    }
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for key in self.keys() {
            map.entry(&key, &self.routes[key].name());
        }
        map.finish()
    }
}

// =============================================================================
// TESTS
// =============================================================================
