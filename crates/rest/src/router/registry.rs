//! A registry of named routers.
//!
//! Applications serving several route tables (for example a public API and an admin API)
//! register them here during bootstrap and hand the registry, or the `Arc<Router>` it returns,
//! to whatever needs them. There is no process-wide instance.

use crate::router::Router;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// The name under which [`RouterRegistry::default_router`] is stored.
pub const DEFAULT_ROUTER: &str = "default";

#[derive(Debug)]
pub struct RouterRegistry {
    default: Arc<Router>,
    named: HashMap<String, Arc<Router>>,
}

impl RouterRegistry {
    /// Creates a registry holding an empty default router.
    pub fn new() -> Self {
        Self { default: Arc::new(Router::default()), named: HashMap::new() }
    }

    /// Registers `router` under `name`, returning the router it replaces.
    pub fn insert(&mut self, name: impl Into<String>, router: impl Into<Arc<Router>>) -> Option<Arc<Router>> {
        let name = name.into();
        let router = router.into();
        debug!(name = name.as_str(), routes = router.len(), "router registered");

        if name == DEFAULT_ROUTER {
            Some(std::mem::replace(&mut self.default, router))
        } else {
            self.named.insert(name, router)
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<Router>> {
        if name == DEFAULT_ROUTER { Some(Arc::clone(&self.default)) } else { self.named.get(name).cloned() }
    }

    pub fn default_router(&self) -> Arc<Router> {
        Arc::clone(&self.default)
    }

    /// Names of all registered routers, the default one included
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(DEFAULT_ROUTER).chain(self.named.keys().map(String::as_str))
    }
}

impl Default for RouterRegistry {
    fn default() -> Self {
        Self::new()
    }
}
