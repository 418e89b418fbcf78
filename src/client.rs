// src/client.rs
use std::fs;
use std::path::Path;

use indexmap::IndexMap;

use crate::error::{Result, ViewsError};
use crate::model::ClientViewConfig;
use crate::resolver::scan_views_dir;

/// Views declared by the client application, keyed by route path in
/// declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientRouteRegistry {
    routes: IndexMap<String, ClientViewConfig>,
}

impl ClientRouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a `views.json` document: an object mapping route → view config.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let routes: IndexMap<String, ClientViewConfig> = serde_json::from_str(json)?;
        Ok(ClientRouteRegistry { routes })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let src = fs::read_to_string(path).map_err(|e| ViewsError::io(path, e))?;
        let registry = Self::from_json_str(&src)?;
        tracing::debug!(path = %path.display(), routes = registry.len(), "loaded client views");
        Ok(registry)
    }

    /// Builds the registry from a frontend `views/` directory using
    /// file-based routing.
    pub fn from_views_dir(dir: &Path) -> Result<Self> {
        let routes = scan_views_dir(dir)?;
        Ok(ClientRouteRegistry { routes })
    }

    /// Registers a view, replacing any earlier one on the same route.
    pub fn register(&mut self, route: impl Into<String>, config: ClientViewConfig) {
        self.routes.insert(route.into(), config);
    }

    pub fn all_routes(&self) -> &IndexMap<String, ClientViewConfig> {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}
