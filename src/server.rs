// src/server.rs
//! Read-only view of the server-side router.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{Result, ViewsError};
use crate::model::RouteData;

/// Snapshot of the routes registered with the server router.
pub trait RouteRegistry: Send + Sync {
    fn registered_routes(&self) -> Vec<RouteData>;
}

/// Supplies explicit page titles for route handlers.
pub trait PageTitleProvider: Send + Sync {
    fn page_title(&self, target: &str) -> Option<String>;
}

/// Titles are never explicit; every view falls back to its handler name.
pub struct NoPageTitles;

impl PageTitleProvider for NoPageTitles {
    fn page_title(&self, _target: &str) -> Option<String> {
        None
    }
}

/// Router handed to the aggregator for a single document-generation call.
#[derive(Clone)]
pub struct Router {
    registry: Arc<dyn RouteRegistry>,
    titles: Arc<dyn PageTitleProvider>,
}

impl Router {
    pub fn new(registry: Arc<dyn RouteRegistry>, titles: Arc<dyn PageTitleProvider>) -> Self {
        Router { registry, titles }
    }

    pub fn registry(&self) -> &dyn RouteRegistry {
        self.registry.as_ref()
    }

    pub fn titles(&self) -> &dyn PageTitleProvider {
        self.titles.as_ref()
    }
}

impl From<Arc<ServerRoutes>> for Router {
    fn from(routes: Arc<ServerRoutes>) -> Self {
        Router::new(routes.clone(), routes)
    }
}

/// Per-request context. A request without a router cannot list server views.
#[derive(Clone, Default)]
pub struct RequestContext {
    router: Option<Router>,
}

impl RequestContext {
    pub fn new(router: Router) -> Self {
        RequestContext {
            router: Some(router),
        }
    }

    pub fn without_router() -> Self {
        RequestContext { router: None }
    }

    pub fn router(&self) -> Result<&Router> {
        self.router.as_ref().ok_or(ViewsError::MissingRouter)
    }
}

/// Route snapshot exported by the server, together with the page titles
/// declared on its handlers.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerRoutes {
    #[serde(default)]
    pub routes: Vec<RouteData>,
    #[serde(default)]
    pub page_titles: IndexMap<String, String>,
}

impl ServerRoutes {
    pub fn new(routes: Vec<RouteData>) -> Self {
        ServerRoutes {
            routes,
            page_titles: IndexMap::new(),
        }
    }

    pub fn with_page_title(mut self, target: impl Into<String>, title: impl Into<String>) -> Self {
        self.page_titles.insert(target.into(), title.into());
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let src = fs::read_to_string(path).map_err(|e| ViewsError::io(path, e))?;
        let routes = Self::from_json_str(&src)?;
        tracing::debug!(path = %path.display(), routes = routes.routes.len(), "loaded server routes");
        Ok(routes)
    }
}

impl RouteRegistry for ServerRoutes {
    fn registered_routes(&self) -> Vec<RouteData> {
        self.routes.clone()
    }
}

impl PageTitleProvider for ServerRoutes {
    fn page_title(&self, target: &str) -> Option<String> {
        self.page_titles.get(target).cloned()
    }
}
