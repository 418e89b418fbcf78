// src/model.rs
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

/// Ordered route → view map. Iteration order is insertion order, which keeps
/// the serialized output stable between requests.
pub type AvailableViews = IndexMap<String, ViewInfo>;

/// Kind of a dynamic route segment, encoded the way the client router expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RouteParamType {
    #[serde(rename = "req", alias = "REQUIRED")]
    Required,
    #[serde(rename = "opt", alias = "OPTIONAL")]
    Optional,
    #[serde(rename = "*", alias = "WILDCARD")]
    Wildcard,
}

/// Metadata for one reachable view, as published to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewInfo {
    pub route: String,
    pub title: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    pub lazy: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub login_required: bool,
    pub route_parameters: IndexMap<String, RouteParamType>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ViewInfo>,
}

impl ViewInfo {
    pub fn new(route: impl Into<String>, title: impl Into<String>) -> Self {
        ViewInfo {
            route: route.into(),
            title: title.into(),
            roles: Vec::new(),
            lazy: false,
            login_required: false,
            route_parameters: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Sets the required roles, dropping duplicates but keeping first-seen order.
    pub fn with_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let unique: IndexSet<String> = roles.into_iter().map(Into::into).collect();
        self.roles = unique.into_iter().collect();
        self
    }
}

/// A view declared by the client application (`views.json` entry or a scanned
/// view file).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClientViewConfig {
    pub title: Option<String>,
    pub roles_allowed: Option<Vec<String>>,
    pub route: Option<String>,
    pub lazy: bool,
    pub login_required: bool,
    pub route_parameters: IndexMap<String, RouteParamType>,
    pub children: Vec<ClientViewConfig>,
}

/// One parameter of a server route template, e.g. `:___userId?`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RouteParameterData {
    pub template: String,
    #[serde(default)]
    pub regex: Option<String>,
}

/// A route registered with the server router.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RouteData {
    /// Route template without the leading slash, e.g. `comments/:___commentId?`.
    pub path: String,
    /// Fully qualified name of the handler type.
    pub target: String,
    #[serde(default)]
    pub parameters: IndexMap<String, RouteParameterData>,
}

impl RouteData {
    pub fn new(path: impl Into<String>, target: impl Into<String>) -> Self {
        RouteData {
            path: path.into(),
            target: target.into(),
            parameters: IndexMap::new(),
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
        self.parameters.insert(
            name.into(),
            RouteParameterData {
                template: template.into(),
                regex: None,
            },
        );
        self
    }
}
