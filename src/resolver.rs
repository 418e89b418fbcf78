// src/resolver.rs
//! File-based routing: maps files under a `views/` directory to client routes.
//!
//! | file                         | route             |
//! |------------------------------|-------------------|
//! | `@index.tsx`                 | `/`               |
//! | `about.tsx`                  | `/about`          |
//! | `user/{userId}.tsx`          | `/user/:userId`   |
//! | `comments/{{id}}.tsx`        | `/comments/:id?`  |
//! | `files/{...path}.tsx`        | `/files/:path*`   |
//! | `admin/@layout.tsx`          | `/admin` (with the directory's views as children) |

use indexmap::IndexMap;
use path_absolutize::Absolutize;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::error::{Result, ViewsError};
use crate::model::ClientViewConfig;
use crate::parser::parse_view_file;
use crate::route::{normalize_route, route_parameters, title_from_component_name};

const VIEW_EXTENSIONS: [&str; 4] = ["tsx", "ts", "jsx", "js"];
const INDEX_STEM: &str = "@index";
const LAYOUT_STEM: &str = "@layout";

/// Converts one file or directory name to a route segment.
/// Returns `None` for names that do not add a segment (`@index`, `@layout`).
pub fn route_segment(name: &str) -> Option<String> {
    if name == INDEX_STEM || name == LAYOUT_STEM {
        return None;
    }
    if let Some(inner) = name.strip_prefix("{{").and_then(|s| s.strip_suffix("}}")) {
        return Some(format!(":{}?", inner));
    }
    if let Some(inner) = name.strip_prefix("{...").and_then(|s| s.strip_suffix('}')) {
        return Some(format!(":{}*", inner));
    }
    if let Some(inner) = name.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
        return Some(format!(":{}", inner));
    }
    Some(name.to_string())
}

/// Route for a view file given its path relative to the views directory.
pub fn route_for_file(relative: &Path) -> String {
    let mut segments: Vec<String> = Vec::new();
    if let Some(parent) = relative.parent() {
        for component in parent.components() {
            segments.extend(route_segment(&component.as_os_str().to_string_lossy()));
        }
    }
    if let Some(stem) = relative.file_stem() {
        segments.extend(route_segment(&stem.to_string_lossy()));
    }
    normalize_route(&segments.join("/"))
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('_') || name.starts_with('.'))
}

fn is_view_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    if name.contains(".test.") || name.contains(".spec.") || name.ends_with(".d.ts") {
        return false;
    }
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| VIEW_EXTENSIONS.contains(&ext))
}

/// Reads one view file into its client config, filling in the route, the
/// route parameters and a title derived from the component name.
fn load_view(path: &Path, relative: &Path) -> Result<(String, ClientViewConfig)> {
    let module = parse_view_file(path)?;
    let mut config = module.config;

    let route = match config.route.as_deref() {
        Some(explicit) => normalize_route(explicit),
        None => route_for_file(relative),
    };
    if config.title.is_none() {
        config.title = module
            .component_name
            .as_deref()
            .map(title_from_component_name);
    }
    if config.route_parameters.is_empty() {
        config.route_parameters = route_parameters(&route);
    }
    config.route = Some(route.clone());
    Ok((route, config))
}

/// Scans `views_dir` and returns the client routes it declares, in sorted
/// file order. Layout routes carry the views of their own directory as
/// children.
pub fn scan_views_dir(views_dir: &Path) -> Result<IndexMap<String, ClientViewConfig>> {
    if !views_dir.is_dir() {
        return Err(ViewsError::InvalidViewsDir(views_dir.to_path_buf()));
    }
    let absolute = views_dir
        .absolutize()
        .map_err(|e| ViewsError::io(views_dir, e))?
        .to_path_buf();
    tracing::info!(dir = %absolute.display(), "scanning views directory");

    let mut routes: IndexMap<String, ClientViewConfig> = IndexMap::new();
    let mut layouts: IndexMap<PathBuf, (String, ClientViewConfig)> = IndexMap::new();
    let mut direct_views: IndexMap<PathBuf, Vec<ClientViewConfig>> = IndexMap::new();

    let walker = WalkDir::new(&absolute)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e));

    for entry in walker {
        let entry = entry.map_err(|e| {
            let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| absolute.clone());
            ViewsError::io(path, e.into())
        })?;
        if !entry.file_type().is_file() || !is_view_file(entry.path()) {
            continue;
        }
        let relative = entry
            .path()
            .strip_prefix(&absolute)
            .unwrap_or(entry.path())
            .to_path_buf();
        let dir = relative.parent().map(Path::to_path_buf).unwrap_or_default();
        let (route, config) = load_view(entry.path(), &relative)?;

        if relative.file_stem().is_some_and(|s| s == LAYOUT_STEM) {
            tracing::debug!(route = %route, "found layout");
            layouts.insert(dir, (route, config));
            continue;
        }

        tracing::debug!(route = %route, file = %relative.display(), "found view");
        direct_views.entry(dir).or_default().push(config.clone());
        if routes.insert(route.clone(), config).is_some() {
            tracing::warn!(route = %route, "two view files map to the same route; the later one wins");
        }
    }

    for (dir, (route, mut layout)) in layouts {
        layout.children = direct_views.shift_remove(&dir).unwrap_or_default();
        routes.insert(route, layout);
    }

    tracing::info!(views = routes.len(), "views directory scanned");
    Ok(routes)
}
