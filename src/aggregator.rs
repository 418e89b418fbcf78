// src/aggregator.rs
use crate::client::ClientRouteRegistry;
use crate::document::IndexHtmlResponse;
use crate::error::Result;
use crate::model::{AvailableViews, ClientViewConfig, RouteParamType, ViewInfo};
use crate::route::{last_static_segment, normalize_route, simple_type_name};
use crate::server::RequestContext;

/// Statement the available-views JSON is assigned through in the index page.
pub const SCRIPT_PREFIX: &str = "window.Vaadin = window.Vaadin || {}; \
window.Vaadin.server = window.Vaadin.server || {}; \
window.Vaadin.server.views = ";

#[derive(Debug, Clone)]
pub struct AggregatorOptions {
    /// Text placed before the JSON in the injected script.
    pub script_prefix: String,
}

impl Default for AggregatorOptions {
    fn default() -> Self {
        AggregatorOptions {
            script_prefix: SCRIPT_PREFIX.to_string(),
        }
    }
}

/// Merges server routes and client views into the map the client router
/// reads on startup.
pub struct ViewAggregator {
    client_routes: ClientRouteRegistry,
    options: AggregatorOptions,
}

impl ViewAggregator {
    pub fn new(client_routes: ClientRouteRegistry) -> Self {
        Self::with_options(client_routes, AggregatorOptions::default())
    }

    pub fn with_options(client_routes: ClientRouteRegistry, options: AggregatorOptions) -> Self {
        ViewAggregator {
            client_routes,
            options,
        }
    }

    /// Adds one entry per route registered with the server router.
    ///
    /// Fails with [`ViewsError::MissingRouter`](crate::ViewsError::MissingRouter)
    /// before touching `target` if the context has no router.
    pub fn collect_server_views(&self, ctx: &RequestContext, target: &mut AvailableViews) -> Result<()> {
        let router = ctx.router()?;
        for route_data in router.registry().registered_routes() {
            let route = normalize_route(&route_data.path);
            let title = router
                .titles()
                .page_title(&route_data.target)
                .unwrap_or_else(|| simple_type_name(&route_data.target).to_string());

            let mut view = ViewInfo::new(route.clone(), title);
            view.route_parameters = route_data
                .parameters
                .values()
                .map(|param| {
                    (
                        param.template.clone(),
                        RouteParamType::from_template(&param.template),
                    )
                })
                .collect();

            tracing::debug!(route = %route, target = %route_data.target, "collected server view");
            target.insert(route, view);
        }
        Ok(())
    }

    /// Adds one entry per client view, replacing server entries on the same route.
    pub fn collect_client_views(&self, target: &mut AvailableViews) {
        for (key, config) in self.client_routes.all_routes() {
            let view = client_view_info(key, config);
            let route = view.route.clone();
            if target.contains_key(&route) {
                tracing::debug!(route = %route, "client view overrides server view");
            } else {
                tracing::debug!(route = %route, "collected client view");
            }
            target.insert(route, view);
        }
    }

    /// Builds the merged map: server views first, then client views on top.
    pub fn available_views(&self, ctx: &RequestContext) -> Result<AvailableViews> {
        let mut views = AvailableViews::new();
        self.collect_server_views(ctx, &mut views)?;
        self.collect_client_views(&mut views);
        tracing::info!(views = views.len(), "available views merged");
        Ok(views)
    }

    pub fn available_views_json(&self, ctx: &RequestContext) -> Result<String> {
        let views = self.available_views(ctx)?;
        Ok(serde_json::to_string(&views)?)
    }

    /// Script text injected into the index page. `<` is escaped so view
    /// metadata cannot terminate the surrounding script element.
    pub fn views_script(&self, ctx: &RequestContext) -> Result<String> {
        let json = self.available_views_json(ctx)?.replace('<', "\\u003c");
        Ok(format!("{}{};", self.options.script_prefix, json))
    }

    /// Appends the available-views script to the document head. On error the
    /// document is left as it was.
    pub fn modify_index_html_response(&self, ctx: &RequestContext, response: &mut IndexHtmlResponse) -> Result<()> {
        let script = self.views_script(ctx)?;
        response.append_script_to_head(&script)
    }
}

/// Copies a client config into a `ViewInfo`, converting children recursively.
fn client_view_info(key: &str, config: &ClientViewConfig) -> ViewInfo {
    let route = normalize_route(config.route.as_deref().unwrap_or(key));
    let title = config
        .title
        .clone()
        .unwrap_or_else(|| last_static_segment(&route).to_string());

    let mut view = ViewInfo::new(route.clone(), title)
        .with_roles(config.roles_allowed.iter().flatten().cloned());
    view.lazy = config.lazy;
    view.login_required = config.login_required;
    view.route_parameters = config.route_parameters.clone();
    view.children = config
        .children
        .iter()
        .filter_map(|child| match child.route.as_deref() {
            Some(child_route) => Some(client_view_info(child_route, child)),
            None => {
                tracing::warn!(parent = %route, title = ?child.title, "child view has no route; skipped");
                None
            }
        })
        .collect();
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    use crate::error::ViewsError;
    use crate::model::RouteData;
    use crate::server::{NoPageTitles, Router, ServerRoutes};

    fn context(routes: ServerRoutes) -> RequestContext {
        RequestContext::new(Router::from(Arc::new(routes)))
    }

    #[test]
    fn server_title_prefers_page_title_then_simple_name() {
        let ctx = context(
            ServerRoutes::new(vec![
                RouteData::new("bar", "com.example.Component"),
                RouteData::new("foo", "com.example.RouteTarget"),
            ])
            .with_page_title("com.example.RouteTarget", "Explicit"),
        );
        let aggregator = ViewAggregator::new(ClientRouteRegistry::new());
        let mut views = AvailableViews::new();
        aggregator.collect_server_views(&ctx, &mut views).unwrap();

        assert_eq!(views["/bar"].title, "Component");
        assert_eq!(views["/foo"].title, "Explicit");
        assert!(!views["/foo"].lazy);
    }

    #[test]
    fn router_without_title_metadata_uses_handler_names() {
        let routes = Arc::new(
            ServerRoutes::new(vec![RouteData::new("foo", "com.example.RouteTarget")])
                .with_page_title("com.example.RouteTarget", "Ignored"),
        );
        let ctx = RequestContext::new(Router::new(routes, Arc::new(NoPageTitles)));
        let views = ViewAggregator::new(ClientRouteRegistry::new())
            .available_views(&ctx)
            .unwrap();
        assert_eq!(views["/foo"].title, "RouteTarget");
    }

    #[test]
    fn missing_router_leaves_target_untouched() {
        let aggregator = ViewAggregator::new(ClientRouteRegistry::new());
        let mut views = AvailableViews::new();
        views.insert("/kept".into(), ViewInfo::new("/kept", "Kept"));

        let err = aggregator
            .collect_server_views(&RequestContext::without_router(), &mut views)
            .unwrap_err();
        assert!(matches!(err, ViewsError::MissingRouter));
        assert_eq!(views.len(), 1);
    }

    #[test]
    fn client_view_without_title_uses_route_segment() {
        let config = ClientViewConfig {
            roles_allowed: Some(vec!["A".into(), "A".into()]),
            lazy: true,
            ..Default::default()
        };
        let view = client_view_info("settings/:tab?/", &config);
        assert_eq!(view.route, "/settings/:tab?");
        assert_eq!(view.title, "settings");
        assert_eq!(view.roles, vec!["A".to_string()]);
        assert!(view.lazy);
    }

    #[test]
    fn children_without_route_are_skipped() {
        let config = ClientViewConfig {
            title: Some("Layout".into()),
            children: vec![
                ClientViewConfig {
                    route: Some("/admin/users".into()),
                    ..Default::default()
                },
                ClientViewConfig {
                    title: Some("Index".into()),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let view = client_view_info("/admin", &config);
        assert_eq!(view.children.len(), 1);
        assert_eq!(view.children[0].route, "/admin/users");
        assert_eq!(view.children[0].title, "users");
    }

    #[test]
    fn script_escapes_markup_and_uses_prefix() {
        let mut client = ClientRouteRegistry::new();
        client.register(
            "/x",
            ClientViewConfig {
                title: Some("</script><b>".into()),
                ..Default::default()
            },
        );
        let aggregator = ViewAggregator::with_options(
            client,
            AggregatorOptions {
                script_prefix: "views = ".into(),
            },
        );
        let script = aggregator.views_script(&context(ServerRoutes::default())).unwrap();
        assert_eq!(
            script,
            r#"views = {"/x":{"route":"/x","title":"\u003c/script>\u003cb>","lazy":false,"routeParameters":{}}};"#
        );
    }
}
