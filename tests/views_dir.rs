use std::fs;
use std::path::Path;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use available_views::{
    ClientRouteRegistry, IndexHtmlResponse, RequestContext, RouteParamType, Router, ServerRoutes,
    ViewAggregator,
};

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

#[test]
fn scanned_views_merge_with_server_snapshot_from_files() {
    let tmp = TempDir::new().unwrap();
    let views = tmp.path().join("views");
    write(
        &views,
        "@index.tsx",
        "export const config = { title: 'Welcome' };\nexport default function MainView() { return <div/>; }",
    );
    write(
        &views,
        "orders/{{orderId}}.tsx",
        "export default function OrderDetailsView() { return <div/>; }",
    );
    write(
        &views,
        "docs/{...path}.tsx",
        "export const config = { lazy: true };\nexport default function DocsView() { return null; }",
    );

    let snapshot = tmp.path().join("server-routes.json");
    fs::write(
        &snapshot,
        r#"{
            "routes": [
                {"path": "", "target": "com.example.flow.LegacyMain"},
                {"path": "reports", "target": "com.example.flow.ReportsView"}
            ],
            "pageTitles": {"com.example.flow.ReportsView": "Reports"}
        }"#,
    )
    .unwrap();

    let server = ServerRoutes::from_file(&snapshot).unwrap();
    let ctx = RequestContext::new(Router::from(Arc::new(server)));
    let aggregator = ViewAggregator::new(ClientRouteRegistry::from_views_dir(&views).unwrap());

    let merged = aggregator.available_views(&ctx).unwrap();

    let keys: Vec<_> = merged.keys().cloned().collect();
    assert_eq!(keys, vec!["/", "/reports", "/docs/:path*", "/orders/:orderId?"]);
    assert_eq!(merged["/"].title, "Welcome");
    assert_eq!(merged["/reports"].title, "Reports");
    assert!(merged["/docs/:path*"].lazy);
    assert_eq!(
        merged["/docs/:path*"].route_parameters.get(":path*"),
        Some(&RouteParamType::Wildcard)
    );
    assert_eq!(merged["/orders/:orderId?"].title, "Order Details");
    assert_eq!(
        merged["/orders/:orderId?"].route_parameters.get(":orderId?"),
        Some(&RouteParamType::Optional)
    );

    let mut response = IndexHtmlResponse::parse("<html><head></head><body></body></html>");
    aggregator.modify_index_html_response(&ctx, &mut response).unwrap();
    let html = response.to_html();
    assert!(html.contains("\"/orders/:orderId?\""), "{html}");
}

#[test]
fn views_json_file_feeds_the_registry() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("views.json");
    fs::write(
        &path,
        r#"{"/about": {"title": "About", "loginRequired": true}}"#,
    )
    .unwrap();

    let registry = ClientRouteRegistry::from_file(&path).unwrap();
    let ctx = RequestContext::new(Router::from(Arc::new(ServerRoutes::default())));
    let json = ViewAggregator::new(registry).available_views_json(&ctx).unwrap();

    assert_eq!(
        json,
        r#"{"/about":{"route":"/about","title":"About","lazy":false,"loginRequired":true,"routeParameters":{}}}"#
    );
}
