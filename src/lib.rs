//! Builds the "available views" map of a web application by merging the
//! routes registered with the server router and the views declared by the
//! client, and embeds it into the application's `index.html`.

pub mod aggregator;
pub mod client;
pub mod document;
pub mod error;
pub mod model;
pub mod parser;
pub mod resolver;
pub mod route;
pub mod server;

pub use aggregator::{AggregatorOptions, ViewAggregator, SCRIPT_PREFIX};
pub use client::ClientRouteRegistry;
pub use document::IndexHtmlResponse;
pub use error::{Result, ViewsError};
pub use model::{AvailableViews, ClientViewConfig, RouteData, RouteParamType, RouteParameterData, ViewInfo};
pub use server::{NoPageTitles, PageTitleProvider, RequestContext, RouteRegistry, Router, ServerRoutes};
