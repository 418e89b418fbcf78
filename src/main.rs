// src/main.rs

use anyhow::Context;
use clap::Parser;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use available_views::{
    ClientRouteRegistry, IndexHtmlResponse, RequestContext, Router, ServerRoutes, ViewAggregator,
};

/// CLI arguments
#[derive(Parser, Debug)]
#[command(
    name = "available-views",
    version,
    about = "Merges server routes and client views into index.html as an embedded JSON script"
)]
struct Cli {
    /// Source index.html
    #[arg(
        short = 'i',
        long = "index",
        value_name = "FILE",
        required_unless_present = "print_json"
    )]
    index: Option<PathBuf>,

    /// Server route snapshot (JSON with `routes` and `pageTitles`)
    #[arg(short = 's', long = "server-routes", value_name = "FILE")]
    server_routes: Option<PathBuf>,

    /// Client views as a JSON object of route → view config
    #[arg(short = 'c', long = "client-views", value_name = "FILE", conflicts_with = "views_dir")]
    client_views: Option<PathBuf>,

    /// Frontend views directory scanned with file-based routing
    #[arg(short = 'd', long = "views-dir", value_name = "DIR")]
    views_dir: Option<PathBuf>,

    /// Where to write the modified document; stdout when omitted
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print only the available-views JSON instead of the document
    #[arg(long = "print-json")]
    print_json: bool,

    /// Debug logging
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // stdout carries the generated document, so logs go to stderr
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // 1) Request context: the server router comes from the route snapshot
    let ctx = match &cli.server_routes {
        Some(path) => {
            let routes = ServerRoutes::from_file(path)
                .with_context(|| format!("loading server routes from {}", path.display()))?;
            RequestContext::new(Router::from(Arc::new(routes)))
        }
        None => RequestContext::without_router(),
    };

    // 2) Client views, either declared in JSON or discovered from the views directory
    let client_routes = match (&cli.client_views, &cli.views_dir) {
        (Some(path), _) => ClientRouteRegistry::from_file(path)
            .with_context(|| format!("loading client views from {}", path.display()))?,
        (None, Some(dir)) => ClientRouteRegistry::from_views_dir(dir)
            .with_context(|| format!("scanning views directory {}", dir.display()))?,
        (None, None) => ClientRouteRegistry::new(),
    };

    let aggregator = ViewAggregator::new(client_routes);

    // 3) Either the bare JSON or the modified index document
    let output = if cli.print_json {
        let views = aggregator.available_views(&ctx)?;
        serde_json::to_string_pretty(&views)? + "\n"
    } else {
        let index = cli.index.as_ref().context("--index is required")?;
        let src = fs::read_to_string(index)
            .with_context(|| format!("reading {}", index.display()))?;
        let mut response = IndexHtmlResponse::parse(&src);
        aggregator
            .modify_index_html_response(&ctx, &mut response)
            .context("generating index document")?;
        response.to_html()
    };

    match &cli.output {
        Some(path) => {
            fs::write(path, &output).with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(output = %path.display(), "index document written");
        }
        None => {
            std::io::stdout().write_all(output.as_bytes())?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_is_optional_when_printing_json() {
        let cli = Cli::try_parse_from(["available-views", "--print-json", "-s", "routes.json"]).unwrap();
        assert!(cli.print_json);
        assert_eq!(cli.index, None);
    }

    #[test]
    fn index_is_required_for_document_output() {
        assert!(Cli::try_parse_from(["available-views", "-s", "routes.json"]).is_err());
    }

    #[test]
    fn client_sources_are_exclusive() {
        let result = Cli::try_parse_from([
            "available-views",
            "-i",
            "index.html",
            "-c",
            "views.json",
            "-d",
            "views",
        ]);
        assert!(result.is_err());
    }
}
