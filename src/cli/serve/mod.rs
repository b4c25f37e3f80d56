//! Feed endpoint.
//!
//! Serves `GET /<feed.path>` (default `/rss.xml`), rebuilding the feed from
//! the content directory on every request so edits show up on reload.
//!
//! | Request                  | Response                         |
//! |--------------------------|----------------------------------|
//! | `GET`/`HEAD` feed route  | 200 `application/rss+xml`        |
//! | other method, feed route | 405 with `Allow: GET, HEAD`      |
//! | any other path           | 404                              |
//! | feed build fails         | 500, error logged                |

mod lifecycle;
mod response;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tiny_http::{Method, Request, Server};
use tokio::runtime::Runtime;

use crate::cli::build::{new_runtime, render_feed};
use crate::config::{SiteConfig, local_url_for};
use crate::core::{is_shutdown, register_server};
use crate::{debug, log};

/// Number of request worker threads.
const REQUEST_WORKERS: usize = 4;

/// What a request is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Route {
    Feed,
    MethodNotAllowed,
    NotFound,
}

/// Match a request against the feed route. Query strings are ignored.
fn classify(method: &Method, url: &str, feed_route: &str) -> Route {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    if path != feed_route {
        return Route::NotFound;
    }
    match method {
        Method::Get | Method::Head => Route::Feed,
        _ => Route::MethodNotAllowed,
    }
}

/// Bind the endpoint and serve until Ctrl+C.
pub fn serve_feed(config: &SiteConfig) -> Result<()> {
    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);
    register_server(Arc::clone(&server));

    let config = Arc::new(with_bound_url(config, addr));
    let runtime = Arc::new(new_runtime()?);

    log!("serve"; "http://{}{}", addr, config.feed.route());
    run_request_loop(&server, &config, &runtime)
}

/// Follow the bound port when `site.url` is the default local URL.
fn with_bound_url(config: &SiteConfig, addr: SocketAddr) -> SiteConfig {
    let mut config = config.clone();
    if config.site.url.as_deref() == Some(config.serve.local_url().as_str()) {
        config.site.url = Some(local_url_for(addr));
    }
    config
}

fn run_request_loop(
    server: &Server,
    config: &Arc<SiteConfig>,
    runtime: &Arc<Runtime>,
) -> Result<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(REQUEST_WORKERS)
        .thread_name(|i| format!("serve-{i}"))
        .build()
        .context("failed to create request thread pool")?;

    for request in server.incoming_requests() {
        let config = Arc::clone(config);
        let runtime = Arc::clone(runtime);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &config, &runtime) {
                log!("serve"; "request error: {e}");
            }
        });
    }

    Ok(())
}

/// Handle a single HTTP request
fn handle_request(request: Request, config: &SiteConfig, runtime: &Runtime) -> Result<()> {
    if is_shutdown() {
        return response::respond_unavailable(request);
    }

    debug!("serve"; "{} {}", request.method(), request.url());

    match classify(request.method(), request.url(), &config.feed.route()) {
        Route::Feed => match render_feed(config, runtime) {
            Ok((xml, count)) => {
                debug!("rss"; "served {} items", count);
                response::respond_feed(request, xml)
            }
            Err(e) => {
                log!("error"; "feed build failed: {e:#}");
                response::respond_build_error(request)
            }
        },
        Route::MethodNotAllowed => response::respond_method_not_allowed(request),
        Route::NotFound => response::respond_not_found(request),
    }
}
