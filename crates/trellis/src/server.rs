//! HTTP server adapter
//!
//! Binds an [`Engine`] to axum: cache-control per response class, a static
//! file mount, a health check that bypasses dispatch, and the concrete
//! render/patch/not-found/error responders.

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;
use maud::Markup;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{error, info};
use trellis_router::clean_path;

use crate::config::Config;
use crate::contracts::{NotFoundContext, RouteHandler};
use crate::engine::{internal_error_response, Engine, EngineConfig, EngineError, NotFoundPredicate};
use crate::patch::PatchElements;
use crate::request_context::RequestContext;

pub const DEFAULT_CACHE_POLICY: &str = "public, max-age=3600, s-maxage=3600";
pub const DEFAULT_HEALTH_PATH: &str = "/healthz";
pub const DEFAULT_HEALTH_BODY: &str = "ok";
pub const DEFAULT_STATIC_PREFIX: &str = "/.trellis/";

const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";
const TEXT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Renders the not-found page, `None` for a bare 404
pub type NotFoundPage = Arc<dyn Fn(&NotFoundContext) -> Option<Markup> + Send + Sync>;

/// Receives the full error behind every 500 response
pub type ServerErrorLogger = Arc<dyn Fn(&RequestContext, &anyhow::Error) + Send + Sync>;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("invalid {class} cache policy {value:?}")]
    InvalidCachePolicy { class: &'static str, value: String },

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("failed to serve on {addr}: {source}")]
    Io {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

// ============================================================================
// Settings
// ============================================================================

/// `Cache-Control` values per response class
///
/// Blank entries fall back to [`DEFAULT_CACHE_POLICY`], except
/// `live_navigation`, which falls back to `live`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachePolicies {
    #[serde(default = "default_cache_policy")]
    pub html: String,

    #[serde(default = "default_cache_policy")]
    pub live: String,

    #[serde(default)]
    pub live_navigation: String,

    #[serde(default = "default_cache_policy")]
    pub static_assets: String,

    #[serde(default = "default_cache_policy")]
    pub health: String,

    #[serde(default = "default_cache_policy")]
    pub error: String,
}

fn default_cache_policy() -> String {
    DEFAULT_CACHE_POLICY.to_string()
}

impl Default for CachePolicies {
    fn default() -> Self {
        Self {
            html: default_cache_policy(),
            live: default_cache_policy(),
            live_navigation: String::new(),
            static_assets: default_cache_policy(),
            health: default_cache_policy(),
            error: default_cache_policy(),
        }
    }
}

impl CachePolicies {
    /// Fills blank policies with their fallbacks
    pub fn normalized(mut self) -> Self {
        for policy in [
            &mut self.html,
            &mut self.live,
            &mut self.static_assets,
            &mut self.health,
            &mut self.error,
        ] {
            if policy.trim().is_empty() {
                *policy = default_cache_policy();
            }
        }
        if self.live_navigation.trim().is_empty() {
            self.live_navigation = self.live.clone();
        }
        self
    }
}

/// Static directory served under a URL prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticMount {
    pub url_prefix: String,
    pub dir: PathBuf,
}

impl StaticMount {
    pub fn new(url_prefix: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            url_prefix: url_prefix.into(),
            dir: dir.into(),
        }
    }

    /// Prefix with exactly one leading and one trailing `/`
    pub fn normalized_prefix(&self) -> String {
        let trimmed = self.url_prefix.trim().trim_matches('/');
        if trimmed.is_empty() {
            return DEFAULT_STATIC_PREFIX.to_string();
        }
        format!("/{}/", trimmed)
    }
}

fn normalize_health_path(path: &str) -> String {
    let path = path.trim();
    if path.is_empty() {
        return DEFAULT_HEALTH_PATH.to_string();
    }
    clean_path(path).into_owned()
}

fn normalize_health_body(body: &str) -> String {
    match body.trim() {
        "" => DEFAULT_HEALTH_BODY.to_string(),
        trimmed => trimmed.to_string(),
    }
}

/// Everything needed to build the HTTP router
pub struct HttpServerConfig<C> {
    pub app_context: C,
    pub handlers: Vec<Box<dyn RouteHandler<C>>>,
    pub is_not_found_error: Option<NotFoundPredicate>,
    pub not_found_page: Option<NotFoundPage>,
    pub log_server_error: Option<ServerErrorLogger>,
    pub cache_policies: CachePolicies,
    pub static_mount: Option<StaticMount>,
    pub health_path: String,
    pub health_body: String,
}

impl<C> HttpServerConfig<C> {
    pub fn new(app_context: C, handlers: Vec<Box<dyn RouteHandler<C>>>) -> Self {
        Self {
            app_context,
            handlers,
            is_not_found_error: None,
            not_found_page: None,
            log_server_error: None,
            cache_policies: CachePolicies::default(),
            static_mount: None,
            health_path: DEFAULT_HEALTH_PATH.to_string(),
            health_body: DEFAULT_HEALTH_BODY.to_string(),
        }
    }

    /// Applies the cache, static, and health sections of `trellis.toml`
    pub fn with_settings(mut self, config: &Config) -> Self {
        self.cache_policies = config.cache.clone();
        self.static_mount = config
            .static_files
            .enabled
            .then(|| StaticMount::new(&config.static_files.url_prefix, &config.static_files.dir));
        self.health_path = config.health.path.clone();
        self.health_body = config.health.body.clone();
        self
    }

    pub fn with_not_found_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&anyhow::Error) -> bool + Send + Sync + 'static,
    {
        self.is_not_found_error = Some(Arc::new(predicate));
        self
    }

    pub fn with_not_found_page<F>(mut self, page: F) -> Self
    where
        F: Fn(&NotFoundContext) -> Option<Markup> + Send + Sync + 'static,
    {
        self.not_found_page = Some(Arc::new(page));
        self
    }

    pub fn with_error_logger<F>(mut self, log: F) -> Self
    where
        F: Fn(&RequestContext, &anyhow::Error) + Send + Sync + 'static,
    {
        self.log_server_error = Some(Arc::new(log));
        self
    }

    pub fn with_cache_policies(mut self, policies: CachePolicies) -> Self {
        self.cache_policies = policies;
        self
    }

    pub fn with_static_mount(mut self, mount: StaticMount) -> Self {
        self.static_mount = Some(mount);
        self
    }

    pub fn with_health(mut self, path: impl Into<String>, body: impl Into<String>) -> Self {
        self.health_path = path.into();
        self.health_body = body.into();
        self
    }
}

// ============================================================================
// Responders
// ============================================================================

struct HeaderPolicies {
    html: HeaderValue,
    live: HeaderValue,
    live_navigation: HeaderValue,
    static_assets: HeaderValue,
    health: HeaderValue,
    error: HeaderValue,
}

impl HeaderPolicies {
    fn parse(policies: &CachePolicies) -> Result<Self, ServerError> {
        let parse = |class: &'static str, value: &str| {
            HeaderValue::from_str(value).map_err(|_| ServerError::InvalidCachePolicy {
                class,
                value: value.to_string(),
            })
        };

        Ok(Self {
            html: parse("html", &policies.html)?,
            live: parse("live", &policies.live)?,
            live_navigation: parse("live navigation", &policies.live_navigation)?,
            static_assets: parse("static", &policies.static_assets)?,
            health: parse("health", &policies.health)?,
            error: parse("error", &policies.error)?,
        })
    }
}

struct Responders {
    policies: HeaderPolicies,
    not_found_page: Option<NotFoundPage>,
    log_server_error: Option<ServerErrorLogger>,
}

impl Responders {
    fn page(&self, page: Markup) -> Response {
        html_response(StatusCode::OK, page, &self.policies.html)
    }

    fn patch(&self, req: &RequestContext, selector_id: &str, fragment: Markup) -> Response {
        let policy = if req.is_live_navigation() {
            &self.policies.live_navigation
        } else {
            &self.policies.live
        };
        let mut response = PatchElements::new(selector_id, fragment).into_response();
        response.headers_mut().insert(header::CACHE_CONTROL, policy.clone());
        response
    }

    fn not_found(&self, context: &NotFoundContext) -> Response {
        let page = self.not_found_page.as_ref().and_then(|render| render(context));
        match page {
            Some(page) => html_response(StatusCode::NOT_FOUND, page, &self.policies.error),
            None => with_cache_control(StatusCode::NOT_FOUND.into_response(), &self.policies.error),
        }
    }

    fn bad_request(&self, message: &str) -> Response {
        with_cache_control(
            (StatusCode::BAD_REQUEST, message.to_string()).into_response(),
            &self.policies.error,
        )
    }

    fn server_error(&self, req: &RequestContext, err: anyhow::Error) -> Response {
        match &self.log_server_error {
            Some(log) => log(req, &err),
            None => error!(path = %req.path, error = ?err, "request failed"),
        }
        with_cache_control(internal_error_response(), &self.policies.error)
    }
}

fn with_cache_control(mut response: Response, policy: &HeaderValue) -> Response {
    response.headers_mut().insert(header::CACHE_CONTROL, policy.clone());
    response
}

fn html_response(status: StatusCode, page: Markup, policy: &HeaderValue) -> Response {
    let mut response = (status, page.into_string()).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(HTML_CONTENT_TYPE));
    headers.insert(header::CACHE_CONTROL, policy.clone());
    response
}

// ============================================================================
// Router
// ============================================================================

struct AppServer<C> {
    engine: Engine<C>,
    health_path: String,
    health_body: String,
    health_policy: HeaderValue,
}

/// Builds the axum router serving every registered route
pub fn router<C>(config: HttpServerConfig<C>) -> Result<Router, ServerError>
where
    C: Clone + Send + Sync + 'static,
{
    let policies = config.cache_policies.normalized();
    let responders = Arc::new(Responders {
        policies: HeaderPolicies::parse(&policies)?,
        not_found_page: config.not_found_page,
        log_server_error: config.log_server_error,
    });
    let health_policy = responders.policies.health.clone();
    let static_policy = responders.policies.static_assets.clone();

    let mut engine_config = EngineConfig::new(config.app_context, config.handlers)
        .with_render_page({
            let responders = Arc::clone(&responders);
            move |_req, page| Ok(responders.page(page))
        })
        .with_patch_live({
            let responders = Arc::clone(&responders);
            move |req, selector_id, fragment| Ok(responders.patch(req, selector_id, fragment))
        })
        .with_not_found({
            let responders = Arc::clone(&responders);
            move |_req, context| responders.not_found(&context)
        })
        .with_bad_request({
            let responders = Arc::clone(&responders);
            move |_req, message| responders.bad_request(message)
        })
        .with_server_error({
            let responders = Arc::clone(&responders);
            move |req, err| responders.server_error(req, err)
        });
    engine_config.is_not_found = config.is_not_found_error;

    let engine = Engine::new(engine_config)?;
    info!(routes = engine.patterns().len(), "trellis routes registered");

    let server = Arc::new(AppServer {
        engine,
        health_path: normalize_health_path(&config.health_path),
        health_body: normalize_health_body(&config.health_body),
        health_policy,
    });

    let mut app = Router::new();
    if let Some(mount) = config.static_mount {
        let prefix = mount.normalized_prefix();
        info!(prefix = %prefix, dir = %mount.dir.display(), "mounting static files");
        let service = ServiceBuilder::new()
            .layer(SetResponseHeaderLayer::overriding(header::CACHE_CONTROL, static_policy))
            .service(ServeDir::new(&mount.dir));
        app = app.nest_service(prefix.trim_end_matches('/'), service);
    }

    Ok(app.fallback(handle_request::<C>).with_state(server))
}

async fn handle_request<C>(State(server): State<Arc<AppServer<C>>>, request: Request) -> Response
where
    C: Clone + Send + Sync + 'static,
{
    let (parts, _body) = request.into_parts();
    let req = RequestContext::from_parts(&parts);

    if req.path == server.health_path {
        let mut response = (StatusCode::OK, server.health_body.clone()).into_response();
        let headers = response.headers_mut();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(TEXT_CONTENT_TYPE));
        headers.insert(header::CACHE_CONTROL, server.health_policy.clone());
        return response;
    }

    if req.method != Method::GET && req.method != Method::HEAD {
        let mut response = StatusCode::METHOD_NOT_ALLOWED.into_response();
        response
            .headers_mut()
            .insert(header::ALLOW, HeaderValue::from_static("GET, HEAD"));
        return response;
    }

    server.engine.serve(&req).await
}

/// Binds `addr` and serves `app` until the process stops
pub async fn serve(addr: &str, app: Router) -> Result<(), ServerError> {
    let io_error = |source| ServerError::Io {
        addr: addr.to_string(),
        source,
    };

    let listener = tokio::net::TcpListener::bind(addr).await.map_err(io_error)?;
    info!("trellis listening on http://{}", addr);
    axum::serve(listener, app).await.map_err(io_error)
}
