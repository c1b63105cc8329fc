//! Route modules and handlers consumed by the dispatch engine
//!
//! A generated registry builds one [`RouteHandler`] per page route. Each
//! handler wraps a [`PageModule`] and, for live-capable routes, a
//! [`LiveModule`]. Handlers never fail: they either decline a request (the
//! pattern does not match) or return a finished response, classifying load
//! and render failures through the [`Runtime`] they are given.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use axum::response::Response;
use maud::Markup;
use thiserror::Error;
use tracing::debug;

use crate::request_context::RequestContext;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Extracts typed params from a request path, `None` when the pattern does not match
pub type ParamsParser<P> = fn(&str) -> Option<P>;

/// Renders a view model into the page body
pub type PageRenderer<V> = fn(&V) -> Markup;

/// Wraps a child component in one layout
pub type LayoutWrapper<V> = fn(&V, Markup) -> Markup;

pub type StateParser<S> = Arc<dyn Fn(&RequestContext) -> anyhow::Result<S> + Send + Sync>;

pub type PageLoader<C, P, V> =
    Arc<dyn Fn(C, RequestContext, P) -> BoxFuture<'static, anyhow::Result<V>> + Send + Sync>;

pub type LiveLoader<C, P, S, V> =
    Arc<dyn Fn(C, RequestContext, P, S) -> BoxFuture<'static, anyhow::Result<V>> + Send + Sync>;

/// Fallback when a live module carries a blank bad-request message
pub const DEFAULT_BAD_REQUEST_MESSAGE: &str = "invalid request payload";

/// Params of a route without dynamic segments
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct EmptyParams;

// ============================================================================
// Loader constructors
// ============================================================================

/// Boxes an async page loader
pub fn page_loader<C, P, V, F, Fut>(load: F) -> PageLoader<C, P, V>
where
    C: 'static,
    P: 'static,
    V: 'static,
    F: Fn(C, RequestContext, P) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<V>> + Send + 'static,
{
    Arc::new(
        move |ctx: C, req: RequestContext, params: P| -> BoxFuture<'static, anyhow::Result<V>> {
            Box::pin(load(ctx, req, params))
        },
    )
}

/// Boxes an async live loader
pub fn live_loader<C, P, S, V, F, Fut>(load: F) -> LiveLoader<C, P, S, V>
where
    C: 'static,
    P: 'static,
    S: 'static,
    V: 'static,
    F: Fn(C, RequestContext, P, S) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<V>> + Send + 'static,
{
    Arc::new(
        move |ctx: C, req: RequestContext, params: P, state: S| -> BoxFuture<'static, anyhow::Result<V>> {
            Box::pin(load(ctx, req, params, state))
        },
    )
}

pub fn state_parser<S, F>(parse: F) -> StateParser<S>
where
    F: Fn(&RequestContext) -> anyhow::Result<S> + Send + Sync + 'static,
{
    Arc::new(parse)
}

// ============================================================================
// Modules
// ============================================================================

/// Full-page rendering for one route
pub struct PageModule<C, P, V> {
    pub pattern: String,
    pub parse_params: ParamsParser<P>,
    pub load: PageLoader<C, P, V>,
    pub render: PageRenderer<V>,
    /// Outermost first
    pub layouts: Vec<LayoutWrapper<V>>,
}

/// Partial patch endpoint (`<pattern>/live`) for one route
pub struct LiveModule<C, P, S, V> {
    pub pattern: String,
    pub parse_params: ParamsParser<P>,
    pub parse_state: StateParser<S>,
    pub load: LiveLoader<C, P, S, V>,
    pub render: PageRenderer<V>,
    /// Element id the rendered fragment replaces
    pub selector_id: String,
    pub bad_request_message: String,
}

/// Shared capability of view models rendered inside a layout
pub trait LayoutView {
    /// Document title
    fn title(&self) -> String;

    fn description(&self) -> Option<String> {
        None
    }
}

/// Wraps `body` in `layouts` so the first layout ends up outermost
///
/// ```
/// use maud::{html, Markup};
/// use trellis::apply_layouts;
///
/// fn outer(_: &(), child: Markup) -> Markup { html! { "[outer]" (child) "[/outer]" } }
/// fn inner(_: &(), child: Markup) -> Markup { html! { "[inner]" (child) "[/inner]" } }
///
/// let page = apply_layouts(&[outer, inner], &(), html! { "body" });
/// assert_eq!(page.into_string(), "[outer][inner]body[/inner][/outer]");
/// ```
pub fn apply_layouts<V>(layouts: &[LayoutWrapper<V>], view: &V, body: Markup) -> Markup {
    layouts.iter().rev().fold(body, |child, wrap| wrap(view, child))
}

// ============================================================================
// Not-found classification
// ============================================================================

/// Where a not-found outcome came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotFoundSource {
    /// A page loader reported a missing record
    PageLoad,
    /// A live loader reported a missing record
    LiveLoad,
    /// No route pattern matched the path
    UnmatchedRoute,
}

impl NotFoundSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotFoundSource::PageLoad => "page-load",
            NotFoundSource::LiveLoad => "live-load",
            NotFoundSource::UnmatchedRoute => "unmatched-route",
        }
    }
}

impl std::fmt::Display for NotFoundSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why and where a request failed to resolve to content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotFoundContext {
    pub request_path: String,
    /// Pattern of the route being served, `None` when nothing matched
    pub matched_route_pattern: Option<String>,
    pub source: NotFoundSource,
}

impl NotFoundContext {
    pub fn unmatched(request_path: impl Into<String>) -> Self {
        Self {
            request_path: request_path.into(),
            matched_route_pattern: None,
            source: NotFoundSource::UnmatchedRoute,
        }
    }
}

/// Error loaders return for a missing record
///
/// Pair with [`is_not_found_error`] as the engine's not-found predicate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not found: {0}")]
pub struct NotFound(pub String);

/// True when any error in the chain is a [`NotFound`]
pub fn is_not_found_error(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| cause.is::<NotFound>())
}

// ============================================================================
// Runtime seam
// ============================================================================

/// Callbacks a handler uses to finish a response
pub trait Runtime<C>: Send + Sync {
    fn app_context(&self) -> C;

    fn render_page(&self, req: &RequestContext, page: Markup) -> anyhow::Result<Response>;

    fn patch_live(&self, req: &RequestContext, selector_id: &str, fragment: Markup) -> anyhow::Result<Response>;

    fn is_not_found(&self, err: &anyhow::Error) -> bool;

    fn not_found(&self, req: &RequestContext, context: NotFoundContext) -> Response;

    fn bad_request(&self, req: &RequestContext, message: &str) -> Response;

    fn server_error(&self, req: &RequestContext, err: anyhow::Error) -> Response;
}

/// One dispatchable route
///
/// `None` means the handler declined the request and dispatch moves on.
#[async_trait]
pub trait RouteHandler<C>: Send + Sync {
    fn pattern(&self) -> &str;

    async fn try_serve_page(&self, runtime: &dyn Runtime<C>, req: &RequestContext) -> Option<Response>;

    async fn try_serve_live(&self, runtime: &dyn Runtime<C>, req: &RequestContext) -> Option<Response>;
}

pub struct PageOnlyRouteHandler<C, P, V> {
    pub page: PageModule<C, P, V>,
}

pub struct PageAndLiveRouteHandler<C, P, S, V> {
    pub page: PageModule<C, P, V>,
    pub live: LiveModule<C, P, S, V>,
}

#[async_trait]
impl<C, P, V> RouteHandler<C> for PageOnlyRouteHandler<C, P, V>
where
    C: Send + Sync + 'static,
    P: Send + 'static,
    V: Send + Sync + 'static,
{
    fn pattern(&self) -> &str {
        &self.page.pattern
    }

    async fn try_serve_page(&self, runtime: &dyn Runtime<C>, req: &RequestContext) -> Option<Response> {
        serve_page_module(runtime, req, &self.page).await
    }

    async fn try_serve_live(&self, _runtime: &dyn Runtime<C>, _req: &RequestContext) -> Option<Response> {
        None
    }
}

#[async_trait]
impl<C, P, S, V> RouteHandler<C> for PageAndLiveRouteHandler<C, P, S, V>
where
    C: Send + Sync + 'static,
    P: Send + 'static,
    S: Send + 'static,
    V: Send + Sync + 'static,
{
    fn pattern(&self) -> &str {
        &self.page.pattern
    }

    async fn try_serve_page(&self, runtime: &dyn Runtime<C>, req: &RequestContext) -> Option<Response> {
        serve_page_module(runtime, req, &self.page).await
    }

    async fn try_serve_live(&self, runtime: &dyn Runtime<C>, req: &RequestContext) -> Option<Response> {
        serve_live_module(runtime, req, &self.live).await
    }
}

async fn serve_page_module<C, P, V>(
    runtime: &dyn Runtime<C>,
    req: &RequestContext,
    module: &PageModule<C, P, V>,
) -> Option<Response> {
    let params = (module.parse_params)(&req.path)?;
    debug!(pattern = %module.pattern, path = %req.path, "serving page");

    let load = (module.load)(runtime.app_context(), req.clone(), params);
    let view = match load.await {
        Ok(view) => view,
        Err(err) => {
            return Some(handle_load_error(runtime, req, err, &module.pattern, NotFoundSource::PageLoad));
        }
    };

    let page = apply_layouts(&module.layouts, &view, (module.render)(&view));
    let response = runtime
        .render_page(req, page)
        .unwrap_or_else(|err| runtime.server_error(req, err.context(format!("render route {:?}", module.pattern))));
    Some(response)
}

async fn serve_live_module<C, P, S, V>(
    runtime: &dyn Runtime<C>,
    req: &RequestContext,
    module: &LiveModule<C, P, S, V>,
) -> Option<Response> {
    let params = (module.parse_params)(&req.path)?;
    debug!(pattern = %module.pattern, path = %req.path, "serving live patch");

    let state = match (module.parse_state)(req) {
        Ok(state) => state,
        Err(err) => {
            debug!(pattern = %module.pattern, error = %err, "rejecting live state");
            let message = module.bad_request_message.trim();
            let message = if message.is_empty() { DEFAULT_BAD_REQUEST_MESSAGE } else { message };
            return Some(runtime.bad_request(req, message));
        }
    };

    let load = (module.load)(runtime.app_context(), req.clone(), params, state);
    let view = match load.await {
        Ok(view) => view,
        Err(err) => {
            return Some(handle_load_error(runtime, req, err, &module.pattern, NotFoundSource::LiveLoad));
        }
    };

    let fragment = (module.render)(&view);
    let response = runtime
        .patch_live(req, &module.selector_id, fragment)
        .unwrap_or_else(|err| runtime.server_error(req, err.context(format!("patch route {:?}", module.pattern))));
    Some(response)
}

fn handle_load_error<C>(
    runtime: &dyn Runtime<C>,
    req: &RequestContext,
    err: anyhow::Error,
    pattern: &str,
    source: NotFoundSource,
) -> Response {
    if runtime.is_not_found(&err) {
        return runtime.not_found(
            req,
            NotFoundContext {
                request_path: req.path.clone(),
                matched_route_pattern: Some(pattern.to_string()),
                source,
            },
        );
    }
    runtime.server_error(req, err.context(format!("load route {:?}", pattern)))
}
