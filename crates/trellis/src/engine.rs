//! Dispatch engine
//!
//! Holds the ordered handler list and the callbacks that turn outcomes into
//! responses. Every request runs one live pass over all handlers, then one
//! page pass; the first handler that does not decline produces the response.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use maud::Markup;
use thiserror::Error;
use tracing::{debug, error};

use crate::contracts::{NotFoundContext, RouteHandler, Runtime};
use crate::request_context::RequestContext;

pub type RenderPageFn = Arc<dyn Fn(&RequestContext, Markup) -> anyhow::Result<Response> + Send + Sync>;
pub type PatchLiveFn = Arc<dyn Fn(&RequestContext, &str, Markup) -> anyhow::Result<Response> + Send + Sync>;
pub type NotFoundPredicate = Arc<dyn Fn(&anyhow::Error) -> bool + Send + Sync>;
pub type NotFoundResponder = Arc<dyn Fn(&RequestContext, NotFoundContext) -> Response + Send + Sync>;
pub type BadRequestResponder = Arc<dyn Fn(&RequestContext, &str) -> Response + Send + Sync>;
pub type ServerErrorResponder = Arc<dyn Fn(&RequestContext, anyhow::Error) -> Response + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("engine requires a render_page callback")]
    MissingRenderPage,
}

/// Engine construction input
///
/// Only `render_page` is mandatory. Missing callbacks fall back to:
/// never not-found, bare 404, 400 with the message, and a logged 500.
pub struct EngineConfig<C> {
    pub app_context: C,
    pub handlers: Vec<Box<dyn RouteHandler<C>>>,
    pub render_page: Option<RenderPageFn>,
    pub patch_live: Option<PatchLiveFn>,
    pub is_not_found: Option<NotFoundPredicate>,
    pub not_found: Option<NotFoundResponder>,
    pub bad_request: Option<BadRequestResponder>,
    pub server_error: Option<ServerErrorResponder>,
}

impl<C> EngineConfig<C> {
    pub fn new(app_context: C, handlers: Vec<Box<dyn RouteHandler<C>>>) -> Self {
        Self {
            app_context,
            handlers,
            render_page: None,
            patch_live: None,
            is_not_found: None,
            not_found: None,
            bad_request: None,
            server_error: None,
        }
    }

    pub fn with_render_page<F>(mut self, render: F) -> Self
    where
        F: Fn(&RequestContext, Markup) -> anyhow::Result<Response> + Send + Sync + 'static,
    {
        self.render_page = Some(Arc::new(render));
        self
    }

    pub fn with_patch_live<F>(mut self, patch: F) -> Self
    where
        F: Fn(&RequestContext, &str, Markup) -> anyhow::Result<Response> + Send + Sync + 'static,
    {
        self.patch_live = Some(Arc::new(patch));
        self
    }

    pub fn with_not_found_predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&anyhow::Error) -> bool + Send + Sync + 'static,
    {
        self.is_not_found = Some(Arc::new(predicate));
        self
    }

    pub fn with_not_found<F>(mut self, respond: F) -> Self
    where
        F: Fn(&RequestContext, NotFoundContext) -> Response + Send + Sync + 'static,
    {
        self.not_found = Some(Arc::new(respond));
        self
    }

    pub fn with_bad_request<F>(mut self, respond: F) -> Self
    where
        F: Fn(&RequestContext, &str) -> Response + Send + Sync + 'static,
    {
        self.bad_request = Some(Arc::new(respond));
        self
    }

    pub fn with_server_error<F>(mut self, respond: F) -> Self
    where
        F: Fn(&RequestContext, anyhow::Error) -> Response + Send + Sync + 'static,
    {
        self.server_error = Some(Arc::new(respond));
        self
    }
}

pub struct Engine<C> {
    app_context: C,
    handlers: Vec<Box<dyn RouteHandler<C>>>,
    render_page: RenderPageFn,
    patch_live: Option<PatchLiveFn>,
    is_not_found: Option<NotFoundPredicate>,
    not_found: Option<NotFoundResponder>,
    bad_request: Option<BadRequestResponder>,
    server_error: Option<ServerErrorResponder>,
}

impl<C> Engine<C>
where
    C: Clone + Send + Sync + 'static,
{
    pub fn new(config: EngineConfig<C>) -> Result<Self, EngineError> {
        let render_page = config.render_page.ok_or(EngineError::MissingRenderPage)?;

        Ok(Self {
            app_context: config.app_context,
            handlers: config.handlers,
            render_page,
            patch_live: config.patch_live,
            is_not_found: config.is_not_found,
            not_found: config.not_found,
            bad_request: config.bad_request,
            server_error: config.server_error,
        })
    }

    /// Registered patterns in dispatch order
    pub fn patterns(&self) -> Vec<&str> {
        self.handlers.iter().map(|handler| handler.pattern()).collect()
    }

    /// Dispatches `req`, returning `None` when no handler serves it
    pub async fn serve_route(&self, req: &RequestContext) -> Option<Response> {
        for handler in &self.handlers {
            if let Some(response) = handler.try_serve_live(self, req).await {
                return Some(response);
            }
        }

        for handler in &self.handlers {
            if let Some(response) = handler.try_serve_page(self, req).await {
                return Some(response);
            }
        }

        None
    }

    /// Dispatches `req`, answering unserved requests with an unmatched-route not-found
    pub async fn serve(&self, req: &RequestContext) -> Response {
        match self.serve_route(req).await {
            Some(response) => response,
            None => {
                debug!(path = %req.path, "no route matched");
                self.not_found(req, NotFoundContext::unmatched(req.path.clone()))
            }
        }
    }
}

impl<C> Runtime<C> for Engine<C>
where
    C: Clone + Send + Sync + 'static,
{
    fn app_context(&self) -> C {
        self.app_context.clone()
    }

    fn render_page(&self, req: &RequestContext, page: Markup) -> anyhow::Result<Response> {
        (self.render_page)(req, page)
    }

    fn patch_live(&self, req: &RequestContext, selector_id: &str, fragment: Markup) -> anyhow::Result<Response> {
        match &self.patch_live {
            Some(patch) => patch(req, selector_id, fragment),
            None => Err(anyhow::anyhow!("engine has no patch_live callback")),
        }
    }

    fn is_not_found(&self, err: &anyhow::Error) -> bool {
        self.is_not_found.as_ref().is_some_and(|predicate| predicate(err))
    }

    fn not_found(&self, req: &RequestContext, context: NotFoundContext) -> Response {
        match &self.not_found {
            Some(respond) => respond(req, context),
            None => StatusCode::NOT_FOUND.into_response(),
        }
    }

    fn bad_request(&self, req: &RequestContext, message: &str) -> Response {
        match &self.bad_request {
            Some(respond) => respond(req, message),
            None => (StatusCode::BAD_REQUEST, message.to_string()).into_response(),
        }
    }

    fn server_error(&self, req: &RequestContext, err: anyhow::Error) -> Response {
        match &self.server_error {
            Some(respond) => respond(req, err),
            None => {
                error!(path = %req.path, error = ?err, "request failed");
                internal_error_response()
            }
        }
    }
}

/// 500 with the canonical status text and nothing else
pub(crate) fn internal_error_response() -> Response {
    let status = StatusCode::INTERNAL_SERVER_ERROR;
    (status, status.canonical_reason().unwrap_or("Internal Server Error")).into_response()
}
