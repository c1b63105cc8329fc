//! # Trellis
//!
//! Runtime half of trellis: the dispatch engine that serves generated route
//! registries, and the axum adapter that exposes it over HTTP.
//!
//! `trellis-gen` turns a tree of route templates into a registry of
//! [`RouteHandler`]s. At startup the registry is handed to
//! [`server::router`] (or to an [`Engine`] directly). For every request the
//! engine tries each handler's live endpoint, then each page, and classifies
//! failures as bad request, not found, or server error.
//!
//! ```no_run
//! # async fn run(handlers: Vec<Box<dyn trellis::RouteHandler<std::sync::Arc<()>>>>) -> anyhow::Result<()> {
//! use std::sync::Arc;
//! use trellis::{server, Config, HttpServerConfig};
//!
//! let config = Config::load_default()?;
//! let app = server::router(
//!     HttpServerConfig::new(Arc::new(()), handlers)
//!         .with_settings(&config)
//!         .with_not_found_predicate(trellis::is_not_found_error),
//! )?;
//! server::serve(&config.address(), app).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod contracts;
pub mod engine;
pub mod patch;
pub mod request_context;
pub mod server;
pub mod signals;

pub use config::Config;
pub use contracts::{
    apply_layouts, is_not_found_error, live_loader, page_loader, state_parser, EmptyParams, LayoutView, LayoutWrapper,
    LiveModule, NotFound, NotFoundContext, NotFoundSource, PageAndLiveRouteHandler, PageModule,
    PageOnlyRouteHandler, PageRenderer, ParamsParser, RouteHandler, Runtime,
};
pub use engine::{Engine, EngineConfig, EngineError};
pub use patch::{PatchElements, PatchMode};
pub use request_context::{QueryParams, RequestContext};
pub use server::{CachePolicies, HttpServerConfig, StaticMount};
pub use signals::read_signals;

// Re-exported for generated code
pub use anyhow;
pub use async_trait::async_trait;
pub use maud;
pub use trellis_router as router;
