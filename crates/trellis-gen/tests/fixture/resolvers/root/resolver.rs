//! Resolver for `/`.

use trellis::anyhow::Result;
use trellis::RequestContext;

use super::{AppContext, PageView, Params};

#[derive(Debug, Default)]
pub struct Resolver;

#[trellis::async_trait]
impl super::RouteResolver for Resolver {
    async fn resolve_page(&self, ctx: AppContext, _req: &RequestContext, _params: Params) -> Result<PageView> {
        Ok(PageView {
            title: "Notes".to_string(),
            slugs: ctx.slugs(),
        })
    }
}
