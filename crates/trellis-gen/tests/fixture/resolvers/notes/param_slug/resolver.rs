//! Resolver for `/notes/[slug]`.

use trellis::anyhow::Result;
use trellis::{read_signals, NotFound, RequestContext};

use super::{AppContext, LiveState, PageView, Params};

#[derive(Debug, Default)]
pub struct Resolver;

fn load_note(ctx: &AppContext, slug: &str, highlight: Option<String>) -> Result<PageView> {
    let body = ctx.note(slug).ok_or_else(|| NotFound(slug.to_string()))?;
    Ok(PageView {
        title: slug.to_string(),
        body: body.to_string(),
        highlight,
    })
}

#[trellis::async_trait]
impl super::RouteResolver for Resolver {
    async fn resolve_page(&self, ctx: AppContext, _req: &RequestContext, params: Params) -> Result<PageView> {
        load_note(&ctx, &params.slug, None)
    }

    fn parse_live_state(&self, req: &RequestContext) -> Result<LiveState> {
        Ok(read_signals(req, LiveState::default())?)
    }

    async fn resolve_live(
        &self,
        ctx: AppContext,
        _req: &RequestContext,
        params: Params,
        state: LiveState,
    ) -> Result<PageView> {
        let highlight = Some(state.highlight).filter(|text| !text.is_empty());
        load_note(&ctx, &params.slug, highlight)
    }
}
