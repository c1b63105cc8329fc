// @generated by trellis-gen. DO NOT EDIT.
//! Resolver contract for `/notes/[slug]`.

#[path = "../resolvers/notes/param_slug/types.rs"]
mod types;
#[path = "../resolvers/notes/param_slug/resolver.rs"]
mod resolver;

pub use self::resolver::Resolver;
pub use self::types::*;
pub use super::contracts::AppContext;
pub use super::contracts::NotesParamSlugParams as Params;

#[trellis::async_trait]
pub trait RouteResolver: Send + Sync {
    async fn resolve_page(
        &self,
        ctx: AppContext,
        req: &trellis::RequestContext,
        params: Params,
    ) -> trellis::anyhow::Result<PageView>;

    fn parse_live_state(&self, req: &trellis::RequestContext) -> trellis::anyhow::Result<LiveState>;

    async fn resolve_live(
        &self,
        ctx: AppContext,
        req: &trellis::RequestContext,
        params: Params,
        state: LiveState,
    ) -> trellis::anyhow::Result<PageView>;
}
