// @generated by trellis-gen. DO NOT EDIT.
//! Default `RouteResolvers` built from each route's `Resolver`.

use super::contracts::*;

#[derive(Default)]
pub struct GeneratedResolvers {
    pub r_root: super::rr_root::Resolver,
    pub r_notes_param_slug: super::rr_notes_param_slug::Resolver,
}

#[trellis::async_trait]
impl RouteResolvers for GeneratedResolvers {
    async fn resolve_root_page(
        &self,
        ctx: AppContext,
        req: &trellis::RequestContext,
        params: RootParams,
    ) -> trellis::anyhow::Result<super::rr_root::PageView> {
        super::rr_root::RouteResolver::resolve_page(&self.r_root, ctx, req, params).await
    }

    async fn resolve_notes_param_slug_page(
        &self,
        ctx: AppContext,
        req: &trellis::RequestContext,
        params: NotesParamSlugParams,
    ) -> trellis::anyhow::Result<super::rr_notes_param_slug::PageView> {
        super::rr_notes_param_slug::RouteResolver::resolve_page(&self.r_notes_param_slug, ctx, req, params).await
    }

    fn parse_notes_param_slug_live_state(
        &self,
        req: &trellis::RequestContext,
    ) -> trellis::anyhow::Result<super::rr_notes_param_slug::LiveState> {
        super::rr_notes_param_slug::RouteResolver::parse_live_state(&self.r_notes_param_slug, req)
    }

    async fn resolve_notes_param_slug_live(
        &self,
        ctx: AppContext,
        req: &trellis::RequestContext,
        params: NotesParamSlugParams,
        state: super::rr_notes_param_slug::LiveState,
    ) -> trellis::anyhow::Result<super::rr_notes_param_slug::PageView> {
        super::rr_notes_param_slug::RouteResolver::resolve_live(&self.r_notes_param_slug, ctx, req, params, state).await
    }
}
