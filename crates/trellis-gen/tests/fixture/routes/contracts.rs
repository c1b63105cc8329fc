// @generated by trellis-gen. DO NOT EDIT.
//! Route params and the resolver capability every route loads through.

/// Shared application context handed to every resolver
pub type AppContext = crate::AppContext;

/// Params for `/`
pub type RootParams = trellis::EmptyParams;

/// Params for `/notes/[slug]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotesParamSlugParams {
    pub slug: String,
}

#[trellis::async_trait]
pub trait RouteResolvers: Send + Sync + 'static {
    async fn resolve_root_page(
        &self,
        ctx: AppContext,
        req: &trellis::RequestContext,
        params: RootParams,
    ) -> trellis::anyhow::Result<super::rr_root::PageView>;

    async fn resolve_notes_param_slug_page(
        &self,
        ctx: AppContext,
        req: &trellis::RequestContext,
        params: NotesParamSlugParams,
    ) -> trellis::anyhow::Result<super::rr_notes_param_slug::PageView>;

    fn parse_notes_param_slug_live_state(
        &self,
        req: &trellis::RequestContext,
    ) -> trellis::anyhow::Result<super::rr_notes_param_slug::LiveState>;

    async fn resolve_notes_param_slug_live(
        &self,
        ctx: AppContext,
        req: &trellis::RequestContext,
        params: NotesParamSlugParams,
        state: super::rr_notes_param_slug::LiveState,
    ) -> trellis::anyhow::Result<super::rr_notes_param_slug::PageView>;
}
