// @generated by trellis-gen. DO NOT EDIT.
//! Resolver contract for `/`.

#[path = "../resolvers/root/types.rs"]
mod types;
#[path = "../resolvers/root/resolver.rs"]
mod resolver;

pub use self::resolver::Resolver;
pub use self::types::*;
pub use super::contracts::AppContext;
pub use super::contracts::RootParams as Params;

#[trellis::async_trait]
pub trait RouteResolver: Send + Sync {
    async fn resolve_page(
        &self,
        ctx: AppContext,
        req: &trellis::RequestContext,
        params: Params,
    ) -> trellis::anyhow::Result<PageView>;
}
