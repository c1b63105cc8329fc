use std::fmt::Write;

use super::{header, route_module, EmitContext};
use crate::meta::{RouteMeta, RoutePlan};

/// `mod.rs`: template mounts plus the generated submodules
pub(super) fn render_mod(plan: &RoutePlan, ctx: &EmitContext<'_>) -> String {
    let mut out = header(&format!(
        "Route registry for the templates under `{}`.",
        ctx.mount_path(ctx.app_root)
    ));
    out.push_str("pub mod contracts;\npub mod registry;\npub mod resolvers;\n");

    let mut mounts: Vec<(&str, &std::path::Path)> = Vec::new();
    mounts.extend(plan.routes.iter().map(|route| (route.module.as_str(), route.source.as_path())));
    mounts.extend(plan.layouts.iter().map(|layout| (layout.module.as_str(), layout.source.as_path())));
    mounts.extend(plan.not_founds.iter().map(|nf| (nf.module.as_str(), nf.source.as_path())));
    mounts.extend(plan.components.iter().map(|c| (c.module.as_str(), c.source.as_path())));
    mounts.sort_by(|a, b| a.0.cmp(b.0));

    out.push('\n');
    for (module, source) in mounts {
        let _ = writeln!(out, "#[path = \"{}\"]\npub mod {};", ctx.mount_path(source), module);
    }

    out.push('\n');
    for route in plan.routes_by_id() {
        let _ = writeln!(out, "pub mod {};", route_module(route));
    }

    out.push_str(
        "\npub use contracts::*;\npub use registry::{handlers, not_found_page};\npub use resolvers::GeneratedResolvers;\n",
    );
    out
}

/// `rr_<key>.rs`: mounts the hand-written contract and resolver and
/// declares the per-route `RouteResolver` trait
pub(super) fn render_route_module(route: &RouteMeta, ctx: &EmitContext<'_>) -> String {
    let mut out = header(&format!("Resolver contract for `{}`.", route.pattern));

    let _ = write!(
        out,
        r#"#[path = "{contract}"]
mod types;
#[path = "{resolver}"]
mod resolver;

pub use self::resolver::Resolver;
pub use self::types::*;
pub use super::contracts::AppContext;
pub use super::contracts::{params} as Params;

#[trellis::async_trait]
pub trait RouteResolver: Send + Sync {{
    async fn resolve_page(
        &self,
        ctx: AppContext,
        req: &trellis::RequestContext,
        params: Params,
    ) -> trellis::anyhow::Result<PageView>;
"#,
        contract = ctx.mount_path(&route.contract_path),
        resolver = ctx.mount_path(&route.resolver_path),
        params = route.params_type,
    );

    if route.is_live() {
        out.push_str(
            r#"
    fn parse_live_state(&self, req: &trellis::RequestContext) -> trellis::anyhow::Result<LiveState>;

    async fn resolve_live(
        &self,
        ctx: AppContext,
        req: &trellis::RequestContext,
        params: Params,
        state: LiveState,
    ) -> trellis::anyhow::Result<PageView>;
"#,
        );
    }
    out.push_str("}\n");
    out
}
