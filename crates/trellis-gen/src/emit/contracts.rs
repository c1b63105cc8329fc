use std::fmt::Write;

use super::{header, parse_live_state_method, resolve_live_method, resolve_page_method, route_module, EmitContext};
use crate::meta::RoutePlan;

/// `contracts.rs`: params structs and the `RouteResolvers` capability
pub(super) fn render(plan: &RoutePlan, ctx: &EmitContext<'_>) -> String {
    let mut out = header("Route params and the resolver capability every route loads through.");

    let _ = writeln!(
        out,
        "/// Shared application context handed to every resolver\npub type AppContext = {};",
        ctx.app_context_type
    );

    let routes = plan.routes_by_id();
    for route in &routes {
        out.push('\n');
        let _ = writeln!(out, "/// Params for `{}`", route.pattern);
        if route.params.is_empty() {
            let _ = writeln!(out, "pub type {} = trellis::EmptyParams;", route.params_type);
            continue;
        }
        let _ = writeln!(out, "#[derive(Debug, Clone, Default, PartialEq, Eq)]\npub struct {} {{", route.params_type);
        for param in &route.params {
            let _ = writeln!(out, "    pub {}: String,", param.field);
        }
        out.push_str("}\n");
    }

    out.push_str("\n#[trellis::async_trait]\npub trait RouteResolvers: Send + Sync + 'static {");
    for route in &routes {
        let module = route_module(route);
        let _ = write!(
            out,
            r#"
    async fn {method}(
        &self,
        ctx: AppContext,
        req: &trellis::RequestContext,
        params: {params},
    ) -> trellis::anyhow::Result<super::{module}::PageView>;
"#,
            method = resolve_page_method(route),
            params = route.params_type,
        );
        if route.is_live() {
            let _ = write!(
                out,
                r#"
    fn {parse}(
        &self,
        req: &trellis::RequestContext,
    ) -> trellis::anyhow::Result<super::{module}::LiveState>;

    async fn {live}(
        &self,
        ctx: AppContext,
        req: &trellis::RequestContext,
        params: {params},
        state: super::{module}::LiveState,
    ) -> trellis::anyhow::Result<super::{module}::PageView>;
"#,
                parse = parse_live_state_method(route),
                live = resolve_live_method(route),
                params = route.params_type,
            );
        }
    }
    out.push_str("}\n");
    out
}
