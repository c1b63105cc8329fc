use std::fmt::Write;

use super::{header, parse_live_state_method, resolve_live_method, resolve_page_method, route_module};
use crate::meta::RoutePlan;

/// `resolvers.rs`: `GeneratedResolvers` delegating each capability method
/// to the route's own `Resolver`
pub(super) fn render(plan: &RoutePlan) -> String {
    let mut out = header("Default `RouteResolvers` built from each route's `Resolver`.");
    out.push_str("use super::contracts::*;\n\n");

    let routes = plan.routes_by_id();

    out.push_str("#[derive(Default)]\npub struct GeneratedResolvers {\n");
    for route in &routes {
        let _ = writeln!(out, "    pub r_{}: super::{}::Resolver,", route.key, route_module(route));
    }
    out.push_str("}\n\n#[trellis::async_trait]\nimpl RouteResolvers for GeneratedResolvers {");

    for route in &routes {
        let module = route_module(route);
        let key = &route.key;
        let _ = write!(
            out,
            r#"
    async fn {method}(
        &self,
        ctx: AppContext,
        req: &trellis::RequestContext,
        params: {params},
    ) -> trellis::anyhow::Result<super::{module}::PageView> {{
        super::{module}::RouteResolver::resolve_page(&self.r_{key}, ctx, req, params).await
    }}
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
    ) -> trellis::anyhow::Result<super::{module}::LiveState> {{
        super::{module}::RouteResolver::parse_live_state(&self.r_{key}, req)
    }}

    async fn {live}(
        &self,
        ctx: AppContext,
        req: &trellis::RequestContext,
        params: {params},
        state: super::{module}::LiveState,
    ) -> trellis::anyhow::Result<super::{module}::PageView> {{
        super::{module}::RouteResolver::resolve_live(&self.r_{key}, ctx, req, params, state).await
    }}
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
