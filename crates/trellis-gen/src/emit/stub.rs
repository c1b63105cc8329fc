use std::fmt::Write;

use crate::meta::RouteMeta;

/// Placeholder `resolver.rs` for a route without one
///
/// Stubs belong to the user once written, so they carry no generated
/// marker and are never overwritten.
pub fn render_stub(route: &RouteMeta) -> String {
    let live_import = if route.is_live() { ", LiveState" } else { "" };
    let mut out = String::new();
    let _ = write!(
        out,
        r#"//! Resolver for `{pattern}`.

use trellis::anyhow::{{bail, Result}};
use trellis::RequestContext;

use super::{{AppContext, PageView, Params{live_import}}};

#[derive(Debug, Default)]
pub struct Resolver;

#[trellis::async_trait]
impl super::RouteResolver for Resolver {{
    async fn resolve_page(&self, _ctx: AppContext, _req: &RequestContext, _params: Params) -> Result<PageView> {{
        bail!("TODO: implement resolve_page for route {pattern}")
    }}
"#,
        pattern = route.pattern,
    );

    if route.is_live() {
        let _ = write!(
            out,
            r#"
    fn parse_live_state(&self, _req: &RequestContext) -> Result<LiveState> {{
        bail!("TODO: implement parse_live_state for route {pattern}")
    }}

    async fn resolve_live(
        &self,
        _ctx: AppContext,
        _req: &RequestContext,
        _params: Params,
        _state: LiveState,
    ) -> Result<PageView> {{
        bail!("TODO: implement resolve_live for route {pattern}")
    }}
"#,
            pattern = route.pattern,
        );
    }
    out.push_str("}\n");
    out
}
