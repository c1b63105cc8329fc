use std::fmt::Write;

use super::{header, parse_live_state_method, resolve_live_method, resolve_page_method, route_module};
use crate::contract::NotFoundArg;
use crate::meta::{wrapper_name, RouteMeta, RoutePlan};

/// `registry.rs`: params parsers, layout wrappers, `handlers()` and
/// `not_found_page()`
pub(super) fn render(plan: &RoutePlan) -> String {
    let mut out = header("Route handlers in match order and not-found page selection.");
    out.push_str("use std::sync::Arc;\n\nuse trellis::maud::Markup;\n\nuse super::contracts::*;\n");

    for route in plan.routes_by_id() {
        out.push('\n');
        render_parser(&mut out, &parser_name(route), &route.pattern, route);
        if route.is_live() {
            out.push('\n');
            render_parser(&mut out, &live_parser_name(route), &route.live_pattern, route);
        }
    }

    for wrapper in plan.wrappers.values() {
        let _ = write!(
            out,
            "\nfn {name}(view: &super::rr_{route}::PageView, child: Markup) -> Markup {{\n    super::{layout}::layout(view, child)\n}}\n",
            name = wrapper.name,
            route = wrapper.route_key,
            layout = wrapper.layout_module,
        );
    }

    render_handlers(&mut out, plan);
    render_not_found(&mut out, plan);
    out
}

fn parser_name(route: &RouteMeta) -> String {
    format!("parse_{}_params", route.key)
}

fn live_parser_name(route: &RouteMeta) -> String {
    format!("parse_{}_live_params", route.key)
}

fn render_parser(out: &mut String, name: &str, pattern: &str, route: &RouteMeta) {
    let _ = writeln!(out, "/// Matches `{}`", pattern);
    let _ = writeln!(out, "pub fn {}(path: &str) -> Option<{}> {{", name, route.params_type);

    if route.params.is_empty() {
        let _ = writeln!(
            out,
            "    trellis::router::match_path_pattern({:?}, path).map(|_| {}::default())\n}}",
            pattern, route.params_type
        );
        return;
    }

    let _ = writeln!(
        out,
        "    let mut captured = trellis::router::match_path_pattern({:?}, path)?;",
        pattern
    );
    let _ = writeln!(out, "    let params = {} {{", route.params_type);
    for param in &route.params {
        let _ = writeln!(out, "        {}: captured.remove({:?})?,", param.field, param.name);
    }
    out.push_str("    };\n");
    for param in route.params.iter().filter(|param| param.is_slug()) {
        let _ = writeln!(
            out,
            "    if !trellis::router::is_valid_slug(&params.{}) {{\n        return None;\n    }}",
            param.field
        );
    }
    out.push_str("    Some(params)\n}\n");
}

fn render_handlers(out: &mut String, plan: &RoutePlan) {
    let _ = write!(
        out,
        r#"
/// Route handlers, most specific first
pub fn handlers<R: RouteResolvers>(resolvers: Arc<R>) -> Vec<Box<dyn trellis::RouteHandler<AppContext>>> {{
    let mut handlers: Vec<Box<dyn trellis::RouteHandler<AppContext>>> = Vec::with_capacity({count});
"#,
        count = plan.routes.len(),
    );

    for route in &plan.routes {
        let module = route_module(route);
        let layouts = route
            .layouts
            .iter()
            .map(|layout| {
                format!(
                    "\n                    {} as trellis::LayoutWrapper<super::{}::PageView>,",
                    wrapper_name(&route.key, &layout.key),
                    module
                )
            })
            .collect::<String>();
        let layouts = if layouts.is_empty() {
            "vec![]".to_string()
        } else {
            format!("vec![{}\n                ]", layouts)
        };

        let page = format!(
            r#"trellis::PageModule {{
                pattern: {pattern:?}.to_string(),
                parse_params: {parser},
                load: trellis::page_loader(move |ctx: AppContext, req: trellis::RequestContext, params: {params}| {{
                    let resolvers = Arc::clone(&page_resolvers);
                    async move {{ resolvers.{method}(ctx, &req, params).await }}
                }}),
                render: super::{template}::page,
                layouts: {layouts},
            }}"#,
            pattern = route.pattern,
            parser = parser_name(route),
            params = route.params_type,
            method = resolve_page_method(route),
            template = route.module,
        );

        let _ = writeln!(out, "\n    // {}\n    {{\n        let page_resolvers = Arc::clone(&resolvers);", route.pattern);
        match &route.live {
            None => {
                let _ = writeln!(
                    out,
                    "        handlers.push(Box::new(trellis::PageOnlyRouteHandler {{\n            page: {page},\n        }}));"
                );
            }
            Some(live) => {
                let _ = write!(
                    out,
                    r#"        let state_resolvers = Arc::clone(&resolvers);
        let live_resolvers = Arc::clone(&resolvers);
        handlers.push(Box::new(trellis::PageAndLiveRouteHandler {{
            page: {page},
            live: trellis::LiveModule {{
                pattern: {pattern:?}.to_string(),
                parse_params: {parser},
                parse_state: trellis::state_parser(move |req: &trellis::RequestContext| {{
                    state_resolvers.{parse}(req)
                }}),
                load: trellis::live_loader(
                    move |ctx: AppContext, req: trellis::RequestContext, params: {params}, state: super::{module}::LiveState| {{
                        let resolvers = Arc::clone(&live_resolvers);
                        async move {{ resolvers.{method}(ctx, &req, params, state).await }}
                    }},
                ),
                render: super::{template}::page,
                selector_id: {selector:?}.to_string(),
                bad_request_message: {message:?}.to_string(),
            }},
        }}));
"#,
                    pattern = route.live_pattern,
                    parser = live_parser_name(route),
                    parse = parse_live_state_method(route),
                    params = route.params_type,
                    method = resolve_live_method(route),
                    template = route.module,
                    selector = live.selector_id,
                    message = live.bad_request_message,
                );
            }
        }
        out.push_str("    }\n");
    }

    out.push_str("\n    handlers\n}\n");
}

fn render_not_found(out: &mut String, plan: &RoutePlan) {
    out.push_str("\n/// Page from the nearest not-found template covering the request path\n");
    if plan.not_founds.is_empty() {
        out.push_str("pub fn not_found_page(_context: &trellis::NotFoundContext) -> Option<Markup> {\n    None\n}\n");
        return;
    }

    out.push_str(
        "pub fn not_found_page(context: &trellis::NotFoundContext) -> Option<Markup> {\n    let path = context.request_path.as_str();\n",
    );
    for not_found in &plan.not_founds {
        let arg = match not_found.arg {
            NotFoundArg::Borrowed => "path",
            NotFoundArg::Owned => "path.to_string()",
        };
        let _ = writeln!(
            out,
            "    if trellis::router::match_path_prefix({:?}, path).is_some() {{\n        return Some(super::{}::not_found({}));\n    }}",
            not_found.pattern, not_found.module, arg
        );
    }
    out.push_str("    None\n}\n");
}
