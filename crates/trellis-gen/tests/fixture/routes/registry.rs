// @generated by trellis-gen. DO NOT EDIT.
//! Route handlers in match order and not-found page selection.

use std::sync::Arc;

use trellis::maud::Markup;

use super::contracts::*;

/// Matches `/`
pub fn parse_root_params(path: &str) -> Option<RootParams> {
    trellis::router::match_path_pattern("/", path).map(|_| RootParams::default())
}

/// Matches `/notes/[slug]`
pub fn parse_notes_param_slug_params(path: &str) -> Option<NotesParamSlugParams> {
    let mut captured = trellis::router::match_path_pattern("/notes/[slug]", path)?;
    let params = NotesParamSlugParams {
        slug: captured.remove("slug")?,
    };
    if !trellis::router::is_valid_slug(&params.slug) {
        return None;
    }
    Some(params)
}

/// Matches `/notes/[slug]/live`
pub fn parse_notes_param_slug_live_params(path: &str) -> Option<NotesParamSlugParams> {
    let mut captured = trellis::router::match_path_pattern("/notes/[slug]/live", path)?;
    let params = NotesParamSlugParams {
        slug: captured.remove("slug")?,
    };
    if !trellis::router::is_valid_slug(&params.slug) {
        return None;
    }
    Some(params)
}

fn wrap_notes_param_slug_with_root_layout(view: &super::rr_notes_param_slug::PageView, child: Markup) -> Markup {
    super::r_layout_root::layout(view, child)
}

fn wrap_root_with_root_layout(view: &super::rr_root::PageView, child: Markup) -> Markup {
    super::r_layout_root::layout(view, child)
}

/// Route handlers, most specific first
pub fn handlers<R: RouteResolvers>(resolvers: Arc<R>) -> Vec<Box<dyn trellis::RouteHandler<AppContext>>> {
    let mut handlers: Vec<Box<dyn trellis::RouteHandler<AppContext>>> = Vec::with_capacity(2);

    // /notes/[slug]
    {
        let page_resolvers = Arc::clone(&resolvers);
        let state_resolvers = Arc::clone(&resolvers);
        let live_resolvers = Arc::clone(&resolvers);
        handlers.push(Box::new(trellis::PageAndLiveRouteHandler {
            page: trellis::PageModule {
                pattern: "/notes/[slug]".to_string(),
                parse_params: parse_notes_param_slug_params,
                load: trellis::page_loader(move |ctx: AppContext, req: trellis::RequestContext, params: NotesParamSlugParams| {
                    let resolvers = Arc::clone(&page_resolvers);
                    async move { resolvers.resolve_notes_param_slug_page(ctx, &req, params).await }
                }),
                render: super::r_page_notes_param_slug::page,
                layouts: vec![
                    wrap_notes_param_slug_with_root_layout as trellis::LayoutWrapper<super::rr_notes_param_slug::PageView>,
                ],
            },
            live: trellis::LiveModule {
                pattern: "/notes/[slug]/live".to_string(),
                parse_params: parse_notes_param_slug_live_params,
                parse_state: trellis::state_parser(move |req: &trellis::RequestContext| {
                    state_resolvers.parse_notes_param_slug_live_state(req)
                }),
                load: trellis::live_loader(
                    move |ctx: AppContext, req: trellis::RequestContext, params: NotesParamSlugParams, state: super::rr_notes_param_slug::LiveState| {
                        let resolvers = Arc::clone(&live_resolvers);
                        async move { resolvers.resolve_notes_param_slug_live(ctx, &req, params, state).await }
                    },
                ),
                render: super::r_page_notes_param_slug::page,
                selector_id: "note".to_string(),
                bad_request_message: "invalid datastar signal payload".to_string(),
            },
        }));
    }

    // /
    {
        let page_resolvers = Arc::clone(&resolvers);
        handlers.push(Box::new(trellis::PageOnlyRouteHandler {
            page: trellis::PageModule {
                pattern: "/".to_string(),
                parse_params: parse_root_params,
                load: trellis::page_loader(move |ctx: AppContext, req: trellis::RequestContext, params: RootParams| {
                    let resolvers = Arc::clone(&page_resolvers);
                    async move { resolvers.resolve_root_page(ctx, &req, params).await }
                }),
                render: super::r_page_root::page,
                layouts: vec![
                    wrap_root_with_root_layout as trellis::LayoutWrapper<super::rr_root::PageView>,
                ],
            },
        }));
    }

    handlers
}

/// Page from the nearest not-found template covering the request path
pub fn not_found_page(context: &trellis::NotFoundContext) -> Option<Markup> {
    let path = context.request_path.as_str();
    if trellis::router::match_path_prefix("/", path).is_some() {
        return Some(super::r_not_found_root::not_found(path));
    }
    None
}
