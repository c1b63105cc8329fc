use anyhow::{Context, Result};
use colored::Colorize;
use trellis_gen::{GenerateOptions, RouteMeta};
use trellis_router::{is_valid_slug, match_segments, RouteParams, RouteSegment};

/// Prints every page route in the order the engine tries them
pub fn execute(opts: &GenerateOptions, request_path: Option<&str>) -> Result<()> {
    let plan = trellis_gen::plan(opts).context("route discovery failed")?;

    println!("{}", "Routes (match order):".green().bold());
    for route in &plan.routes {
        let live = if route.is_live() {
            format!("  + {}", route.live_pattern).cyan().to_string()
        } else {
            String::new()
        };
        println!("  {:<32} {}{}", route.pattern, route.page_view_type.dimmed(), live);
    }

    if !plan.not_founds.is_empty() {
        println!();
        println!("{}", "Not-found pages:".green().bold());
        for not_found in &plan.not_founds {
            println!("  {}", not_found.pattern);
        }
    }

    let Some(path) = request_path else {
        return Ok(());
    };

    println!();
    match find_route(&plan.routes, path) {
        Some((route, params, live)) => {
            let kind = if live { "live" } else { "page" };
            println!("{} {} -> {} ({})", "✓".green(), path, route.pattern.cyan(), kind);
            let mut params: Vec<_> = params.into_iter().collect();
            params.sort();
            for (name, value) in params {
                println!("    {} = {}", name, value);
            }
        }
        None => println!("{} {} -> no route (unmatched-route)", "✗".red(), path),
    }

    Ok(())
}

/// The route the engine would serve `path` with, live variants first
///
/// Slug params must pass the same check the generated parsers apply.
fn find_route<'a>(routes: &'a [RouteMeta], path: &str) -> Option<(&'a RouteMeta, RouteParams, bool)> {
    let live = routes.iter().filter(|route| route.is_live()).find_map(|route| {
        let mut segments = route.segments.clone();
        segments.push(RouteSegment::Static("live".to_string()));
        accept(&segments, path).map(|params| (route, params, true))
    });
    live.or_else(|| {
        routes
            .iter()
            .find_map(|route| accept(&route.segments, path).map(|params| (route, params, false)))
    })
}

fn accept(segments: &[RouteSegment], path: &str) -> Option<RouteParams> {
    let params = match_segments(segments, path)?;
    match params.get("slug") {
        Some(slug) if !is_valid_slug(slug) => None,
        _ => Some(params),
    }
}
