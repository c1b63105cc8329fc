//! Segment matching against compiled routes and ad-hoc patterns
//!
//! Both entry points share [`match_segments`]: segment counts must be equal,
//! static segments compare exactly (case-sensitive) and dynamic segments
//! capture the whole request segment. Request paths are cleaned first, so
//! `/notes/` and `/notes` match the same route.

use std::collections::HashMap;

use crate::path::split_path_segments;
use crate::segment::{parse_route_dir, RouteSegment};

/// Captured dynamic segment values keyed by parameter name
pub type RouteParams = HashMap<String, String>;

/// Matches a request path against pre-parsed route segments
///
/// # Examples
///
/// ```
/// use trellis_router::{match_segments, parse_route_dir};
///
/// let route = parse_route_dir("author/[slug]").unwrap();
/// let params = match_segments(&route, "/author/nina/").unwrap();
/// assert_eq!(params["slug"], "nina");
///
/// assert!(match_segments(&route, "/author").is_none());
/// ```
pub fn match_segments(route: &[RouteSegment], request_path: &str) -> Option<RouteParams> {
    let request = split_path_segments(request_path);
    if request.len() != route.len() {
        return None;
    }
    capture(route, &request)
}

/// Matches a request path against a pattern string like `/author/[slug]`
///
/// The pattern is classified segment by segment on every call. A malformed
/// pattern never matches.
///
/// ```
/// use trellis_router::match_path_pattern;
///
/// let params = match_path_pattern("/notes/[slug]/live", "/notes/hello/live").unwrap();
/// assert_eq!(params["slug"], "hello");
/// assert!(match_path_pattern("/notes/[slug]", "/notes").is_none());
/// ```
pub fn match_path_pattern(pattern: &str, request_path: &str) -> Option<RouteParams> {
    let route = parse_route_dir(pattern).ok()?;
    match_segments(&route, request_path)
}

/// Matches when the pattern covers a leading run of the request segments
///
/// Used to find the nearest not-found template for an arbitrary path:
/// `/author/[slug]` covers `/author/nina/missing`. The root pattern
/// covers every path.
pub fn match_path_prefix(pattern: &str, request_path: &str) -> Option<RouteParams> {
    let route = parse_route_dir(pattern).ok()?;
    let request = split_path_segments(request_path);
    if request.len() < route.len() {
        return None;
    }
    capture(&route, &request[..route.len()])
}

fn capture(route: &[RouteSegment], request: &[&str]) -> Option<RouteParams> {
    route
        .iter()
        .zip(request)
        .try_fold(RouteParams::new(), |mut params, (segment, value)| {
            match segment {
                RouteSegment::Static(expected) if expected == value => {}
                RouteSegment::Static(_) => return None,
                RouteSegment::Dynamic(name) => {
                    params.insert(name.clone(), (*value).to_string());
                }
            }
            Some(params)
        })
}

/// Slug charset check applied to `slug` parameters by generated parsers
///
/// Letters, digits, `-` and `_`; must not start with `-` or `_`.
///
/// ```
/// use trellis_router::is_valid_slug;
///
/// assert!(is_valid_slug("l-you"));
/// assert!(is_valid_slug("post_2"));
/// assert!(!is_valid_slug("bad slug"));
/// assert!(!is_valid_slug("-draft"));
/// ```
pub fn is_valid_slug(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphanumeric() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        }
        _ => false,
    }
}
