//! Page route table built from template paths
//!
//! The router holds every `page.*` template as a compiled route, sorted
//! most specific first, and refuses route sets where two pages share the same
//! structural pattern.

use std::collections::HashMap;
use thiserror::Error;

use crate::matcher::{match_segments, RouteParams};
use crate::segment::{matcher_key, parse_route_dir, route_id, RouteSegment, SegmentError, Specificity};

const PAGE_STEM: &str = "page";

/// Route table construction failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    #[error("invalid route path {path:?}: {source}")]
    Segment {
        path: String,
        #[source]
        source: SegmentError,
    },

    #[error("route conflict for pattern {key:?}: {existing:?} and {incoming:?}")]
    PatternConflict {
        key: String,
        existing: String,
        incoming: String,
    },
}

/// A compiled page route
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppRoute {
    pub id: String,
    pub segments: Vec<RouteSegment>,
    pub specificity: Specificity,
}

/// Result of matching a request path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppRouteMatch {
    pub route_id: String,
    pub params: RouteParams,
}

#[derive(Debug, Clone, Default)]
pub struct AppRouter {
    routes: Vec<AppRoute>,
}

impl AppRouter {
    /// Builds the table from template paths relative to the app root
    ///
    /// Only files whose stem is `page` register a route; other files are
    /// skipped. `author/[slug]/page.rs` registers `author/[slug]`.
    pub fn new<I, S>(paths: I) -> Result<Self, RouterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut by_key: HashMap<String, String> = HashMap::new();
        let mut routes = Vec::new();

        for path in paths {
            let path = path.as_ref().replace('\\', "/");
            let Some(dir) = page_dir(&path) else {
                continue;
            };

            let segments = parse_route_dir(dir).map_err(|source| RouterError::Segment {
                path: path.clone(),
                source,
            })?;
            let route = AppRoute {
                id: route_id(&segments),
                specificity: Specificity::of(&segments),
                segments,
            };

            let key = matcher_key(&route.segments);
            if let Some(existing) = by_key.get(&key) {
                if *existing != route.id {
                    return Err(RouterError::PatternConflict {
                        key,
                        existing: existing.clone(),
                        incoming: route.id,
                    });
                }
                continue;
            }
            by_key.insert(key, route.id.clone());
            routes.push(route);
        }

        routes.sort_by(|a, b| a.specificity.cmp(&b.specificity).then_with(|| a.id.cmp(&b.id)));
        Ok(Self { routes })
    }

    /// Routes in match order
    pub fn routes(&self) -> &[AppRoute] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// First route, in specificity order, matching the request path
    pub fn match_path(&self, request_path: &str) -> Option<AppRouteMatch> {
        self.routes.iter().find_map(|route| {
            match_segments(&route.segments, request_path).map(|params| AppRouteMatch {
                route_id: route.id.clone(),
                params,
            })
        })
    }
}

/// Directory part of a page template path, or `None` for other files
fn page_dir(path: &str) -> Option<&str> {
    let (dir, file) = match path.rsplit_once('/') {
        Some((dir, file)) => (dir, file),
        None => ("", path),
    };
    let stem = file.split_once('.').map_or(file, |(stem, _)| stem);
    (stem == PAGE_STEM).then_some(dir)
}
