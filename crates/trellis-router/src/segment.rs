//! Route segment parsing
//!
//! Pure parsers that turn route directory names into typed segments.
//! Directory `author/[slug]` becomes `[Static("author"), Dynamic("slug")]`.

use std::cmp::Ordering;
use thiserror::Error;

/// A single route path component
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RouteSegment {
    /// Literal directory name, compared case-sensitively
    Static(String),
    /// `[name]` directory capturing one request segment
    Dynamic(String),
}

impl RouteSegment {
    pub fn is_dynamic(&self) -> bool {
        matches!(self, RouteSegment::Dynamic(_))
    }

    /// Literal value or parameter name
    pub fn name(&self) -> &str {
        match self {
            RouteSegment::Static(value) | RouteSegment::Dynamic(value) => value,
        }
    }

    /// Representation inside a route id: `about` or `[slug]`
    pub fn route_part(&self) -> String {
        match self {
            RouteSegment::Static(value) => value.clone(),
            RouteSegment::Dynamic(name) => format!("[{}]", name),
        }
    }
}

/// Segment validation failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SegmentError {
    #[error("empty route segment")]
    EmptySegment,

    #[error("invalid segment syntax {0:?}: brackets must wrap the whole segment")]
    InvalidSegmentSyntax(String),

    #[error("invalid segment name {0:?}: expected [A-Za-z][A-Za-z0-9_]*")]
    InvalidSegmentName(String),

    #[error("legacy wildcard segment {0:?} is not allowed; use [param] directories")]
    LegacyWildcardSyntax(String),
}

/// Checks a dynamic parameter name against `[A-Za-z][A-Za-z0-9_]*`
pub fn is_valid_param_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// Parses one route segment
///
/// Rules are applied in order:
/// 1. A segment wrapped in `[...]` is dynamic and its name must be valid
/// 2. A segment with only one of the wrapping brackets is malformed
/// 3. An underscore-prefixed segment is the retired wildcard form
/// 4. Brackets anywhere else are malformed
/// 5. Everything else is static
///
/// # Examples
///
/// ```
/// use trellis_router::{parse_segment, RouteSegment, SegmentError};
///
/// assert_eq!(parse_segment("about"), Ok(RouteSegment::Static("about".into())));
/// assert_eq!(parse_segment("[slug]"), Ok(RouteSegment::Dynamic("slug".into())));
/// assert!(matches!(parse_segment("_slug"), Err(SegmentError::LegacyWildcardSyntax(_))));
/// ```
pub fn parse_segment(raw: &str) -> Result<RouteSegment, SegmentError> {
    let part = raw.trim();
    if part.is_empty() {
        return Err(SegmentError::EmptySegment);
    }

    let opens = part.starts_with('[');
    let closes = part.ends_with(']');
    if opens || closes {
        if !(opens && closes) || part.len() < 2 {
            return Err(SegmentError::InvalidSegmentSyntax(part.to_string()));
        }
        let name = part[1..part.len() - 1].trim();
        if !is_valid_param_name(name) {
            return Err(SegmentError::InvalidSegmentName(part.to_string()));
        }
        return Ok(RouteSegment::Dynamic(name.to_string()));
    }

    if part.starts_with('_') {
        return Err(SegmentError::LegacyWildcardSyntax(part.to_string()));
    }

    if part.contains('[') || part.contains(']') {
        return Err(SegmentError::InvalidSegmentSyntax(part.to_string()));
    }

    Ok(RouteSegment::Static(part.to_string()))
}

/// Parses a slash-separated route directory (`""` is the root route)
pub fn parse_route_dir(dir: &str) -> Result<Vec<RouteSegment>, SegmentError> {
    let dir = dir.trim_matches('/');
    if dir.is_empty() || dir == "." {
        return Ok(Vec::new());
    }
    dir.split('/').map(parse_segment).collect()
}

/// Route id: `author/[slug]`, or `""` for the root route
pub fn route_id(segments: &[RouteSegment]) -> String {
    segments
        .iter()
        .map(RouteSegment::route_part)
        .collect::<Vec<_>>()
        .join("/")
}

/// Request pattern: `/author/[slug]`, or `/` for the root route
pub fn route_pattern(segments: &[RouteSegment]) -> String {
    if segments.is_empty() {
        return "/".to_string();
    }
    format!("/{}", route_id(segments))
}

/// Pattern of the live companion endpoint: `/author/[slug]/live`
pub fn live_pattern(segments: &[RouteSegment]) -> String {
    if segments.is_empty() {
        return "/live".to_string();
    }
    format!("{}/live", route_pattern(segments))
}

/// Structural key used for conflict detection
///
/// Parameter names are erased, so `[slug]` and `[id]` at the same
/// position collide: `/author/:`.
pub fn matcher_key(segments: &[RouteSegment]) -> String {
    let parts: Vec<&str> = segments
        .iter()
        .map(|segment| match segment {
            RouteSegment::Static(value) => value.as_str(),
            RouteSegment::Dynamic(_) => ":",
        })
        .collect();
    format!("/{}", parts.join("/"))
}

/// Match priority of a route
///
/// Ordering is "most specific first": more static segments win, then more
/// segments overall. Callers break remaining ties by route id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Specificity {
    pub static_count: usize,
    pub segment_count: usize,
}

impl Specificity {
    pub fn of(segments: &[RouteSegment]) -> Self {
        Self {
            static_count: segments.iter().filter(|s| !s.is_dynamic()).count(),
            segment_count: segments.len(),
        }
    }
}

impl Ord for Specificity {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .static_count
            .cmp(&self.static_count)
            .then_with(|| other.segment_count.cmp(&self.segment_count))
    }
}

impl PartialOrd for Specificity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
