//! # Trellis Router
//!
//! File-system route primitives shared by the trellis code generator and the
//! runtime:
//! - Route segment parsing (`about`, `[slug]`)
//! - Specificity ordering (most static segments first)
//! - Path normalization and lazy parent iteration
//! - Segment matching against compiled routes or ad-hoc pattern strings
//!
//! ## Segment Policy
//!
//! Dynamic segments use bracket syntax only: a directory named `[slug]`
//! captures one request segment under the name `slug`. The older
//! underscore-prefixed form (`_slug`) is rejected everywhere with
//! [`SegmentError::LegacyWildcardSyntax`], which carries a migration hint.
//!
//! ## Example
//!
//! ```
//! use trellis_router::AppRouter;
//!
//! let router = AppRouter::new(["page.rs", "author/[slug]/page.rs", "author/settings/page.rs"]).unwrap();
//!
//! let found = router.match_path("/author/nina").unwrap();
//! assert_eq!(found.route_id, "author/[slug]");
//! assert_eq!(found.params.get("slug"), Some(&"nina".to_string()));
//!
//! let found = router.match_path("/author/settings/").unwrap();
//! assert_eq!(found.route_id, "author/settings");
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

mod app_router;
mod matcher;
pub mod path;
pub mod segment;

pub use app_router::{AppRoute, AppRouteMatch, AppRouter, RouterError};
pub use matcher::{is_valid_slug, match_path_pattern, match_path_prefix, match_segments, RouteParams};
pub use path::{clean_path, split_path_segments, PathHierarchy};
pub use segment::{
    is_valid_param_name, parse_route_dir, parse_segment, route_id, route_pattern, live_pattern,
    matcher_key, RouteSegment, SegmentError, Specificity,
};
