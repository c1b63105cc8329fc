//! Request path cleaning and prefix walks

use std::borrow::Cow;

pub mod hierarchy;
pub use hierarchy::PathHierarchy;

/// Canonical absolute form of a request path
///
/// Separators collapse, `.` and `..` resolve and the trailing slash goes, so
/// `/notes//a/../b/` becomes `/notes/b`. A path that is already canonical
/// comes back borrowed.
///
/// ```
/// use std::borrow::Cow;
/// use trellis_router::path::clean_path;
///
/// assert!(matches!(clean_path("/notes"), Cow::Borrowed("/notes")));
/// assert_eq!(clean_path("/notes//a/../b/"), "/notes/b");
/// assert_eq!(clean_path(""), "/");
/// ```
pub fn clean_path(path: &str) -> Cow<'_, str> {
    let segments = split_path_segments(path);
    let cleaned = if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    };

    if cleaned == path {
        Cow::Borrowed(path)
    } else {
        Cow::Owned(cleaned)
    }
}

/// Splits a request path into clean segments
///
/// Empty and `.` segments are dropped and `..` pops its parent, so the result
/// is the segment list of the canonical absolute path. Root yields no
/// segments. Slices borrow from the input.
///
/// ```
/// use trellis_router::path::split_path_segments;
///
/// assert_eq!(split_path_segments("/author/nina/"), vec!["author", "nina"]);
/// assert_eq!(split_path_segments("/a/./b/../c"), vec!["a", "c"]);
/// assert!(split_path_segments("/").is_empty());
/// ```
pub fn split_path_segments(path: &str) -> Vec<&str> {
    path.split(['/', '\\'])
        .fold(Vec::new(), |mut segments, part| {
            match part {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                _ => segments.push(part),
            }
            segments
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_path() {
        assert!(matches!(clean_path("/"), Cow::Borrowed("/")));
        assert!(matches!(clean_path("/author/nina"), Cow::Borrowed(_)));
        assert_eq!(clean_path("/notes/"), "/notes");
        assert_eq!(clean_path("//notes///live//"), "/notes/live");
        assert_eq!(clean_path("\\notes\\live"), "/notes/live");
        assert_eq!(clean_path("/a/./b/../c"), "/a/c");
        assert_eq!(clean_path("/../.."), "/");
        assert_eq!(clean_path("notes"), "/notes");
    }

    #[test]
    fn test_split_path_segments() {
        assert_eq!(split_path_segments("/notes/"), vec!["notes"]);
        assert_eq!(split_path_segments("notes//live"), vec!["notes", "live"]);
        assert_eq!(split_path_segments("/../notes"), vec!["notes"]);
        assert!(split_path_segments("").is_empty());
    }
}
