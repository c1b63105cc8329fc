//! Deterministic identifiers derived from route segments
//!
//! Every generated name is a pure function of the route's segments, so two
//! runs over the same tree always agree on module, type, and method names.

use std::path::{Component, Path};

use trellis_router::RouteSegment;

const RUST_KEYWORDS: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum", "extern", "false", "fn",
    "for", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut", "pub", "ref", "return", "self",
    "static", "struct", "super", "trait", "true", "type", "unsafe", "use", "where", "while", "abstract", "become",
    "box", "do", "final", "gen", "macro", "override", "priv", "try", "typeof", "unsized", "virtual", "yield",
];

/// Lowercase identifier fragment: `micro-tales` → `micro_tales`
pub fn safe_identifier(value: &str) -> String {
    let replaced: String = value
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '_' })
        .collect();
    let trimmed = replaced.trim_matches('_');
    if trimmed.is_empty() {
        "value".to_string()
    } else {
        trimmed.to_string()
    }
}

fn safe_part(segment: &RouteSegment) -> String {
    match segment {
        RouteSegment::Static(value) => safe_identifier(value),
        RouteSegment::Dynamic(name) => format!("param_{}", name.to_ascii_lowercase()),
    }
}

/// snake_case key unique per route: `author_param_slug`, `root`
pub fn route_key(segments: &[RouteSegment]) -> String {
    if segments.is_empty() {
        return "root".to_string();
    }
    segments.iter().map(safe_part).collect::<Vec<_>>().join("_")
}

/// PascalCase route name: `AuthorParamSlug`, `Root`
pub fn route_name(segments: &[RouteSegment]) -> String {
    if segments.is_empty() {
        return "Root".to_string();
    }
    let name: String = segments
        .iter()
        .map(|segment| match segment {
            RouteSegment::Static(value) => pascal_case(value),
            RouteSegment::Dynamic(name) => format!("Param{}", pascal_case(name)),
        })
        .collect();
    if name.starts_with(|c: char| c.is_ascii_digit()) || name.is_empty() {
        format!("Route{}", name)
    } else {
        name
    }
}

/// `micro-tales` → `MicroTales`, `postId` → `PostId`
pub fn pascal_case(value: &str) -> String {
    value
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

/// `postId` → `post_id`
pub fn snake_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 4);
    let mut prev_lower = false;
    for c in value.chars() {
        if c.is_ascii_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        }
    }
    out
}

/// Path keywords that are not accepted as raw identifiers
const PATH_KEYWORDS: &[&str] = &["self", "super", "crate"];

/// Struct field for a route parameter, raw when it collides with a keyword
///
/// `self`, `super` and `crate` (and `Self`, which lowers to `self`) cannot be
/// raw identifiers, so they get a trailing underscore instead.
pub fn field_ident(param: &str) -> String {
    let name = snake_case(param);
    if PATH_KEYWORDS.contains(&name.as_str()) {
        format!("{}_", name)
    } else if RUST_KEYWORDS.contains(&name.as_str()) {
        format!("r#{}", name)
    } else {
        name
    }
}

/// Resolver directory mirroring the route: `author/param_slug`, `root`
pub fn resolver_rel_path(segments: &[RouteSegment]) -> String {
    if segments.is_empty() {
        return "root".to_string();
    }
    segments
        .iter()
        .map(|segment| match segment {
            RouteSegment::Static(value) => value.clone(),
            RouteSegment::Dynamic(name) => format!("param_{}", name.to_ascii_lowercase()),
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Relative path from directory `from` to `to`, with `/` separators
///
/// Both paths are compared lexically; neither needs to exist.
pub fn relative_path(from: &Path, to: &Path) -> String {
    let from = lexical_components(from);
    let to = lexical_components(to);
    let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();

    let mut parts: Vec<String> = std::iter::repeat("..".to_string()).take(from.len() - common).collect();
    parts.extend(to[common..].iter().cloned());
    parts.join("/")
}

fn lexical_components(path: &Path) -> Vec<String> {
    path.components().fold(Vec::new(), |mut parts, component| {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(parts.last().map(String::as_str), None | Some("..")) {
                    parts.push("..".to_string());
                } else {
                    parts.pop();
                }
            }
            other => parts.push(other.as_os_str().to_string_lossy().into_owned()),
        }
        parts
    })
}
