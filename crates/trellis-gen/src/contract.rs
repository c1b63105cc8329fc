//! Source-level contract inspection
//!
//! Resolver contracts and route templates are parsed with `syn`; nothing
//! is compiled or executed. The checks here are the structural gates a
//! route must pass before any code is emitted for it.

use std::fs;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use quote::ToTokens;
use regex::Regex;
use syn::{FnArg, GenericParam, Item, ItemFn, Type, TypeParamBound, UseTree, Visibility, WherePredicate};

use crate::error::{GenError, Result};

pub const CONTRACT_FILE: &str = "types.rs";
pub const RESOLVER_FILE: &str = "resolver.rs";

const PAGE_VIEW: &str = "PageView";
const LIVE_STATE: &str = "LiveState";
const LAYOUT_VIEW_SUFFIX: &str = "LayoutView";

/// What a route's `types.rs` declares
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverContract {
    pub path: PathBuf,
    /// `crate::view_models::NoteView`
    pub page_view: String,
    pub has_live_state: bool,
}

/// How a not-found template takes the request path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotFoundArg {
    /// `fn not_found(path: &str)`
    Borrowed,
    /// `fn not_found(path: String)`
    Owned,
}

/// Reads and checks the contract at `path`
///
/// `PageView` must be a public alias (or `pub use ... as PageView`) whose
/// path runs through `namespace`. Any `LiveState` item marks the route as
/// live-capable.
pub fn resolve_contract(route: &str, path: &Path, namespace: &str) -> Result<ResolverContract> {
    if !path.is_file() {
        return Err(GenError::MissingResolverContract {
            route: route.to_string(),
            expected: path.to_path_buf(),
        });
    }
    let file = parse_file(path)?;

    let mut page_view: Option<Vec<String>> = None;
    let mut page_view_text = String::new();
    let mut has_live_state = false;

    for item in &file.items {
        match item {
            Item::Type(alias) => {
                if alias.ident == LIVE_STATE {
                    has_live_state = true;
                }
                if alias.ident == PAGE_VIEW && is_public(&alias.vis) {
                    page_view_text = type_text(&alias.ty);
                    page_view = Some(type_path(&alias.ty));
                }
            }
            Item::Use(item_use) => {
                let mut aliases = Vec::new();
                collect_use_aliases(&item_use.tree, &mut Vec::new(), &mut aliases);
                for (alias, segments) in aliases {
                    if alias == LIVE_STATE {
                        has_live_state = true;
                    }
                    if alias == PAGE_VIEW && is_public(&item_use.vis) {
                        page_view_text = segments.join("::");
                        page_view = Some(segments);
                    }
                }
            }
            Item::Struct(item) if item.ident == PAGE_VIEW => {
                return Err(unqualified(path, namespace, "local struct PageView"));
            }
            Item::Enum(item) if item.ident == PAGE_VIEW => {
                return Err(unqualified(path, namespace, "local enum PageView"));
            }
            Item::Struct(item) if item.ident == LIVE_STATE => has_live_state = true,
            Item::Enum(item) if item.ident == LIVE_STATE => has_live_state = true,
            _ => {}
        }
    }

    let segments = page_view.ok_or_else(|| GenError::MissingPageView { path: path.to_path_buf() })?;
    if !is_namespaced(&segments, namespace) {
        return Err(unqualified(path, namespace, &page_view_text));
    }

    Ok(ResolverContract {
        path: path.to_path_buf(),
        page_view: page_view_text,
        has_live_state,
    })
}

/// Page templates must define `fn page`
pub fn validate_page(path: &Path) -> Result<()> {
    let file = parse_file(path)?;
    template_fn(&file, path, "page").map(|_| ())
}

/// Layout templates must define `fn layout(view, child)` with the view
/// bounded by a `LayoutView` trait
pub fn validate_layout(path: &Path) -> Result<()> {
    let file = parse_file(path)?;
    let layout = template_fn(&file, path, "layout")?;
    let invalid = |reason: &str| GenError::InvalidLayoutSignature {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    let sig = &layout.sig;
    if sig.inputs.len() != 2 {
        return Err(invalid("expected `fn layout(view, child)` with two parameters"));
    }
    let view = match sig.inputs.first() {
        Some(FnArg::Typed(arg)) => strip_reference(&arg.ty),
        _ => return Err(invalid("first parameter must be the view model")),
    };

    let bounded = match view {
        Type::ImplTrait(bound) => bound.bounds.iter().any(is_layout_view_bound),
        Type::TraitObject(object) => object.bounds.iter().any(is_layout_view_bound),
        Type::Path(generic) if generic.qself.is_none() => match generic.path.get_ident() {
            Some(ident) => generic_bounds(&layout, &ident.to_string()),
            None => false,
        },
        _ => false,
    };
    if !bounded {
        return Err(invalid("view parameter must implement a LayoutView trait"));
    }
    Ok(())
}

/// Not-found templates must define `fn not_found` taking only the request path
pub fn validate_not_found(path: &Path) -> Result<NotFoundArg> {
    let file = parse_file(path)?;
    let not_found = template_fn(&file, path, "not_found")?;
    let invalid = || GenError::InvalidNotFoundSignature {
        path: path.to_path_buf(),
        reason: "expected exactly one `&str` or `String` request path parameter".to_string(),
    };

    let inputs = &not_found.sig.inputs;
    if inputs.len() != 1 {
        return Err(invalid());
    }
    let Some(FnArg::Typed(arg)) = inputs.first() else {
        return Err(invalid());
    };
    match arg.ty.as_ref() {
        Type::Reference(reference) if is_named(&reference.elem, "str") => Ok(NotFoundArg::Borrowed),
        ty if is_named(ty, "String") => Ok(NotFoundArg::Owned),
        _ => Err(invalid()),
    }
}

static SELECTOR_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // id="content" ... data-signals
        r#"(?:^|[\s(])id\s*=\s*"([A-Za-z][\w-]*)"[^\n]*?data-signals"#,
        // data-signals ... id="content"
        r#"data-signals[^\n]*?[\s)]id\s*=\s*"([A-Za-z][\w-]*)""#,
        // maud shorthand: div #content data-signals
        r#"\s#([A-Za-z][\w-]*)[^\n]*?data-signals"#,
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

/// Finds the id of the element a live patch replaces
///
/// The element must carry both an `id` and `data-signals` on the same
/// line. The earliest match in the source wins.
pub fn find_live_selector(source: &str) -> Option<String> {
    SELECTOR_PATTERNS
        .iter()
        .filter_map(|pattern| pattern.captures(source))
        .filter_map(|captures| captures.get(1))
        .min_by_key(|id| id.start())
        .map(|id| id.as_str().to_string())
}

pub fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(GenError::io(path))
}

fn parse_file(path: &Path) -> Result<syn::File> {
    let source = read_source(path)?;
    syn::parse_file(&source).map_err(|err| GenError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

fn find_fn<'a>(file: &'a syn::File, name: &str) -> Option<&'a ItemFn> {
    file.items.iter().find_map(|item| match item {
        Item::Fn(function) if function.sig.ident == name => Some(function),
        _ => None,
    })
}

/// The named template function, which the generated module calls from outside
fn template_fn<'a>(file: &'a syn::File, path: &Path, function: &'static str) -> Result<&'a ItemFn> {
    let found = find_fn(file, function).ok_or_else(|| GenError::MissingTemplateFunction {
        path: path.to_path_buf(),
        function,
    })?;
    if matches!(found.vis, Visibility::Inherited) {
        return Err(GenError::PrivateTemplateFunction {
            path: path.to_path_buf(),
            function,
        });
    }
    Ok(found)
}

fn is_public(vis: &Visibility) -> bool {
    matches!(vis, Visibility::Public(_))
}

fn unqualified(path: &Path, namespace: &str, found: &str) -> GenError {
    GenError::UnqualifiedViewType {
        path: path.to_path_buf(),
        namespace: namespace.to_string(),
        found: found.to_string(),
    }
}

fn type_text(ty: &Type) -> String {
    ty.to_token_stream().to_string().replace(' ', "")
}

fn type_path(ty: &Type) -> Vec<String> {
    match ty {
        Type::Path(path) if path.qself.is_none() => path
            .path
            .segments
            .iter()
            .map(|segment| segment.ident.to_string())
            .collect(),
        _ => Vec::new(),
    }
}

/// True when `namespace` appears in `segments` before the final type name
fn is_namespaced(segments: &[String], namespace: &str) -> bool {
    let wanted: Vec<&str> = namespace.split("::").filter(|part| !part.is_empty()).collect();
    if wanted.is_empty() || segments.len() <= wanted.len() {
        return false;
    }
    segments[..segments.len() - 1]
        .windows(wanted.len())
        .any(|window| window.iter().zip(&wanted).all(|(have, want)| have == want))
}

fn collect_use_aliases(tree: &UseTree, prefix: &mut Vec<String>, out: &mut Vec<(String, Vec<String>)>) {
    match tree {
        UseTree::Path(path) => {
            prefix.push(path.ident.to_string());
            collect_use_aliases(&path.tree, prefix, out);
            prefix.pop();
        }
        UseTree::Name(name) => {
            let mut segments = prefix.clone();
            segments.push(name.ident.to_string());
            out.push((name.ident.to_string(), segments));
        }
        UseTree::Rename(rename) => {
            let mut segments = prefix.clone();
            segments.push(rename.ident.to_string());
            out.push((rename.rename.to_string(), segments));
        }
        UseTree::Group(group) => {
            for tree in &group.items {
                collect_use_aliases(tree, prefix, out);
            }
        }
        UseTree::Glob(_) => {}
    }
}

fn strip_reference(ty: &Type) -> &Type {
    match ty {
        Type::Reference(reference) => strip_reference(&reference.elem),
        Type::Paren(paren) => strip_reference(&paren.elem),
        other => other,
    }
}

fn is_named(ty: &Type, name: &str) -> bool {
    match ty {
        Type::Path(path) if path.qself.is_none() => {
            path.path.segments.last().is_some_and(|segment| segment.ident == name)
        }
        _ => false,
    }
}

fn is_layout_view_bound(bound: &TypeParamBound) -> bool {
    match bound {
        TypeParamBound::Trait(bound) => bound
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident.to_string().ends_with(LAYOUT_VIEW_SUFFIX)),
        _ => false,
    }
}

/// Bounds on generic `name`, inline or in the where clause
fn generic_bounds(function: &ItemFn, name: &str) -> bool {
    let generics = &function.sig.generics;
    let inline = generics.params.iter().any(|param| match param {
        GenericParam::Type(param) => param.ident == name && param.bounds.iter().any(is_layout_view_bound),
        _ => false,
    });
    let where_clause = generics.where_clause.iter().flat_map(|clause| &clause.predicates).any(|predicate| {
        match predicate {
            WherePredicate::Type(predicate) => {
                is_named(&predicate.bounded_ty, name) && predicate.bounds.iter().any(is_layout_view_bound)
            }
            _ => false,
        }
    });
    inline || where_clause
}
